//! Body text style detection.

use indexmap::IndexMap;

use crate::model::{StyleKey, TextSpan};

/// Frequency of each (size, bold) style across the document.
///
/// Keys keep their first-seen order, which makes the body style tie-break
/// deterministic: among equally frequent styles the one encountered first
/// wins.
#[derive(Debug, Clone, Default)]
pub struct StyleProfile {
    counts: IndexMap<StyleKey, usize>,
}

impl StyleProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally every span of `spans`.
    pub fn from_spans<'a, I>(spans: I) -> Self
    where
        I: IntoIterator<Item = &'a TextSpan>,
    {
        let mut profile = Self::new();
        for span in spans {
            profile.add(span);
        }
        profile
    }

    /// Add a span observation.
    pub fn add(&mut self, span: &TextSpan) {
        self.add_key(span.style_key());
    }

    pub fn add_key(&mut self, key: StyleKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    /// The most frequent style, or `None` if nothing was tallied.
    pub fn body_style(&self) -> Option<StyleKey> {
        let mut best: Option<(StyleKey, usize)> = None;
        for (key, &count) in &self.counts {
            // Strictly greater keeps the earliest key on ties.
            if best.map_or(true, |(_, max)| count > max) {
                best = Some((*key, count));
            }
        }
        best.map(|(key, _)| key)
    }

    /// Occurrences of one style.
    pub fn count(&self, key: StyleKey) -> usize {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of spans tallied.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Styles with their counts, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleKey, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }
}
