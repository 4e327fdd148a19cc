//! Heading resolution for annotation positions.

use crate::model::{Heading, NO_HEADING_LEVEL, NO_HEADING_TEXT};

/// How a position was attributed to a heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// The nearest heading above the position on the same page
    SamePage(&'a Heading),
    /// No heading above on the page; the last heading of an earlier page
    EarlierPage(&'a Heading),
    /// Nothing precedes the position
    Unassigned,
}

impl<'a> Resolution<'a> {
    pub fn heading(&self) -> Option<&'a Heading> {
        match *self {
            Resolution::SamePage(h) | Resolution::EarlierPage(h) => Some(h),
            Resolution::Unassigned => None,
        }
    }

    /// Heading text, or the sentinel text.
    pub fn text(&self) -> &'a str {
        self.heading().map_or(NO_HEADING_TEXT, |h| h.text.as_str())
    }

    /// Heading level, or the sentinel level.
    pub fn level(&self) -> u32 {
        self.heading().map_or(NO_HEADING_LEVEL, |h| h.level)
    }
}

/// Predecessor lookup over a `(page, y)`-sorted heading list.
#[derive(Debug, Clone, Copy)]
pub struct HeadingIndex<'a> {
    headings: &'a [Heading],
}

impl<'a> HeadingIndex<'a> {
    /// `headings` must be sorted by [`Heading::position_cmp`].
    pub fn new(headings: &'a [Heading]) -> Self {
        debug_assert!(headings
            .windows(2)
            .all(|w| w[0].position_cmp(&w[1]).is_le()));
        Self { headings }
    }

    /// Resolve the heading governing `(page, y)`.
    ///
    /// The governing heading is the last one strictly above the position in
    /// document order: on the same page it must satisfy `h.y < y`, and any
    /// heading on an earlier page precedes. A heading level with the
    /// position does not govern it.
    pub fn resolve(&self, page: usize, y: f32) -> Resolution<'a> {
        let end = self.headings.partition_point(|h| h.precedes(page, y));
        match end.checked_sub(1).map(|i| &self.headings[i]) {
            Some(h) if h.page == page => Resolution::SamePage(h),
            Some(h) => Resolution::EarlierPage(h),
            None => Resolution::Unassigned,
        }
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}
