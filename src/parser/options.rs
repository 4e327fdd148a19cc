//! Extraction options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options controlling one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// How headings are detected
    pub heading_strategy: HeadingStrategy,

    /// Pages that contribute annotations (1-indexed)
    pub pages: PageSelection,

    /// Same-text headings on one page closer than this are duplicates
    pub dedup_tolerance: f32,

    /// Heading candidates starting with one of these (case-insensitive)
    /// are treated as captions and dropped
    pub caption_prefixes: Vec<String>,
}

impl ExtractOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages whose content cannot be read).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the heading detection strategy.
    pub fn with_heading_strategy(mut self, strategy: HeadingStrategy) -> Self {
        self.heading_strategy = strategy;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the duplicate heading distance.
    pub fn with_dedup_tolerance(mut self, tolerance: f32) -> Self {
        self.dedup_tolerance = tolerance.max(0.0);
        self
    }

    /// Replace the caption prefixes.
    pub fn with_caption_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.caption_prefixes = prefixes
            .into_iter()
            .map(|p| p.into().to_lowercase())
            .collect();
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            heading_strategy: HeadingStrategy::Auto,
            pages: PageSelection::All,
            dedup_tolerance: 10.0,
            caption_prefixes: vec!["figure".to_string()],
        }
    }
}

/// Error handling mode for per-page failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first unreadable page
    #[default]
    Strict,
    /// Log and skip unreadable pages
    Lenient,
}

/// How the heading list is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStrategy {
    /// Use the outline when the document declares one, else the style heuristic
    #[default]
    Auto,
    /// Outline only
    Outline,
    /// Style heuristic only
    Style,
}

/// Page selection (1-indexed).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive)
    Range(RangeInclusive<u32>),
    /// Specific pages
    Pages(Vec<u32>),
    /// A list mixing pages and ranges, kept sorted and merged
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number (1-indexed) is included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Check a 0-based page index.
    pub fn includes_index(&self, index: usize) -> bool {
        u32::try_from(index + 1).map_or(false, |page| self.includes(page))
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5-7", "all").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut ranges = Vec::new();
        let mut has_range = false;
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = (parse_page(start)?, parse_page(end)?);
                if start > end {
                    return Err(Error::InvalidPageRange(part.to_string()));
                }
                has_range = true;
                ranges.push(start..=end);
            } else {
                let page = parse_page(part)?;
                ranges.push(page..=page);
            }
        }

        ranges.sort_unstable_by_key(|r| (*r.start(), *r.end()));
        if !has_range {
            let mut pages: Vec<u32> = ranges.iter().map(|r| *r.start()).collect();
            pages.dedup();
            return Ok(PageSelection::Pages(pages));
        }
        Ok(PageSelection::Ranges(merge_ranges(ranges)))
    }
}

/// Merge sorted ranges that overlap or touch.
fn merge_ranges(sorted: Vec<RangeInclusive<u32>>) -> Vec<RangeInclusive<u32>> {
    let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(sorted.len());
    for range in sorted {
        match merged.last_mut() {
            Some(last) if *range.start() <= last.end().saturating_add(1) => {
                let end = (*last.end()).max(*range.end());
                *last = *last.start()..=end;
            }
            _ => merged.push(range),
        }
    }
    merged
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(s.trim().to_string())),
        Ok(page) => Ok(page),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .lenient()
            .with_heading_strategy(HeadingStrategy::Style)
            .with_dedup_tolerance(4.0)
            .with_caption_prefixes(["Figure", "Table"]);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.heading_strategy, HeadingStrategy::Style);
        assert_eq!(options.dedup_tolerance, 4.0);
        assert_eq!(options.caption_prefixes, vec!["figure", "table"]);
    }

    #[test]
    fn test_defaults() {
        let options = ExtractOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.heading_strategy, HeadingStrategy::Auto);
        assert_eq!(options.dedup_tolerance, 10.0);
        assert_eq!(options.caption_prefixes, vec!["figure"]);
    }

    #[test]
    fn test_page_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1));
        assert!(all.includes_index(99));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes_index(10));
        assert!(range.includes_index(4));

        let pages = PageSelection::Pages(vec![1, 3]);
        assert!(pages.includes_index(0));
        assert!(!pages.includes_index(1));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("2-4").unwrap(),
            PageSelection::Range(2..=4)
        );
        assert_eq!(
            PageSelection::parse("7,1,3,1").unwrap(),
            PageSelection::Pages(vec![1, 3, 7])
        );
        assert_eq!(
            PageSelection::parse("7,1,3-5,3,6").unwrap(),
            PageSelection::Ranges(vec![1..=1, 3..=7])
        );
    }

    #[test]
    fn test_wide_ranges_stay_ranges() {
        let pages = PageSelection::parse("1,2-4000000000").unwrap();
        assert_eq!(pages, PageSelection::Ranges(vec![1..=4000000000]));
        assert!(pages.includes(3_999_999_999));
        assert!(!pages.includes(4_000_000_001));
        assert!(pages.includes_index(0));
    }

    #[test]
    fn test_page_selection_parse_errors() {
        assert!(matches!(
            PageSelection::parse("0"),
            Err(Error::InvalidPageRange(_))
        ));
        assert!(matches!(
            PageSelection::parse("5-2"),
            Err(Error::InvalidPageRange(_))
        ));
        assert!(matches!(
            PageSelection::parse("one"),
            Err(Error::InvalidPageRange(_))
        ));
    }
}
