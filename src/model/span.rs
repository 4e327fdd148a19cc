//! Positioned text spans and their style keys.

use serde::{Deserialize, Serialize};

use super::Rect;

/// Font style used as the frequency-tally key for body text detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleKey {
    /// Font size rounded to whole points
    pub size: u32,
    /// Whether the font is bold
    pub bold: bool,
}

impl StyleKey {
    pub fn new(size: u32, bold: bool) -> Self {
        Self { size, bold }
    }
}

impl std::fmt::Display for StyleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.bold {
            write!(f, "{}pt bold", self.size)
        } else {
            write!(f, "{}pt", self.size)
        }
    }
}

/// Round a font size to whole points, half to even.
pub fn round_font_size(size: f32) -> u32 {
    size.abs().round_ties_even() as u32
}

/// A run of text sharing one font and size on a single line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The text content
    pub text: String,
    /// Page index (0-based)
    pub page: usize,
    /// Bounding box in top-down page space
    pub bbox: Rect,
    /// Effective font size in points
    pub font_size: f32,
    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font appears to be bold
    pub is_bold: bool,
}

impl TextSpan {
    /// Create a new text span.
    pub fn new(
        text: impl Into<String>,
        page: usize,
        bbox: Rect,
        font_size: f32,
        font_name: impl Into<String>,
        is_bold: bool,
    ) -> Self {
        Self {
            text: text.into(),
            page,
            bbox,
            font_size,
            font_name: font_name.into(),
            is_bold,
        }
    }

    /// Top edge of the span.
    pub fn top(&self) -> f32 {
        self.bbox.y0
    }

    /// Font size rounded to whole points.
    pub fn rounded_size(&self) -> u32 {
        round_font_size(self.font_size)
    }

    pub fn style_key(&self) -> StyleKey {
        StyleKey::new(self.rounded_size(), self.is_bold)
    }

    /// Portion of the text whose glyphs fall inside `clip`.
    ///
    /// The span must overlap the clip by at least half its height. Glyph
    /// positions are estimated by spreading the box width evenly across the
    /// characters; a character is kept when its center lies inside the clip.
    pub fn clip(&self, clip: &Rect) -> Option<String> {
        let height = self.bbox.height();
        if height <= 0.0 || self.bbox.vertical_overlap(clip) < height * 0.5 {
            return None;
        }

        let count = self.text.chars().count();
        if count == 0 {
            return None;
        }
        let advance = self.bbox.width() / count as f32;

        let kept: String = self
            .text
            .chars()
            .enumerate()
            .filter(|(i, _)| clip.contains_x(self.bbox.x0 + advance * (*i as f32 + 0.5)))
            .map(|(_, c)| c)
            .collect();

        if kept.is_empty() {
            None
        } else {
            Some(kept)
        }
    }
}
