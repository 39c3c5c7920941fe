//! Input records: positioned words grouped by page.
//!
//! Page sources produce these; everything downstream only reads them.

use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};

/// Weight assumed when the source does not report one.
pub const DEFAULT_FONT_WEIGHT: u16 = 400;

/// A word (or blank-joined run of words) with its box and font.
///
/// Font fields are optional in practice: an empty `font_name` and a zero
/// `font_size` mean "unknown" and degrade classification to plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedWord {
    /// The text content
    pub text: String,
    /// Top edge, page-relative, y grows downwards
    pub top: f64,
    /// Bottom edge
    pub bottom: f64,
    /// Left edge
    pub left: f64,
    /// Right edge
    pub right: f64,
    /// Font name as reported by the source
    #[serde(default)]
    pub font_name: String,
    /// Font size in points
    #[serde(default)]
    pub font_size: f64,
    /// Numeric weight, 400 = normal, 700 = bold
    #[serde(default = "default_weight")]
    pub font_weight: u16,
}

fn default_weight() -> u16 {
    DEFAULT_FONT_WEIGHT
}

impl PositionedWord {
    /// Create a word with no font information.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::layout::PositionedWord;
    ///
    /// let word = PositionedWord::new("Hello", 100.0, 112.0, 72.0, 102.0);
    /// assert_eq!(word.font_weight, 400);
    /// assert!(word.font_name.is_empty());
    /// ```
    pub fn new(text: impl Into<String>, top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            text: text.into(),
            top,
            bottom,
            left,
            right,
            font_name: String::new(),
            font_size: 0.0,
            font_weight: DEFAULT_FONT_WEIGHT,
        }
    }

    /// Create a word from a bounding box.
    pub fn from_bbox(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self::new(text, bbox.top, bbox.bottom, bbox.left, bbox.right)
    }

    /// Set font name and size (builder pattern).
    pub fn with_font(mut self, name: impl Into<String>, size: f64) -> Self {
        self.font_name = name.into();
        self.font_size = size;
        self
    }

    /// Set the numeric weight (builder pattern).
    pub fn with_weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    /// The word's bounding box.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.left, self.top, self.right, self.bottom)
    }
}

/// One page of positioned words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page index
    pub index: usize,
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Words in source order
    pub words: Vec<PositionedWord>,
}

impl Page {
    /// Create a page.
    pub fn new(index: usize, width: f64, height: f64, words: Vec<PositionedWord>) -> Self {
        Self {
            index,
            width,
            height,
            words,
        }
    }

    /// True if the page cannot contribute to analysis.
    ///
    /// Pages without words or with a non-positive size are skipped, never fatal.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn is_degenerate(&self) -> bool {
        self.words.is_empty() || !(self.height > 0.0) || !(self.width > 0.0)
    }

    /// Box enclosing every word on the page.
    pub fn text_extent(&self) -> Option<BoundingBox> {
        self.words
            .iter()
            .map(PositionedWord::bbox)
            .reduce(|acc, b| acc.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_builders() {
        let word = PositionedWord::new("Title", 10.0, 30.0, 50.0, 150.0)
            .with_font("Helvetica-Bold", 20.0)
            .with_weight(700);
        assert_eq!(word.font_name, "Helvetica-Bold");
        assert_eq!(word.font_size, 20.0);
        assert_eq!(word.font_weight, 700);
        assert_eq!(word.bbox().width(), 100.0);
    }

    #[test]
    fn test_text_extent() {
        let page = Page::new(
            1,
            600.0,
            800.0,
            vec![
                PositionedWord::new("a", 100.0, 110.0, 72.0, 80.0),
                PositionedWord::new("b", 200.0, 210.0, 300.0, 520.0),
            ],
        );
        let extent = page.text_extent().unwrap();
        assert_eq!(extent.left, 72.0);
        assert_eq!(extent.right, 520.0);
        assert_eq!(extent.top, 100.0);
        assert_eq!(extent.bottom, 210.0);
    }

    #[test]
    fn test_degenerate_pages() {
        assert!(Page::new(1, 600.0, 800.0, vec![]).is_degenerate());
        let word = PositionedWord::new("x", 0.0, 1.0, 0.0, 1.0);
        assert!(Page::new(1, 600.0, 0.0, vec![word.clone()]).is_degenerate());
        assert!(!Page::new(1, 600.0, 800.0, vec![word]).is_degenerate());
    }

    #[test]
    fn test_word_json_defaults() {
        let word: PositionedWord = serde_json::from_str(
            r#"{"text":"x","top":1.0,"bottom":2.0,"left":3.0,"right":4.0}"#,
        )
        .unwrap();
        assert_eq!(word.font_weight, 400);
        assert_eq!(word.font_size, 0.0);
    }
}
