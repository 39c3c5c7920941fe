//! Line grouping and style classification.
//!
//! Words on one page are sorted by `(top, left)` and chained into visual
//! lines. Each line gets its spacing to the next line, style flags derived
//! from font names and weights, and an optional heading level.

use crate::geometry::stats::mean;
use crate::layout::word::PositionedWord;
use crate::utils::safe_float_cmp;
use serde::Serialize;

/// Words whose top is within this many points of the line's first word
/// belong to the same line.
pub const SAME_LINE_TOLERANCE: f64 = 3.0;

/// Numeric weight at and above which a word counts as bold.
pub const BOLD_WEIGHT: u16 = 700;

/// List items start right of this fraction of the page width.
const LIST_INDENT_RATIO: f64 = 0.1;

/// List items have fewer words than this.
const LIST_MAX_WORDS: usize = 20;

const BOLD_INDICATORS: &[&str] = &["bold", "heavy", "black", "extra", "demi"];
const ITALIC_INDICATORS: &[&str] = &["italic", "oblique", "slanted"];
const DECORATIVE_INDICATORS: &[&str] = &["underline", "strikethrough", "strike"];

/// Style of a single word, inferred from its font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontStyle {
    /// Bold by name or by weight
    pub bold: bool,
    /// Italic or oblique
    pub italic: bool,
    /// Underlined or struck through
    pub underline: bool,
    /// Numeric weight
    pub weight: u16,
}

/// Infer bold/italic/underline from the lower-cased font name and weight.
///
/// # Examples
///
/// ```
/// use pdf_textflow::layout::{analyze_font_style, PositionedWord};
///
/// let word = PositionedWord::new("x", 0.0, 10.0, 0.0, 5.0).with_font("Arial-BoldItalic", 10.0);
/// let style = analyze_font_style(&word);
/// assert!(style.bold);
/// assert!(style.italic);
/// assert!(!style.underline);
/// ```
pub fn analyze_font_style(word: &PositionedWord) -> FontStyle {
    let name = word.font_name.to_lowercase();
    let has_any = |indicators: &[&str]| indicators.iter().any(|i| name.contains(i));

    FontStyle {
        bold: has_any(BOLD_INDICATORS) || word.font_weight >= BOLD_WEIGHT,
        italic: has_any(ITALIC_INDICATORS),
        underline: has_any(DECORATIVE_INDICATORS),
        weight: word.font_weight,
    }
}

/// Heading level of a line, judged from its first word.
///
/// An explicit `heading1`..`heading3` token in the font name wins. Otherwise
/// a bold font named `black`, `extra` or `heavy` maps to levels 1, 2 and 3,
/// and any other bold font to level 4.
///
/// # Examples
///
/// ```
/// use pdf_textflow::layout::{determine_heading_level, PositionedWord};
///
/// let word = |font: &str| PositionedWord::new("x", 0.0, 10.0, 0.0, 5.0).with_font(font, 10.0);
/// assert_eq!(determine_heading_level(&[word("Heading2")]), Some(2));
/// assert_eq!(determine_heading_level(&[word("Arial-Black")]), Some(1));
/// assert_eq!(determine_heading_level(&[word("Arial-Bold")]), Some(4));
/// assert_eq!(determine_heading_level(&[word("Arial")]), None);
/// assert_eq!(determine_heading_level(&[]), None);
/// ```
pub fn determine_heading_level(words: &[PositionedWord]) -> Option<u8> {
    let first = words.first()?;
    let style = analyze_font_style(first);
    let name = first.font_name.to_lowercase();

    for (level, token) in [(1, "heading1"), (2, "heading2"), (3, "heading3")] {
        if name.contains(token) {
            return Some(level);
        }
    }

    if !style.bold {
        return None;
    }

    let level = if name.contains("black") {
        1
    } else if name.contains("extra") {
        2
    } else if name.contains("heavy") {
        3
    } else {
        4
    };
    Some(level)
}

/// True if a line looks like a list item.
///
/// The line must be indented past 10% of the page width, shorter than 20
/// words and non-blank.
///
/// # Examples
///
/// ```
/// use pdf_textflow::layout::is_list_item;
///
/// assert!(is_list_item("First point", 100.0, 600.0));
/// assert!(!is_list_item("First point", 10.0, 600.0));
/// assert!(!is_list_item("   ", 100.0, 600.0));
/// ```
pub fn is_list_item(text: &str, left: f64, page_width: f64) -> bool {
    left > page_width * LIST_INDENT_RATIO
        && text.split_whitespace().count() < LIST_MAX_WORDS
        && !text.trim().is_empty()
}

/// One visual line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGroup {
    /// Words in `(top, left)` order
    pub words: Vec<PositionedWord>,
    /// Top of the line's first word
    pub top: f64,
    /// Gap to the next line, 0 for the last line on the page
    pub spacing_after: f64,
    /// Heading level 1..=4
    pub heading_level: Option<u8>,
    /// Every word is bold
    pub bold: bool,
    /// Every word is italic
    pub italic: bool,
    /// Every word is underlined or struck through
    pub underline: bool,
    /// Mean font size of the words
    pub font_size: f64,
}

impl LineGroup {
    fn from_words(words: Vec<PositionedWord>, spacing_after: f64) -> Self {
        let styles: Vec<FontStyle> = words.iter().map(analyze_font_style).collect();
        let sizes: Vec<f64> = words.iter().map(|w| w.font_size).collect();

        Self {
            top: words.first().map_or(0.0, |w| w.top),
            heading_level: determine_heading_level(&words),
            bold: !styles.is_empty() && styles.iter().all(|s| s.bold),
            italic: !styles.is_empty() && styles.iter().all(|s| s.italic),
            underline: !styles.is_empty() && styles.iter().all(|s| s.underline),
            font_size: mean(&sizes).unwrap_or(0.0),
            spacing_after,
            words,
        }
    }

    /// Word texts joined by single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Left edge of the first word.
    pub fn left(&self) -> f64 {
        self.words.first().map_or(0.0, |w| w.left)
    }

    /// Heaviest weight on the line.
    pub fn max_weight(&self) -> u16 {
        self.words.iter().map(|w| w.font_weight).max().unwrap_or(0)
    }
}

/// Group one page's words into visual lines.
///
/// A word joins the current line while its top is within
/// [`SAME_LINE_TOLERANCE`] of the line's first word. The spacing of a closed
/// line is measured from the bottom of its first word to the top of the word
/// that opened the next line.
///
/// # Examples
///
/// ```
/// use pdf_textflow::layout::{group_lines, PositionedWord};
///
/// let words = vec![
///     PositionedWord::new("world", 101.0, 111.0, 120.0, 150.0),
///     PositionedWord::new("Hello", 100.0, 110.0, 72.0, 110.0),
///     PositionedWord::new("Next", 130.0, 140.0, 72.0, 100.0),
/// ];
/// let lines = group_lines(&words);
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[0].text(), "Hello world");
/// assert_eq!(lines[0].spacing_after, 20.0);
/// assert_eq!(lines[1].spacing_after, 0.0);
/// ```
pub fn group_lines(words: &[PositionedWord]) -> Vec<LineGroup> {
    let mut sorted: Vec<&PositionedWord> = words.iter().collect();
    sorted.sort_by(|a, b| safe_float_cmp(a.top, b.top).then_with(|| safe_float_cmp(a.left, b.left)));

    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut current = vec![first.clone()];
    let mut line_top = first.top;
    let mut last_bottom = first.bottom;

    for word in iter {
        if (word.top - line_top).abs() <= SAME_LINE_TOLERANCE {
            current.push(word.clone());
            continue;
        }

        let spacing = word.top - last_bottom;
        lines.push(LineGroup::from_words(std::mem::take(&mut current), spacing));
        current.push(word.clone());
        line_top = word.top;
        last_bottom = word.bottom;
    }

    lines.push(LineGroup::from_words(current, 0.0));
    lines
}
