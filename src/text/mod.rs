//! Text normalization for extracted lines.
//!
//! Cleaning never introduces line breaks: it only replaces or collapses
//! characters within a single line.

pub mod patterns;

use lazy_static::lazy_static;
use regex::Regex;

pub use patterns::{is_footer_boilerplate, is_page_number, is_page_number_shape};

lazy_static! {
    /// Zero-width space, non-joiner, joiner and byte-order mark
    static ref RE_ZERO_WIDTH: Regex = Regex::new(r"[\u{200B}\u{200C}\u{200D}\u{FEFF}]").unwrap();

    /// Runs of spaces and tabs
    static ref RE_INLINE_WS: Regex = Regex::new(r"[ \t]+").unwrap();
}

/// Clean an extracted line.
///
/// - zero-width marks become spaces
/// - curly quotes become straight quotes, em-dashes become hyphens
/// - runs of spaces/tabs collapse to one space
/// - trailing whitespace is removed
///
/// # Examples
///
/// ```
/// use pdf_textflow::text::clean_text;
///
/// assert_eq!(clean_text("Hello\u{200b}World"), "Hello World");
/// assert_eq!(clean_text("Hello\u{2014}World"), "Hello-World");
/// assert_eq!(clean_text("Hello    World"), "Hello World");
/// assert_eq!(clean_text("Hello World   "), "Hello World");
/// ```
pub fn clean_text(text: &str) -> String {
    let text = RE_ZERO_WIDTH.replace_all(text, " ");
    let text: String = text
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{2014}' => '-',
            other => other,
        })
        .collect();
    let text = RE_INLINE_WS.replace_all(&text, " ");
    text.trim_end().to_string()
}
