//! Fixed pattern sets for page numbers and footer boilerplate.
//!
//! The sets are compiled once per process and shared read-only by every
//! extractor, so no per-line compilation happens during extraction.

use lazy_static::lazy_static;
use regex::{Regex, RegexSet};

/// Page-number shapes, matched case-insensitively from the start of the line.
pub const PAGE_NUMBER_PATTERNS: &[&str] = &[
    r"(?i)^\d+$",
    r"(?i)^Page\s+\d+$",
    r"(?i)^\d+\s+of\s+\d+$",
    r"(?i)^-\s*\d+\s*-$",
    // [42]
    r"(?i)^\[\s*\d+\s*\]$",
    // p. 42
    r"(?i)^p\.\s*\d+$",
    r"(?i)^.*Page\s+\d+\s+of\s+\d+.*$",
    r"(?i)^.*Printed\s+on\s+\d{2}-\d{2}-\d{4}\s+Page\s+\d+\s+of\s+\d+.*$",
    r"(?i)^.*\bpage\s+\d+\b.*$",
];

/// Footer boilerplate, searched case-insensitively anywhere in the line.
pub const FOOTER_PATTERNS: &[&str] = &[
    r"(?i)Copyright\s*©?\s*\d{4}",
    r"(?i)©\s*\d{4}",
    r"(?i)\bAll\s+Rights\s+Reserved\b",
    r"(?i)\bConfidential\b",
    r"(?i)\bDraft\s+Version\b",
    r"(?i)\bRev(?:ision)?\.?\s*\d+",
    r"(?i)\d{1,2}[-/.]\d{1,2}[-/.]\d{2,4}\b",
    r"(?i)\bProprietary\b",
    r"(?i)\bCopyright\b.*\d{4}",
    r"(?i)\bRestricted\b",
    r"(?i)\bInternal\s+Use\s+Only\b",
];

lazy_static! {
    static ref RE_PAGE_NUMBERS: RegexSet = RegexSet::new(PAGE_NUMBER_PATTERNS).unwrap();

    static ref RE_FOOTERS: RegexSet = RegexSet::new(FOOTER_PATTERNS).unwrap();

    /// Narrow page-number shape used by footer detection (case-sensitive)
    static ref RE_PAGE_NUMBER_SHAPE: Regex =
        Regex::new(r"^\d+$|^Page\s+\d+$|^\d+\s+of\s+\d+$").unwrap();
}

/// True if the line looks like a page number or page counter.
///
/// # Examples
///
/// ```
/// use pdf_textflow::text::patterns::is_page_number;
///
/// assert!(is_page_number("12"));
/// assert!(is_page_number("Page 3 of 10"));
/// assert!(is_page_number("- 4 -"));
/// assert!(!is_page_number("Chapter one"));
/// ```
pub fn is_page_number(text: &str) -> bool {
    RE_PAGE_NUMBERS.is_match(text)
}

/// True if the line contains legal or revision boilerplate typical of footers.
///
/// # Examples
///
/// ```
/// use pdf_textflow::text::patterns::is_footer_boilerplate;
///
/// assert!(is_footer_boilerplate("© 2024 Acme Corp"));
/// assert!(is_footer_boilerplate("For internal use only"));
/// assert!(!is_footer_boilerplate("Quarterly revenue grew"));
/// ```
pub fn is_footer_boilerplate(text: &str) -> bool {
    RE_FOOTERS.is_match(text)
}

/// True for the strict page-number shapes: `N`, `Page N`, `N of M`.
pub fn is_page_number_shape(text: &str) -> bool {
    RE_PAGE_NUMBER_SHAPE.is_match(text)
}
