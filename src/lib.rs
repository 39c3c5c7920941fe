// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # pdf_textflow
//!
//! Layout-aware text extraction for PDF documents.
//!
//! Given positioned words per page (text, bounding box, font name, size and
//! weight), the library reconstructs reading-order paragraphs, classifies
//! lines as headings, list items or body text, and removes running headers,
//! footers and page numbers, using only geometric and typographic signals.
//!
//! ## Pipeline
//!
//! - **Document analysis**: baseline font size, line height, paragraph
//!   spacing and margins, plus a position history for every distinct text
//! - **Header/footer detection**: repetition, positional variance and font
//!   uniformity, with pattern-based rules for page numbers and boilerplate
//! - **Line classification**: grouping words into lines, style flags,
//!   heading levels, list items
//! - **Orchestration**: suppression, paragraph merging, structured nodes
//! - **Formatting**: pluggable [`converters::Formatter`], HTML by default
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_textflow::{ExtractorConfig, PdfTextExtractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = PdfTextExtractor::open("report.pdf", ExtractorConfig::default())?;
//!
//! for line in extractor.extract_lines(false) {
//!     println!("{}", line);
//! }
//!
//! let html = extractor.extract_html_default(false)?;
//! # Ok(())
//! # }
//! ```
//!
//! Pages can also be supplied directly, bypassing PDF decoding:
//!
//! ```
//! use pdf_textflow::layout::{Page, PositionedWord};
//! use pdf_textflow::{ExtractorConfig, PdfTextExtractor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let words = vec![PositionedWord::new("Hello", 100.0, 112.0, 72.0, 110.0)];
//! let extractor = PdfTextExtractor::from_pages(
//!     vec![Page::new(1, 612.0, 792.0, words)],
//!     ExtractorConfig::default(),
//! )?;
//! assert_eq!(extractor.extract_lines(false), vec!["Hello", ""]);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry and statistics
pub mod geometry;

// Text cleaning and pattern sets
pub mod text;

// Layout analysis
pub mod layout;

// Extraction orchestration
pub mod extractor;

// Output formatters
pub mod converters;

// Page sources
pub mod source;

// Re-exports
pub use config::ExtractorConfig;
pub use converters::{FormatOptions, Formatter, HtmlFormatter};
pub use error::{Error, Result};
pub use extractor::nodes::{ExtractedNode, ListItem, NodeKind};
pub use extractor::{ExtractionState, PdfTextExtractor};
pub use layout::{DocumentAnalysis, Page, PositionedWord};
pub use source::{LopdfPageSource, PageSource};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Safely compare two floating point numbers, handling NaN cases.
    ///
    /// NaN values are treated as equal to each other and greater than all other values.
    /// This ensures that sorting operations never panic due to NaN comparisons.
    pub fn safe_float_cmp(a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater, // NaN > all numbers
            (false, true) => Ordering::Less,    // all numbers < NaN
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
