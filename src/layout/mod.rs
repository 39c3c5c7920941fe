//! Layout analysis over positioned words.
//!
//! This module provides the document-level and line-level inference steps:
//! - Document metrics (baseline typography, position histories)
//! - Running header/footer detection
//! - Line grouping, style and heading classification, list detection

pub mod document_analyzer;
pub mod header_footer;
pub mod line_classifier;
pub mod word;

// Re-export main types
pub use document_analyzer::{
    BaselineMetrics, DocumentAnalysis, DocumentAnalyzer, FontKey, PositionRecord,
    TextPositionHistory,
};
pub use header_footer::{validate_page_numbers, HeaderFooterDetector, HeaderFooterSets};
pub use line_classifier::{
    analyze_font_style, determine_heading_level, group_lines, is_list_item, FontStyle, LineGroup,
};
pub use word::{Page, PositionedWord, DEFAULT_FONT_WEIGHT};
