//! Running header and footer detection.
//!
//! Works purely on the [`TextPositionHistory`] built by the document
//! analyzer. Two independent rules are applied:
//!
//! - **Headers**: text repeated at the very top of the page in one font,
//!   with almost no positional variance.
//! - **Footers**: text repeated on a sufficient share of pages near the
//!   bottom, with stricter bounds for legal boilerplate and a pagination
//!   check for page-number shaped text.
//!
//! Headers win on overlap: the footer set never contains a header member.

use crate::config::ExtractorConfig;
use crate::geometry::stats::{mean, sample_std_dev};
use crate::layout::document_analyzer::{PositionRecord, TextPositionHistory};
use crate::text::patterns::{is_footer_boilerplate, is_page_number_shape};
use std::collections::BTreeSet;

/// Position variance bound shared by both rules.
const POSITION_VARIANCE_THRESHOLD: f64 = 0.015;

/// Headers must sit within this fraction of the header band.
const HEADER_BAND_FACTOR: f64 = 0.3;

/// Headers tolerate only this fraction of the variance bound.
const HEADER_VARIANCE_FACTOR: f64 = 0.25;

/// Variance bound for boilerplate footers.
const BOILERPLATE_VARIANCE_THRESHOLD: f64 = 0.008;

/// Boilerplate footers must sit below this relative top.
const BOILERPLATE_MIN_POSITION: f64 = 0.93;

/// Page-number footers must sit below this relative top.
const PAGE_NUMBER_MIN_POSITION: f64 = 0.95;

/// Allowed gap between consecutive pages carrying the same page number shape.
const MAX_PAGE_GAP: usize = 3;

/// Detected running elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFooterSets {
    /// Running headers
    pub headers: BTreeSet<String>,
    /// Running footers, disjoint from `headers`
    pub footers: BTreeSet<String>,
}

impl HeaderFooterSets {
    /// True if `text` is a header or footer member.
    pub fn contains(&self, text: &str) -> bool {
        self.headers.contains(text) || self.footers.contains(text)
    }

    /// Total number of detected running elements.
    pub fn len(&self) -> usize {
        self.headers.len() + self.footers.len()
    }

    /// True if nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.footers.is_empty()
    }

    /// Split into `(headers, footers)`.
    pub fn into_parts(self) -> (BTreeSet<String>, BTreeSet<String>) {
        (self.headers, self.footers)
    }
}

/// Header/footer detector over a position history.
#[derive(Debug, Clone, Copy)]
pub struct HeaderFooterDetector {
    config: ExtractorConfig,
}

impl HeaderFooterDetector {
    /// Create a detector with the given thresholds.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Run both rules and remove header members from the footer set.
    pub fn detect(&self, history: &TextPositionHistory, total_pages: usize) -> HeaderFooterSets {
        let headers = self.detect_headers(history);
        let mut footers = self.detect_footers(history, total_pages);
        footers.retain(|text| !headers.contains(text));

        log::debug!(
            "Detected {} running headers and {} running footers over {} pages",
            headers.len(),
            footers.len(),
            total_pages
        );

        HeaderFooterSets { headers, footers }
    }

    /// Text repeated at the very top of the page in a single font.
    pub fn detect_headers(&self, history: &TextPositionHistory) -> BTreeSet<String> {
        let max_mean = self.config.header_threshold * HEADER_BAND_FACTOR;
        let max_std = POSITION_VARIANCE_THRESHOLD * HEADER_VARIANCE_FACTOR;

        history
            .iter()
            .filter(|(_, records)| records.len() >= 2)
            .filter(|(_, records)| {
                let tops = relative_tops(records);
                let pos_mean = mean(&tops).unwrap_or(f64::INFINITY);
                let pos_std = sample_std_dev(&tops);
                pos_mean < max_mean && pos_std < max_std && single_font(records)
            })
            .map(|(text, _)| text.to_string())
            .collect()
    }

    /// Text repeated near the bottom of enough pages.
    pub fn detect_footers(&self, history: &TextPositionHistory, total_pages: usize) -> BTreeSet<String> {
        let min_count = self.config.min_repetition_ratio * total_pages as f64;
        let mut footers = BTreeSet::new();

        for (text, records) in history.iter() {
            if (records.len() as f64) < min_count || records.len() < 2 {
                continue;
            }

            let tops = relative_tops(records);
            let pos_mean = mean(&tops).unwrap_or(0.0);
            let pos_std = sample_std_dev(&tops);

            let page_number = is_page_number_shape(text);
            let boilerplate = is_footer_boilerplate(text);

            let (max_std, min_position) = if boilerplate {
                (BOILERPLATE_VARIANCE_THRESHOLD, BOILERPLATE_MIN_POSITION)
            } else if page_number {
                (POSITION_VARIANCE_THRESHOLD, PAGE_NUMBER_MIN_POSITION)
            } else {
                (POSITION_VARIANCE_THRESHOLD, self.config.footer_threshold)
            };

            if !(pos_mean > min_position && pos_std < max_std && single_font(records)) {
                continue;
            }

            if page_number {
                let mut pages: Vec<usize> = records.iter().map(|r| r.page_index).collect();
                pages.sort_unstable();
                if !validate_page_numbers(&pages) {
                    log::trace!("Rejecting page-number footer {:?}: pages {:?}", text, pages);
                    continue;
                }
            }

            footers.insert(text.to_string());
        }

        footers
    }
}

/// True if sorted page indices look like real pagination.
///
/// The sequence must be non-empty and every consecutive gap must lie in
/// `1..=3`, which rejects repeated digits that merely happen to line up.
///
/// # Examples
///
/// ```
/// use pdf_textflow::layout::validate_page_numbers;
///
/// assert!(validate_page_numbers(&[1, 2, 3, 4]));
/// assert!(validate_page_numbers(&[1, 2, 4, 5]));
/// assert!(!validate_page_numbers(&[1, 5, 10]));
/// assert!(!validate_page_numbers(&[]));
/// assert!(!validate_page_numbers(&[1, 1]));
/// ```
pub fn validate_page_numbers(pages: &[usize]) -> bool {
    !pages.is_empty()
        && pages
            .windows(2)
            .all(|w| w[1] > w[0] && w[1] - w[0] <= MAX_PAGE_GAP)
}

fn relative_tops(records: &[PositionRecord]) -> Vec<f64> {
    records.iter().map(|r| r.relative_top).collect()
}

fn single_font(records: &[PositionRecord]) -> bool {
    match records.split_first() {
        Some((first, rest)) => rest.iter().all(|r| r.font == first.font),
        None => false,
    }
}
