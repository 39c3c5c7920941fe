//! Document-wide statistics for normalizing per-line decisions.
//!
//! ## Key Insight
//!
//! A single page says little about what is "normal" in a document. A 14pt
//! line is a heading in a 10pt report and body text in a large-print flyer;
//! a phrase at the very top of one page is a title, at the very top of every
//! page it is a running header. This module makes one pass over all pages and
//! records:
//!
//! - baseline typography: font size (mode), line height and paragraph
//!   spacing (medians), left/right margins (mode)
//! - for every distinct text value, where it occurred on which page in which
//!   font ([`TextPositionHistory`]), with adaptive position clusters
//!
//! The result is immutable; the header/footer detector and the classifier
//! only read it.

use crate::config::ExtractorConfig;
use crate::geometry::stats::{mean, median, mode_rounded};
use crate::geometry::AdaptiveClusterer;
use crate::layout::word::{Page, PositionedWord};
use crate::utils::safe_float_cmp;
use indexmap::IndexMap;
use std::hash::{Hash, Hasher};

/// Vertical gap, as a fraction of page height, separating paragraphs from lines.
const PARAGRAPH_GAP_RATIO: f64 = 0.02;

/// Font signature: name plus size.
///
/// Sizes compare bit-exactly; two renderings that differ by a rounding error
/// are different signatures.
#[derive(Debug, Clone)]
pub struct FontKey {
    /// Font name as reported by the source
    pub name: String,
    /// Font size in points
    pub size: f64,
}

impl FontKey {
    /// Signature of a word's font.
    pub fn of(word: &PositionedWord) -> Self {
        Self {
            name: word.font_name.clone(),
            size: word.font_size,
        }
    }
}

impl PartialEq for FontKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.size.to_bits() == other.size.to_bits()
    }
}

impl Eq for FontKey {}

impl Hash for FontKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
    }
}

/// Typical typography of a document.
///
/// A field is `None` when its sample set was empty; consumers then fall back
/// to absolute thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BaselineMetrics {
    /// Most common font size, rounded to 0.5pt
    pub font_size: Option<f64>,
    /// Median gap between consecutive lines of a paragraph
    pub line_height: Option<f64>,
    /// Median gap between paragraphs
    pub paragraph_spacing: Option<f64>,
    /// Most common left margin, rounded to 0.5pt
    pub left_margin: Option<f64>,
    /// Most common right margin, rounded to 0.5pt
    pub right_margin: Option<f64>,
}

impl BaselineMetrics {
    /// Compute the baseline from raw samples.
    pub fn from_samples(
        font_sizes: &[f64],
        line_heights: &[f64],
        paragraph_spacings: &[f64],
        left_margins: &[f64],
        right_margins: &[f64],
    ) -> Self {
        Self {
            font_size: mode_rounded(font_sizes),
            line_height: median(line_heights),
            paragraph_spacing: median(paragraph_spacings),
            left_margin: mode_rounded(left_margins),
            right_margin: mode_rounded(right_margins),
        }
    }
}

/// One occurrence of a text value.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord {
    /// `top / page_height`
    pub relative_top: f64,
    /// 1-based page index
    pub page_index: usize,
    /// Font signature of the occurrence
    pub font: FontKey,
    /// Adaptive position cluster, if the occurrence belongs to one
    pub cluster_id: Option<usize>,
}

/// Occurrences of every distinct text value, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TextPositionHistory {
    entries: IndexMap<String, Vec<PositionRecord>>,
}

impl TextPositionHistory {
    /// Occurrences of `text`, if it was seen.
    pub fn get(&self, text: &str) -> Option<&[PositionRecord]> {
        self.entries.get(text).map(Vec::as_slice)
    }

    /// Iterate over `(text, occurrences)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PositionRecord])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct text values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no text was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything learned from one pass over a document.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalysis {
    /// Total pages, including skipped ones
    pub page_count: usize,
    /// `(width, height)` per page, in document order
    pub page_dimensions: Vec<(f64, f64)>,
    /// Baseline typography
    pub baseline: BaselineMetrics,
    /// Occurrence count per font signature, in first-seen order
    pub font_usage: IndexMap<FontKey, usize>,
    /// Position history for repetition analysis
    pub history: TextPositionHistory,
}

/// Single-pass analyzer producing a [`DocumentAnalysis`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentAnalyzer {
    config: ExtractorConfig,
}

impl DocumentAnalyzer {
    /// Create an analyzer with the given thresholds.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Analyze all pages.
    ///
    /// Degenerate pages (no words, non-positive size) are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::layout::{DocumentAnalyzer, Page, PositionedWord};
    /// use pdf_textflow::ExtractorConfig;
    ///
    /// let words = vec![
    ///     PositionedWord::new("Hello", 100.0, 112.0, 72.0, 110.0).with_font("Times", 12.0),
    ///     PositionedWord::new("world", 114.0, 126.0, 72.0, 110.0).with_font("Times", 12.0),
    /// ];
    /// let pages = vec![Page::new(1, 612.0, 792.0, words)];
    /// let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&pages);
    ///
    /// assert_eq!(analysis.baseline.font_size, Some(12.0));
    /// assert_eq!(analysis.baseline.line_height, Some(2.0));
    /// assert_eq!(analysis.baseline.left_margin, Some(72.0));
    /// ```
    pub fn analyze(&self, pages: &[Page]) -> DocumentAnalysis {
        let mut font_sizes = Vec::new();
        let mut line_heights = Vec::new();
        let mut paragraph_spacings = Vec::new();
        let mut left_margins = Vec::new();
        let mut right_margins = Vec::new();
        let mut font_usage: IndexMap<FontKey, usize> = IndexMap::new();
        let mut entries: IndexMap<String, Vec<PositionRecord>> = IndexMap::new();
        let mut page_heights = Vec::new();

        for page in pages {
            if page.height > 0.0 {
                page_heights.push(page.height);
            }
            if page.is_degenerate() {
                log::debug!("Skipping page {} in document analysis (no usable words)", page.index);
                continue;
            }

            if let Some(extent) = page.text_extent() {
                left_margins.push(extent.left);
                right_margins.push(page.width - extent.right);
            }

            Self::collect_gaps(page, &mut line_heights, &mut paragraph_spacings);

            for word in &page.words {
                if word.font_size > 0.0 {
                    font_sizes.push(word.font_size);
                }
                let font = FontKey::of(word);
                *font_usage.entry(font.clone()).or_insert(0) += 1;
                entries.entry(word.text.clone()).or_default().push(PositionRecord {
                    relative_top: word.bbox().relative_top(page.height),
                    page_index: page.index,
                    font,
                    cluster_id: None,
                });
            }
        }

        let avg_page_height = mean(&page_heights).unwrap_or(0.0);
        self.assign_clusters(&mut entries, avg_page_height);

        let baseline = BaselineMetrics::from_samples(
            &font_sizes,
            &line_heights,
            &paragraph_spacings,
            &left_margins,
            &right_margins,
        );
        log::debug!(
            "Baseline: font_size={:?} line_height={:?} paragraph_spacing={:?} margins=({:?}, {:?})",
            baseline.font_size,
            baseline.line_height,
            baseline.paragraph_spacing,
            baseline.left_margin,
            baseline.right_margin
        );

        DocumentAnalysis {
            page_count: pages.len(),
            page_dimensions: pages.iter().map(|p| (p.width, p.height)).collect(),
            baseline,
            font_usage,
            history: TextPositionHistory { entries },
        }
    }

    /// Walk words in `(top, left)` order and sort positive vertical gaps
    /// into line-height and paragraph-spacing samples.
    fn collect_gaps(page: &Page, line_heights: &mut Vec<f64>, paragraph_spacings: &mut Vec<f64>) {
        let mut sorted: Vec<&PositionedWord> = page.words.iter().collect();
        sorted.sort_by(|a, b| {
            safe_float_cmp(a.top, b.top).then_with(|| safe_float_cmp(a.left, b.left))
        });

        let paragraph_gap = page.height * PARAGRAPH_GAP_RATIO;
        let mut prev_bottom: Option<f64> = None;
        for word in sorted {
            if let Some(bottom) = prev_bottom {
                let gap = word.top - bottom;
                if gap > 0.0 {
                    if gap > paragraph_gap {
                        paragraph_spacings.push(gap);
                    } else {
                        line_heights.push(gap);
                    }
                }
            }
            prev_bottom = Some(word.bottom);
        }
    }

    /// Tag each occurrence with the first surviving cluster whose mean is
    /// within the clustering threshold of it.
    fn assign_clusters(&self, entries: &mut IndexMap<String, Vec<PositionRecord>>, avg_page_height: f64) {
        let clusterer = AdaptiveClusterer::new(
            self.config.clustering_threshold,
            avg_page_height,
            self.config.min_cluster_size,
        );

        for records in entries.values_mut() {
            let tops: Vec<f64> = records.iter().map(|r| r.relative_top).collect();
            let cluster_means: Vec<f64> = clusterer
                .cluster(&tops)
                .iter()
                .filter_map(|c| mean(c))
                .collect();

            for record in records.iter_mut() {
                record.cluster_id = cluster_means
                    .iter()
                    .position(|m| (record.relative_top - m).abs() < self.config.clustering_threshold);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, top: f64, left: f64, size: f64) -> PositionedWord {
        PositionedWord::new(text, top, top + size, left, left + text.len() as f64 * size * 0.5)
            .with_font("Times", size)
    }

    fn page(index: usize, words: Vec<PositionedWord>) -> Page {
        Page::new(index, 600.0, 800.0, words)
    }

    #[test]
    fn test_empty_document_has_no_baseline() {
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&[]);
        assert_eq!(analysis.baseline, BaselineMetrics::default());
        assert!(analysis.history.is_empty());
        assert_eq!(analysis.page_count, 0);
    }

    #[test]
    fn test_degenerate_pages_skipped() {
        let pages = vec![
            page(1, vec![]),
            Page::new(2, 600.0, 0.0, vec![word("x", 10.0, 10.0, 10.0)]),
            page(3, vec![word("body", 100.0, 72.0, 10.0)]),
        ];
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&pages);
        assert_eq!(analysis.page_count, 3);
        assert_eq!(analysis.page_dimensions.len(), 3);
        assert_eq!(analysis.history.len(), 1);
        assert_eq!(analysis.history.get("body").unwrap()[0].page_index, 3);
    }

    #[test]
    fn test_line_and_paragraph_gaps() {
        // 800pt page: paragraph threshold is 16pt
        let words = vec![
            word("a", 100.0, 72.0, 10.0), // bottom 110
            word("b", 112.0, 72.0, 10.0), // gap 2  -> line
            word("c", 124.0, 72.0, 10.0), // gap 2  -> line
            word("d", 164.0, 72.0, 10.0), // gap 30 -> paragraph
        ];
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&[page(1, words)]);
        assert_eq!(analysis.baseline.line_height, Some(2.0));
        assert_eq!(analysis.baseline.paragraph_spacing, Some(30.0));
    }

    #[test]
    fn test_font_size_mode_is_rounded() {
        let words = vec![
            word("a", 100.0, 72.0, 11.9),
            word("b", 120.0, 72.0, 12.1),
            word("c", 140.0, 72.0, 18.0),
        ];
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&[page(1, words)]);
        assert_eq!(analysis.baseline.font_size, Some(12.0));
    }

    #[test]
    fn test_margins_mode_across_pages() {
        let pages = vec![
            page(1, vec![word("a", 100.0, 72.0, 10.0)]),
            page(2, vec![word("b", 100.0, 72.2, 10.0)]),
            page(3, vec![word("c", 100.0, 90.0, 10.0)]),
        ];
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&pages);
        assert_eq!(analysis.baseline.left_margin, Some(72.0));
        assert!(analysis.baseline.right_margin.is_some());
    }

    #[test]
    fn test_history_records_relative_positions() {
        let pages = vec![
            page(1, vec![word("Title", 8.0, 72.0, 10.0)]),
            page(2, vec![word("Title", 8.0, 72.0, 10.0)]),
        ];
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&pages);
        let records = analysis.history.get("Title").unwrap();
        assert_eq!(records.len(), 2);
        assert!((records[0].relative_top - 0.01).abs() < 1e-12);
        assert_eq!(records[1].page_index, 2);
        assert_eq!(records[0].font, records[1].font);
        // Both occurrences form one cluster
        assert_eq!(records[0].cluster_id, Some(0));
        assert_eq!(records[1].cluster_id, Some(0));
    }

    #[test]
    fn test_singleton_has_no_cluster() {
        let pages = vec![page(1, vec![word("Once", 400.0, 72.0, 10.0)])];
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&pages);
        assert_eq!(analysis.history.get("Once").unwrap()[0].cluster_id, None);
    }

    #[test]
    fn test_font_usage_counts() {
        let pages = vec![page(
            1,
            vec![
                word("a", 100.0, 72.0, 10.0),
                word("b", 120.0, 72.0, 10.0),
                word("c", 140.0, 72.0, 14.0),
            ],
        )];
        let analysis = DocumentAnalyzer::new(ExtractorConfig::default()).analyze(&pages);
        let key = FontKey {
            name: "Times".into(),
            size: 10.0,
        };
        assert_eq!(analysis.font_usage.get(&key), Some(&2));
        assert_eq!(analysis.font_usage.len(), 2);
    }
}
