//! Extraction orchestrator.
//!
//! [`PdfTextExtractor`] owns the decoded pages of one document and runs the
//! full pipeline on every call:
//!
//! 1. document analysis and header/footer detection (once per call)
//! 2. per page: line grouping and classification
//! 3. suppression of running elements, boilerplate and page numbers
//! 4. assembly into flat lines or structured nodes
//!
//! Every operation is a pure function of the owned pages and configuration,
//! so repeated calls return identical output and an extractor can be shared
//! across threads.

pub mod nodes;

use crate::config::ExtractorConfig;
use crate::converters::{FormatOptions, Formatter, HtmlFormatter};
use crate::error::Result;
use crate::layout::{
    group_lines, is_list_item, BaselineMetrics, DocumentAnalysis, DocumentAnalyzer,
    HeaderFooterDetector, HeaderFooterSets, LineGroup, Page, PositionedWord,
};
use crate::source::{LopdfPageSource, PageSource};
use crate::text::{clean_text, is_footer_boilerplate, is_page_number};
use nodes::{ExtractedNode, ListItem};
use std::collections::BTreeSet;
use std::path::Path;

/// Top-to-top gap, as a fraction of page height, that starts a new paragraph.
const PARAGRAPH_BREAK_RATIO: f64 = 0.06;

/// Lines this much larger than the baseline font are headings.
const HEADING_SIZE_RATIO: f64 = 1.2;

/// Lines indented past the baseline margin by this fraction of the page
/// width are list items.
const LIST_INDENT_RATIO: f64 = 0.1;

/// Weight at and above which a line is a heading.
const HEADING_WEIGHT: u16 = 700;

/// Weight at and above which a heading is top level.
const TOP_HEADING_WEIGHT: u16 = 800;

/// Progress of one extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    /// Nothing computed yet
    Idle,
    /// Analyzing the document and detecting running elements
    HeaderFooterScan,
    /// Emitting the page with this 1-based index
    PerPageEmit(usize),
    /// All pages emitted
    Done,
}

/// Per-call state: the document analysis, the detected running elements and
/// the current stage.
struct ExtractionRun {
    state: ExtractionState,
    analysis: DocumentAnalysis,
    sets: HeaderFooterSets,
}

impl ExtractionRun {
    fn advance(&mut self, next: ExtractionState) {
        log::trace!("Extraction state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Role of a line in classic classification.
enum LineRole {
    Heading(u8),
    ListItem,
    Body,
}

/// Layout-aware text extractor for one document.
///
/// # Examples
///
/// ```
/// use pdf_textflow::layout::{Page, PositionedWord};
/// use pdf_textflow::{ExtractorConfig, PdfTextExtractor};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let page = Page::new(1, 600.0, 800.0, vec![
///     PositionedWord::new("Hello", 100.0, 110.0, 50.0, 80.0),
///     PositionedWord::new("world", 100.0, 110.0, 85.0, 115.0),
///     PositionedWord::new("again", 112.0, 122.0, 50.0, 80.0),
/// ]);
/// let extractor = PdfTextExtractor::from_pages(vec![page], ExtractorConfig::default())?;
///
/// assert_eq!(extractor.extract_lines(false), vec!["Hello world again", ""]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    pages: Vec<Page>,
    config: ExtractorConfig,
}

impl PdfTextExtractor {
    /// Create an extractor over already decoded pages.
    ///
    /// Fails with [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the
    /// thresholds are inconsistent.
    pub fn from_pages(pages: Vec<Page>, config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        log::debug!("Created extractor over {} pages", pages.len());
        Ok(Self { pages, config })
    }

    /// Create an extractor from any page source.
    pub fn from_source<S: PageSource + ?Sized>(source: &S, config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        let pages = source.load_pages()?;
        Self::from_pages(pages, config)
    }

    /// Decode a PDF held in memory.
    pub fn from_bytes(bytes: &[u8], config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Self::from_source(&LopdfPageSource::from_bytes(bytes)?, config)
    }

    /// Decode a PDF file.
    pub fn open(path: impl AsRef<Path>, config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Self::from_source(&LopdfPageSource::from_path(path)?, config)
    }

    /// The decoded pages in document order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages, including empty ones.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The validated configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Document-wide statistics and position histories.
    pub fn analyze(&self) -> DocumentAnalysis {
        DocumentAnalyzer::new(self.config).analyze(&self.pages)
    }

    /// Running headers and footers, as `(headers, footers)`.
    ///
    /// The two sets are always disjoint.
    pub fn detect_headers_footers(&self) -> (BTreeSet<String>, BTreeSet<String>) {
        self.begin().sets.into_parts()
    }

    /// Extract reading-order lines.
    ///
    /// Soft-wrapped lines are joined with a single space; an empty string
    /// marks a paragraph break and one empty string closes every page that
    /// produced output. With `include_page_numbers`, each page starts with a
    /// `Page N` line and page-number shaped lines are kept.
    pub fn extract_lines(&self, include_page_numbers: bool) -> Vec<String> {
        let mut run = self.begin();
        let mut lines: Vec<String> = Vec::new();

        for page in &self.pages {
            run.advance(ExtractionState::PerPageEmit(page.index));
            let mut emitted = false;

            if include_page_numbers {
                lines.push(format!("Page {}", page.index));
                emitted = true;
            }

            let break_gap = page.height * PARAGRAPH_BREAK_RATIO;
            let mut last_top: Option<f64> = None;

            for (text, group) in self.page_lines(page, &run.sets, include_page_numbers) {
                match last_top {
                    Some(top) if group.top - top > break_gap => {
                        lines.push(String::new());
                        lines.push(text);
                    },
                    Some(_) => match lines.last_mut() {
                        Some(prev) if !prev.is_empty() => {
                            prev.push(' ');
                            prev.push_str(&text);
                        },
                        _ => lines.push(text),
                    },
                    None => lines.push(text),
                }
                last_top = Some(group.top);
                emitted = true;
            }

            if emitted {
                lines.push(String::new());
            }
        }

        run.advance(ExtractionState::Done);
        lines
    }

    /// Extract structured nodes.
    ///
    /// Headings stand alone, indented short lines accumulate into list
    /// blocks and body lines merge into paragraphs. Pages that both produced
    /// content are separated by a paragraph break.
    pub fn extract_nodes(&self, include_page_numbers: bool) -> Vec<ExtractedNode> {
        self.assemble(include_page_numbers, |page, run| {
            self.structure_page(page, &run.sets, include_page_numbers)
        })
    }

    /// Extract structured nodes and render them.
    pub fn extract_html(
        &self,
        formatter: &dyn Formatter,
        options: &FormatOptions,
        include_page_numbers: bool,
    ) -> Result<String> {
        let nodes = self.extract_nodes(include_page_numbers);
        log::debug!("Rendering {} nodes with {} formatter", nodes.len(), formatter.name());
        formatter.format(&nodes, options)
    }

    /// Extract structured nodes and render them with [`HtmlFormatter`].
    pub fn extract_html_default(&self, include_page_numbers: bool) -> Result<String> {
        self.extract_html(&HtmlFormatter::new(), &FormatOptions::default(), include_page_numbers)
    }

    /// Classify every line against the baseline metrics.
    ///
    /// A line is a heading if its mean size exceeds the baseline font size by
    /// more than 20% or its heaviest word is bold (level 1 from weight 800,
    /// level 2 from 700, level 3 otherwise). A line indented past the
    /// baseline left margin by more than 10% of the page width is a list
    /// item. Without a baseline the size signal is off and indentation is
    /// measured from the page edge.
    ///
    /// Words belonging to running headers or footers are dropped before
    /// lines are formed; no paragraph merging takes place.
    pub fn extract_classified(&self, include_page_numbers: bool) -> Vec<ExtractedNode> {
        self.assemble(include_page_numbers, |page, run| {
            self.classify_page(page, &run.sets, &run.analysis.baseline)
        })
    }

    fn begin(&self) -> ExtractionRun {
        let mut run = ExtractionRun {
            state: ExtractionState::Idle,
            analysis: DocumentAnalysis::default(),
            sets: HeaderFooterSets::default(),
        };
        run.advance(ExtractionState::HeaderFooterScan);
        run.analysis = self.analyze();
        run.sets = HeaderFooterDetector::new(self.config).detect(&run.analysis.history, self.pages.len());
        run
    }

    /// Drive the page loop for the node-producing modes.
    fn assemble<F>(&self, include_page_numbers: bool, mut per_page: F) -> Vec<ExtractedNode>
    where
        F: FnMut(&Page, &ExtractionRun) -> Vec<ExtractedNode>,
    {
        let mut run = self.begin();
        let mut nodes = Vec::new();
        let mut has_content = false;

        for page in &self.pages {
            run.advance(ExtractionState::PerPageEmit(page.index));
            let page_nodes = per_page(page, &run);

            if has_content && !page_nodes.is_empty() {
                nodes.push(ExtractedNode::paragraph_break());
            }
            if include_page_numbers {
                nodes.push(ExtractedNode::page_marker(page.index));
            }
            has_content |= !page_nodes.is_empty();
            nodes.extend(page_nodes);
        }

        run.advance(ExtractionState::Done);
        nodes
    }

    /// Lines of a page that survive suppression, with their cleaned text.
    fn page_lines(
        &self,
        page: &Page,
        sets: &HeaderFooterSets,
        include_page_numbers: bool,
    ) -> Vec<(String, LineGroup)> {
        if page.is_degenerate() {
            log::debug!("Page {} has no usable words", page.index);
            return Vec::new();
        }

        group_lines(&page.words)
            .into_iter()
            .filter_map(|group| {
                let text = clean_text(&group.text());
                if is_suppressed(&text, &group, sets, include_page_numbers) {
                    log::trace!("Suppressed line on page {}: {:?}", page.index, text);
                    None
                } else {
                    Some((text, group))
                }
            })
            .collect()
    }

    fn structure_page(
        &self,
        page: &Page,
        sets: &HeaderFooterSets,
        include_page_numbers: bool,
    ) -> Vec<ExtractedNode> {
        let break_gap = page.height * PARAGRAPH_BREAK_RATIO;
        let mut nodes: Vec<ExtractedNode> = Vec::new();
        let mut list_items: Vec<ListItem> = Vec::new();
        let mut last_top: Option<f64> = None;

        for (text, group) in self.page_lines(page, sets, include_page_numbers) {
            let gap_break = last_top.is_some_and(|top| group.top - top > break_gap);
            last_top = Some(group.top);

            if is_list_item(&text, group.left(), page.width) {
                list_items.push(list_item(text, &group));
                continue;
            }
            flush_list(&mut nodes, &mut list_items);

            if let Some(level) = group.heading_level {
                nodes.push(styled(ExtractedNode::heading(level, text), &group));
                continue;
            }

            match nodes.last_mut() {
                Some(prev) if prev.is_text() && !gap_break => {
                    prev.text.push(' ');
                    prev.text.push_str(&text);
                    prev.spacing_after = Some(group.spacing_after);
                    prev.bold &= group.bold;
                    prev.italic &= group.italic;
                    prev.underline &= group.underline;
                },
                _ => nodes.push(styled(ExtractedNode::text(text), &group)),
            }
        }

        flush_list(&mut nodes, &mut list_items);
        nodes
    }

    fn classify_page(
        &self,
        page: &Page,
        sets: &HeaderFooterSets,
        baseline: &BaselineMetrics,
    ) -> Vec<ExtractedNode> {
        if page.is_degenerate() {
            return Vec::new();
        }

        let words: Vec<PositionedWord> = page
            .words
            .iter()
            .filter(|w| !sets.contains(&w.text))
            .cloned()
            .collect();

        let mut nodes = Vec::new();
        let mut list_items: Vec<ListItem> = Vec::new();

        for group in group_lines(&words) {
            let text = clean_text(&group.text());
            if text.trim().is_empty() {
                continue;
            }

            match classic_role(&group, page.width, baseline) {
                LineRole::ListItem => list_items.push(list_item(text, &group)),
                LineRole::Heading(level) => {
                    flush_list(&mut nodes, &mut list_items);
                    nodes.push(styled(ExtractedNode::heading(level, text), &group));
                },
                LineRole::Body => {
                    flush_list(&mut nodes, &mut list_items);
                    nodes.push(styled(ExtractedNode::text(text), &group));
                },
            }
        }

        flush_list(&mut nodes, &mut list_items);
        nodes
    }
}

fn is_suppressed(
    text: &str,
    group: &LineGroup,
    sets: &HeaderFooterSets,
    include_page_numbers: bool,
) -> bool {
    text.trim().is_empty()
        || sets.contains(text)
        || group.words.iter().all(|w| sets.contains(&w.text))
        || is_footer_boilerplate(text)
        || (!include_page_numbers && is_page_number(text))
}

fn classic_role(group: &LineGroup, page_width: f64, baseline: &BaselineMetrics) -> LineRole {
    let relative_size = match baseline.font_size {
        Some(base) if base > 0.0 => group.font_size / base,
        _ => 1.0,
    };
    let weight = group.max_weight();

    if relative_size > HEADING_SIZE_RATIO || weight >= HEADING_WEIGHT {
        let level = if weight >= TOP_HEADING_WEIGHT {
            1
        } else if weight >= HEADING_WEIGHT {
            2
        } else {
            3
        };
        return LineRole::Heading(level);
    }

    let indent = group.left() - baseline.left_margin.unwrap_or(0.0);
    if page_width > 0.0 && indent / page_width > LIST_INDENT_RATIO {
        LineRole::ListItem
    } else {
        LineRole::Body
    }
}

fn styled(node: ExtractedNode, group: &LineGroup) -> ExtractedNode {
    node.with_style(group.bold, group.italic, group.underline)
        .with_spacing_after(group.spacing_after)
}

fn list_item(text: String, group: &LineGroup) -> ListItem {
    ListItem {
        text,
        spacing_after: group.spacing_after,
        bold: group.bold,
        italic: group.italic,
        underline: group.underline,
    }
}

fn flush_list(nodes: &mut Vec<ExtractedNode>, items: &mut Vec<ListItem>) {
    if !items.is_empty() {
        nodes.push(ExtractedNode::list_block(std::mem::take(items)));
    }
}
