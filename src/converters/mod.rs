//! Formatters for structured extraction output.
//!
//! A [`Formatter`] turns the node sequence produced by
//! [`PdfTextExtractor::extract_nodes`](crate::PdfTextExtractor::extract_nodes)
//! into a string. Formatting is pure: no I/O, identical input gives identical
//! output, and an invalid option fails the whole call.
//!
//! # Examples
//!
//! ```
//! use pdf_textflow::converters::{FormatOptions, Formatter, HtmlFormatter};
//! use pdf_textflow::ExtractedNode;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let nodes = vec![
//!     ExtractedNode::heading(1, "Intro"),
//!     ExtractedNode::text("Body & more").with_spacing_after(20.0),
//! ];
//! let html = HtmlFormatter::new().format(&nodes, &FormatOptions::default())?;
//! assert_eq!(
//!     html,
//!     "<h1>Intro</h1>\n<div style=\"margin-bottom: 15pt\">Body &amp; more</div>"
//! );
//! # Ok(())
//! # }
//! ```

pub mod html;

pub use html::{escape_html, HtmlFormatter};

use crate::error::{Error, Result};
use crate::extractor::nodes::ExtractedNode;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Node kinds whose tag can be overridden.
pub const OVERRIDABLE_KINDS: &[&str] = &["text", "list", "page_number", "break"];

/// Non-void HTML elements accepted as tag overrides.
const KNOWN_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "b", "blockquote", "code", "dd", "details", "div", "dl",
    "dt", "em", "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "i", "li", "main", "mark", "nav", "ol", "p", "pre", "section", "small", "span", "strong",
    "summary", "u", "ul",
];

/// Convert structured nodes to an output format.
///
/// Implementations must be deterministic and side-effect free.
pub trait Formatter: Send + Sync {
    /// Render `nodes` with `options`.
    ///
    /// Fails without producing partial output if the options are invalid.
    fn format(&self, nodes: &[ExtractedNode], options: &FormatOptions) -> Result<String>;

    /// Get the name of this formatter.
    fn name(&self) -> &'static str;
}

/// Options shared by formatters.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// Upper bound for `margin-bottom`, in points (default 15).
    pub max_margin: f64,
    /// Tag per node kind (`text`, `list`, `page_number`, `break`).
    pub custom_tags: BTreeMap<String, String>,
    /// Classes added to every rendered node.
    pub custom_classes: Vec<String>,
    /// Inline styles appended after the computed ones, in insertion order.
    pub style_overrides: IndexMap<String, String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatOptions {
    /// Default margin clamp in points.
    pub const MAX_MARGIN: f64 = 15.0;

    /// Create options with defaults.
    pub fn new() -> Self {
        Self {
            max_margin: Self::MAX_MARGIN,
            custom_tags: BTreeMap::new(),
            custom_classes: Vec::new(),
            style_overrides: IndexMap::new(),
        }
    }

    /// Set the margin clamp (builder pattern).
    pub fn with_max_margin(mut self, max_margin: f64) -> Self {
        self.max_margin = max_margin;
        self
    }

    /// Override the tag of a node kind (builder pattern).
    pub fn with_tag(mut self, kind: impl Into<String>, tag: impl Into<String>) -> Self {
        self.custom_tags.insert(kind.into(), tag.into());
        self
    }

    /// Add a class to every node (builder pattern).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.custom_classes.push(class.into());
        self
    }

    /// Add an inline style override (builder pattern).
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style_overrides.insert(property.into(), value.into());
        self
    }

    /// Check tag overrides and the margin clamp.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textflow::converters::FormatOptions;
    ///
    /// assert!(FormatOptions::new().with_tag("text", "p").validate().is_ok());
    /// assert!(FormatOptions::new().with_tag("text", "blink").validate().is_err());
    /// assert!(FormatOptions::new().with_tag("table", "div").validate().is_err());
    /// ```
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        if !(self.max_margin >= 0.0) {
            return Err(Error::Format(format!(
                "max_margin must be non-negative, got {}",
                self.max_margin
            )));
        }
        for (kind, tag) in &self.custom_tags {
            if !OVERRIDABLE_KINDS.contains(&kind.as_str()) {
                return Err(Error::Format(format!("Unknown node kind for tag override: {kind}")));
            }
            if !KNOWN_ELEMENTS.contains(&tag.as_str()) {
                return Err(Error::Format(format!("Unknown HTML element '{tag}' for {kind}")));
            }
        }
        Ok(())
    }

    /// Tag for a node kind, falling back to `default`.
    pub fn tag_for<'a>(&'a self, kind: &str, default: &'a str) -> &'a str {
        self.custom_tags.get(kind).map_or(default, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FormatOptions::default();
        assert_eq!(options.max_margin, 15.0);
        assert!(options.custom_tags.is_empty());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_tag_for() {
        let options = FormatOptions::new().with_tag("text", "p");
        assert_eq!(options.tag_for("text", "div"), "p");
        assert_eq!(options.tag_for("list", "ul"), "ul");
    }

    #[test]
    fn test_rejects_void_and_unknown_elements() {
        for tag in ["br", "hr", "img", "script", ""] {
            let options = FormatOptions::new().with_tag("break", tag);
            assert!(matches!(options.validate(), Err(Error::Format(_))), "{tag:?}");
        }
    }

    #[test]
    fn test_rejects_negative_margin() {
        assert!(FormatOptions::new().with_max_margin(-1.0).validate().is_err());
        assert!(FormatOptions::new().with_max_margin(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_style_overrides_keep_order() {
        let options = FormatOptions::new()
            .with_style("color", "red")
            .with_style("font-family", "serif");
        let keys: Vec<&str> = options.style_overrides.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["color", "font-family"]);
    }
}
