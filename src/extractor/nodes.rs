//! Structured output units.
//!
//! The extractor emits a flat sequence of [`ExtractedNode`]s; formatters turn
//! that sequence into markup. Nodes serialize to JSON for diagnostics.

use serde::{Deserialize, Serialize};

/// Kind of an extracted node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Body paragraph (possibly several merged lines)
    Text,
    /// Heading with level 1..=4
    Heading(u8),
    /// Consecutive list-item lines
    ListBlock(Vec<ListItem>),
    /// Explicit "Page N" marker
    PageMarker,
    /// Separator between pages
    ParagraphBreak,
}

/// One line of a list block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    /// Cleaned line text
    pub text: String,
    /// Gap to the next line
    pub spacing_after: f64,
    /// Line is bold
    pub bold: bool,
    /// Line is italic
    pub italic: bool,
    /// Line is underlined
    #[serde(default)]
    pub underline: bool,
}

/// A node of the structured output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedNode {
    /// Node kind, list items included
    pub kind: NodeKind,
    /// Text content; empty for list blocks and paragraph breaks
    pub text: String,
    /// Gap after the node in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_after: Option<f64>,
    /// Bold style
    #[serde(default)]
    pub bold: bool,
    /// Italic style
    #[serde(default)]
    pub italic: bool,
    /// Underline style
    #[serde(default)]
    pub underline: bool,
    /// Extra CSS classes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
}

impl ExtractedNode {
    fn with_kind(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            spacing_after: None,
            bold: false,
            italic: false,
            underline: false,
            classes: Vec::new(),
        }
    }

    /// A body text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text, text)
    }

    /// A heading node.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Heading(level), text)
    }

    /// A list block; its spacing is that of the last item.
    pub fn list_block(items: Vec<ListItem>) -> Self {
        let spacing_after = items.last().map(|item| item.spacing_after);
        let mut node = Self::with_kind(NodeKind::ListBlock(items), String::new());
        node.spacing_after = spacing_after;
        node
    }

    /// A "Page N" marker.
    pub fn page_marker(page_index: usize) -> Self {
        Self::with_kind(NodeKind::PageMarker, format!("Page {page_index}"))
    }

    /// A page separator.
    pub fn paragraph_break() -> Self {
        Self::with_kind(NodeKind::ParagraphBreak, String::new())
    }

    /// Set the spacing after the node (builder pattern).
    pub fn with_spacing_after(mut self, spacing: f64) -> Self {
        self.spacing_after = Some(spacing);
        self
    }

    /// Set the style flags (builder pattern).
    pub fn with_style(mut self, bold: bool, italic: bool, underline: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self.underline = underline;
        self
    }

    /// Add a CSS class (builder pattern).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Key used for tag overrides: `text`, `heading`, `list`, `page_number`
    /// or `break`.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            NodeKind::Text => "text",
            NodeKind::Heading(_) => "heading",
            NodeKind::ListBlock(_) => "list",
            NodeKind::PageMarker => "page_number",
            NodeKind::ParagraphBreak => "break",
        }
    }

    /// True for body text nodes.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text)
    }

    /// Heading level, if this is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self.kind {
            NodeKind::Heading(level) => Some(level),
            _ => None,
        }
    }

    /// List items, if this is a list block.
    pub fn list_items(&self) -> Option<&[ListItem]> {
        match &self.kind {
            NodeKind::ListBlock(items) => Some(items),
            _ => None,
        }
    }
}
