//! Default HTML formatter.
//!
//! One element per node, one node per output line:
//! - `Heading(n)` → `<hn>`
//! - `Text` → `<div>` (override key `text`)
//! - `ListBlock` → `<ul>` with one `<li>` per item (override key `list`)
//! - `PageMarker` → `<div class="page-number">` (override key `page_number`)
//! - `ParagraphBreak` → `<div class="paragraph-break">&nbsp;</div>` (override key `break`)

use crate::converters::{FormatOptions, Formatter};
use crate::error::{Error, Result};
use crate::extractor::nodes::{ExtractedNode, ListItem, NodeKind};

/// Formatter producing HTML fragments.
///
/// # Examples
///
/// ```
/// use pdf_textflow::converters::{FormatOptions, Formatter, HtmlFormatter};
/// use pdf_textflow::ExtractedNode;
///
/// let html = HtmlFormatter::new()
///     .format(&[ExtractedNode::page_marker(1)], &FormatOptions::default())
///     .unwrap();
/// assert_eq!(html, r#"<div class="page-number">Page 1</div>"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormatter;

impl HtmlFormatter {
    /// Create a new HTML formatter.
    pub fn new() -> Self {
        Self
    }

    fn render_node(node: &ExtractedNode, options: &FormatOptions, out: &mut Vec<String>) -> Result<()> {
        match &node.kind {
            NodeKind::ParagraphBreak => {
                let tag = options.tag_for("break", "div");
                out.push(format!(r#"<{tag} class="paragraph-break">&nbsp;</{tag}>"#));
            },
            NodeKind::ListBlock(items) => {
                let tag = options.tag_for("list", "ul");
                let attrs = attributes(&options.custom_classes, &styles(node.spacing_after, options));
                out.push(format!("<{tag}{attrs}>"));
                for item in items {
                    out.push(render_item(item));
                }
                out.push(format!("</{tag}>"));
            },
            NodeKind::Heading(level) => {
                if !(1..=6).contains(level) {
                    return Err(Error::Format(format!("Heading level {level} is outside h1-h6")));
                }
                let tag = format!("h{level}");
                out.push(render_element(&tag, node, options));
            },
            NodeKind::Text => {
                out.push(render_element(options.tag_for("text", "div"), node, options));
            },
            NodeKind::PageMarker => {
                out.push(render_element(options.tag_for("page_number", "div"), node, options));
            },
        }
        Ok(())
    }
}

impl Formatter for HtmlFormatter {
    fn format(&self, nodes: &[ExtractedNode], options: &FormatOptions) -> Result<String> {
        options.validate()?;

        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            Self::render_node(node, options, &mut out)?;
        }
        Ok(out.join("\n"))
    }

    fn name(&self) -> &'static str {
        "HTML"
    }
}

fn render_element(tag: &str, node: &ExtractedNode, options: &FormatOptions) -> String {
    let mut classes = style_classes(node.bold, node.italic, node.underline);
    classes.extend(node.classes.iter().cloned());
    classes.extend(options.custom_classes.iter().cloned());
    if matches!(node.kind, NodeKind::PageMarker) {
        classes.push("page-number".to_string());
    }

    let attrs = attributes(&classes, &styles(node.spacing_after, options));
    format!("<{tag}{attrs}>{}</{tag}>", escape_html(&node.text))
}

fn render_item(item: &ListItem) -> String {
    let classes = style_classes(item.bold, item.italic, item.underline);
    let attrs = attributes(&classes, &[]);
    format!("<li{attrs}>{}</li>", escape_html(&item.text))
}

fn style_classes(bold: bool, italic: bool, underline: bool) -> Vec<String> {
    [(bold, "bold"), (italic, "italic"), (underline, "underline")]
        .into_iter()
        .filter(|(on, _)| *on)
        .map(|(_, class)| class.to_string())
        .collect()
}

/// `margin-bottom` clamped to `max_margin`, then the overrides.
fn styles(spacing_after: Option<f64>, options: &FormatOptions) -> Vec<String> {
    let mut styles = Vec::new();
    if let Some(spacing) = spacing_after.filter(|s| *s > 0.0) {
        styles.push(format!("margin-bottom: {}pt", spacing.min(options.max_margin)));
    }
    styles.extend(
        options
            .style_overrides
            .iter()
            .map(|(property, value)| format!("{property}: {value}")),
    );
    styles
}

fn attributes(classes: &[String], styles: &[String]) -> String {
    let mut attrs = String::new();
    if !classes.is_empty() {
        attrs.push_str(&format!(r#" class="{}""#, escape_html(&classes.join(" "))));
    }
    if !styles.is_empty() {
        attrs.push_str(&format!(r#" style="{}""#, escape_html(&styles.join("; "))));
    }
    attrs
}

/// Escape HTML special characters.
///
/// # Examples
///
/// ```
/// use pdf_textflow::converters::escape_html;
///
/// assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
/// ```
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(nodes: &[ExtractedNode]) -> String {
        HtmlFormatter::new().format(nodes, &FormatOptions::default()).unwrap()
    }

    fn item(text: &str, bold: bool) -> ListItem {
        ListItem {
            text: text.into(),
            spacing_after: 3.0,
            bold,
            italic: false,
            underline: false,
        }
    }

    #[test]
    fn test_formatter_name() {
        assert_eq!(HtmlFormatter::new().name(), "HTML");
    }

    #[test]
    fn test_heading_and_text() {
        let html = render(&[
            ExtractedNode::heading(2, "Methods").with_style(true, false, false),
            ExtractedNode::text("Plain"),
        ]);
        assert_eq!(html, "<h2 class=\"bold\">Methods</h2>\n<div>Plain</div>");
    }

    #[test]
    fn test_margin_clamped() {
        let html = render(&[
            ExtractedNode::text("a").with_spacing_after(6.5),
            ExtractedNode::text("b").with_spacing_after(40.0),
            ExtractedNode::text("c").with_spacing_after(-2.0),
        ]);
        let lines: Vec<&str> = html.lines().collect();
        assert_eq!(lines[0], r#"<div style="margin-bottom: 6.5pt">a</div>"#);
        assert_eq!(lines[1], r#"<div style="margin-bottom: 15pt">b</div>"#);
        assert_eq!(lines[2], "<div>c</div>");
    }

    #[test]
    fn test_list_block() {
        let html = render(&[ExtractedNode::list_block(vec![item("one", true), item("two", false)])]);
        assert_eq!(
            html,
            "<ul style=\"margin-bottom: 3pt\">\n<li class=\"bold\">one</li>\n<li>two</li>\n</ul>"
        );
    }

    #[test]
    fn test_paragraph_break_and_page_marker() {
        let html = render(&[ExtractedNode::page_marker(2), ExtractedNode::paragraph_break()]);
        assert_eq!(
            html,
            "<div class=\"page-number\">Page 2</div>\n<div class=\"paragraph-break\">&nbsp;</div>"
        );
    }

    #[test]
    fn test_class_order() {
        let node = ExtractedNode::text("x")
            .with_style(true, true, true)
            .with_class("note");
        let options = FormatOptions::new().with_class("doc");
        let html = HtmlFormatter::new().format(&[node], &options).unwrap();
        assert_eq!(html, r#"<div class="bold italic underline note doc">x</div>"#);
    }

    #[test]
    fn test_custom_tags_and_styles() {
        let options = FormatOptions::new()
            .with_tag("text", "p")
            .with_tag("list", "ol")
            .with_style("color", "navy");
        let nodes = vec![
            ExtractedNode::text("para").with_spacing_after(4.0),
            ExtractedNode::list_block(vec![item("i", false)]),
        ];
        let html = HtmlFormatter::new().format(&nodes, &options).unwrap();
        assert!(html.starts_with(r#"<p style="margin-bottom: 4pt; color: navy">para</p>"#));
        assert!(html.contains("<ol style=\"margin-bottom: 3pt; color: navy\">"));
        assert!(html.ends_with("</ol>"));
    }

    #[test]
    fn test_heading_ignores_text_tag_override() {
        let options = FormatOptions::new().with_tag("text", "p");
        let html = HtmlFormatter::new()
            .format(&[ExtractedNode::heading(3, "H")], &options)
            .unwrap();
        assert_eq!(html, "<h3>H</h3>");
    }

    #[test]
    fn test_invalid_tag_fails_whole_render() {
        let options = FormatOptions::new().with_tag("text", "marquee");
        let result = HtmlFormatter::new().format(&[ExtractedNode::text("x")], &options);
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_heading_level_out_of_range_fails() {
        let formatter = HtmlFormatter::new();
        for level in [0, 7, 9] {
            let nodes = vec![ExtractedNode::text("ok"), ExtractedNode::heading(level, "Bad")];
            let result = formatter.format(&nodes, &FormatOptions::default());
            assert!(matches!(result, Err(Error::Format(_))), "level {level}");
        }
        assert_eq!(render(&[ExtractedNode::heading(6, "Deep")]), "<h6>Deep</h6>");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render(&[ExtractedNode::text("<script>\"x\" & 'y'</script>")]);
        assert_eq!(
            html,
            "<div>&lt;script&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/script&gt;</div>"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render(&[]), "");
    }
}
