//! Minimal positioned-word decoding with `lopdf`.
//!
//! Tracks just enough of the text state (ISO 32000-1 §9.4) to place words:
//! `BT`/`ET`, `Tf`, `Tm`, `Td`, `TD`, `TL`, `T*`, `Tj`, `TJ`, `'` and `"`,
//! plus the current transformation matrix through `q`, `Q` and `cm`.
//! Glyph widths are not read from the font program; every glyph advances by
//! half the font size.
//!
//! Coordinates are converted to a top-left origin using the page's MediaBox
//! (inherited through `Parent` when absent on the page itself).

use crate::error::Result;
use crate::layout::word::{Page, PositionedWord, DEFAULT_FONT_WEIGHT};
use crate::source::PageSource;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::path::Path;

/// US Letter, used when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Advance per glyph as a fraction of the font size.
const GLYPH_ADVANCE_RATIO: f64 = 0.5;

/// A `TJ` adjustment at least this large (thousandths of an em) splits runs.
const TJ_WORD_GAP: f64 = 200.0;

/// Guard against cyclic `Parent` chains.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Page source backed by a parsed `lopdf` document.
///
/// # Examples
///
/// ```no_run
/// use pdf_textflow::source::{LopdfPageSource, PageSource};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = LopdfPageSource::from_path("report.pdf")?;
/// for page in source.load_pages()? {
///     println!("page {}: {} words", page.index, page.words.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LopdfPageSource {
    doc: Document,
}

impl LopdfPageSource {
    /// Parse a PDF held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let doc = Document::load_mem(bytes)?;
        Ok(Self { doc })
    }

    /// Read and parse a PDF file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Number of pages in the page tree.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn decode_page(&self, index: usize, page_id: ObjectId) -> Page {
        let page_dict = match self.doc.get_dictionary(page_id) {
            Ok(dict) => dict,
            Err(e) => {
                log::warn!("Skipping page {}: {}", index, e);
                return Page::new(index, 0.0, 0.0, Vec::new());
            },
        };

        let media_box = self.media_box(page_dict);
        let width = media_box[2] - media_box[0];
        let height = media_box[3] - media_box[1];
        let fonts = self.page_fonts(page_dict);

        let operations = match self
            .doc
            .get_page_content(page_id)
            .and_then(|data| Content::decode(&data))
        {
            Ok(content) => content.operations,
            Err(e) => {
                log::warn!("Skipping content of page {}: {}", index, e);
                Vec::new()
            },
        };

        let mut state = TextState::new(media_box, &fonts);
        for op in &operations {
            state.apply(op);
        }

        log::trace!("Page {}: {} words", index, state.words.len());
        Page::new(index, width, height, state.words)
    }

    fn media_box(&self, page: &Dictionary) -> [f64; 4] {
        let Some(Object::Array(values)) = self.inherited(page, b"MediaBox") else {
            return DEFAULT_MEDIA_BOX;
        };
        let numbers: Vec<f64> = values
            .iter()
            .filter_map(|v| number(self.resolve(v)))
            .collect();
        match numbers.as_slice() {
            [x0, y0, x1, y1] if x1 > x0 && y1 > y0 => [*x0, *y0, *x1, *y1],
            _ => DEFAULT_MEDIA_BOX,
        }
    }

    /// Resource name → font info for the page's `/Resources/Font` dictionary.
    fn page_fonts(&self, page: &Dictionary) -> HashMap<Vec<u8>, FontInfo> {
        let mut fonts = HashMap::new();
        let Some(resources) = self.inherited(page, b"Resources").and_then(|o| o.as_dict().ok()) else {
            return fonts;
        };
        let Some(font_dict) = resources
            .get(b"Font")
            .ok()
            .and_then(|o| self.resolve(o).as_dict().ok())
        else {
            return fonts;
        };

        for (name, obj) in font_dict.iter() {
            if let Ok(font) = self.resolve(obj).as_dict() {
                fonts.insert(name.clone(), self.font_info(font));
            }
        }
        fonts
    }

    fn font_info(&self, font: &Dictionary) -> FontInfo {
        let name = font
            .get(b"BaseFont")
            .ok()
            .and_then(|o| self.resolve(o).as_name().ok())
            .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_default();

        let weight = font
            .get(b"FontDescriptor")
            .ok()
            .and_then(|o| self.resolve(o).as_dict().ok())
            .and_then(|d| d.get(b"FontWeight").ok())
            .and_then(|o| number(self.resolve(o)))
            .map(|w| w.clamp(0.0, f64::from(u16::MAX)) as u16)
            .unwrap_or(DEFAULT_FONT_WEIGHT);

        FontInfo { name, weight }
    }

    /// Look up a page attribute, walking up the page tree.
    fn inherited<'a>(&'a self, page: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
        let mut dict = page;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(obj) = dict.get(key) {
                return Some(self.resolve(obj));
            }
            let parent = dict.get(b"Parent").ok()?;
            dict = self.resolve(parent).as_dict().ok()?;
        }
        None
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match self.doc.dereference(obj) {
            Ok((_, resolved)) => resolved,
            Err(_) => obj,
        }
    }
}

impl PageSource for LopdfPageSource {
    fn load_pages(&self) -> Result<Vec<Page>> {
        let pages: Vec<Page> = self
            .doc
            .get_pages()
            .into_iter()
            .map(|(number, id)| self.decode_page(number as usize, id))
            .collect();
        log::debug!("Decoded {} pages", pages.len());
        Ok(pages)
    }
}

#[derive(Debug, Clone, Default)]
struct FontInfo {
    name: String,
    weight: u16,
}

/// Affine transform `[a b c d e f]`, applied to row vectors as in PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Six numeric operands, as taken by `cm` and `Tm`.
    fn from_operands(operands: &[Object]) -> Option<Self> {
        let values: Vec<f64> = operands.iter().take(6).filter_map(number).collect();
        match values.as_slice() {
            [a, b, c, d, e, f] => Some(Self {
                a: *a,
                b: *b,
                c: *c,
                d: *d,
                e: *e,
                f: *f,
            }),
            _ => None,
        }
    }

    /// Apply `self` first, then `other`.
    fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Translate within this matrix's own space.
    fn translate(&self, tx: f64, ty: f64) -> Matrix {
        let (e, f) = self.transform_point(tx, ty);
        Matrix { e, f, ..*self }
    }

    /// Length of the transformed unit y vector.
    fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Graphics and text object state for one page.
struct TextState<'a> {
    fonts: &'a HashMap<Vec<u8>, FontInfo>,
    media_box: [f64; 4],
    font: FontInfo,
    font_size: f64,
    leading: f64,
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    words: Vec<PositionedWord>,
}

impl<'a> TextState<'a> {
    fn new(media_box: [f64; 4], fonts: &'a HashMap<Vec<u8>, FontInfo>) -> Self {
        Self {
            fonts,
            media_box,
            font: FontInfo {
                name: String::new(),
                weight: DEFAULT_FONT_WEIGHT,
            },
            font_size: 0.0,
            leading: 0.0,
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            words: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            },
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.multiply(&self.ctm);
                }
            },
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            },
            "Tf" => {
                if let [name, size, ..] = operands.as_slice() {
                    if let Ok(name) = name.as_name() {
                        self.font = self.fonts.get(name).cloned().unwrap_or_else(|| FontInfo {
                            name: String::from_utf8_lossy(name).into_owned(),
                            weight: DEFAULT_FONT_WEIGHT,
                        });
                    }
                    self.font_size = number(size).unwrap_or(self.font_size);
                }
            },
            "TL" => {
                if let Some(leading) = operands.first().and_then(number) {
                    self.leading = leading;
                }
            },
            "Td" | "TD" => {
                if let [tx, ty, ..] = operands.as_slice() {
                    let tx = number(tx).unwrap_or(0.0);
                    let ty = number(ty).unwrap_or(0.0);
                    if op.operator == "TD" {
                        self.leading = -ty;
                    }
                    self.move_line(tx, ty);
                }
            },
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            },
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(&[Segment::Text(decode_text(bytes))]);
                }
            },
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.first() {
                    self.show(&[Segment::Text(decode_text(bytes))]);
                }
            },
            "\"" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = operands.get(2) {
                    self.show(&[Segment::Text(decode_text(bytes))]);
                }
            },
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let segments: Vec<Segment> = items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(Segment::Text(decode_text(bytes))),
                            other => number(other).map(Segment::Adjust),
                        })
                        .collect();
                    self.show(&segments);
                }
            },
            _ => {},
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = self.line_matrix.translate(tx, ty);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }

    /// Place the glyphs of a show operation.
    ///
    /// Each shown run becomes one record, blanks included. A `TJ` adjustment
    /// of at least [`TJ_WORD_GAP`] starts a new run.
    fn show(&mut self, segments: &[Segment]) {
        let render = self.text_matrix.multiply(&self.ctm);
        let scale = render.vertical_scale();
        let size = if scale > 0.0 {
            self.font_size * scale
        } else {
            self.font_size
        };
        let advance = self.font_size * GLYPH_ADVANCE_RATIO;

        let mut runs: Vec<Vec<(char, f64)>> = vec![Vec::new()];
        let mut tx = 0.0;
        for segment in segments {
            match segment {
                Segment::Text(text) => {
                    for c in text.chars() {
                        if let Some(run) = runs.last_mut() {
                            run.push((c, tx));
                        }
                        tx += advance;
                    }
                },
                Segment::Adjust(amount) => {
                    if *amount <= -TJ_WORD_GAP {
                        runs.push(Vec::new());
                    }
                    tx -= amount / 1000.0 * self.font_size;
                },
            }
        }

        let page_height = self.media_box[3] - self.media_box[1];
        for run in &runs {
            let Some(first) = run.iter().position(|(c, _)| !c.is_whitespace()) else {
                continue;
            };
            let last = run.iter().rposition(|(c, _)| !c.is_whitespace()).unwrap_or(first);
            let text: String = run[first..=last].iter().map(|(c, _)| *c).collect();

            let (x0, baseline) = render.transform_point(run[first].1, 0.0);
            let (x1, _) = render.transform_point(run[last].1 + advance, 0.0);
            let baseline = baseline - self.media_box[1];
            let top = page_height - (baseline + size);
            let bottom = page_height - baseline;
            let left = x0.min(x1) - self.media_box[0];
            let right = x0.max(x1) - self.media_box[0];

            let word = PositionedWord::new(text, top, bottom, left, right)
                .with_font(self.font.name.clone(), size)
                .with_weight(self.font.weight);
            self.words.push(word);
        }

        self.text_matrix = self.text_matrix.translate(tx, 0.0);
    }
}

enum Segment {
    Text(String),
    Adjust(f64),
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// UTF-16BE when the string carries a byte-order mark, Latin-1 otherwise.
fn decode_text(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// `ABCDEF+Helvetica` → `Helvetica`.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((prefix, rest)) if prefix.len() == 6 && prefix.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}
