//! Integration tests for PDF decoding through lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdf_textflow::source::{LopdfPageSource, PageSource};
use pdf_textflow::{Error, ExtractorConfig, PdfTextExtractor};
use std::io::Write;

/// Letter-sized document in Helvetica, one content stream per page.
fn build_pdf(page_operations: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for operations in page_operations {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// `BT /F1 12 Tf x y Td (text) Tj ET`
fn show_at(x: i64, y: i64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// A running title at the top and one body line per page.
fn report_pdf(bodies: &[&str]) -> Vec<u8> {
    let pages = bodies
        .iter()
        .map(|body| {
            let mut ops = show_at(72, 770, "Running Title");
            ops.extend(show_at(72, 400, body));
            ops
        })
        .collect();
    build_pdf(pages)
}

#[test]
fn test_pages_decoded_in_order() {
    let source = LopdfPageSource::from_bytes(&report_pdf(&["first", "second"])).unwrap();
    assert_eq!(source.page_count(), 2);

    let pages = source.load_pages().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].index, 1);
    assert_eq!(pages[1].index, 2);
    assert_eq!(pages[0].width, 612.0);
    assert_eq!(pages[0].height, 792.0);

    let texts: Vec<&str> = pages[1].words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, vec!["Running Title", "second"]);
    assert_eq!(pages[1].words[0].font_name, "Helvetica");
    assert_eq!(pages[1].words[0].top, 10.0);
}

#[test]
fn test_open_file_and_extract() {
    let bytes = report_pdf(&["Body text one", "Body text two", "Body text three"]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let extractor = PdfTextExtractor::open(file.path(), ExtractorConfig::default()).unwrap();
    assert_eq!(extractor.page_count(), 3);

    let (headers, _) = extractor.detect_headers_footers();
    assert!(headers.contains("Running Title"));

    assert_eq!(
        extractor.extract_lines(false),
        vec!["Body text one", "", "Body text two", "", "Body text three", ""]
    );
}

#[test]
fn test_title_words_reused_in_body() {
    let bytes = report_pdf(&["Title matters here", "The Title again", "A Title once more"]);
    let extractor = PdfTextExtractor::from_bytes(&bytes, ExtractorConfig::default()).unwrap();

    let (headers, footers) = extractor.detect_headers_footers();
    assert!(headers.contains("Running Title"));
    assert!(!headers.contains("Title"));
    assert!(footers.is_empty());

    let lines = extractor.extract_lines(false);
    assert!(lines.iter().all(|line| !line.contains("Running Title")));
    assert_eq!(
        lines,
        vec!["Title matters here", "", "The Title again", "", "A Title once more", ""]
    );
}

#[test]
fn test_flipped_ctm_page_reads_top_down() {
    let mut ops = vec![Operation::new(
        "cm",
        vec![1.into(), 0.into(), 0.into(), Object::Integer(-1), 0.into(), 792.into()],
    )];
    ops.extend(show_at(72, 100, "First paragraph"));
    ops.extend(show_at(72, 300, "Second paragraph"));
    let bytes = build_pdf(vec![ops]);

    let extractor = PdfTextExtractor::from_bytes(&bytes, ExtractorConfig::default()).unwrap();
    let first = &extractor.pages()[0].words[0];
    assert_eq!(first.text, "First paragraph");
    assert_eq!(first.top, 88.0);

    assert_eq!(
        extractor.extract_lines(false),
        vec!["First paragraph", "", "Second paragraph", ""]
    );
}

#[test]
fn test_from_bytes_matches_open() {
    let bytes = report_pdf(&["alpha", "beta"]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let from_file = PdfTextExtractor::open(file.path(), ExtractorConfig::default()).unwrap();
    let from_mem = PdfTextExtractor::from_bytes(&bytes, ExtractorConfig::default()).unwrap();
    assert_eq!(from_file.pages(), from_mem.pages());
}

#[test]
fn test_garbage_bytes_are_malformed() {
    let result = PdfTextExtractor::from_bytes(b"this is not a pdf", ExtractorConfig::default());
    assert!(matches!(result, Err(Error::MalformedDocument(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = PdfTextExtractor::open(dir.path().join("missing.pdf"), ExtractorConfig::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_invalid_config_checked_before_decoding() {
    let config = ExtractorConfig::new().with_min_repetition_ratio(0.0);
    let result = PdfTextExtractor::from_bytes(b"not a pdf", config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}
