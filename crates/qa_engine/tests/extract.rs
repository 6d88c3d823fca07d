use std::sync::Arc;

use pretty_assertions::assert_eq;
use qa_core::{Source, TableRow, TextUnit};
use qa_engine::{
    decode_text, discover_pdf_links, ContainerExtractor, Document, ExtractError, Extractor,
    LopdfBackend, PageText, PdfBackend, PdfExtractor, TableExtractor,
};

fn html_document(html: &str) -> Document {
    Document::from_bytes(
        Source::page("https://example.test/articles?page=1"),
        html.as_bytes().to_vec(),
        Some("text/html; charset=utf-8"),
    )
}

fn article_extractor() -> ContainerExtractor {
    ContainerExtractor::new("div.article-container", "h2", "p").expect("selectors")
}

#[test]
fn container_extraction_pairs_title_with_body() {
    let html = r#"
        <div class="article-container"><h2> Li-ion Aging </h2><p>Cells degrade with cycling.</p></div>
        <div class="article-container"><h2>Solid State</h2><p>Higher energy density.</p><p>ignored</p></div>
    "#;

    let extraction = article_extractor()
        .extract(&html_document(html))
        .expect("extract ok");

    assert!(extraction.issues.is_empty());
    assert_eq!(
        extraction.units,
        vec![
            TextUnit::titled(0, "Li-ion Aging", "Cells degrade with cycling."),
            TextUnit::titled(1, "Solid State", "Higher energy density."),
        ]
    );
}

#[test]
fn container_missing_body_is_skipped_with_structure_mismatch() {
    let html = r#"
        <div class="article-container"><h2>No body here</h2></div>
        <div class="article-container"><h2>Kept</h2><p>Body.</p></div>
    "#;

    let extraction = article_extractor().extract_html(html);

    assert_eq!(extraction.units, vec![TextUnit::titled(1, "Kept", "Body.")]);
    assert_eq!(
        extraction.issues,
        vec![ExtractError::StructureMismatch {
            unit: 0,
            missing: "p".to_string()
        }]
    );
}

#[test]
fn page_without_containers_reports_not_found() {
    let extraction = article_extractor().extract_html("<html><body>nothing</body></html>");

    assert!(extraction.units.is_empty());
    assert_eq!(
        extraction.issues,
        vec![ExtractError::NotFound {
            selector: "div.article-container".to_string()
        }]
    );
}

#[test]
fn invalid_selector_is_rejected_up_front() {
    let err = ContainerExtractor::new("div[", "h2", "p").unwrap_err();
    assert!(matches!(err, ExtractError::InvalidSelector { .. }));
}

#[test]
fn table_rows_are_keyed_by_header() {
    let html = r#"
        <table>
          <thead><tr><th>Material</th><th> Capacity </th></tr></thead>
          <tbody>
            <tr><td>LiFePO4</td><td>170</td></tr>
            <tr><td>NMC811</td><td>200</td><td>surplus</td></tr>
          </tbody>
        </table>
    "#;

    let extraction = TableExtractor::new("table")
        .expect("selector")
        .extract(&html_document(html))
        .expect("extract ok");

    let expected: Vec<TableRow> = vec![
        [("Material", "LiFePO4"), ("Capacity", "170")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        [("Material", "NMC811"), ("Capacity", "200")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    ];
    assert!(extraction.issues.is_empty());
    assert_eq!(extraction.units, expected);
    let headers: Vec<_> = extraction.units[0].keys().cloned().collect();
    assert_eq!(headers, vec!["Material", "Capacity"]);
}

#[test]
fn missing_table_yields_no_rows_and_not_found() {
    let extraction = TableExtractor::new("table.battery-data")
        .expect("selector")
        .extract_html("<html><table><tr><td>x</td></tr></table></html>");

    assert!(extraction.units.is_empty());
    assert_eq!(
        extraction.issues,
        vec![ExtractError::NotFound {
            selector: "table.battery-data".to_string()
        }]
    );
}

struct FakePdf;

impl PdfBackend for FakePdf {
    fn page_texts(&self, bytes: &[u8]) -> Result<Vec<PageText>, ExtractError> {
        if bytes != b"fake pdf" {
            return Err(ExtractError::Pdf("not a pdf".to_string()));
        }
        Ok(vec![
            Ok("First page.".to_string()),
            Err("unsupported font".to_string()),
            Ok("Third page.".to_string()),
        ])
    }
}

#[test]
fn failed_pdf_page_becomes_empty_unit_and_issue() {
    let extractor = PdfExtractor::new(Arc::new(FakePdf));

    let extraction = extractor.extract_bytes(b"fake pdf").expect("document opens");

    assert_eq!(
        extraction.units,
        vec![
            TextUnit::new(0, "First page."),
            TextUnit::new(1, ""),
            TextUnit::new(2, "Third page."),
        ]
    );
    assert_eq!(
        extraction.issues,
        vec![ExtractError::Pdf("page 2: unsupported font".to_string())]
    );
}

#[test]
fn unreadable_pdf_fails_the_whole_document() {
    let extractor = PdfExtractor::new(Arc::new(FakePdf));
    assert!(extractor.extract_bytes(b"something else").is_err());
}

#[test]
fn lopdf_backend_rejects_garbage_bytes() {
    let err = LopdfBackend.page_texts(b"definitely not a pdf").unwrap_err();
    assert!(matches!(err, ExtractError::Pdf(_)));
}

#[test]
fn pdf_links_are_discovered_and_resolved() {
    let html = r#"
        <ol>
          <li class="arxiv-result"><a href="/abs/1">abs</a> <a href="/pdf/2410.23303">pdf</a></li>
          <li class="arxiv-result"><a href="https://arxiv.org/pdf/2401.00001"> pdf </a></li>
          <li class="arxiv-result"><a href="/abs/3">abs</a></li>
          <li class="arxiv-result"><a href="/pdf/2402.00002">pdf</a></li>
        </ol>
    "#;

    let links = discover_pdf_links(html, "https://arxiv.org", 3);

    assert_eq!(
        links,
        vec![
            "https://arxiv.org/pdf/2410.23303",
            "https://arxiv.org/pdf/2401.00001"
        ]
    );
}

#[test]
fn content_type_charset_drives_decoding() {
    // "Café" in windows-1252.
    let bytes = [0x43, 0x61, 0x66, 0xE9];
    let decoded = decode_text(&bytes, Some("text/html; charset=windows-1252")).unwrap();
    assert_eq!(decoded.text, "Café");
}

#[test]
fn bom_wins_over_content_type() {
    let bytes = [0xEF, 0xBB, 0xBF, b'o', b'k'];
    let decoded = decode_text(&bytes, Some("text/html; charset=windows-1252")).unwrap();
    assert_eq!(decoded.text, "ok");
}
