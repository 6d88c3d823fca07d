use qa_core::TableRow;
use scraper::{Html, Selector};

use super::{decode_html, element_text, parse_selector, ExtractError, Extraction, Extractor};
use crate::Document;

pub const DEFAULT_HEADER_SELECTOR: &str = "thead th";
pub const DEFAULT_ROW_SELECTOR: &str = "tbody tr";
pub const DEFAULT_CELL_SELECTOR: &str = "td";

/// Reads the first table matching a selector into header-keyed rows.
///
/// Cells are paired with headers by position: surplus cells are dropped, a
/// repeated header label keeps its first column position and the last value.
#[derive(Debug, Clone)]
pub struct TableExtractor {
    table_selector: String,
    table: Selector,
    header: Selector,
    row: Selector,
    cell: Selector,
}

impl TableExtractor {
    pub fn new(table: &str) -> Result<Self, ExtractError> {
        Self::with_parts(
            table,
            DEFAULT_HEADER_SELECTOR,
            DEFAULT_ROW_SELECTOR,
            DEFAULT_CELL_SELECTOR,
        )
    }

    pub fn with_parts(
        table: &str,
        header: &str,
        row: &str,
        cell: &str,
    ) -> Result<Self, ExtractError> {
        Ok(Self {
            table_selector: table.to_string(),
            table: parse_selector(table)?,
            header: parse_selector(header)?,
            row: parse_selector(row)?,
            cell: parse_selector(cell)?,
        })
    }

    pub fn extract_html(&self, html: &str) -> Extraction<TableRow> {
        let doc = Html::parse_document(html);
        let mut extraction = Extraction::default();

        let Some(table) = doc.select(&self.table).next() else {
            extraction.issues.push(ExtractError::NotFound {
                selector: self.table_selector.clone(),
            });
            return extraction;
        };

        let headers: Vec<String> = table.select(&self.header).map(element_text).collect();
        for tr in table.select(&self.row) {
            let row: TableRow = headers
                .iter()
                .cloned()
                .zip(tr.select(&self.cell).map(element_text))
                .collect();
            extraction.units.push(row);
        }
        extraction
    }
}

impl Extractor for TableExtractor {
    type Unit = TableRow;

    fn extract(&self, document: &Document) -> Result<Extraction<TableRow>, ExtractError> {
        let html = decode_html(document)?;
        Ok(self.extract_html(&html))
    }
}
