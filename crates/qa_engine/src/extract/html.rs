use qa_core::TextUnit;
use scraper::{Html, Selector};

use super::{decode_html, first_text, parse_selector, ExtractError, Extraction, Extractor};
use crate::Document;

/// One text unit per container element, titled by its first title element and
/// filled with its first body element.
#[derive(Debug, Clone)]
pub struct ContainerExtractor {
    container_selector: String,
    container: Selector,
    title_selector: String,
    title: Selector,
    body_selector: String,
    body: Selector,
}

impl ContainerExtractor {
    pub fn new(container: &str, title: &str, body: &str) -> Result<Self, ExtractError> {
        Ok(Self {
            container_selector: container.to_string(),
            container: parse_selector(container)?,
            title_selector: title.to_string(),
            title: parse_selector(title)?,
            body_selector: body.to_string(),
            body: parse_selector(body)?,
        })
    }

    pub fn extract_html(&self, html: &str) -> Extraction<TextUnit> {
        let doc = Html::parse_document(html);
        let mut extraction = Extraction::default();
        let mut matched = 0;

        for (index, element) in doc.select(&self.container).enumerate() {
            matched += 1;
            let Some(title) = first_text(element, &self.title) else {
                extraction.issues.push(ExtractError::StructureMismatch {
                    unit: index,
                    missing: self.title_selector.clone(),
                });
                continue;
            };
            let Some(body) = first_text(element, &self.body) else {
                extraction.issues.push(ExtractError::StructureMismatch {
                    unit: index,
                    missing: self.body_selector.clone(),
                });
                continue;
            };
            extraction.units.push(TextUnit::titled(index, title, body));
        }

        if matched == 0 {
            extraction.issues.push(ExtractError::NotFound {
                selector: self.container_selector.clone(),
            });
        }
        extraction
    }
}

impl Extractor for ContainerExtractor {
    type Unit = TextUnit;

    fn extract(&self, document: &Document) -> Result<Extraction<TextUnit>, ExtractError> {
        let html = decode_html(document)?;
        Ok(self.extract_html(&html))
    }
}
