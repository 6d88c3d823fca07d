use scraper::{Html, Selector};
use url::Url;

const RESULT_SELECTOR: &str = "li.arxiv-result";
const PDF_LINK_TEXT: &str = "pdf";

/// PDF links from an arXiv search results page, at most `max` of them.
///
/// Only the first `max` results are inspected; a result without a `pdf`
/// anchor contributes nothing. Relative hrefs are resolved against `link_base`.
pub fn discover_pdf_links(html: &str, link_base: &str, max: usize) -> Vec<String> {
    let doc = Html::parse_document(html);
    let (Some(result_sel), Some(anchor_sel)) = (
        Selector::parse(RESULT_SELECTOR).ok(),
        Selector::parse("a[href]").ok(),
    ) else {
        return Vec::new();
    };
    let base = Url::parse(link_base).ok();

    doc.select(&result_sel)
        .take(max)
        .filter_map(|result| {
            result
                .select(&anchor_sel)
                .find(|a| a.text().collect::<String>().trim() == PDF_LINK_TEXT)
                .and_then(|a| a.value().attr("href"))
                .and_then(|href| resolve(href, base.as_ref()))
        })
        .collect()
}

fn resolve(href: &str, base: Option<&Url>) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    base?.join(href).ok().map(|url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use url::Url;

    #[test]
    fn relative_href_joins_base() {
        let base = Url::parse("https://arxiv.org").unwrap();
        assert_eq!(
            resolve("/pdf/2410.23303", Some(&base)).as_deref(),
            Some("https://arxiv.org/pdf/2410.23303")
        );
    }

    #[test]
    fn absolute_href_is_kept_and_missing_base_drops_relative() {
        assert_eq!(
            resolve("https://example.org/a.pdf", None).as_deref(),
            Some("https://example.org/a.pdf")
        );
        assert_eq!(resolve("/pdf/1", None), None);
    }
}
