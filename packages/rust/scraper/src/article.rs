//! Lead-description extraction from an article detail page.

use scraper::{Html, Selector};

use blogsmith_shared::DEFAULT_DESCRIPTION;

/// Paragraph selectors in search priority order: article/post-content
/// containers first, then any paragraph on the page.
const PARAGRAPH_SELECTORS: [&str; 3] = ["article p", ".post-content p", "p"];

/// Extract the first paragraph of body text from a detail page.
///
/// Returns [`DEFAULT_DESCRIPTION`] when the page has no paragraph element
/// with visible text; a missing description is never an error.
pub fn extract_description(html: &str) -> String {
    let doc = Html::parse_document(html);

    for raw in PARAGRAPH_SELECTORS {
        let selector = Selector::parse(raw).expect("valid selector");
        let first = doc
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .find(|text| !text.is_empty());

        if let Some(text) = first {
            return text;
        }
    }

    DEFAULT_DESCRIPTION.to_string()
}
