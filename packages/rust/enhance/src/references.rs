//! Body-text extraction from reference pages.
//!
//! This stage never raises to its caller: any fetch or parse failure for an
//! individual URL degrades to an empty string so the rewrite still runs
//! with whatever references survived.

use reqwest::Client;
use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

/// Collect paragraph text from a reference page, joined by newlines.
///
/// Paragraphs inside article/post-content containers take priority; when
/// neither container exists, every paragraph on the page is used.
pub fn collect_paragraphs(html: &str) -> String {
    let doc = Html::parse_document(html);

    let container_selector =
        Selector::parse("article p, .post-content p").expect("valid selector");
    let fallback_selector = Selector::parse("p").expect("valid selector");

    let mut paragraphs: Vec<String> = doc
        .select(&container_selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if paragraphs.is_empty() {
        paragraphs = doc
            .select(&fallback_selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
    }

    paragraphs.join("\n")
}

/// Fetch a reference URL and extract its paragraph text.
///
/// Returns an empty string on any failure; the failure is logged and the
/// enhancement run continues with the remaining references.
pub async fn extract_reference_text(client: &Client, url: &Url) -> String {
    let response = match client.get(url.as_str()).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(%url, error = %e, "reference fetch failed, continuing without it");
            return String::new();
        }
    };

    if !response.status().is_success() {
        warn!(%url, status = %response.status(), "reference fetch failed, continuing without it");
        return String::new();
    }

    match response.text().await {
        Ok(html) => collect_paragraphs(&html),
        Err(e) => {
            warn!(%url, error = %e, "reference body read failed, continuing without it");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn container_paragraphs_joined_by_newlines() {
        let html = r#"<html><body>
            <p>Nav teaser</p>
            <article><p>First.</p><p>Second.</p></article>
        </body></html>"#;
        assert_eq!(collect_paragraphs(html), "First.\nSecond.");
    }

    #[test]
    fn falls_back_to_all_paragraphs() {
        let html = "<html><body><p>Alpha</p><div><p>Beta</p></div></body></html>";
        assert_eq!(collect_paragraphs(html), "Alpha\nBeta");
    }

    #[test]
    fn page_without_paragraphs_yields_empty() {
        assert_eq!(collect_paragraphs("<html><body><h1>Only</h1></body></html>"), "");
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/gone", server.uri())).unwrap();
        let text = extract_reference_text(&Client::new(), &url).await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn successful_fetch_extracts_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ref"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><body><article><p>Reference body.</p></article></body></html>",
            ))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/ref", server.uri())).unwrap();
        let text = extract_reference_text(&Client::new(), &url).await;
        assert_eq!(text, "Reference body.");
    }
}
