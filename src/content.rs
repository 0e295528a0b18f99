use reqwest::header::USER_AGENT;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use crate::config::ContentSourceConfig;
use crate::error::FetchError;

const SKIPPED_ANCESTORS: [&str; 4] = ["script", "style", "nav", "footer"];

/// Fetches a page and reduces it to the text worth mining for keywords.
#[derive(Clone)]
pub struct ContentSource {
    client: reqwest::Client,
    config: ContentSourceConfig,
}

impl ContentSource {
    pub fn new(config: ContentSourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|err| FetchError::Client(err.to_string()))?;
        Ok(Self { client, config })
    }

    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let network_error = |err: reqwest::Error| {
            if err.is_timeout() {
                FetchError::Timeout(url.to_string())
            } else {
                FetchError::Network {
                    url: url.to_string(),
                    message: err.to_string(),
                }
            }
        };

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.config.user_agent.as_str())
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(network_error)?;
        let text = extract_page_text(&html, self.config.max_paragraphs);
        Ok(text.chars().take(self.config.max_chars).collect())
    }
}

/// Title, meta description, h1-h3 headings and the leading paragraphs of the
/// main content, joined by spaces. Script, style, nav and footer content is
/// ignored.
pub fn extract_page_text(html: &str, max_paragraphs: usize) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<String> = Vec::new();

    parts.extend(select_texts(&document, "title").into_iter().take(1));

    if let Ok(selector) = Selector::parse("meta[name=\"description\"]") {
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
        {
            let content = compact_ws(content);
            if !content.is_empty() {
                parts.push(content);
            }
        }
    }

    parts.extend(select_texts(&document, "h1, h2, h3"));

    let main = ["main", "article", "body"].iter().find_map(|name| {
        let selector = Selector::parse(name).ok()?;
        document.select(&selector).next()
    });
    if let (Some(main), Ok(paragraph)) = (main, Selector::parse("p")) {
        parts.extend(
            main.select(&paragraph)
                .filter(|element| !is_skipped(element))
                .take(max_paragraphs)
                .map(element_text)
                .filter(|text| !text.is_empty()),
        );
    }

    parts.join(" ")
}

fn select_texts(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter(|element| !is_skipped(element))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn is_skipped(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| SKIPPED_ANCESTORS.contains(&ancestor.value().name()))
}

fn element_text(element: ElementRef<'_>) -> String {
    compact_ws(&element.text().collect::<String>())
}

fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
