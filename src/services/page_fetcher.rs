use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const SKIPPED_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];
const BLOCK_TAGS: [&str; 38] = [
    "address", "article", "aside", "blockquote", "br", "caption", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "li", "main", "nav", "ol", "option", "p", "pre", "section", "table",
    "tbody", "td", "th", "thead", "tr", "ul",
];

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("navigation timed out after {0:?}")]
    Timeout(Duration),
    #[error("navigation failed: {0}")]
    Navigation(String),
}

/// Loads a page and hands back its visible text.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Renderer for machines without a browser. Reads the served HTML as-is, so
/// text injected by scripts is never seen.
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| FetchError::Navigation(e.to_string()))?;

        Ok(HttpRenderer { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        let url = Url::parse(url)?;

        let res = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| reqwest_to_fetch_error(e, timeout))?;

        let html_content = res
            .text()
            .await
            .map_err(|e| reqwest_to_fetch_error(e, timeout))?;

        extract_visible_text(&html_content)
    }
}

fn reqwest_to_fetch_error(e: reqwest::Error, timeout: Duration) -> FetchError {
    match e.is_timeout() {
        true => FetchError::Timeout(timeout),
        false => FetchError::Navigation(e.to_string()),
    }
}

pub fn extract_visible_text(html_content: &str) -> Result<String, FetchError> {
    let body_selector =
        Selector::parse("body").map_err(|e| FetchError::Navigation(e.to_string()))?;
    let html_document = Html::parse_document(html_content);

    let root = html_document
        .select(&body_selector)
        .next()
        .unwrap_or_else(|| html_document.root_element());

    let mut text = String::new();
    push_visible_text(root, &mut text);

    Ok(text)
}

/// Text nodes are glued as-is so inline markup never splits a word; block
/// elements are padded with a space.
fn push_visible_text(element: ElementRef<'_>, text: &mut String) {
    for child in element.children() {
        if let Some(fragment) = child.value().as_text() {
            text.push_str(fragment);
            continue;
        }

        let Some(child_element) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child_element.value().name();
        if SKIPPED_TAGS.contains(&name) {
            continue;
        }

        let is_block = BLOCK_TAGS.contains(&name);
        if is_block {
            text.push(' ');
        }
        push_visible_text(child_element, text);
        if is_block {
            text.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::extract_visible_text;
    use crate::domain::page_text::normalize_text;

    #[test]
    fn extract_visible_text_skips_scripts() {
        let html = r#"
            <html>
                <head><title>Tea Shop</title><style>body { color: red; }</style></head>
                <body>
                    <h1>Organic Green Tea</h1>
                    <script>window.dataLayer = [];</script>
                    <p>Add to <b>cart</b></p>
                    <noscript>Enable JavaScript</noscript>
                </body>
            </html>
        "#;

        let text = normalize_text(&extract_visible_text(html).unwrap());

        assert_eq!(text, "Organic Green Tea Add to cart");
    }

    #[test]
    fn extract_visible_text_keeps_inline_split_words() {
        let html = "<html><body><p>Sh<b>oes</b> and <i>B</i>ags</p><p><a href=\"/buy\">B</a>uy now</p></body></html>";

        let text = normalize_text(&extract_visible_text(html).unwrap());

        assert_eq!(text, "Shoes and Bags Buy now");
    }

    #[test]
    fn extract_visible_text_separates_blocks() {
        let html = "<body><ul><li>Tea</li><li>Mugs</li></ul><div>Cart</div>Line<br>break<table><tr><td>A</td><td>B</td></tr></table></body>";

        let text = normalize_text(&extract_visible_text(html).unwrap());

        assert_eq!(text, "Tea Mugs Cart Line break A B");
    }

    #[test]
    fn extract_visible_text_empty_body() {
        let text = extract_visible_text("<html><body></body></html>").unwrap();

        assert_eq!(normalize_text(&text), "");
    }
}
