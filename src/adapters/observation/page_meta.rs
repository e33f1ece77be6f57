use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use tracing::debug;

use crate::app_error::{AppError, AppResult};

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<title.*?>(.*)</title>").expect("title pattern is valid"));
static ICON_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<link rel="(.*)?icon"(.*?)>"#).expect("icon pattern is valid"));
static ICON_HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"("/.*?")|("http.*?")"#).expect("href pattern is valid"));

/// Title and icon link of a domain's landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub logo: String,
}

#[derive(Clone)]
pub struct PageMetadataClient {
    client: Client,
}

impl PageMetadataClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, domain: &str) -> AppResult<PageMetadata> {
        let url = format!("http://{}", domain);

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamLookup(format!("Could not reach {}: {}", url, e)))?
            .text()
            .await
            .map_err(|e| AppError::UpstreamLookup(format!("Could not read {}: {}", url, e)))?;

        let meta = PageMetadata {
            title: extract_title(&body),
            logo: extract_logo(&body),
        };
        debug!(domain = %domain, title = %meta.title, logo = %meta.logo, "Page metadata");
        Ok(meta)
    }
}

/// First `<title>` contents on the page, empty when there is none.
pub fn extract_title(html: &str) -> String {
    TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Link target of the first icon `<link>` tag, without quotes.
pub fn extract_logo(html: &str) -> String {
    let Some(tag) = ICON_LINK_RE.find(html) else {
        return String::new();
    };
    ICON_HREF_RE
        .find(tag.as_str())
        .map(|m| m.as_str().trim_matches('"').to_string())
        .unwrap_or_default()
}
