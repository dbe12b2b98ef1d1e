// src/browser/http.rs

//! Browser session over a plain HTTP client.
//!
//! Pages are fetched with `reqwest` and queried with `scraper`. No script is
//! executed, so engines that build their results client-side yield fewer
//! links here than in a real browser.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::browser::{BrowserSession, HttpResponse, PageQuery, RenderedPage};
use crate::error::{AppError, BrowserError, Result};
use crate::models::CrawlerConfig;
use crate::utils::http::create_async_client;
use crate::utils::resolve_url;

/// Attributes that may carry a link outside of `href`.
const DATA_LINK_ATTRS: [&str; 5] = ["data-href", "data-url", "data-src", "data-link", "data-pdf"];

/// Elements whose text never renders.
const HIDDEN_TEXT_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// HTTP-only browser session. Cookies persist across requests.
pub struct HttpSession {
    client: Client,
    anchors: Selector,
    data_links: Selector,
    body: Selector,
}

impl HttpSession {
    /// Create a session from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Self::with_client(create_async_client(config)?)
    }

    /// Create a session around an existing client.
    pub fn with_client(client: Client) -> Result<Self> {
        let data_selector = DATA_LINK_ATTRS
            .iter()
            .map(|attr| format!("[{attr}]"))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            client,
            anchors: parse_selector("a[href]")?,
            data_links: parse_selector(&data_selector)?,
            body: parse_selector("body")?,
        })
    }

    fn query(&self, page: &RenderedPage, query: PageQuery) -> Vec<String> {
        let document = Html::parse_document(&page.html);
        let base = Url::parse(&page.url).ok();
        let absolute = |href: &str| match &base {
            Some(base) => resolve_url(base, href.trim()),
            None => href.trim().to_string(),
        };

        match query {
            PageQuery::AnchorHrefs => document
                .select(&self.anchors)
                .filter_map(|a| a.value().attr("href"))
                .map(absolute)
                .collect(),
            PageQuery::DataAttributeLinks => document
                .select(&self.data_links)
                .flat_map(|el| {
                    DATA_LINK_ATTRS
                        .iter()
                        .filter_map(move |attr| el.value().attr(attr))
                })
                .map(absolute)
                .collect(),
            PageQuery::VisibleText => document
                .select(&self.body)
                .flat_map(|body| body.descendants())
                .filter(|node| {
                    !node.ancestors().any(|parent| {
                        parent
                            .value()
                            .as_element()
                            .is_some_and(|el| HIDDEN_TEXT_TAGS.contains(&el.name()))
                    })
                })
                .filter_map(|node| node.value().as_text().map(|text| text.trim().to_string()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(
        &self,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<RenderedPage, BrowserError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let html = response.text().await.map_err(|e| classify(e, timeout))?;

        log::debug!("Rendered {} ({}, {} bytes)", final_url, status, html.len());
        Ok(RenderedPage::new(final_url, status, html))
    }

    async fn evaluate(&self, page: &RenderedPage, query: PageQuery) -> Vec<String> {
        self.query(page, query)
    }

    async fn request_bytes(
        &self,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<HttpResponse, BrowserError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, timeout))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| classify(e, timeout))?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> BrowserError {
    if error.is_timeout() {
        BrowserError::Timeout(timeout)
    } else {
        BrowserError::transport(error)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
