//! Browser session abstraction.
//!
//! The engine never opens sockets itself. Everything network-bound goes
//! through a [`BrowserSession`]: rendering a search results page, querying
//! the rendered page for links and text, and downloading candidate files
//! with the same session state (cookies) the search page established.
//!
//! [`HttpSession`] is the bundled implementation over a plain HTTP client.
//! Sessions backed by a real headless browser plug in through the same trait.

mod http;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;

pub use http::HttpSession;

/// A page the session has navigated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status of the navigation
    pub status: u16,
    /// Rendered document markup
    pub html: String,
}

impl RenderedPage {
    pub fn new(url: impl Into<String>, status: u16, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            html: html.into(),
        }
    }

    /// False while nothing has been rendered yet.
    pub fn has_body(&self) -> bool {
        !self.html.trim().is_empty()
    }
}

/// What to read out of a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageQuery {
    /// Absolute targets of every `<a href>`
    AnchorHrefs,
    /// Absolute URLs held in `data-href`, `data-url`, `data-src`, `data-link`, `data-pdf`
    DataAttributeLinks,
    /// Visible text of the page body, one entry per text run
    VisibleText,
}

/// Raw response to a direct request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Session used to render search pages and download candidates.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to `url` and return the rendered page.
    ///
    /// Non-2xx pages are still returned; only transport failures and
    /// timeouts are errors.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<RenderedPage, BrowserError>;

    /// Read strings out of a rendered page.
    async fn evaluate(&self, page: &RenderedPage, query: PageQuery) -> Vec<String>;

    /// Fetch raw bytes reusing the session's cookies.
    async fn request_bytes(&self, url: &str, timeout: Duration)
    -> Result<HttpResponse, BrowserError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_body() {
        assert!(!RenderedPage::new("https://a", 200, "  \n").has_body());
        assert!(RenderedPage::new("https://a", 200, "<html></html>").has_body());
    }

    #[test]
    fn test_response_success_range() {
        let ok = HttpResponse { status: 204, body: Vec::new() };
        let redirect = HttpResponse { status: 302, body: Vec::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
