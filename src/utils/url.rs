// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Query parameters search engines use to wrap outbound result links.
const REDIRECT_PARAMS: [&str; 4] = ["uddg", "url", "q", "u"];

/// Dedup key for a candidate link: scheme + host + path.
///
/// Query string and fragment are dropped, so mirrors of the same file that
/// differ only in tracking parameters collapse to one key.
///
/// # Examples
/// ```
/// use bibcrawler::utils::url::normalize;
///
/// assert_eq!(
///     normalize("https://Example.com/books/a.pdf?download=1#page=2"),
///     "https://example.com/books/a.pdf"
/// );
/// ```
pub fn normalize(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("");
            match parsed.port() {
                Some(port) => format!("{}://{}:{}{}", parsed.scheme(), host, port, parsed.path()),
                None => format!("{}://{}{}", parsed.scheme(), host, parsed.path()),
            }
        }
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_string(),
    }
}

/// Extract the lowercase host from a URL.
///
/// # Examples
/// ```
/// use bibcrawler::utils::url::get_domain;
///
/// assert_eq!(
///     get_domain("https://Example.COM/path"),
///     Some("example.com".to_string())
/// );
/// ```
pub fn get_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}

/// True when `host` is `domain` or one of its subdomains.
pub fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.');
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// True for an http(s) URL whose path ends in one of `extensions`.
///
/// The check ignores case and any query string or fragment.
pub fn is_document_url(url: &str, extensions: &[String]) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    let path = parsed.path().to_lowercase();
    extensions.iter().any(|ext| {
        let ext = ext.trim_start_matches('.').to_lowercase();
        path.strip_suffix(&ext)
            .is_some_and(|rest| rest.ends_with('.'))
    })
}

/// Target of a search-engine redirect link, if `url` wraps one.
///
/// Handles the `uddg=` (DuckDuckGo), `url=`/`q=` (Google) and `u=` styles
/// when the parameter holds a plain absolute URL.
pub fn unwrap_redirect(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, value)| {
            REDIRECT_PARAMS.contains(&key.as_ref())
                && (value.starts_with("http://") || value.starts_with("https://"))
        })
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> Vec<String> {
        vec!["pdf".to_string()]
    }

    #[test]
    fn test_normalize_ignores_query_and_fragment() {
        assert_eq!(
            normalize("https://example.com/a/book.pdf?x=1"),
            normalize("https://example.com/a/book.pdf?y=2&z=3")
        );
        assert_eq!(
            normalize("https://example.com/a/book.pdf#page=4"),
            "https://example.com/a/book.pdf"
        );
    }

    #[test]
    fn test_normalize_keeps_scheme_and_port() {
        assert_ne!(
            normalize("http://example.com/a.pdf"),
            normalize("https://example.com/a.pdf")
        );
        assert_eq!(
            normalize("https://example.com:8443/a.pdf?x"),
            "https://example.com:8443/a.pdf"
        );
    }

    #[test]
    fn test_normalize_unparsable_input() {
        assert_eq!(normalize("not a url?x=1"), "not a url");
    }

    #[test]
    fn test_get_domain() {
        assert_eq!(
            get_domain("https://sub.example.com:8080/path"),
            Some("sub.example.com".to_string())
        );
        assert_eq!(get_domain("invalid-url"), None);
    }

    #[test]
    fn test_host_matches() {
        assert!(host_matches("arxiv.org", "arxiv.org"));
        assert!(host_matches("export.arxiv.org", "arxiv.org"));
        assert!(!host_matches("notarxiv.org", "arxiv.org"));
        assert!(host_matches("www.ufrj.edu.br", ".edu.br"));
    }

    #[test]
    fn test_is_document_url() {
        assert!(is_document_url("https://example.com/book.pdf", &pdf()));
        assert!(is_document_url("https://example.com/BOOK.PDF?dl=1", &pdf()));
        assert!(is_document_url("http://example.com/book.pdf#page=3", &pdf()));
        assert!(!is_document_url("https://example.com/book.pdf.html", &pdf()));
        assert!(!is_document_url("https://example.com/view?file=book.pdf", &pdf()));
        assert!(!is_document_url("ftp://example.com/book.pdf", &pdf()));
        assert!(!is_document_url("https://example.com/mypdf", &pdf()));
    }

    #[test]
    fn test_unwrap_redirect() {
        assert_eq!(
            unwrap_redirect(
                "https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fbook.pdf&rut=abc"
            ),
            Some("https://example.com/book.pdf".to_string())
        );
        assert_eq!(
            unwrap_redirect("https://www.google.com/url?q=https://example.com/b.pdf&sa=U"),
            Some("https://example.com/b.pdf".to_string())
        );
        assert_eq!(unwrap_redirect("https://www.bing.com/search?q=clean+code"), None);
    }
}
