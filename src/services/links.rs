// src/services/links.rs

//! Candidate link extraction and ranking.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::browser::{BrowserSession, PageQuery, RenderedPage};
use crate::models::{RankingConfig, SearchLevel};
use crate::services::SeenRegistry;
use crate::utils::url::{get_domain, host_matches, is_document_url, normalize, unwrap_redirect};

static TEXT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s"'<>]+"#).expect("valid URL pattern"));

/// Source trust tier; lower is tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TrustTier {
    Academic = 0,
    Institutional = 1,
    Archive = 2,
    Other = 3,
}

/// Extracts, deduplicates and ranks document links from a results page.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    extensions: Vec<String>,
    ranking: RankingConfig,
}

impl LinkExtractor {
    pub fn new(extensions: Vec<String>, ranking: RankingConfig) -> Self {
        Self {
            extensions,
            ranking,
        }
    }

    /// Candidate document URLs on `page`, best first, capped by `level`.
    ///
    /// Links whose normalized form was returned before (for any term) are
    /// dropped; the rest are recorded in `seen`. Never fails: a page without
    /// body or links yields an empty list.
    pub async fn extract(
        &self,
        session: &dyn BrowserSession,
        page: &RenderedPage,
        level: SearchLevel,
        seen: &SeenRegistry,
    ) -> Vec<String> {
        if !page.has_body() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for href in session.evaluate(page, PageQuery::AnchorHrefs).await {
            if let Some(target) = unwrap_redirect(&href) {
                found.push(target);
            }
            found.push(href);
        }
        found.extend(session.evaluate(page, PageQuery::DataAttributeLinks).await);
        for text in session.evaluate(page, PageQuery::VisibleText).await {
            found.extend(urls_in_text(&text));
        }

        let candidates = self.select(found, seen);
        log::debug!("{} new candidates on {}", candidates.len(), page.url);
        self.rank_and_cap(candidates, level)
    }

    /// Keep document links, drop exact repeats and already-seen resources.
    fn select(&self, found: Vec<String>, seen: &SeenRegistry) -> Vec<String> {
        let mut exact = HashSet::new();
        found
            .into_iter()
            .filter(|url| is_document_url(url, &self.extensions))
            .filter(|url| exact.insert(url.clone()))
            .filter(|url| seen.mark_url(&normalize(url)))
            .collect()
    }

    fn rank_and_cap(&self, mut candidates: Vec<String>, level: SearchLevel) -> Vec<String> {
        // Stable: discovery order is kept within a tier
        candidates.sort_by_key(|url| self.tier(url));
        if let Some(cap) = level.cap() {
            candidates.truncate(cap);
        }
        candidates
    }

    /// Trust tier of a candidate URL.
    pub fn tier(&self, url: &str) -> TrustTier {
        let Some(host) = get_domain(url) else {
            return TrustTier::Other;
        };
        let matches_any =
            |domains: &[String]| domains.iter().any(|domain| host_matches(&host, domain));

        if matches_any(&self.ranking.academic_hosts) {
            return TrustTier::Academic;
        }

        let path = ::url::Url::parse(url)
            .map(|u| u.path().to_lowercase())
            .unwrap_or_default();
        if matches_any(&self.ranking.institutional_suffixes)
            || self
                .ranking
                .institutional_paths
                .iter()
                .any(|fragment| path.contains(&fragment.to_lowercase()))
        {
            return TrustTier::Institutional;
        }

        if matches_any(&self.ranking.archive_hosts) {
            return TrustTier::Archive;
        }
        TrustTier::Other
    }
}

/// URLs appearing in free text, with trailing punctuation removed.
fn urls_in_text(text: &str) -> Vec<String> {
    TEXT_URL
        .find_iter(text)
        .map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', ')', ']', '}', '!', '?'])
                .to_string()
        })
        .collect()
}
