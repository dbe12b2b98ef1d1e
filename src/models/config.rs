//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{SearchEngine, SearchLevel};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP session and pacing settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Query planning and link extraction settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Document acceptance thresholds
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Source trust tiers for candidate ranking
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(AppError::validation("crawler.user_agents is empty"));
        }
        if self.crawler.navigation_timeout_ms == 0 {
            return Err(AppError::validation(
                "crawler.navigation_timeout_ms must be > 0",
            ));
        }
        if self.crawler.download_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.download_timeout_secs must be > 0",
            ));
        }
        self.crawler.query_delay_ms.validate("crawler.query_delay_ms")?;
        self.crawler.term_delay_ms.validate("crawler.term_delay_ms")?;
        if self.search.engines.is_empty() {
            return Err(AppError::validation("search.engines is empty"));
        }
        if self.search.document_extensions.is_empty() {
            return Err(AppError::validation("search.document_extensions is empty"));
        }
        if !(self.validation.match_threshold > 0.0 && self.validation.match_threshold <= 1.0) {
            return Err(AppError::validation(
                "validation.match_threshold must be in (0, 1]",
            ));
        }
        if self.validation.sample_pages == 0 {
            return Err(AppError::validation("validation.sample_pages must be > 0"));
        }
        if self.paths.download_dir.as_os_str().is_empty() {
            return Err(AppError::validation("paths.download_dir is empty"));
        }
        Ok(())
    }
}

/// HTTP session and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent headers; one is picked at random per session
    #[serde(default = "defaults::user_agents")]
    pub user_agents: Vec<String>,

    /// Accept-Language header sent with every request
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Timeout for rendering a search results page
    #[serde(default = "defaults::navigation_timeout")]
    pub navigation_timeout_ms: u64,

    /// Timeout for downloading a candidate document
    #[serde(default = "defaults::download_timeout")]
    pub download_timeout_secs: u64,

    /// Settle delay after each search page navigation
    #[serde(default = "defaults::query_delay")]
    pub query_delay_ms: DelayRange,

    /// Pause between two terms of a batch
    #[serde(default = "defaults::term_delay")]
    pub term_delay_ms: DelayRange,
}

impl CrawlerConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agents: defaults::user_agents(),
            accept_language: defaults::accept_language(),
            navigation_timeout_ms: defaults::navigation_timeout(),
            download_timeout_secs: defaults::download_timeout(),
            query_delay_ms: defaults::query_delay(),
            term_delay_ms: defaults::term_delay(),
        }
    }
}

/// Inclusive millisecond bounds for a randomized pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// A range that never pauses.
    pub const fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.max == 0
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.min > self.max {
            return Err(AppError::validation(format!("{name}: min must be <= max")));
        }
        Ok(())
    }
}

/// Query planning and link extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Depth used when the caller does not pick one
    #[serde(default)]
    pub level: SearchLevel,

    /// Engines in priority order
    #[serde(default = "defaults::engines")]
    pub engines: Vec<SearchEngine>,

    /// Document-sharing hosts used for `site:` queries
    #[serde(default = "defaults::site_hosts")]
    pub site_hosts: Vec<String>,

    /// File extensions that mark a link as a document
    #[serde(default = "defaults::document_extensions")]
    pub document_extensions: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            level: SearchLevel::default(),
            engines: defaults::engines(),
            site_hosts: defaults::site_hosts(),
            document_extensions: defaults::document_extensions(),
        }
    }
}

/// Document acceptance thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum page count (inclusive)
    #[serde(default = "defaults::min_pages")]
    pub min_pages: usize,

    /// Fraction of term tokens that must appear in the sample (inclusive)
    #[serde(default = "defaults::match_threshold")]
    pub match_threshold: f64,

    /// Number of leading pages sampled for text
    #[serde(default = "defaults::sample_pages")]
    pub sample_pages: usize,

    /// Words ignored when tokenizing a term
    #[serde(default = "defaults::stop_words")]
    pub stop_words: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_pages: defaults::min_pages(),
            match_threshold: defaults::match_threshold(),
            sample_pages: defaults::sample_pages(),
            stop_words: defaults::stop_words(),
        }
    }
}

/// Source trust tiers. Lower tiers are tried first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Tier 0: academic and preprint repositories
    #[serde(default = "defaults::academic_hosts")]
    pub academic_hosts: Vec<String>,

    /// Tier 1: institutional host suffixes
    #[serde(default = "defaults::institutional_suffixes")]
    pub institutional_suffixes: Vec<String>,

    /// Tier 1: library/repository path fragments
    #[serde(default = "defaults::institutional_paths")]
    pub institutional_paths: Vec<String>,

    /// Tier 2: archives and aggregators
    #[serde(default = "defaults::archive_hosts")]
    pub archive_hosts: Vec<String>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            academic_hosts: defaults::academic_hosts(),
            institutional_suffixes: defaults::institutional_suffixes(),
            institutional_paths: defaults::institutional_paths(),
            archive_hosts: defaults::archive_hosts(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory receiving `<slug>.pdf` files
    #[serde(default = "defaults::download_dir")]
    pub download_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            download_dir: defaults::download_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when RUST_LOG is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::DelayRange;
    use crate::models::SearchEngine;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    // Crawler defaults
    pub fn user_agents() -> Vec<String> {
        strings(&[
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
            "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
        ])
    }
    pub fn accept_language() -> String {
        "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7".into()
    }
    pub fn navigation_timeout() -> u64 {
        20_000
    }
    pub fn download_timeout() -> u64 {
        300
    }
    pub fn query_delay() -> DelayRange {
        DelayRange::new(2_000, 4_000)
    }
    pub fn term_delay() -> DelayRange {
        DelayRange::new(5_000, 10_000)
    }

    // Search defaults
    pub fn engines() -> Vec<SearchEngine> {
        SearchEngine::ALL.to_vec()
    }
    pub fn site_hosts() -> Vec<String> {
        strings(&[
            "archive.org",
            "academia.edu",
            "researchgate.net",
            "scribd.com",
            "docplayer.com.br",
            "dokumen.pub",
            "vdoc.pub",
            "epdf.pub",
            "pdfcoffee.com",
            "studocu.com",
        ])
    }
    pub fn document_extensions() -> Vec<String> {
        strings(&["pdf"])
    }

    // Validation defaults
    pub fn min_pages() -> usize {
        50
    }
    pub fn match_threshold() -> f64 {
        0.70
    }
    pub fn sample_pages() -> usize {
        10
    }
    pub fn stop_words() -> Vec<String> {
        strings(&[
            "para", "pela", "pelo", "como", "sobre", "seus", "suas", "entre", "with", "from",
            "that", "this", "their", "edicao", "edition", "volume",
        ])
    }

    // Ranking defaults
    pub fn academic_hosts() -> Vec<String> {
        strings(&[
            "arxiv.org",
            "semanticscholar.org",
            "core.ac.uk",
            "citeseerx.ist.psu.edu",
            "ncbi.nlm.nih.gov",
            "scielo.br",
            "scielo.org",
            "ssrn.com",
            "zenodo.org",
            "hal.science",
            "researchgate.net",
            "academia.edu",
        ])
    }
    pub fn institutional_suffixes() -> Vec<String> {
        strings(&[".edu", ".gov", ".edu.br", ".gov.br", ".ac.uk", ".edu.pt"])
    }
    pub fn institutional_paths() -> Vec<String> {
        strings(&[
            "/library",
            "/biblioteca",
            "/repository",
            "/repositorio",
            "/bitstream",
            "/handle/",
        ])
    }
    pub fn archive_hosts() -> Vec<String> {
        strings(&[
            "archive.org",
            "scribd.com",
            "dokumen.pub",
            "vdoc.pub",
            "epdf.pub",
            "docplayer.com.br",
            "docplayer.net",
            "studocu.com",
            "pdfcoffee.com",
            "idoc.pub",
            "kupdf.net",
            "yumpu.com",
        ])
    }

    // Path defaults
    pub fn download_dir() -> PathBuf {
        PathBuf::from("bibliografia_pdf")
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
