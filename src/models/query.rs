// src/models/query.rs

//! Search engines, search depth and planned queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A web search engine the planner can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    Bing,
    Google,
    DuckDuckGo,
    Yandex,
    Brave,
    Startpage,
    Qwant,
}

impl SearchEngine {
    /// All engines, highest priority first.
    pub const ALL: [SearchEngine; 7] = [
        SearchEngine::Bing,
        SearchEngine::Google,
        SearchEngine::DuckDuckGo,
        SearchEngine::Yandex,
        SearchEngine::Brave,
        SearchEngine::Startpage,
        SearchEngine::Qwant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Bing => "bing",
            SearchEngine::Google => "google",
            SearchEngine::DuckDuckGo => "duckduckgo",
            SearchEngine::Yandex => "yandex",
            SearchEngine::Brave => "brave",
            SearchEngine::Startpage => "startpage",
            SearchEngine::Qwant => "qwant",
        }
    }

    /// Results page URL for a query on this engine.
    pub fn search_url(&self, query: &str) -> String {
        let q: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        match self {
            SearchEngine::Bing => format!("https://www.bing.com/search?q={q}"),
            SearchEngine::Google => format!("https://www.google.com/search?q={q}&num=30"),
            SearchEngine::DuckDuckGo => format!("https://html.duckduckgo.com/html/?q={q}"),
            SearchEngine::Yandex => format!("https://yandex.com/search/?text={q}"),
            SearchEngine::Brave => format!("https://search.brave.com/search?q={q}"),
            SearchEngine::Startpage => format!("https://www.startpage.com/do/search?q={q}"),
            SearchEngine::Qwant => format!("https://www.qwant.com/?q={q}&t=web"),
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search depth: how many candidates are tried per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchLevel {
    #[serde(alias = "rapido")]
    Quick,
    #[default]
    #[serde(alias = "moderado")]
    Moderate,
    #[serde(alias = "completo")]
    Thorough,
}

impl SearchLevel {
    /// Maximum candidates per query; `None` means every link found.
    pub fn cap(&self) -> Option<usize> {
        match self {
            SearchLevel::Quick => Some(5),
            SearchLevel::Moderate => Some(15),
            SearchLevel::Thorough => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchLevel::Quick => "quick",
            SearchLevel::Moderate => "moderate",
            SearchLevel::Thorough => "thorough",
        }
    }
}

impl fmt::Display for SearchLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick" | "rapido" => Ok(SearchLevel::Quick),
            "moderate" | "moderado" => Ok(SearchLevel::Moderate),
            "thorough" | "completo" => Ok(SearchLevel::Thorough),
            other => Err(format!(
                "unknown search level '{other}' (expected quick, moderate or thorough)"
            )),
        }
    }
}

/// One planned search: query text bound to the engine that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub text: String,
    pub engine: SearchEngine,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, engine: SearchEngine) -> Self {
        Self {
            text: text.into(),
            engine,
        }
    }

    /// Results page URL for this query.
    pub fn url(&self) -> String {
        self.engine.search_url(&self.text)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.engine, self.text)
    }
}
