// src/services/planner.rs

//! Query planning.
//!
//! Turns a bibliography entry into the ordered list of searches the item
//! pipeline walks through. Order is priority: the pipeline stops at the
//! first accepted document, so the highest-confidence queries come first.

use crate::models::{SearchConfig, SearchEngine, SearchQuery};

/// Exact-phrase templates; `{}` is replaced by the quoted term.
const EXACT_PHRASE: [&str; 8] = [
    "{} filetype:pdf",
    "livro {} filetype:pdf",
    "{} completo filetype:pdf",
    "{} pdf completo filetype:pdf",
    "{} ebook filetype:pdf",
    "{} download filetype:pdf",
    "{} grátis filetype:pdf",
    "{} book filetype:pdf",
];

/// Locale variants; `{}` is replaced by the bare term.
const LOCALE_VARIANTS: [&str; 12] = [
    "livro {} filetype:pdf",
    "pdf {} filetype:pdf",
    "{} livro completo pdf",
    "{} complete book pdf",
    "{} book pdf download",
    "{} full text pdf",
    "{} libro completo pdf",
    "{} descargar libro pdf",
    "{} livre complet pdf",
    "{} télécharger livre pdf",
    "{} libro completo pdf scaricare",
    "{} buch pdf herunterladen",
];

/// Author/title split of a term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermParts {
    pub title: String,
    pub author: Option<String>,
}

/// Split a term into title and author fragments.
///
/// With more than two words, the last two are taken as the author. This is a
/// best-effort guess used only to build extra query variants.
pub fn split_term(term: &str) -> TermParts {
    let words: Vec<&str> = term.split_whitespace().collect();
    if words.len() > 2 {
        let split = words.len() - 2;
        TermParts {
            title: words[..split].join(" "),
            author: Some(words[split..].join(" ")),
        }
    } else {
        TermParts {
            title: words.join(" "),
            author: None,
        }
    }
}

/// Builds the ordered query list for a term.
#[derive(Debug, Clone)]
pub struct QueryPlanner {
    engines: Vec<SearchEngine>,
    site_hosts: Vec<String>,
}

impl QueryPlanner {
    /// Engines keep their configured order; repeats are dropped.
    pub fn new(config: &SearchConfig) -> Self {
        let mut engines: Vec<SearchEngine> = Vec::with_capacity(config.engines.len());
        for engine in &config.engines {
            if !engines.contains(engine) {
                engines.push(*engine);
            }
        }
        if engines.is_empty() {
            engines = SearchEngine::ALL.to_vec();
        }
        Self {
            engines,
            site_hosts: config.site_hosts.clone(),
        }
    }

    /// Plan every query for `term`, highest priority first. Never empty.
    pub fn plan(&self, term: &str) -> Vec<SearchQuery> {
        let term = term.split_whitespace().collect::<Vec<_>>().join(" ");
        let quoted = format!("\"{term}\"");
        let mut texts: Vec<String> = Vec::new();

        // Exact phrase, restricted to documents
        texts.extend(EXACT_PHRASE.iter().map(|t| t.replace("{}", &quoted)));

        // Document-sharing hosts
        texts.extend(
            self.site_hosts
                .iter()
                .map(|host| format!("{term} site:{host} filetype:pdf")),
        );

        // Other languages widen recall
        texts.extend(LOCALE_VARIANTS.iter().map(|t| t.replace("{}", &term)));

        // Author/title split, or the full term when no author was found
        let parts = split_term(&term);
        match parts.author {
            Some(author) => {
                let title = parts.title;
                texts.push(format!("\"{title}\" {author} filetype:pdf"));
                texts.push(format!("{title} {author} pdf"));
                texts.push(format!("\"{title}\" pdf"));
                texts.push(format!("{author} {title} livro pdf"));
            }
            None => {
                texts.push(format!("{term} filetype:pdf"));
                texts.push(format!("{term} pdf"));
            }
        }

        // One cursor across all groups: consecutive queries never share an
        // engine while more than one engine is configured.
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| SearchQuery::new(text.trim(), self.engines[i % self.engines.len()]))
            .collect()
    }
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}
