// src/models/term.rs

//! Bibliography entries and the file names derived from them.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Number of characters of the term kept in its slug.
const SLUG_CHARS: usize = 50;

/// Lines shorter than this are not treated as bibliography entries.
const MIN_ENTRY_CHARS: usize = 10;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*•>|#]+\s*").expect("valid list marker pattern"));

static LIST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?\d+[.)\]]\s*").expect("valid numbering pattern"));

/// A single bibliography entry (author/title text) to search for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookTerm(String);

impl BookTerm {
    pub fn new(term: impl Into<String>) -> Self {
        Self(term.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe key: first 50 characters, spaces as `_`, colons dropped.
    pub fn slug(&self) -> String {
        self.0
            .chars()
            .take(SLUG_CHARS)
            .filter(|c| *c != ':')
            .map(|c| match c {
                ' ' | '/' | '\\' | '?' | '*' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    }

    /// Name of the downloaded document for this term.
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.slug())
    }
}

impl fmt::Display for BookTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookTerm {
    fn from(term: &str) -> Self {
        Self::new(term)
    }
}

impl From<String> for BookTerm {
    fn from(term: String) -> Self {
        Self(term)
    }
}

/// Parse a pasted bibliography into search terms.
///
/// Accepts bulleted (`-`, `*`, `•`, `>`, `|`, `#`) and numbered (`1.`, `2)`,
/// `[3]`) lines; lines of 10 characters or fewer are dropped.
pub fn parse_book_list(text: &str) -> Vec<BookTerm> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let line = LIST_MARKER.replace(line, "");
            let line = LIST_NUMBER.replace(&line, "");
            let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
            let line = line.trim_matches(|c| matches!(c, '.' | ',' | ';' | ':'));

            (line.chars().count() > MIN_ENTRY_CHARS).then(|| BookTerm::new(line))
        })
        .collect()
}
