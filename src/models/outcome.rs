// src/models/outcome.rs

//! Validation verdicts and batch results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::BookTerm;

/// Why a document was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// Enough term tokens found in the sampled text
    Accepted,
    /// No term given; only structural checks applied
    AcceptedUnchecked,
    /// The term had no significant tokens to look for
    NoSignificantTokens,
    /// Same bytes already accepted under another file
    DuplicateContent,
    /// The file could not be opened as a document
    NotADocument,
    /// Fewer pages than the configured minimum
    TooShort,
    /// Too few term tokens found in the sampled text
    ContentMismatch,
}

impl OutcomeReason {
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            OutcomeReason::Accepted
                | OutcomeReason::AcceptedUnchecked
                | OutcomeReason::NoSignificantTokens
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeReason::Accepted => "accepted",
            OutcomeReason::AcceptedUnchecked => "accepted_unchecked",
            OutcomeReason::NoSignificantTokens => "no_significant_tokens",
            OutcomeReason::DuplicateContent => "duplicate_content",
            OutcomeReason::NotADocument => "not_a_document",
            OutcomeReason::TooShort => "too_short",
            OutcomeReason::ContentMismatch => "content_mismatch",
        }
    }
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict on one downloaded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    pub accepted: bool,
    pub page_count: usize,
    pub matched_fraction: f64,
    pub reason: OutcomeReason,
}

impl ValidationOutcome {
    pub fn accept(reason: OutcomeReason, page_count: usize, matched_fraction: f64) -> Self {
        Self {
            accepted: true,
            page_count,
            matched_fraction,
            reason,
        }
    }

    pub fn reject(reason: OutcomeReason, page_count: usize, matched_fraction: f64) -> Self {
        Self {
            accepted: false,
            page_count,
            matched_fraction,
            reason,
        }
    }
}

/// Terminal state of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Cancelled,
}

/// Outcome of one `run` or `retry` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub successes: Vec<BookTerm>,
    pub failures: Vec<BookTerm>,
    /// Number of terms handed to the call, attempted or not
    pub total: usize,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlResult {
    /// Empty result for a run over `total` terms.
    pub fn start(total: usize) -> Self {
        let now = Utc::now();
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
            total,
            status: RunStatus::Completed,
            started_at: now,
            finished_at: now,
        }
    }

    /// Number of terms that were actually attempted.
    pub fn attempted(&self) -> usize {
        self.successes.len() + self.failures.len()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }

    /// Combine a first pass with the retry pass over its failures.
    ///
    /// Successes accumulate; failures are what the retry pass still failed,
    /// plus first-pass failures the retry never reached.
    pub fn after_retry(first: &CrawlResult, retry: &CrawlResult) -> CrawlResult {
        let mut successes = first.successes.clone();
        successes.extend(retry.successes.iter().cloned());

        let mut failures = retry.failures.clone();
        failures.extend(
            first
                .failures
                .iter()
                .filter(|t| !retry.successes.contains(t) && !retry.failures.contains(t))
                .cloned(),
        );

        let status = if first.is_cancelled() || retry.is_cancelled() {
            RunStatus::Cancelled
        } else {
            RunStatus::Completed
        };

        CrawlResult {
            successes,
            failures,
            total: first.total,
            status,
            started_at: first.started_at,
            finished_at: retry.finished_at,
        }
    }
}
