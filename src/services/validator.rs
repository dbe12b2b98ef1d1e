// src/services/validator.rs

//! Downloaded document validation.
//!
//! A download is kept only if it is a real document, long enough to be a
//! book, not a byte-for-byte copy of something already accepted, and its
//! first pages mention enough of the bibliography entry.

use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::error::{AppError, InspectError, Result};
use crate::inspector::DocumentInspector;
use crate::models::{OutcomeReason, ValidationConfig, ValidationOutcome};
use crate::services::SeenRegistry;
use crate::utils::text::{fold, significant_tokens};

/// Term words must be longer than this to count.
const MIN_TOKEN_CHARS: usize = 3;

/// Hex-encoded SHA-256 of a file's content.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Accepts or rejects downloaded files.
pub struct Validator {
    inspector: Arc<dyn DocumentInspector>,
    config: ValidationConfig,
    seen: Arc<SeenRegistry>,
}

impl Validator {
    pub fn new(
        inspector: Arc<dyn DocumentInspector>,
        config: ValidationConfig,
        seen: Arc<SeenRegistry>,
    ) -> Self {
        Self {
            inspector,
            config,
            seen,
        }
    }

    /// Judge the file at `path` against `term`.
    ///
    /// Checks run cheapest first and stop at the first rejection. Without a
    /// term only the structural checks apply. Accepted content is recorded
    /// so the same bytes are refused under any other file name. Fails only
    /// if the file cannot be read.
    pub async fn validate(&self, path: &Path, term: Option<&str>) -> Result<ValidationOutcome> {
        let bytes = tokio::fs::read(path).await?;
        let hash = content_hash(&bytes);
        drop(bytes);

        if self.seen.is_duplicate(&hash, path) {
            return Ok(ValidationOutcome::reject(
                OutcomeReason::DuplicateContent,
                0,
                0.0,
            ));
        }

        let term = term.map(str::trim).filter(|t| !t.is_empty());
        let tokens =
            term.map(|t| significant_tokens(t, MIN_TOKEN_CHARS, &self.config.stop_words));
        let sample_pages = match &tokens {
            Some(tokens) if !tokens.is_empty() => self.config.sample_pages,
            _ => 0,
        };

        // Parsing large files is CPU-bound
        let inspector = Arc::clone(&self.inspector);
        let owned = path.to_path_buf();
        let min_pages = self.config.min_pages;
        let inspection = tokio::task::spawn_blocking(move || {
            inspect(inspector.as_ref(), &owned, min_pages, sample_pages)
        })
        .await
        .map_err(AppError::document)?;

        let Inspection { page_count, sample } = match inspection {
            Ok(inspection) => inspection,
            Err(e) => {
                log::debug!("{}: {}", path.display(), e);
                return Ok(ValidationOutcome::reject(OutcomeReason::NotADocument, 0, 0.0));
            }
        };

        if page_count < min_pages {
            return Ok(ValidationOutcome::reject(
                OutcomeReason::TooShort,
                page_count,
                0.0,
            ));
        }

        let Some(tokens) = tokens else {
            return Ok(self.accept(&hash, path, OutcomeReason::AcceptedUnchecked, page_count, 0.0));
        };
        if tokens.is_empty() {
            return Ok(self.accept(
                &hash,
                path,
                OutcomeReason::NoSignificantTokens,
                page_count,
                0.0,
            ));
        }

        let sample = fold(&sample);
        let found = tokens
            .iter()
            .filter(|token| sample.contains(token.as_str()))
            .count();
        let fraction = found as f64 / tokens.len() as f64;
        log::debug!(
            "{}: {}/{} term words found ({:.0}%)",
            path.display(),
            found,
            tokens.len(),
            fraction * 100.0
        );

        if fraction >= self.config.match_threshold {
            Ok(self.accept(&hash, path, OutcomeReason::Accepted, page_count, fraction))
        } else {
            Ok(ValidationOutcome::reject(
                OutcomeReason::ContentMismatch,
                page_count,
                fraction,
            ))
        }
    }

    fn accept(
        &self,
        hash: &str,
        path: &Path,
        reason: OutcomeReason,
        page_count: usize,
        fraction: f64,
    ) -> ValidationOutcome {
        self.seen.record_hash(hash, path);
        ValidationOutcome::accept(reason, page_count, fraction)
    }
}

/// What validation needs from an opened document.
struct Inspection {
    page_count: usize,
    /// Text of the first pages plus title and author; empty unless requested
    sample: String,
}

fn inspect(
    inspector: &dyn DocumentInspector,
    path: &Path,
    min_pages: usize,
    sample_pages: usize,
) -> std::result::Result<Inspection, InspectError> {
    let document = inspector.open(path)?;
    let page_count = document.page_count();

    let mut sample = String::new();
    if page_count >= min_pages && sample_pages > 0 {
        for index in 0..page_count.min(sample_pages) {
            match document.page_text(index) {
                Ok(text) => {
                    sample.push_str(&text);
                    sample.push('\n');
                }
                Err(e) => log::debug!("{}: {}", path.display(), e),
            }
        }
        sample.push_str(&document.metadata().joined());
    }

    Ok(Inspection { page_count, sample })
}
