// src/services/fetcher.rs

//! Candidate download.

use std::path::Path;
use std::time::Duration;

use crate::browser::BrowserSession;
use crate::error::FetchError;
use crate::storage::DownloadStore;

/// Downloads candidates through the browser session and stores them.
///
/// No retries here: the item pipeline moves on to the next candidate.
#[derive(Debug, Clone)]
pub struct Fetcher {
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Download `url` into `dest`. Returns the number of bytes written.
    pub async fn fetch(
        &self,
        session: &dyn BrowserSession,
        store: &DownloadStore,
        url: &str,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        let response = session.request_bytes(url, self.timeout).await?;
        if !response.is_success() {
            return Err(FetchError::Http {
                status: response.status,
            });
        }

        store
            .write_bytes(dest, &response.body)
            .await
            .map_err(|e| FetchError::Transport(format!("writing {}: {e}", dest.display())))?;
        Ok(response.body.len() as u64)
    }
}
