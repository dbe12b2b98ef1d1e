// src/pipeline/item.rs

//! Search-download-validate loop for a single term.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::browser::BrowserSession;
use crate::error::Result;
use crate::models::{BookTerm, SearchLevel};
use crate::pipeline::{Pacer, ProgressObserver};
use crate::services::{Fetcher, LinkExtractor, QueryPlanner, SeenRegistry, Validator};
use crate::storage::DownloadStore;

/// How one term ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A valid document is stored at this path
    Accepted(PathBuf),
    /// Every planned query was tried without success
    Exhausted,
    /// Navigation, inspection or I/O failed
    Errored,
    /// Cancellation was observed before the term finished
    Cancelled,
}

/// Processes one term at a time.
pub struct ItemPipeline {
    pub(crate) session: Arc<dyn BrowserSession>,
    pub(crate) planner: QueryPlanner,
    pub(crate) extractor: LinkExtractor,
    pub(crate) fetcher: Fetcher,
    pub(crate) validator: Validator,
    pub(crate) store: DownloadStore,
    pub(crate) pacer: Pacer,
    pub(crate) seen: Arc<SeenRegistry>,
    pub(crate) observer: Arc<dyn ProgressObserver>,
    pub(crate) navigation_timeout: Duration,
}

impl ItemPipeline {
    /// Find, download and validate a document for `term`.
    ///
    /// A document already stored for the term is re-validated first and
    /// reused when it still passes. Errors end the term with
    /// [`ItemOutcome::Errored`] and are reported, never propagated.
    pub async fn process(
        &self,
        term: &BookTerm,
        level: SearchLevel,
        cancel: &CancellationToken,
    ) -> ItemOutcome {
        self.observer.checking(term);

        match self.try_process(term, level, cancel).await {
            Ok(ItemOutcome::Accepted(path)) => {
                self.observer.succeeded(term, &path);
                ItemOutcome::Accepted(path)
            }
            Ok(ItemOutcome::Exhausted) => {
                self.observer.failed(term);
                ItemOutcome::Exhausted
            }
            Ok(outcome) => outcome,
            Err(e) => {
                self.observer.error(term, &e);
                ItemOutcome::Errored
            }
        }
    }

    async fn try_process(
        &self,
        term: &BookTerm,
        level: SearchLevel,
        cancel: &CancellationToken,
    ) -> Result<ItemOutcome> {
        let path = self.store.path_for(term);

        if tokio::fs::try_exists(&path).await? {
            let outcome = self.validator.validate(&path, Some(term.as_str())).await?;
            if outcome.accepted {
                log::info!("Reusing {}", path.display());
                return Ok(ItemOutcome::Accepted(path));
            }
            log::info!("Discarding stored {} ({})", path.display(), outcome.reason);
            self.store.remove(&path).await?;
        }

        self.store.ensure_dir().await?;

        for query in self.planner.plan(term.as_str()) {
            if cancel.is_cancelled() {
                return Ok(ItemOutcome::Cancelled);
            }
            self.observer.searching(term, &query);

            let page = self
                .session
                .navigate(&query.url(), self.navigation_timeout)
                .await?;
            if !self.pacer.settle(cancel).await {
                return Ok(ItemOutcome::Cancelled);
            }

            let candidates = self
                .extractor
                .extract(self.session.as_ref(), &page, level, &self.seen)
                .await;

            for url in candidates {
                if let Err(e) = self
                    .fetcher
                    .fetch(self.session.as_ref(), &self.store, &url, &path)
                    .await
                {
                    log::debug!("Download failed {}: {}", url, e);
                    continue;
                }

                let outcome = self.validator.validate(&path, Some(term.as_str())).await?;
                if outcome.accepted {
                    log::debug!(
                        "Accepted {} ({} pages, {:.0}% match)",
                        url,
                        outcome.page_count,
                        outcome.matched_fraction * 100.0
                    );
                    return Ok(ItemOutcome::Accepted(path));
                }
                log::debug!("Rejected {}: {}", url, outcome.reason);
                self.store.remove(&path).await?;
            }
        }

        Ok(ItemOutcome::Exhausted)
    }
}
