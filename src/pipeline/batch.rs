// src/pipeline/batch.rs

//! Batch orchestration over a bibliography.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::browser::BrowserSession;
use crate::inspector::DocumentInspector;
use crate::models::{BookTerm, Config, CrawlResult, RunStatus, SearchLevel};
use crate::pipeline::{ItemOutcome, ItemPipeline, LogObserver, Pacer, ProgressObserver};
use crate::services::{Fetcher, LinkExtractor, QueryPlanner, SeenRegistry, Validator};
use crate::storage::DownloadStore;
use crate::utils::report::short_label;

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// Runs bibliographies through the item pipeline, one term at a time.
///
/// Links and documents seen by one call stay seen for every later call on
/// the same engine.
pub struct Engine {
    items: ItemPipeline,
    pacer: Pacer,
    state: Mutex<RunState>,
}

impl Engine {
    pub fn new(
        config: Arc<Config>,
        session: Arc<dyn BrowserSession>,
        inspector: Arc<dyn DocumentInspector>,
    ) -> Self {
        let seen = Arc::new(SeenRegistry::new());
        let pacer = Pacer::new(&config.crawler);

        let items = ItemPipeline {
            session,
            planner: QueryPlanner::new(&config.search),
            extractor: LinkExtractor::new(
                config.search.document_extensions.clone(),
                config.ranking.clone(),
            ),
            fetcher: Fetcher::new(config.crawler.download_timeout()),
            validator: Validator::new(inspector, config.validation.clone(), Arc::clone(&seen)),
            store: DownloadStore::new(&config.paths.download_dir),
            pacer,
            seen,
            observer: Arc::new(LogObserver),
            navigation_timeout: config.crawler.navigation_timeout(),
        };

        Self {
            items,
            pacer,
            state: Mutex::new(RunState::Idle),
        }
    }

    /// Replace the default log observer.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.items.observer = observer;
        self
    }

    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn seen(&self) -> &SeenRegistry {
        &self.items.seen
    }

    pub fn store(&self) -> &DownloadStore {
        &self.items.store
    }

    /// Process every term in order.
    ///
    /// Stops early when `cancel` fires; terms not attempted appear in
    /// neither list of the result.
    pub async fn run(
        &self,
        terms: &[BookTerm],
        level: SearchLevel,
        cancel: &CancellationToken,
    ) -> CrawlResult {
        log::info!("Searching {} terms (level: {})", terms.len(), level);
        self.process_all(terms, level, cancel).await
    }

    /// Second pass over the failures of an earlier run.
    pub async fn retry(
        &self,
        failures: &[BookTerm],
        level: SearchLevel,
        cancel: &CancellationToken,
    ) -> CrawlResult {
        log::info!("Retrying {} failed terms", failures.len());
        self.process_all(failures, level, cancel).await
    }

    async fn process_all(
        &self,
        terms: &[BookTerm],
        level: SearchLevel,
        cancel: &CancellationToken,
    ) -> CrawlResult {
        self.set_state(RunState::Running);
        let mut result = CrawlResult::start(terms.len());

        for (i, term) in terms.iter().enumerate() {
            if cancel.is_cancelled() {
                result.status = RunStatus::Cancelled;
                break;
            }

            log::info!("[{}/{}] {}", i + 1, terms.len(), short_label(term));
            match self.items.process(term, level, cancel).await {
                ItemOutcome::Accepted(_) => result.successes.push(term.clone()),
                ItemOutcome::Exhausted | ItemOutcome::Errored => {
                    result.failures.push(term.clone())
                }
                ItemOutcome::Cancelled => {
                    result.status = RunStatus::Cancelled;
                    break;
                }
            }

            let more = i + 1 < terms.len();
            if more && !self.pacer.between_terms(cancel).await {
                result.status = RunStatus::Cancelled;
                break;
            }
        }

        result.finished_at = Utc::now();
        self.set_state(match result.status {
            RunStatus::Completed => RunState::Completed,
            RunStatus::Cancelled => RunState::Cancelled,
        });

        if result.is_cancelled() {
            log::warn!(
                "Cancelled after {} of {} terms",
                result.attempted(),
                result.total
            );
        }
        result
    }

    fn set_state(&self, state: RunState) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Phase;
    use crate::testing::{
        FakeDocument, FakeInspector, RecordingObserver, ScriptedSession, fast_config,
    };
    use tempfile::TempDir;

    const TERMS: [&str; 5] = [
        "Livro Alfa Completo",
        "Livro Bravo Completo",
        "Livro Charlie Completo",
        "Livro Delta Completo",
        "Livro Echo Completo",
    ];

    fn terms() -> Vec<BookTerm> {
        TERMS.iter().map(|t| BookTerm::from(*t)).collect()
    }

    /// Alfa, Charlie and Echo have a valid document; Bravo and Delta have none.
    fn engine(dir: &TempDir, observer: Arc<RecordingObserver>) -> Engine {
        let mut config = fast_config();
        config.paths.download_dir = dir.path().to_path_buf();

        let mut session = ScriptedSession::new();
        let mut inspector = FakeInspector::new();
        for name in ["Alfa", "Charlie", "Echo"] {
            let url = format!("https://example.com/{name}.pdf");
            let bytes = format!("document {name}");
            session = session
                .with_route(name, vec![url.clone()])
                .with_file(&url, bytes.as_bytes());
            inspector = inspector.with_document(
                bytes.as_bytes(),
                FakeDocument::uniform(150, &format!("livro {name} completo")),
            );
        }

        Engine::new(Arc::new(config), Arc::new(session), Arc::new(inspector))
            .with_observer(observer)
    }

    #[tokio::test]
    async fn test_run_collects_successes_and_failures() {
        let tmp = TempDir::new().unwrap();
        let observer = Arc::new(RecordingObserver::new());
        let engine = engine(&tmp, Arc::clone(&observer));
        assert_eq!(engine.state(), RunState::Idle);

        let result = engine
            .run(&terms(), SearchLevel::Moderate, &CancellationToken::new())
            .await;

        assert_eq!(result.total, 5);
        assert_eq!(result.status, RunStatus::Completed);
        assert_eq!(
            result.successes,
            vec![
                BookTerm::from(TERMS[0]),
                BookTerm::from(TERMS[2]),
                BookTerm::from(TERMS[4])
            ]
        );
        assert_eq!(
            result.failures,
            vec![BookTerm::from(TERMS[1]), BookTerm::from(TERMS[3])]
        );
        assert_eq!(engine.state(), RunState::Completed);
        assert_eq!(engine.store().list_documents().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_retry_attempts_only_failures() {
        let tmp = TempDir::new().unwrap();
        let observer = Arc::new(RecordingObserver::new());
        let engine = engine(&tmp, Arc::clone(&observer));
        let cancel = CancellationToken::new();

        let first = engine.run(&terms(), SearchLevel::Moderate, &cancel).await;
        let checked_before = observer.terms_with(Phase::Checking).len();
        let urls_before = engine.seen().url_count();

        let retry = engine
            .retry(&first.failures, SearchLevel::Moderate, &cancel)
            .await;

        let checked = observer.terms_with(Phase::Checking);
        assert_eq!(checked[checked_before..], [TERMS[1], TERMS[3]]);
        assert_eq!(retry.total, 2);
        assert_eq!(retry.failures.len(), 2);
        assert_eq!(engine.seen().url_count(), urls_before);

        let merged = CrawlResult::after_retry(&first, &retry);
        assert_eq!(merged.successes.len(), 3);
        assert_eq!(merged.failures.len(), 2);
        assert_eq!(merged.total, 5);
    }

    #[tokio::test]
    async fn test_cancel_after_first_term() {
        let tmp = TempDir::new().unwrap();
        let cancel = CancellationToken::new();
        let observer = Arc::new(RecordingObserver::cancelling_after(1, cancel.clone()));
        let engine = engine(&tmp, Arc::clone(&observer));
        let three = &terms()[..3];

        let result = engine.run(three, SearchLevel::Moderate, &cancel).await;

        assert_eq!(result.total, 3);
        assert_eq!(result.status, RunStatus::Cancelled);
        assert_eq!(result.successes, vec![BookTerm::from(TERMS[0])]);
        assert!(result.failures.is_empty());
        assert_eq!(observer.terms_with(Phase::Checking), vec![TERMS[0]]);
        assert_eq!(engine.state(), RunState::Cancelled);
    }

    #[tokio::test]
    async fn test_run_already_cancelled() {
        let tmp = TempDir::new().unwrap();
        let observer = Arc::new(RecordingObserver::new());
        let engine = engine(&tmp, Arc::clone(&observer));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = engine.run(&terms(), SearchLevel::Quick, &cancel).await;

        assert_eq!(result.attempted(), 0);
        assert_eq!(result.total, 5);
        assert!(result.is_cancelled());
        assert!(observer.events().is_empty());
    }

    #[tokio::test]
    async fn test_empty_term_list() {
        let tmp = TempDir::new().unwrap();
        let engine = engine(&tmp, Arc::new(RecordingObserver::new()));

        let result = engine
            .run(&[], SearchLevel::Moderate, &CancellationToken::new())
            .await;

        assert_eq!(result.total, 0);
        assert_eq!(result.status, RunStatus::Completed);
    }
}
