// src/testing.rs

//! Scripted collaborators for unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::browser::{BrowserSession, HttpResponse, PageQuery, RenderedPage};
use crate::error::{AppError, BrowserError, InspectError};
use crate::inspector::{Document, DocumentInspector, DocumentMetadata};
use crate::models::{BookTerm, Config, DelayRange, SearchQuery};
use crate::pipeline::{Phase, ProgressEvent, ProgressObserver};

/// Config with pacing disabled.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.crawler.query_delay_ms = DelayRange::none();
    config.crawler.term_delay_ms = DelayRange::none();
    config
}

/// Browser session answering from fixed tables.
///
/// Every navigation renders the same placeholder page; links are chosen by
/// the first route whose fragment appears in the navigated URL, falling
/// back to the default links.
#[derive(Default)]
pub struct ScriptedSession {
    links: Vec<String>,
    routes: Vec<(String, Vec<String>)>,
    data_links: Vec<String>,
    text: Vec<String>,
    files: HashMap<String, Result<HttpResponse, BrowserError>>,
    navigation_error: Option<BrowserError>,
    navigations: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links<S: Into<String>>(mut self, links: Vec<S>) -> Self {
        self.links = links.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_route<S: Into<String>>(mut self, fragment: &str, links: Vec<S>) -> Self {
        self.routes.push((
            fragment.to_string(),
            links.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn with_data_links<S: Into<String>>(mut self, links: Vec<S>) -> Self {
        self.data_links = links.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_text<S: Into<String>>(mut self, text: Vec<S>) -> Self {
        self.text = text.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file(mut self, url: &str, bytes: &[u8]) -> Self {
        self.files.insert(
            url.to_string(),
            Ok(HttpResponse {
                status: 200,
                body: bytes.to_vec(),
            }),
        );
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.files.insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                body: Vec::new(),
            }),
        );
        self
    }

    pub fn with_failure(mut self, url: &str, error: BrowserError) -> Self {
        self.files.insert(url.to_string(), Err(error));
        self
    }

    pub fn with_navigation_error(mut self, error: BrowserError) -> Self {
        self.navigation_error = Some(error);
        self
    }

    pub fn navigation_count(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    /// URLs passed to `request_bytes`, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&self, url: &str, _timeout: Duration) -> Result<RenderedPage, BrowserError> {
        self.navigations.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.navigation_error {
            return Err(error.clone());
        }
        Ok(RenderedPage::new(
            url,
            200,
            "<html><body>scripted results</body></html>",
        ))
    }

    async fn evaluate(&self, page: &RenderedPage, query: PageQuery) -> Vec<String> {
        if !page.has_body() {
            return Vec::new();
        }
        match query {
            PageQuery::AnchorHrefs => self
                .routes
                .iter()
                .find(|(fragment, _)| page.url.contains(fragment.as_str()))
                .map(|(_, links)| links.clone())
                .unwrap_or_else(|| self.links.clone()),
            PageQuery::DataAttributeLinks => self.data_links.clone(),
            PageQuery::VisibleText => self.text.clone(),
        }
    }

    async fn request_bytes(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> Result<HttpResponse, BrowserError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.files.get(url) {
            Some(response) => response.clone(),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

/// In-memory document served by [`FakeInspector`].
#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub page_count: usize,
    pub pages: Vec<String>,
    pub metadata: DocumentMetadata,
}

impl FakeDocument {
    /// `page_count` pages, each with the same text.
    pub fn uniform(page_count: usize, text: &str) -> Self {
        Self {
            page_count,
            pages: vec![text.to_string(); page_count],
            metadata: DocumentMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, title: &str, author: &str) -> Self {
        self.metadata = DocumentMetadata {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
        };
        self
    }
}

impl Document for FakeDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn metadata(&self) -> DocumentMetadata {
        self.metadata.clone()
    }

    fn page_text(&self, index: usize) -> Result<String, InspectError> {
        if index >= self.page_count {
            return Err(InspectError::PageOutOfRange {
                index,
                count: self.page_count,
            });
        }
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

/// Inspector recognizing files by their exact bytes.
#[derive(Default)]
pub struct FakeInspector {
    documents: HashMap<Vec<u8>, FakeDocument>,
}

impl FakeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, bytes: &[u8], document: FakeDocument) -> Self {
        self.documents.insert(bytes.to_vec(), document);
        self
    }
}

impl DocumentInspector for FakeInspector {
    fn open(&self, path: &Path) -> Result<Box<dyn Document>, InspectError> {
        let bytes = std::fs::read(path).map_err(|e| InspectError::Unreadable(e.to_string()))?;
        self.documents
            .get(&bytes)
            .cloned()
            .map(|doc| Box::new(doc) as Box<dyn Document>)
            .ok_or_else(|| InspectError::Unreadable("unrecognized content".to_string()))
    }
}

/// Observer keeping every event, optionally cancelling after some terms.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ProgressEvent>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` once `finished` terms reached a terminal phase.
    pub fn cancelling_after(finished: usize, token: CancellationToken) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            cancel_after: Some((finished, token)),
        }
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Phases reported for one term, in order, with repeats collapsed.
    pub fn phases_for(&self, term: &str) -> Vec<Phase> {
        let mut phases: Vec<Phase> = Vec::new();
        for event in self.events().into_iter().filter(|e| e.term.as_str() == term) {
            if phases.last() != Some(&event.phase) {
                phases.push(event.phase);
            }
        }
        phases
    }

    /// Terms that reported `phase`, in order.
    pub fn terms_with(&self, phase: Phase) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.phase == phase)
            .map(|e| e.term.to_string())
            .collect()
    }

    fn record(&self, event: ProgressEvent) {
        let terminal = event.phase.is_terminal();
        let finished = match self.events.lock() {
            Ok(mut events) => {
                events.push(event);
                events.iter().filter(|e| e.phase.is_terminal()).count()
            }
            Err(_) => return,
        };
        if let Some((limit, token)) = &self.cancel_after {
            if terminal && finished >= *limit {
                token.cancel();
            }
        }
    }
}

impl ProgressObserver for RecordingObserver {
    fn checking(&self, term: &BookTerm) {
        self.record(ProgressEvent::new(term, Phase::Checking, None));
    }

    fn searching(&self, term: &BookTerm, query: &SearchQuery) {
        self.record(ProgressEvent::new(
            term,
            Phase::Searching,
            Some(query.to_string()),
        ));
    }

    fn succeeded(&self, term: &BookTerm, path: &Path) {
        self.record(ProgressEvent::new(
            term,
            Phase::Succeeded,
            Some(path.display().to_string()),
        ));
    }

    fn failed(&self, term: &BookTerm) {
        self.record(ProgressEvent::new(term, Phase::Failed, None));
    }

    fn error(&self, term: &BookTerm, error: &AppError) {
        self.record(ProgressEvent::new(
            term,
            Phase::Error,
            Some(error.to_string()),
        ));
    }
}
