// src/pipeline/observer.rs

//! Per-term progress reporting.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::models::{BookTerm, SearchQuery};
use crate::utils::report::short_label;

/// Progress phase of one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Checking,
    Searching,
    Succeeded,
    Failed,
    Error,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Checking => "checking",
            Phase::Searching => "searching",
            Phase::Succeeded => "succeeded",
            Phase::Failed => "failed",
            Phase::Error => "error",
        }
    }

    /// Portuguese label shown by the desktop front end.
    pub fn label_pt(&self) -> &'static str {
        match self {
            Phase::Checking => "verificando",
            Phase::Searching => "buscando",
            Phase::Succeeded => "sucesso",
            Phase::Failed => "falhou",
            Phase::Error => "erro",
        }
    }

    /// True for the phases that end a term.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed | Phase::Error)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" | "verificando" => Ok(Phase::Checking),
            "searching" | "buscando" => Ok(Phase::Searching),
            "succeeded" | "sucesso" => Ok(Phase::Succeeded),
            "failed" | "falhou" => Ok(Phase::Failed),
            "error" | "erro" => Ok(Phase::Error),
            other => Err(format!("unknown phase: {other}")),
        }
    }
}

/// Receives progress for every term of a run.
///
/// Called inline from the pipeline, so implementations must return quickly.
pub trait ProgressObserver: Send + Sync {
    fn checking(&self, term: &BookTerm);

    fn searching(&self, term: &BookTerm, query: &SearchQuery);

    fn succeeded(&self, term: &BookTerm, path: &Path);

    fn failed(&self, term: &BookTerm);

    fn error(&self, term: &BookTerm, error: &AppError);
}

/// Writes progress to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn checking(&self, term: &BookTerm) {
        log::debug!("[{}] {}", Phase::Checking, short_label(term));
    }

    fn searching(&self, term: &BookTerm, query: &SearchQuery) {
        log::debug!("[{}] {} <- {}", Phase::Searching, short_label(term), query);
    }

    fn succeeded(&self, term: &BookTerm, path: &Path) {
        log::info!("✓ {} -> {}", short_label(term), path.display());
    }

    fn failed(&self, term: &BookTerm) {
        log::warn!("✗ {}: no valid document found", short_label(term));
    }

    fn error(&self, term: &BookTerm, error: &AppError) {
        log::error!("✗ {}: {}", short_label(term), error);
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn checking(&self, _term: &BookTerm) {}
    fn searching(&self, _term: &BookTerm, _query: &SearchQuery) {}
    fn succeeded(&self, _term: &BookTerm, _path: &Path) {}
    fn failed(&self, _term: &BookTerm) {}
    fn error(&self, _term: &BookTerm, _error: &AppError) {}
}

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub term: BookTerm,
    pub phase: Phase,
    /// Query, saved path or error message, depending on the phase
    pub detail: Option<String>,
}

impl ProgressEvent {
    pub fn new(term: &BookTerm, phase: Phase, detail: Option<String>) -> Self {
        Self {
            term: term.clone(),
            phase,
            detail,
        }
    }
}

/// Forwards progress over an unbounded channel.
///
/// Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn send(&self, event: ProgressEvent) {
        let _ = self.sender.send(event);
    }
}

impl ProgressObserver for ChannelObserver {
    fn checking(&self, term: &BookTerm) {
        self.send(ProgressEvent::new(term, Phase::Checking, None));
    }

    fn searching(&self, term: &BookTerm, query: &SearchQuery) {
        self.send(ProgressEvent::new(
            term,
            Phase::Searching,
            Some(query.to_string()),
        ));
    }

    fn succeeded(&self, term: &BookTerm, path: &Path) {
        self.send(ProgressEvent::new(
            term,
            Phase::Succeeded,
            Some(path.display().to_string()),
        ));
    }

    fn failed(&self, term: &BookTerm) {
        self.send(ProgressEvent::new(term, Phase::Failed, None));
    }

    fn error(&self, term: &BookTerm, error: &AppError) {
        self.send(ProgressEvent::new(
            term,
            Phase::Error,
            Some(error.to_string()),
        ));
    }
}
