// src/pipeline/pacing.rs

//! Randomized pauses between searches.

use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::models::{CrawlerConfig, DelayRange};

/// Pause lengths used by the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    query: DelayRange,
    term: DelayRange,
}

impl Pacer {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            query: config.query_delay_ms,
            term: config.term_delay_ms,
        }
    }

    /// Short wait after a results page loads. Returns `false` if cancelled.
    pub async fn settle(&self, cancel: &CancellationToken) -> bool {
        sleep_unless_cancelled(sample(self.query), cancel).await
    }

    /// Longer wait between terms. Returns `false` if cancelled.
    pub async fn between_terms(&self, cancel: &CancellationToken) -> bool {
        sleep_unless_cancelled(sample(self.term), cancel).await
    }
}

/// Uniform random duration within the range.
pub fn sample(range: DelayRange) -> Duration {
    if range.is_zero() || range.min >= range.max {
        return Duration::from_millis(range.max);
    }
    Duration::from_millis(rand::thread_rng().gen_range(range.min..=range.max))
}

async fn sleep_unless_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    if duration.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
