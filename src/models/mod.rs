// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod outcome;
mod query;
mod term;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, DelayRange, LoggingConfig, PathsConfig, RankingConfig, SearchConfig,
    ValidationConfig,
};
pub use outcome::{CrawlResult, OutcomeReason, RunStatus, ValidationOutcome};
pub use query::{SearchEngine, SearchLevel, SearchQuery};
pub use term::{BookTerm, parse_book_list};
