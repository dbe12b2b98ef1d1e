//! Service layer for the book crawler.
//!
//! This module contains the building blocks the item pipeline drives:
//! - Query planning (`QueryPlanner`)
//! - Candidate link extraction and ranking (`LinkExtractor`)
//! - Candidate download (`Fetcher`)
//! - Document validation (`Validator`)
//! - Run-wide deduplication (`SeenRegistry`)

mod dedup;
mod fetcher;
mod links;
mod planner;
mod validator;

pub use dedup::SeenRegistry;
pub use fetcher::Fetcher;
pub use links::{LinkExtractor, TrustTier};
pub use planner::{QueryPlanner, TermParts, split_term};
pub use validator::{Validator, content_hash};
