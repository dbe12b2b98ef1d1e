// src/lib.rs

//! Bibliography PDF crawler library.
//!
//! Given a list of bibliography entries, searches several engines for a
//! full-text PDF of each, downloads candidates and keeps the first one that
//! looks like the requested book.

pub mod browser;
pub mod error;
pub mod inspector;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
