// src/services/dedup.rs

//! Run-wide memory of links already tried and documents already accepted.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Seen-link and seen-content sets shared by every term of an engine.
///
/// Both sets only grow. Content hashes remember the file they were accepted
/// as, so re-validating that same file is not mistaken for a duplicate.
#[derive(Debug, Default)]
pub struct SeenRegistry {
    urls: Mutex<HashSet<String>>,
    hashes: Mutex<HashMap<String, PathBuf>>,
}

impl SeenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a normalized URL. Returns `false` if it was already seen.
    pub fn mark_url(&self, normalized: &str) -> bool {
        lock(&self.urls).insert(normalized.to_string())
    }

    pub fn has_url(&self, normalized: &str) -> bool {
        lock(&self.urls).contains(normalized)
    }

    pub fn url_count(&self) -> usize {
        lock(&self.urls).len()
    }

    /// True if `hash` was accepted for a file other than `path`.
    pub fn is_duplicate(&self, hash: &str, path: &Path) -> bool {
        lock(&self.hashes)
            .get(hash)
            .is_some_and(|owner| owner != path)
    }

    /// Record an accepted document's hash.
    pub fn record_hash(&self, hash: &str, path: &Path) {
        lock(&self.hashes)
            .entry(hash.to_string())
            .or_insert_with(|| path.to_path_buf());
    }

    pub fn hash_count(&self) -> usize {
        lock(&self.hashes).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_url_once() {
        let seen = SeenRegistry::new();
        assert!(seen.mark_url("https://example.com/a.pdf"));
        assert!(!seen.mark_url("https://example.com/a.pdf"));
        assert!(seen.has_url("https://example.com/a.pdf"));
        assert_eq!(seen.url_count(), 1);
    }

    #[test]
    fn test_duplicate_only_for_other_paths() {
        let seen = SeenRegistry::new();
        let first = Path::new("/downloads/a.pdf");
        let second = Path::new("/downloads/b.pdf");

        assert!(!seen.is_duplicate("abc", first));
        seen.record_hash("abc", first);

        assert!(!seen.is_duplicate("abc", first));
        assert!(seen.is_duplicate("abc", second));
        assert_eq!(seen.hash_count(), 1);
    }
}
