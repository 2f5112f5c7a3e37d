use std::collections::HashMap;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::loader::{load_bytes, LoadError};
use super::model::TableCollection;

/// Stable content-derived cache key for an upload.
pub fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Content-addressed memoization of [`load_bytes`].
///
/// Loading is a pure function of the input bytes, so entries are keyed by a
/// byte fingerprint (never by path or stream identity) and can be evicted at
/// any time.  Owned by whoever drives the loads; there is no process-wide
/// cache.
#[derive(Default)]
pub struct LoadCache {
    entries: HashMap<String, Arc<TableCollection>>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached collection for these bytes, loading on a miss.
    /// Failed loads are not cached; retrying is cheap and the input may
    /// differ next time.
    pub fn get_or_load(
        &mut self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Arc<TableCollection>, LoadError> {
        let key = fingerprint(bytes);
        if let Some(hit) = self.entries.get(&key) {
            log::debug!("load cache hit for {filename} ({key:.12})");
            return Ok(Arc::clone(hit));
        }
        let collection = Arc::new(load_bytes(bytes, filename)?);
        self.entries.insert(key, Arc::clone(&collection));
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached collection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"a,b\n1,2\n3,4\n";

    #[test]
    fn fingerprint_is_stable_and_content_derived() {
        assert_eq!(fingerprint(CSV), fingerprint(CSV));
        assert_ne!(fingerprint(CSV), fingerprint(b"a,b\n1,2\n3,5\n"));
        // SHA-256 hex digest length.
        assert_eq!(fingerprint(b"").len(), 64);
    }

    #[test]
    fn identical_bytes_share_one_load() {
        let mut cache = LoadCache::new();
        let first = cache.get_or_load(CSV, "x.csv").unwrap();
        let second = cache.get_or_load(CSV, "renamed.csv").unwrap();
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = LoadCache::new();
        assert!(cache.get_or_load(CSV, "x.unknown").is_err());
        assert!(cache.is_empty());
        assert!(cache.get_or_load(CSV, "x.csv").is_ok());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_evicts_everything() {
        let mut cache = LoadCache::new();
        cache.get_or_load(CSV, "x.csv").unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
