//! Session-scoped result cache.
//!
//! Entries live for as long as the process (the "session") and are never
//! evicted or expired individually.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use crate::model::{Query, WeatherResult};

/// Canonical cache key for a query.
///
/// Fixed field order with a `|` separator. Coordinates use the shortest
/// round-trip float formatting, so distinct values never share a key.
pub fn cache_key(query: &Query) -> String {
    format!(
        "{}|{}|{}|{}",
        canonical_coordinate(query.latitude()),
        canonical_coordinate(query.longitude()),
        query.start_date().format("%Y-%m-%d"),
        query.end_date().format("%Y-%m-%d"),
    )
}

// Folds -0.0 into 0.0 so equal queries share a key.
fn canonical_coordinate(value: f64) -> f64 {
    value + 0.0
}

/// Cloneable handle to one session's cache. Clones share entries.
#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    entries: Arc<RwLock<HashMap<String, Arc<WeatherResult>>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &Query) -> Option<Arc<WeatherResult>> {
        self.entries.read().get(&cache_key(query)).cloned()
    }

    pub fn put(&self, query: &Query, result: Arc<WeatherResult>) {
        self.entries.write().insert(cache_key(query), result);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every entry; the end-of-session reset.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
