//! Bounded, deduplicated, most-recent-first list of successful queries,
//! persisted as JSON after every change.

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};
use tracing::{info, warn};

use crate::{config::project_dirs, model::Query, validation};

pub const RECENT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct RecentQueries {
    path: Option<PathBuf>,
    entries: Vec<Query>,
}

impl RecentQueries {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Rehydrate from `path`. A missing or unreadable file starts empty; entries
    /// that fail validation are dropped and duplicates keep their newest position.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable recent queries");
                Vec::new()
            }
        };

        Self { path: Some(path), entries }
    }

    /// `recent_queries.json` in the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("recent_queries.json"))
    }

    pub fn list(&self) -> &[Query] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Query> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move `query` to the front, dropping any equal entry and anything past capacity.
    pub fn record(&mut self, query: Query) -> Result<()> {
        push_recent(&mut self.entries, query);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)
            .context("Failed to serialize recent queries")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write recent queries: {}", path.display()))?;

        info!(path = %path.display(), count = self.entries.len(), "saved recent queries");
        Ok(())
    }
}

/// Dedup by full field equality, prepend, truncate.
pub fn push_recent(entries: &mut Vec<Query>, query: Query) {
    entries.retain(|q| *q != query);
    entries.insert(0, query);
    entries.truncate(RECENT_CAPACITY);
}

fn read_entries(path: &Path) -> Result<Vec<Query>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recent queries: {}", path.display()))?;
    let stored: Vec<Query> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse recent queries: {}", path.display()))?;

    Ok(sanitize(stored, validation::today()))
}

/// Rebuild a stored list through the same rules `record` applies.
fn sanitize(stored: Vec<Query>, today: chrono::NaiveDate) -> Vec<Query> {
    let mut entries = Vec::with_capacity(RECENT_CAPACITY);

    // Replay oldest first; the head of the file stays the head of the list.
    for q in stored.into_iter().rev() {
        match validation::check_query(q.latitude, q.longitude, q.start_date, q.end_date, today) {
            Ok(query) => push_recent(&mut entries, query),
            Err(errors) => warn!(?q, %errors, "dropping invalid recent query"),
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn query(n: u32) -> Query {
        let d = NaiveDate::from_ymd_opt(2023, 1, n).unwrap();
        Query { latitude: n as f64, longitude: 0.0, start_date: d, end_date: d }
    }

    #[test]
    fn recording_twice_keeps_one_entry_at_front() {
        let mut recent = RecentQueries::in_memory();
        recent.record(query(1)).unwrap();
        recent.record(query(2)).unwrap();
        recent.record(query(2)).unwrap();

        assert_eq!(recent.list(), &[query(2), query(1)]);
    }

    #[test]
    fn re_recording_moves_entry_to_front() {
        let mut recent = RecentQueries::in_memory();
        for n in 1..=3 {
            recent.record(query(n)).unwrap();
        }
        recent.record(query(1)).unwrap();

        assert_eq!(recent.list(), &[query(1), query(3), query(2)]);
    }

    #[test]
    fn sixth_distinct_query_evicts_oldest() {
        let mut recent = RecentQueries::in_memory();
        for n in 1..=6 {
            recent.record(query(n)).unwrap();
        }

        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert_eq!(recent.get(0), Some(&query(6)));
        assert!(!recent.list().contains(&query(1)));
    }

    #[test]
    fn uniqueness_uses_every_field() {
        let mut recent = RecentQueries::in_memory();
        let a = query(1);
        let b = Query { end_date: NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), ..a };
        recent.record(a).unwrap();
        recent.record(b).unwrap();

        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn persists_and_rehydrates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("recent_queries.json");

        let mut recent = RecentQueries::load(&path);
        assert!(recent.is_empty());
        recent.record(query(1)).unwrap();
        recent.record(query(2)).unwrap();

        let reloaded = RecentQueries::load(&path);
        assert_eq!(reloaded.list(), &[query(2), query(1)]);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"startDate\": \"2023-01-02\""));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent_queries.json");
        fs::write(&path, "{not json").unwrap();

        let recent = RecentQueries::load(&path);
        assert!(recent.is_empty());
    }

    #[test]
    fn rehydrate_drops_invalid_and_duplicate_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent_queries.json");
        fs::write(
            &path,
            r#"[
                {"latitude": 500.0, "longitude": 0.0, "startDate": "2023-01-01", "endDate": "2023-01-01"},
                {"latitude": 2.0, "longitude": 0.0, "startDate": "2023-01-02", "endDate": "2023-01-02"},
                {"latitude": 1.0, "longitude": 0.0, "startDate": "2023-01-05", "endDate": "2023-01-01"},
                {"latitude": 2.0, "longitude": 0.0, "startDate": "2023-01-02", "endDate": "2023-01-02"},
                {"latitude": 1.0, "longitude": 0.0, "startDate": "2023-01-01", "endDate": "2023-01-01"}
            ]"#,
        )
        .unwrap();

        let recent = RecentQueries::load(&path);
        assert_eq!(recent.list(), &[query(2), query(1)]);
    }

    #[test]
    fn rehydrate_caps_oversized_list_keeping_newest() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let stored: Vec<Query> = (1..=7).map(query).collect();

        let entries = sanitize(stored, today);
        assert_eq!(entries, (1..=5).map(query).collect::<Vec<_>>());
    }

    #[test]
    fn rehydrate_drops_future_end_dates() {
        let today = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let entries = sanitize(vec![query(3), query(2), query(1)], today);
        assert_eq!(entries, vec![query(2), query(1)]);
    }

    #[test]
    fn clear_persists_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent_queries.json");

        let mut recent = RecentQueries::load(&path);
        recent.record(query(1)).unwrap();
        recent.clear().unwrap();

        assert!(RecentQueries::load(&path).is_empty());
    }
}
