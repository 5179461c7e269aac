use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use jiff::Timestamp;
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command: String,
    pub timestamp: Timestamp,
    pub success: bool,
    pub context: String,
    pub namespace: String,
}

/// File-backed command history, newest first. Writes serialise behind the
/// mutex and flush to disk after every recorded command. A missing file
/// is an empty history; a corrupt one is logged and replaced on the next
/// write.
pub struct History {
    entries: Mutex<Vec<HistoryEntry>>,
    max_size: usize,
    path: PathBuf,
}

impl History {
    pub fn open(path: impl Into<PathBuf>, max_size: usize) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<HistoryEntry>>(&contents) {
                Ok(mut entries) => {
                    entries.truncate(max_size);
                    entries
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "history file unreadable, starting empty");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { entries: Mutex::new(entries), max_size, path }
    }

    /// Prepends a command and persists immediately.
    pub fn record(&self, command: &str, success: bool, context: &str, namespace: &str) -> io::Result<()> {
        let entry = HistoryEntry {
            command: command.to_string(),
            timestamp: Timestamp::now(),
            success,
            context: context.to_string(),
            namespace: namespace.to_string(),
        };

        let mut entries = self.lock();
        entries.insert(0, entry);
        entries.truncate(self.max_size);
        self.save(&entries)
    }

    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        let entries = self.lock();
        entries.iter().take(n).cloned().collect()
    }

    pub fn all(&self) -> Vec<HistoryEntry> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Fuzzy search over commands, best match first. An empty query
    /// returns everything in recency order.
    pub fn search(&self, query: &str) -> Vec<HistoryEntry> {
        if query.is_empty() {
            return self.all();
        }

        let entries = self.all();
        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::new(query, CaseMatching::Smart, Normalization::Smart, AtomKind::Fuzzy);

        let mut buf = Vec::new();
        let mut scored: Vec<(u32, HistoryEntry)> = entries
            .into_iter()
            .filter_map(|entry| {
                let haystack = Utf32Str::new(&entry.command, &mut buf);
                pattern.score(haystack, &mut matcher).map(|score| (score, entry))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Filter by context, namespace and success; empty selectors match
    /// everything.
    pub fn filter(&self, context: &str, namespace: &str, success_only: bool) -> Vec<HistoryEntry> {
        self.lock()
            .iter()
            .filter(|entry| {
                (context.is_empty() || entry.context == context)
                    && (namespace.is_empty() || entry.namespace == namespace)
                    && (!success_only || entry.success)
            })
            .cloned()
            .collect()
    }

    pub fn delete(&self, index: usize) -> io::Result<()> {
        let mut entries = self.lock();
        if index < entries.len() {
            entries.remove(index);
            self.save(&entries)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> io::Result<()> {
        let mut entries = self.lock();
        entries.clear();
        self.save(&entries)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, entries: &[HistoryEntry]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(entries).map_err(io::Error::other)?;
        std::fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_in(dir: &tempfile::TempDir) -> History {
        History::open(dir.path().join("history.json"), 100)
    }

    #[test]
    fn record_keeps_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let history = history_in(&dir);

        history.record("kubectl get pods", true, "prod", "default").unwrap();
        history.record("kubectl get services", true, "prod", "default").unwrap();
        history.record("kubectl describe pod my-pod", false, "prod", "default").unwrap();

        let entries = history.recent(10);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].command, "kubectl describe pod my-pod");
        assert!(!entries[0].success);
        assert!(entries[1].success);
    }

    #[test]
    fn max_size_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::open(dir.path().join("history.json"), 5);

        for i in 0..10 {
            history.record(&format!("kubectl get pods --chunk {i}"), true, "prod", "default").unwrap();
        }
        assert_eq!(history.len(), 5);
        assert_eq!(history.recent(1)[0].command, "kubectl get pods --chunk 9");
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let history = History::open(&path, 100);
        history.record("kubectl get pods", true, "prod", "default").unwrap();
        history.record("kubectl get services", true, "prod", "default").unwrap();

        let reopened = History::open(&path, 100);
        let entries = reopened.all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].command, "kubectl get services");
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::open(dir.path().join("nonexistent.json"), 100);
        assert!(history.is_empty());
    }

    #[test]
    fn corrupt_file_starts_empty_but_usable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "not json").unwrap();

        let history = History::open(&path, 100);
        assert!(history.is_empty());
        history.record("kubectl get pods", true, "prod", "default").unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn timestamps_are_rfc3339_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let history = History::open(&path, 100);
        history.record("kubectl get pods", true, "prod", "default").unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let ts = parsed[0]["timestamp"].as_str().unwrap();
        assert!(ts.parse::<Timestamp>().is_ok(), "timestamp {ts} should round-trip");
    }

    #[test]
    fn fuzzy_search_matches_and_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let history = history_in(&dir);
        history.record("kubectl get pods", true, "prod", "default").unwrap();
        history.record("kubectl get services", true, "prod", "default").unwrap();
        history.record("kubectl logs my-pod", true, "prod", "default").unwrap();

        let results = history.search("pods");
        assert!(results.iter().any(|e| e.command == "kubectl get pods"));
        assert!(history.search("nonexistent-xyz").is_empty());
        assert_eq!(history.search("").len(), 3);
    }

    #[test]
    fn filter_by_context_namespace_success() {
        let dir = tempfile::tempdir().unwrap();
        let history = history_in(&dir);
        history.record("kubectl get pods", true, "prod", "default").unwrap();
        history.record("kubectl get services", true, "staging", "default").unwrap();
        history.record("kubectl describe pod my-pod", false, "prod", "kube-system").unwrap();
        history.record("kubectl logs my-pod", true, "prod", "default").unwrap();

        assert_eq!(history.filter("prod", "", false).len(), 3);
        assert_eq!(history.filter("", "default", false).len(), 3);
        assert_eq!(history.filter("", "", true).len(), 3);
        assert_eq!(history.filter("prod", "default", false).len(), 2);
    }

    #[test]
    fn delete_removes_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let history = history_in(&dir);
        history.record("kubectl get pods", true, "prod", "default").unwrap();
        history.record("kubectl get services", true, "prod", "default").unwrap();
        history.record("kubectl describe pod", true, "prod", "default").unwrap();

        history.delete(1).unwrap();
        let entries = history.all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].command, "kubectl get pods");

        // Out of range is a no-op.
        history.delete(99).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn clear_empties_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let history = History::open(&path, 100);
        history.record("kubectl get pods", true, "prod", "default").unwrap();
        history.clear().unwrap();

        assert!(history.is_empty());
        assert!(History::open(&path, 100).is_empty());
    }
}
