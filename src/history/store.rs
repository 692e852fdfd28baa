use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime, Timelike};
use tempfile::NamedTempFile;

use crate::error::PersistenceError;

use super::model::HistoryEntry;

/// Durable, bounded list of recently played files.
///
/// Entries are kept least-recent first; `entries()` hands them out most-recent first.
/// Persistence failures never propagate: they are logged and the in-memory list stays as is.
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
    entries: Vec<HistoryEntry>,
    dirty: bool,
}

impl HistoryStore {
    /// Read the history file at `path`. Missing or unreadable files yield an empty store.
    pub fn load(path: impl Into<PathBuf>, capacity: usize) -> Self {
        let path = path.into();
        let mut entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("history unavailable, starting empty: {e}");
                Vec::new()
            }
        };
        entries.sort_by_key(|e| e.last_played);
        // Older files may contain duplicates; the most recent one wins.
        let mut seen = std::collections::HashSet::new();
        let mut deduped: Vec<HistoryEntry> = entries
            .into_iter()
            .rev()
            .filter(|e| seen.insert(e.path.clone()))
            .collect();
        deduped.reverse();

        let mut store = Self {
            path,
            capacity: capacity.max(1),
            entries: deduped,
            dirty: true,
        };
        store.enforce_cap();
        tracing::debug!(
            "loaded {} history entries from {}",
            store.entries.len(),
            store.path.display()
        );
        store
    }

    /// Record a play of `path` at the current local time.
    pub fn record(&mut self, path: &Path) {
        let now = Local::now().naive_local();
        self.record_at(path, now.with_nanosecond(0).unwrap_or(now));
    }

    /// Record a play of `path` at `at`: refresh an existing entry or append a new one.
    ///
    /// Paths that are not valid UTF-8 cannot be written as JSON and are not recorded.
    pub fn record_at(&mut self, path: &Path, at: NaiveDateTime) {
        if path.to_str().is_none() {
            tracing::warn!("not recording {} in history: path is not UTF-8", path.display());
            return;
        }
        let entry = match self.entries.iter().position(|e| e.path == path) {
            Some(pos) => {
                let mut existing = self.entries.remove(pos);
                existing.last_played = at;
                existing
            }
            None => HistoryEntry::new(path, at),
        };
        self.entries.push(entry);
        self.enforce_cap();
        self.save();
        self.dirty = true;
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.save();
        self.dirty = true;
    }

    /// Entries in display order: most recently played first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Entry at `index` in display order.
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries().nth(index)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return whether the list changed since the last call, clearing the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Persist the full list, logging (not returning) any failure.
    pub fn save(&self) {
        if let Err(e) = write_entries(&self.path, &self.entries) {
            tracing::warn!("failed to save history: {e}");
        }
    }

    fn enforce_cap(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            for evicted in self.entries.drain(..excess) {
                tracing::debug!("history full, dropping {}", evicted.path.display());
            }
        }
    }
}

fn read_entries(path: &Path) -> Result<Vec<HistoryEntry>, PersistenceError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Write through a sibling temp file and rename, so a crash never leaves half a file.
fn write_entries(path: &Path, entries: &[HistoryEntry]) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(io_err)?;

    let json = serde_json::to_string_pretty(entries)?;
    let mut tmp = NamedTempFile::new_in(&parent).map_err(io_err)?;
    tmp.write_all(json.as_bytes()).map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
