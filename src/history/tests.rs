use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;

use super::*;

fn at(secs: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, secs / 60, secs % 60)
        .unwrap()
}

fn song(i: usize) -> PathBuf {
    PathBuf::from(format!("/music/song{i}.mp3"))
}

#[test]
fn record_appends_then_updates_without_duplicates() {
    let dir = tempdir().unwrap();
    let mut store = HistoryStore::load(dir.path().join("history.json"), 50);
    assert!(store.is_empty());

    store.record_at(Path::new("/music/song.mp3"), at(1));
    store.record_at(Path::new("/music/other.mp3"), at(2));
    store.record_at(Path::new("/music/song.mp3"), at(3));

    assert_eq!(store.len(), 2);
    let first = store.get(0).unwrap();
    assert_eq!(first.path, PathBuf::from("/music/song.mp3"));
    assert_eq!(first.name, "song.mp3");
    assert_eq!(first.last_played, at(3));
    assert_eq!(store.get(1).unwrap().name, "other.mp3");
}

#[test]
fn cap_evicts_least_recently_played() {
    let dir = tempdir().unwrap();
    let mut store = HistoryStore::load(dir.path().join("history.json"), 50);

    for i in 0..51 {
        store.record_at(&song(i), at(i as u32));
    }

    assert_eq!(store.len(), 50);
    assert!(!store.contains(&song(0)));
    assert!(store.contains(&song(1)));
    assert!(store.contains(&song(50)));
}

#[test]
fn replaying_an_old_entry_protects_it_from_eviction() {
    let dir = tempdir().unwrap();
    let mut store = HistoryStore::load(dir.path().join("history.json"), 3);

    store.record_at(&song(0), at(0));
    store.record_at(&song(1), at(1));
    store.record_at(&song(2), at(2));
    store.record_at(&song(0), at(3));
    store.record_at(&song(3), at(4));

    assert_eq!(store.len(), 3);
    assert!(store.contains(&song(0)));
    assert!(!store.contains(&song(1)));
}

#[test]
fn persisted_history_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("history.json");

    let mut store = HistoryStore::load(&path, 50);
    store.record_at(&song(1), at(10));
    store.record_at(&song(2), at(20));

    let reloaded = HistoryStore::load(&path, 50);
    let before: Vec<_> = store.entries().cloned().collect();
    let after: Vec<_> = reloaded.entries().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn file_format_matches_documented_json_shape() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut store = HistoryStore::load(&path, 50);
    store.record_at(Path::new("/music/song.mp3"), at(5));

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["path"], "/music/song.mp3");
    assert_eq!(value[0]["name"], "song.mp3");
    assert_eq!(value[0]["last_played"], "2024-05-01 12:00:05");
    // pretty-printed
    assert!(raw.contains("\n  "));
}

#[test]
fn corrupt_file_loads_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = HistoryStore::load(&path, 50);
    assert!(store.is_empty());
}

#[test]
fn load_sorts_by_timestamp_and_drops_duplicate_paths() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    std::fs::write(
        &path,
        r#"[
  {"path": "/a.mp3", "name": "a.mp3", "last_played": "2024-05-01 12:00:30"},
  {"path": "/b.mp3", "name": "b.mp3", "last_played": "2024-05-01 12:00:10"},
  {"path": "/a.mp3", "name": "a.mp3", "last_played": "2024-05-01 12:00:01"}
]"#,
    )
    .unwrap();

    let store = HistoryStore::load(&path, 50);
    let names: Vec<&str> = store.entries().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["a.mp3", "b.mp3"]);
    assert_eq!(store.get(0).unwrap().last_played, at(30));
}

#[test]
fn clear_empties_and_persists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");

    let mut store = HistoryStore::load(&path, 50);
    store.record_at(&song(1), at(1));
    store.take_dirty();
    store.clear();

    assert!(store.is_empty());
    assert!(store.take_dirty());
    assert!(!store.take_dirty());
    assert!(HistoryStore::load(&path, 50).is_empty());
}

#[test]
fn unwritable_location_keeps_in_memory_list() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    // Parent "directory" is a regular file, so every save fails.
    let mut store = HistoryStore::load(blocker.join("history.json"), 50);
    store.record_at(&song(1), at(1));
    assert_eq!(store.len(), 1);
}

#[cfg(unix)]
#[test]
fn non_utf8_path_is_skipped_and_the_rest_still_saves() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("history.json");
    let latin1 = Path::new(OsStr::from_bytes(b"/music/caf\xe9.mp3"));

    let mut store = HistoryStore::load(&path, 50);
    store.record_at(&song(1), at(1));
    store.record_at(latin1, at(2));
    store.record_at(&song(2), at(3));
    assert_eq!(store.len(), 2);
    assert!(!store.contains(latin1));

    let reloaded = HistoryStore::load(&path, 50);
    let paths: Vec<PathBuf> = reloaded.entries().map(|e| e.path.clone()).collect();
    assert_eq!(paths, vec![song(2), song(1)]);
}

#[test]
fn display_name_is_the_base_name() {
    assert_eq!(display_name(Path::new("/a/b/track.flac")), "track.flac");
    assert_eq!(display_name(Path::new("/")), "/");
}
