use std::fs;
use std::path::Path;

use tempfile::tempdir;

use super::scan::is_audio_file;
use super::*;
use crate::audio::tests::write_test_wav;
use crate::config::LibrarySettings;

#[test]
fn is_audio_file_matches_configured_extensions_case_insensitive() {
    let settings = LibrarySettings::default();
    assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.m4a"), &settings));
    assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
    assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
}

#[test]
fn scan_filters_non_audio_and_sorts_by_name_case_insensitive() {
    let dir = tempdir().unwrap();

    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

    let files = scan(dir.path(), &LibrarySettings::default());
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["A.ogg", "b.MP3"]);
    assert!(files[0].duration.is_none());
}

#[test]
fn scan_skips_hidden_files_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
    fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

    let files = scan(dir.path(), &LibrarySettings::default());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "visible.mp3");

    let settings = LibrarySettings {
        include_hidden: true,
        ..LibrarySettings::default()
    };
    assert_eq!(scan(dir.path(), &settings).len(), 2);
}

#[test]
fn scan_respects_recursive_false() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"not real").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        ..LibrarySettings::default()
    };
    let files = scan(dir.path(), &settings);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "root.mp3");
}

#[test]
fn scan_reads_duration_from_real_audio() {
    let dir = tempdir().unwrap();
    write_test_wav(&dir.path().join("tone.wav"), 1.0, 8_000);

    let files = scan(dir.path(), &LibrarySettings::default());
    let d = files[0].duration.unwrap();
    assert!(d.as_millis() >= 900 && d.as_millis() <= 1100, "{d:?}");
}

#[cfg(unix)]
#[test]
fn scan_resolves_symlinks_to_their_target() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    let shelf = dir.path().join("shelf");
    fs::create_dir_all(&real).unwrap();
    fs::create_dir_all(&shelf).unwrap();
    fs::write(real.join("a.mp3"), b"not real").unwrap();
    std::os::unix::fs::symlink(real.join("a.mp3"), shelf.join("link.mp3")).unwrap();

    let files = scan(&shelf, &LibrarySettings::default());
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "link.mp3");
    assert_eq!(files[0].path, fs::canonicalize(real.join("a.mp3")).unwrap());
}
