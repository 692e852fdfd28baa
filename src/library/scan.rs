use std::fs;
use std::path::Path;

use lofty::file::AudioFile as _;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::AudioFile;

pub fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Collect the audio files under `dir`, sorted case-insensitively by name.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<AudioFile> {
    let mut files: Vec<AudioFile> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_audio_file(path, settings) {
            continue;
        }

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let duration = lofty::read_from_path(path)
            .ok()
            .map(|tagged| tagged.properties().duration());

        // Symlinks resolve to their target, the form history records.
        let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        files.push(AudioFile {
            path,
            name,
            duration,
        });
    }

    files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    tracing::debug!("found {} audio files under {}", files.len(), dir.display());
    files
}
