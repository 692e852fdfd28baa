use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::Source;

use super::sink::open_decoder;

/// Best-effort length of the file at `path`; zero when nothing can tell.
///
/// The decoder is asked first since it sees the actual stream; tag
/// properties cover formats whose decoder cannot report a length.
pub fn duration_of(path: &Path) -> Duration {
    let from_decoder = open_decoder(path)
        .ok()
        .and_then(|source| source.total_duration())
        .filter(|d| !d.is_zero());
    if let Some(d) = from_decoder {
        return d;
    }

    match lofty::read_from_path(path) {
        Ok(tagged) => tagged.properties().duration(),
        Err(e) => {
            tracing::debug!("no duration for {}: {e}", path.display());
            Duration::ZERO
        }
    }
}
