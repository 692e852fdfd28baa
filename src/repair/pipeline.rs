use std::path::{Path, PathBuf};

use crate::audio::sniff_decoder;
use crate::config::RepairSettings;
use crate::error::RepairError;

use super::render::render_wav;
use super::temp::TempAudioFile;
use super::transcoder::Transcoder;

/// Turns a file the decoder rejected into a playable temporary WAV.
pub struct Repairer {
    transcoder: Transcoder,
    temp_dir: Option<PathBuf>,
}

impl Repairer {
    pub fn new(settings: &RepairSettings) -> Self {
        Self {
            transcoder: Transcoder::new(settings.program.clone()),
            temp_dir: settings.temp_dir.clone(),
        }
    }

    /// Produce a repaired copy of `source`.
    ///
    /// The scratch file is allocated before any conversion runs, and released
    /// on every failure path, so nothing is left behind when this returns `Err`.
    pub fn repair(&self, source: &Path) -> Result<TempAudioFile, RepairError> {
        let temp = TempAudioFile::create(self.temp_dir.as_deref())?;

        let converted = if self.transcoder.is_available() {
            self.transcoder.convert(source, temp.path())
        } else {
            tracing::info!(
                "{} not found, trying to decode {} directly",
                self.transcoder.program(),
                source.display()
            );
            library_fallback(source, temp.path())
        };

        match converted {
            Ok(()) => {
                tracing::info!("repaired {} into {}", source.display(), temp.path().display());
                Ok(temp)
            }
            Err(e) => {
                tracing::warn!("repair of {} failed: {e}", source.display());
                temp.release();
                Err(e)
            }
        }
    }
}

/// Decode by content sniffing and write plain PCM, for when no transcoder is installed.
fn library_fallback(source: &Path, output: &Path) -> Result<(), RepairError> {
    let decoder = sniff_decoder(source).map_err(|e| RepairError::NoFixAvailable {
        reason: e.to_string(),
    })?;
    render_wav(decoder, output)
}
