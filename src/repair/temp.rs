use std::path::{Path, PathBuf};

use tempfile::{Builder, TempPath};

use crate::error::RepairError;

/// A `.wav` scratch file that is deleted when released or dropped.
#[derive(Debug)]
pub struct TempAudioFile {
    path: TempPath,
}

impl TempAudioFile {
    /// Create an empty `.wav` file in `dir`, or the system temp dir.
    pub fn create(dir: Option<&Path>) -> Result<Self, RepairError> {
        let mut builder = Builder::new();
        builder.prefix("tonearm-").suffix(".wav");
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(RepairError::TempFile)?;

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, logging instead of failing if that is not possible.
    pub fn release(self) {
        let path: PathBuf = self.path.to_path_buf();
        match self.path.close() {
            Ok(()) => tracing::debug!("removed temporary file {}", path.display()),
            Err(e) => tracing::warn!("could not remove temporary file {}: {e}", path.display()),
        }
    }
}
