//! External transcoder invocation (`ffmpeg` command line).

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::RepairError;

/// Target format of a repaired file.
pub const TARGET_SAMPLE_RATE: u32 = 44_100;
pub const TARGET_CHANNELS: u16 = 2;

pub struct Transcoder {
    program: String,
}

impl Transcoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Whether the program can be started at all (`<program> -version`).
    pub fn is_available(&self) -> bool {
        let probe = Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match probe {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("{} is not available: {e}", self.program);
                false
            }
        }
    }

    /// Convert `input` into 16-bit stereo 44.1 kHz PCM WAV at `output`, overwriting it.
    ///
    /// Blocks until the tool exits. A non-zero exit carries the tool's stderr.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<(), RepairError> {
        tracing::info!("transcoding {} with {}", input.display(), self.program);
        let result = Command::new(&self.program)
            .args(conversion_args(input, output))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| RepairError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if result.status.success() {
            Ok(())
        } else {
            Err(RepairError::Transcode {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            })
        }
    }
}

/// Fixed arguments: resample, force s16le stereo, normalise dynamics, quiet, overwrite.
pub(super) fn conversion_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), input.into()];
    for a in [
        "-acodec".to_string(),
        "pcm_s16le".to_string(),
        "-ar".to_string(),
        TARGET_SAMPLE_RATE.to_string(),
        "-ac".to_string(),
        TARGET_CHANNELS.to_string(),
        "-af".to_string(),
        "dynaudnorm".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ] {
        args.push(a.into());
    }
    args.push(output.into());
    args
}
