use std::path::PathBuf;
use std::time::Duration;

/// An audio file found while scanning a directory.
#[derive(Clone, Debug)]
pub struct AudioFile {
    pub path: PathBuf,
    pub name: String,
    pub duration: Option<Duration>,
}
