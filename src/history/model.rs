use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One remembered file in the play history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub path: PathBuf,
    pub name: String,
    #[serde(with = "timestamp")]
    pub last_played: NaiveDateTime,
}

impl HistoryEntry {
    pub fn new(path: &Path, last_played: NaiveDateTime) -> Self {
        Self {
            path: path.to_path_buf(),
            name: display_name(path),
            last_played,
        }
    }

    /// `last_played` in the same format it is persisted with.
    pub fn last_played_label(&self) -> String {
        self.last_played.format(timestamp::FORMAT).to_string()
    }
}

/// Base name of `path`, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `last_played` is stored as local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
pub(super) mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(t: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
