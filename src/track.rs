//! Defines `CachedTrack`, the metadata record the playback pipeline hands
//! to the notifier and the prober.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for a playable track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedTrack {
    /// Link to the track on its source platform.
    pub url: String,
    /// Display title.
    pub name: String,
    /// Length in whole seconds, `0` when unknown.
    #[serde(default)]
    pub duration: u64,
    /// Who requested the track.
    pub user: String,
    /// Source platform name (e.g. "youtube", "spotify").
    pub platform: String,
    /// Thumbnail image URL, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Local media file once downloaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl CachedTrack {
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        duration: u64,
        user: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            duration,
            user: user.into(),
            platform: platform.into(),
            thumbnail: None,
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, file_path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    /// Whether the duration still has to be probed from the local file.
    pub fn needs_duration(&self) -> bool {
        self.duration == 0 && self.file_path.is_some()
    }
}
