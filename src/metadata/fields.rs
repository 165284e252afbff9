use serde::{Deserialize, Serialize};

/// Tags read back from an assembled audiobook
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub duration_seconds: Option<u64>,
    /// Cover art info (not the bytes - just format and size)
    pub cover_info: Option<String>,
}
