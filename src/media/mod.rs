//! The external media tool surface: probing, metadata export, concat and cover attach

mod ffmpeg;
#[cfg(test)]
pub mod fake;

pub use ffmpeg::Ffmpeg;

use crate::error::ToolError;
use std::path::Path;

/// Operations the pipeline delegates to an external transcoder
pub trait MediaTool {
    /// Raw `key=value` listing of the container's title tag
    fn probe_title_tags(&self, file: &Path) -> Result<String, ToolError>;

    /// Container duration in seconds, as the tool prints it
    fn probe_duration(&self, file: &Path) -> Result<String, ToolError>;

    /// Write the file's container-level tags as a metadata document at `dest`
    fn export_metadata(&self, file: &Path, dest: &Path) -> Result<(), ToolError>;

    /// Concatenate the files listed in `manifest`, attaching `metadata`
    fn concat(&self, manifest: &Path, metadata: &Path, output: &Path) -> Result<(), ToolError>;

    /// Re-mux `input` with `cover` attached as cover art
    fn attach_cover(&self, input: &Path, cover: &Path, output: &Path) -> Result<(), ToolError>;
}
