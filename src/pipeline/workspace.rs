//! Temporary artifacts of one run, removed when the workspace is dropped

use crate::error::{RepackError, Result};
use crate::pipeline::ChapterSource;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Metadata document (seed export, then the composed document)
pub const METADATA_FILE: &str = "combined.metadata.txt";
/// Concat manifest
pub const MANIFEST_FILE: &str = "list_audio_files.txt";
/// Stem of the concatenated file before the cover is attached
pub const INTERMEDIATE_STEM: &str = "i";

/// Owns every temporary file created inside a book folder.
///
/// Tracked files are deleted on drop, on success and on every error path.
/// A failed deletion is logged and does not stop the others.
pub struct Workspace {
    folder: PathBuf,
    artifacts: Vec<PathBuf>,
    keep: bool,
}

impl Workspace {
    pub fn new(folder: &Path, keep: bool) -> Self {
        Self {
            folder: folder.to_path_buf(),
            artifacts: Vec::new(),
            keep,
        }
    }

    /// Register a path for cleanup and return it
    pub fn track(&mut self, path: PathBuf) -> PathBuf {
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path.clone());
        }
        path
    }

    pub fn metadata_path(&mut self) -> PathBuf {
        self.track(self.folder.join(METADATA_FILE))
    }

    pub fn intermediate_path(&mut self, extension: &str) -> PathBuf {
        self.track(
            self.folder
                .join(format!("{}.{}", INTERMEDIATE_STEM, extension)),
        )
    }

    /// Copy each chapter to `<folder>/<n>.tmp`, numbered from 0 in chapter order
    pub fn stage_copies(&mut self, sources: &[ChapterSource]) -> Result<Vec<PathBuf>> {
        let mut copies = Vec::with_capacity(sources.len());

        for (i, source) in sources.iter().enumerate() {
            let copy = self.track(self.folder.join(format!("{}.tmp", i)));
            fs::copy(&source.path, &copy).map_err(|e| {
                RepackError::io(
                    format!(
                        "Failed to copy {} -> {}",
                        source.path.display(),
                        copy.display()
                    ),
                    e,
                )
            })?;
            copies.push(copy);
        }

        Ok(copies)
    }

    /// Write the concat manifest listing `files` in order
    pub fn write_manifest(&mut self, files: &[PathBuf]) -> Result<PathBuf> {
        let manifest = self.track(self.folder.join(MANIFEST_FILE));
        fs::write(&manifest, manifest_contents(files)).map_err(|e| {
            RepackError::io(format!("Failed to write {}", manifest.display()), e)
        })?;
        Ok(manifest)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.keep {
            debug!("keeping {} temporary file(s)", self.artifacts.len());
            return;
        }

        for path in &self.artifacts {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(path) {
                Ok(()) => debug!("removed {}", path.display()),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to clean up temporary file"),
            }
        }
    }
}

/// One `file '<path>'` line per file, quoted for the concat demuxer
fn manifest_contents(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|f| format!("file '{}'\n", f.to_string_lossy().replace('\'', "'\\''")))
        .collect()
}
