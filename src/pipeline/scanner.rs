use crate::error::{RepackError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One chapter file, in book order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSource {
    /// 1-based position in the sorted file list
    pub index: usize,
    pub path: PathBuf,
}

/// List the chapter files directly inside `dir`, sorted by file name.
///
/// The sort order is the chapter order. Files named in `exclude` (leftover
/// intermediates from an earlier run) are skipped.
pub fn scan_chapters(dir: &Path, extension: &str, exclude: &[&str]) -> Result<Vec<ChapterSource>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            RepackError::io(
                format!("Failed to list {}", dir.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
            )
        })?;
        let path = entry.path();

        if !entry.file_type().is_file() || !has_extension(path, extension) {
            continue;
        }
        let excluded = path
            .file_name()
            .is_some_and(|n| exclude.iter().any(|x| n == *x));
        if !excluded {
            paths.push(path.to_path_buf());
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths
        .into_iter()
        .enumerate()
        .map(|(i, path)| ChapterSource { index: i + 1, path })
        .collect())
}

/// Check a path's extension, ignoring case
fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
