//! Chapter display titles: embedded tag first, file name as a fallback

use crate::media::MediaTool;
use std::path::Path;
use tracing::debug;

/// Prefix of the title line in ffprobe's default output
const TAG_TITLE_PREFIX: &str = "TAG:title=";
/// Marks the start of the title in conventionally named chapter files
const FILENAME_TITLE_MARKER: &str = "- ";

/// Resolve a chapter's display title.
///
/// Uses the embedded title tag when the tool reports one; otherwise falls back
/// to [`title_from_filename`]. Never fails.
pub fn resolve(tool: &dyn MediaTool, file: &Path, extension: &str) -> String {
    match tool.probe_title_tags(file) {
        Ok(listing) => {
            if let Some(title) = title_from_tags(&listing) {
                return title;
            }
            debug!("no title tag in {}", file.display());
        }
        Err(e) => debug!("title probe failed for {}: {}", file.display(), e),
    }

    title_from_filename(file, extension)
}

/// First `TAG:title=` value in a probe listing, verbatim
pub fn title_from_tags(listing: &str) -> Option<String> {
    listing
        .lines()
        .find_map(|line| line.strip_prefix(TAG_TITLE_PREFIX))
        .map(|t| t.trim_end_matches('\r').to_string())
}

/// Best-effort title from a name like `"Book - Chapter 01.m4a"` → `"Chapter 01"`.
///
/// Takes the text after the last `"- "` up to the extension marker. Names that
/// don't follow that convention may yield an empty or truncated title.
pub fn title_from_filename(file: &Path, extension: &str) -> String {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let start = name
        .rfind(FILENAME_TITLE_MARKER)
        .map(|i| i + FILENAME_TITLE_MARKER.len())
        .unwrap_or(0);
    let marker = format!(".{}", extension);
    let end = name
        .to_ascii_lowercase()
        .rfind(&marker.to_ascii_lowercase())
        .unwrap_or(name.len());

    if end <= start {
        return String::new();
    }
    name[start..end].to_string()
}
