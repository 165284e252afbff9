use crate::error::{RepackError, Result};
use serde::Serialize;
use std::path::Path;

/// Ends the title span: `"<title>- Writ"`
pub const TITLE_SEPARATOR: &str = "- Writ";
/// Starts the author span: `"ten by <author>"`
pub const AUTHOR_PREFIX: &str = "ten by ";
/// Ends the author span: `"<author> -"`
pub const AUTHOR_SEPARATOR: &str = " -";
/// Starts the narrator span, which runs to the end of the string
pub const NARRATOR_PREFIX: &str = " Narrated by ";

/// Book identity derived from the folder name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookInfo {
    pub title: String,
    pub author: Option<String>,
    pub narrator: Option<String>,
}

impl BookInfo {
    /// Parse `"<title> - Written by <author> - Narrated by <narrator>"`.
    ///
    /// Spans are greedy: the title ends at the last "- Written by " that still
    /// leaves a narrator section, and the author ends at the last
    /// " - Narrated by ". Title and author are trimmed, the narrator is kept
    /// verbatim.
    pub fn parse(name: &str) -> Result<Self> {
        let written_by = [TITLE_SEPARATOR, AUTHOR_PREFIX].concat();
        let narrated_by = [AUTHOR_SEPARATOR, NARRATOR_PREFIX].concat();

        let (title, rest) = name
            .rmatch_indices(&written_by)
            .find_map(|(pos, _)| {
                let rest = &name[pos + written_by.len()..];
                rest.contains(&narrated_by).then(|| (&name[..pos], rest))
            })
            .ok_or_else(|| RepackError::Parse(name.to_string()))?;

        let split = rest
            .rfind(&narrated_by)
            .ok_or_else(|| RepackError::Parse(name.to_string()))?;
        let author = &rest[..split];
        let narrator = &rest[split + narrated_by.len()..];

        let title = title.trim();
        if title.is_empty() {
            return Err(RepackError::Parse(name.to_string()));
        }

        Ok(Self {
            title: title.to_string(),
            author: non_empty(author.trim()),
            narrator: non_empty(narrator),
        })
    }

    /// `"<author>; <narrator>"`, used for the artist tag
    pub fn artist(&self) -> String {
        format!(
            "{}; {}",
            self.author.as_deref().unwrap_or_default(),
            self.narrator.as_deref().unwrap_or_default()
        )
    }

    /// `"Narrated by <narrator>"`, used for the album_artist tag
    pub fn album_artist(&self) -> String {
        format!(
            "Narrated by {}",
            self.narrator.as_deref().unwrap_or_default()
        )
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Display name of a book folder: its base name with stray quotes removed
pub fn display_name(folder: &Path) -> Option<String> {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', ""))
        .filter(|n| !n.is_empty())
}
