//! ffmetadata documents: seed template parsing, title rewrite, chapter blocks

use crate::book::BookInfo;
use crate::chapters::Chapter;
use crate::error::{RepackError, Result};
use std::ops::Range;
use tracing::{debug, warn};

/// Chapter offsets are written in microseconds
pub const CHAPTER_TIMEBASE: &str = "1/1000000";

const TITLE_KEY: &str = "title=";
const ALBUM_KEY: &str = "album=";

/// Global section of a metadata document exported from one chapter file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTemplate {
    /// Header, comments and `key=value` lines, in their original order
    lines: Vec<String>,
    /// `[CHAPTER]`/`[STREAM]` sections found after the global tags
    dropped_sections: usize,
}

impl SeedTemplate {
    /// Split an exported document into its global lines.
    ///
    /// Sections of the source file are not carried over: the composed
    /// timeline replaces its chapters.
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut dropped_sections = 0;
        let mut continued = false;

        for line in text.lines() {
            if !continued && line.starts_with('[') {
                dropped_sections += 1;
            } else if dropped_sections == 0 {
                lines.push(line.to_string());
            }
            continued = ends_with_escape(line);
        }

        Self {
            lines,
            dropped_sections,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether both `title=` and `album=` global tags are present
    pub fn has_title_pair(&self) -> bool {
        self.find(TITLE_KEY).is_some() && self.find(ALBUM_KEY).is_some()
    }

    /// Index of the last line starting with `key`, skipping continuation lines
    fn find(&self, key: &str) -> Option<usize> {
        let mut found = None;
        let mut continued = false;
        for (i, line) in self.lines.iter().enumerate() {
            if !continued && line.starts_with(key) {
                found = Some(i);
            }
            continued = ends_with_escape(line);
        }
        found
    }
}

/// A complete metadata document: global tags followed by chapter blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDocument {
    pub globals: Vec<String>,
    pub chapters: Vec<Chapter>,
    /// True when the global tags were synthesized from the book info
    pub synthesized: bool,
}

impl MetadataDocument {
    /// Value of the `title=` global tag
    pub fn title(&self) -> Option<&str> {
        self.globals
            .iter()
            .rev()
            .find_map(|l| l.strip_prefix(TITLE_KEY))
    }

    /// Render as ffmetadata text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.globals {
            out.push_str(line);
            out.push('\n');
        }

        for chapter in &self.chapters {
            out.push_str("\n[CHAPTER]\n");
            out.push_str(&format!("TIMEBASE={}\n", CHAPTER_TIMEBASE));
            out.push_str(&format!("START={}\n", chapter.start_us));
            out.push_str(&format!("END={}\n", chapter.end_us));
            out.push_str(&format!("title={}\n", escape_value(&chapter.title)));
        }

        out
    }
}

/// Combine a seed template, the book identity and the chapter timeline.
///
/// When the seed has both `title=` and `album=`, the title takes the album's
/// value. Otherwise title, author, artist and album_artist are synthesized
/// from `book_info`, which is then required.
pub fn compose(
    seed: &SeedTemplate,
    book_info: Option<&BookInfo>,
    chapters: &[Chapter],
) -> Result<MetadataDocument> {
    let mut globals = seed.lines.clone();
    if globals.is_empty() {
        globals.push(";FFMETADATA1".to_string());
    }
    if seed.dropped_sections > 0 {
        debug!(
            "dropped {} section(s) from seed metadata",
            seed.dropped_sections
        );
    }

    let synthesized = match (seed.find(TITLE_KEY), seed.find(ALBUM_KEY)) {
        (Some(title), Some(album)) => {
            // Copy the album value with any continuation lines it spans
            let mut value = globals[value_span(&globals, album)].to_vec();
            value[0] = format!("{}{}", TITLE_KEY, &value[0][ALBUM_KEY.len()..]);
            let span = value_span(&globals, title);
            globals.splice(span, value);
            false
        }
        (title, _) => {
            warn!("seed metadata does not contain both 'title=' and 'album=' lines; using book info");
            let info = book_info.ok_or(RepackError::MissingBookInfo)?;

            let title_line = format!("{}{}", TITLE_KEY, escape_value(&info.title));
            match title {
                Some(i) => {
                    let span = value_span(&globals, i);
                    globals.splice(span, [title_line]);
                }
                None => globals.push(title_line),
            }
            globals.push(format!(
                "author={}",
                escape_value(info.author.as_deref().unwrap_or_default())
            ));
            globals.push(format!("artist={}", escape_value(&info.artist())));
            globals.push(format!("album_artist={}", escape_value(&info.album_artist())));
            true
        }
    };

    Ok(MetadataDocument {
        globals,
        chapters: chapters.to_vec(),
        synthesized,
    })
}

/// Escape `=`, `;`, `#`, `\` and newlines for an ffmetadata value
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// A line ending in an odd number of backslashes continues on the next line
fn ends_with_escape(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Lines holding the tag that starts at `start`, continuation lines included
fn value_span(lines: &[String], start: usize) -> Range<usize> {
    let mut end = start + 1;
    while end < lines.len() && ends_with_escape(&lines[end - 1]) {
        end += 1;
    }
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chapters::{build_timeline, ChapterProbe};

    fn book() -> BookInfo {
        BookInfo::parse("Dune - Written by Frank Herbert - Narrated by Scott Brick").unwrap()
    }

    fn chapters() -> Vec<Chapter> {
        build_timeline(vec![
            ChapterProbe {
                duration_us: 600_000_000,
                title: "Chapter 1".to_string(),
            },
            ChapterProbe {
                duration_us: 450_500_000,
                title: "Chapter 2".to_string(),
            },
        ])
        .unwrap()
    }

    fn title_lines(doc: &MetadataDocument) -> Vec<&String> {
        doc.globals
            .iter()
            .filter(|l| l.starts_with("title="))
            .collect()
    }

    const SEED_WITH_PAIR: &str = ";FFMETADATA1\nmajor_brand=M4A \ntitle=Dune: Chapter 1\nalbum=Dune\nartist=Frank Herbert\nencoder=Lavf60.3.100\n";

    #[test]
    fn test_parse_seed_keeps_global_lines() {
        let seed = SeedTemplate::parse(SEED_WITH_PAIR);
        assert_eq!(seed.lines().len(), 6);
        assert_eq!(seed.lines()[0], ";FFMETADATA1");
        assert!(seed.has_title_pair());
    }

    #[test]
    fn test_parse_seed_drops_sections() {
        let text = ";FFMETADATA1\nalbum=Dune\n[CHAPTER]\nTIMEBASE=1/1000\nSTART=0\nEND=5\ntitle=Old\n[STREAM]\ntitle=x\n";
        let seed = SeedTemplate::parse(text);
        assert_eq!(seed.lines(), &[";FFMETADATA1", "album=Dune"]);
        // The chapter's title= line is not a global tag
        assert!(!seed.has_title_pair());
    }

    #[test]
    fn test_continuation_lines_are_not_keys() {
        let text = ";FFMETADATA1\ncomment=first line\\\ntitle=still the comment\nalbum=Dune\n";
        let seed = SeedTemplate::parse(text);
        assert!(!seed.has_title_pair());
    }

    #[test]
    fn test_title_takes_album_value() {
        let seed = SeedTemplate::parse(SEED_WITH_PAIR);
        let doc = compose(&seed, None, &chapters()).unwrap();

        assert!(!doc.synthesized);
        assert_eq!(doc.title(), Some("Dune"));
        assert_eq!(title_lines(&doc), vec!["title=Dune"]);
        // Other lines untouched and in place
        assert_eq!(doc.globals.len(), seed.lines().len());
        assert_eq!(doc.globals[1], "major_brand=M4A ");
        assert_eq!(doc.globals[4], "artist=Frank Herbert");
    }

    #[test]
    fn test_multiline_album_is_copied_whole() {
        let text = ";FFMETADATA1\ntitle=Chapter 1\nalbum=Dune\\\nUnabridged\nartist=Frank Herbert\n";
        let seed = SeedTemplate::parse(text);
        let doc = compose(&seed, None, &chapters()).unwrap();

        assert_eq!(
            doc.globals,
            vec![
                ";FFMETADATA1",
                "title=Dune\\",
                "Unabridged",
                "album=Dune\\",
                "Unabridged",
                "artist=Frank Herbert",
            ]
        );
    }

    #[test]
    fn test_multiline_title_is_replaced_whole() {
        let text = ";FFMETADATA1\ntitle=Chapter\\\nOne\nalbum=Dune\nencoder=x\n";
        let seed = SeedTemplate::parse(text);
        let doc = compose(&seed, None, &chapters()).unwrap();

        assert_eq!(
            doc.globals,
            vec![";FFMETADATA1", "title=Dune", "album=Dune", "encoder=x"]
        );
    }

    #[test]
    fn test_compose_twice_gives_same_title() {
        let seed = SeedTemplate::parse(SEED_WITH_PAIR);
        let first = compose(&seed, None, &chapters()).unwrap();
        let second = compose(&seed, None, &chapters()).unwrap();
        assert_eq!(first.title(), second.title());
        assert_eq!(first.render(), second.render());
    }

    #[test]
    fn test_fallback_appends_four_tags() {
        let seed = SeedTemplate::parse(";FFMETADATA1\nencoder=Lavf60.3.100\n");
        let info = book();
        let doc = compose(&seed, Some(&info), &chapters()).unwrap();

        assert!(doc.synthesized);
        assert_eq!(
            doc.globals,
            vec![
                ";FFMETADATA1",
                "encoder=Lavf60.3.100",
                "title=Dune",
                "author=Frank Herbert",
                "artist=Frank Herbert\\; Scott Brick",
                "album_artist=Narrated by Scott Brick",
            ]
        );
    }

    #[test]
    fn test_album_without_title_uses_book_info() {
        let seed = SeedTemplate::parse(";FFMETADATA1\nalbum=My Audiobook\n");
        let info = book();
        let doc = compose(&seed, Some(&info), &chapters()).unwrap();

        assert!(doc.synthesized);
        assert_eq!(doc.title(), Some("Dune"));
        assert_eq!(doc.globals[1], "album=My Audiobook");
        assert_eq!(doc.globals.len(), 6);
    }

    #[test]
    fn test_title_without_album_keeps_single_title_line() {
        let seed = SeedTemplate::parse(";FFMETADATA1\ntitle=Chapter 1\nencoder=x\n");
        let info = book();
        let doc = compose(&seed, Some(&info), &chapters()).unwrap();

        assert_eq!(title_lines(&doc), vec!["title=Dune"]);
        assert_eq!(doc.globals[1], "title=Dune");
        assert_eq!(doc.globals[2], "encoder=x");
        assert_eq!(doc.globals.len(), 6);
    }

    #[test]
    fn test_fallback_requires_book_info() {
        let seed = SeedTemplate::parse(";FFMETADATA1\n");
        let err = compose(&seed, None, &chapters()).unwrap_err();
        assert!(matches!(err, RepackError::MissingBookInfo));
    }

    #[test]
    fn test_empty_seed_gets_header() {
        let seed = SeedTemplate::parse("");
        let doc = compose(&seed, Some(&book()), &[]).unwrap();
        assert_eq!(doc.globals[0], ";FFMETADATA1");
    }

    #[test]
    fn test_render_chapter_blocks() {
        let seed = SeedTemplate::parse(SEED_WITH_PAIR);
        let doc = compose(&seed, None, &chapters()).unwrap();
        let text = doc.render();

        assert!(text.starts_with(";FFMETADATA1\n"));
        assert!(text.contains("title=Dune\n"));
        assert!(text.ends_with(
            "\n[CHAPTER]\nTIMEBASE=1/1000000\nSTART=0\nEND=600000000\ntitle=Chapter 1\n\
             \n[CHAPTER]\nTIMEBASE=1/1000000\nSTART=600000001\nEND=1050500001\ntitle=Chapter 2\n"
        ));
        assert_eq!(text.matches("[CHAPTER]").count(), 2);
        let first = text.find("title=Chapter 1").unwrap();
        let second = text.find("title=Chapter 2").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_escape_value() {
        assert_eq!(escape_value("a=b;c#d\\e"), "a\\=b\\;c\\#d\\\\e");
        assert_eq!(escape_value("plain"), "plain");
    }
}
