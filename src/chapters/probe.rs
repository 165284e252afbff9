use crate::chapters::title;
use crate::error::{RepackError, Result};
use crate::media::MediaTool;
use serde::Serialize;
use std::path::Path;

/// Fractional digits the duration probe is expected to print.
///
/// Removing the decimal point from `<seconds>.<6 digits>` gives microseconds
/// exactly, so the conversion never goes through floating point.
pub const DURATION_FRACTION_DIGITS: usize = 6;

/// Measured duration and display title of one chapter file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterProbe {
    pub duration_us: u64,
    pub title: String,
}

/// Probe one chapter file for its duration and title
pub fn probe_chapter(tool: &dyn MediaTool, file: &Path, extension: &str) -> Result<ChapterProbe> {
    let raw = tool
        .probe_duration(file)
        .map_err(|e| RepackError::Probe {
            path: file.to_path_buf(),
            reason: e.to_string(),
        })?;

    let duration_us = duration_to_micros(&raw).map_err(|reason| RepackError::Probe {
        path: file.to_path_buf(),
        reason,
    })?;

    Ok(ChapterProbe {
        duration_us,
        title: title::resolve(tool, file, extension),
    })
}

/// Convert a duration like `"450.500000"` to microseconds by dropping the
/// decimal point
pub fn duration_to_micros(raw: &str) -> Result<u64, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err("no duration reported".to_string());
    }

    let (seconds, fraction) = text
        .split_once('.')
        .ok_or_else(|| format!("duration '{}' has no fractional part", text))?;

    if seconds.is_empty() || !seconds.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("unexpected duration '{}'", text));
    }
    if fraction.len() != DURATION_FRACTION_DIGITS || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(format!(
            "duration '{}' does not have exactly {} fractional digits",
            text, DURATION_FRACTION_DIGITS
        ));
    }

    format!("{}{}", seconds, fraction)
        .parse::<u64>()
        .map_err(|e| format!("duration '{}' out of range: {}", text, e))
}
