use crate::chapters::ChapterProbe;
use crate::error::{RepackError, Result};
use serde::Serialize;

/// A chapter positioned on the book's timeline, in microseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// 1-based position in the book
    pub index: usize,
    pub duration_us: u64,
    pub title: String,
    pub start_us: u64,
    pub end_us: u64,
}

/// Lay chapters end to end in input order.
///
/// The first chapter starts at 0, each ends at `start + duration`, and the
/// next one starts one microsecond after the previous end.
pub fn build_timeline(probes: Vec<ChapterProbe>) -> Result<Vec<Chapter>> {
    let mut chapters = Vec::with_capacity(probes.len());
    let mut start_us = 0u64;
    let total = probes.len();

    for (i, probe) in probes.into_iter().enumerate() {
        let index = i + 1;
        let end_us = start_us
            .checked_add(probe.duration_us)
            .ok_or(RepackError::Timeline { index })?;
        chapters.push(Chapter {
            index,
            duration_us: probe.duration_us,
            title: probe.title,
            start_us,
            end_us,
        });
        if index < total {
            start_us = end_us
                .checked_add(1)
                .ok_or(RepackError::Timeline { index: index + 1 })?;
        }
    }

    Ok(chapters)
}
