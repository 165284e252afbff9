use crate::metadata::OutputTags;
use anyhow::{Context, Result};
use std::path::Path;

/// Read the tags of an assembled MP4 audiobook
pub fn read_output_tags(path: &Path) -> Result<OutputTags> {
    let tag = mp4ameta::Tag::read_from_path(path)
        .with_context(|| format!("Failed to read audiobook file: {}", path.display()))?;

    Ok(OutputTags {
        title: tag.title().map(String::from),
        artist: tag.artist().map(String::from),
        album: tag.album().map(String::from),
        album_artist: tag.album_artist().map(String::from),
        duration_seconds: tag.duration().map(|d| d.as_secs()),
        cover_info: tag.artwork().map(|art| {
            let fmt = match art.fmt {
                mp4ameta::ImgFmt::Jpeg => "JPEG",
                mp4ameta::ImgFmt::Png => "PNG",
                mp4ameta::ImgFmt::Bmp => "BMP",
            };
            format!("embedded ({} bytes, {})", art.data.len(), fmt)
        }),
    })
}
