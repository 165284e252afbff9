use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::chapters::Chapter;
use crate::config::Config;
use crate::media::Ffmpeg;
use crate::pipeline::{Pipeline, PipelineOptions};

pub fn run(folder: &Path, json: bool) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    let tool = Ffmpeg::from_config(&config.tools);
    let pipeline = Pipeline::new(&tool, PipelineOptions::from_config(&config, None, false));

    let chapters = pipeline
        .preview(folder)
        .with_context(|| format!("Failed to read chapters from {:?}", folder))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chapters)?);
    } else {
        print_table(&chapters);
    }

    Ok(())
}

fn print_table(chapters: &[Chapter]) {
    for chapter in chapters {
        println!(
            "{:>4}  {} - {}  {}",
            chapter.index.to_string().cyan(),
            format_timestamp(chapter.start_us),
            format_timestamp(chapter.end_us),
            chapter.title
        );
    }

    if let Some(last) = chapters.last() {
        println!();
        println!(
            "{} chapter(s), total {}",
            chapters.len(),
            format_timestamp(last.end_us).bold()
        );
    }
}

/// Microseconds as `HH:MM:SS.mmm`
fn format_timestamp(us: u64) -> String {
    let millis = us / 1_000;
    let seconds = millis / 1_000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60,
        millis % 1_000
    )
}
