use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::Config;
use crate::media::Ffmpeg;
use crate::metadata::read_output_tags;
use crate::pipeline::{Pipeline, PipelineOptions, Progress};

/// Run the build command
pub fn run(folder: &Path, output_dir: Option<&PathBuf>, keep_temp: bool, quiet: bool) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    let tool = Ffmpeg::from_config(&config.tools);
    let options = PipelineOptions::from_config(&config, output_dir, keep_temp);
    let pipeline = Pipeline::new(&tool, options);

    let output = pipeline
        .run_with_progress(folder, |progress| {
            if !quiet {
                print_progress(progress);
            }
        })
        .with_context(|| format!("Failed to build audiobook from {:?}", folder))?;

    if !quiet {
        print!("\r\x1b[K");
        io::stdout().flush().ok();
    }

    println!("{} {}", "✓".green(), output.display().to_string().bold());

    if !quiet {
        print_summary(&output);
    }

    Ok(())
}

fn print_progress(progress: Progress<'_>) {
    match progress {
        Progress::Probing { index, total, path } => {
            print!(
                "\r\x1b[KProbing {}/{} ({})",
                index,
                total,
                path.file_name().unwrap_or_default().to_string_lossy()
            );
        }
        Progress::Composed {
            chapters,
            synthesized,
        } => {
            print!("\r\x1b[K");
            let source = if synthesized {
                "folder name".yellow()
            } else {
                "album tag".cyan()
            };
            println!("Composed {} chapter(s), title from {}", chapters, source);
        }
        Progress::Staging { files } => {
            println!("Staging {} chapter file(s)", files);
        }
        Progress::Concatenating { .. } => {
            println!("Concatenating chapters...");
        }
        Progress::AttachingCover { output } => {
            println!(
                "Attaching cover to {}",
                output.file_name().unwrap_or_default().to_string_lossy()
            );
        }
    }
    io::stdout().flush().ok();
}

/// Read the tags back from the produced file; unreadable output is only a warning
fn print_summary(output: &Path) {
    match read_output_tags(output) {
        Ok(tags) => {
            let fields = [
                ("Title", tags.title),
                ("Artist", tags.artist),
                ("Album artist", tags.album_artist),
                ("Cover", tags.cover_info),
            ];
            for (label, value) in fields {
                if let Some(v) = value {
                    println!("{:>14}: {}", label.cyan(), v);
                }
            }
        }
        Err(e) => warn!("could not read tags back from {}: {:#}", output.display(), e),
    }
}
