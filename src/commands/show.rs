use crate::metadata::{read_output_tags, OutputTags};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(path: &Path, json: bool, quiet: bool) -> Result<()> {
    let tags = read_output_tags(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
    } else {
        print_pretty(&tags, path, quiet);
    }

    Ok(())
}

fn print_pretty(tags: &OutputTags, path: &Path, quiet: bool) {
    if !quiet {
        println!("{}", path.display().to_string().bold());
        println!("{}", "─".repeat(40));
    }

    print_field("Title", tags.title.as_deref());
    print_field("Artist", tags.artist.as_deref());
    print_field("Album", tags.album.as_deref());
    print_field("Album artist", tags.album_artist.as_deref());

    if let Some(duration) = tags.duration_seconds {
        print_field("Duration", Some(&format_duration(duration)));
    }

    print_field("Cover", tags.cover_info.as_deref());
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("{:>14}: {}", label.cyan(), v);
    }
}

fn format_duration(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
