use crate::config::ToolsConfig;
use crate::error::ToolError;
use crate::media::MediaTool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Lines of stderr kept when a command fails
const STDERR_TAIL_LINES: usize = 10;

/// `ffmpeg`/`ffprobe` subprocess backend
#[derive(Debug, Clone)]
pub struct Ffmpeg {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

impl Ffmpeg {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    pub fn from_config(tools: &ToolsConfig) -> Self {
        Self::new(&tools.ffmpeg, &tools.ffprobe)
    }

    /// Run a command to completion, returning stdout on success
    fn run(&self, program: &Path, args: Vec<OsString>) -> Result<String, ToolError> {
        let tool = program.display().to_string();
        debug!(
            "running {} {}",
            tool,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ToolError::Launch {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ToolError::Exit {
                tool,
                status: output.status.to_string(),
                stderr: stderr_tail(&String::from_utf8_lossy(&output.stderr)),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl MediaTool for Ffmpeg {
    fn probe_title_tags(&self, file: &Path) -> Result<String, ToolError> {
        self.run(&self.ffprobe, title_probe_args(file))
    }

    fn probe_duration(&self, file: &Path) -> Result<String, ToolError> {
        self.run(&self.ffprobe, duration_probe_args(file))
    }

    fn export_metadata(&self, file: &Path, dest: &Path) -> Result<(), ToolError> {
        self.run(&self.ffmpeg, export_metadata_args(file, dest))
            .map(drop)
    }

    fn concat(&self, manifest: &Path, metadata: &Path, output: &Path) -> Result<(), ToolError> {
        self.run(&self.ffmpeg, concat_args(manifest, metadata, output))
            .map(drop)
    }

    fn attach_cover(&self, input: &Path, cover: &Path, output: &Path) -> Result<(), ToolError> {
        self.run(&self.ffmpeg, attach_cover_args(input, cover, output))
            .map(drop)
    }
}

fn args<I, S>(items: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    items.into_iter().map(Into::into).collect()
}

fn title_probe_args(file: &Path) -> Vec<OsString> {
    let mut a = args(["-v", "quiet", "-show_entries", "format_tags=title"]);
    a.push(file.into());
    a
}

fn duration_probe_args(file: &Path) -> Vec<OsString> {
    let mut a = args(["-v", "quiet", "-of", "csv=p=0", "-show_entries", "format=duration"]);
    a.push(file.into());
    a
}

fn export_metadata_args(file: &Path, dest: &Path) -> Vec<OsString> {
    let mut a = args(["-y", "-loglevel", "error", "-i"]);
    a.push(file.into());
    a.extend(args(["-f", "ffmetadata"]));
    a.push(dest.into());
    a
}

fn concat_args(manifest: &Path, metadata: &Path, output: &Path) -> Vec<OsString> {
    let mut a = args(["-hide_banner", "-loglevel", "error", "-y"]);
    a.extend(args(["-f", "concat", "-safe", "0", "-i"]));
    a.push(manifest.into());
    a.push("-i".into());
    a.push(metadata.into());
    a.extend(args(["-map", "0:a", "-map_metadata", "1", "-map_chapters", "1", "-c", "copy"]));
    a.push(output.into());
    a
}

fn attach_cover_args(input: &Path, cover: &Path, output: &Path) -> Vec<OsString> {
    let mut a = args(["-hide_banner", "-loglevel", "error", "-y", "-i"]);
    a.push(input.into());
    a.push("-i".into());
    a.push(cover.into());
    a.extend(args([
        "-map",
        "0",
        "-map",
        "1",
        "-c",
        "copy",
        "-disposition:v",
        "attached_pic",
    ]));
    a.push(output.into());
    a
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.trim().lines().collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
