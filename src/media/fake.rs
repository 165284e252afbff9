//! Recording stand-in for the media tool, used by pipeline tests

use crate::error::ToolError;
use crate::media::MediaTool;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ProbeTitle(PathBuf),
    ProbeDuration(PathBuf),
    Export(PathBuf),
    Concat,
    AttachCover,
}

/// Answers probes from per-file tables and writes placeholder outputs
#[derive(Default)]
pub struct FakeTool {
    /// Keyed by file name
    pub durations: HashMap<String, String>,
    /// Keyed by file name
    pub titles: HashMap<String, String>,
    pub seed: String,
    pub fail_concat: bool,
    pub fail_cover: bool,
    pub calls: RefCell<Vec<Call>>,
    /// Manifest and metadata contents observed by `concat`
    pub seen_manifest: RefCell<Option<String>>,
    pub seen_metadata: RefCell<Option<String>>,
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn exit(tool: &str) -> ToolError {
    ToolError::Exit {
        tool: tool.to_string(),
        status: "exit status: 1".to_string(),
        stderr: "simulated failure".to_string(),
    }
}

impl FakeTool {
    pub fn with_seed(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            ..Self::default()
        }
    }

    pub fn chapter(mut self, file: &str, duration: &str, title: Option<&str>) -> Self {
        self.durations.insert(file.to_string(), duration.to_string());
        if let Some(title) = title {
            self.titles.insert(file.to_string(), title.to_string());
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl MediaTool for FakeTool {
    fn probe_title_tags(&self, file: &Path) -> Result<String, ToolError> {
        self.calls
            .borrow_mut()
            .push(Call::ProbeTitle(file.to_path_buf()));
        Ok(match self.titles.get(&name_of(file)) {
            Some(title) => format!("[FORMAT]\nTAG:title={}\n[/FORMAT]\n", title),
            None => "[FORMAT]\n[/FORMAT]\n".to_string(),
        })
    }

    fn probe_duration(&self, file: &Path) -> Result<String, ToolError> {
        self.calls
            .borrow_mut()
            .push(Call::ProbeDuration(file.to_path_buf()));
        self.durations
            .get(&name_of(file))
            .map(|d| format!("{}\n", d))
            .ok_or_else(|| exit("ffprobe"))
    }

    fn export_metadata(&self, file: &Path, dest: &Path) -> Result<(), ToolError> {
        self.calls.borrow_mut().push(Call::Export(file.to_path_buf()));
        fs::write(dest, &self.seed).map_err(|source| ToolError::Launch {
            tool: "ffmpeg".to_string(),
            source,
        })
    }

    fn concat(&self, manifest: &Path, metadata: &Path, output: &Path) -> Result<(), ToolError> {
        self.calls.borrow_mut().push(Call::Concat);
        *self.seen_manifest.borrow_mut() = fs::read_to_string(manifest).ok();
        *self.seen_metadata.borrow_mut() = fs::read_to_string(metadata).ok();
        if self.fail_concat {
            return Err(exit("ffmpeg"));
        }
        fs::write(output, b"muxed").map_err(|source| ToolError::Launch {
            tool: "ffmpeg".to_string(),
            source,
        })
    }

    fn attach_cover(&self, input: &Path, cover: &Path, output: &Path) -> Result<(), ToolError> {
        self.calls.borrow_mut().push(Call::AttachCover);
        if self.fail_cover || !input.exists() || !cover.exists() {
            return Err(exit("ffmpeg"));
        }
        fs::write(output, b"final").map_err(|source| ToolError::Launch {
            tool: "ffmpeg".to_string(),
            source,
        })
    }
}
