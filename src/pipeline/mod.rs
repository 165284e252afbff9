//! Folder of chapter files → single chaptered audiobook

mod scanner;
mod workspace;

pub use scanner::{scan_chapters, ChapterSource};
pub use workspace::{Workspace, INTERMEDIATE_STEM};

use crate::book::{display_name, BookInfo};
use crate::chapters::{build_timeline, probe_chapter, Chapter, ChapterProbe};
use crate::config::Config;
use crate::error::{RepackError, Result};
use crate::media::MediaTool;
use crate::metadata::{compose, SeedTemplate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings for one run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input_extension: String,
    pub cover: String,
    pub output_extension: String,
    pub output_dir: PathBuf,
    /// Leave temporary files in the book folder
    pub keep_temp: bool,
}

impl PipelineOptions {
    pub fn from_config(config: &Config, output_dir: Option<&PathBuf>, keep_temp: bool) -> Self {
        Self {
            input_extension: config.input.extension.clone(),
            cover: config.input.cover.clone(),
            output_extension: config.output.extension.clone(),
            output_dir: config.output_dir(output_dir),
            keep_temp,
        }
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from_config(&Config::default(), None, false)
    }
}

/// A validated book folder
#[derive(Debug, Clone)]
pub struct BookFolder {
    pub folder: PathBuf,
    /// Folder base name, used for the output file name
    pub display_name: String,
    pub sources: Vec<ChapterSource>,
}

/// Progress events reported while a run advances
#[derive(Debug, Clone)]
pub enum Progress<'a> {
    Probing {
        index: usize,
        total: usize,
        path: &'a Path,
    },
    Composed {
        chapters: usize,
        synthesized: bool,
    },
    Staging {
        files: usize,
    },
    Concatenating {
        output: &'a Path,
    },
    AttachingCover {
        output: &'a Path,
    },
}

pub struct Pipeline<'t> {
    tool: &'t dyn MediaTool,
    options: PipelineOptions,
}

impl<'t> Pipeline<'t> {
    pub fn new(tool: &'t dyn MediaTool, options: PipelineOptions) -> Self {
        Self { tool, options }
    }

    /// Validate a book folder and list its chapters, without running any tool
    pub fn inspect(&self, folder: &Path) -> Result<BookFolder> {
        if !folder.is_dir() {
            return Err(RepackError::MissingResource(format!(
                "book folder {} does not exist or is not a directory",
                folder.display()
            )));
        }

        let folder = folder
            .canonicalize()
            .map_err(|e| RepackError::io(format!("Failed to resolve {}", folder.display()), e))?;

        let display_name = display_name(&folder).ok_or_else(|| {
            RepackError::MissingResource(format!("{} has no folder name", folder.display()))
        })?;

        // Our own files never count as chapters, including an earlier
        // build written into the book folder itself
        let mut skipped = vec![format!(
            "{}.{}",
            INTERMEDIATE_STEM, self.options.output_extension
        )];
        if self.writes_into(&folder) {
            skipped.push(self.output_file_name(&display_name));
            skipped.push(self.partial_file_name(&display_name));
        }
        let exclude: Vec<&str> = skipped.iter().map(String::as_str).collect();
        let sources = scan_chapters(&folder, &self.options.input_extension, &exclude)?;
        if sources.is_empty() {
            return Err(RepackError::MissingResource(format!(
                "no .{} chapter files in {}",
                self.options.input_extension,
                folder.display()
            )));
        }

        Ok(BookFolder {
            folder,
            display_name,
            sources,
        })
    }

    /// Probe the chapters and lay out the timeline without writing anything
    pub fn preview(&self, folder: &Path) -> Result<Vec<Chapter>> {
        let book = self.inspect(folder)?;
        let probes = self.probe_all(&book.sources, &mut |_: Progress<'_>| {})?;
        build_timeline(probes)
    }

    /// Assemble the book in `folder`, returning the path of the output file
    pub fn run(&self, folder: &Path) -> Result<PathBuf> {
        self.run_with_progress(folder, |_| {})
    }

    pub fn run_with_progress<F>(&self, folder: &Path, mut on_progress: F) -> Result<PathBuf>
    where
        F: FnMut(Progress<'_>),
    {
        let book = self.inspect(folder)?;

        let cover = book.folder.join(&self.options.cover);
        if !cover.is_file() {
            return Err(RepackError::MissingResource(format!(
                "cover image {} not found",
                cover.display()
            )));
        }
        if !self.options.output_dir.is_dir() {
            return Err(RepackError::MissingResource(format!(
                "output directory {} does not exist",
                self.options.output_dir.display()
            )));
        }
        let output = self
            .options
            .output_dir
            .join(self.output_file_name(&book.display_name));

        let mut workspace = Workspace::new(&book.folder, self.options.keep_temp);

        // Seed template from the first chapter
        let first = &book.sources[0].path;
        let metadata_path = workspace.metadata_path();
        self.tool
            .export_metadata(first, &metadata_path)
            .map_err(|e| RepackError::Probe {
                path: first.clone(),
                reason: format!("metadata export failed: {}", e),
            })?;
        let seed_text = fs::read_to_string(&metadata_path).map_err(|e| {
            RepackError::io(format!("Failed to read {}", metadata_path.display()), e)
        })?;
        let seed = SeedTemplate::parse(&seed_text);

        // Book info is only needed when the seed lacks title/album tags
        let book_info = if seed.has_title_pair() {
            None
        } else {
            Some(BookInfo::parse(&book.display_name)?)
        };

        let probes = self.probe_all(&book.sources, &mut on_progress)?;
        let chapters = build_timeline(probes)?;
        let document = compose(&seed, book_info.as_ref(), &chapters)?;
        on_progress(Progress::Composed {
            chapters: chapters.len(),
            synthesized: document.synthesized,
        });
        fs::write(&metadata_path, document.render()).map_err(|e| {
            RepackError::io(format!("Failed to write {}", metadata_path.display()), e)
        })?;
        info!(
            "composed metadata for {} chapter(s) in {}",
            chapters.len(),
            metadata_path.display()
        );

        on_progress(Progress::Staging {
            files: book.sources.len(),
        });
        let copies = workspace.stage_copies(&book.sources)?;
        let manifest = workspace.write_manifest(&copies)?;

        let intermediate = workspace.intermediate_path(&self.options.output_extension);
        on_progress(Progress::Concatenating {
            output: &intermediate,
        });
        self.tool
            .concat(&manifest, &metadata_path, &intermediate)
            .map_err(|e| RepackError::Mux {
                step: "concatenation",
                reason: e.to_string(),
            })?;

        // The final file only replaces an existing one once it is complete
        let partial = workspace.track(
            self.options
                .output_dir
                .join(self.partial_file_name(&book.display_name)),
        );
        on_progress(Progress::AttachingCover { output: &output });
        self.tool
            .attach_cover(&intermediate, &cover, &partial)
            .map_err(|e| RepackError::Mux {
                step: "cover attach",
                reason: e.to_string(),
            })?;
        fs::rename(&partial, &output).map_err(|e| {
            RepackError::io(
                format!("Failed to move {} -> {}", partial.display(), output.display()),
                e,
            )
        })?;

        info!("wrote {}", output.display());
        Ok(output)
    }

    fn output_file_name(&self, display_name: &str) -> String {
        format!("{}.{}", display_name, self.options.output_extension)
    }

    /// Cover attach target, renamed to the output file on success
    fn partial_file_name(&self, display_name: &str) -> String {
        format!("{}.partial.{}", display_name, self.options.output_extension)
    }

    /// Whether the output directory is the (canonical) book folder
    fn writes_into(&self, folder: &Path) -> bool {
        self.options
            .output_dir
            .canonicalize()
            .is_ok_and(|dir| dir == folder)
    }

    /// Probe every chapter in book order
    fn probe_all(
        &self,
        sources: &[ChapterSource],
        on_progress: &mut dyn FnMut(Progress<'_>),
    ) -> Result<Vec<ChapterProbe>> {
        let total = sources.len();
        sources
            .iter()
            .map(|source| {
                on_progress(Progress::Probing {
                    index: source.index,
                    total,
                    path: &source.path,
                });
                probe_chapter(self.tool, &source.path, &self.options.input_extension)
            })
            .collect()
    }
}
