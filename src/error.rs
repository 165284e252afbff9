use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling an audiobook
#[derive(Debug, Error)]
pub enum RepackError {
    #[error(
        "Could not parse book information from '{0}' \
         (expected \"<title> - Written by <author> - Narrated by <narrator>\")"
    )]
    Parse(String),

    #[error("Failed to probe {}: {reason}", .path.display())]
    Probe { path: PathBuf, reason: String },

    #[error("Chapter {index} ends past the largest representable timestamp")]
    Timeline { index: usize },

    #[error("{step} failed: {reason}")]
    Mux { step: &'static str, reason: String },

    #[error("Missing required input: {0}")]
    MissingResource(String),

    #[error("Seed metadata lacks title/album tags and no book information was supplied")]
    MissingBookInfo,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl RepackError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Failure of a single external tool invocation
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("could not run {tool}: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    Exit {
        tool: String,
        status: String,
        stderr: String,
    },
}

pub type Result<T, E = RepackError> = std::result::Result<T, E>;
