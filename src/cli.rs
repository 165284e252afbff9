use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audiobook-repack")]
#[command(about = "Assemble a folder of chapter files into a single chaptered audiobook")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Concatenate chapter files with chapter markers, tags and cover art
    Build {
        /// Book folder, named "<title> - Written by <author> - Narrated by <narrator>"
        folder: PathBuf,

        /// Directory for the assembled book (uses config default, then the current directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Leave temporary files in the book folder
        #[arg(long)]
        keep_temp: bool,
    },

    /// Preview the chapter timeline of a book folder
    Chapters {
        /// Book folder containing the chapter files
        folder: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a book folder name into title, author and narrator
    Parse {
        /// Folder name, e.g. "Dune - Written by Frank Herbert - Narrated by Scott Brick"
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the tags of an assembled audiobook
    Show {
        /// Path to the audiobook file
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a config file interactively
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}
