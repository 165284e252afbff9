use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from ~/.config/audiobook-repack/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Locations of the external media tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,
    #[serde(default = "default_ffprobe")]
    pub ffprobe: PathBuf,
}

/// What a book folder is expected to contain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Extension of the chapter files (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// File name of the cover image inside the book folder
    #[serde(default = "default_cover")]
    pub cover: String,
}

/// Where and how the assembled book is written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Container extension of the assembled book
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Directory for assembled books (default: current directory)
    pub dir: Option<PathBuf>,
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_extension() -> String {
    "m4a".to_string()
}

fn default_cover() -> String {
    "cover.jpg".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            cover: default_cover(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path (~/.config/audiobook-repack/config.toml)
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("audiobook-repack").join("config.toml"))
    }

    /// Get the output directory, with CLI override taking precedence
    pub fn output_dir(&self, cli_override: Option<&PathBuf>) -> PathBuf {
        cli_override
            .cloned()
            .or_else(|| self.output.dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tools.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(config.input.extension, "m4a");
        assert_eq!(config.input.cover, "cover.jpg");
        assert!(config.output.dir.is_none());
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[tools]
ffmpeg = "/opt/ffmpeg/bin/ffmpeg"

[input]
extension = "mp3"

[output]
extension = "m4b"
dir = "/home/user/audiobooks"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tools.ffmpeg, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        // Unset keys keep their defaults
        assert_eq!(config.tools.ffprobe, PathBuf::from("ffprobe"));
        assert_eq!(config.input.extension, "mp3");
        assert_eq!(config.input.cover, "cover.jpg");
        assert_eq!(config.output.extension, "m4b");
        assert_eq!(
            config.output.dir,
            Some(PathBuf::from("/home/user/audiobooks"))
        );
    }

    #[test]
    fn test_invalid_config_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[input\nextension = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_cli_override() {
        let config = Config {
            output: OutputConfig {
                extension: "m4b".to_string(),
                dir: Some(PathBuf::from("/default/path")),
            },
            ..Config::default()
        };

        // CLI override takes precedence
        assert_eq!(
            config.output_dir(Some(&PathBuf::from("/cli/path"))),
            PathBuf::from("/cli/path")
        );

        // Falls back to config, then the current directory
        assert_eq!(config.output_dir(None), PathBuf::from("/default/path"));
        assert_eq!(Config::default().output_dir(None), PathBuf::from("."));
    }
}
