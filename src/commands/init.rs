use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::{Config, InputConfig, OutputConfig, ToolsConfig};

/// Run the init command - interactively create a config file
pub fn run(force: bool) -> Result<()> {
    let config_path = Config::config_path()?;

    // Check if config already exists
    if config_path.exists() && !force {
        eprintln!(
            "{}: Config already exists at {}",
            "Error".red().bold(),
            config_path.display()
        );
        eprintln!();
        eprintln!("Use {} to overwrite.", "--force".cyan());
        bail!("Config file already exists");
    }

    println!("{}", "audiobook-repack configuration".bold());
    println!();
    println!(
        "This will create a config file at: {}",
        config_path.display().to_string().cyan()
    );
    println!();

    let defaults = Config::default();

    println!("{}", "Step 1: External tools".bold());
    println!();
    let ffmpeg = prompt("Path to ffmpeg", &defaults.tools.ffmpeg.display().to_string())?;
    let ffprobe = prompt("Path to ffprobe", &defaults.tools.ffprobe.display().to_string())?;
    println!();

    println!("{}", "Step 2: Book folders".bold());
    println!();
    println!("Chapter files are picked up by extension and joined in file-name order.");
    let extension = prompt("Chapter file extension", &defaults.input.extension)?;
    let cover = prompt("Cover image file name", &defaults.input.cover)?;
    println!();

    println!("{}", "Step 3: Output".bold());
    println!();
    let output_extension = prompt("Output container extension", &defaults.output.extension)?;
    let output_dir = prompt_output_dir()?;

    // Create config directory
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }

    let config = Config {
        tools: ToolsConfig {
            ffmpeg: PathBuf::from(ffmpeg),
            ffprobe: PathBuf::from(ffprobe),
        },
        input: InputConfig {
            extension: extension.trim_start_matches('.').to_string(),
            cover,
        },
        output: OutputConfig {
            extension: output_extension.trim_start_matches('.').to_string(),
            dir: output_dir,
        },
    };
    let config_content = render_config(&config)?;

    std::fs::write(&config_path, &config_content)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    println!();
    println!(
        "{} Config written to {}",
        "✓".green(),
        config_path.display()
    );
    println!();
    println!("You can now use:");
    println!(
        "  {} - assemble a book folder",
        "audiobook-repack build <folder>".cyan()
    );
    println!(
        "  {} - preview its chapter timeline",
        "audiobook-repack chapters <folder>".cyan()
    );

    Ok(())
}

/// Serialize a config with a header comment, checking that it reads back
fn render_config(config: &Config) -> Result<String> {
    let body = toml::to_string_pretty(config).context("Failed to serialize config")?;
    let content = format!("# audiobook-repack configuration\n\n{}", body);

    // Validate before writing
    toml::from_str::<Config>(&content).context("Generated config is invalid")?;
    Ok(content)
}

fn prompt(label: &str, default: &str) -> Result<String> {
    print!("{} [{}]: ", label, default.green());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input.to_string()
    })
}

fn prompt_output_dir() -> Result<Option<PathBuf>> {
    print!(
        "Output directory [{}]: ",
        "current directory".green()
    );
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    let dir = if input.is_empty() {
        return Ok(None);
    } else if let Some(stripped) = input.strip_prefix("~/") {
        // Expand ~ to home directory
        match dirs::home_dir() {
            Some(home) => home.join(stripped),
            None => PathBuf::from(input),
        }
    } else {
        PathBuf::from(input)
    };

    // Warn if directory doesn't exist (but don't fail)
    if !dir.exists() {
        println!();
        println!(
            "{}: Directory {} does not exist yet. Create it before running 'build'.",
            "Note".yellow(),
            dir.display()
        );
    }

    Ok(Some(dir))
}
