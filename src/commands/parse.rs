use anyhow::Result;
use colored::Colorize;

use crate::book::BookInfo;

pub fn run(name: &str, json: bool) -> Result<()> {
    let info = BookInfo::parse(name)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{:>10}: {}", "Title".cyan(), info.title);
    println!(
        "{:>10}: {}",
        "Author".cyan(),
        info.author.as_deref().unwrap_or("-")
    );
    println!(
        "{:>10}: {}",
        "Narrator".cyan(),
        info.narrator.as_deref().unwrap_or("-")
    );
    Ok(())
}
