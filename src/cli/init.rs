//! Init command - write an example commitscope.toml

use crate::config::{ProjectConfig, CONFIG_FILE_NAMES};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Path is not a directory: {}", dir.display());
    }

    let config_path = dir.join(CONFIG_FILE_NAMES[0]);
    if config_path.exists() {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, ProjectConfig::example_toml())
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    println!("\nNext steps:");
    println!("  {} Build the change log", style("commitscope collect . -o loc.csv").cyan());
    println!("  {} Render the page", style("commitscope report loc.csv -f html -o meta.html").cyan());

    Ok(())
}
