//! Collect command - build the change log from git blame

use super::emit;
use crate::changelog;
use crate::config::ProjectConfig;
use crate::git::LogCollector;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .expect("valid template")
}

pub fn run(config: &ProjectConfig, repo: &Path, output: Option<&Path>) -> Result<()> {
    let collector = LogCollector::open(repo, config.collect.clone())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!("Blaming files in {}...", collector.workdir().display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let lines = match collector.collect() {
        Ok(lines) => lines,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };
    spinner.finish_with_message(format!("Collected {} lines", lines.len()));

    let mut csv = Vec::new();
    changelog::write(&mut csv, &lines).context("Failed to encode change log")?;
    let csv = String::from_utf8(csv).context("Change log is not valid UTF-8")?;
    emit(&csv, output)
}
