//! CLI command definitions and handlers

mod collect;
mod init;
mod report;
mod steps;

use crate::changelog;
use crate::config::{load_project_config, ProjectConfig};
use crate::narrative::Track;
use crate::render::SelectionState;
use crate::timeline::Timeline;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Parse an RFC 3339 timestamp for `--until`
fn parse_until(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| format!("'{}' is not an RFC 3339 timestamp: {}", s, e))
}

/// Parse a brush rectangle `x0,y0,x1,y1` in chart pixels
fn parse_brush(s: &str) -> Result<SelectionState, String> {
    let coords: Vec<f64> = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| format!("'{}' is not a number", part.trim()))
        })
        .collect::<Result<_, _>>()?;
    match coords.as_slice() {
        [x0, y0, x1, y1] => Ok(SelectionState::from_drag((*x0, *y0), (*x1, *y1))),
        _ => Err(format!("expected x0,y0,x1,y1, got {} values", coords.len())),
    }
}

/// commitscope - commit history visualization
///
/// Turns a line-level change log into a commit timeline, summary
/// statistics and a scroll-driven scatter plot.
#[derive(Parser, Debug)]
#[command(name = "commitscope")]
#[command(
    version,
    about = "Commit history visualization: summary stats, time-of-day scatter plot and scroll narrative from a line-level change log",
    after_help = "\
Examples:
  commitscope collect . -o loc.csv             Build the change log from git
  commitscope report loc.csv                   Terminal summary
  commitscope report loc.csv -f html -o meta.html
  commitscope report loc.csv --until 2024-03-01T12:00:00Z
  commitscope steps loc.csv --track files      Replay the file narrative"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Directory holding commitscope.toml (default: current directory)
    #[arg(long, global = true, default_value = ".")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a commitscope.toml config file with example settings
    Init,

    /// Render the dashboard for a change log
    #[command(after_help = "\
Examples:
  commitscope report loc.csv                           Terminal output
  commitscope report loc.csv -f json                   JSON for scripting
  commitscope report loc.csv -f html -o meta.html      Standalone page
  commitscope report loc.csv --brush 20,10,990,300     Select by chart rectangle")]
    Report {
        /// Change log CSV
        #[arg(default_value = "loc.csv")]
        log: PathBuf,

        /// Output format: text, json, html (default: config, then text)
        #[arg(long, short = 'f', value_parser = ["text", "json", "html"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Repository base URL for commit links
        #[arg(long)]
        repo_url: Option<String>,

        /// Only show commits at or before this RFC 3339 timestamp
        #[arg(long, value_parser = parse_until)]
        until: Option<DateTime<FixedOffset>>,

        /// Brush rectangle in chart pixels: x0,y0,x1,y1
        #[arg(long, value_parser = parse_brush, allow_hyphen_values = true)]
        brush: Option<SelectionState>,
    },

    /// Replay a narrative track step by step
    Steps {
        /// Change log CSV
        #[arg(default_value = "loc.csv")]
        log: PathBuf,

        /// Track to replay: commits, files
        #[arg(long, default_value = "commits")]
        track: Track,

        /// Print steps as JSON
        #[arg(long)]
        json: bool,

        /// Repository base URL for commit links
        #[arg(long)]
        repo_url: Option<String>,
    },

    /// Build the change log from a git repository
    Collect {
        /// Path to repository
        #[arg(default_value = ".")]
        repo: PathBuf,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show version
    Version,
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    let config = load_project_config(&cli.config);

    match cli.command {
        Commands::Init => init::run(&cli.config),

        Commands::Report {
            log,
            format,
            output,
            repo_url,
            until,
            brush,
        } => report::run(
            &config,
            &log,
            format.as_deref(),
            output.as_deref(),
            repo_url.as_deref(),
            until,
            brush,
        ),

        Commands::Steps {
            log,
            track,
            json,
            repo_url,
        } => steps::run(&config, &log, track, json, repo_url.as_deref()),

        Commands::Collect { repo, output } => collect::run(&config, &repo, output.as_deref()),

        Commands::Version => {
            println!("commitscope {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Load and aggregate a change log. Failures are logged and nothing is
/// rendered.
fn load_timeline(log: &Path, repo_url: Option<&str>, config: &ProjectConfig) -> Result<Timeline> {
    let lines = match changelog::load(log) {
        Ok(lines) => lines,
        Err(e) => {
            error!("Failed to load change log {}: {}", log.display(), e);
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to load change log {}", log.display())));
        }
    };
    let url = repo_url.unwrap_or(&config.repository_url);
    let timeline = Timeline::new(lines, url);
    info!(
        "Loaded {} lines in {} commits from {}",
        timeline.line_count(),
        timeline.commits().len(),
        log.display()
    );
    Ok(timeline)
}

/// Write `content` to `path`, or print it when no path is given.
fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            // stderr keeps stdout clean for piping
            eprintln!(
                "{} written to {}",
                console::style("✓").green(),
                console::style(path.display()).cyan()
            );
            Ok(())
        }
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brush() {
        assert_eq!(
            parse_brush("300, 10, 20, 200"),
            Ok(SelectionState::from_drag((20.0, 10.0), (300.0, 200.0)))
        );
        assert_eq!(parse_brush("5,5,5,100"), Ok(SelectionState::Empty));
        assert!(parse_brush("1,2,3").is_err());
        assert!(parse_brush("a,b,c,d").is_err());
    }

    #[test]
    fn test_parse_until() {
        let until = parse_until("2024-03-01T09:00:00-08:00").unwrap();
        assert_eq!(until.to_rfc3339(), "2024-03-01T09:00:00-08:00");
        assert!(parse_until("yesterday").is_err());
    }

    #[test]
    fn test_cli_parses_report() {
        let cli = Cli::try_parse_from([
            "commitscope",
            "report",
            "meta/loc.csv",
            "-f",
            "html",
            "--until",
            "2024-03-01T00:00:00Z",
        ])
        .unwrap();
        match cli.command {
            Commands::Report { log, format, until, .. } => {
                assert_eq!(log, PathBuf::from("meta/loc.csv"));
                assert_eq!(format.as_deref(), Some("html"));
                assert!(until.is_some());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_track() {
        let cli = Cli::try_parse_from(["commitscope", "steps", "--track", "files"]).unwrap();
        assert!(matches!(cli.command, Commands::Steps { track: Track::Files, .. }));
        assert!(Cli::try_parse_from(["commitscope", "steps", "--track", "pages"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["commitscope", "report", "-f", "sarif"]).is_err());
    }
}
