//! Report command - render the dashboard for a change log

use super::{emit, load_timeline};
use crate::config::ProjectConfig;
use crate::render::{chart_style, Dashboard, SelectionState};
use crate::reporters::{self, OutputFormat, ReportContext};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub fn run(
    config: &ProjectConfig,
    log: &Path,
    format: Option<&str>,
    output: Option<&Path>,
    repo_url: Option<&str>,
    until: Option<DateTime<FixedOffset>>,
    brush: Option<SelectionState>,
) -> Result<()> {
    // CLI flag > project config > text
    let format = format
        .or(config.defaults.format.as_deref())
        .unwrap_or("text");
    let format = OutputFormat::from_str(format)?;

    let style = chart_style(config).context("Invalid chart configuration")?;
    let timeline = load_timeline(log, repo_url, config)?;

    let mut dashboard = Dashboard::new(&timeline, style);
    if let Some(cutoff) = until {
        debug!("Cutting timeline at {}", cutoff);
        dashboard.publish_subset(timeline.subset_until(cutoff));
    }
    if let Some(state) = brush {
        dashboard.brush(state);
    }

    let context = ReportContext::new(&dashboard);
    let rendered = reporters::report_with_format(&context, format)?;

    let output = output.map(|path| {
        if path.is_dir() {
            path.join(format!("report.{}", reporters::file_extension(format)))
        } else {
            path.to_path_buf()
        }
    });
    emit(&rendered, output.as_deref())
}
