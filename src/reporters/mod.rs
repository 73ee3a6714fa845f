//! Output reporters for commitscope dashboards
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `html` - Standalone page with an inline SVG chart and both step tracks

mod html;
mod json;
mod text;

use crate::narrative::{steps, Step, Track};
use crate::render::Dashboard;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, html",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

/// Everything a reporter needs: the dashboard as currently rendered and
/// the narrated steps of both tracks.
pub struct ReportContext<'d, 'a> {
    pub dashboard: &'d Dashboard<'a>,
    pub commit_steps: Vec<Step>,
    pub file_steps: Vec<Step>,
}

impl<'d, 'a> ReportContext<'d, 'a> {
    pub fn new(dashboard: &'d Dashboard<'a>) -> Self {
        let timeline = dashboard.timeline();
        Self {
            dashboard,
            commit_steps: steps(timeline, Track::Commits),
            file_steps: steps(timeline, Track::Files),
        }
    }
}

/// Render a dashboard in the specified format
pub fn report(context: &ReportContext<'_, '_>, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(context, fmt)
}

/// Render a dashboard using an OutputFormat enum
pub fn report_with_format(context: &ReportContext<'_, '_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(context),
        OutputFormat::Json => json::render(context),
        OutputFormat::Html => html::render(context),
    }
}

/// Get the recommended file extension for a format
pub fn file_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Text => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Html => "html",
    }
}
