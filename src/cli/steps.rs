//! Steps command - replay a narrative track

use super::{emit, load_timeline};
use crate::config::ProjectConfig;
use crate::narrative::{self, Narrative, StepLayout, Track};
use crate::render::{chart_style, Dashboard};
use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// One replayed step and what the page showed after entering it.
#[derive(Serialize)]
struct Replayed<'s> {
    #[serde(flatten)]
    step: &'s narrative::Step,
    scroll_offset: f64,
    points: usize,
    file_groups: usize,
    selection: String,
}

pub fn run(
    config: &ProjectConfig,
    log: &Path,
    track: Track,
    json: bool,
    repo_url: Option<&str>,
) -> Result<()> {
    let chart = chart_style(config).context("Invalid chart configuration")?;
    let timeline = load_timeline(log, repo_url, config)?;
    let layout = StepLayout::from(config.narrative);
    let steps = narrative::steps(&timeline, track);

    // Drive the narrative the way a reader scrolling down the page would
    let mut narrative = Narrative::new(Dashboard::new(&timeline, chart), layout);
    let mut replayed = Vec::with_capacity(steps.len());
    for step in &steps {
        let offset = layout.offset_of(step.index);
        narrative.scroll(track, offset)?;
        let dashboard = narrative.dashboard();
        replayed.push(Replayed {
            step,
            scroll_offset: offset,
            points: dashboard.scatter.points().len(),
            file_groups: dashboard.files.groups().len(),
            selection: dashboard.banner.text().to_string(),
        });
    }

    if json {
        let mut out = serde_json::to_string_pretty(&replayed)?;
        out.push('\n');
        return emit(&out, None);
    }

    let mut out = String::new();
    writeln!(
        out,
        "{} {} steps on the {} track\n",
        style("▶").green(),
        replayed.len(),
        style(track).cyan()
    )?;
    for entry in &replayed {
        let summary = entry.step.summary;
        writeln!(
            out,
            "{} {}",
            style(format!("[{}]", entry.step.index + 1)).bold(),
            entry.step.text
        )?;
        writeln!(
            out,
            "    {}",
            style(format!(
                "commits {}  files {}  LOC {}  points {}  file groups {}",
                summary.commits, summary.files, summary.total_loc, entry.points, entry.file_groups
            ))
            .dim()
        )?;
    }
    emit(&out, None)
}
