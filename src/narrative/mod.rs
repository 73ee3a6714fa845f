//! Scroll narrative
//!
//! Two step sequences walk the same commit timeline. Entering step `i`
//! makes the active subset "every commit at or before step i's commit" and
//! publishes it: the commit track reaches every panel, the file track only
//! the file view. Events are handled one at a time, each with its full
//! cascade, without debouncing.

use crate::config::NarrativeConfig;
use crate::models::CommitRecord;
use crate::render::Dashboard;
use crate::timeline::{SummaryStats, Timeline};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NarrativeError {
    #[error("step {index} is out of range: the {track} track has {len} steps")]
    StepOutOfRange { track: Track, index: usize, len: usize },
}

/// Which step sequence an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// Drives every panel
    Commits,
    /// Drives the file view only
    Files,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Commits => write!(f, "commits"),
            Track::Files => write!(f, "files"),
        }
    }
}

impl FromStr for Track {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commits" | "commit" => Ok(Track::Commits),
            "files" | "file" => Ok(Track::Files),
            _ => Err(format!("Unknown track: {}. Use: commits, files", s)),
        }
    }
}

/// Maps a scroll offset to a step index.
///
/// Steps are stacked boxes of equal height; the active step is the one
/// containing the point `anchor` pixels below the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepLayout {
    pub step_height: f64,
    pub anchor: f64,
}

impl Default for StepLayout {
    fn default() -> Self {
        NarrativeConfig::default().into()
    }
}

impl From<NarrativeConfig> for StepLayout {
    fn from(config: NarrativeConfig) -> Self {
        Self {
            step_height: config.step_height,
            anchor: config.anchor,
        }
    }
}

impl StepLayout {
    /// Step under the anchor, clamped to `[0, len)`. `None` only when there
    /// are no steps.
    pub fn step_at(&self, offset: f64, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let position = (offset + self.anchor) / self.step_height.max(f64::EPSILON);
        if !position.is_finite() || position <= 0.0 {
            return Some(0);
        }
        Some((position.floor() as usize).min(len - 1))
    }

    /// Scroll offset that puts the anchor in the middle of step `index`.
    pub fn offset_of(&self, index: usize) -> f64 {
        (index as f64 + 0.5) * self.step_height - self.anchor
    }
}

/// Index state of one step sequence.
#[derive(Debug, Clone)]
pub struct StepTrack {
    track: Track,
    cutoffs: Vec<DateTime<FixedOffset>>,
    current: Option<usize>,
}

impl StepTrack {
    /// One step per commit, in timeline order.
    pub fn new(track: Track, commits: &[CommitRecord]) -> Self {
        Self {
            track,
            cutoffs: commits.iter().map(|c| c.datetime).collect(),
            current: None,
        }
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn len(&self) -> usize {
        self.cutoffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cutoffs.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Timestamp bounding the subset of step `index`.
    pub fn cutoff(&self, index: usize) -> Result<DateTime<FixedOffset>, NarrativeError> {
        self.cutoffs
            .get(index)
            .copied()
            .ok_or(NarrativeError::StepOutOfRange {
                track: self.track,
                index,
                len: self.cutoffs.len(),
            })
    }

    /// Move to step `index`. Returns whether the step changed.
    pub fn enter(&mut self, index: usize) -> Result<bool, NarrativeError> {
        self.cutoff(index)?;
        if self.current == Some(index) {
            return Ok(false);
        }
        self.current = Some(index);
        Ok(true)
    }
}

/// The dashboard plus both step tracks.
pub struct Narrative<'a> {
    dashboard: Dashboard<'a>,
    layout: StepLayout,
    commits: StepTrack,
    files: StepTrack,
}

impl<'a> Narrative<'a> {
    pub fn new(dashboard: Dashboard<'a>, layout: StepLayout) -> Self {
        let commits = dashboard.timeline().commits();
        Self {
            commits: StepTrack::new(Track::Commits, commits),
            files: StepTrack::new(Track::Files, commits),
            dashboard,
            layout,
        }
    }

    pub fn dashboard(&self) -> &Dashboard<'a> {
        &self.dashboard
    }

    /// Direct access for brush gestures.
    pub fn dashboard_mut(&mut self) -> &mut Dashboard<'a> {
        &mut self.dashboard
    }

    pub fn layout(&self) -> StepLayout {
        self.layout
    }

    pub fn track(&self, track: Track) -> &StepTrack {
        match track {
            Track::Commits => &self.commits,
            Track::Files => &self.files,
        }
    }

    /// Handle a step-enter event. Publishes exactly one subset change when
    /// the step differs from the current one.
    pub fn enter(&mut self, track: Track, index: usize) -> Result<bool, NarrativeError> {
        let steps = match track {
            Track::Commits => &mut self.commits,
            Track::Files => &mut self.files,
        };
        if !steps.enter(index)? {
            return Ok(false);
        }
        let cutoff = steps.cutoff(index)?;
        debug!("Entered {} step {} (cutoff {})", track, index, cutoff);

        let timeline = self.dashboard.timeline();
        let subset = timeline.subset_until(cutoff);
        match track {
            Track::Commits => self.dashboard.publish_subset(subset),
            Track::Files => self.dashboard.publish_files(&subset),
        }
        Ok(true)
    }

    /// Handle a scroll event on one track's container.
    pub fn scroll(&mut self, track: Track, offset: f64) -> Result<bool, NarrativeError> {
        match self.layout.step_at(offset, self.track(track).len()) {
            Some(index) => self.enter(track, index),
            None => Ok(false),
        }
    }
}

/// A narrated step, ready for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub index: usize,
    pub track: Track,
    pub commit_id: String,
    pub datetime: DateTime<FixedOffset>,
    pub text: String,
    /// Summary of the subset the step activates
    pub summary: SummaryStats,
}

/// Every step of a track with its narration.
pub fn steps(timeline: &Timeline, track: Track) -> Vec<Step> {
    timeline
        .commits()
        .iter()
        .enumerate()
        .map(|(index, commit)| {
            let subset = timeline.subset_until(commit.datetime);
            let summary = SummaryStats::for_subset(&subset);
            Step {
                index,
                track,
                commit_id: commit.id.clone(),
                datetime: commit.datetime,
                text: narration(track, commit, &summary),
                summary,
            }
        })
        .collect()
}

/// Narration line for one step.
pub fn narration(track: Track, commit: &CommitRecord, summary: &SummaryStats) -> String {
    let date = commit.datetime.format("%A, %B %-d, %Y");
    match track {
        Track::Commits => format!(
            "On {} at {}, {} made commit {} editing {} lines across {} files.",
            date,
            commit.datetime.format("%-I:%M %p"),
            commit.author,
            commit.short_id(),
            commit.total_lines,
            commit.files_touched()
        ),
        Track::Files => format!(
            "By {}, the codebase held {} lines across {} files.",
            date, summary.total_loc, summary.files
        ),
    }
}
