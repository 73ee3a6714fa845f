//! Visualization panels and the fan-out that keeps them in sync
//!
//! Every panel is a retained view model: it records what is on screen
//! and how the last change altered it. Panels never call each other.
//! The [`Dashboard`] publishes one change event per interaction and every
//! interested panel reacts to it:
//!
//! - a [`SubsetChange`] when the active subset is swapped (a narrative
//!   step was entered), reaching the scatter plot, the file view and the
//!   summary, followed by a selection change for the new subset
//! - a [`SelectionChange`] when the brush moves, reaching the selection
//!   banner, the language breakdown and the summary

pub mod color;
pub mod files;
pub mod scales;
pub mod scatter;
pub mod selection;
pub mod summary;
pub mod tooltip;

pub use color::Rgb;
pub use files::{FileGroup, FileTransition, FileView};
pub use scatter::{ChartStyle, ChartTransition, Margin, ScatterPlot};
pub use selection::{BrushRect, LanguageBreakdown, LanguageShare, SelectionBanner, SelectionState};
pub use summary::SummaryPanel;
pub use tooltip::CommitTooltip;

use crate::config::ProjectConfig;
use crate::models::{ActiveSubset, CommitRecord};
use crate::timeline::{SummaryStats, Timeline};
use thiserror::Error;
use tracing::debug;

/// Errors raised while setting up the panels
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid colour '{value}' for {field}: expected #rrggbb")]
    InvalidColor { field: &'static str, value: String },

    #[error("invalid chart geometry: {0}")]
    InvalidGeometry(String),
}

/// The active subset was replaced.
#[derive(Debug)]
pub struct SubsetChange<'c> {
    pub subset: &'c ActiveSubset<'c>,
}

/// The brush selection (or the subset under it) changed.
#[derive(Debug)]
pub struct SelectionChange<'c> {
    pub state: &'c SelectionState,
    pub subset: &'c ActiveSubset<'c>,
    /// Commits counted as selected: the whole subset when there is no
    /// rectangle, none for an empty brush
    pub selected: Vec<&'c CommitRecord>,
}

pub trait SubsetObserver {
    fn on_subset_changed(&mut self, change: &SubsetChange<'_>);
}

pub trait SelectionObserver {
    fn on_selection_changed(&mut self, change: &SelectionChange<'_>);
}

/// Build the chart style from project configuration.
pub fn chart_style(config: &ProjectConfig) -> Result<ChartStyle, RenderError> {
    let parse = |field: &'static str, value: &str| {
        Rgb::parse_hex(value).ok_or_else(|| RenderError::InvalidColor {
            field,
            value: value.to_string(),
        })
    };
    let chart = &config.chart;
    let style = ChartStyle {
        width: chart.width,
        height: chart.height,
        margin: Margin {
            top: chart.margin.top,
            right: chart.margin.right,
            bottom: chart.margin.bottom,
            left: chart.margin.left,
        },
        radius: (chart.radius[0], chart.radius[1]),
        dawn: parse("colors.dawn", &config.colors.dawn)?,
        dusk: parse("colors.dusk", &config.colors.dusk)?,
    };

    let usable = style.usable();
    if usable.width <= 0.0 || usable.height <= 0.0 {
        return Err(RenderError::InvalidGeometry(format!(
            "margins leave no room in a {}x{} chart",
            style.width, style.height
        )));
    }
    if style.radius.0 < 0.0 || style.radius.1 < style.radius.0 {
        return Err(RenderError::InvalidGeometry(format!(
            "radius range [{}, {}] must be non-negative and ascending",
            style.radius.0, style.radius.1
        )));
    }
    Ok(style)
}

/// All panels of the page plus the subset they currently show.
pub struct Dashboard<'a> {
    timeline: &'a Timeline,
    subset: ActiveSubset<'a>,
    pub summary: SummaryPanel,
    pub scatter: ScatterPlot,
    pub files: FileView,
    pub banner: SelectionBanner,
    pub languages: LanguageBreakdown,
}

impl<'a> Dashboard<'a> {
    /// Initial render of every panel over the full commit set.
    pub fn new(timeline: &'a Timeline, style: ChartStyle) -> Self {
        let subset = timeline.full_subset();
        let mut summary = SummaryPanel::default();
        summary.render(SummaryStats::for_subset(&subset));
        let mut files = FileView::default();
        files.render(subset.lines());

        let mut dashboard = Self {
            timeline,
            subset,
            summary,
            scatter: ScatterPlot::new(timeline.commits(), style),
            files,
            banner: SelectionBanner::default(),
            languages: LanguageBreakdown::default(),
        };
        dashboard.publish_selection();
        dashboard
    }

    pub fn timeline(&self) -> &'a Timeline {
        self.timeline
    }

    pub fn subset(&self) -> &ActiveSubset<'a> {
        &self.subset
    }

    /// Swap the active subset and run the full cascade.
    pub fn publish_subset(&mut self, subset: ActiveSubset<'a>) {
        debug!("Active subset now {} commits", subset.len());
        self.subset = subset;
        let change = SubsetChange {
            subset: &self.subset,
        };
        let observers: [&mut dyn SubsetObserver; 3] =
            [&mut self.scatter, &mut self.files, &mut self.summary];
        for observer in observers {
            observer.on_subset_changed(&change);
        }
        self.publish_selection();
    }

    /// Drive the file view alone (the second narrative track).
    pub fn publish_files(&mut self, subset: &ActiveSubset<'_>) {
        self.files.on_subset_changed(&SubsetChange { subset });
    }

    /// Apply a brush gesture and notify the selection panels.
    pub fn brush(&mut self, state: SelectionState) {
        self.scatter.brush(state);
        self.publish_selection();
    }

    fn publish_selection(&mut self) {
        let state = self.scatter.selection();
        let selected = self.scatter.selected_commits(&self.subset);
        let change = SelectionChange {
            state: &state,
            subset: &self.subset,
            selected,
        };
        let observers: [&mut dyn SelectionObserver; 3] =
            [&mut self.banner, &mut self.languages, &mut self.summary];
        for observer in observers {
            observer.on_selection_changed(&change);
        }
    }
}
