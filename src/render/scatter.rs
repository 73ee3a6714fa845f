//! Commit scatter plot
//!
//! One point per commit: x is the commit time, y the hour of day, the
//! radius grows with the square root of lines edited and the fill cycles
//! through the day. Changing the active subset is a keyed diff on commit
//! id, so persisting points move instead of being redrawn.

use super::color::Rgb;
use super::scales::{CyclicColorScale, LinearScale, SqrtScale, TimeScale};
use super::selection::SelectionState;
use super::tooltip::CommitTooltip;
use super::{SubsetChange, SubsetObserver};
use crate::models::{ActiveSubset, CommitRecord};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Space reserved around the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// The plotting area inside the margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Usable {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// Chart geometry and colour stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Smallest and largest point radius
    pub radius: (f64, f64),
    /// Colour at midnight
    pub dawn: Rgb,
    /// Colour approached just before the next midnight
    pub dusk: Rgb,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            margin: Margin {
                top: 10.0,
                right: 10.0,
                bottom: 30.0,
                left: 20.0,
            },
            radius: (2.0, 30.0),
            dawn: Rgb::new(0x1f, 0x3f, 0xff),
            dusk: Rgb::new(0xff, 0x7d, 0x29),
        }
    }
}

impl ChartStyle {
    pub fn usable(&self) -> Usable {
        let m = self.margin;
        Usable {
            left: m.left,
            right: self.width - m.right,
            top: m.top,
            bottom: self.height - m.bottom,
            width: self.width - m.left - m.right,
            height: self.height - m.top - m.bottom,
        }
    }
}

/// Position and size of a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mark {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub id: String,
    #[serde(flatten)]
    pub mark: Mark,
    pub fill: String,
    pub hour_frac: f64,
    pub total_lines: usize,
    pub selected: bool,
    pub tooltip: CommitTooltip,
}

/// A point animating from one mark to another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMove {
    pub id: String,
    pub from: Mark,
    pub to: Mark,
}

/// Result of a keyed diff against the previous set of points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartTransition {
    /// New points, growing from radius zero
    pub entered: Vec<PointMove>,
    /// Points kept, moving to their new position and size
    pub updated: Vec<PointMove>,
    /// Ids of removed points
    pub exited: Vec<String>,
}

/// A labelled axis tick at a pixel position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScatterPlot {
    style: ChartStyle,
    x: TimeScale,
    y: LinearScale,
    r: SqrtScale,
    color: CyclicColorScale,
    points: Vec<PlotPoint>,
    selection: SelectionState,
    last: ChartTransition,
}

impl ScatterPlot {
    /// Plot every commit of `full`. The radius domain stays fixed to the
    /// full set so point sizes are comparable across subsets.
    pub fn new(full: &[CommitRecord], style: ChartStyle) -> Self {
        let usable = style.usable();
        let min_lines = full.iter().map(|c| c.total_lines).min().unwrap_or(1);
        let max_lines = full.iter().map(|c| c.total_lines).max().unwrap_or(1);
        let x = match ActiveSubset::all(full).extent() {
            Some((start, end)) => TimeScale::nice(&start, &end, (usable.left, usable.right)),
            None => {
                let epoch = DateTime::<Utc>::default();
                TimeScale::nice(&epoch, &epoch, (usable.left, usable.right))
            }
        };

        let mut plot = Self {
            style,
            x,
            y: LinearScale::new((0.0, 24.0), (usable.bottom, usable.top)),
            r: SqrtScale::new((min_lines as f64, max_lines as f64), style.radius),
            color: CyclicColorScale::hours(style.dawn, style.dusk),
            points: Vec::new(),
            selection: SelectionState::None,
            last: ChartTransition::default(),
        };
        plot.set_subset(&ActiveSubset::all(full));
        plot
    }

    /// Re-plot for a new active subset.
    pub fn set_subset(&mut self, subset: &ActiveSubset<'_>) -> ChartTransition {
        let usable = self.style.usable();
        if let Some((start, end)) = subset.extent() {
            self.x = TimeScale::nice(&start, &end, (usable.left, usable.right));
        }

        let previous: HashMap<&str, Mark> =
            self.points.iter().map(|p| (p.id.as_str(), p.mark)).collect();

        // Largest first so small points stay on top
        let mut commits: Vec<&CommitRecord> = subset.commits().to_vec();
        commits.sort_by(|a, b| b.total_lines.cmp(&a.total_lines).then_with(|| a.id.cmp(&b.id)));

        let mut transition = ChartTransition::default();
        let mut points = Vec::with_capacity(commits.len());
        for commit in commits {
            let mark = self.mark(commit);
            let from = previous.get(commit.id.as_str()).copied();
            let movement = PointMove {
                id: commit.id.clone(),
                from: from.unwrap_or(Mark { r: 0.0, ..mark }),
                to: mark,
            };
            if from.is_some() {
                transition.updated.push(movement);
            } else {
                transition.entered.push(movement);
            }
            points.push(PlotPoint {
                id: commit.id.clone(),
                mark,
                fill: self.color.apply(commit.hour_frac).to_hex(),
                hour_frac: commit.hour_frac,
                total_lines: commit.total_lines,
                selected: self.selection.includes(mark.cx, mark.cy),
                tooltip: CommitTooltip::for_commit(commit),
            });
        }

        let kept: HashSet<&str> = points.iter().map(|p: &PlotPoint| p.id.as_str()).collect();
        transition.exited = previous
            .keys()
            .filter(|id| !kept.contains(*id))
            .map(|id| id.to_string())
            .collect();
        transition.exited.sort();

        self.points = points;
        self.last = transition.clone();
        transition
    }

    /// Apply a brush selection and return the ids of selected points, in
    /// draw order.
    pub fn brush(&mut self, state: SelectionState) -> Vec<String> {
        self.selection = state;
        for point in &mut self.points {
            point.selected = state.includes(point.mark.cx, point.mark.cy);
        }
        self.points
            .iter()
            .filter(|p| p.selected)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Commits of `subset` inside the current selection, in time order.
    pub fn selected_commits<'a>(&self, subset: &ActiveSubset<'a>) -> Vec<&'a CommitRecord> {
        subset
            .commits()
            .iter()
            .copied()
            .filter(|c| {
                let mark = self.mark(c);
                self.selection.includes(mark.cx, mark.cy)
            })
            .collect()
    }

    pub fn mark(&self, commit: &CommitRecord) -> Mark {
        Mark {
            cx: self.x.apply(&commit.datetime),
            cy: self.y.apply(commit.hour_frac),
            r: self.r.apply(commit.total_lines as f64),
        }
    }

    pub fn color_for_hour(&self, hour: f64) -> Rgb {
        self.color.apply(hour)
    }

    /// Every two hours, labelled `HH:00`, coloured like the hour.
    pub fn y_ticks(&self) -> Vec<AxisTick> {
        (0..=24)
            .step_by(2)
            .map(|h| AxisTick {
                position: self.y.apply(h as f64),
                label: format!("{:02}:00", h % 24),
                color: Some(self.color.apply(h as f64).to_hex()),
            })
            .collect()
    }

    pub fn x_ticks(&self) -> Vec<AxisTick> {
        self.x
            .ticks(10)
            .into_iter()
            .map(|t| AxisTick {
                position: self.x.apply(&t),
                label: t.format("%b %d").to_string(),
                color: None,
            })
            .collect()
    }

    pub fn points(&self) -> &[PlotPoint] {
        &self.points
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn usable(&self) -> Usable {
        self.style.usable()
    }

    pub fn time_domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        self.x.domain()
    }

    pub fn last_transition(&self) -> &ChartTransition {
        &self.last
    }
}

impl SubsetObserver for ScatterPlot {
    fn on_subset_changed(&mut self, change: &SubsetChange<'_>) {
        self.set_subset(change.subset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::line;
    use crate::timeline::tests::two_commit_lines;
    use crate::timeline::{Timeline, DEFAULT_REPOSITORY_URL};

    fn timeline() -> Timeline {
        Timeline::new(two_commit_lines(), DEFAULT_REPOSITORY_URL)
    }

    fn full_area(plot: &ScatterPlot) -> SelectionState {
        let u = plot.usable();
        SelectionState::from_drag((u.left, u.top), (u.right, u.bottom))
    }

    #[test]
    fn test_initial_plot_draws_largest_first() {
        let timeline = timeline();
        let plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        let ids: Vec<&str> = plot.points().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["aaaaaaaaaa", "bbbbbbbbbb"]);
        assert!(plot.points()[0].mark.r > plot.points()[1].mark.r);
        assert_eq!(plot.points()[0].mark.r, 30.0);
        assert_eq!(plot.points()[1].mark.r, 2.0);
        assert_eq!(plot.last_transition().entered.len(), 2);
    }

    #[test]
    fn test_points_stay_inside_plot_area() {
        let timeline = timeline();
        let plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        let u = plot.usable();
        for p in plot.points() {
            assert!(p.mark.cx >= u.left && p.mark.cx <= u.right);
            assert!(p.mark.cy >= u.top && p.mark.cy <= u.bottom);
        }
    }

    #[test]
    fn test_full_area_brush_selects_active_subset() {
        let timeline = timeline();
        let mut plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        let state = full_area(&plot);
        let selected = plot.brush(state);
        assert_eq!(selected.len(), timeline.commits().len());
        assert_eq!(plot.selected_commits(&timeline.full_subset()).len(), 2);
    }

    #[test]
    fn test_zero_area_brush_selects_nothing() {
        let timeline = timeline();
        let mut plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        let p = plot.points()[0].mark;
        let selected = plot.brush(SelectionState::from_drag((p.cx, p.cy), (p.cx, p.cy)));
        assert!(selected.is_empty());
        assert!(plot.selected_commits(&timeline.full_subset()).is_empty());
    }

    #[test]
    fn test_no_selection_means_everything() {
        let timeline = timeline();
        let plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        assert_eq!(plot.selection(), SelectionState::None);
        assert_eq!(plot.selected_commits(&timeline.full_subset()).len(), 2);
        assert!(plot.points().iter().all(|p| p.selected));
    }

    #[test]
    fn test_brush_picks_morning_commit_only() {
        let timeline = timeline();
        let mut plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        let u = plot.usable();
        // 00:00 - 12:00 band
        let noon = u.top + (u.bottom - u.top) / 2.0;
        let selected = plot.brush(SelectionState::from_drag((u.left, noon), (u.right, u.bottom)));
        assert_eq!(selected, ["aaaaaaaaaa"]);
    }

    #[test]
    fn test_subset_change_is_keyed_diff() {
        let timeline = timeline();
        let mut plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());

        let first = timeline.subset_until(timeline.commits()[0].datetime);
        let shrink = plot.set_subset(&first);
        assert!(shrink.entered.is_empty());
        assert_eq!(shrink.updated.len(), 1);
        assert_eq!(shrink.exited, ["bbbbbbbbbb"]);
        assert_eq!(plot.points().len(), 1);

        let grow = plot.set_subset(&timeline.full_subset());
        assert_eq!(grow.entered.len(), 1);
        assert_eq!(grow.entered[0].id, "bbbbbbbbbb");
        assert_eq!(grow.entered[0].from.r, 0.0);
        assert!(grow.entered[0].to.r > 0.0);
        assert_eq!(grow.updated.len(), 1);
        assert!(grow.exited.is_empty());
    }

    #[test]
    fn test_time_domain_follows_subset() {
        let timeline = timeline();
        let mut plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        let full_domain = plot.time_domain();
        plot.set_subset(&timeline.subset_until(timeline.commits()[0].datetime));
        let narrowed = plot.time_domain();
        assert_eq!(narrowed.0, full_domain.0);
        assert!(narrowed.1 < full_domain.1);

        // An empty subset leaves the domain alone
        let before = timeline.commits()[0].datetime - chrono::Duration::days(1);
        let empty = plot.set_subset(&timeline.subset_until(before));
        assert_eq!(plot.time_domain(), narrowed);
        assert_eq!(empty.exited.len(), 1);
        assert!(plot.points().is_empty());
    }

    #[test]
    fn test_y_ticks_wrap_label() {
        let timeline = timeline();
        let plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        let ticks = plot.y_ticks();
        assert_eq!(ticks.len(), 13);
        assert_eq!(ticks[0].label, "00:00");
        assert_eq!(ticks[12].label, "00:00");
        assert_eq!(ticks[0].color, ticks[12].color);
    }

    #[test]
    fn test_same_size_commits_use_mid_radius() {
        let rows = vec![
            line("a.rs", "rs", 1, "c1", "2024-03-01T09:00:00Z"),
            line("a.rs", "rs", 2, "c2", "2024-03-02T09:00:00Z"),
        ];
        let timeline = Timeline::new(rows, DEFAULT_REPOSITORY_URL);
        let plot = ScatterPlot::new(timeline.commits(), ChartStyle::default());
        assert!(plot.points().iter().all(|p| p.mark.r == 16.0));
    }
}
