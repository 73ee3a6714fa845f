//! Summary panel
//!
//! Built once, then updated in place: high-frequency scroll updates only
//! rewrite the metric values, never the panel structure.

use super::{SelectionChange, SelectionObserver, SubsetChange, SubsetObserver};
use crate::timeline::SummaryStats;
use serde::Serialize;

/// One labelled value in the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct SummaryPanel {
    metrics: Option<Vec<Metric>>,
    stats: SummaryStats,
    builds: usize,
}

impl SummaryPanel {
    pub const TITLE: &'static str = "Summary";

    /// Build the panel structure and fill it.
    pub fn render(&mut self, stats: SummaryStats) {
        self.metrics = Some(
            stats
                .metrics()
                .into_iter()
                .map(|(label, value)| Metric { label, value })
                .collect(),
        );
        self.stats = stats;
        self.builds += 1;
    }

    /// Rewrite the values of an existing panel. A panel that was never
    /// rendered is rendered instead.
    pub fn update(&mut self, stats: SummaryStats) {
        let Some(metrics) = self.metrics.as_mut() else {
            self.render(stats);
            return;
        };
        for (metric, (_, value)) in metrics.iter_mut().zip(stats.metrics()) {
            metric.value = value;
        }
        self.stats = stats;
    }

    pub fn metrics(&self) -> &[Metric] {
        self.metrics.as_deref().unwrap_or_default()
    }

    pub fn stats(&self) -> SummaryStats {
        self.stats
    }

    /// How many times the structure has been built.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

impl SubsetObserver for SummaryPanel {
    fn on_subset_changed(&mut self, change: &SubsetChange<'_>) {
        self.update(SummaryStats::for_subset(change.subset));
    }
}

impl SelectionObserver for SummaryPanel {
    /// Shows the brushed commits while a rectangle has hits, the active
    /// subset otherwise.
    fn on_selection_changed(&mut self, change: &SelectionChange<'_>) {
        let stats = match change.state {
            super::SelectionState::Rect(_) if !change.selected.is_empty() => SummaryStats::compute(
                change.selected.iter().flat_map(|c| c.lines().iter()),
                change.selected.len(),
            ),
            _ => SummaryStats::for_subset(change.subset),
        };
        self.update(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::tests::two_commit_lines;
    use crate::timeline::{Timeline, DEFAULT_REPOSITORY_URL};

    #[test]
    fn test_render_then_update_keeps_structure() {
        let timeline = Timeline::new(two_commit_lines(), DEFAULT_REPOSITORY_URL);
        let mut panel = SummaryPanel::default();
        panel.render(timeline.summary());
        assert_eq!(panel.builds(), 1);
        assert_eq!(panel.metrics()[0].value, "2");
        assert_eq!(panel.metrics()[2].value, "5");

        let first = timeline.commits()[0].datetime;
        let subset = timeline.subset_until(first);
        panel.on_subset_changed(&SubsetChange { subset: &subset });
        assert_eq!(panel.builds(), 1);
        let values: Vec<&str> = panel.metrics().iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values[..3], ["1", "1", "3"]);
        let labels: Vec<&str> = panel.metrics().iter().map(|m| m.label).collect();
        assert_eq!(labels, ["Commits", "Files", "Total LOC", "Longest Line", "Max Lines"]);
    }

    #[test]
    fn test_update_before_render_builds_once() {
        let mut panel = SummaryPanel::default();
        assert!(panel.metrics().is_empty());
        panel.update(SummaryStats::default());
        panel.update(SummaryStats::default());
        assert_eq!(panel.builds(), 1);
        assert_eq!(panel.metrics().len(), 5);
    }
}
