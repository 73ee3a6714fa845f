//! Summary statistics over a set of commits

use crate::models::{ActiveSubset, LineRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Aggregate counts shown in the summary panel.
///
/// The maxima are `None` when there are no lines to take a maximum over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub commits: usize,
    pub files: usize,
    pub total_loc: usize,
    pub longest_line: Option<u32>,
    /// Highest line number seen in any single file
    pub max_lines: Option<u32>,
}

impl SummaryStats {
    pub fn compute<'a>(lines: impl IntoIterator<Item = &'a LineRecord>, commits: usize) -> Self {
        let mut per_file: HashMap<&str, u32> = HashMap::new();
        let mut total_loc = 0;
        let mut longest_line = None;

        for line in lines {
            total_loc += 1;
            longest_line = longest_line.max(Some(line.length));
            let max_line = per_file.entry(line.file.as_str()).or_insert(line.line);
            *max_line = (*max_line).max(line.line);
        }

        Self {
            commits,
            files: per_file.len(),
            total_loc,
            longest_line,
            max_lines: per_file.values().copied().max(),
        }
    }

    pub fn for_subset(subset: &ActiveSubset<'_>) -> Self {
        Self::compute(subset.lines(), subset.len())
    }

    /// Label/value pairs in display order.
    pub fn metrics(&self) -> [(&'static str, String); 5] {
        let opt = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        [
            ("Commits", self.commits.to_string()),
            ("Files", self.files.to_string()),
            ("Total LOC", self.total_loc.to_string()),
            ("Longest Line", opt(self.longest_line)),
            ("Max Lines", opt(self.max_lines)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::line;
    use crate::timeline::{Timeline, DEFAULT_REPOSITORY_URL};

    fn example_timeline() -> Timeline {
        let mut rows = vec![
            line("x.js", "js", 1, "aaa", "2024-03-01T09:00:00Z"),
            line("x.js", "js", 2, "aaa", "2024-03-01T09:00:00Z"),
            line("x.js", "js", 3, "aaa", "2024-03-01T09:00:00Z"),
            line("y.css", "css", 1, "bbb", "2024-03-01T14:30:00Z"),
            line("y.css", "css", 7, "bbb", "2024-03-01T14:30:00Z"),
        ];
        rows[1].length = 80;
        Timeline::new(rows, DEFAULT_REPOSITORY_URL)
    }

    #[test]
    fn test_full_set_summary() {
        let stats = example_timeline().summary();
        assert_eq!(stats.commits, 2);
        assert_eq!(stats.files, 2);
        assert_eq!(stats.total_loc, 5);
        assert_eq!(stats.longest_line, Some(80));
        assert_eq!(stats.max_lines, Some(7));
    }

    #[test]
    fn test_subset_summary_at_first_commit() {
        let timeline = example_timeline();
        let first = timeline.commits()[0].datetime;
        let stats = SummaryStats::for_subset(&timeline.subset_until(first));
        assert_eq!(stats.commits, 1);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.total_loc, 3);
        assert_eq!(stats.max_lines, Some(3));
    }

    #[test]
    fn test_max_lines_uses_highest_line_number_not_row_count() {
        let rows = vec![
            line("a.rs", "rs", 40, "aaa", "2024-03-01T09:00:00Z"),
            line("b.rs", "rs", 1, "aaa", "2024-03-01T09:00:00Z"),
            line("b.rs", "rs", 2, "aaa", "2024-03-01T09:00:00Z"),
        ];
        let stats = SummaryStats::compute(rows.iter(), 1);
        assert_eq!(stats.max_lines, Some(40));
    }

    #[test]
    fn test_metrics_for_empty_set() {
        let metrics = SummaryStats::default().metrics();
        assert_eq!(metrics[0], ("Commits", "0".to_string()));
        assert_eq!(metrics[3], ("Longest Line", "-".to_string()));
        assert_eq!(metrics[4], ("Max Lines", "-".to_string()));
    }
}
