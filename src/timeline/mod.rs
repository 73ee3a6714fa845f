//! Commit timeline
//!
//! Groups change-log rows into commit records and answers the
//! "which commits are in scope at time T" question every panel asks.

mod stats;

pub use stats::SummaryStats;

use crate::models::{ActiveSubset, CommitRecord, LineRecord};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use tracing::debug;

/// Default repository base used for commit permalinks.
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/YOUR_REPO";

/// Group rows by commit id into commit records ordered by ascending
/// timestamp (ties broken by id). Rows keep their change-log order
/// within each commit.
pub fn aggregate(lines: Vec<LineRecord>, repository_url: &str) -> Vec<CommitRecord> {
    let row_count = lines.len();
    let mut groups: HashMap<String, Vec<LineRecord>> = HashMap::new();
    for line in lines {
        groups.entry(line.commit.clone()).or_default().push(line);
    }

    let mut commits: Vec<CommitRecord> = groups
        .into_iter()
        .filter_map(|(id, rows)| CommitRecord::from_lines(id, repository_url, rows))
        .collect();
    commits.sort_by(|a, b| a.datetime.cmp(&b.datetime).then_with(|| a.id.cmp(&b.id)));

    debug!("Aggregated {} rows into {} commits", row_count, commits.len());
    commits
}

/// Every commit of the change log, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    commits: Vec<CommitRecord>,
}

impl Timeline {
    pub fn new(lines: Vec<LineRecord>, repository_url: &str) -> Self {
        Self {
            commits: aggregate(lines, repository_url),
        }
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// All rows, flattened in commit order.
    pub fn lines(&self) -> impl Iterator<Item = &LineRecord> {
        self.commits.iter().flat_map(|c| c.lines().iter())
    }

    pub fn line_count(&self) -> usize {
        self.commits.iter().map(|c| c.total_lines).sum()
    }

    pub fn full_subset(&self) -> ActiveSubset<'_> {
        ActiveSubset::all(&self.commits)
    }

    /// Commits at or before `cutoff`.
    pub fn subset_until(&self, cutoff: DateTime<FixedOffset>) -> ActiveSubset<'_> {
        ActiveSubset::until(&self.commits, cutoff)
    }

    pub fn summary(&self) -> SummaryStats {
        SummaryStats::for_subset(&self.full_subset())
    }
}
