//! Core data models for commitscope
//!
//! These models are used throughout the codebase for representing
//! line-level change records, the commits derived from them, and the
//! time-bounded views the visualizations render.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

/// Number of characters of a commit id shown as link text.
pub const SHORT_ID_LEN: usize = 7;

/// One row of the change log: a single line of code and the commit that
/// last touched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// File path relative to the repository root
    pub file: String,
    /// Type/language tag (usually the file extension)
    #[serde(rename = "type")]
    pub language: String,
    /// Line number (1-indexed)
    pub line: u32,
    /// Indentation depth of the line
    pub depth: u32,
    /// Line length in characters
    pub length: u32,
    /// Full commit id
    pub commit: String,
    pub author: String,
    /// Midnight of the commit day, in the commit's own offset
    pub date: DateTime<FixedOffset>,
    pub datetime: DateTime<FixedOffset>,
}

/// A commit summarised from the rows it contributed.
///
/// The rows themselves are owned by the record but are not part of its
/// serialized form; reach them through [`CommitRecord::lines`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitRecord {
    pub id: String,
    pub url: String,
    pub author: String,
    pub datetime: DateTime<FixedOffset>,
    /// Time of day as a fractional hour in `[0, 24)`
    pub hour_frac: f64,
    pub total_lines: usize,
    #[serde(skip)]
    lines: Vec<LineRecord>,
}

impl CommitRecord {
    /// Build a commit from its rows. Returns `None` for an empty group, so
    /// every record carries at least one line.
    pub fn from_lines(id: String, repository_url: &str, lines: Vec<LineRecord>) -> Option<Self> {
        let first = lines.first()?;
        let author = first.author.clone();
        let datetime = first.datetime;
        Some(Self {
            url: commit_url(repository_url, &id),
            id,
            author,
            datetime,
            hour_frac: hour_fraction(&datetime),
            total_lines: lines.len(),
            lines,
        })
    }

    /// Rows contributed by this commit, in change-log order.
    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    /// First seven characters of the id, used as link text.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    /// Number of distinct files this commit touched.
    pub fn files_touched(&self) -> usize {
        let mut files: Vec<&str> = self.lines.iter().map(|l| l.file.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        files.len()
    }
}

/// Fractional hour of day (`hours + minutes / 60`) in the timestamp's own offset.
pub fn hour_fraction(datetime: &DateTime<FixedOffset>) -> f64 {
    datetime.hour() as f64 + datetime.minute() as f64 / 60.0
}

/// Midnight of the timestamp's calendar day, in its own offset.
pub fn start_of_day(datetime: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    datetime
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|d| d.and_local_timezone(*datetime.offset()).single())
        .unwrap_or(*datetime)
}

/// Permalink for a commit: `<repository_url>/commit/<id>`.
pub fn commit_url(repository_url: &str, id: &str) -> String {
    format!("{}/commit/{}", repository_url.trim_end_matches('/'), id)
}

/// The commits currently in scope for every panel.
///
/// Either the full set (`cutoff == None`) or every commit whose timestamp
/// is at or before the cutoff. Rebuilt wholesale on each change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveSubset<'a> {
    commits: Vec<&'a CommitRecord>,
    cutoff: Option<DateTime<FixedOffset>>,
}

impl<'a> ActiveSubset<'a> {
    /// Every commit.
    pub fn all(commits: &'a [CommitRecord]) -> Self {
        Self {
            commits: commits.iter().collect(),
            cutoff: None,
        }
    }

    /// Commits with `datetime <= cutoff`.
    pub fn until(commits: &'a [CommitRecord], cutoff: DateTime<FixedOffset>) -> Self {
        Self {
            commits: commits.iter().filter(|c| c.datetime <= cutoff).collect(),
            cutoff: Some(cutoff),
        }
    }

    pub fn commits(&self) -> &[&'a CommitRecord] {
        &self.commits
    }

    pub fn cutoff(&self) -> Option<DateTime<FixedOffset>> {
        self.cutoff
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.commits.iter().any(|c| c.id == id)
    }

    /// All rows of the commits in scope.
    pub fn lines(&self) -> impl Iterator<Item = &'a LineRecord> + '_ {
        self.commits.iter().flat_map(|c| c.lines().iter())
    }

    /// Earliest and latest commit timestamp, if any.
    pub fn extent(&self) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let min = self.commits.iter().map(|c| c.datetime).min()?;
        let max = self.commits.iter().map(|c| c.datetime).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn line(file: &str, language: &str, line_no: u32, commit: &str, datetime: &str) -> LineRecord {
        let datetime = DateTime::parse_from_rfc3339(datetime).expect("valid datetime");
        let date = start_of_day(&datetime);
        LineRecord {
            file: file.into(),
            language: language.into(),
            line: line_no,
            depth: 0,
            length: 10 + line_no,
            commit: commit.into(),
            author: "Ada".into(),
            date,
            datetime,
        }
    }

    #[test]
    fn test_commit_from_lines() {
        let rows = vec![
            line("x.js", "js", 1, "abcdef1234", "2024-03-01T09:45:00-08:00"),
            line("x.js", "js", 2, "abcdef1234", "2024-03-01T09:45:00-08:00"),
        ];
        let commit = CommitRecord::from_lines("abcdef1234".into(), "https://github.com/me/site/", rows)
            .expect("non-empty");
        assert_eq!(commit.total_lines, 2);
        assert_eq!(commit.lines().len(), commit.total_lines);
        assert_eq!(commit.url, "https://github.com/me/site/commit/abcdef1234");
        assert_eq!(commit.short_id(), "abcdef1");
        assert!((commit.hour_frac - 9.75).abs() < 1e-9);
        assert_eq!(commit.files_touched(), 1);
    }

    #[test]
    fn test_empty_group_is_rejected() {
        assert!(CommitRecord::from_lines("abc".into(), "https://x", vec![]).is_none());
    }

    #[test]
    fn test_short_id_of_short_hash() {
        let rows = vec![line("a.rs", "rs", 1, "abc", "2024-03-01T00:00:00Z")];
        let commit = CommitRecord::from_lines("abc".into(), "https://x", rows).unwrap();
        assert_eq!(commit.short_id(), "abc");
    }

    #[test]
    fn test_lines_are_not_serialized() {
        let rows = vec![line("a.rs", "rs", 1, "abc", "2024-03-01T00:00:00Z")];
        let commit = CommitRecord::from_lines("abc".into(), "https://x", rows).unwrap();
        let json = serde_json::to_value(&commit).unwrap();
        assert!(json.get("lines").is_none());
        assert_eq!(json["total_lines"], 1);
    }

    #[test]
    fn test_hour_fraction_uses_recorded_offset() {
        let dt = DateTime::parse_from_rfc3339("2024-03-01T23:30:00+05:30").unwrap();
        assert!((hour_fraction(&dt) - 23.5).abs() < 1e-9);
    }
}
