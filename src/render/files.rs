//! File unit visualization
//!
//! One marker per line of code, grouped by file and coloured by the
//! file's dominant language. Groups are diffed by file name on every
//! re-render.

use super::scales::OrdinalPalette;
use super::{SubsetChange, SubsetObserver};
use crate::models::LineRecord;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// A single line marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub line: u32,
    pub depth: u32,
    pub commit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileGroup {
    pub name: String,
    /// Most frequent language tag among the file's lines
    pub language: String,
    pub color: String,
    pub units: Vec<Unit>,
}

impl FileGroup {
    pub fn line_count(&self) -> usize {
        self.units.len()
    }
}

/// Result of a keyed diff on file name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileTransition {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub exited: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FileView {
    groups: Vec<FileGroup>,
    palette: OrdinalPalette,
    last: FileTransition,
}

impl FileView {
    /// Re-render from a set of lines. Groups are sorted by descending line
    /// count, then by name.
    pub fn render<'a>(&mut self, lines: impl IntoIterator<Item = &'a LineRecord>) -> FileTransition {
        let mut by_file: HashMap<&str, Vec<&LineRecord>> = HashMap::new();
        for line in lines {
            by_file.entry(line.file.as_str()).or_default().push(line);
        }

        let mut files: Vec<(&str, Vec<&LineRecord>)> = by_file.into_iter().collect();
        files.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

        let previous: HashSet<&str> = self.groups.iter().map(|g| g.name.as_str()).collect();
        let mut transition = FileTransition::default();
        let mut groups = Vec::with_capacity(files.len());
        for (name, rows) in files {
            let language = dominant_language(&rows);
            if previous.contains(name) {
                transition.updated.push(name.to_string());
            } else {
                transition.entered.push(name.to_string());
            }
            groups.push(FileGroup {
                name: name.to_string(),
                color: self.palette.color(&language).to_string(),
                language,
                units: rows
                    .iter()
                    .map(|l| Unit {
                        line: l.line,
                        depth: l.depth,
                        commit: l.commit.clone(),
                    })
                    .collect(),
            });
        }

        let kept: HashSet<&str> = groups.iter().map(|g: &FileGroup| g.name.as_str()).collect();
        transition.exited = self
            .groups
            .iter()
            .filter(|g| !kept.contains(g.name.as_str()))
            .map(|g| g.name.clone())
            .collect();

        self.groups = groups;
        self.last = transition.clone();
        transition
    }

    pub fn groups(&self) -> &[FileGroup] {
        &self.groups
    }

    pub fn last_transition(&self) -> &FileTransition {
        &self.last
    }
}

impl SubsetObserver for FileView {
    fn on_subset_changed(&mut self, change: &SubsetChange<'_>) {
        self.render(change.subset.lines());
    }
}

/// Most frequent language; ties go to the alphabetically first tag.
fn dominant_language(rows: &[&LineRecord]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *counts.entry(row.language.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(lang, _)| lang.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tests::line;
    use crate::timeline::tests::two_commit_lines;
    use crate::timeline::{Timeline, DEFAULT_REPOSITORY_URL};

    #[test]
    fn test_groups_sorted_by_line_count() {
        let timeline = Timeline::new(two_commit_lines(), DEFAULT_REPOSITORY_URL);
        let mut view = FileView::default();
        let transition = view.render(timeline.lines());
        let names: Vec<&str> = view.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["x.js", "y.css"]);
        assert_eq!(view.groups()[0].line_count(), 3);
        assert_eq!(view.groups()[0].language, "js");
        assert_ne!(view.groups()[0].color, view.groups()[1].color);
        assert_eq!(transition.entered, ["x.js", "y.css"]);
    }

    #[test]
    fn test_rerender_same_subset_is_idempotent() {
        let timeline = Timeline::new(two_commit_lines(), DEFAULT_REPOSITORY_URL);
        let mut view = FileView::default();
        view.render(timeline.full_subset().lines());
        let before = view.groups().to_vec();

        let again = view.render(timeline.full_subset().lines());
        assert!(again.entered.is_empty());
        assert!(again.exited.is_empty());
        assert_eq!(again.updated.len(), 2);
        assert_eq!(view.groups(), before.as_slice());
    }

    #[test]
    fn test_exiting_groups_are_removed() {
        let timeline = Timeline::new(two_commit_lines(), DEFAULT_REPOSITORY_URL);
        let mut view = FileView::default();
        view.render(timeline.lines());
        let first = timeline.subset_until(timeline.commits()[0].datetime);
        let transition = view.render(first.lines());
        assert_eq!(transition.exited, ["y.css"]);
        assert_eq!(transition.updated, ["x.js"]);
        assert_eq!(view.groups().len(), 1);
    }

    #[test]
    fn test_language_colors_survive_rerender() {
        let timeline = Timeline::new(two_commit_lines(), DEFAULT_REPOSITORY_URL);
        let mut view = FileView::default();
        view.render(timeline.lines());
        let css_color = view.groups()[1].color.clone();

        // Only the css file remains; its colour must not shift
        let css_only: Vec<LineRecord> = timeline.lines().filter(|l| l.language == "css").cloned().collect();
        view.render(css_only.iter());
        assert_eq!(view.groups()[0].color, css_color);
    }

    #[test]
    fn test_dominant_language_tie_breaks_by_name() {
        let rows = [
            line("page.html", "html", 1, "c1", "2024-03-01T09:00:00Z"),
            line("page.html", "css", 2, "c1", "2024-03-01T09:00:00Z"),
        ];
        let refs: Vec<&LineRecord> = rows.iter().collect();
        assert_eq!(dominant_language(&refs), "css");
    }
}
