//! Hover tooltip content for a commit point

use crate::models::CommitRecord;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitTooltip {
    pub href: String,
    pub link_text: String,
    pub date: String,
    pub time: String,
    pub author: String,
    pub lines: usize,
}

impl CommitTooltip {
    pub fn for_commit(commit: &CommitRecord) -> Self {
        Self {
            href: commit.url.clone(),
            link_text: commit.short_id().to_string(),
            date: commit.datetime.format("%-m/%-d/%Y").to_string(),
            time: commit.datetime.format("%-I:%M:%S %p").to_string(),
            author: commit.author.clone(),
            lines: commit.total_lines,
        }
    }

    /// Plain-text form, one field per line.
    pub fn text(&self) -> String {
        format!(
            "Commit: {}\nDate: {}\nTime: {}\nAuthor: {}\nLines edited: {}",
            self.link_text, self.date, self.time, self.author, self.lines
        )
    }
}
