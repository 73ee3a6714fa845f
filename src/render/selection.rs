//! Brush selection state and the two panels that report on it: the
//! selection-count banner and the per-language breakdown.

use super::{SelectionChange, SelectionObserver};
use crate::models::LineRecord;
use serde::Serialize;

/// An inclusive rectangle in chart pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrushRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x0 <= x && x <= self.x1 && self.y0 <= y && y <= self.y1
    }

    pub fn area(&self) -> f64 {
        (self.x1 - self.x0) * (self.y1 - self.y0)
    }
}

/// What the brush currently covers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SelectionState {
    /// No rectangle: the whole active subset counts as selected
    #[default]
    None,
    /// A zero-area brush: nothing is selected
    Empty,
    Rect(BrushRect),
}

impl SelectionState {
    /// Selection from a drag gesture between two corners, in any order.
    pub fn from_drag(start: (f64, f64), end: (f64, f64)) -> Self {
        let rect = BrushRect {
            x0: start.0.min(end.0),
            y0: start.1.min(end.1),
            x1: start.0.max(end.0),
            y1: start.1.max(end.1),
        };
        if rect.area() <= 0.0 {
            SelectionState::Empty
        } else {
            SelectionState::Rect(rect)
        }
    }

    pub fn includes(&self, x: f64, y: f64) -> bool {
        match self {
            SelectionState::None => true,
            SelectionState::Empty => false,
            SelectionState::Rect(rect) => rect.contains(x, y),
        }
    }
}

/// "N commits selected" banner.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionBanner {
    text: String,
}

impl Default for SelectionBanner {
    fn default() -> Self {
        Self {
            text: selection_label(0),
        }
    }
}

impl SelectionBanner {
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl SelectionObserver for SelectionBanner {
    fn on_selection_changed(&mut self, change: &SelectionChange<'_>) {
        self.text = selection_label(change.selected.len());
    }
}

pub fn selection_label(count: usize) -> String {
    if count == 0 {
        "No commits selected".to_string()
    } else {
        format!("{count} commits selected")
    }
}

/// One language's share of the selected lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageShare {
    pub language: String,
    pub lines: usize,
    pub share: f64,
}

impl LanguageShare {
    pub fn label(&self) -> String {
        format!("{} lines ({})", self.lines, format_percent(self.share))
    }
}

/// Lines per language, in order of first appearance.
pub fn language_breakdown<'a>(lines: impl IntoIterator<Item = &'a LineRecord>) -> Vec<LanguageShare> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut total = 0;
    for line in lines {
        total += 1;
        match counts.iter_mut().find(|(lang, _)| *lang == line.language) {
            Some((_, n)) => *n += 1,
            None => counts.push((line.language.clone(), 1)),
        }
    }
    counts
        .into_iter()
        .map(|(language, lines)| LanguageShare {
            language,
            lines,
            share: lines as f64 / total as f64,
        })
        .collect()
}

/// Percentage with at most one decimal, trailing `.0` dropped.
pub fn format_percent(share: f64) -> String {
    let text = format!("{:.1}", share * 100.0);
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}%")
}

/// Language breakdown of the selected commits; empty when nothing is selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageBreakdown {
    entries: Vec<LanguageShare>,
}

impl LanguageBreakdown {
    pub fn entries(&self) -> &[LanguageShare] {
        &self.entries
    }
}

impl SelectionObserver for LanguageBreakdown {
    fn on_selection_changed(&mut self, change: &SelectionChange<'_>) {
        self.entries = language_breakdown(change.selected.iter().flat_map(|c| c.lines().iter()));
    }
}
