//! JSON reporter
//!
//! Outputs the rendered dashboard as pretty-printed JSON: summary,
//! commits of the active subset (without their lines), plot points,
//! file groups, selection state and both step tracks.

use super::ReportContext;
use crate::models::CommitRecord;
use crate::narrative::Step;
use crate::render::scatter::PlotPoint;
use crate::render::{FileGroup, LanguageShare, SelectionState};
use crate::timeline::SummaryStats;
use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'r> {
    summary: SummaryStats,
    subset: SubsetInfo,
    commits: &'r [&'r CommitRecord],
    selection: Selection<'r>,
    points: &'r [PlotPoint],
    files: &'r [FileGroup],
    steps: Steps<'r>,
}

#[derive(Serialize)]
struct SubsetInfo {
    commits: usize,
    total_commits: usize,
    cutoff: Option<DateTime<FixedOffset>>,
}

#[derive(Serialize)]
struct Selection<'r> {
    state: SelectionState,
    text: &'r str,
    languages: &'r [LanguageShare],
}

#[derive(Serialize)]
struct Steps<'r> {
    commits: &'r [Step],
    files: &'r [Step],
}

fn build<'r>(context: &'r ReportContext<'_, '_>) -> JsonReport<'r> {
    let dashboard = context.dashboard;
    let subset = dashboard.subset();
    JsonReport {
        summary: dashboard.summary.stats(),
        subset: SubsetInfo {
            commits: subset.len(),
            total_commits: dashboard.timeline().commits().len(),
            cutoff: subset.cutoff(),
        },
        commits: subset.commits(),
        selection: Selection {
            state: dashboard.scatter.selection(),
            text: dashboard.banner.text(),
            languages: dashboard.languages.entries(),
        },
        points: dashboard.scatter.points(),
        files: dashboard.files.groups(),
        steps: Steps {
            commits: &context.commit_steps,
            files: &context.file_steps,
        },
    }
}

/// Render dashboard as JSON
pub fn render(context: &ReportContext<'_, '_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(&build(context))?)
}

/// Render dashboard as compact JSON (single line)
#[allow(dead_code)] // Public API helper
pub fn render_compact(context: &ReportContext<'_, '_>) -> Result<String> {
    Ok(serde_json::to_string(&build(context))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ChartStyle, Dashboard};
    use crate::reporters::tests::test_timeline;

    #[test]
    fn test_json_render_valid() {
        let timeline = test_timeline();
        let dashboard = Dashboard::new(&timeline, ChartStyle::default());
        let json_str = render(&ReportContext::new(&dashboard)).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");

        assert_eq!(parsed["summary"]["commits"], 2);
        assert_eq!(parsed["summary"]["total_loc"], 5);
        assert_eq!(parsed["subset"]["cutoff"], serde_json::Value::Null);
        assert_eq!(parsed["selection"]["state"]["kind"], "none");
        assert_eq!(parsed["selection"]["text"], "2 commits selected");
        assert_eq!(parsed["points"].as_array().expect("points").len(), 2);
        assert_eq!(parsed["files"][0]["name"], "index.html");
        assert_eq!(parsed["steps"]["files"].as_array().expect("file steps").len(), 2);
    }

    #[test]
    fn test_json_commits_omit_lines() {
        let timeline = test_timeline();
        let dashboard = Dashboard::new(&timeline, ChartStyle::default());
        let json_str = render(&ReportContext::new(&dashboard)).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        let first = &parsed["commits"][0];
        assert_eq!(first["id"], "1111111aaaa");
        assert_eq!(first["url"], "https://github.com/me/site/commit/1111111aaaa");
        assert_eq!(first["total_lines"], 3);
        assert!(first.get("lines").is_none());
    }

    #[test]
    fn test_json_reflects_subset_cutoff() {
        let timeline = test_timeline();
        let mut dashboard = Dashboard::new(&timeline, ChartStyle::default());
        dashboard.publish_subset(timeline.subset_until(timeline.commits()[0].datetime));
        let json_str = render_compact(&ReportContext::new(&dashboard)).expect("render compact JSON");
        assert!(!json_str.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["subset"]["commits"], 1);
        assert_eq!(parsed["subset"]["total_commits"], 2);
        assert_eq!(parsed["summary"]["files"], 2);
    }
}
