//! Text (terminal) reporter with colors and formatting

use super::ReportContext;
use crate::render::Rgb;
use anyhow::Result;

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Files listed under BUSIEST FILES
const MAX_FILES: usize = 10;

/// 24-bit foreground colour escape for a hex colour
fn fg(hex: &str) -> String {
    match Rgb::parse_hex(hex) {
        Some(c) => format!("\x1b[38;2;{};{};{}m", c.r, c.g, c.b),
        None => String::new(),
    }
}

/// Render dashboard as formatted terminal output
pub fn render(context: &ReportContext<'_, '_>) -> Result<String> {
    let dashboard = context.dashboard;
    let subset = dashboard.subset();
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{BOLD}commitscope{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    let total = dashboard.timeline().commits().len();
    match subset.cutoff() {
        Some(cutoff) => out.push_str(&format!(
            "Showing {} of {} commits, up to {}\n\n",
            subset.len(),
            total,
            cutoff.format("%Y-%m-%d %H:%M %:z")
        )),
        None => out.push_str(&format!("Showing all {} commits\n\n", total)),
    }
    if let Some((first, last)) = subset.extent() {
        out.push_str(&format!(
            "{DIM}{} → {}{RESET}\n\n",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        ));
    }

    // Summary
    out.push_str(&format!("{BOLD}SUMMARY{RESET}\n"));
    for metric in dashboard.summary.metrics() {
        out.push_str(&format!("  {:<14}{BOLD}{}{RESET}\n", metric.label, metric.value));
    }
    out.push('\n');

    // Selection
    out.push_str(&format!(
        "{BOLD}SELECTION{RESET} {}\n",
        dashboard.banner.text()
    ));
    for share in dashboard.languages.entries() {
        out.push_str(&format!("  {:<14}{}\n", share.language, share.label()));
    }
    out.push('\n');

    // Busiest files
    let groups = dashboard.files.groups();
    if !groups.is_empty() {
        out.push_str(&format!("{BOLD}BUSIEST FILES{RESET}\n"));
        for group in groups.iter().take(MAX_FILES) {
            out.push_str(&format!(
                "  {}●{RESET} {:<40} {:>6} lines  {DIM}{}{RESET}\n",
                fg(&group.color),
                group.name,
                group.line_count(),
                group.language
            ));
        }
        if groups.len() > MAX_FILES {
            out.push_str(&format!(
                "  {DIM}... and {} more{RESET}\n",
                groups.len() - MAX_FILES
            ));
        }
        out.push('\n');
    }

    // Latest commits
    if !subset.is_empty() {
        out.push_str(&format!("{BOLD}COMMITS{RESET}\n"));
        for commit in subset.commits().iter().rev().take(MAX_FILES) {
            out.push_str(&format!(
                "  {}{}{RESET}  {}  {:<20} {:>5} lines\n",
                fg(&dashboard.scatter.color_for_hour(commit.hour_frac).to_hex()),
                commit.short_id(),
                commit.datetime.format("%Y-%m-%d %H:%M"),
                commit.author,
                commit.total_lines
            ));
        }
        out.push('\n');
    }

    Ok(out)
}
