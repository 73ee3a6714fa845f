//! HTML reporter with embedded styles and an inline SVG chart
//!
//! Generates a standalone page that can be viewed in any browser.
//! Includes:
//! - Summary stats panel
//! - Time-of-day scatter plot with gridlines, axes and per-point tooltips
//! - Selection banner and language breakdown
//! - File unit visualization
//! - Both narrative step tracks, one element per step

use super::ReportContext;
use crate::narrative::Step;
use crate::render::scatter::{AxisTick, PlotPoint};
use crate::render::{Dashboard, SummaryPanel};
use anyhow::Result;
use std::fmt::Write as _;

/// Render dashboard as standalone HTML
pub fn render(context: &ReportContext<'_, '_>) -> Result<String> {
    let dashboard = context.dashboard;
    let mut html = String::new();

    html.push_str(&render_head(dashboard));
    html.push_str("<body>\n<main class=\"container\">\n");
    html.push_str("<h1>Code history</h1>\n");

    html.push_str(&render_stats(&dashboard.summary));

    html.push_str("<div class=\"scrolly\">\n");
    html.push_str(&render_story("scatter-story", &context.commit_steps));
    html.push_str("<div class=\"scroll-target\">\n");
    html.push_str(&render_chart(dashboard)?);
    html.push_str(&render_tooltip());
    html.push_str(&render_selection(dashboard));
    html.push_str("</div>\n</div>\n");

    html.push_str("<div class=\"scrolly\">\n");
    html.push_str(&render_files(dashboard));
    html.push_str(&render_story("files-story", &context.file_steps));
    html.push_str("</div>\n");

    html.push_str("</main>\n</body>\n</html>\n");
    Ok(html)
}

fn render_head(dashboard: &Dashboard<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Code history - {} commits</title>
    <style>
{CSS}
    </style>
</head>
"#,
        dashboard.subset().len()
    )
}

fn render_stats(summary: &SummaryPanel) -> String {
    let mut out = String::from("<section id=\"stats\" class=\"stats-wrap\">\n");
    let _ = writeln!(out, "    <h2>{}</h2>", SummaryPanel::TITLE);
    out.push_str("    <dl class=\"stats\">\n");
    for metric in summary.metrics() {
        let _ = writeln!(
            out,
            "        <div class=\"metric\"><dt>{}</dt><dd>{}</dd></div>",
            html_escape(metric.label),
            html_escape(&metric.value)
        );
    }
    out.push_str("    </dl>\n</section>\n");
    out
}

fn render_chart(dashboard: &Dashboard<'_>) -> Result<String> {
    let scatter = &dashboard.scatter;
    let style = scatter.style();
    let usable = scatter.usable();
    let mut out = String::new();

    writeln!(
        out,
        "<div id=\"chart\">\n<svg viewBox=\"0 0 {} {}\" style=\"overflow: visible\">",
        style.width, style.height
    )?;

    // Gridlines
    writeln!(out, "<g class=\"gridlines\">")?;
    for tick in scatter.y_ticks() {
        writeln!(
            out,
            "  <line x1=\"{:.2}\" x2=\"{:.2}\" y1=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-opacity=\"0.25\"/>",
            usable.left,
            usable.right,
            tick.position,
            tick.position,
            tick.color.as_deref().unwrap_or("currentColor")
        )?;
    }
    writeln!(out, "</g>")?;

    // Dots
    writeln!(out, "<g class=\"dots\">")?;
    for point in scatter.points() {
        out.push_str(&render_point(point));
    }
    writeln!(out, "</g>")?;

    // Axes
    writeln!(
        out,
        "<g class=\"x-axis\" transform=\"translate(0,{:.2})\">",
        usable.bottom
    )?;
    writeln!(
        out,
        "  <line x1=\"{:.2}\" x2=\"{:.2}\" stroke=\"currentColor\"/>",
        usable.left, usable.right
    )?;
    for tick in scatter.x_ticks() {
        out.push_str(&render_x_tick(&tick));
    }
    writeln!(out, "</g>")?;

    writeln!(
        out,
        "<g class=\"y-axis\" transform=\"translate({:.2},0)\">",
        usable.left
    )?;
    writeln!(
        out,
        "  <line y1=\"{:.2}\" y2=\"{:.2}\" stroke=\"currentColor\"/>",
        usable.top, usable.bottom
    )?;
    for tick in scatter.y_ticks() {
        writeln!(
            out,
            "  <g class=\"tick\" transform=\"translate(0,{:.2})\"><line x2=\"-6\" stroke=\"currentColor\"/><text x=\"-9\" dy=\"0.32em\" text-anchor=\"end\">{}</text></g>",
            tick.position,
            html_escape(&tick.label)
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(out, "</svg>\n</div>")?;
    Ok(out)
}

fn render_point(point: &PlotPoint) -> String {
    let tooltip = &point.tooltip;
    format!(
        "  <circle class=\"{}\" data-id=\"{}\" data-lines=\"{}\" data-hour=\"{:.3}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" style=\"fill-opacity: 0.7\"><title>{}</title></circle>\n",
        if point.selected { "selected" } else { "" },
        html_escape(&point.id),
        point.total_lines,
        point.hour_frac,
        point.mark.cx,
        point.mark.cy,
        point.mark.r,
        point.fill,
        html_escape(&tooltip.text())
    )
}

fn render_x_tick(tick: &AxisTick) -> String {
    format!(
        "  <g class=\"tick\" transform=\"translate({:.2},0)\"><line y2=\"6\" stroke=\"currentColor\"/><text y=\"9\" dy=\"0.71em\" text-anchor=\"middle\">{}</text></g>\n",
        tick.position,
        html_escape(&tick.label)
    )
}

/// Empty hover card for pages that embed the chart and script it. Without a
/// script, each dot's `<title>` carries the same fields as hover text.
fn render_tooltip() -> String {
    r#"<dl id="commit-tooltip" class="info tooltip" hidden>
    <dt>Commit</dt><dd><a id="commit-link" href="" target="_blank"></a></dd>
    <dt>Date</dt><dd id="commit-date"></dd>
    <dt>Time</dt><dd id="commit-time"></dd>
    <dt>Author</dt><dd id="commit-author"></dd>
    <dt>Lines edited</dt><dd id="commit-lines"></dd>
</dl>
"#
    .to_string()
}

fn render_selection(dashboard: &Dashboard<'_>) -> String {
    let mut out = format!(
        "<p id=\"selection-count\">{}</p>\n<dl id=\"language-breakdown\" class=\"stats\">\n",
        html_escape(dashboard.banner.text())
    );
    for share in dashboard.languages.entries() {
        let _ = writeln!(
            out,
            "    <dt>{}</dt><dd>{}</dd>",
            html_escape(&share.language),
            html_escape(&share.label())
        );
    }
    out.push_str("</dl>\n");
    out
}

fn render_files(dashboard: &Dashboard<'_>) -> String {
    let mut out = String::from("<dl class=\"files\">\n");
    for group in dashboard.files.groups() {
        let _ = write!(
            out,
            "    <div><dt><code>{}</code><small>{} lines</small></dt><dd>",
            html_escape(&group.name),
            group.line_count()
        );
        for unit in &group.units {
            let _ = write!(
                out,
                "<div class=\"loc\" data-line=\"{}\" data-depth=\"{}\" style=\"--color: {}\"></div>",
                unit.line, unit.depth, group.color
            );
        }
        out.push_str("</dd></div>\n");
    }
    out.push_str("</dl>\n");
    out
}

fn render_story(id: &str, steps: &[Step]) -> String {
    let mut out = format!("<div id=\"{}\">\n", id);
    for step in steps {
        let _ = writeln!(
            out,
            "    <div class=\"step\" data-index=\"{}\" data-commit=\"{}\" data-datetime=\"{}\"><p>{}</p></div>",
            step.index,
            html_escape(&step.commit_id),
            step.datetime.to_rfc3339(),
            html_escape(&step.text)
        );
    }
    out.push_str("</div>\n");
    out
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded CSS
const CSS: &str = r#"
:root {
    --color-accent: oklch(65% 45% 0);
    --background-color: canvas;
    --text-color: canvastext;
}
body {
    font: 100%/1.5 system-ui, sans-serif;
    max-width: 100ch;
    margin-inline: auto;
    padding: 1rem;
    background: var(--background-color);
    color: var(--text-color);
}
.stats {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(8em, 1fr));
    gap: 1em;
}
.metric dt {
    font-size: 0.8em;
    text-transform: uppercase;
    opacity: 0.7;
}
.metric dd {
    margin: 0;
    font-size: 1.6em;
    font-weight: 600;
}
.scrolly {
    display: grid;
    grid-template-columns: subgrid;
    grid-column: 1 / -1;
    gap: 1em;
}
.step {
    min-height: 30vh;
    padding-bottom: 2em;
}
circle {
    transition: all 200ms, r calc(var(--r, 1) * 100ms);
    transform-origin: center;
    transform-box: fill-box;
}
circle:hover {
    transform: scale(1.5);
}
circle.selected {
    fill: #ff6b6b;
}
.tooltip {
    position: fixed;
    top: 1em;
    left: 1em;
    display: grid;
    grid-template-columns: auto 1fr;
    gap: 0.25em 1em;
    margin: 0;
    padding: 0.5em 1em;
    border-radius: 0.5em;
    background: color-mix(in oklch, canvas 85%, transparent);
    box-shadow: 0 0.25em 1em rgb(0 0 0 / 20%);
    backdrop-filter: blur(4px);
}
.tooltip[hidden] {
    opacity: 0;
    visibility: hidden;
}
.files > div {
    display: grid;
    grid-template-columns: subgrid;
    grid-column: 1 / -1;
}
.files dt small {
    display: block;
    font-size: 0.75em;
    opacity: 0.7;
}
.files dd {
    display: flex;
    flex-wrap: wrap;
    align-items: start;
    align-content: start;
    gap: 0.15em;
    padding-top: 0.6em;
    margin-left: 0;
}
.loc {
    display: flex;
    width: 0.5em;
    aspect-ratio: 1;
    background: var(--color);
    border-radius: 50%;
}
"#;
