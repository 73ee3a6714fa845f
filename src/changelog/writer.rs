//! Change-log writer
//!
//! Emits the same column layout the loader reads, quoting any field that
//! contains a comma, quote or newline.

use crate::models::LineRecord;
use chrono::SecondsFormat;
use std::io::{self, Write};

/// Column order of written change logs.
pub const HEADER: [&str; 11] = [
    "file", "type", "line", "depth", "length", "commit", "author", "date", "time", "timezone",
    "datetime",
];

/// Write `lines` as CSV, header first.
pub fn write<W: Write>(mut out: W, lines: &[LineRecord]) -> io::Result<()> {
    writeln!(out, "{}", HEADER.join(","))?;
    for record in lines {
        let row = [
            escape_field(&record.file),
            escape_field(&record.language),
            record.line.to_string(),
            record.depth.to_string(),
            record.length.to_string(),
            escape_field(&record.commit),
            escape_field(&record.author),
            record.datetime.format("%Y-%m-%d").to_string(),
            record.datetime.format("%H:%M:%S").to_string(),
            record.datetime.format("%:z").to_string(),
            record.datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
        ];
        writeln!(out, "{}", row.join(","))?;
    }
    out.flush()
}

fn escape_field(value: &str) -> String {
    let needs_quotes = value.contains(',') || value.contains('"') || value.contains('\n');
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
