//! Change-log loading
//!
//! The change log is a CSV file with one row per line of code, naming the
//! commit that last touched it:
//!
//! ```text
//! file,type,line,depth,length,commit,author,date,time,timezone,datetime
//! src/main.js,js,1,0,42,9f1c2e7...,Ada,2024-03-01,09:45:00,-08:00,2024-03-01T09:45:00-08:00
//! ```
//!
//! Columns are matched by header name, so their order does not matter and
//! unknown columns are ignored. Every row is validated; a malformed value
//! is reported with its row, column and raw text instead of being carried
//! forward as a bogus number.

mod writer;

pub use writer::{write, HEADER};

use crate::models::LineRecord;
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Columns a change log must provide. `time` is redundant with `datetime`
/// and is only written, never required.
const REQUIRED_COLUMNS: [&str; 10] = [
    "file", "type", "line", "depth", "length", "commit", "author", "date", "timezone",
    "datetime",
];

/// Errors raised while reading a change log
#[derive(Error, Debug)]
pub enum ChangeLogError {
    #[error("change log is empty (no header row)")]
    MissingHeader,

    #[error("change log is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}: column '{column}' has invalid value '{value}': {reason}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("row {row}: unterminated quoted field")]
    UnterminatedQuote { row: usize },

    #[error("failed to read change log: {0}")]
    Io(#[from] std::io::Error),
}

/// Load and validate a change log from disk.
pub fn load(path: &Path) -> Result<Vec<LineRecord>, ChangeLogError> {
    let file = std::fs::File::open(path)?;
    let lines = parse(file)?;
    info!("Loaded {} change-log rows from {}", lines.len(), path.display());
    Ok(lines)
}

/// Parse a change log from any reader.
pub fn parse<R: Read>(mut reader: R) -> Result<Vec<LineRecord>, ChangeLogError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    // Spreadsheet exports prepend a byte order mark
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut records = split_records(content)?.into_iter();
    let (_, header) = records.next().ok_or(ChangeLogError::MissingHeader)?;
    let columns = Columns::from_header(&header)?;

    let mut lines = Vec::new();
    for (row, fields) in records {
        if fields.len() != header.len() {
            return Err(ChangeLogError::FieldCount {
                row,
                expected: header.len(),
                found: fields.len(),
            });
        }
        lines.push(columns.record(row, &fields)?);
    }

    debug!("Parsed {} rows across {} columns", lines.len(), header.len());
    Ok(lines)
}

/// Positions of the required columns within a row.
struct Columns {
    file: usize,
    language: usize,
    line: usize,
    depth: usize,
    length: usize,
    commit: usize,
    author: usize,
    date: usize,
    timezone: usize,
    datetime: usize,
}

impl Columns {
    fn from_header(header: &[String]) -> Result<Self, ChangeLogError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(ChangeLogError::MissingColumn(name))
        };
        // Report the first missing column in declaration order
        for name in REQUIRED_COLUMNS {
            find(name)?;
        }
        Ok(Self {
            file: find("file")?,
            language: find("type")?,
            line: find("line")?,
            depth: find("depth")?,
            length: find("length")?,
            commit: find("commit")?,
            author: find("author")?,
            date: find("date")?,
            timezone: find("timezone")?,
            datetime: find("datetime")?,
        })
    }

    fn record(&self, row: usize, fields: &[String]) -> Result<LineRecord, ChangeLogError> {
        let offset = parse_offset(row, &fields[self.timezone])?;
        let date = parse_date(row, &fields[self.date], offset)?;
        let datetime = DateTime::parse_from_rfc3339(fields[self.datetime].trim()).map_err(|e| {
            ChangeLogError::InvalidValue {
                row,
                column: "datetime",
                value: fields[self.datetime].clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(LineRecord {
            file: non_empty(row, "file", &fields[self.file])?,
            language: fields[self.language].trim().to_string(),
            line: parse_u32(row, "line", &fields[self.line])?,
            depth: parse_u32(row, "depth", &fields[self.depth])?,
            length: parse_u32(row, "length", &fields[self.length])?,
            commit: non_empty(row, "commit", &fields[self.commit])?,
            author: fields[self.author].trim().to_string(),
            date,
            datetime,
        })
    }
}

fn non_empty(row: usize, column: &'static str, value: &str) -> Result<String, ChangeLogError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChangeLogError::InvalidValue {
            row,
            column,
            value: value.to_string(),
            reason: "value is empty".into(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_u32(row: usize, column: &'static str, value: &str) -> Result<u32, ChangeLogError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| ChangeLogError::InvalidValue {
            row,
            column,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z`.
fn parse_offset(row: usize, value: &str) -> Result<FixedOffset, ChangeLogError> {
    let invalid = |reason: &str| ChangeLogError::InvalidValue {
        row,
        column: "timezone",
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(|| invalid("out of range"));
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid("expected a leading '+' or '-'")),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("expected HH:MM"));
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid("bad hours"))?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid("bad minutes"))?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(|| invalid("out of range"))
}

/// Midnight of `date` in `offset`.
fn parse_date(
    row: usize,
    value: &str,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, ChangeLogError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|d| d.and_local_timezone(offset).single())
        .ok_or_else(|| ChangeLogError::InvalidValue {
            row,
            column: "date",
            value: value.to_string(),
            reason: "expected YYYY-MM-DD".into(),
        })
}

/// Split CSV content into records, honouring double-quoted fields (which
/// may contain commas, newlines and `""` escapes). Each record carries the
/// 1-based line number it starts on. Blank lines are skipped.
fn split_records(content: &str) -> Result<Vec<(usize, Vec<String>)>, ChangeLogError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line_no = 1;
    let mut record_start = 1;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line_no += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                if !(fields.len() == 1 && fields[0].is_empty()) {
                    records.push((record_start, std::mem::take(&mut fields)));
                }
                fields.clear();
                line_no += 1;
                record_start = line_no;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ChangeLogError::UnterminatedQuote { row: record_start });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push((record_start, fields));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_ROW: &str = "file,type,line,depth,length,commit,author,date,time,timezone,datetime";

    fn log(rows: &[&str]) -> String {
        let mut out = String::from(HEADER_ROW);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    #[test]
    fn test_parse_rows() {
        let content = log(&[
            "x.js,js,1,0,12,aaa111,Ada,2024-03-01,09:00:00,-08:00,2024-03-01T09:00:00-08:00",
            "x.js,js,2,1,30,aaa111,Ada,2024-03-01,09:00:00,-08:00,2024-03-01T09:00:00-08:00",
        ]);
        let lines = parse(content.as_bytes()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].line, 2);
        assert_eq!(lines[1].depth, 1);
        assert_eq!(lines[1].length, 30);
        assert_eq!(lines[0].language, "js");
        assert_eq!(lines[0].date.to_rfc3339(), "2024-03-01T00:00:00-08:00");
        assert_eq!(lines[0].datetime.to_rfc3339(), "2024-03-01T09:00:00-08:00");
    }

    #[test]
    fn test_byte_order_mark_before_header() {
        let content = format!(
            "\u{feff}{}",
            log(&["x.js,js,1,0,12,aaa111,Ada,2024-03-01,09:00:00,-08:00,2024-03-01T09:00:00-08:00"])
        );
        let lines = parse(content.as_bytes()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].file, "x.js");
    }

    #[test]
    fn test_columns_matched_by_name() {
        let content = "datetime,timezone,date,author,commit,length,depth,line,type,file,extra\n\
            2024-03-01T09:00:00Z,Z,2024-03-01,Ada,aaa,5,0,7,rs,lib.rs,ignored\n";
        let lines = parse(content.as_bytes()).unwrap();
        assert_eq!(lines[0].file, "lib.rs");
        assert_eq!(lines[0].line, 7);
    }

    #[test]
    fn test_quoted_fields() {
        let content = log(&[
            "\"dir, with comma/a.js\",js,1,0,12,aaa,\"Doe, \"\"JD\"\" Jane\",2024-03-01,09:00:00,+00:00,2024-03-01T09:00:00+00:00",
        ]);
        let lines = parse(content.as_bytes()).unwrap();
        assert_eq!(lines[0].file, "dir, with comma/a.js");
        assert_eq!(lines[0].author, "Doe, \"JD\" Jane");
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let content = format!(
            "{HEADER_ROW}\r\n\r\nx.js,js,1,0,12,aaa,Ada,2024-03-01,09:00:00,+00:00,2024-03-01T09:00:00+00:00\r\n"
        );
        assert_eq!(parse(content.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_number_names_row_and_column() {
        let content = log(&[
            "x.js,js,1,0,12,aaa,Ada,2024-03-01,09:00:00,+00:00,2024-03-01T09:00:00+00:00",
            "x.js,js,two,0,12,aaa,Ada,2024-03-01,09:00:00,+00:00,2024-03-01T09:00:00+00:00",
        ]);
        match parse(content.as_bytes()) {
            Err(ChangeLogError::InvalidValue { row, column, value, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(column, "line");
                assert_eq!(value, "two");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_datetime() {
        let content = log(&["x.js,js,1,0,12,aaa,Ada,2024-03-01,09:00:00,+00:00,yesterday"]);
        let err = parse(content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("datetime"));
    }

    #[test]
    fn test_invalid_timezone() {
        let content = log(&["x.js,js,1,0,12,aaa,Ada,2024-03-01,09:00:00,PST,2024-03-01T09:00:00+00:00"]);
        assert!(matches!(
            parse(content.as_bytes()),
            Err(ChangeLogError::InvalidValue { column: "timezone", .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let content = "file,type,line\nx.js,js,1\n";
        assert!(matches!(
            parse(content.as_bytes()),
            Err(ChangeLogError::MissingColumn("depth"))
        ));
    }

    #[test]
    fn test_field_count_mismatch() {
        let content = log(&["x.js,js,1"]);
        assert!(matches!(
            parse(content.as_bytes()),
            Err(ChangeLogError::FieldCount { row: 2, found: 3, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse("".as_bytes()), Err(ChangeLogError::MissingHeader)));
    }

    #[test]
    fn test_unterminated_quote() {
        let content = log(&["\"x.js,js,1,0,12,aaa,Ada,2024-03-01,09:00:00,+00:00,2024-03-01T09:00:00+00:00"]);
        assert!(matches!(
            parse(content.as_bytes()),
            Err(ChangeLogError::UnterminatedQuote { row: 2 })
        ));
    }

    #[test]
    fn test_header_only_is_empty_log() {
        let lines = parse(format!("{HEADER_ROW}\n").as_bytes()).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_offset_without_colon() {
        let offset = parse_offset(1, "-0830").unwrap();
        assert_eq!(offset.local_minus_utc(), -(8 * 3600 + 30 * 60));
    }
}
