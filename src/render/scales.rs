//! Scales mapping data values to chart coordinates, radii and colours

use super::color::{hcl_long, Rgb};
use chrono::{DateTime, TimeZone, Utc};

const DAY_SECS: i64 = 86_400;

/// Linear map from `domain` to `range`. A degenerate domain maps every
/// value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 { 0.5 } else { (value - d0) / (d1 - d0) };
        r0 + t * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// Square-root scale: area, not radius, is proportional to the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    inner: LinearScale,
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: LinearScale::new((domain.0.sqrt(), domain.1.sqrt()), range),
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        self.inner.apply(value.max(0.0).sqrt())
    }
}

/// Time scale over UTC instants, niced to whole days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: i64,
    end: i64,
    range: (f64, f64),
}

impl TimeScale {
    /// Build a scale over `[start, end]` with the domain widened to the
    /// enclosing UTC day boundaries. A single-day domain spans one day.
    pub fn nice<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>, range: (f64, f64)) -> Self {
        let (lo, hi) = {
            let a = start.timestamp();
            let b = end.timestamp();
            (a.min(b), a.max(b))
        };
        let start = lo.div_euclid(DAY_SECS) * DAY_SECS;
        let mut end = hi.div_euclid(DAY_SECS) * DAY_SECS;
        if end < hi {
            end += DAY_SECS;
        }
        if end == start {
            end += DAY_SECS;
        }
        Self { start, end, range }
    }

    pub fn apply<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> f64 {
        LinearScale::new((self.start as f64, self.end as f64), self.range).apply(at.timestamp() as f64)
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (utc(self.start), utc(self.end))
    }

    /// Day-aligned ticks, at most `max_ticks` of them, using a 1, 2, 7, 14
    /// or 30 day step.
    pub fn ticks(&self, max_ticks: usize) -> Vec<DateTime<Utc>> {
        let days = (self.end - self.start) / DAY_SECS;
        let step = [1, 2, 7, 14, 30]
            .into_iter()
            .find(|step| (days / step) as usize + 1 <= max_ticks.max(1))
            .unwrap_or_else(|| match max_ticks as i64 {
                0 | 1 => days + 1,
                n => ((days + n - 2) / (n - 1)).max(30),
            });

        (0..)
            .map(|i| self.start + i * step * DAY_SECS)
            .take_while(|t| *t <= self.end)
            .map(utc)
            .collect()
    }
}

fn utc(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

/// Sequential colour scale over hours of the day. The interpolation
/// parameter wraps modulo 1, so hour 24 has the colour of hour 0.
#[derive(Debug, Clone, Copy)]
pub struct CyclicColorScale {
    domain: (f64, f64),
    start: Rgb,
    end: Rgb,
}

impl CyclicColorScale {
    pub fn hours(start: Rgb, end: Rgb) -> Self {
        Self {
            domain: (0.0, 24.0),
            start,
            end,
        }
    }

    pub fn apply(&self, value: f64) -> Rgb {
        let (d0, d1) = self.domain;
        let t = ((value - d0) / (d1 - d0)).rem_euclid(1.0);
        hcl_long(self.start, self.end)(t)
    }
}

/// Tableau10 categorical palette.
pub const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

/// Ordinal scale handing out palette colours in first-request order.
/// Assignments are kept for the life of the scale, so a key keeps its
/// colour across re-renders.
#[derive(Debug, Clone, Default)]
pub struct OrdinalPalette {
    assigned: Vec<String>,
}

impl OrdinalPalette {
    pub fn color(&mut self, key: &str) -> &'static str {
        let idx = match self.assigned.iter().position(|k| k == key) {
            Some(idx) => idx,
            None => {
                self.assigned.push(key.to_string());
                self.assigned.len() - 1
            }
        };
        TABLEAU10[idx % TABLEAU10.len()]
    }
}
