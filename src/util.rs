// Date/time normalization and number helpers.
//
// Attendance exports mix date formats freely, sometimes inside one file. This
// module turns whatever we get into month keys, sortable date tuples and
// fractional hours, so the reducers can assume clean values. Nothing in here
// fails: unparseable input becomes a sentinel that contributes nothing.
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(20\d{2})[-/](\d{1,2})").expect("year-month pattern"));
static DAY_MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})[-/](\d{1,2})[-/](20\d{2})").expect("day-month-year pattern")
});
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(20\d{2})").expect("year pattern"));
static MONTH_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec|january|february|march|april|june|july|august|september|october|november|december)",
    )
    .expect("month name pattern")
});
static DAY_MONNAME_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2})[-/](\w{3,})[-/](20\d{2})").expect("day-monname-year pattern")
});
static YEAR_MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(20\d{2})[-/](\d{1,2})[-/](\d{1,2})").expect("year-month-day pattern")
});
static TIME_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[:.]").expect("time separator"));

/// Month number from an English month name or abbreviation. Only the first
/// three letters matter, so "Sept" and "September" both map to 9.
pub fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let m = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}

/// Normalize a free-form date into a `YYYY-MM` month key.
///
/// Tried in order:
/// - `YYYY-MM` / `YYYY/MM` (anything after the month is ignored),
/// - `DD-MM-YYYY` / `DD/MM/YYYY` (the day is dropped),
/// - a year plus a month name anywhere in the string.
///
/// Input that matches none of these comes back unchanged; empty stays empty.
pub fn extract_month(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    if let Some(c) = YEAR_MONTH_RE.captures(raw) {
        if let Ok(m) = c[2].parse::<u32>() {
            return format!("{}-{:02}", &c[1], m);
        }
    }
    if let Some(c) = DAY_MONTH_YEAR_RE.captures(raw) {
        if let Ok(m) = c[2].parse::<u32>() {
            return format!("{}-{:02}", &c[3], m);
        }
    }
    let lower = raw.to_lowercase();
    if let (Some(y), Some(mn)) = (YEAR_RE.captures(&lower), MONTH_NAME_RE.captures(&lower)) {
        if let Some(m) = month_from_name(&mn[1]) {
            return format!("{}-{:02}", &y[1], m);
        }
    }
    raw.to_string()
}

/// A `(year, month, day)` triple that orders chronologically.
///
/// `DateTuple::UNKNOWN` (all zeros) marks an unparseable date. It sorts before
/// every real date and is never consecutive to anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DateTuple {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateTuple {
    pub const UNKNOWN: DateTuple = DateTuple { year: 0, month: 0, day: 0 };

    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn is_unknown(&self) -> bool {
        self.month == 0
    }

    /// True when `next` falls on the calendar day after `self`.
    ///
    /// Month lengths are not checked: day 30 or 31 followed by day 1 of the
    /// next month counts as consecutive, whatever the month. That means
    /// Apr 30 -> May 1 and Jan 31 -> Feb 1 are caught, but so is the bogus
    /// Jan 30 -> Feb 1, and Feb 28 -> Mar 1 is missed.
    pub fn is_day_before(&self, next: &DateTuple) -> bool {
        if self.is_unknown() || next.is_unknown() {
            return false;
        }
        if self.year == next.year && self.month == next.month {
            return next.day == self.day + 1;
        }
        if next.day == 1 && (self.day == 30 || self.day == 31) {
            let same_year_next_month = next.year == self.year && next.month == self.month + 1;
            let year_rollover = next.month == 1 && self.month == 12 && next.year == self.year + 1;
            return same_year_next_month || year_rollover;
        }
        false
    }
}

/// Parse a date into a sortable tuple. Understands `D-Mon-YYYY` (textual
/// month, `-` or `/`) and `YYYY-M-D`; everything else is `DateTuple::UNKNOWN`.
pub fn parse_date(raw: &str) -> DateTuple {
    let s = raw.trim();
    if s.is_empty() {
        return DateTuple::UNKNOWN;
    }
    if let Some(c) = DAY_MONNAME_YEAR_RE.captures(s) {
        return match (c[1].parse::<u32>(), month_from_name(&c[2]), c[3].parse::<i32>()) {
            (Ok(day), Some(month), Ok(year)) => DateTuple::new(year, month, day),
            _ => DateTuple::UNKNOWN,
        };
    }
    if let Some(c) = YEAR_MONTH_DAY_RE.captures(s) {
        if let (Ok(year), Ok(month), Ok(day)) =
            (c[1].parse::<i32>(), c[2].parse::<u32>(), c[3].parse::<u32>())
        {
            return DateTuple::new(year, month, day);
        }
    }
    DateTuple::UNKNOWN
}

fn hours_of(t: &NaiveTime) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0 + t.second() as f64 / 3600.0
}

/// Convert a clock time to fractional hours.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, `HH:MM:SS`, and loose `H:M[:S]` with `:` or
/// `.` separators. Returns `0.0` when nothing parses; callers treat `0.0` as
/// "no time recorded", not as midnight.
pub fn time_to_hours(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return hours_of(&dt.time());
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return hours_of(&t);
    }
    let parts: Vec<&str> = TIME_SPLIT_RE.split(s).collect();
    if parts.len() >= 2 {
        let h = parts[0].trim().parse::<i64>();
        let m = parts[1].trim().parse::<i64>();
        let sec = match parts.get(2) {
            Some(p) => p.trim().parse::<i64>(),
            None => Ok(0),
        };
        if let (Ok(h), Ok(m), Ok(sec)) = (h, m, sec) {
            return h as f64 + m as f64 / 60.0 + sec as f64 / 3600.0;
        }
    }
    0.0
}

/// Hours between two clock times, wrapping past midnight for overnight
/// shifts. Zero when either end is missing.
pub fn duration_hours(start: &str, end: &str) -> f64 {
    let start_h = time_to_hours(start);
    let mut end_h = time_to_hours(end);
    if start_h == 0.0 || end_h == 0.0 {
        return 0.0;
    }
    if end_h < start_h {
        end_h += 24.0;
    }
    (end_h - start_h).max(0.0)
}

/// Round to two decimals, ties to even, which is what the reference KPI
/// exports were produced with.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// `num / den` as a percentage rounded to two decimals; `0.0` when `den` is
/// zero.
pub fn pct(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    round2(num / den * 100.0)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
