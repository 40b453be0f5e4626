use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use tabled::Tabled;

/// One cell of an uploaded row. Spreadsheet decoders hand us strings most of
/// the time, but numbers and booleans do show up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// String form of the cell. Integral numbers render without a fraction,
    /// so `5.0` read from a spreadsheet compares equal to `"5"`.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Cow::Owned(format!("{}", *n as i64))
            }
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Cell::Empty => Cow::Borrowed(""),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Number(n as f64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// A single uploaded record: column name -> cell.
///
/// Columns are not statically typed. A missing column reads as the empty
/// string unless the caller declares another default with [`Row::text_or`].
/// Column order is kept on the owning file (`header_order`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: HashMap<String, Cell>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, column: &str, value: impl Into<Cell>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Cell>) {
        self.cells.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    pub fn text(&self, column: &str) -> Cow<'_, str> {
        self.cells
            .get(column)
            .map(Cell::render)
            .unwrap_or(Cow::Borrowed(""))
    }

    /// Like [`Row::text`], but a missing column yields `default`. A column that
    /// is present but empty still yields `""`.
    pub fn text_or<'a>(&'a self, column: &str, default: &'a str) -> Cow<'a, str> {
        self.cells
            .get(column)
            .map(Cell::render)
            .unwrap_or(Cow::Borrowed(default))
    }

    pub fn trimmed(&self, column: &str) -> String {
        self.text(column).trim().to_string()
    }

    /// Integer counter column; blanks and anything non-integral count as 0.
    ///
    /// Spreadsheet exports store counters as floats, so an integral float
    /// such as `"4.0"` or a `4.0` number cell counts as 4.
    pub fn count(&self, column: &str) -> u64 {
        let raw = self.text(column);
        let s = raw.trim();
        if let Ok(n) = s.parse::<u64>() {
            return n;
        }
        match s.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 && f >= 0.0 => f as u64,
            _ => 0,
        }
    }

    /// Yes/no column: a `true` boolean cell, or the text `yes` or `true` in
    /// any case.
    pub fn is_true(&self, column: &str) -> bool {
        match self.cells.get(column) {
            Some(Cell::Bool(b)) => *b,
            Some(cell) => matches!(cell.render().trim().to_lowercase().as_str(), "yes" | "true"),
            None => false,
        }
    }

    /// Cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<Cell>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            cells: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Attendance status for one employee-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Present,
    OnDuty,
    Absent,
    SickLeave,
    CasualLeave,
    EarnedLeave,
    WeeklyOff,
    Holiday,
    WorkFromHome,
    Blank,
    Other,
}

impl Flag {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "P" => Flag::Present,
            "OD" => Flag::OnDuty,
            "A" => Flag::Absent,
            "SL" => Flag::SickLeave,
            "CL" => Flag::CasualLeave,
            "EL" => Flag::EarnedLeave,
            "W" => Flag::WeeklyOff,
            "H" => Flag::Holiday,
            "WHF" => Flag::WorkFromHome,
            "" => Flag::Blank,
            _ => Flag::Other,
        }
    }

    /// Present or on duty: the employee was working.
    pub fn is_attending(self) -> bool {
        matches!(self, Flag::Present | Flag::OnDuty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct OnTimeRecord {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Members")]
    pub members: usize,
    #[tabled(rename = "Present")]
    pub present: u64,
    #[tabled(rename = "Late")]
    pub late: u64,
    #[tabled(rename = "OnTime")]
    pub on_time: u64,
    #[tabled(rename = "OnTime%")]
    pub on_time_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct WorkHourRecord {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Members")]
    pub members: usize,
    #[tabled(rename = "Present")]
    pub present: u64,
    #[tabled(rename = "OD")]
    pub od: u64,
    #[tabled(rename = "ShiftHours")]
    pub shift_hours: f64,
    #[tabled(rename = "WorkHours")]
    pub work_hours: f64,
    #[tabled(rename = "Completed")]
    pub completed: u64,
    #[tabled(rename = "Completion%")]
    pub completion_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct WorkHourLostRecord {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Members")]
    pub members: usize,
    #[tabled(rename = "Present")]
    pub present: u64,
    #[tabled(rename = "OD")]
    pub od: u64,
    #[tabled(rename = "ShiftHours")]
    pub shift_hours: f64,
    #[tabled(rename = "WorkHours")]
    pub work_hours: f64,
    #[tabled(rename = "Lost")]
    pub lost: f64,
    #[tabled(rename = "Lost%")]
    pub lost_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct LeaveRecord {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Members")]
    pub members: usize,
    #[tabled(rename = "SL")]
    pub total_sl: u64,
    #[tabled(rename = "CL")]
    pub total_cl: u64,
    #[tabled(rename = "Workdays")]
    pub workdays: u64,
    #[tabled(rename = "A")]
    pub total_a: usize,
    #[tabled(rename = "SL~W")]
    pub sl_adjacent_w: u64,
    #[tabled(rename = "CL~W")]
    pub cl_adjacent_w: u64,
    #[tabled(rename = "SL~H")]
    pub sl_adjacent_h: u64,
    #[tabled(rename = "CL~H")]
    pub cl_adjacent_h: u64,
    #[tabled(rename = "SL%")]
    pub sl_pct: f64,
    #[tabled(rename = "CL%")]
    pub cl_pct: f64,
    #[tabled(rename = "A%")]
    pub a_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct OdFunctionRecord {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Members")]
    pub members: usize,
    #[tabled(rename = "OD")]
    pub od: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct OdEmployeeRecord {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Function")]
    pub function: String,
    #[tabled(rename = "Employee")]
    pub employee_name: String,
    #[tabled(rename = "OD")]
    pub od: u64,
}

/// The ten Teams activity counters, keyed the way the dashboards expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct ActivityCounters {
    #[serde(rename = "Team Chat")]
    #[tabled(rename = "Team Chat")]
    pub team_chat: u64,
    #[serde(rename = "Private Chat")]
    #[tabled(rename = "Private Chat")]
    pub private_chat: u64,
    #[serde(rename = "Calls")]
    #[tabled(rename = "Calls")]
    pub calls: u64,
    #[serde(rename = "Meetings Org")]
    #[tabled(rename = "Meetings Org")]
    pub meetings_organized: u64,
    #[serde(rename = "Meetings Att")]
    #[tabled(rename = "Meetings Att")]
    pub meetings_attended: u64,
    #[serde(rename = "One-time Org")]
    #[tabled(rename = "One-time Org")]
    pub one_time_organized: u64,
    #[serde(rename = "One-time Att")]
    #[tabled(rename = "One-time Att")]
    pub one_time_attended: u64,
    #[serde(rename = "Recurring Org")]
    #[tabled(rename = "Recurring Org")]
    pub recurring_organized: u64,
    #[serde(rename = "Recurring Att")]
    #[tabled(rename = "Recurring Att")]
    pub recurring_attended: u64,
    #[serde(rename = "Post Messages")]
    #[tabled(rename = "Post Messages")]
    pub post_messages: u64,
}

impl ActivityCounters {
    /// Field-wise sum, saturating at `u64::MAX`.
    pub fn add(&mut self, other: &ActivityCounters) {
        let sum = |a: &mut u64, b: u64| *a = a.saturating_add(b);
        sum(&mut self.team_chat, other.team_chat);
        sum(&mut self.private_chat, other.private_chat);
        sum(&mut self.calls, other.calls);
        sum(&mut self.meetings_organized, other.meetings_organized);
        sum(&mut self.meetings_attended, other.meetings_attended);
        sum(&mut self.one_time_organized, other.one_time_organized);
        sum(&mut self.one_time_attended, other.one_time_attended);
        sum(&mut self.recurring_organized, other.recurring_organized);
        sum(&mut self.recurring_attended, other.recurring_attended);
        sum(&mut self.post_messages, other.post_messages);
    }
}

/// One Teams row as listed per user, matched to the roster or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct UserActivityRow {
    #[tabled(skip)]
    pub file_id: u64,
    #[tabled(skip)]
    pub filename: String,
    #[tabled(skip)]
    #[serde(default)]
    pub from_month: Option<String>,
    #[tabled(skip)]
    #[serde(default)]
    pub to_month: Option<String>,
    #[tabled(rename = "Period")]
    pub month_range: String,
    #[tabled(rename = "User")]
    pub user: String,
    #[serde(flatten)]
    #[tabled(inline)]
    pub counters: ActivityCounters,
}

/// Teams activity summed per roster function or company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct GroupActivityRow {
    #[tabled(rename = "Group")]
    pub group: String,
    #[serde(flatten)]
    #[tabled(inline)]
    pub counters: ActivityCounters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct AppActivityRow {
    #[tabled(rename = "App")]
    pub app_name: String,
    #[tabled(rename = "Teams")]
    pub team_using_app: u64,
    #[tabled(rename = "Users")]
    pub users_using_app: u64,
}
