// Engine configuration.
//
// Every reducer receives a `&KpiConfig`, so the company short-code table and
// the source column names live in exactly one place. Extending the short-code
// table is a config change: drop a JSON file next to the binary and pass it
// with `--config`.
use crate::error::Result;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Process-wide default configuration, used when the caller has nothing
/// more specific to pass.
pub static DEFAULT_CONFIG: Lazy<KpiConfig> = Lazy::new(KpiConfig::default);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KpiConfig {
    /// Full company name -> short code used in "Company - Function" groups.
    pub company_short_codes: BTreeMap<String, String>,
    pub attendance: AttendanceColumns,
    pub roster: RosterColumns,
    pub teams: TeamsColumns,
    pub apps: AppColumns,
}

impl Default for KpiConfig {
    fn default() -> Self {
        let company_short_codes = [
            ("Confidence Batteries Limited", "CBL"),
            ("Confidence Infrastructure PLC.", "CIPLC"),
            ("Confidence Steel Export Limited", "CSEL"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            company_short_codes,
            attendance: AttendanceColumns::default(),
            roster: RosterColumns::default(),
            teams: TeamsColumns::default(),
            apps: AppColumns::default(),
        }
    }
}

impl KpiConfig {
    /// Load a configuration from a JSON file. Missing sections keep their
    /// defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Map a company name to its short code; unmapped names pass through.
    pub fn company_short_name<'a>(&'a self, company: &'a str) -> &'a str {
        self.company_short_codes
            .get(company)
            .map(String::as_str)
            .unwrap_or(company)
    }
}

/// Column names of the attendance export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AttendanceColumns {
    pub date: String,
    pub function: String,
    /// The HR export really does spell it "Comapny".
    pub company: String,
    pub location: String,
    pub employee_code: String,
    pub employee_name: String,
    pub flag: String,
    pub is_late: String,
    pub shift_in: String,
    pub shift_out: String,
    pub in_time: String,
    pub out_time: String,
}

impl Default for AttendanceColumns {
    fn default() -> Self {
        Self {
            date: "Attendance Date".into(),
            function: "Function Name".into(),
            company: "Comapny Name".into(),
            location: "Job Location".into(),
            employee_code: "Employee Code".into(),
            employee_name: "Name".into(),
            flag: "Flag".into(),
            is_late: "Is Late".into(),
            shift_in: "Shift In Time".into(),
            shift_out: "Shift Out Time".into(),
            in_time: "In Time".into(),
            out_time: "Out Time".into(),
        }
    }
}

/// Column names of the employee roster export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RosterColumns {
    pub email: String,
    pub function: String,
    pub company: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            email: "Email (Offical)".into(),
            function: "Function".into(),
            company: "Company".into(),
        }
    }
}

/// Column names of the Teams user activity export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeamsColumns {
    pub user: String,
    pub team_chat: String,
    pub private_chat: String,
    pub calls: String,
    pub meetings_organized: String,
    pub meetings_attended: String,
    pub one_time_organized: String,
    pub one_time_attended: String,
    pub recurring_organized: String,
    pub recurring_attended: String,
    pub post_messages: String,
}

impl Default for TeamsColumns {
    fn default() -> Self {
        Self {
            user: "User Principal Name".into(),
            team_chat: "Team Chat Message Count".into(),
            private_chat: "Private Chat Message Count".into(),
            calls: "Call Count".into(),
            meetings_organized: "Meetings Organized Count".into(),
            meetings_attended: "Meetings Attended Count".into(),
            one_time_organized: "Scheduled One-time Meetings Organized Count".into(),
            one_time_attended: "Scheduled One-time Meetings Attended Count".into(),
            recurring_organized: "Scheduled Recurring Meetings Organized Count".into(),
            recurring_attended: "Scheduled Recurring Meetings Attended Count".into(),
            post_messages: "Post Messages".into(),
        }
    }
}

/// Column names of the Teams app usage export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppColumns {
    pub app_name: String,
    pub teams_using: String,
    pub users_using: String,
}

impl Default for AppColumns {
    fn default() -> Self {
        Self {
            app_name: "App Name".into(),
            teams_using: "Team Using App".into(),
            users_using: "Users Using App".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_codes_map_known_companies_and_pass_others_through() {
        let cfg = KpiConfig::default();
        assert_eq!(cfg.company_short_name("Confidence Batteries Limited"), "CBL");
        assert_eq!(cfg.company_short_name("Confidence Infrastructure PLC."), "CIPLC");
        assert_eq!(cfg.company_short_name("Acme Ltd"), "Acme Ltd");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = KpiConfig::from_json_str(
            r#"{"company_short_codes": {"Acme Ltd": "ACME"}, "attendance": {"flag": "Status"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.company_short_name("Acme Ltd"), "ACME");
        assert_eq!(cfg.company_short_name("Confidence Batteries Limited"), "Confidence Batteries Limited");
        assert_eq!(cfg.attendance.flag, "Status");
        assert_eq!(cfg.attendance.date, "Attendance Date");
        assert_eq!(cfg.roster, RosterColumns::default());
    }
}
