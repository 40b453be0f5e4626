use crate::config::KpiConfig;
use crate::error::KpiError;
use crate::types::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organizational axis the KPIs are sliced by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Function,
    Company,
    Location,
}

impl GroupBy {
    pub const ALL: [GroupBy; 3] = [GroupBy::Function, GroupBy::Company, GroupBy::Location];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Function => "function",
            GroupBy::Company => "company",
            GroupBy::Location => "location",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(GroupBy::Function),
            "company" => Ok(GroupBy::Company),
            "location" => Ok(GroupBy::Location),
            other => Err(KpiError::InvalidGroupBy(other.to_string())),
        }
    }
}

/// "Company - Function" label, shortening the company where the config
/// knows a short code.
pub fn function_label(company: &str, function: &str, config: &KpiConfig) -> String {
    let company_short = config.company_short_name(company);
    match (company_short.is_empty(), function.is_empty()) {
        (false, false) => format!("{} - {}", company_short, function),
        (_, false) => function.to_string(),
        (false, true) => company_short.to_string(),
        (true, true) => "Unknown".to_string(),
    }
}

/// The group value a row falls into for `group_by`.
///
/// Company and location values are returned raw, untrimmed and possibly
/// empty; an empty group is still a group.
pub fn resolve_group(row: &Row, group_by: GroupBy, config: &KpiConfig) -> String {
    let cols = &config.attendance;
    match group_by {
        GroupBy::Function => {
            let company = row.trimmed(&cols.company);
            let function = row.trimmed(&cols.function);
            function_label(&company, &function, config)
        }
        GroupBy::Company => row.text(&cols.company).into_owned(),
        GroupBy::Location => row.text(&cols.location).into_owned(),
    }
}

/// Employee code, falling back to the employee name. `None` when both are
/// blank.
pub fn member_id(row: &Row, config: &KpiConfig) -> Option<String> {
    let code = row.trimmed(&config.attendance.employee_code);
    if !code.is_empty() {
        return Some(code);
    }
    let name = row.trimmed(&config.attendance.employee_name);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
