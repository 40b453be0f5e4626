use super::fold::{group_fold, Fold, GroupKey, RowContext};
use crate::config::KpiConfig;
use crate::error::KpiError;
use crate::group::{function_label, GroupBy};
use crate::types::{Flag, OdEmployeeRecord, OdFunctionRecord, Row};
use crate::util::extract_month;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How the OD analysis is broken down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OdMode {
    Function,
    Employee,
}

impl OdMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OdMode::Function => "function",
            OdMode::Employee => "employee",
        }
    }
}

impl fmt::Display for OdMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OdMode {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(OdMode::Function),
            "employee" => Ok(OdMode::Employee),
            other => Err(KpiError::InvalidOdMode(other.to_string())),
        }
    }
}

/// Output of either OD breakdown.
#[derive(Debug, Clone, PartialEq)]
pub enum OdReport {
    ByFunction(Vec<OdFunctionRecord>),
    ByEmployee(Vec<OdEmployeeRecord>),
}

pub struct OdByFunction;

impl Fold for OdByFunction {
    type Acc = u64;
    type Output = OdFunctionRecord;
    const NAME: &'static str = "od_function";

    // Only rows that identify an employee take part at all.
    fn accepts(&self, ctx: &RowContext<'_>) -> bool {
        ctx.member.is_some()
    }

    fn fold(&self, od: &mut u64, ctx: &RowContext<'_>) {
        if ctx.flag == Flag::OnDuty {
            *od += 1;
        }
    }

    fn finish(&self, key: GroupKey, members: usize, od: u64) -> OdFunctionRecord {
        OdFunctionRecord {
            month: key.month,
            group: key.group,
            members,
            od,
        }
    }
}

/// OD days per `(month, Company - Function)`.
pub fn compute_od_by_function(rows: &[Row], config: &KpiConfig) -> Vec<OdFunctionRecord> {
    group_fold(rows, GroupBy::Function, config, &OdByFunction)
}

/// OD days per `(month, Company - Function, employee name)`. Only OD rows
/// with a name contribute.
pub fn compute_od_by_employee(rows: &[Row], config: &KpiConfig) -> Vec<OdEmployeeRecord> {
    let cols = &config.attendance;
    let mut counts: BTreeMap<(String, String, String), u64> = BTreeMap::new();
    for row in rows {
        let name = row.trimmed(&cols.employee_name);
        if name.is_empty() || Flag::parse(&row.text(&cols.flag)) != Flag::OnDuty {
            continue;
        }
        let month = extract_month(&row.text(&cols.date));
        let function = function_label(
            &row.trimmed(&cols.company),
            &row.trimmed(&cols.function),
            config,
        );
        *counts.entry((month, function, name)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((month, function, employee_name), od)| OdEmployeeRecord {
            month,
            function,
            employee_name,
            od,
        })
        .collect()
}

pub fn compute_od_analysis(rows: &[Row], mode: OdMode, config: &KpiConfig) -> OdReport {
    match mode {
        OdMode::Function => OdReport::ByFunction(compute_od_by_function(rows, config)),
        OdMode::Employee => OdReport::ByEmployee(compute_od_by_employee(rows, config)),
    }
}
