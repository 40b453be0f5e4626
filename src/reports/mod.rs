//! Attendance KPI reducers.
//!
//! Every reducer takes already-parsed rows, a grouping dimension and the
//! engine config, and returns records sorted by `(month, group)`. They share
//! nothing between calls, so the same function serves the precompute path
//! and the on-the-fly fallback.
pub mod fold;
pub mod leave;
pub mod od;
pub mod on_time;
pub mod work_hour;
pub mod work_hour_lost;

pub use leave::compute_leave_analysis;
pub use od::{compute_od_analysis, compute_od_by_employee, compute_od_by_function, OdMode, OdReport};
pub use on_time::compute_on_time;
pub use work_hour::compute_work_hour_completion;
pub use work_hour_lost::compute_work_hour_lost;

use crate::config::KpiConfig;
use crate::error::Result;
use crate::group::GroupBy;
use crate::types::{
    LeaveRecord, OdEmployeeRecord, OdFunctionRecord, OnTimeRecord, Row, WorkHourLostRecord,
    WorkHourRecord,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    OnTime,
    WorkHour,
    WorkHourLost,
    Leave,
    Od,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::OnTime,
        ReportKind::WorkHour,
        ReportKind::WorkHourLost,
        ReportKind::Leave,
        ReportKind::Od,
    ];

    /// Dimension tags this report is precomputed for.
    pub fn dimensions(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Od => &["function", "employee"],
            _ => &["function", "company", "location"],
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportKind::OnTime => "on_time",
            ReportKind::WorkHour => "work_hour",
            ReportKind::WorkHourLost => "work_hour_lost",
            ReportKind::Leave => "leave",
            ReportKind::Od => "od",
        };
        f.write_str(s)
    }
}

/// Any reducer output row, tagged with the reducer that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum KpiRecord {
    OnTime(OnTimeRecord),
    WorkHour(WorkHourRecord),
    WorkHourLost(WorkHourLostRecord),
    Leave(LeaveRecord),
    OdFunction(OdFunctionRecord),
    OdEmployee(OdEmployeeRecord),
}

impl KpiRecord {
    pub fn kind(&self) -> ReportKind {
        match self {
            KpiRecord::OnTime(_) => ReportKind::OnTime,
            KpiRecord::WorkHour(_) => ReportKind::WorkHour,
            KpiRecord::WorkHourLost(_) => ReportKind::WorkHourLost,
            KpiRecord::Leave(_) => ReportKind::Leave,
            KpiRecord::OdFunction(_) | KpiRecord::OdEmployee(_) => ReportKind::Od,
        }
    }
}

/// Typed access to one variant of [`KpiRecord`].
pub trait KpiRow: Sized {
    const KIND: ReportKind;
    fn from_record(record: KpiRecord) -> Option<Self>;
    fn into_record(self) -> KpiRecord;
}

macro_rules! kpi_row {
    ($ty:ty, $variant:ident, $kind:expr) => {
        impl KpiRow for $ty {
            const KIND: ReportKind = $kind;

            fn from_record(record: KpiRecord) -> Option<Self> {
                match record {
                    KpiRecord::$variant(r) => Some(r),
                    _ => None,
                }
            }

            fn into_record(self) -> KpiRecord {
                KpiRecord::$variant(self)
            }
        }
    };
}

kpi_row!(OnTimeRecord, OnTime, ReportKind::OnTime);
kpi_row!(WorkHourRecord, WorkHour, ReportKind::WorkHour);
kpi_row!(WorkHourLostRecord, WorkHourLost, ReportKind::WorkHourLost);
kpi_row!(LeaveRecord, Leave, ReportKind::Leave);
kpi_row!(OdFunctionRecord, OdFunction, ReportKind::Od);
kpi_row!(OdEmployeeRecord, OdEmployee, ReportKind::Od);

fn wrap<T: KpiRow>(rows: Vec<T>) -> Vec<KpiRecord> {
    rows.into_iter().map(KpiRow::into_record).collect()
}

/// Reject a dimension `kind` cannot be grouped by, without running anything.
pub fn check_dimension(kind: ReportKind, dimension: &str) -> Result<()> {
    match kind {
        ReportKind::Od => OdMode::from_str(dimension).map(drop),
        _ => GroupBy::from_str(dimension).map(drop),
    }
}

/// Run one reducer for a dimension given as text, as it arrives from a
/// caller. An unknown dimension is an error, never a default.
pub fn run_report(
    kind: ReportKind,
    rows: &[Row],
    dimension: &str,
    config: &KpiConfig,
) -> Result<Vec<KpiRecord>> {
    let records = match kind {
        ReportKind::Od => match compute_od_analysis(rows, OdMode::from_str(dimension)?, config) {
            OdReport::ByFunction(v) => wrap(v),
            OdReport::ByEmployee(v) => wrap(v),
        },
        ReportKind::OnTime => wrap(compute_on_time(rows, GroupBy::from_str(dimension)?, config)),
        ReportKind::WorkHour => wrap(compute_work_hour_completion(
            rows,
            GroupBy::from_str(dimension)?,
            config,
        )),
        ReportKind::WorkHourLost => wrap(compute_work_hour_lost(
            rows,
            GroupBy::from_str(dimension)?,
            config,
        )),
        ReportKind::Leave => wrap(compute_leave_analysis(
            rows,
            GroupBy::from_str(dimension)?,
            config,
        )),
    };
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KpiError;

    #[test]
    fn invalid_dimensions_are_rejected_per_report() {
        let cfg = KpiConfig::default();
        assert!(matches!(
            run_report(ReportKind::OnTime, &[], "employee", &cfg),
            Err(KpiError::InvalidGroupBy(_))
        ));
        assert!(matches!(
            run_report(ReportKind::Od, &[], "company", &cfg),
            Err(KpiError::InvalidOdMode(_))
        ));
        assert!(run_report(ReportKind::Leave, &[], "location", &cfg).unwrap().is_empty());
        assert!(check_dimension(ReportKind::Od, "employee").is_ok());
        assert!(matches!(
            check_dimension(ReportKind::WorkHour, "employee"),
            Err(KpiError::InvalidGroupBy(_))
        ));
    }

    #[test]
    fn records_serialize_with_their_kind() {
        let rec = KpiRecord::OdFunction(OdFunctionRecord {
            month: "2024-05".into(),
            group: "CBL - Sales".into(),
            members: 3,
            od: 1,
        });
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["kind"], "od_function");
        assert_eq!(json["record"]["group"], "CBL - Sales");
        assert_eq!(rec.kind(), ReportKind::Od);
        let back: KpiRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, rec);
    }
}
