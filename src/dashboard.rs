use crate::config::KpiConfig;
use crate::group::GroupBy;
use crate::reports::{
    compute_leave_analysis, compute_on_time, compute_work_hour_completion, compute_work_hour_lost,
};
use crate::types::{LeaveRecord, OnTimeRecord, Row, WorkHourLostRecord, WorkHourRecord};
use crate::util::round2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outputs of the four attendance reducers for one dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardInputs {
    pub on_time: Vec<OnTimeRecord>,
    pub work_hour: Vec<WorkHourRecord>,
    pub work_hour_lost: Vec<WorkHourLostRecord>,
    pub leave: Vec<LeaveRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_members: usize,
    pub avg_on_time: f64,
    pub avg_completion: f64,
    pub avg_lost: f64,
    pub latest_month: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSeries {
    pub on_time: Vec<OnTimeRecord>,
    pub work_hour: Vec<WorkHourRecord>,
    pub work_hour_lost: Vec<WorkHourLostRecord>,
    pub leave_analysis: Vec<LeaveRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub summary: SummaryStats,
    pub groups: Vec<String>,
    pub months: Vec<String>,
    pub data_by_group: BTreeMap<String, GroupSeries>,
}

/// Member-weighted mean of `metric` over the records of `month`; 0 when the
/// month has no members.
fn weighted_avg<T>(
    records: &[T],
    month: &str,
    parts: impl Fn(&T) -> (&str, usize, f64),
) -> f64 {
    let (sum, members) = records
        .iter()
        .map(&parts)
        .filter(|(m, _, _)| *m == month)
        .fold((0.0, 0usize), |(sum, n), (_, members, metric)| {
            (sum + metric * members as f64, n + members)
        });
    if members == 0 {
        return 0.0;
    }
    round2(sum / members as f64)
}

/// Fold reducer outputs into the dashboard payload.
pub fn compose(inputs: DashboardInputs) -> DashboardSummary {
    let DashboardInputs {
        on_time,
        work_hour,
        work_hour_lost,
        leave,
    } = inputs;

    let mut groups: BTreeSet<String> = BTreeSet::new();
    let mut months: BTreeSet<String> = BTreeSet::new();
    {
        let mut note = |month: &str, group: &str| {
            groups.insert(group.to_string());
            if !month.is_empty() {
                months.insert(month.to_string());
            }
        };
        on_time.iter().for_each(|r| note(&r.month, &r.group));
        work_hour.iter().for_each(|r| note(&r.month, &r.group));
        work_hour_lost.iter().for_each(|r| note(&r.month, &r.group));
        leave.iter().for_each(|r| note(&r.month, &r.group));
    }

    let latest_month = months.iter().next_back().cloned();
    let summary = match &latest_month {
        Some(latest) => SummaryStats {
            total_members: on_time
                .iter()
                .filter(|r| &r.month == latest)
                .map(|r| r.members)
                .sum(),
            avg_on_time: weighted_avg(&on_time, latest, |r| {
                (r.month.as_str(), r.members, r.on_time_pct)
            }),
            avg_completion: weighted_avg(&work_hour, latest, |r| {
                (r.month.as_str(), r.members, r.completion_pct)
            }),
            avg_lost: weighted_avg(&work_hour_lost, latest, |r| {
                (r.month.as_str(), r.members, r.lost_pct)
            }),
            latest_month: Some(latest.clone()),
        },
        None => SummaryStats {
            total_members: 0,
            avg_on_time: 0.0,
            avg_completion: 0.0,
            avg_lost: 0.0,
            latest_month: None,
        },
    };

    let mut data_by_group: BTreeMap<String, GroupSeries> = groups
        .iter()
        .map(|g| (g.clone(), GroupSeries::default()))
        .collect();
    for r in on_time {
        data_by_group.entry(r.group.clone()).or_default().on_time.push(r);
    }
    for r in work_hour {
        data_by_group.entry(r.group.clone()).or_default().work_hour.push(r);
    }
    for r in work_hour_lost {
        data_by_group.entry(r.group.clone()).or_default().work_hour_lost.push(r);
    }
    for r in leave {
        data_by_group.entry(r.group.clone()).or_default().leave_analysis.push(r);
    }

    DashboardSummary {
        summary,
        groups: groups.into_iter().collect(),
        months: months.into_iter().collect(),
        data_by_group,
    }
}

/// Run the four attendance reducers over `rows` and compose the dashboard.
pub fn compute_dashboard(rows: &[Row], group_by: GroupBy, config: &KpiConfig) -> DashboardSummary {
    compose(DashboardInputs {
        on_time: compute_on_time(rows, group_by, config),
        work_hour: compute_work_hour_completion(rows, group_by, config),
        work_hour_lost: compute_work_hour_lost(rows, group_by, config),
        leave: compute_leave_analysis(rows, group_by, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_time(month: &str, group: &str, members: usize, pct: f64) -> OnTimeRecord {
        OnTimeRecord {
            month: month.into(),
            group: group.into(),
            members,
            present: 0,
            late: 0,
            on_time: 0,
            on_time_pct: pct,
        }
    }

    #[test]
    fn latest_month_average_is_member_weighted() {
        let inputs = DashboardInputs {
            on_time: vec![
                on_time("2024-04", "Sales", 500, 10.0),
                on_time("2024-05", "Sales", 50, 100.0),
                on_time("2024-05", "Finance", 50, 0.0),
                on_time("", "Orphans", 3, 0.0),
            ],
            ..Default::default()
        };
        let d = compose(inputs);
        assert_eq!(d.summary.latest_month.as_deref(), Some("2024-05"));
        assert_eq!(d.summary.avg_on_time, 50.0);
        assert_eq!(d.summary.total_members, 100);
        assert_eq!(d.summary.avg_completion, 0.0);
        assert_eq!(d.months, ["2024-04", "2024-05"]);
        assert_eq!(d.groups, ["Finance", "Orphans", "Sales"]);
        assert_eq!(d.data_by_group["Sales"].on_time.len(), 2);
        assert!(d.data_by_group["Finance"].leave_analysis.is_empty());
    }

    #[test]
    fn empty_inputs_give_empty_dashboard() {
        let d = compose(DashboardInputs::default());
        assert_eq!(d.summary.latest_month, None);
        assert_eq!(d.summary.total_members, 0);
        assert!(d.groups.is_empty());
        assert!(d.data_by_group.is_empty());
    }

    #[test]
    fn computed_from_rows() {
        let row = |code: &str, flag: &str| {
            Row::new()
                .with("Employee Code", code)
                .with("Attendance Date", "2024-05-02")
                .with("Job Location", "Plant")
                .with("Flag", flag)
                .with("Is Late", "No")
        };
        let rows = vec![row("E1", "P"), row("E2", "P"), row("E3", "A")];
        let d = compute_dashboard(&rows, GroupBy::Location, &KpiConfig::default());
        assert_eq!(d.groups, ["Plant"]);
        assert_eq!(d.summary.total_members, 3);
        assert_eq!(d.summary.avg_on_time, 100.0);
        let series = &d.data_by_group["Plant"];
        assert_eq!(series.work_hour.len(), 1);
        assert_eq!(series.leave_analysis[0].total_a, 1);
    }
}
