use super::fold::{group_fold, Fold, GroupKey, RowContext};
use crate::config::KpiConfig;
use crate::group::GroupBy;
use crate::types::{Flag, Row, WorkHourRecord};
use crate::util::{duration_hours, pct, round2};

/// Scheduled and actual hours for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayHours {
    pub shift: f64,
    pub work: f64,
}

impl DayHours {
    pub fn of(ctx: &RowContext<'_>) -> Self {
        let cols = &ctx.config.attendance;
        DayHours {
            shift: duration_hours(&ctx.column(&cols.shift_in), &ctx.column(&cols.shift_out)),
            work: duration_hours(&ctx.column(&cols.in_time), &ctx.column(&cols.out_time)),
        }
    }
}

#[derive(Default)]
pub struct CompletionAcc {
    present: u64,
    od: u64,
    shift_hours: f64,
    work_hours: f64,
    completed: u64,
}

pub struct WorkHourCompletion;

impl Fold for WorkHourCompletion {
    type Acc = CompletionAcc;
    type Output = WorkHourRecord;
    const NAME: &'static str = "work_hour";

    fn fold(&self, acc: &mut CompletionAcc, ctx: &RowContext<'_>) {
        match ctx.flag {
            Flag::Present => acc.present += 1,
            Flag::OnDuty => acc.od += 1,
            _ => {}
        }
        let hours = DayHours::of(ctx);
        if hours.shift <= 0.0 {
            return;
        }
        acc.shift_hours += hours.shift;
        acc.work_hours += hours.work;
        if ctx.flag.is_attending() && hours.work >= hours.shift {
            acc.completed += 1;
        }
    }

    fn finish(&self, key: GroupKey, members: usize, acc: CompletionAcc) -> WorkHourRecord {
        let attended = acc.present + acc.od;
        WorkHourRecord {
            month: key.month,
            group: key.group,
            members,
            present: acc.present,
            od: acc.od,
            shift_hours: round2(acc.shift_hours),
            work_hours: round2(acc.work_hours),
            completed: acc.completed,
            completion_pct: pct(acc.completed as f64, attended as f64),
        }
    }
}

/// Share of attended days on which the full shift was worked.
pub fn compute_work_hour_completion(
    rows: &[Row],
    group_by: GroupBy,
    config: &KpiConfig,
) -> Vec<WorkHourRecord> {
    group_fold(rows, group_by, config, &WorkHourCompletion)
}
