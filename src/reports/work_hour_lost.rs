use super::fold::{group_fold, Fold, GroupKey, RowContext};
use super::work_hour::DayHours;
use crate::config::KpiConfig;
use crate::group::GroupBy;
use crate::types::{Flag, Row, WorkHourLostRecord};
use crate::util::{pct, round2};

/// Hours lost on one day, given its rounded shift and work hours.
///
/// Present, on-duty and blank-flag days lose whatever part of the shift was
/// not worked; with no punches at all the whole shift is lost. Leave, weekly
/// offs and holidays lose nothing.
pub fn lost_hours(flag: Flag, shift: f64, work: f64) -> f64 {
    let countable = matches!(flag, Flag::Present | Flag::OnDuty | Flag::Blank);
    if !countable {
        return 0.0;
    }
    if work > 0.0 {
        (shift - work).max(0.0)
    } else {
        shift
    }
}

#[derive(Default)]
pub struct LostAcc {
    present: u64,
    od: u64,
    shift_hours: f64,
    work_hours: f64,
    lost_hours: f64,
}

pub struct WorkHourLost;

impl Fold for WorkHourLost {
    type Acc = LostAcc;
    type Output = WorkHourLostRecord;
    const NAME: &'static str = "work_hour_lost";

    fn fold(&self, acc: &mut LostAcc, ctx: &RowContext<'_>) {
        match ctx.flag {
            Flag::Present => acc.present += 1,
            Flag::OnDuty => acc.od += 1,
            _ => {}
        }
        let hours = DayHours::of(ctx);
        if hours.shift <= 0.0 {
            return;
        }
        // Every intermediate value is rounded before it is summed; the
        // published figures depend on it.
        let shift = round2(hours.shift);
        let work = round2(hours.work);
        acc.shift_hours += shift;
        acc.work_hours += work;
        acc.lost_hours += round2(lost_hours(ctx.flag, shift, work));
    }

    fn finish(&self, key: GroupKey, members: usize, acc: LostAcc) -> WorkHourLostRecord {
        WorkHourLostRecord {
            month: key.month,
            group: key.group,
            members,
            present: acc.present,
            od: acc.od,
            shift_hours: round2(acc.shift_hours),
            work_hours: round2(acc.work_hours),
            lost: round2(acc.lost_hours),
            lost_pct: pct(acc.lost_hours, acc.shift_hours),
        }
    }
}

/// Scheduled hours not worked, per month and group.
pub fn compute_work_hour_lost(
    rows: &[Row],
    group_by: GroupBy,
    config: &KpiConfig,
) -> Vec<WorkHourLostRecord> {
    group_fold(rows, group_by, config, &WorkHourLost)
}
