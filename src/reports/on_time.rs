use super::fold::{group_fold, Fold, GroupKey, RowContext};
use crate::config::KpiConfig;
use crate::group::GroupBy;
use crate::types::{Flag, OnTimeRecord, Row};
use crate::util::pct;

#[derive(Default)]
pub struct OnTimeAcc {
    present: u64,
    late: u64,
}

pub struct OnTime;

impl Fold for OnTime {
    type Acc = OnTimeAcc;
    type Output = OnTimeRecord;
    const NAME: &'static str = "on_time";

    fn fold(&self, acc: &mut OnTimeAcc, ctx: &RowContext<'_>) {
        if ctx.flag != Flag::Present {
            return;
        }
        acc.present += 1;
        if ctx.row.is_true(&ctx.config.attendance.is_late) {
            acc.late += 1;
        }
    }

    fn finish(&self, key: GroupKey, members: usize, acc: OnTimeAcc) -> OnTimeRecord {
        let on_time = acc.present.saturating_sub(acc.late);
        OnTimeRecord {
            month: key.month,
            group: key.group,
            members,
            present: acc.present,
            late: acc.late,
            on_time,
            on_time_pct: pct(on_time as f64, acc.present as f64),
        }
    }
}

/// Present days and how many of them started on time, per month and group.
pub fn compute_on_time(rows: &[Row], group_by: GroupBy, config: &KpiConfig) -> Vec<OnTimeRecord> {
    group_fold(rows, group_by, config, &OnTime)
}
