// Leave adjacency analysis.
//
// Sick and casual leave taken right next to a weekly off or a holiday is the
// pattern HR wants surfaced. Each employee's records are put on a timeline,
// working days (P, OD) are dropped from it, and consecutive calendar days are
// checked pairwise.
use super::fold::{collect_buckets_with, finish_buckets, Bucket, Fold, GroupKey, RowContext};
use crate::config::KpiConfig;
use crate::group::GroupBy;
use crate::types::{Flag, LeaveRecord, Row};
use crate::util::{parse_date, pct, DateTuple};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

#[derive(Default)]
pub struct LeaveAcc {
    count_a: u64,
    count_cl: u64,
    count_el: u64,
    count_od: u64,
    count_p: u64,
    count_sl: u64,
    count_whf: u64,
    absent_members: HashSet<String>,
    sl_adjacent_w: u64,
    cl_adjacent_w: u64,
    sl_adjacent_h: u64,
    cl_adjacent_h: u64,
}

impl LeaveAcc {
    fn workdays(&self) -> u64 {
        self.count_a
            + self.count_cl
            + self.count_el
            + self.count_od
            + self.count_p
            + self.count_sl
            + self.count_whf
    }

    /// Tally one adjacent pair. Order does not matter: SL then W and W then
    /// SL both count.
    fn record_pair(&mut self, a: Flag, b: Flag) {
        let is = |x: Flag, y: Flag| (a == x && b == y) || (a == y && b == x);
        if is(Flag::SickLeave, Flag::WeeklyOff) {
            self.sl_adjacent_w += 1;
        }
        if is(Flag::CasualLeave, Flag::WeeklyOff) {
            self.cl_adjacent_w += 1;
        }
        if is(Flag::SickLeave, Flag::Holiday) {
            self.sl_adjacent_h += 1;
        }
        if is(Flag::CasualLeave, Flag::Holiday) {
            self.cl_adjacent_h += 1;
        }
    }
}

/// One day on an employee's timeline.
#[derive(Debug, Clone)]
struct TimelineEntry {
    month: String,
    date: DateTuple,
    flag: Flag,
}

pub struct LeaveTally;

impl Fold for LeaveTally {
    type Acc = LeaveAcc;
    type Output = LeaveRecord;
    const NAME: &'static str = "leave";

    fn fold(&self, acc: &mut LeaveAcc, ctx: &RowContext<'_>) {
        match ctx.flag {
            Flag::Absent => {
                acc.count_a += 1;
                if let Some(m) = &ctx.member {
                    acc.absent_members.insert(m.clone());
                }
            }
            Flag::CasualLeave => acc.count_cl += 1,
            Flag::EarnedLeave => acc.count_el += 1,
            Flag::OnDuty => acc.count_od += 1,
            Flag::Present => acc.count_p += 1,
            Flag::SickLeave => acc.count_sl += 1,
            Flag::WorkFromHome => acc.count_whf += 1,
            _ => {}
        }
    }

    fn finish(&self, key: GroupKey, members: usize, acc: LeaveAcc) -> LeaveRecord {
        let workdays = acc.workdays();
        let total_a = acc.absent_members.len();
        LeaveRecord {
            month: key.month,
            group: key.group,
            members,
            total_sl: acc.count_sl,
            total_cl: acc.count_cl,
            workdays,
            total_a,
            sl_adjacent_w: acc.sl_adjacent_w,
            cl_adjacent_w: acc.cl_adjacent_w,
            sl_adjacent_h: acc.sl_adjacent_h,
            cl_adjacent_h: acc.cl_adjacent_h,
            sl_pct: pct((acc.sl_adjacent_w + acc.sl_adjacent_h) as f64, acc.count_sl as f64),
            cl_pct: pct(acc.cl_adjacent_w as f64, acc.count_cl as f64),
            a_pct: pct(total_a as f64, workdays as f64),
        }
    }
}

/// Scan one employee's date-sorted timeline and credit adjacent leave pairs
/// to the month of the earlier day.
fn tally_adjacency(
    group: &str,
    timeline: &[TimelineEntry],
    buckets: &mut BTreeMap<GroupKey, Bucket<LeaveAcc>>,
) {
    let off_days: Vec<&TimelineEntry> = timeline.iter().filter(|e| !e.flag.is_attending()).collect();
    for pair in off_days.windows(2) {
        let (curr, next) = (pair[0], pair[1]);
        if !curr.date.is_day_before(&next.date) {
            continue;
        }
        let key = GroupKey {
            month: curr.month.clone(),
            group: group.to_string(),
        };
        buckets
            .entry(key)
            .or_default()
            .acc
            .record_pair(curr.flag, next.flag);
    }
}

/// Leave occurrences, leave-next-to-off-day counts and absence share per
/// month and group.
pub fn compute_leave_analysis(
    rows: &[Row],
    group_by: GroupBy,
    config: &KpiConfig,
) -> Vec<LeaveRecord> {
    let date_col = &config.attendance.date;
    // (member, group) -> timeline, in input order until sorted below.
    let mut timelines: HashMap<(String, String), Vec<TimelineEntry>> = HashMap::new();

    let mut buckets = collect_buckets_with(rows, group_by, config, &LeaveTally, |ctx| {
        let Some(member) = &ctx.member else {
            return;
        };
        timelines
            .entry((member.clone(), ctx.key.group.clone()))
            .or_default()
            .push(TimelineEntry {
                month: ctx.key.month.clone(),
                date: parse_date(&ctx.row.text(date_col)),
                flag: ctx.flag,
            });
    });

    let employees = timelines.len();
    for ((_, group), mut timeline) in timelines {
        // Stable: same-day records keep their upload order.
        timeline.sort_by_key(|e| e.date);
        tally_adjacency(&group, &timeline, &mut buckets);
    }
    debug!(
        reducer = LeaveTally::NAME,
        %group_by,
        rows = rows.len(),
        employees,
        keys = buckets.len(),
        "leave timelines scanned"
    );
    finish_buckets(buckets, &LeaveTally)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(code: &str, date: &str, flag: &str) -> Row {
        Row::new()
            .with("Employee Code", code)
            .with("Attendance Date", date)
            .with("Job Location", "Plant")
            .with("Flag", flag)
    }

    fn analyse(rows: &[Row]) -> Vec<LeaveRecord> {
        compute_leave_analysis(rows, GroupBy::Location, &KpiConfig::default())
    }

    #[test]
    fn sick_leave_before_weekly_off_ignores_interleaved_present() {
        let rows = vec![
            day("E1", "05-Mar-2024", "SL"),
            day("E1", "05-Mar-2024", "P"),
            day("E1", "06-Mar-2024", "W"),
        ];
        let out = analyse(&rows);
        assert_eq!(out.len(), 1);
        let r = &out[0];
        assert_eq!(r.month, "2024-03");
        assert_eq!(r.sl_adjacent_w, 1);
        assert_eq!(r.total_sl, 1);
        assert_eq!(r.sl_pct, 100.0);
        assert_eq!(r.workdays, 2);
    }

    #[test]
    fn adjacency_is_order_independent_and_per_employee() {
        let rows = vec![
            day("E1", "2024-03-09", "W"),
            day("E1", "2024-03-10", "CL"),
            day("E1", "2024-03-11", "H"),
            // Different employee on the following day: not a pair.
            day("E2", "2024-03-12", "SL"),
        ];
        let r = &analyse(&rows)[0];
        assert_eq!(r.cl_adjacent_w, 1);
        assert_eq!(r.cl_adjacent_h, 1);
        assert_eq!(r.sl_adjacent_w + r.sl_adjacent_h, 0);
        assert_eq!(r.cl_pct, 100.0);
        assert_eq!(r.sl_pct, 0.0);
        assert_eq!(r.members, 2);
    }

    #[test]
    fn gap_days_break_adjacency() {
        let rows = vec![
            day("E1", "2024-03-05", "SL"),
            day("E1", "2024-03-06", "P"),
            day("E1", "2024-03-07", "W"),
        ];
        let r = &analyse(&rows)[0];
        assert_eq!(r.sl_adjacent_w, 0);
    }

    #[test]
    fn pairs_spanning_months_credit_the_earlier_month() {
        let rows = vec![
            day("E1", "30-Apr-2024", "CL"),
            day("E1", "01-May-2024", "H"),
        ];
        let out = analyse(&rows);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].month, "2024-04");
        assert_eq!(out[0].cl_adjacent_h, 1);
        assert_eq!(out[1].month, "2024-05");
        assert_eq!(out[1].cl_adjacent_h, 0);
    }

    #[test]
    fn month_boundary_does_not_know_month_lengths() {
        // Jan 30 and Feb 1 are two days apart but still paired.
        let rows = vec![
            day("E1", "2024-01-30", "SL"),
            day("E1", "2024-02-01", "W"),
        ];
        let out = analyse(&rows);
        assert_eq!(out[0].sl_adjacent_w, 1);
    }

    #[test]
    fn unparseable_dates_never_pair() {
        let rows = vec![day("E1", "someday", "SL"), day("E1", "later", "W")];
        let out = analyse(&rows);
        assert!(out.iter().all(|r| r.sl_adjacent_w == 0));
    }

    #[test]
    fn absence_share_uses_distinct_absent_members_over_workdays() {
        let rows = vec![
            day("E1", "2024-03-01", "A"),
            day("E1", "2024-03-02", "A"),
            day("E2", "2024-03-01", "P"),
            day("E2", "2024-03-02", "P"),
            day("E2", "2024-03-03", "W"),
            // No identity: still a workday, but no timeline and no member.
            day("", "2024-03-04", "P"),
        ];
        let r = &analyse(&rows)[0];
        assert_eq!(r.workdays, 5);
        assert_eq!(r.total_a, 1);
        assert_eq!(r.a_pct, 20.0);
        assert_eq!(r.members, 2);
    }

    #[test]
    fn single_record_employees_still_count() {
        let r = &analyse(&[day("E9", "2024-03-01", "SL")])[0];
        assert_eq!(r.total_sl, 1);
        assert_eq!(r.workdays, 1);
        assert_eq!(r.members, 1);
    }
}
