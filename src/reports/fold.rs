// Group-then-fold pipeline shared by the attendance reducers.
//
// Each reducer supplies an accumulator and two functions: how one row folds
// into it, and how a finished bucket turns into an output record. Month
// extraction, group resolution and distinct-member counting happen here, once.
use crate::config::KpiConfig;
use crate::group::{member_id, resolve_group, GroupBy};
use crate::types::{Flag, Row};
use crate::util::extract_month;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// `(month, group)`. Ordering is month first, then group, which is the order
/// every reducer reports in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub month: String,
    pub group: String,
}

/// Everything a reducer needs to know about one row, resolved once.
pub struct RowContext<'a> {
    pub row: &'a Row,
    pub config: &'a KpiConfig,
    pub key: GroupKey,
    pub member: Option<String>,
    pub flag: Flag,
}

impl<'a> RowContext<'a> {
    pub fn new(row: &'a Row, group_by: GroupBy, config: &'a KpiConfig) -> Self {
        let cols = &config.attendance;
        let key = GroupKey {
            month: extract_month(&row.text(&cols.date)),
            group: resolve_group(row, group_by, config),
        };
        Self {
            row,
            config,
            key,
            member: member_id(row, config),
            flag: Flag::parse(&row.text(&cols.flag)),
        }
    }

    pub fn column(&self, column: &str) -> String {
        self.row.trimmed(column)
    }
}

/// Per-key state: the distinct members seen plus the reducer's accumulator.
#[derive(Debug, Default)]
pub struct Bucket<A> {
    pub members: HashSet<String>,
    pub acc: A,
}

pub trait Fold {
    type Acc: Default;
    type Output;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Rows rejected here do not create a key or touch any tally.
    fn accepts(&self, _ctx: &RowContext<'_>) -> bool {
        true
    }

    fn fold(&self, acc: &mut Self::Acc, ctx: &RowContext<'_>);

    fn finish(&self, key: GroupKey, members: usize, acc: Self::Acc) -> Self::Output;
}

/// Fold all rows into per-key buckets without finishing them, for reducers
/// that need a second pass before producing output.
pub fn collect_buckets<F: Fold>(
    rows: &[Row],
    group_by: GroupBy,
    config: &KpiConfig,
    strategy: &F,
) -> BTreeMap<GroupKey, Bucket<F::Acc>> {
    collect_buckets_with(rows, group_by, config, strategy, |_| {})
}

/// [`collect_buckets`], also handing every accepted row to `visit`.
pub fn collect_buckets_with<F, V>(
    rows: &[Row],
    group_by: GroupBy,
    config: &KpiConfig,
    strategy: &F,
    mut visit: V,
) -> BTreeMap<GroupKey, Bucket<F::Acc>>
where
    F: Fold,
    V: FnMut(&RowContext<'_>),
{
    let mut buckets: BTreeMap<GroupKey, Bucket<F::Acc>> = BTreeMap::new();
    for row in rows {
        let ctx = RowContext::new(row, group_by, config);
        if !strategy.accepts(&ctx) {
            continue;
        }
        visit(&ctx);
        let bucket = buckets.entry(ctx.key.clone()).or_default();
        if let Some(m) = &ctx.member {
            bucket.members.insert(m.clone());
        }
        strategy.fold(&mut bucket.acc, &ctx);
    }
    buckets
}

pub fn finish_buckets<F: Fold>(
    buckets: BTreeMap<GroupKey, Bucket<F::Acc>>,
    strategy: &F,
) -> Vec<F::Output> {
    buckets
        .into_iter()
        .map(|(key, b)| strategy.finish(key, b.members.len(), b.acc))
        .collect()
}

/// Run a reducer over `rows`, one output per `(month, group)`, sorted.
pub fn group_fold<F: Fold>(
    rows: &[Row],
    group_by: GroupBy,
    config: &KpiConfig,
    strategy: &F,
) -> Vec<F::Output> {
    let buckets = collect_buckets(rows, group_by, config, strategy);
    debug!(
        reducer = F::NAME,
        %group_by,
        rows = rows.len(),
        keys = buckets.len(),
        "grouped rows"
    );
    finish_buckets(buckets, strategy)
}
