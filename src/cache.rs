// Precomputed KPI rows and the service that reads through them.
//
// Every reducer output for every dimension is computed once per attendance
// file and stored keyed by file id, so reads do not re-scan uploads. Writes
// for a file are all-or-nothing: the file's rows are replaced as a set.
//
// The store also records which file each id belongs to (name and content
// fingerprint). A store outlives the process that filled it, so reads only
// trust it for files whose fingerprint still matches.
use crate::config::KpiConfig;
use crate::dashboard::{compose, DashboardInputs, DashboardSummary};
use crate::dataset::{content_fingerprint, Dataset, FileKind, UploadedFile};
use crate::error::{KpiError, Result};
use crate::group::GroupBy;
use crate::output::write_json;
use crate::reports::{check_dimension, run_report, KpiRecord, KpiRow, ReportKind};
use crate::types::{LeaveRecord, OnTimeRecord, Row, WorkHourLostRecord, WorkHourRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// One cached reducer output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedKpi {
    pub file_id: u64,
    /// Dimension the row was computed for, e.g. `company` or `employee`.
    pub group_by: String,
    pub record: KpiRecord,
}

impl PrecomputedKpi {
    pub fn kind(&self) -> ReportKind {
        self.record.kind()
    }
}

/// Which upload a block of cached rows came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStamp {
    pub file_id: u64,
    pub filename: String,
    pub fingerprint: String,
}

impl FileStamp {
    pub fn of(file: &UploadedFile) -> Self {
        Self {
            file_id: file.id,
            filename: file.filename.clone(),
            fingerprint: file.fingerprint.clone(),
        }
    }
}

pub trait KpiStore {
    /// Replace every cached row of `stamp.file_id` with `rows`.
    fn upsert_for_file(&mut self, stamp: &FileStamp, rows: Vec<PrecomputedKpi>) -> Result<()>;

    fn delete_for_file(&mut self, file_id: u64) -> Result<()>;

    /// Cached rows of one reducer and dimension, across all files in file id
    /// order.
    fn read(&self, kind: ReportKind, group_by: &str) -> Result<Vec<PrecomputedKpi>>;

    /// Every file the store holds rows for, in file id order.
    fn files(&self) -> Result<Vec<FileStamp>>;

    fn clear(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CachedFile {
    filename: String,
    fingerprint: String,
    rows: Vec<PrecomputedKpi>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    by_file: BTreeMap<u64, CachedFile>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_ids(&self) -> Vec<u64> {
        self.by_file.keys().copied().collect()
    }

    pub fn rows_for_file(&self, file_id: u64) -> &[PrecomputedKpi] {
        self.by_file
            .get(&file_id)
            .map(|f| f.rows.as_slice())
            .unwrap_or(&[])
    }
}

impl KpiStore for MemoryStore {
    fn upsert_for_file(&mut self, stamp: &FileStamp, rows: Vec<PrecomputedKpi>) -> Result<()> {
        self.by_file.insert(
            stamp.file_id,
            CachedFile {
                filename: stamp.filename.clone(),
                fingerprint: stamp.fingerprint.clone(),
                rows,
            },
        );
        Ok(())
    }

    fn delete_for_file(&mut self, file_id: u64) -> Result<()> {
        self.by_file.remove(&file_id);
        Ok(())
    }

    fn read(&self, kind: ReportKind, group_by: &str) -> Result<Vec<PrecomputedKpi>> {
        Ok(self
            .by_file
            .values()
            .flat_map(|f| f.rows.iter())
            .filter(|r| r.kind() == kind && r.group_by == group_by)
            .cloned()
            .collect())
    }

    fn files(&self) -> Result<Vec<FileStamp>> {
        Ok(self
            .by_file
            .iter()
            .map(|(id, f)| FileStamp {
                file_id: *id,
                filename: f.filename.clone(),
                fingerprint: f.fingerprint.clone(),
            })
            .collect())
    }

    fn clear(&mut self) -> Result<()> {
        self.by_file.clear();
        Ok(())
    }
}

/// [`MemoryStore`] persisted as a pretty-printed JSON snapshot, rewritten on
/// every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the snapshot at `path`; a missing file starts an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            MemoryStore::new()
        };
        info!(path = %path.display(), files = inner.by_file.len(), "KPI store opened");
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_ids(&self) -> Vec<u64> {
        self.inner.file_ids()
    }

    fn flush(&self) -> Result<()> {
        write_json(&self.path, &self.inner)
    }
}

impl KpiStore for JsonFileStore {
    fn upsert_for_file(&mut self, stamp: &FileStamp, rows: Vec<PrecomputedKpi>) -> Result<()> {
        self.inner.upsert_for_file(stamp, rows)?;
        self.flush()
    }

    fn delete_for_file(&mut self, file_id: u64) -> Result<()> {
        self.inner.delete_for_file(file_id)?;
        self.flush()
    }

    fn read(&self, kind: ReportKind, group_by: &str) -> Result<Vec<PrecomputedKpi>> {
        self.inner.read(kind, group_by)
    }

    fn files(&self) -> Result<Vec<FileStamp>> {
        self.inner.files()
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear()?;
        self.flush()
    }
}

/// Every reducer over one file's rows, for every dimension it supports.
pub fn precompute_file(file_id: u64, rows: &[Row], config: &KpiConfig) -> Result<Vec<PrecomputedKpi>> {
    let mut out = Vec::new();
    for kind in ReportKind::ALL {
        for dimension in kind.dimensions() {
            let records = run_report(kind, rows, dimension, config)?;
            out.extend(records.into_iter().map(|record| PrecomputedKpi {
                file_id,
                group_by: dimension.to_string(),
                record,
            }));
        }
    }
    Ok(out)
}

/// Precompute one attendance file and replace its cached rows. Returns the
/// number of rows stored.
pub fn precompute_and_store<S: KpiStore + ?Sized>(
    file: &UploadedFile,
    store: &mut S,
    config: &KpiConfig,
) -> Result<usize> {
    let rows = precompute_file(file.id, &file.rows, config)?;
    let n = rows.len();
    store.upsert_for_file(&FileStamp::of(file), rows)?;
    info!(file_id = file.id, filename = %file.filename, rows = n, "KPIs precomputed");
    Ok(n)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: Vec<u64>,
}

/// FIFO of attendance file ids waiting to be precomputed.
#[derive(Debug, Default)]
pub struct PrecomputeQueue {
    pending: VecDeque<u64>,
}

impl PrecomputeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, file_id: u64) {
        debug!(file_id, "precompute queued");
        self.pending.push_back(file_id);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run every queued job in order. A failed job is logged and does not
    /// stop the rest.
    pub fn drain<S: KpiStore + ?Sized>(
        &mut self,
        dataset: &Dataset,
        store: &mut S,
        config: &KpiConfig,
    ) -> DrainSummary {
        let mut summary = DrainSummary::default();
        while let Some(file_id) = self.pending.pop_front() {
            summary.attempted += 1;
            let result = match dataset.get(file_id) {
                Some(file) if file.kind == FileKind::Attendance => {
                    precompute_and_store(file, store, config)
                }
                _ => Err(KpiError::UnknownFile {
                    kind: FileKind::Attendance.as_str(),
                    id: file_id,
                }),
            };
            match result {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    error!(file_id, error = %e, "precompute failed");
                    summary.failed.push(file_id);
                }
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RebuildSummary {
    pub total_files: usize,
    pub calculated: usize,
}

/// Drop the whole cache and precompute every attendance file again.
pub fn rebuild_all<S: KpiStore + ?Sized>(
    dataset: &Dataset,
    store: &mut S,
    config: &KpiConfig,
) -> Result<RebuildSummary> {
    store.clear()?;
    let files = dataset.files(FileKind::Attendance);
    let mut summary = RebuildSummary {
        total_files: files.len(),
        calculated: 0,
    };
    for file in files {
        match precompute_and_store(file, store, config) {
            Ok(_) => summary.calculated += 1,
            Err(e) => error!(file_id = file.id, error = %e, "rebuild skipped file"),
        }
    }
    info!(
        total_files = summary.total_files,
        calculated = summary.calculated,
        "KPI cache rebuilt"
    );
    Ok(summary)
}

/// Uploaded files plus their KPI cache.
///
/// Reads use cached rows only when the store holds every loaded attendance
/// file under its id with a matching fingerprint. Otherwise the reducer runs
/// over the loaded attendance rows.
pub struct KpiService<S: KpiStore> {
    config: KpiConfig,
    dataset: Dataset,
    store: S,
    queue: PrecomputeQueue,
}

impl<S: KpiStore> KpiService<S> {
    pub fn new(config: KpiConfig, store: S) -> Self {
        Self {
            config,
            dataset: Dataset::new(),
            store,
            queue: PrecomputeQueue::new(),
        }
    }

    pub fn config(&self) -> &KpiConfig {
        &self.config
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a file. Attendance files are queued for precomputation; run
    /// [`KpiService::run_pending`] to process the queue.
    pub fn ingest(&mut self, file: UploadedFile) -> Result<u64> {
        let kind = file.kind;
        let id = self.register(file)?;
        if kind == FileKind::Attendance {
            self.queue.enqueue(id);
        }
        Ok(id)
    }

    /// Register a file without queueing any precomputation, for files whose
    /// KPIs are already in the store.
    pub fn attach(&mut self, file: UploadedFile) -> Result<u64> {
        self.register(file)
    }

    /// An attendance file whose content the store already holds gets that
    /// entry's id back. Any other file gets an id above every stored one, so
    /// it can never overwrite rows it does not own.
    fn register(&mut self, file: UploadedFile) -> Result<u64> {
        let stamps = self.store.files()?;
        if let Some(max) = stamps.iter().map(|s| s.file_id).max() {
            self.dataset.reserve_through(max);
        }
        if file.kind == FileKind::Attendance {
            let fingerprint = content_fingerprint(&file.rows);
            let known = stamps
                .iter()
                .find(|s| s.fingerprint == fingerprint && self.dataset.get(s.file_id).is_none());
            if let Some(stamp) = known {
                debug!(file_id = stamp.file_id, filename = %file.filename, "matched stored KPIs");
                return Ok(self.dataset.insert_as(file, stamp.file_id));
            }
        }
        Ok(self.dataset.insert(file))
    }

    /// Ids of the loaded attendance files when the store covers all of them.
    fn covered_ids(&self) -> Result<Option<BTreeSet<u64>>> {
        let files = self.dataset.files(FileKind::Attendance);
        if files.is_empty() {
            return Ok(None);
        }
        let stamps: BTreeMap<u64, String> = self
            .store
            .files()?
            .into_iter()
            .map(|s| (s.file_id, s.fingerprint))
            .collect();
        let covered = files
            .iter()
            .all(|f| stamps.get(&f.id).is_some_and(|fp| *fp == f.fingerprint));
        Ok(covered.then(|| files.iter().map(|f| f.id).collect()))
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn run_pending(&mut self) -> DrainSummary {
        self.queue.drain(&self.dataset, &mut self.store, &self.config)
    }

    /// Remove a file and its cached rows. Returns false when no such file
    /// existed.
    pub fn delete_file(&mut self, file_id: u64) -> Result<bool> {
        let Some(file) = self.dataset.remove(file_id) else {
            return Ok(false);
        };
        if file.kind == FileKind::Attendance {
            self.store.delete_for_file(file_id)?;
        }
        Ok(true)
    }

    pub fn rebuild_all(&mut self) -> Result<RebuildSummary> {
        rebuild_all(&self.dataset, &mut self.store, &self.config)
    }

    /// Records of one reducer for one dimension.
    pub fn report(&self, kind: ReportKind, dimension: &str) -> Result<Vec<KpiRecord>> {
        check_dimension(kind, dimension)?;
        if let Some(ids) = self.covered_ids()? {
            let cached: Vec<KpiRecord> = self
                .store
                .read(kind, dimension)?
                .into_iter()
                .filter(|r| ids.contains(&r.file_id))
                .map(|r| r.record)
                .collect();
            debug!(%kind, dimension, rows = cached.len(), "served from cache");
            return Ok(cached);
        }
        let rows = self.dataset.rows(FileKind::Attendance);
        if !rows.is_empty() {
            warn!(%kind, dimension, "cache does not cover the loaded files, computing on the fly");
        }
        run_report(kind, &rows, dimension, &self.config)
    }

    /// [`KpiService::report`], narrowed to one record type.
    pub fn records<T: KpiRow>(&self, dimension: &str) -> Result<Vec<T>> {
        Ok(self
            .report(T::KIND, dimension)?
            .into_iter()
            .filter_map(T::from_record)
            .collect())
    }

    pub fn dashboard(&self, group_by: GroupBy) -> Result<DashboardSummary> {
        let dim = group_by.as_str();
        Ok(compose(DashboardInputs {
            on_time: self.records::<OnTimeRecord>(dim)?,
            work_hour: self.records::<WorkHourRecord>(dim)?,
            work_hour_lost: self.records::<WorkHourLostRecord>(dim)?,
            leave: self.records::<LeaveRecord>(dim)?,
        }))
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::compute_on_time;
    use crate::types::OdEmployeeRecord;

    fn attendance(codes: &[(&str, &str)]) -> UploadedFile {
        attendance_on("2024-05-02", codes)
    }

    fn attendance_on(date: &str, codes: &[(&str, &str)]) -> UploadedFile {
        let rows = codes
            .iter()
            .map(|(code, flag)| {
                Row::new()
                    .with("Employee Code", *code)
                    .with("Name", *code)
                    .with("Attendance Date", date)
                    .with("Comapny Name", "Confidence Batteries Limited")
                    .with("Function Name", "Sales")
                    .with("Job Location", "Dhaka")
                    .with("Flag", *flag)
                    .with("Is Late", "No")
            })
            .collect();
        UploadedFile::new(FileKind::Attendance, "att.csv", vec![], rows)
    }

    /// Fails every write for one file id.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        poisoned: u64,
    }

    impl KpiStore for FlakyStore {
        fn upsert_for_file(&mut self, stamp: &FileStamp, rows: Vec<PrecomputedKpi>) -> Result<()> {
            if stamp.file_id == self.poisoned {
                return Err(KpiError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.inner.upsert_for_file(stamp, rows)
        }

        fn delete_for_file(&mut self, file_id: u64) -> Result<()> {
            self.inner.delete_for_file(file_id)
        }

        fn read(&self, kind: ReportKind, group_by: &str) -> Result<Vec<PrecomputedKpi>> {
            self.inner.read(kind, group_by)
        }

        fn files(&self) -> Result<Vec<FileStamp>> {
            self.inner.files()
        }

        fn clear(&mut self) -> Result<()> {
            self.inner.clear()
        }
    }

    #[test]
    fn cached_rows_match_the_reducer() {
        let cfg = KpiConfig::default();
        let file = attendance(&[("E1", "P"), ("E2", "P"), ("E3", "OD")]);
        let mut svc = KpiService::new(cfg.clone(), MemoryStore::new());
        let id = svc.ingest(file.clone()).unwrap();
        assert_eq!(svc.pending(), 1);
        let drained = svc.run_pending();
        assert_eq!(drained.succeeded, 1);

        let cached: Vec<OnTimeRecord> = svc.records("function").unwrap();
        assert_eq!(cached, compute_on_time(&file.rows, GroupBy::Function, &cfg));
        assert_eq!(cached[0].group, "CBL - Sales");

        let od: Vec<OdEmployeeRecord> = svc.records("employee").unwrap();
        assert_eq!(od.len(), 1);
        assert_eq!(od[0].employee_name, "E3");

        // 4 reducers x 3 dimensions + OD x 2, one key each.
        assert_eq!(svc.store().rows_for_file(id).len(), 14);
    }

    #[test]
    fn upsert_replaces_and_delete_cascades() {
        let cfg = KpiConfig::default();
        let mut svc = KpiService::new(cfg, MemoryStore::new());
        let id = svc.ingest(attendance(&[("E1", "P")])).unwrap();
        svc.run_pending();
        let before = svc.store().rows_for_file(id).to_vec();
        // Re-running the same job leaves the same rows, not twice as many.
        assert_eq!(svc.rebuild_all().unwrap().calculated, 1);
        assert_eq!(svc.store().rows_for_file(id), before.as_slice());

        assert!(svc.delete_file(id).unwrap());
        assert!(svc.store().file_ids().is_empty());
        assert!(!svc.delete_file(id).unwrap());
        assert!(svc.report(ReportKind::OnTime, "company").unwrap().is_empty());
    }

    #[test]
    fn falls_back_to_reducers_when_nothing_is_cached() {
        let mut svc = KpiService::new(KpiConfig::default(), MemoryStore::new());
        svc.attach(attendance(&[("E1", "P"), ("E2", "A")])).unwrap();
        let out = svc.records::<LeaveRecord>("location").unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].group, "Dhaka");
        assert_eq!(out[0].total_a, 1);
        assert!(matches!(
            svc.report(ReportKind::OnTime, "region"),
            Err(KpiError::InvalidGroupBy(_))
        ));
    }

    #[test]
    fn rebuild_continues_past_a_failing_file() {
        let cfg = KpiConfig::default();
        let mut ds = Dataset::new();
        let a = ds.insert(attendance(&[("E1", "P")]));
        let b = ds.insert(attendance(&[("E2", "P")]));
        ds.insert(UploadedFile::new(FileKind::Roster, "r.csv", vec![], vec![]));
        let mut store = FlakyStore {
            poisoned: a,
            ..Default::default()
        };
        let summary = rebuild_all(&ds, &mut store, &cfg).unwrap();
        assert_eq!(
            summary,
            RebuildSummary {
                total_files: 2,
                calculated: 1
            }
        );
        assert_eq!(store.inner.file_ids(), vec![b]);
    }

    #[test]
    fn queue_reports_missing_files() {
        let cfg = KpiConfig::default();
        let ds = Dataset::new();
        let mut store = MemoryStore::new();
        let mut q = PrecomputeQueue::new();
        q.enqueue(42);
        let s = q.drain(&ds, &mut store, &cfg);
        assert_eq!(s.attempted, 1);
        assert_eq!(s.failed, vec![42]);
        assert!(q.is_empty());
    }

    #[test]
    fn json_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpi.json");
        let cfg = KpiConfig::default();
        let mut file = attendance(&[("E1", "P")]);
        file.id = 7;
        file.fingerprint = content_fingerprint(&file.rows);
        {
            let mut store = JsonFileStore::open(&path).unwrap();
            let rows = precompute_file(7, &file.rows, &cfg).unwrap();
            store.upsert_for_file(&FileStamp::of(&file), rows).unwrap();
        }
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.file_ids(), vec![7]);
        assert_eq!(store.files().unwrap(), vec![FileStamp::of(&file)]);
        let od = store.read(ReportKind::Od, "function").unwrap();
        assert_eq!(od.len(), 1);
        assert_eq!(od[0].file_id, 7);
        assert!(matches!(od[0].record, KpiRecord::OdFunction(_)));
    }

    #[test]
    fn separate_precomputes_share_one_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpi.json");
        let cfg = KpiConfig::default();
        let may = attendance_on("2024-05-02", &[("E1", "P")]);
        let june = attendance_on("2024-06-03", &[("E2", "P"), ("E3", "P")]);

        let mut first = KpiService::new(cfg.clone(), JsonFileStore::open(&path).unwrap());
        assert_eq!(first.ingest(may.clone()).unwrap(), 1);
        assert_eq!(first.run_pending().succeeded, 1);

        let mut second = KpiService::new(cfg.clone(), JsonFileStore::open(&path).unwrap());
        assert_eq!(second.ingest(june.clone()).unwrap(), 2);
        assert_eq!(second.run_pending().succeeded, 1);
        assert_eq!(second.store().file_ids(), vec![1, 2]);

        let mut reader = KpiService::new(cfg.clone(), JsonFileStore::open(&path).unwrap());
        assert_eq!(reader.attach(june.clone()).unwrap(), 2);
        assert_eq!(reader.attach(may.clone()).unwrap(), 1);
        let months: Vec<String> = reader
            .records::<OnTimeRecord>("company")
            .unwrap()
            .into_iter()
            .map(|r| r.month)
            .collect();
        assert_eq!(months, ["2024-05", "2024-06"]);
    }

    #[test]
    fn stale_snapshot_falls_back_to_the_loaded_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpi.json");
        let cfg = KpiConfig::default();
        let may = attendance_on("2024-05-02", &[("E1", "P")]);
        let june = attendance_on("2024-06-03", &[("E2", "P"), ("E3", "A")]);

        let mut writer = KpiService::new(cfg.clone(), JsonFileStore::open(&path).unwrap());
        writer.ingest(may).unwrap();
        writer.run_pending();

        let mut reader = KpiService::new(cfg.clone(), JsonFileStore::open(&path).unwrap());
        // Not in the snapshot, so it must not take the May file's id.
        assert_eq!(reader.attach(june.clone()).unwrap(), 2);
        let out: Vec<OnTimeRecord> = reader.records("location").unwrap();
        assert_eq!(out, compute_on_time(&june.rows, GroupBy::Location, &cfg));
        assert_eq!(out[0].month, "2024-06");
        assert!(matches!(
            reader.report(ReportKind::OnTime, "region"),
            Err(KpiError::InvalidGroupBy(_))
        ));
    }

    #[test]
    fn edited_file_is_not_served_from_an_old_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kpi.json");
        let cfg = KpiConfig::default();

        let mut writer = KpiService::new(cfg.clone(), JsonFileStore::open(&path).unwrap());
        writer.ingest(attendance(&[("E1", "P")])).unwrap();
        writer.run_pending();

        let edited = attendance(&[("E1", "P"), ("E2", "P")]);
        let mut reader = KpiService::new(cfg.clone(), JsonFileStore::open(&path).unwrap());
        reader.attach(edited.clone()).unwrap();
        let out: Vec<OnTimeRecord> = reader.records("company").unwrap();
        assert_eq!(out[0].present, 2);
    }
}
