//! Attendance and Teams activity KPIs.
//!
//! Uploaded exports are kept as loosely typed [`types::Row`]s. The reducers in
//! [`reports`] fold them into per-month, per-group records; [`cache`] stores
//! those records per file and serves them back, and [`dashboard`] condenses
//! them into one payload. [`teams`] joins Teams activity to the roster.
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod group;
pub mod loader;
pub mod output;
pub mod reports;
pub mod teams;
pub mod types;
pub mod util;

pub use cache::{FileStamp, JsonFileStore, KpiService, KpiStore, MemoryStore, PrecomputedKpi};
pub use config::KpiConfig;
pub use dataset::{Dataset, FileKind, UploadedFile};
pub use error::{KpiError, Result};
pub use group::GroupBy;
pub use reports::{run_report, KpiRecord, KpiRow, ReportKind};
