use thiserror::Error;

/// Errors surfaced by the KPI engine.
///
/// Bad dates, times and empty denominators never end up here; those collapse
/// to sentinel values inside the reducers.
#[derive(Debug, Error)]
pub enum KpiError {
    #[error("invalid group_by '{0}': expected function, company or location")]
    InvalidGroupBy(String),

    #[error("invalid OD analysis mode '{0}': expected function or employee")]
    InvalidOdMode(String),

    #[error("unknown {kind} file id {id}")]
    UnknownFile { kind: &'static str, id: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KpiError>;
