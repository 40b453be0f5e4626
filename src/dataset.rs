// In-memory registry of uploaded files.
//
// Files are kept whole, with their header order, so that the reducers can be
// rerun on demand and a file can be dropped again by id.
use crate::error::{KpiError, Result};
use crate::types::Row;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Attendance,
    Teams,
    Roster,
    TeamsApp,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Attendance => "attendance",
            FileKind::Teams => "teams",
            FileKind::Roster => "roster",
            FileKind::TeamsApp => "teams_app",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Assigned by [`Dataset::insert`]; zero until then.
    pub id: u64,
    pub kind: FileKind,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub header_order: Vec<String>,
    /// SHA-256 of the row contents, set by [`Dataset::insert`].
    #[serde(default)]
    pub fingerprint: String,
    /// Reporting period of a Teams export, as typed in at upload.
    pub from_month: Option<String>,
    pub to_month: Option<String>,
    pub rows: Vec<Row>,
}

impl UploadedFile {
    pub fn new(kind: FileKind, filename: &str, header_order: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            id: 0,
            kind,
            filename: filename.to_string(),
            uploaded_at: Utc::now(),
            header_order,
            fingerprint: String::new(),
            from_month: None,
            to_month: None,
            rows,
        }
    }

    pub fn uploaded_at(mut self, at: DateTime<Utc>) -> Self {
        self.uploaded_at = at;
        self
    }

    pub fn with_period(mut self, from_month: Option<&str>, to_month: Option<&str>) -> Self {
        let clean = |m: Option<&str>| m.map(str::trim).filter(|m| !m.is_empty()).map(String::from);
        self.from_month = clean(from_month);
        self.to_month = clean(to_month);
        self
    }

    /// `"<from> to <to>"`, whichever side is present, or `N/A`.
    pub fn month_range(&self) -> String {
        match (&self.from_month, &self.to_month) {
            (Some(f), Some(t)) => format!("{} to {}", f, t),
            (Some(m), None) | (None, Some(m)) => m.clone(),
            (None, None) => "N/A".to_string(),
        }
    }
}

/// Hex SHA-256 over every cell of `rows`, in row order. Column order inside a
/// row does not matter, so the same export re-saved with shuffled columns
/// hashes the same.
pub fn content_fingerprint(rows: &[Row]) -> String {
    let mut hasher = Sha256::new();
    for row in rows {
        let mut cells: Vec<(&str, String)> =
            row.iter().map(|(k, v)| (k, v.render().into_owned())).collect();
        cells.sort_unstable();
        for (column, value) in cells {
            hasher.update(column.as_bytes());
            hasher.update(b"\x1f");
            hasher.update(value.as_bytes());
            hasher.update(b"\x1e");
        }
        hasher.update(b"\x1d");
    }
    hex::encode(hasher.finalize())
}

#[derive(Debug, Default)]
pub struct Dataset {
    next_id: u64,
    files: BTreeMap<u64, UploadedFile>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file under the next free id and return it. Ids are never
    /// reused.
    pub fn insert(&mut self, file: UploadedFile) -> u64 {
        let id = self.next_id + 1;
        self.insert_as(file, id)
    }

    /// Register a file under an id chosen by the caller, typically one a KPI
    /// store already holds rows for. A file already at `id` is replaced.
    pub fn insert_as(&mut self, mut file: UploadedFile, id: u64) -> u64 {
        file.id = id;
        file.fingerprint = content_fingerprint(&file.rows);
        self.next_id = self.next_id.max(id);
        info!(
            file_id = id,
            kind = %file.kind,
            filename = %file.filename,
            rows = file.rows.len(),
            "file registered"
        );
        self.files.insert(id, file);
        id
    }

    /// Make sure ids handed out by [`Dataset::insert`] start above `id`.
    pub fn reserve_through(&mut self, id: u64) {
        self.next_id = self.next_id.max(id);
    }

    pub fn get(&self, id: u64) -> Option<&UploadedFile> {
        self.files.get(&id)
    }

    pub fn remove(&mut self, id: u64) -> Option<UploadedFile> {
        let removed = self.files.remove(&id);
        if let Some(file) = &removed {
            info!(file_id = id, kind = %file.kind, "file removed");
        }
        removed
    }

    /// Files of one kind, newest upload first; ties go to the higher id.
    pub fn files(&self, kind: FileKind) -> Vec<&UploadedFile> {
        let mut out: Vec<&UploadedFile> = self.files.values().filter(|f| f.kind == kind).collect();
        out.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));
        out
    }

    pub fn newest(&self, kind: FileKind) -> Option<&UploadedFile> {
        self.files(kind).into_iter().next()
    }

    /// One file when `id` is given, else every file of `kind`, newest first.
    /// An id that does not name a file of that kind is an error.
    pub fn select(&self, kind: FileKind, id: Option<u64>) -> Result<Vec<&UploadedFile>> {
        match id {
            Some(id) => match self.files.get(&id) {
                Some(f) if f.kind == kind => Ok(vec![f]),
                _ => Err(KpiError::UnknownFile {
                    kind: kind.as_str(),
                    id,
                }),
            },
            None => Ok(self.files(kind)),
        }
    }

    /// Rows of every file of `kind`, in upload (id) order.
    pub fn rows(&self, kind: FileKind) -> Vec<Row> {
        self.files
            .values()
            .filter(|f| f.kind == kind)
            .flat_map(|f| f.rows.iter().cloned())
            .collect()
    }

    pub fn ids(&self, kind: FileKind) -> Vec<u64> {
        self.files
            .values()
            .filter(|f| f.kind == kind)
            .map(|f| f.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
