use crate::dataset::{FileKind, UploadedFile};
use crate::error::Result;
use crate::types::Row;
use csv::{ByteRecord, ReaderBuilder};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Rows with fewer cells than the header; the missing cells read as "".
    pub short_rows: usize,
    /// Rows with more cells than the header; the extras are dropped.
    pub long_rows: usize,
}

#[derive(Debug, Clone)]
pub struct LoadedCsv {
    pub header_order: Vec<String>,
    pub rows: Vec<Row>,
    pub report: LoadReport,
}

fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).trim_start_matches('\u{feff}').to_string()
}

/// Read a headed CSV into text rows. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn load_reader<R: Read>(reader: R) -> Result<LoadedCsv> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let header_order: Vec<String> = rdr.byte_headers()?.iter().map(decode).collect();

    let mut report = LoadReport::default();
    let mut rows = Vec::new();
    let mut record = ByteRecord::new();
    while rdr.read_byte_record(&mut record)? {
        report.total_rows += 1;
        if record.len() < header_order.len() {
            report.short_rows += 1;
        } else if record.len() > header_order.len() {
            report.long_rows += 1;
        }
        let row: Row = header_order
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let value = record.get(i).map(|f| String::from_utf8_lossy(f).into_owned());
                (col.as_str(), value.unwrap_or_default())
            })
            .collect();
        rows.push(row);
    }
    if report.short_rows + report.long_rows > 0 {
        warn!(
            short_rows = report.short_rows,
            long_rows = report.long_rows,
            "ragged CSV rows"
        );
    }
    Ok(LoadedCsv {
        header_order,
        rows,
        report,
    })
}

pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<LoadedCsv> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let loaded = load_reader(file)?;
    info!(
        path = %path.display(),
        rows = loaded.report.total_rows,
        columns = loaded.header_order.len(),
        "CSV loaded"
    );
    Ok(loaded)
}

/// Load `path` as an upload of `kind`, named after the file.
pub fn load_file<P: AsRef<Path>>(kind: FileKind, path: P) -> Result<UploadedFile> {
    let path = path.as_ref();
    let loaded = load_csv(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(UploadedFile::new(kind, &filename, loaded.header_order, loaded.rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_header_order_and_pads_short_rows() {
        let data = "\u{feff}Name,Flag,Is Late\nRahim,P,No\nKarim,A\nSalma,P,Yes,extra\n";
        let loaded = load_reader(data.as_bytes()).unwrap();
        assert_eq!(loaded.header_order, ["Name", "Flag", "Is Late"]);
        assert_eq!(loaded.rows.len(), 3);
        assert_eq!(loaded.rows[1].text("Is Late"), "");
        assert_eq!(loaded.rows[1].text_or("Is Late", "Unknown"), "");
        assert_eq!(loaded.rows[2].len(), 3);
        assert_eq!(
            loaded.report,
            LoadReport {
                total_rows: 3,
                short_rows: 1,
                long_rows: 1
            }
        );
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut data = b"App Name,Users Using App\n".to_vec();
        data.extend_from_slice(b"Pl\xffnner,4\n");
        let loaded = load_reader(data.as_slice()).unwrap();
        assert_eq!(loaded.rows[0].count("Users Using App"), 4);
        assert!(loaded.rows[0].text("App Name").starts_with("Pl"));
    }

    #[test]
    fn file_upload_is_named_after_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("may.csv");
        std::fs::write(&path, "Flag\nP\n").unwrap();
        let f = load_file(FileKind::Attendance, &path).unwrap();
        assert_eq!(f.filename, "may.csv");
        assert_eq!(f.rows.len(), 1);
        assert_eq!(f.kind, FileKind::Attendance);
    }
}
