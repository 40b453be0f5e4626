use crate::error::Result;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("\n{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OdFunctionRecord;

    fn rec(group: &str, od: u64) -> OdFunctionRecord {
        OdFunctionRecord {
            month: "2024-05".into(),
            group: group.into(),
            members: 2,
            od,
        }
    }

    #[test]
    fn table_is_truncated_markdown() {
        let s = render_table(&[rec("CBL - Sales", 3), rec("CBL - HR", 1)], 1);
        assert!(s.contains("| Month"));
        assert!(s.contains("CBL - Sales"));
        assert!(!s.contains("CBL - HR"));
        assert_eq!(render_table::<OdFunctionRecord>(&[], 5), "(no rows)");
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("od.csv");
        write_csv(&path, &[rec("CBL - Sales", 3)]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("month,group,members,od"));
        assert_eq!(lines.next(), Some("2024-05,CBL - Sales,2,3"));
    }
}
