//! Raw CSV table I/O for the catalog file.
//!
//! Everything on disk is text; typing happens in `core::record`. Writes go
//! through a staging file in the same directory followed by a rename, so a
//! failed write never leaves a half-written catalog behind.

use crate::core::error::CatalogError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header plus rows, exactly as read from (or about to be written to) disk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn with_header<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Insert a column at `index`, filling every existing row with `default`.
    pub fn insert_column(&mut self, index: usize, name: &str, default: &str) {
        let index = index.min(self.header.len());
        self.header.insert(index, name.to_string());
        for row in &mut self.rows {
            let at = index.min(row.len());
            row.insert(at, default.to_string());
        }
    }

    /// Cells of `row` (one of this table's rows) rearranged to `columns`,
    /// matched by name. Columns this table lacks come back empty.
    pub fn project_row<S: AsRef<str>>(&self, row: &[String], columns: &[S]) -> Vec<String> {
        columns
            .iter()
            .map(|c| {
                self.column_index(c.as_ref())
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Pad short rows to the header width and drop cells past it.
    fn normalize(&mut self) {
        let width = self.header.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, CatalogError> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .flexible(false)
            .from_writer(Vec::new());
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        wtr.into_inner()
            .map_err(|e| CatalogError::PersistenceError(e.to_string()))
    }
}

/// Read the catalog file.
///
/// Returns `Ok(None)` when the file is absent, zero bytes, or has no usable
/// header row; callers treat all three the same way.
pub fn read_table(path: &Path) -> Result<Option<RawTable>, CatalogError> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    parse_table(&bytes)
}

pub fn parse_table(bytes: &[u8]) -> Result<Option<RawTable>, CatalogError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(None);
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = rdr.records();
    let header: Vec<String> = match records.next() {
        Some(rec) => rec?.iter().map(|h| h.trim().to_string()).collect(),
        None => return Ok(None),
    };
    if header.iter().all(|h| h.is_empty()) {
        return Ok(None);
    }

    let mut rows = Vec::new();
    for rec in records {
        let rec = rec?;
        if rec.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(rec.iter().map(|c| c.to_string()).collect());
    }

    let mut table = RawTable { header, rows };
    table.normalize();
    Ok(Some(table))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Replace `path` with `table` atomically: either the whole new content lands
/// or the previous content is left untouched.
pub fn write_table_atomic(path: &Path, table: &RawTable) -> Result<(), CatalogError> {
    let bytes = table.to_csv_bytes()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CatalogError::PersistenceError(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let tmp_path = staging_path(path);
    let staged = File::create(&tmp_path).and_then(|mut f| {
        f.write_all(&bytes)?;
        f.sync_all()
    });
    if let Err(e) = staged {
        let _ = fs::remove_file(&tmp_path);
        return Err(CatalogError::PersistenceError(format!(
            "Failed to write {}: {}",
            tmp_path.display(),
            e
        )));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CatalogError::PersistenceError(format!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        ))
    })
}
