//! Persistence seam for catalog records.
//!
//! [`Repository`] is the only thing the catalog knows about storage. The CSV
//! implementation rewrites the whole file on every append, so it is not safe
//! for concurrent writers: two overlapping appends may lose one of them.

use crate::core::error::CatalogError;
use crate::core::migration::{self, UpgradeOutcome};
use crate::core::record::{ToolDraft, ToolRecord};
use crate::core::schemas::Schema;
use crate::core::serial;
use crate::core::table::{self, RawTable};
use crate::core::time;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub trait Repository {
    /// Bring the backing storage up to the current schema.
    fn initialize(&self) -> Result<UpgradeOutcome, CatalogError>;

    /// Every stored record in display order (newest first).
    fn load(&self) -> Result<Vec<ToolRecord>, CatalogError>;

    /// Persist a new record and return it with its assigned serial and
    /// timestamp. The draft is assumed to be validated already.
    fn append(&self, draft: &ToolDraft) -> Result<ToolRecord, CatalogError>;

    fn schema(&self) -> &Schema;
}

/// Catalog stored as a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvRepository {
    path: PathBuf,
    schema: Schema,
}

impl CsvRepository {
    pub fn new(path: impl Into<PathBuf>, schema: Schema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and upgrade the table in memory. When the file needed an upgrade,
    /// try to persist it; a failed rewrite is reported and the in-memory view
    /// is used anyway.
    fn read_upgraded(&self) -> Result<RawTable, CatalogError> {
        let Some(mut raw) = table::read_table(&self.path)? else {
            if let Err(e) = migration::upgrade_file(&self.path, &self.schema) {
                warn!(path = %self.path.display(), error = %e, "could not initialize catalog file");
            }
            return Ok(RawTable::with_header(&self.schema.header()));
        };

        let applied = migration::upgrade_table(&mut raw, &self.schema);
        if !applied.is_empty() {
            match table::write_table_atomic(&self.path, &raw) {
                Ok(()) => info!(
                    path = %self.path.display(),
                    migrations = ?applied,
                    "upgraded catalog file during load"
                ),
                Err(e) => warn!(
                    path = %self.path.display(),
                    error = %CatalogError::SchemaUpgradeError(e.to_string()),
                    "continuing with in-memory upgrade"
                ),
            }
        }
        Ok(raw)
    }
}

/// Schema columns in canonical order, followed by any columns the file
/// carries that the schema does not know about.
fn rewrite_header(raw: &RawTable, schema: &Schema) -> Vec<String> {
    let mut header: Vec<String> = schema.header().iter().map(|h| h.to_string()).collect();
    for column in &raw.header {
        if !column.is_empty() && !header.contains(column) {
            header.push(column.clone());
        }
    }
    header
}

impl Repository for CsvRepository {
    fn initialize(&self) -> Result<UpgradeOutcome, CatalogError> {
        migration::upgrade_file(&self.path, &self.schema)
    }

    fn load(&self) -> Result<Vec<ToolRecord>, CatalogError> {
        let raw = self.read_upgraded()?;
        let mut records: Vec<ToolRecord> = raw
            .rows
            .iter()
            .map(|row| ToolRecord::from_row(&raw, row))
            .collect();
        records.sort_by(ToolRecord::display_order);
        Ok(records)
    }

    fn append(&self, draft: &ToolDraft) -> Result<ToolRecord, CatalogError> {
        let raw = self.read_upgraded()?;
        let existing: Vec<ToolRecord> = raw
            .rows
            .iter()
            .map(|row| ToolRecord::from_row(&raw, row))
            .collect();
        let serial = serial::next_serial(&existing)?;
        let new_record = draft.clone().into_record(serial, time::now_local());

        // Existing rows keep their cell text; only their column order and
        // row order change.
        let header = rewrite_header(&raw, &self.schema);
        let mut order: Vec<usize> = (0..existing.len()).collect();
        order.sort_by(|&a, &b| ToolRecord::display_order(&existing[a], &existing[b]));

        let mut out = RawTable::with_header(&header);
        let mut new_row = new_record.to_row(&self.schema);
        new_row.resize(header.len(), String::new());
        out.rows.push(new_row);
        out.rows
            .extend(order.into_iter().map(|i| raw.project_row(&raw.rows[i], &header)));
        table::write_table_atomic(&self.path, &out)?;

        info!(
            path = %self.path.display(),
            serial = serial,
            name = %new_record.name,
            "appended catalog record"
        );
        Ok(new_record)
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}
