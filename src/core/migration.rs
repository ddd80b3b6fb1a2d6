//! Schema upgrade pass for catalog files.
//!
//! A catalog file written by an earlier release may lack columns that the
//! current [`Schema`] requires. Each [`Migration`] patches the raw table so the
//! header matches again.
//!
//! - **Idempotent**: every migration checks the header first, so running the
//!   whole list twice changes nothing the second time
//! - **Column placement**: a missing column is inserted right after its
//!   canonical predecessor (e.g. `Tool_Link` after `Name`)
//! - **Defaults**: existing rows receive the field's default value
//! - **Rewrite only on change**: an up-to-date file is never touched

use crate::core::error::CatalogError;
use crate::core::schemas::{Field, Schema};
use crate::core::table::{self, RawTable};
use std::path::Path;
use tracing::{info, warn};

/// Latest catalog layout version.
pub const SCHEMA_VERSION: u32 = 2;

/// Migration definition
pub struct Migration {
    /// Layout version this migration brings the table to
    pub version: u32,
    /// Human-readable description
    pub description: &'static str,
    /// Returns `true` when the table was modified
    pub up: fn(&mut RawTable, &Schema) -> bool,
}

/// All migrations in order of version.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Ensure baseline catalog columns",
        up: migrate_baseline_columns,
    },
    Migration {
        version: 2,
        description: "Add Tool_Link column after Name",
        up: migrate_add_tool_link,
    },
];

/// What the upgrade pass did to the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// File was absent or empty and has been written with the header only.
    Created,
    /// File was rewritten; holds the applied migration descriptions.
    Upgraded(Vec<&'static str>),
    UpToDate,
}

/// Insert `field` after the nearest predecessor present in the header.
/// No-op when the column already exists or the schema does not carry it.
fn ensure_column(table: &mut RawTable, schema: &Schema, field: Field) -> bool {
    if !schema.contains(field) || table.column_index(field.column_name()).is_some() {
        return false;
    }

    let mut anchor = schema.anchor_of(field);
    let mut insert_at = 0;
    while let Some(a) = anchor {
        if let Some(idx) = table.column_index(a.column_name()) {
            insert_at = idx + 1;
            break;
        }
        anchor = schema.anchor_of(a);
    }

    table.insert_column(insert_at, field.column_name(), field.default_value());
    true
}

fn migrate_baseline_columns(table: &mut RawTable, schema: &Schema) -> bool {
    let mut changed = false;
    for field in schema.fields() {
        if *field != Field::ToolLink {
            changed |= ensure_column(table, schema, *field);
        }
    }
    changed
}

fn migrate_add_tool_link(table: &mut RawTable, schema: &Schema) -> bool {
    ensure_column(table, schema, Field::ToolLink)
}

/// Run every migration over an in-memory table. Returns the descriptions of
/// the migrations that changed something.
pub fn upgrade_table(table: &mut RawTable, schema: &Schema) -> Vec<&'static str> {
    MIGRATIONS
        .iter()
        .filter_map(|m| (m.up)(table, schema).then_some(m.description))
        .collect()
}

/// Bring the file at `path` up to `schema`, creating it when absent or empty.
pub fn upgrade_file(path: &Path, schema: &Schema) -> Result<UpgradeOutcome, CatalogError> {
    let existing = table::read_table(path).map_err(|e| {
        CatalogError::SchemaUpgradeError(format!("cannot read {}: {}", path.display(), e))
    })?;

    let Some(mut raw) = existing else {
        let empty = RawTable::with_header(&schema.header());
        write_upgraded(path, &empty)?;
        info!(path = %path.display(), "initialized catalog file");
        return Ok(UpgradeOutcome::Created);
    };

    let applied = upgrade_table(&mut raw, schema);
    if applied.is_empty() {
        return Ok(UpgradeOutcome::UpToDate);
    }

    write_upgraded(path, &raw)?;
    for description in &applied {
        info!(path = %path.display(), migration = *description, "applied schema migration");
    }
    Ok(UpgradeOutcome::Upgraded(applied))
}

fn write_upgraded(path: &Path, raw: &RawTable) -> Result<(), CatalogError> {
    table::write_table_atomic(path, raw).map_err(|e| {
        warn!(path = %path.display(), error = %e, "schema upgrade could not rewrite file");
        CatalogError::SchemaUpgradeError(e.to_string())
    })
}
