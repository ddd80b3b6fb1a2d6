use crate::core::error::CatalogError;
use crate::core::record::{self, ToolRecord};
use crate::core::repository::Repository;
use crate::core::schemas::Schema;
use crate::core::store::Catalog;
use crate::core::time;
use chrono::NaiveDateTime;

pub const EXPORT_MIME: &str = "text/csv";

/// A downloadable snapshot of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export_file_name(at: &NaiveDateTime) -> String {
    format!("ai_tools_dataset_{}.csv", time::file_stamp(at))
}

/// Serialize `records` with the same header and column order as the backing
/// file.
pub fn export_records(
    records: &[ToolRecord],
    schema: &Schema,
    at: &NaiveDateTime,
) -> Result<CsvExport, CatalogError> {
    let bytes = record::records_to_table(records, schema).to_csv_bytes()?;
    Ok(CsvExport {
        file_name: export_file_name(at),
        mime: EXPORT_MIME,
        bytes,
    })
}

/// Export the full current record set in load order.
pub fn export_catalog<R: Repository>(catalog: &Catalog<R>) -> Result<CsvExport, CatalogError> {
    let records = catalog.try_load()?;
    export_records(&records, catalog.schema(), &time::now_local())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "export",
        "version": "0.1.0",
        "description": "Full catalog download as CSV",
        "commands": [
            { "name": "export", "parameters": ["out"] }
        ],
        "mime": EXPORT_MIME
    })
}
