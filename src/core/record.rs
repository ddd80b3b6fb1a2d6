//! Typed catalog records and their mapping to raw table rows.

use crate::core::schemas::{Field, Schema};
use crate::core::table::RawTable;
use crate::core::time;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// One stored catalog entry.
///
/// `serial_number` and `date_time` are `None` when a legacy row held a value
/// that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRecord {
    pub serial_number: Option<u64>,
    pub name: String,
    pub tool_link: String,
    pub category: String,
    pub uploaded_by: String,
    #[serde(serialize_with = "serialize_date_time")]
    pub date_time: Option<NaiveDateTime>,
    pub purpose: String,
}

/// Caller-supplied fields for a new record, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolDraft {
    pub name: String,
    pub tool_link: String,
    pub category: String,
    pub uploaded_by: String,
    pub purpose: String,
}

impl ToolDraft {
    pub fn new(
        name: impl Into<String>,
        tool_link: impl Into<String>,
        category: impl Into<String>,
        uploaded_by: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tool_link: tool_link.into(),
            category: category.into(),
            uploaded_by: uploaded_by.into(),
            purpose: purpose.into(),
        }
    }

    /// Build the stored record. Text is trimmed; the category is stored as
    /// chosen.
    pub fn into_record(self, serial_number: u64, date_time: NaiveDateTime) -> ToolRecord {
        ToolRecord {
            serial_number: Some(serial_number),
            name: self.name.trim().to_string(),
            tool_link: self.tool_link.trim().to_string(),
            category: self.category,
            uploaded_by: self.uploaded_by.trim().to_string(),
            date_time: Some(date_time),
            purpose: self.purpose.trim().to_string(),
        }
    }
}

fn serialize_date_time<S: Serializer>(
    value: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(ts) => serializer.serialize_str(&time::format_date_time(ts)),
        None => serializer.serialize_none(),
    }
}

/// Parse a stored serial. Integral floats (`"3.0"`) are accepted because
/// older writers emitted them once a column contained blanks.
pub fn parse_serial(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u64>() {
        return (n > 0).then_some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if f.is_finite() && f >= 1.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

impl ToolRecord {
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::SerialNumber => self
                .serial_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            Field::Name => self.name.clone(),
            Field::ToolLink => self.tool_link.clone(),
            Field::Category => self.category.clone(),
            Field::UploadedBy => self.uploaded_by.clone(),
            Field::DateTime => self
                .date_time
                .as_ref()
                .map(time::format_date_time)
                .unwrap_or_default(),
            Field::Purpose => self.purpose.clone(),
        }
    }

    /// Build a record from a row, looking cells up by column name so the
    /// on-disk column order does not matter. Columns absent from the row get
    /// the field default.
    pub fn from_row(table: &RawTable, row: &[String]) -> Self {
        let cell = |field: Field| cell_for(table, row, field);
        Self {
            serial_number: parse_serial(cell(Field::SerialNumber)),
            name: cell(Field::Name).to_string(),
            tool_link: cell(Field::ToolLink).trim().to_string(),
            category: cell(Field::Category).to_string(),
            uploaded_by: cell(Field::UploadedBy).to_string(),
            date_time: time::parse_date_time(cell(Field::DateTime)),
            purpose: cell(Field::Purpose).to_string(),
        }
    }

    pub fn to_row(&self, schema: &Schema) -> Vec<String> {
        schema.fields().iter().map(|f| self.get(*f)).collect()
    }

    /// Display order: newest first, unknown timestamps last; ties by serial
    /// descending, unknown serials last.
    pub fn display_order(a: &ToolRecord, b: &ToolRecord) -> Ordering {
        desc_some_first(&a.date_time, &b.date_time)
            .then_with(|| desc_some_first(&a.serial_number, &b.serial_number))
    }
}

fn cell_for<'a>(table: &RawTable, row: &'a [String], field: Field) -> &'a str {
    table
        .column_index(field.column_name())
        .and_then(|i| row.get(i))
        .map(String::as_str)
        .unwrap_or(field.default_value())
}

fn desc_some_first<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Render records as a table in `schema` order.
pub fn records_to_table(records: &[ToolRecord], schema: &Schema) -> RawTable {
    let mut table = RawTable::with_header(&schema.header());
    table.rows = records.iter().map(|r| r.to_row(schema)).collect();
    table
}
