//! Serial number allocation.

use crate::core::error::CatalogError;
use crate::core::record::ToolRecord;

/// Next serial for a new record: one past the largest known serial, or 1 when
/// no record carries a usable serial. Unknown serials never block allocation.
///
/// Fails once the largest stored serial is `u64::MAX`, since every later
/// number would collide with it.
pub fn next_serial(records: &[ToolRecord]) -> Result<u64, CatalogError> {
    match records.iter().filter_map(|r| r.serial_number).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(|| {
            CatalogError::PersistenceError(format!(
                "serial numbers exhausted: largest stored serial is {}",
                max
            ))
        }),
    }
}
