// src/process/mod.rs

pub mod records;
pub mod transform;

pub use records::{CsvTable, Record};
pub use transform::{to_location_stat, transform, COUNTRY_COLUMN, STATE_COLUMN};

use crate::error::RefreshError;
use crate::stats::LocationStat;

/// Parse a downloaded body and derive one `LocationStat` per data row.
///
/// All-or-nothing: the first malformed row or bad number fails the whole body.
pub fn parse_stats(body: &[u8]) -> Result<Vec<LocationStat>, RefreshError> {
    let table = CsvTable::parse(body)?;
    transform(&table)
}
