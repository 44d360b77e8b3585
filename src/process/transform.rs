// src/process/transform.rs

use tracing::debug;

use crate::error::RefreshError;
use crate::process::records::{CsvTable, Record};
use crate::stats::LocationStat;

pub const STATE_COLUMN: &str = "Province/State";
pub const COUNTRY_COLUMN: &str = "Country/Region";

/// Turn every data row into a `LocationStat`, keeping source order.
///
/// Both named columns must exist in the header. The counts come from the
/// last two fields of each row, whatever their headers say, so the source is
/// assumed to keep its date columns at the end in chronological order.
pub fn transform(table: &CsvTable) -> Result<Vec<LocationStat>, RefreshError> {
    let state_idx = table.column(STATE_COLUMN)?;
    let country_idx = table.column(COUNTRY_COLUMN)?;

    let stats = table
        .records()
        .map(|record| to_location_stat(&record, state_idx, country_idx))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        rows = stats.len(),
        columns = table.headers().len(),
        "transformed records"
    );
    Ok(stats)
}

/// Derive one `LocationStat` from a row.
///
/// An empty final cell means no figure has been reported yet; the row then
/// gets zero for both counts and the earlier column is not looked at.
pub fn to_location_stat(
    record: &Record<'_>,
    state_idx: usize,
    country_idx: usize,
) -> Result<LocationStat, RefreshError> {
    let state = required(record, state_idx, STATE_COLUMN)?;
    let country = required(record, country_idx, COUNTRY_COLUMN)?;

    let (latest_total, delta_from_previous) = match record.len().checked_sub(1) {
        Some(last) if !record.get(last).unwrap_or_default().is_empty() => {
            let latest = count_at(record, last)?;
            let previous = match last.checked_sub(1) {
                Some(prev) => count_at(record, prev)?,
                None => {
                    return Err(RefreshError::FieldMissing {
                        column: "previous count".to_string(),
                        line: Some(record.line()),
                    })
                }
            };
            let delta = latest
                .checked_sub(previous)
                .ok_or(RefreshError::DeltaOverflow {
                    line: record.line(),
                    latest,
                    previous,
                })?;
            (latest, delta)
        }
        _ => (0, 0),
    };

    Ok(LocationStat {
        state: state.to_string(),
        country: country.to_string(),
        latest_total,
        delta_from_previous,
    })
}

fn required<'a>(record: &Record<'a>, index: usize, column: &str) -> Result<&'a str, RefreshError> {
    record.get(index).ok_or_else(|| RefreshError::FieldMissing {
        column: column.to_string(),
        line: Some(record.line()),
    })
}

fn count_at(record: &Record<'_>, index: usize) -> Result<i64, RefreshError> {
    let value = record.get(index).unwrap_or_default();
    value.parse::<i64>().map_err(|source| RefreshError::NumberFormat {
        line: record.line(),
        column: index,
        value: value.to_string(),
        source,
    })
}
