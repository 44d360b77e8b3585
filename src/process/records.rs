// src/process/records.rs

use csv::{ReaderBuilder, StringRecord};
use tracing::trace;

use crate::error::RefreshError;

/// A fully read CSV body: the header row plus every data row.
///
/// Rows may be shorter or longer than the header; each keeps its own width.
#[derive(Debug, Clone)]
pub struct CsvTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    /// Read `body` as comma-separated text whose first row names the columns.
    pub fn parse(body: &[u8]) -> Result<Self, RefreshError> {
        check_quotes(body)?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body);

        let headers = rdr.headers()?.clone();
        let rows = rdr.records().collect::<Result<Vec<_>, _>>()?;
        trace!(columns = headers.len(), rows = rows.len(), "parsed CSV");

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Zero-based position of the first header called `name`.
    pub fn column(&self, name: &str) -> Result<usize, RefreshError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| RefreshError::FieldMissing {
                column: name.to_string(),
                line: Some(1),
            })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().map(move |row| Record {
            headers: &self.headers,
            row,
        })
    }
}

/// The csv reader silently closes a quoted field at end of input. Reject that
/// instead, since it means the rest of the body was swallowed into one cell.
fn check_quotes(body: &[u8]) -> Result<(), RefreshError> {
    let mut line = 1u64;
    let mut opened_at = None;
    let mut field_start = true;
    let mut bytes = body.iter().peekable();

    while let Some(&b) = bytes.next() {
        if b == b'\n' {
            line += 1;
        }
        if opened_at.is_some() {
            if b == b'"' {
                if bytes.peek() == Some(&&b'"') {
                    bytes.next();
                } else {
                    opened_at = None;
                    field_start = false;
                }
            }
            continue;
        }
        if b == b'"' && field_start {
            opened_at = Some(line);
        }
        field_start = matches!(b, b',' | b'\n' | b'\r');
    }

    match opened_at {
        Some(line) => Err(RefreshError::UnterminatedQuote { line }),
        None => Ok(()),
    }
}

/// One data row, addressable by header name or by position.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a StringRecord,
    row: &'a StringRecord,
}

impl<'a> Record<'a> {
    /// Number of fields in this row.
    pub fn len(&self) -> usize {
        self.row.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.row.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|h| h == name)?;
        self.row.get(index)
    }

    /// 1-based line in the source body, for error messages.
    pub fn line(&self) -> u64 {
        self.row.position().map(|p| p.line()).unwrap_or(0)
    }
}
