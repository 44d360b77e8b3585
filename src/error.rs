// src/error.rs

use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// The HTTP client could not be constructed. Fatal: nothing can be refreshed
/// without a transport, so startup should stop here.
#[derive(Debug, Error)]
#[error("failed to initialise HTTP transport: {0}")]
pub struct TransportInitError(#[from] pub reqwest::Error);

/// Which part of a refresh cycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Parse,
    Transform,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetch => "fetch",
            Stage::Parse => "parse",
            Stage::Transform => "transform",
        };
        f.write_str(s)
    }
}

/// A failed refresh cycle. Every variant is recoverable: the cycle is
/// dropped and the previously published snapshot stays in place.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Network failure, timeout, or a non-2xx response.
    #[error("GET {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 2xx and no redirect
    /// was followed.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body is not well-formed delimited text.
    #[error("malformed CSV{}: {source}", fmt_line(.line))]
    Parse {
        line: Option<u64>,
        #[source]
        source: csv::Error,
    },

    /// A quoted field is still open at end of input.
    #[error("malformed CSV: quoted field opened at line {line} is never closed")]
    UnterminatedQuote { line: u64 },

    /// A required column is not present in the header or the row is too short
    /// to contain it.
    #[error("required column `{column}` missing{}", fmt_line(.line))]
    FieldMissing { column: String, line: Option<u64> },

    /// A trailing count column holds something other than an integer.
    #[error("line {line}: column {column} value `{value}` is not an integer: {source}")]
    NumberFormat {
        line: u64,
        column: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// `latest - previous` does not fit in an i64.
    #[error("line {line}: change from {previous} to {latest} overflows")]
    DeltaOverflow { line: u64, latest: i64, previous: i64 },
}

fn fmt_line(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {}", l)).unwrap_or_default()
}

impl RefreshError {
    pub fn stage(&self) -> Stage {
        match self {
            RefreshError::Fetch { .. } | RefreshError::Status { .. } => Stage::Fetch,
            RefreshError::Parse { .. }
            | RefreshError::UnterminatedQuote { .. }
            | RefreshError::FieldMissing { .. } => Stage::Parse,
            RefreshError::NumberFormat { .. } | RefreshError::DeltaOverflow { .. } => {
                Stage::Transform
            }
        }
    }
}

impl From<csv::Error> for RefreshError {
    fn from(source: csv::Error) -> Self {
        let line = source.position().map(|p| p.line());
        RefreshError::Parse { line, source }
    }
}
