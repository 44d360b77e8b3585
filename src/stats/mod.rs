// src/stats/mod.rs

pub mod cell;

pub use cell::SnapshotCell;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One location's latest count and its change since the previous report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStat {
    pub state: String,
    pub country: String,
    pub latest_total: i64,
    /// `latest_total` minus the previous column. Negative when the source
    /// revised a count downwards.
    pub delta_from_previous: i64,
}

/// A complete, immutable result of one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rows in source file order.
    pub stats: Vec<LocationStat>,
    /// `None` until the first successful refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
    pub source_url: Option<String>,
}

impl Snapshot {
    pub fn new(stats: Vec<LocationStat>, source_url: impl Into<String>) -> Self {
        Self {
            stats,
            refreshed_at: Some(Utc::now()),
            source_url: Some(source_url.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocationStat> {
        self.stats.iter()
    }

    /// Sum of `latest_total` over every row, clamped to the i64 range.
    pub fn total_latest(&self) -> i64 {
        self.stats
            .iter()
            .fold(0i64, |acc, s| acc.saturating_add(s.latest_total))
    }

    /// Sum of `delta_from_previous` over every row, clamped to the i64 range.
    pub fn total_delta(&self) -> i64 {
        self.stats
            .iter()
            .fold(0i64, |acc, s| acc.saturating_add(s.delta_from_previous))
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a LocationStat;
    type IntoIter = std::slice::Iter<'a, LocationStat>;

    fn into_iter(self) -> Self::IntoIter {
        self.stats.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(country: &str, latest: i64, delta: i64) -> LocationStat {
        LocationStat {
            state: String::new(),
            country: country.to_string(),
            latest_total: latest,
            delta_from_previous: delta,
        }
    }

    #[test]
    fn totals_sum_all_rows() {
        let snap = Snapshot::new(
            vec![stat("China", 15, 5), stat("Italy", 7, -2), stat("Chad", 0, 0)],
            "https://example.org/a.csv",
        );
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.total_latest(), 22);
        assert_eq!(snap.total_delta(), 3);
        assert!(snap.refreshed_at.is_some());
    }

    #[test]
    fn totals_clamp_instead_of_overflowing() {
        let snap = Snapshot::new(
            vec![stat("A", i64::MAX, i64::MAX), stat("B", i64::MAX, i64::MAX)],
            "https://example.org/a.csv",
        );
        assert_eq!(snap.total_latest(), i64::MAX);
        assert_eq!(snap.total_delta(), i64::MAX);

        let low = Snapshot::new(
            vec![stat("A", 0, i64::MIN), stat("B", 0, -1)],
            "https://example.org/a.csv",
        );
        assert_eq!(low.total_delta(), i64::MIN);
    }

    #[test]
    fn default_is_empty_and_unrefreshed() {
        let snap = Snapshot::default();
        assert!(snap.is_empty());
        assert_eq!(snap.total_latest(), 0);
        assert!(snap.refreshed_at.is_none());
        assert!(snap.source_url.is_none());
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let json = serde_json::to_value(stat("China", 15, 5)).unwrap();
        assert_eq!(json["country"], "China");
        assert_eq!(json["latest_total"], 15);
        assert_eq!(json["delta_from_previous"], 5);
    }
}
