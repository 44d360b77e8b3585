//! Periodically download a CSV of regional case counts, derive per-location
//! day-over-day deltas, and hold the latest result in memory.

pub mod config;
pub mod error;
pub mod fetch;
pub mod process;
pub mod refresh;
pub mod stats;

pub use config::Config;
pub use error::{RefreshError, Stage, TransportInitError};
pub use refresh::{run_every, Refresher};
pub use stats::{LocationStat, Snapshot, SnapshotCell};
