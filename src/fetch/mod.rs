// src/fetch/mod.rs

/// Building the HTTP client, including the opt-in trust-all TLS mode.
pub mod client;
/// Downloading the raw CSV body.
pub mod download;

pub use client::{build_client, TransportConfig};
pub use download::fetch_bytes;
