// src/fetch/client.rs

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::TransportInitError;

/// Settings that shape the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    /// Skip certificate chain and hostname validation entirely.
    ///
    /// This makes the connection open to interception. It exists only for
    /// sources that serve a self-signed or otherwise broken certificate.
    pub insecure_skip_verify: bool,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            insecure_skip_verify: false,
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("casefeed/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Build the client every refresh cycle goes through.
///
/// Fails only when the TLS backend cannot be initialised, which is a
/// configuration problem rather than a network one.
pub fn build_client(cfg: &TransportConfig) -> Result<Client, TransportInitError> {
    if cfg.insecure_skip_verify {
        warn!("TLS certificate verification is DISABLED for the data source");
    }

    let client = Client::builder()
        .use_rustls_tls()
        .danger_accept_invalid_certs(cfg.insecure_skip_verify)
        .timeout(cfg.request_timeout)
        .user_agent(cfg.user_agent.as_str())
        .build()?;

    debug!(
        insecure = cfg.insecure_skip_verify,
        timeout = ?cfg.request_timeout,
        "built HTTP client"
    );
    Ok(client)
}
