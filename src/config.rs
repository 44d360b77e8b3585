// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, time::Duration};
use url::Url;

use crate::fetch::client::TransportConfig;

pub const CONFIG_PATH_VAR: &str = "CASEFEED_CONFIG";
const SOURCE_URL_VAR: &str = "CASEFEED_SOURCE_URL";
const INSECURE_VAR: &str = "CASEFEED_INSECURE_SKIP_VERIFY";
const INTERVAL_VAR: &str = "CASEFEED_REFRESH_INTERVAL_SECS";
const TIMEOUT_VAR: &str = "CASEFEED_REQUEST_TIMEOUT_SECS";

/// Runtime settings. Fixed for the lifetime of the process once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// CSV endpoint fetched on every refresh cycle.
    pub source_url: String,
    /// Accept any server certificate. Off unless asked for.
    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("casefeed/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Config {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            insecure_skip_verify: false,
            refresh_interval_secs: default_refresh_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Load from the YAML file named by `CASEFEED_CONFIG` if set, then apply
    /// `CASEFEED_*` environment overrides.
    pub fn load() -> Result<Self> {
        let base = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Some(Self::read_yaml(&path)?),
            Err(_) => None,
        };
        Self::from_lookup(base, |key| env::var(key).ok())
    }

    /// Parse a YAML config file without validating it.
    pub fn read_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Layer variables from `lookup` over `base` and validate the result.
    pub fn from_lookup<F>(base: Option<Self>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match (base, lookup(SOURCE_URL_VAR)) {
            (Some(mut cfg), Some(url)) => {
                cfg.source_url = url;
                cfg
            }
            (Some(cfg), None) => cfg,
            (None, Some(url)) => Self::new(url),
            (None, None) => bail!(
                "no data source configured: set {} or point {} at a config file",
                SOURCE_URL_VAR,
                CONFIG_PATH_VAR
            ),
        };

        if let Some(v) = lookup(INSECURE_VAR) {
            cfg.insecure_skip_verify = parse_bool(&v)
                .with_context(|| format!("{} must be true or false, got `{}`", INSECURE_VAR, v))?;
        }
        if let Some(v) = lookup(INTERVAL_VAR) {
            cfg.refresh_interval_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", INTERVAL_VAR))?;
        }
        if let Some(v) = lookup(TIMEOUT_VAR) {
            cfg.request_timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_VAR))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.source_url)
            .with_context(|| format!("source_url `{}` is not a valid URL", self.source_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("source_url must be http or https, got `{}`", url.scheme());
        }
        if self.refresh_interval_secs == 0 {
            bail!("refresh_interval_secs must be greater than zero");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            insecure_skip_verify: self.insecure_skip_verify,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
