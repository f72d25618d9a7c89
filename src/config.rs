use anyhow::Context;
use serde::Deserialize;

/// Web front settings, read from the environment (and `.env` when present)
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the upstream recommendation API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Interface the web front listens on
    #[serde(default = "default_host")]
    pub webapp_host: String,

    #[serde(default = "default_port")]
    pub webapp_port: u16,

    /// Timeout for upstream requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of recommendations requested from the upstream; upstream default when unset
    #[serde(default)]
    pub recommendation_limit: Option<u32>,
}

fn default_api_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    80
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "No .env file loaded");
        }
        envy::from_env::<Config>().context("invalid web front configuration")
    }

    /// Address the web front binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.webapp_host, self.webapp_port)
    }
}
