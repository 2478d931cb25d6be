use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration for the contacts module (`modules.contacts` in the app config)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    /// Per-request timeout for the contacts REST routes, in seconds. `0` disables it.
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            request_timeout_sec: default_request_timeout_sec(),
        }
    }
}

impl ContactsConfig {
    /// Build from the raw per-module config value; a missing section yields defaults.
    pub fn from_value(raw: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        match raw {
            Some(value) => serde_json::from_value(value.clone())
                .context("invalid `modules.contacts` configuration"),
            None => Ok(Self::default()),
        }
    }
}

fn default_request_timeout_sec() -> u64 {
    30
}
