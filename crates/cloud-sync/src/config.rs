//! Remote backend configuration read from the environment.

use std::time::Duration;

use expensehud_core::sync::SYNC_INTERVAL_SECS;

use crate::error::{CloudSyncError, Result};

pub const API_URL_ENV: &str = "EXPENSEHUD_API_URL";
pub const API_KEY_ENV: &str = "EXPENSEHUD_API_KEY";
pub const SYNC_INTERVAL_ENV: &str = "EXPENSEHUD_SYNC_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Base URL without a trailing slash, e.g. `https://abc.supabase.co`.
    pub api_url: String,
    /// Public API key sent as the `apikey` header.
    pub api_key: String,
    pub sync_interval: Duration,
}

impl RemoteConfig {
    pub fn new(api_url: &str, api_key: &str) -> Self {
        Self {
            api_url: api_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            sync_interval: Duration::from_secs(SYNC_INTERVAL_SECS),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| CloudSyncError::config(format!("{} is not set", key)))
        };

        let mut config = Self::new(&required(API_URL_ENV)?, &required(API_KEY_ENV)?);

        if let Some(raw) = lookup(SYNC_INTERVAL_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                CloudSyncError::config(format!("{} must be a number of seconds", SYNC_INTERVAL_ENV))
            })?;
            if secs == 0 {
                return Err(CloudSyncError::config(format!(
                    "{} must be greater than zero",
                    SYNC_INTERVAL_ENV
                )));
            }
            config.sync_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
