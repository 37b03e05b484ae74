//! Runtime settings read from the environment.

use std::time::Duration;

use anyhow::{ensure, Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout: Duration,
    pub page_size: u32,
    pub debounce: Duration,
    pub monitor_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_millis(10_000),
            page_size: 10,
            debounce: Duration::from_millis(500),
            monitor_interval: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unset or blank keys keep their
    /// defaults; present keys must parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_url = var("INVENTORY_API_URL").unwrap_or(defaults.api_url);

        let timeout = match var("INVENTORY_TIMEOUT_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .context("INVENTORY_TIMEOUT_MS must be a number of milliseconds")?,
            ),
            None => defaults.timeout,
        };

        let page_size = match var("INVENTORY_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("INVENTORY_PAGE_SIZE must be a positive integer")?,
            None => defaults.page_size,
        };
        ensure!(page_size >= 1, "INVENTORY_PAGE_SIZE must be at least 1");

        let debounce = match var("INVENTORY_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .context("INVENTORY_DEBOUNCE_MS must be a number of milliseconds")?,
            ),
            None => defaults.debounce,
        };

        let monitor_interval = match var("INVENTORY_MONITOR_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .context("INVENTORY_MONITOR_SECS must be a number of seconds")?,
            ),
            None => defaults.monitor_interval,
        };
        ensure!(
            !monitor_interval.is_zero(),
            "INVENTORY_MONITOR_SECS must be at least 1"
        );

        Ok(Self {
            api_url,
            timeout,
            page_size,
            debounce,
            monitor_interval,
        })
    }
}
