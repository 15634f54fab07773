use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use recur_core::auth::{StaticToken, TokenFile, TokenProvider};
use recur_core::config::{GoogleTasksConfig, ScanConfig, DEFAULT_BASE_URL};
use recur_core::metadata::{DEFAULT_INTERVAL_KEY, DEFAULT_PROCESSED_KEY};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Config file used when `RECUR_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "recur.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub scan: ScanSettings,
    pub watch: WatchSettings,
}

/// Where the tasks live and how to authenticate
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    /// Bearer token; takes precedence over `token_file`
    pub access_token: Option<String>,
    /// File holding the bearer token, re-read before every request
    pub token_file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            token_file: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct ScanSettings {
    pub lookback_hours: i64,
    pub interval_key: String,
    pub processed_key: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            lookback_hours: 24,
            interval_key: DEFAULT_INTERVAL_KEY.to_string(),
            processed_key: DEFAULT_PROCESSED_KEY.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct WatchSettings {
    pub every_minutes: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self { every_minutes: 60 }
    }
}

impl Config {
    /// Loads `recur.toml` (or the file named by `RECUR_CONFIG`), then `RECUR_*` variables.
    pub fn new() -> Result<Self, figment::Error> {
        let path = std::env::var("RECUR_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load(path)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("RECUR_").ignore(&["config"]).split("__"))
            .extract()
    }

    /// Scan settings for the core, with an optional lookback override in hours.
    pub fn scan_config(&self, lookback_hours: Option<i64>, dry_run: bool) -> anyhow::Result<ScanConfig> {
        let hours = lookback_hours.unwrap_or(self.scan.lookback_hours);
        if hours <= 0 {
            anyhow::bail!("scan.lookback_hours must be positive, got {hours}");
        }
        if self.scan.interval_key.is_empty() || self.scan.processed_key.is_empty() {
            anyhow::bail!("scan.interval_key and scan.processed_key cannot be empty");
        }
        if self.scan.interval_key == self.scan.processed_key {
            anyhow::bail!("scan.interval_key and scan.processed_key must differ");
        }

        let lookback = chrono::Duration::try_hours(hours)
            .ok_or_else(|| anyhow::anyhow!("scan.lookback_hours of {hours} is out of range"))?;

        Ok(ScanConfig {
            lookback,
            interval_key: self.scan.interval_key.clone(),
            processed_key: self.scan.processed_key.clone(),
            dry_run,
        })
    }

    pub fn google_config(&self) -> GoogleTasksConfig {
        GoogleTasksConfig {
            base_url: self.store.base_url.clone(),
            timeout: std::time::Duration::from_secs(self.store.timeout_secs.max(1)),
            ..Default::default()
        }
    }

    /// The configured token source. A missing token only fails on first use,
    /// so `--help` and config errors are reported first.
    pub fn token_provider(&self) -> Arc<dyn TokenProvider> {
        match (&self.store.access_token, &self.store.token_file) {
            (Some(token), _) => Arc::new(StaticToken::new(token.clone())),
            (None, Some(path)) => Arc::new(TokenFile::new(path.clone())),
            (None, None) => Arc::new(StaticToken::missing()),
        }
    }
}
