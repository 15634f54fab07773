use chrono::Duration;

use crate::metadata::{MetadataCodec, DEFAULT_INTERVAL_KEY, DEFAULT_PROCESSED_KEY};

pub const DEFAULT_BASE_URL: &str = "https://tasks.googleapis.com/tasks/v1";

/// Settings for one batch scan.
///
/// The core never reads files or the environment; callers build this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// How far back from "now" to ask for completed tasks
    pub lookback: Duration,
    /// Notes key holding the interval in days
    pub interval_key: String,
    /// Notes key written once a successor has been created
    pub processed_key: String,
    /// Plan and log but never write to the store
    pub dry_run: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookback: Duration::hours(24),
            interval_key: DEFAULT_INTERVAL_KEY.to_string(),
            processed_key: DEFAULT_PROCESSED_KEY.to_string(),
            dry_run: false,
        }
    }
}

impl ScanConfig {
    /// Extra slack on top of the schedule period so a late run still overlaps the previous window.
    pub const SAFETY_MARGIN_MINUTES: i64 = 15;

    /// Lookback long enough for a job that runs every `period`.
    ///
    /// Never shorter than the configured lookback; the window only affects how
    /// much is fetched, the processed marker is what prevents reprocessing.
    pub fn lookback_for_period(&self, period: Duration) -> Duration {
        let needed = period
            .checked_add(&Duration::minutes(Self::SAFETY_MARGIN_MINUTES))
            .unwrap_or(period);
        needed.max(self.lookback)
    }

    pub fn codec(&self) -> MetadataCodec {
        MetadataCodec::new(self.interval_key.clone(), self.processed_key.clone())
    }
}

/// Connection settings for the Google Tasks REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleTasksConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Per-request timeout
    pub timeout: std::time::Duration,
    /// Page size for list calls (the service caps it at 100)
    pub page_size: u32,
}

impl Default for GoogleTasksConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: std::time::Duration::from_secs(30),
            page_size: 100,
        }
    }
}
