use anyhow::{anyhow, bail, Result};
use recur_core::config::ScanConfig;
use recur_core::scanner::BatchScanner;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::cli::WatchCommand;
use crate::config::Config;

use super::run::print_summary;

/// Longest accepted watch period: one (leap) year of minutes.
pub const MAX_WATCH_MINUTES: u64 = 60 * 24 * 366;

/// Tick period for the loop and the scan settings widened to cover it.
fn schedule(minutes: u64, base: ScanConfig) -> Result<(Duration, ScanConfig)> {
    if minutes == 0 {
        bail!("watch period must be at least one minute");
    }
    if minutes > MAX_WATCH_MINUTES {
        bail!("watch period of {minutes} minutes is too long (at most {MAX_WATCH_MINUTES})");
    }
    let secs = minutes
        .checked_mul(60)
        .ok_or_else(|| anyhow!("watch period of {minutes} minutes is out of range"))?;
    let period = chrono::Duration::try_minutes(i64::try_from(minutes)?)
        .ok_or_else(|| anyhow!("watch period of {minutes} minutes is out of range"))?;

    let lookback = base.lookback_for_period(period);
    Ok((Duration::from_secs(secs), ScanConfig { lookback, ..base }))
}

/// Scans immediately, then every period, until Ctrl-C or `--max-runs`.
///
/// Scans never overlap: a slow scan delays the next tick instead of stacking.
pub async fn watch(config: &Config, command: WatchCommand) -> Result<()> {
    let minutes = command.every.unwrap_or(config.watch.every_minutes);
    let (tick, scan_config) = schedule(minutes, config.scan_config(None, command.dry_run)?)?;
    let lookback = scan_config.lookback;
    let scanner = BatchScanner::new(super::connect(config)?, scan_config);

    info!(
        every_minutes = minutes,
        lookback_minutes = lookback.num_minutes(),
        dry_run = command.dry_run,
        "watching for completed recurring tasks"
    );

    let mut ticker = tokio::time::interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut runs: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!(runs, "interrupted; stopping");
                break;
            }
        }

        let summary = scanner.run().await;
        print_summary(&summary);
        runs += 1;

        if command.max_runs.is_some_and(|max| runs >= max) {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_widens_lookback() {
        let (tick, scan) = schedule(60 * 30, ScanConfig::default()).unwrap();
        assert_eq!(tick, Duration::from_secs(60 * 60 * 30));
        assert_eq!(scan.lookback, chrono::Duration::minutes(60 * 30 + 15));

        let (_, short) = schedule(5, ScanConfig::default()).unwrap();
        assert_eq!(short.lookback, chrono::Duration::hours(24));
    }

    #[test]
    fn test_schedule_rejects_out_of_range_periods() {
        assert!(schedule(0, ScanConfig::default()).is_err());
        assert!(schedule(MAX_WATCH_MINUTES + 1, ScanConfig::default()).is_err());
        assert!(schedule(u64::MAX, ScanConfig::default()).is_err());
        assert!(schedule(MAX_WATCH_MINUTES, ScanConfig::default()).is_ok());
    }
}
