use anyhow::{bail, Result};
use owo_colors::{OwoColorize, Style};
use recur_core::scanner::{BatchScanner, ScanSummary};

use crate::cli::RunCommand;
use crate::config::Config;

pub async fn run_once(config: &Config, command: RunCommand) -> Result<()> {
    let scan_config = config.scan_config(command.lookback_hours, command.dry_run)?;
    let scanner = BatchScanner::new(super::connect(config)?, scan_config);
    let summary = scanner.run().await;
    print_summary(&summary);

    // Non-zero exit so a scheduler notices partial failures.
    if summary.has_failures() {
        bail!("{} failure(s) during the recurrence scan", summary.failures.len());
    }
    Ok(())
}

pub fn print_summary(summary: &ScanSummary) {
    let success_style = Style::new().green().bold();
    let warn_style = Style::new().yellow().bold();

    if !summary.has_failures() {
        println!("{} {}", "✓".style(success_style), summary);
        return;
    }

    println!("{} {}", "!".style(warn_style), summary);
    for failure in &summary.failures {
        let target = failure
            .task_id
            .as_deref()
            .or(failure.list_id.as_deref())
            .map(|id| format!(" [{id}]"))
            .unwrap_or_default();
        println!(
            "  {} {}{}: {}",
            "→".style(warn_style),
            failure.kind,
            target,
            failure.message
        );
    }
}
