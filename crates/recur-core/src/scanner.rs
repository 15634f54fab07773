//! Batch scan: find recently completed recurring tasks and create their successors.
//!
//! A run walks every task list once, fetches the tasks completed inside the
//! lookback window, and for each eligible task inserts a successor and then
//! marks the original. Failures are isolated per list and per task; nothing
//! short of being unable to enumerate lists ends a run early. The scanner
//! keeps no state between runs.

use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::ScanConfig;
use crate::eligibility::{self, Eligibility};
use crate::error::CoreError;
use crate::metadata::MetadataCodec;
use crate::models::{TaskPatch, TaskQuery, TaskRecord};
use crate::recurrence::RecurrencePlanner;
use crate::store::TaskStore;

/// Where in a run something went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Task lists could not be enumerated; the run ended.
    ListTaskLists,
    /// One list's tasks could not be fetched; the list was skipped.
    ListTasks,
    /// Eligible task without an id; it could never be marked, so it was left alone.
    MissingTaskId,
    MissingCompletionTime,
    /// The successor's due date could not be computed.
    Plan,
    /// Creating the successor failed; the original stays unmarked and is retried next run.
    Insert,
    /// The successor exists but the original could not be marked.
    MarkProcessed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            FailureKind::ListTaskLists => "list task lists",
            FailureKind::ListTasks => "list tasks",
            FailureKind::MissingTaskId => "missing task id",
            FailureKind::MissingCompletionTime => "missing completion time",
            FailureKind::Plan => "plan successor",
            FailureKind::Insert => "create successor",
            FailureKind::MarkProcessed => "mark original",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    pub kind: FailureKind,
    pub list_id: Option<String>,
    pub task_id: Option<String>,
    pub message: String,
}

impl ScanFailure {
    fn new(kind: FailureKind, list_id: Option<&str>, task: Option<&TaskRecord>, error: &CoreError) -> Self {
        Self {
            kind,
            list_id: list_id.map(str::to_string),
            task_id: task.and_then(|t| t.id.clone()),
            message: error.to_string(),
        }
    }
}

/// What one run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// The run's notion of "now": marker timestamp and window end
    pub run_at: DateTime<Utc>,
    /// Start of the completion window
    pub window_start: DateTime<Utc>,
    pub dry_run: bool,
    pub lists_scanned: usize,
    /// Lists without an id
    pub lists_skipped: usize,
    pub lists_failed: usize,
    pub tasks_examined: usize,
    pub eligible: usize,
    /// Successors planned (equals created unless dry-run or insert failures)
    pub successors_planned: usize,
    pub successors_created: usize,
    pub originals_marked: usize,
    pub failures: Vec<ScanFailure>,
    pub duration_ms: u64,
}

impl ScanSummary {
    fn new(run_at: DateTime<Utc>, window_start: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            run_at,
            window_start,
            dry_run,
            lists_scanned: 0,
            lists_skipped: 0,
            lists_failed: 0,
            tasks_examined: 0,
            eligible: 0,
            successors_planned: 0,
            successors_created: 0,
            originals_marked: 0,
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failures_of(&self, kind: FailureKind) -> impl Iterator<Item = &ScanFailure> {
        self.failures.iter().filter(move |f| f.kind == kind)
    }
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} lists scanned ({} skipped, {} failed), {} tasks examined, {} eligible, ",
            self.lists_scanned, self.lists_skipped, self.lists_failed, self.tasks_examined, self.eligible
        )?;
        if self.dry_run {
            write!(f, "{} successors planned (dry run)", self.successors_planned)?;
        } else {
            write!(
                f,
                "{} successors created, {} originals marked",
                self.successors_created, self.originals_marked
            )?;
        }
        write!(f, ", {} failures in {}ms", self.failures.len(), self.duration_ms)
    }
}

/// BatchScanner: drives one full pass over the store.
///
/// Responsibilities:
/// 1. Enumerate task lists, skipping any without an id
/// 2. Fetch tasks completed within the lookback window, per list
/// 3. Filter with the eligibility rules and plan each successor
/// 4. Insert the successor, then mark the original with the processed marker
/// 5. Record and log every failure without aborting the pass
///
/// Marking is always the last write for a task. If it fails after the insert
/// succeeded, the next run will create a second successor; that gap is
/// reported as [`FailureKind::MarkProcessed`] rather than hidden.
pub struct BatchScanner<S> {
    store: S,
    codec: MetadataCodec,
    planner: RecurrencePlanner,
    config: ScanConfig,
}

impl<S: TaskStore> BatchScanner<S> {
    pub fn new(store: S, config: ScanConfig) -> Self {
        Self {
            store,
            codec: config.codec(),
            planner: RecurrencePlanner::new(),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Runs a pass ending at the current time.
    pub async fn run(&self) -> ScanSummary {
        self.run_at(Utc::now()).await
    }

    /// Runs a pass whose window ends at `now`. `now` is also the marker timestamp.
    pub async fn run_at(&self, now: DateTime<Utc>) -> ScanSummary {
        let started = Instant::now();
        let window_start = now.checked_sub_signed(self.config.lookback).unwrap_or_else(|| {
            warn!(lookback_hours = self.config.lookback.num_hours(), "lookback reaches past the earliest timestamp; scanning from the beginning");
            DateTime::<Utc>::MIN_UTC
        });
        let mut summary = ScanSummary::new(now, window_start, self.config.dry_run);

        info!(
            window_start = %window_start,
            window_end = %now,
            dry_run = self.config.dry_run,
            "starting recurrence scan"
        );

        match self.store.list_task_lists().await {
            Ok(lists) => {
                for list in &lists {
                    let Some(list_id) = list.id.as_deref() else {
                        warn!(list = list.label(), "skipping task list without an id");
                        summary.lists_skipped += 1;
                        continue;
                    };
                    let span = info_span!("list", list_id, title = list.label());
                    self.scan_list(list_id, &mut summary).instrument(span).await;
                }
            }
            Err(e) => {
                error!(error = %e, "could not enumerate task lists");
                summary
                    .failures
                    .push(ScanFailure::new(FailureKind::ListTaskLists, None, None, &e));
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(%summary, "recurrence scan finished");
        summary
    }

    async fn scan_list(&self, list_id: &str, summary: &mut ScanSummary) {
        let query = TaskQuery::completed_since(summary.window_start);
        let tasks = match self.store.list_tasks(list_id, &query).await {
            Ok(tasks) => tasks,
            Err(e) => {
                error!(error = %e, "could not fetch tasks; skipping list");
                summary.lists_failed += 1;
                summary
                    .failures
                    .push(ScanFailure::new(FailureKind::ListTasks, Some(list_id), None, &e));
                return;
            }
        };
        summary.lists_scanned += 1;
        debug!(count = tasks.len(), "fetched recently completed tasks");

        for task in &tasks {
            summary.tasks_examined += 1;
            if !task.is_completed() || task.notes.is_none() {
                continue;
            }
            match eligibility::evaluate(&self.codec, task) {
                Eligibility::Eligible { interval } => {
                    summary.eligible += 1;
                    if let Err(failure) = self.process_task(list_id, task, interval, summary).await {
                        summary.failures.push(failure);
                    }
                }
                reason => debug!(task = task.label(), %reason, "not recurring"),
            }
        }
    }

    async fn process_task(
        &self,
        list_id: &str,
        task: &TaskRecord,
        interval: i64,
        summary: &mut ScanSummary,
    ) -> Result<(), ScanFailure> {
        let Some(task_id) = task.id.as_deref() else {
            let e = CoreError::InvalidInput(format!("task '{}' has no id", task.label()));
            warn!(task = task.label(), "eligible task has no id; cannot mark it, leaving it alone");
            return Err(ScanFailure::new(FailureKind::MissingTaskId, Some(list_id), Some(task), &e));
        };

        // The successor copies the notes as they are now, before the marker is added.
        let successor = self.planner.plan_next(task, interval).map_err(|e| {
            let kind = match e {
                CoreError::MissingCompletionTime(_) => FailureKind::MissingCompletionTime,
                _ => FailureKind::Plan,
            };
            warn!(task_id, task = task.label(), error = %e, "cannot plan successor; skipping");
            ScanFailure::new(kind, Some(list_id), Some(task), &e)
        })?;
        summary.successors_planned += 1;

        let due = successor.due.map(|d| d.to_rfc3339()).unwrap_or_default();
        if self.config.dry_run {
            info!(task_id, task = task.label(), interval, due = %due, "would create successor (dry run)");
            return Ok(());
        }

        let created = self.store.insert_task(list_id, &successor).await.map_err(|e| {
            error!(task_id, task = task.label(), error = %e, "failed to create successor");
            ScanFailure::new(FailureKind::Insert, Some(list_id), Some(task), &e)
        })?;
        summary.successors_created += 1;
        info!(
            task_id,
            successor_id = created.id.as_deref().unwrap_or_default(),
            task = task.label(),
            interval,
            due = %due,
            "created successor"
        );

        let marked = self.codec.mark_processed(task.notes.as_deref(), summary.run_at);
        self.store
            .patch_task(list_id, task_id, &TaskPatch::notes(marked))
            .await
            .map_err(|e| {
                error!(
                    task_id,
                    successor_id = created.id.as_deref().unwrap_or_default(),
                    error = %e,
                    "successor created but original not marked; the next run will create a duplicate"
                );
                ScanFailure::new(FailureKind::MarkProcessed, Some(list_id), Some(task), &e)
            })?;
        summary.originals_marked += 1;
        debug!(task_id, "marked original as recurred");

        Ok(())
    }
}
