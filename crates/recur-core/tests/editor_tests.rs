use chrono::{Duration, TimeZone, Utc};
use recur_core::config::ScanConfig;
use recur_core::editor::{TaskDraft, TaskEditor, TaskUpdate};
use recur_core::error::CoreError;
use recur_core::metadata::MetadataCodec;
use recur_core::models::TaskStatus;
use recur_core::scanner::BatchScanner;
use recur_core::store::memory::InMemoryTaskStore;
use std::sync::Arc;

#[tokio::test]
async fn task_created_with_interval_recurs_after_completion() {
    let store = Arc::new(InMemoryTaskStore::new());
    store.add_list("home", "Home");
    let editor = TaskEditor::new(Arc::clone(&store), MetadataCodec::default());

    let created = editor
        .create_task(
            "home",
            TaskDraft {
                title: "Descale kettle".to_string(),
                notes: Some("vinegar under the sink".to_string()),
                interval: Some(14),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let id = created.task.id.clone().unwrap();

    let done = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    store.complete_task("home", &id, done);

    let scanner = BatchScanner::new(Arc::clone(&store), ScanConfig::default());
    let summary = scanner.run_at(done + Duration::hours(4)).await;
    assert_eq!(summary.successors_created, 1);

    let open = editor.list_tasks("home", false).await.unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].interval, Some(14));
    assert_eq!(open[0].task.due, Some(done + Duration::days(14)));
    assert_eq!(
        open[0].task.notes.as_deref(),
        Some(r#"{"interval":14,"originalNotes":"vinegar under the sink"}"#)
    );
}

#[tokio::test]
async fn editing_interval_rearms_a_processed_task() {
    let store = Arc::new(InMemoryTaskStore::new());
    store.add_list("home", "Home");
    let editor = TaskEditor::new(Arc::clone(&store), MetadataCodec::default());
    let task = store.add_task(
        "home",
        recur_core::models::TaskRecord {
            title: Some("Oil change".to_string()),
            status: TaskStatus::Completed,
            completed: Some(Utc::now()),
            notes: Some(r#"{"interval":90,"lastRecurred":"2024-01-01T00:00:00.000Z","car":"blue"}"#.to_string()),
            ..Default::default()
        },
    );

    let updated = editor
        .update_task(
            "home",
            task.id.as_deref().unwrap(),
            TaskUpdate {
                interval: Some(Some(120)),
                status: Some(TaskStatus::NeedsAction),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.interval, Some(120));
    assert_eq!(updated.task.notes.as_deref(), Some(r#"{"interval":120,"car":"blue"}"#));
    assert_eq!(updated.task.status, TaskStatus::NeedsAction);
    assert!(updated.task.completed.is_none());

    let all = editor.list_tasks("home", true).await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn explicit_notes_replace_the_stored_ones() {
    let store = InMemoryTaskStore::new();
    store.add_list("home", "Home");
    let task = store.add_task(
        "home",
        recur_core::models::TaskRecord {
            notes: Some(r#"{"interval":3,"old":true}"#.to_string()),
            ..Default::default()
        },
    );
    let editor = TaskEditor::new(store, MetadataCodec::default());

    let updated = editor
        .update_task(
            "home",
            task.id.as_deref().unwrap(),
            TaskUpdate {
                notes: Some(Some("fresh start".to_string())),
                interval: Some(Some(5)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(
        updated.task.notes.as_deref(),
        Some(r#"{"interval":5,"originalNotes":"fresh start"}"#)
    );
}

#[tokio::test]
async fn unknown_list_is_reported() {
    let editor = TaskEditor::new(InMemoryTaskStore::new(), MetadataCodec::default());
    let result = editor
        .create_task(
            "missing",
            TaskDraft {
                title: "Anything".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}
