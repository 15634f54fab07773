use anyhow::Result;
use owo_colors::OwoColorize;
use recur_core::editor::{TaskEditor, TaskUpdate};
use recur_core::store::TaskStore;

use crate::cli::EditCommand;
use crate::parser::parse_due_date;
use crate::util::resolve_list_id;

pub async fn edit_task<S: TaskStore>(editor: &TaskEditor<S>, command: EditCommand) -> Result<()> {
    let notes = if command.notes_clear {
        Some(None)
    } else {
        command.notes.map(Some)
    };

    let due = if command.due_clear {
        Some(None)
    } else if let Some(due_str) = command.due {
        Some(Some(parse_due_date(&due_str)?))
    } else {
        None
    };

    let interval = if command.interval_clear {
        Some(None)
    } else {
        command.interval.map(Some)
    };

    let update = TaskUpdate {
        title: command.title,
        notes,
        due,
        status: command.status,
        interval,
    };

    let list_id = resolve_list_id(editor, &command.list).await?;
    let updated = editor.update_task(&list_id, &command.task_id, update).await?;

    println!(
        "{} Updated task: {}",
        "✓".green().bold(),
        updated.task.label().bright_white().bold()
    );
    match updated.interval {
        Some(days) => println!("  Recurs every {} day(s) after completion", days.to_string().cyan()),
        None if command.interval_clear => println!("  No longer recurring"),
        None => {}
    }

    Ok(())
}
