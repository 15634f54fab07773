use anyhow::Result;
use owo_colors::{OwoColorize, Style};
use recur_core::editor::{TaskDraft, TaskEditor};
use recur_core::store::TaskStore;

use crate::cli::AddCommand;
use crate::parser::parse_due_date;
use crate::util::resolve_list_id;

pub async fn add_task<S: TaskStore>(editor: &TaskEditor<S>, command: AddCommand) -> Result<()> {
    let due = command.due.as_deref().map(parse_due_date).transpose()?;
    let list_id = resolve_list_id(editor, &command.list).await?;

    let draft = TaskDraft {
        title: command.title,
        notes: command.notes,
        due,
        interval: command.interval,
    };
    let created = editor.create_task(&list_id, draft).await?;

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();
    let label = if created.is_recurring() {
        "Created recurring task:"
    } else {
        "Created task:"
    };
    println!(
        "{} {} {}",
        "✓".style(success_style),
        label,
        created.task.label().bright_white().bold()
    );
    println!(
        "  {} Task ID: {}",
        "→".style(info_style),
        created.task.id.as_deref().unwrap_or("-").yellow()
    );
    if let Some(days) = created.interval {
        println!(
            "  {} Recurs {} day(s) after each completion",
            "→".style(info_style),
            days.to_string().cyan()
        );
    }
    if let Some(due) = created.task.due {
        println!(
            "  {} Due: {}",
            "→".style(info_style),
            due.format("%Y-%m-%d").to_string().cyan()
        );
    }

    Ok(())
}
