use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use recur_core::models::{RecurringTask, TaskList, TaskStatus};

fn build_lists_table(lists: &[TaskList]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Updated"]);

    for list in lists {
        let mut row = Row::new();
        row.add_cell(Cell::new(list.id.as_deref().unwrap_or("-")));
        row.add_cell(Cell::new(list.label()));
        row.add_cell(Cell::new(
            list.updated.map(|u| u.humanize()).unwrap_or_else(|| "-".to_string()),
        ));
        table.add_row(row);
    }
    table
}

pub fn display_lists(lists: &[TaskList]) {
    if lists.is_empty() {
        println!("No task lists found.");
        return;
    }
    println!("{}", build_lists_table(lists));
}

fn due_cell(due: Option<DateTime<Utc>>, status: TaskStatus, now: DateTime<Utc>) -> Cell {
    let Some(due) = due else {
        return Cell::new("None");
    };
    let text = format!("{} ({})", due.format("%Y-%m-%d"), due.humanize());
    if status == TaskStatus::Completed {
        Cell::new(text)
    } else if due.date_naive() < now.date_naive() {
        Cell::new(text).fg(Color::Red)
    } else if due.date_naive() == now.date_naive() {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text)
    }
}

fn build_tasks_table(tasks: &[RecurringTask], now: DateTime<Utc>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Status", "Due", "Every"]);

    for RecurringTask { task, interval } in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(task.id.as_deref().unwrap_or("-")));

        let mut title = String::new();
        if interval.is_some() {
            title.push('↻');
            title.push(' ');
        }
        title.push_str(task.label());
        let mut title_cell = Cell::new(title);
        if task.is_completed() {
            title_cell = title_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey);
        }
        row.add_cell(title_cell);

        let status_cell = match task.status {
            TaskStatus::Completed => Cell::new("completed").fg(Color::Green),
            TaskStatus::NeedsAction => Cell::new("open"),
        };
        row.add_cell(status_cell);
        row.add_cell(due_cell(task.due, task.status, now));
        row.add_cell(match interval {
            Some(1) => Cell::new("1 day").fg(Color::Cyan),
            Some(days) => Cell::new(format!("{days} days")).fg(Color::Cyan),
            None => Cell::new("-"),
        });
        table.add_row(row);
    }
    table
}

pub fn display_tasks(tasks: &[RecurringTask]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("{}", build_tasks_table(tasks, Utc::now()));
}
