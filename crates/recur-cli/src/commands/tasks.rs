use anyhow::Result;
use recur_core::editor::TaskEditor;
use recur_core::store::TaskStore;

use crate::cli::TasksCommand;
use crate::util::resolve_list_id;
use crate::views::table::display_tasks;

pub async fn show_tasks<S: TaskStore>(editor: &TaskEditor<S>, command: TasksCommand) -> Result<()> {
    let list_id = resolve_list_id(editor, &command.list).await?;
    let tasks = editor.list_tasks(&list_id, command.all).await?;
    display_tasks(&tasks);
    Ok(())
}
