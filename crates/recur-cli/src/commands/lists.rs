use anyhow::Result;
use recur_core::editor::TaskEditor;
use recur_core::store::TaskStore;

use crate::views::table::display_lists;

pub async fn show_lists<S: TaskStore>(editor: &TaskEditor<S>) -> Result<()> {
    let lists = editor.list_task_lists().await?;
    display_lists(&lists);
    Ok(())
}
