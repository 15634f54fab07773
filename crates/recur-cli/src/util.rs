use anyhow::{anyhow, Result};
use recur_core::editor::TaskEditor;
use recur_core::error::CoreError;
use recur_core::store::TaskStore;

/// Resolves a list given by id or, failing that, by case-insensitive title.
pub async fn resolve_list_id<S: TaskStore>(editor: &TaskEditor<S>, list: &str) -> Result<String> {
    let list = list.trim();
    if list.is_empty() {
        return Err(anyhow!(CoreError::InvalidInput(
            "List must be an id or a title.".to_string()
        )));
    }
    let lists = editor.list_task_lists().await?;
    if lists.iter().any(|l| l.id.as_deref() == Some(list)) {
        return Ok(list.to_string());
    }

    let matches: Vec<_> = lists
        .into_iter()
        .filter(|l| l.title.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(list)))
        .filter_map(|l| Some((l.id?, l.title.unwrap_or_default())))
        .collect();
    match matches.len() {
        1 => Ok(matches[0].0.clone()),
        0 => Err(anyhow!(CoreError::NotFound(format!(
            "No task list with id or title '{}'",
            list
        )))),
        _ => Err(anyhow!(CoreError::AmbiguousList(matches))),
    }
}
