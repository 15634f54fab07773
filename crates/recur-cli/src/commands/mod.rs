use anyhow::Result;
use recur_core::editor::TaskEditor;
use recur_core::store::GoogleTasksClient;

use crate::config::Config;

pub mod add;
pub mod edit;
pub mod lists;
pub mod run;
pub mod tasks;
pub mod watch;

/// Google Tasks client built from the `[store]` section.
pub fn connect(config: &Config) -> Result<GoogleTasksClient> {
    Ok(GoogleTasksClient::new(config.google_config(), config.token_provider())?)
}

/// Editor over the configured store, using the configured metadata keys.
pub fn editor(config: &Config) -> Result<TaskEditor<GoogleTasksClient>> {
    let codec = config.scan_config(None, false)?.codec();
    Ok(TaskEditor::new(connect(config)?, codec))
}
