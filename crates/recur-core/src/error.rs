use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task store {operation} failed{suffix}: {message}", suffix = status_suffix(.status))]
    Store {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Not authenticated: {0}")]
    Authentication(String),

    #[error("Task '{0}' is completed but has no completion time")]
    MissingCompletionTime(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("More than one task list matches: {}", format_candidates(.0))]
    AmbiguousList(Vec<(String, String)>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn format_candidates(candidates: &[(String, String)]) -> String {
    candidates
        .iter()
        .map(|(id, title)| format!("{title} ({id})"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    /// Builds a store failure for a response that came back with a non-success status.
    pub fn store(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        CoreError::Store {
            operation,
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether retrying the same call without new credentials is pointless.
    pub fn is_authentication(&self) -> bool {
        matches!(self, CoreError::Authentication(_))
    }
}
