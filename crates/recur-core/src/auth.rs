//! Bearer-token sources for the task store.
//!
//! Signing in and refreshing tokens happen elsewhere; this module only hands
//! the current token to the HTTP client.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::CoreError;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a token to send as `Authorization: Bearer <token>`.
    async fn access_token(&self) -> Result<String, CoreError>;
}

/// A token fixed at construction, typically from config or the environment.
#[derive(Clone, Default)]
pub struct StaticToken {
    token: Option<String>,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn missing() -> Self {
        Self { token: None }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<String, CoreError> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token.to_string()),
            _ => Err(CoreError::Authentication("no access token configured".to_string())),
        }
    }
}

/// Reads the token from a file on every call so an external refresher can rotate it.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenProvider for TokenFile {
    async fn access_token(&self) -> Result<String, CoreError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CoreError::Authentication(format!("cannot read token file '{}': {e}", self.path.display()))
        })?;
        let token = contents.trim();
        if token.is_empty() {
            return Err(CoreError::Authentication(format!(
                "token file '{}' is empty",
                self.path.display()
            )));
        }
        Ok(token.to_string())
    }
}
