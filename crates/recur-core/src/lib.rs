//! # Recur Core Library
//!
//! Interval-based recurring tasks layered on top of a remote task-list
//! service that has no recurrence of its own.
//!
//! A task opts in by carrying a small JSON object in its notes field, such as
//! `{"interval": 7}`. When such a task is completed, a batch pass creates a
//! fresh copy due `interval` days after the completion time and stamps the
//! original with a processed marker so it is never recurred twice.
//!
//! ## Core Modules
//!
//! - [`models`]: Task, task list and request types as the service exchanges them
//! - [`metadata`]: Reading and writing the JSON metadata stored in notes
//! - [`eligibility`]: Deciding whether a completed task should recur
//! - [`recurrence`]: Computing the successor and its due date
//! - [`scanner`]: The batch pass over every list, with per-task failure isolation
//! - [`editor`]: Interactive create and update with an interval field
//! - [`store`]: The task store abstraction, a Google Tasks client and an in-memory store
//! - [`auth`]: Bearer-token sources
//! - [`config`]: Scan and connection settings
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use recur_core::{
//!     auth::StaticToken,
//!     config::{GoogleTasksConfig, ScanConfig},
//!     error::CoreError,
//!     scanner::BatchScanner,
//!     store::GoogleTasksClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CoreError> {
//!     let tokens = Arc::new(StaticToken::new("ya29.example"));
//!     let store = GoogleTasksClient::new(GoogleTasksConfig::default(), tokens)?;
//!
//!     let scanner = BatchScanner::new(store, ScanConfig::default());
//!     let summary = scanner.run().await;
//!     println!("{summary}");
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod editor;
pub mod eligibility;
pub mod error;
pub mod metadata;
pub mod models;
pub mod recurrence;
pub mod scanner;
pub mod store;

pub use error::CoreError;
