use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::auth::TokenProvider;
use crate::config::GoogleTasksConfig;
use crate::error::CoreError;
use crate::models::{NewTaskSpec, TaskList, TaskPatch, TaskQuery, TaskRecord};
use crate::store::TaskStore;

/// One page of a list endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Google Tasks v1 REST client.
pub struct GoogleTasksClient {
    client: reqwest::Client,
    base_url: Url,
    page_size: u32,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleTasksClient {
    pub fn new(config: GoogleTasksConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, CoreError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CoreError::Config(format!("invalid store base_url '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(CoreError::Config(format!(
                "store base_url '{}' cannot be used as an API root",
                config.base_url
            )));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            page_size: config.page_size.clamp(1, 100),
            tokens,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, CoreError> {
        let token = self.tokens.access_token().await?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, CoreError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(operation, status = status.as_u16(), "task store response");

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CoreError::Authentication(format!("{operation} rejected ({status}): {body}"))
            }
            StatusCode::NOT_FOUND => CoreError::NotFound(format!("{operation}: {body}")),
            _ => CoreError::store(operation, status.as_u16(), body),
        })
    }

    /// Follows `nextPageToken` until the listing is exhausted.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, CoreError> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, url.clone())
                .await?
                .query(params)
                .query(&[("maxResults", self.page_size.to_string())]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: Page<T> = self.send(operation, request).await?;
            items.extend(page.items);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl TaskStore for GoogleTasksClient {
    async fn list_task_lists(&self) -> Result<Vec<TaskList>, CoreError> {
        let url = self.endpoint(&["users", "@me", "lists"]);
        self.fetch_all("list task lists", url, &[]).await
    }

    async fn list_tasks(&self, list_id: &str, query: &TaskQuery) -> Result<Vec<TaskRecord>, CoreError> {
        let url = self.endpoint(&["lists", list_id, "tasks"]);
        let mut params = vec![
            ("showCompleted", query.show_completed.to_string()),
            ("showHidden", query.show_hidden.to_string()),
        ];
        if let Some(min) = query.completed_min {
            params.push(("completedMin", min.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        self.fetch_all("list tasks", url, &params).await
    }

    async fn get_task(&self, list_id: &str, task_id: &str) -> Result<TaskRecord, CoreError> {
        let url = self.endpoint(&["lists", list_id, "tasks", task_id]);
        let request = self.request(Method::GET, url).await?;
        self.send("get task", request).await
    }

    async fn insert_task(&self, list_id: &str, task: &NewTaskSpec) -> Result<TaskRecord, CoreError> {
        let url = self.endpoint(&["lists", list_id, "tasks"]);
        let request = self.request(Method::POST, url).await?.json(task);
        self.send("insert task", request).await
    }

    async fn patch_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &TaskPatch,
    ) -> Result<TaskRecord, CoreError> {
        let url = self.endpoint(&["lists", list_id, "tasks", task_id]);
        let request = self.request(Method::PATCH, url).await?.json(patch);
        self.send("patch task", request).await
    }
}
