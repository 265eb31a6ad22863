use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::models::{DeleteResponse, Draft, ErrorBody, Suggestion, Task, TaskPatch};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin JSON-over-HTTP helper. No retries, no caching.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `body` as JSON when present and decodes the response as `T`.
    /// A non-2xx status becomes [`ClientError::Api`] carrying the server's message.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            // Sets Content-Type: application/json.
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Api { status, message });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ClientError> {
        self.request(Method::GET, "tasks", None::<&()>).await
    }

    pub async fn create_task(&self, draft: &Draft) -> Result<Task, ClientError> {
        self.request(Method::POST, "tasks", Some(draft)).await
    }

    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ClientError> {
        self.request(Method::PUT, &format!("tasks/{id}"), Some(patch))
            .await
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<DeleteResponse, ClientError> {
        self.request(Method::DELETE, &format!("tasks/{id}"), None::<&()>)
            .await
    }

    pub async fn suggest(&self, title: &str, description: &str) -> Result<Vec<Suggestion>, ClientError> {
        let body = Draft {
            title: title.to_string(),
            description: description.to_string(),
        };
        self.request(Method::POST, "suggestions", Some(&body)).await
    }
}
