//! HTTP plumbing for the Assistants v2 endpoints.
//!
//! Every request carries the bearer key and the `OpenAI-Beta: assistants=v2`
//! header. The client is built without a request timeout: a run may sit in
//! the service's queue for as long as the service allows, and expiry is the
//! service's decision, not ours.

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::types::{
    Assistant, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest, ErrorEnvelope,
    MessageList, Role, Run, Thread, ThreadMessage,
};
use super::ApiError;

const BETA_HEADER: &str = "OpenAI-Beta";
const BETA_VERSION: &str = "assistants=v2";

/// Typed client for the handful of Assistants endpoints this program uses.
pub struct AssistantsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    poll_interval: Duration,
}

impl AssistantsClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            poll_interval,
        }
    }

    /// Register the assistant persona. `POST /assistants`.
    pub async fn create_assistant(
        &self,
        name: &str,
        instructions: &str,
        model: &str,
    ) -> Result<Assistant, ApiError> {
        let request = CreateAssistantRequest {
            name: name.to_string(),
            instructions: instructions.to_string(),
            model: model.to_string(),
        };
        self.post("assistants", &request).await
    }

    /// Open a fresh conversation thread. `POST /threads`.
    pub async fn create_thread(&self) -> Result<Thread, ApiError> {
        self.post("threads", &serde_json::json!({})).await
    }

    /// Append the user's text to the thread. `POST /threads/{id}/messages`.
    pub async fn add_user_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<ThreadMessage, ApiError> {
        let request = CreateMessageRequest {
            role: Role::User,
            content: text.to_string(),
        };
        self.post(&format!("threads/{thread_id}/messages"), &request)
            .await
    }

    /// Start a run of the assistant over the thread. `POST /threads/{id}/runs`.
    pub async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run, ApiError> {
        let request = CreateRunRequest {
            assistant_id: assistant_id.to_string(),
        };
        self.post(&format!("threads/{thread_id}/runs"), &request)
            .await
    }

    /// Fetch the current state of a run. `GET /threads/{id}/runs/{id}`.
    pub async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError> {
        self.get(&format!("threads/{thread_id}/runs/{run_id}")).await
    }

    /// Re-fetch a run until the service reports a terminal status. There is
    /// no attempt cap: the loop ends when the run completes, fails, or the
    /// service itself expires it.
    pub async fn poll_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ApiError> {
        loop {
            let run = self.retrieve_run(thread_id, run_id).await?;
            if run.status.is_terminal() {
                return Ok(run);
            }
            debug!("Run {} still pending ({})", run.id, run.status.as_str());
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// List the thread's messages, newest first. `GET /threads/{id}/messages`.
    pub async fn list_messages(&self, thread_id: &str) -> Result<MessageList, ApiError> {
        self.get(&format!("threads/{thread_id}/messages")).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header(BETA_HEADER, BETA_VERSION)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header(BETA_HEADER, BETA_VERSION)
            .send()
            .await?;
        Self::decode(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            let status = response.status();
            let body: Result<ErrorEnvelope, _> = response.json().await;
            let message = body
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status { status, message });
        }

        Ok(response.json().await?)
    }
}
