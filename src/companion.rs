//! The conversation client: owns the remote session and turns user text into
//! assistant replies, and the whole conversation into a diary summary.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

use crate::api::{ApiError, AssistantsClient, Role, RunStatus};

/// Prompt sent as the final user turn to fold the conversation into a
/// Markdown diary entry.
const SUMMARY_PROMPT: &str = r#"Summarize the conversation as a diary entry in Markdown format.
Generate a suitable title based on the conversation.
Write the entry in a personal and reflective style.

Format:

# <Diary Title>

## Today's Reflection
<Summary of events and emotions discussed in the conversation>"#;

/// Shown when a completed run produced no assistant text at all.
pub const NO_RESPONSE: &str = "[No response]";

/// Shown when the reply could not be read back after a completed run.
pub const RETRIEVAL_FAILED: &str = "[Error retrieving response]";

/// Remote identifiers backing one conversation. Both are assigned together
/// at startup and live for the rest of the process; nothing deletes them.
#[derive(Debug, Clone)]
pub struct Session {
    pub assistant_id: String,
    pub thread_id: String,
}

/// Why a turn produced no displayable reply.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Startup never established a session, so there is nothing to talk to.
    #[error("assistant session was never initialized")]
    Uninitialized,

    #[error(transparent)]
    Api(#[from] ApiError),

    /// The run reached a terminal status other than completed.
    #[error("run ended with status {}", .status.as_str())]
    Run { status: RunStatus },
}

/// The conversational surface the chat loop drives. Implemented by the
/// remote-backed companion below and by scripted stand-ins in tests.
#[async_trait]
pub trait Companion {
    /// Forwards one user turn and returns the text to display for it.
    async fn send_message(&self, text: &str) -> Result<String, TurnError>;

    /// Asks for a Markdown diary entry covering the whole conversation.
    async fn summarize(&self) -> Result<String, TurnError>;
}

/// A journaling companion backed by the hosted Assistants API.
pub struct DiaryCompanion {
    client: AssistantsClient,
    model: String,
    name: String,
    instructions: String,
    session: Option<Session>,
}

impl DiaryCompanion {
    pub fn new(
        client: AssistantsClient,
        model: impl Into<String>,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            name: name.into(),
            instructions: instructions.into(),
            session: None,
        }
    }

    /// Registers the persona and opens the conversation thread.
    ///
    /// On failure the companion stays uninitialized and every later turn
    /// returns [`TurnError::Uninitialized`] without touching the network.
    pub async fn initialize(&mut self) -> Result<(), ApiError> {
        let assistant = self
            .client
            .create_assistant(&self.name, &self.instructions, &self.model)
            .await?;
        let thread = self.client.create_thread().await?;
        debug!("Session ready: assistant {} on thread {}", assistant.id, thread.id);

        self.session = Some(Session {
            assistant_id: assistant.id,
            thread_id: thread.id,
        });
        Ok(())
    }

    /// One full turn: post the text, run the assistant, wait for a terminal
    /// status, then read the newest assistant message back.
    async fn run_turn(&self, text: &str) -> Result<String, TurnError> {
        let session = self.session.as_ref().ok_or(TurnError::Uninitialized)?;

        self.client.add_user_message(&session.thread_id, text).await?;
        let run = self
            .client
            .create_run(&session.thread_id, &session.assistant_id)
            .await?;
        let run = self.client.poll_run(&session.thread_id, &run.id).await?;

        if run.status != RunStatus::Completed {
            return Err(TurnError::Run { status: run.status });
        }

        Ok(self.latest_assistant_reply(&session.thread_id).await)
    }

    /// Scans the thread, newest message first, for the most recent
    /// assistant-authored text. Both sentinel values keep the conversation
    /// going instead of ending the turn in an error.
    async fn latest_assistant_reply(&self, thread_id: &str) -> String {
        let messages = match self.client.list_messages(thread_id).await {
            Ok(list) => list,
            Err(err) => {
                error!("Error fetching latest assistant message: {err}");
                return RETRIEVAL_FAILED.to_string();
            }
        };

        messages
            .data
            .iter()
            .find(|message| message.role == Role::Assistant)
            .and_then(|message| message.first_text())
            .map(str::to_string)
            .unwrap_or_else(|| NO_RESPONSE.to_string())
    }
}

#[async_trait]
impl Companion for DiaryCompanion {
    async fn send_message(&self, text: &str) -> Result<String, TurnError> {
        self.run_turn(text).await
    }

    async fn summarize(&self) -> Result<String, TurnError> {
        self.run_turn(SUMMARY_PROMPT).await
    }
}
