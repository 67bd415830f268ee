//! Typed access to the hosted Assistants API.
//!
//! [`AssistantsClient`] wraps exactly the endpoints one journaling session
//! needs: registering the persona, opening a thread, appending user turns,
//! running the assistant over the thread, and reading back its replies.

mod client;
mod types;

pub use client::AssistantsClient;
pub use types::{Role, RunStatus};

use thiserror::Error;

/// Errors raised by calls to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a decodable response: connection refused,
    /// DNS failure, or a malformed body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
}
