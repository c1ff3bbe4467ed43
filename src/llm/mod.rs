//! Completion collaborator seam
//!
//! The analysis pipeline only ever talks to a [`Completion`]: a black box that
//! turns a system prompt and a user prompt into text, or fails. Latency,
//! transient failures and truncated replies are all possible.

pub mod openai;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use openai::OpenAiClient;

/// Probe reply expected from a healthy endpoint
pub const CONNECTION_PROBE_REPLY: &str = "Connection test successful";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API key environment variable {env} is not set or empty")]
    MissingApiKey { env: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Endpoint returned no usable content")]
    EmptyResponse,
}

/// Trait for text-completion providers
///
/// Implementations must map every failure (network, auth, rate limit, empty
/// reply) to an [`LlmError`]; callers treat any error as "no usable analysis".
#[async_trait]
pub trait Completion: Send + Sync {
    /// Complete a single system/user prompt pair
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;

    /// Get the model name
    fn model_name(&self) -> &str;
}

/// Outcome of a connection probe
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionCheck {
    pub ok: bool,
    pub message: String,
}

/// Send a fixed probe and check the endpoint echoes the expected reply
pub async fn check_connection(completion: &dyn Completion) -> ConnectionCheck {
    let reply = completion
        .complete(
            "You are a helpful assistant.",
            &format!("Hello! Please respond with '{}.'", CONNECTION_PROBE_REPLY),
        )
        .await;

    match reply {
        Ok(text) if text.contains(CONNECTION_PROBE_REPLY) => ConnectionCheck {
            ok: true,
            message: format!("Connected to {}", completion.model_name()),
        },
        Ok(text) => {
            tracing::debug!("Unexpected probe reply: {}", text);
            ConnectionCheck {
                ok: false,
                message: "Endpoint replied, but not with the expected probe text".to_string(),
            }
        }
        Err(e) => ConnectionCheck {
            ok: false,
            message: format!("Connection failed: {}", e),
        },
    }
}
