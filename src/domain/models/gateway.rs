#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;

use async_trait::async_trait;
use thiserror::Error;

use super::ApiKey;
use super::Turn;

/// Returned by `generate` when the model answers with no text.
pub const FALLBACK_RESPONSE: &str = "I couldn't generate a response.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("API Key not configured")]
    Unconfigured,
    #[error("Rate limit exceeded. Please wait a moment.")]
    RateLimited,
    #[error("{}", remote_message(.0))]
    RemoteFailure(String),
}

fn remote_message(message: &str) -> &str {
    if message.trim().is_empty() {
        return "Failed to connect to Gemini API";
    }

    return message;
}

impl GatewayError {
    /// Classifies a failure message from the remote or the transport. Rate
    /// limits are only recognizable by the status code or status name
    /// embedded in the message.
    pub fn from_remote_message(message: &str) -> GatewayError {
        if message.contains("429") || message.contains("RESOURCE_EXHAUSTED") {
            return GatewayError::RateLimited;
        }

        return GatewayError::RemoteFailure(message.to_string());
    }
}

#[async_trait]
pub trait ModelGateway {
    /// Stores the credential used by every following request. Can be called
    /// again to rotate keys.
    fn configure(&mut self, api_key: &ApiKey);

    /// Forgets the credential, following requests fail with `Unconfigured`.
    fn unconfigure(&mut self);

    fn is_configured(&self) -> bool;

    /// Sends the last of `turns` as the new message, with every earlier turn
    /// as history and `system_prompt` as the system instruction. Each call
    /// builds a fresh request; there is exactly one attempt and no retry.
    async fn generate(
        &self,
        model: &str,
        turns: &[Turn],
        system_prompt: &str,
    ) -> Result<String, GatewayError>;

    /// Lists model ids that support text generation, sorted.
    async fn list_models(&self) -> Result<Vec<String>, GatewayError>;
}

pub type GatewayBox = Box<dyn ModelGateway + Send + Sync>;
