#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::fmt;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use thiserror::Error;

use super::Persona;

/// Shortest string accepted as an API key. Nothing else about the key is
/// checked locally, the remote API is the source of truth.
pub const MIN_API_KEY_LENGTH: usize = 30;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid API Key format")]
    Format,
    #[error("A message is still being sent, try again once it completes")]
    Busy,
    #[error("Failed to update stored configuration: {0}")]
    Storage(String),
}

/// A credential that passed the local shape check.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn parse(text: &str) -> Result<ApiKey, CredentialError> {
        let key = text.trim();
        if key.chars().count() < MIN_API_KEY_LENGTH {
            return Err(CredentialError::Format);
        }

        return Ok(ApiKey(key.to_string()));
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }

    /// Shows the first and last four characters only.
    pub fn masked(&self) -> String {
        let chars = self.0.chars().collect::<Vec<char>>();
        let head = chars[..4].iter().collect::<String>();
        let tail = chars[chars.len() - 4..].iter().collect::<String>();
        return format!("{head}...{tail}");
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "ApiKey({})", self.masked());
    }
}

/// The persisted record, `{"apiKey": "...", "selectedPersona": "ASSISTANT"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfiguration {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub selected_persona: Persona,
}

impl SessionConfiguration {
    pub fn new(api_key: &ApiKey, selected_persona: Persona) -> SessionConfiguration {
        return SessionConfiguration {
            api_key: api_key.as_str().to_string(),
            selected_persona,
        };
    }

    /// The stored key, if it still passes the shape check.
    pub fn valid_api_key(&self) -> Option<ApiKey> {
        return ApiKey::parse(&self.api_key).ok();
    }
}
