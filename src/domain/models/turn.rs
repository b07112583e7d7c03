#[cfg(test)]
#[path = "turn_test.rs"]
mod tests;

use chrono::Utc;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::Role;

/// A single message in the conversation. Turns are never edited after
/// creation, a new one is appended instead.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    id: String,
    role: Role,
    content: String,
    /// Milliseconds since the unix epoch.
    timestamp: i64,
}

impl Turn {
    pub fn new(role: Role, content: &str) -> Turn {
        return Turn {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };
    }

    pub fn user(content: &str) -> Turn {
        return Turn::new(Role::User, content);
    }

    pub fn model(content: &str) -> Turn {
        return Turn::new(Role::Model, content);
    }

    pub fn id(&self) -> &str {
        return &self.id;
    }

    pub fn role(&self) -> Role {
        return self.role;
    }

    pub fn content(&self) -> &str {
        return &self.content;
    }

    pub fn timestamp(&self) -> i64 {
        return self.timestamp;
    }
}
