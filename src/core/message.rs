use serde::{Deserialize, Serialize};

/// Who authored a message. Serialized the way the backend expects it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Returns a human-readable label for display
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Assistant => "muse",
            Role::System => "system",
        }
    }
}

/// A role-tagged unit of text exchanged between user and assistant.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
