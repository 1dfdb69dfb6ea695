use serde::{Deserialize, Serialize};

/// A reference passage paired with its embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub position: usize,
    pub text: String,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// The composed request for one test case: a system and a user message.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub messages: Vec<ChatMessage>,
}

impl PromptRequest {
    pub fn system_text(&self) -> Option<&str> {
        self.content_for(Role::System)
    }

    pub fn user_text(&self) -> Option<&str> {
        self.content_for(Role::User)
    }

    fn content_for(&self, role: Role) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == role)
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub text: String,
    /// Model id echoed back by the service, if any.
    pub model: Option<String>,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }
}
