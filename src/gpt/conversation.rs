use serde::Serialize;

use super::client::Completion;
use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, role-tagged history of one chat with the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn with_prompt(prompt: impl Into<String>) -> Self {
        let mut conversation = Self::default();
        conversation.set_prompt(prompt);
        conversation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Clears the history and seeds it with a system prompt.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.messages.clear();
        self.messages.push(ChatMessage::system(prompt));
    }

    /// Single-shot request: the history becomes exactly `system` + `user`
    /// (plus the reply on success).
    pub async fn generate<G: Completion>(
        &mut self,
        gateway: &G,
        system: &str,
        user: &str,
    ) -> Result<String, GatewayError> {
        self.set_prompt(system);
        self.messages.push(ChatMessage::user(user));
        self.send(gateway).await
    }

    /// Appends `text` and asks for the next reply. On failure the history is
    /// left as it was before the call.
    pub async fn continue_conversation<G: Completion>(
        &mut self,
        gateway: &G,
        text: &str,
    ) -> Result<String, GatewayError> {
        self.messages.push(ChatMessage::user(text));
        let reply = self.send(gateway).await;
        if reply.is_err() {
            self.messages.pop();
        }
        reply
    }

    async fn send<G: Completion>(&mut self, gateway: &G) -> Result<String, GatewayError> {
        let reply = gateway.complete(&self.messages).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }

        self.messages.push(ChatMessage::assistant(reply));
        Ok(reply.to_owned())
    }
}
