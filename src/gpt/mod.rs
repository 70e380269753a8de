pub mod client;
pub mod conversation;

pub use client::{ChatGpt, Completion};
pub use conversation::{ChatMessage, Conversation, Role};
