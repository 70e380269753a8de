use state::ChatState;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::Dialogue};

pub mod answer;
pub mod commands;
pub mod config;
pub mod error;
pub mod gpt;
pub mod keyboard;
pub mod messenger;
pub mod runner;
pub mod schema;
pub mod score;
pub mod state;
pub mod talk;
pub mod topics;

pub type UserDialogue = Dialogue<ChatState, InMemStorage<ChatState>>;
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
