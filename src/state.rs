use teloxide::dispatching::dialogue::InMemStorageError;

use crate::{
    answer::{self, Letter},
    gpt::Conversation,
    score::Scoreboard,
    talk::Character,
    topics::TopicDescriptor,
    UserDialogue,
};

/// Per-chat dialogue state. A chat without stored state is idle.
#[derive(Debug, Clone, Default)]
pub enum ChatState {
    #[default]
    Idle,

    // PART FOR --- QUIZ ---
    SelectingTopic {
        score: Scoreboard,
    },
    AnsweringQuestion {
        score: Scoreboard,
        topic: TopicDescriptor,
        question: ActiveQuestion,
    },

    // PART FOR --- TALK ---
    Talking {
        character: Character,
        conversation: Conversation,
    },
}

impl ChatState {
    pub fn scoreboard(&self) -> Option<Scoreboard> {
        match self {
            ChatState::SelectingTopic { score } | ChatState::AnsweringQuestion { score, .. } => {
                Some(*score)
            }
            _ => None,
        }
    }
}

/// The generated question being answered and its derived key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuestion {
    pub text: String,
    pub correct: Letter,
}

impl ActiveQuestion {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let correct = answer::extract(&text);
        Self { text, correct }
    }
}

/// Drops the chat's stored state. Idle chats have nothing stored.
pub(crate) async fn end_session(dialogue: &UserDialogue) -> Result<(), InMemStorageError> {
    if dialogue.get().await?.is_some() {
        dialogue.exit().await?;
    }
    Ok(())
}
