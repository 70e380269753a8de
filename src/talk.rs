//! Free chat with a famous person, backed by a per-chat conversation history.

use std::{path::PathBuf, sync::Arc};

use teloxide::{types::ChatId, utils::html};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    gpt::{Completion, Conversation},
    keyboard::characters_keyboard,
    messenger::{present_menu, report, show, MessageRef, Messenger, Target},
    state::{end_session, ChatState},
    HandlerResult, UserDialogue,
};

pub const TALK_ERROR: &str = "😔 No reply this time. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Character {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
}

pub const CHARACTERS: &[Character] = &[
    Character {
        key: "grande",
        name: "Ariana Grande",
        emoji: "🎵",
    },
    Character {
        key: "robbie",
        name: "Margot Robbie",
        emoji: "🎬",
    },
    Character {
        key: "zendaya",
        name: "Zendaya",
        emoji: "✨",
    },
    Character {
        key: "gosling",
        name: "Ryan Gosling",
        emoji: "🎭",
    },
    Character {
        key: "hardy",
        name: "Tom Hardy",
        emoji: "🎪",
    },
];

impl Character {
    pub fn find(key: &str) -> Option<Self> {
        CHARACTERS.iter().find(|c| c.key == key).copied()
    }

    fn fallback_prompt(&self) -> String {
        format!(
            "You are {}. Speak in the first person, using their characteristic phrases and manner of speech.",
            self.name
        )
    }
}

pub struct TalkRunner<M, G> {
    messenger: M,
    gateway: Arc<G>,
    characters_dir: PathBuf,
    menu_image: Option<PathBuf>,
}

impl<M: Messenger, G: Completion> TalkRunner<M, G> {
    pub fn new(messenger: M, gateway: Arc<G>, characters_dir: impl Into<PathBuf>) -> Self {
        Self {
            messenger,
            gateway,
            characters_dir: characters_dir.into(),
            menu_image: None,
        }
    }

    pub fn with_menu_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.menu_image = Some(path.into());
        self
    }

    #[instrument(level = "info", skip(self, dialogue))]
    pub async fn open_menu(&self, dialogue: &UserDialogue, target: Target) -> HandlerResult {
        end_session(dialogue).await?;
        present_menu(
            &self.messenger,
            target,
            self.menu_image.as_deref(),
            "💬 <b>Talk to a star</b>\n\nWho would you like to chat with?",
            characters_keyboard(CHARACTERS),
        )
        .await?;
        Ok(())
    }

    #[instrument(level = "info", skip(self, dialogue))]
    pub async fn select_character(
        &self,
        dialogue: &UserDialogue,
        target: Target,
        key: &str,
    ) -> HandlerResult {
        let Some(character) = Character::find(key) else {
            warn!("unknown character");
            report(&self.messenger, target, "❌ Unknown character.").await;
            return Ok(());
        };

        let conversation = Conversation::with_prompt(self.load_prompt(&character).await);
        show(
            &self.messenger,
            target,
            &format!(
                "{} You are now chatting with <b>{}</b>. Say hi!",
                character.emoji, character.name
            ),
            None,
        )
        .await?;
        dialogue
            .update(ChatState::Talking {
                character,
                conversation,
            })
            .await?;
        info!(character = character.key, "character selected");
        Ok(())
    }

    /// Forwards a message to the character. The history only grows when a
    /// reply arrives.
    #[instrument(level = "info", skip(self, dialogue, text, conversation))]
    pub async fn reply(
        &self,
        dialogue: &UserDialogue,
        chat_id: ChatId,
        text: &str,
        character: Character,
        mut conversation: Conversation,
    ) -> HandlerResult {
        if text.trim().is_empty() {
            self.messenger
                .render_text(chat_id, "✍️ Please send a text message.", None)
                .await?;
            return Ok(());
        }

        self.messenger.show_typing(chat_id).await?;
        let placeholder = MessageRef {
            id: self.messenger.render_text(chat_id, "typing...", None).await?,
            has_photo: false,
        };

        match conversation
            .continue_conversation(self.gateway.as_ref(), text)
            .await
        {
            Ok(answer) => {
                self.messenger
                    .edit_message(chat_id, placeholder, &html::escape(&answer), None)
                    .await?;
                dialogue
                    .update(ChatState::Talking {
                        character,
                        conversation,
                    })
                    .await?;
            }
            Err(err) => {
                error!(%err, "character reply failed");
                report(&self.messenger, Target::message(chat_id, placeholder), TALK_ERROR).await;
            }
        }
        Ok(())
    }

    async fn load_prompt(&self, character: &Character) -> String {
        let path = self.characters_dir.join(format!("{}.txt", character.key));
        match tokio::fs::read_to_string(&path).await {
            Ok(prompt) if !prompt.trim().is_empty() => prompt.trim().to_owned(),
            Ok(_) => character.fallback_prompt(),
            Err(err) => {
                debug!(%err, path = %path.display(), "using built-in character prompt");
                character.fallback_prompt()
            }
        }
    }
}
