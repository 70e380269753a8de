#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::Path,
    sync::{
        atomic::{AtomicI32, Ordering},
        Arc, Mutex,
    },
};

use gptquizbot::{
    error::GatewayError,
    gpt::{ChatMessage, Completion},
    messenger::{MessageRef, Messenger, Target},
    state::ChatState,
    UserDialogue,
};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    types::{ChatId, InlineKeyboardButtonKind, InlineKeyboardMarkup, MessageId},
    RequestError,
};

pub const CHAT: ChatId = ChatId(42);

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { text: String, buttons: Vec<String> },
    Photo { caption: String, buttons: Vec<String> },
    Edit { id: i32, text: String, buttons: Vec<String> },
    Delete(i32),
    Typing,
}

impl Sent {
    pub fn text(&self) -> &str {
        match self {
            Sent::Text { text, .. } | Sent::Edit { text, .. } => text,
            Sent::Photo { caption, .. } => caption,
            Sent::Delete(_) | Sent::Typing => "",
        }
    }

    pub fn buttons(&self) -> &[String] {
        match self {
            Sent::Text { buttons, .. } | Sent::Photo { buttons, .. } | Sent::Edit { buttons, .. } => {
                buttons
            }
            Sent::Delete(_) | Sent::Typing => &[],
        }
    }
}

fn callback_data(keyboard: Option<InlineKeyboardMarkup>) -> Vec<String> {
    keyboard
        .map(|markup| {
            markup
                .inline_keyboard
                .into_iter()
                .flatten()
                .filter_map(|button| match button.kind {
                    InlineKeyboardButtonKind::CallbackData(data) => Some(data),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Records everything the bot would have sent to Telegram.
#[derive(Clone)]
pub struct RecordingMessenger {
    sent: Arc<Mutex<Vec<Sent>>>,
    next_id: Arc<AtomicI32>,
}

impl Default for RecordingMessenger {
    fn default() -> Self {
        Self {
            sent: Arc::default(),
            next_id: Arc::new(AtomicI32::new(100)),
        }
    }
}

impl RecordingMessenger {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Sent {
        self.sent().last().cloned().expect("nothing was sent")
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }

    fn push(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }

    fn next_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl Messenger for RecordingMessenger {
    async fn render_text(
        &self,
        _chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, RequestError> {
        self.push(Sent::Text {
            text: text.to_owned(),
            buttons: callback_data(keyboard),
        });
        Ok(self.next_id())
    }

    async fn render_photo(
        &self,
        _chat_id: ChatId,
        _image: &Path,
        caption: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, RequestError> {
        self.push(Sent::Photo {
            caption: caption.to_owned(),
            buttons: callback_data(keyboard),
        });
        Ok(self.next_id())
    }

    async fn edit_message(
        &self,
        _chat_id: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        self.push(Sent::Edit {
            id: message.id.0,
            text: text.to_owned(),
            buttons: callback_data(keyboard),
        });
        Ok(())
    }

    async fn delete_message(&self, _chat_id: ChatId, message_id: MessageId) -> Result<(), RequestError> {
        self.push(Sent::Delete(message_id.0));
        Ok(())
    }

    async fn show_typing(&self, _chat_id: ChatId) -> Result<(), RequestError> {
        self.push(Sent::Typing);
        Ok(())
    }
}

/// Replays canned replies in order and records every request.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedGateway {
    pub fn reply(&self, text: &str) -> &Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_owned()));
        self
    }

    pub fn fail(&self) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(GatewayError::EmptyResponse));
        self
    }

    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Completion for ScriptedGateway {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GatewayError::EmptyResponse))
    }
}

pub fn dialogue() -> UserDialogue {
    UserDialogue::new(InMemStorage::<ChatState>::new(), CHAT)
}

pub async fn state(dialogue: &UserDialogue) -> Option<ChatState> {
    dialogue.get().await.unwrap()
}

/// A button press on the message with the given id.
pub fn pressed(id: i32) -> Target {
    Target::message(
        CHAT,
        MessageRef {
            id: MessageId(id),
            has_photo: false,
        },
    )
}
