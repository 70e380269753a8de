//! Outbound side of the chat platform.
//!
//! Controllers only talk to Telegram through [`Messenger`], so flows can be
//! driven in tests by a recording implementation.

use std::{future::Future, path::Path};

use teloxide::{
    payloads::{
        EditMessageCaptionSetters, EditMessageTextSetters, SendMessageSetters, SendPhotoSetters,
    },
    prelude::Requester,
    types::{ChatAction, ChatId, InlineKeyboardMarkup, InputFile, Message, MessageId, ParseMode},
    Bot, RequestError,
};
use tracing::warn;

/// An already delivered message that can be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub id: MessageId,
    pub has_photo: bool,
}

impl From<&Message> for MessageRef {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            has_photo: message.photo().is_some(),
        }
    }
}

/// Where a reply goes: a chat and, for button presses, the message that
/// carried the button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub chat_id: ChatId,
    pub message: Option<MessageRef>,
}

impl Target {
    pub fn chat(chat_id: ChatId) -> Self {
        Self {
            chat_id,
            message: None,
        }
    }

    pub fn message(chat_id: ChatId, message: MessageRef) -> Self {
        Self {
            chat_id,
            message: Some(message),
        }
    }
}

/// All texts are sent with HTML parse mode.
pub trait Messenger: Send + Sync {
    fn render_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> impl Future<Output = Result<MessageId, RequestError>> + Send;

    fn render_photo(
        &self,
        chat_id: ChatId,
        image: &Path,
        caption: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> impl Future<Output = Result<MessageId, RequestError>> + Send;

    /// Replaces the text, or the caption of a photo message.
    fn edit_message(
        &self,
        chat_id: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> impl Future<Output = Result<(), RequestError>> + Send;

    fn show_typing(&self, chat_id: ChatId) -> impl Future<Output = Result<(), RequestError>> + Send;
}

impl Messenger for Bot {
    async fn render_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, RequestError> {
        let mut request = self.send_message(chat_id, text).parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        Ok(request.await?.id)
    }

    async fn render_photo(
        &self,
        chat_id: ChatId,
        image: &Path,
        caption: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, RequestError> {
        let mut request = self
            .send_photo(chat_id, InputFile::file(image.to_path_buf()))
            .caption(caption)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        Ok(request.await?.id)
    }

    async fn edit_message(
        &self,
        chat_id: ChatId,
        message: MessageRef,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        if message.has_photo {
            let mut request = self
                .edit_message_caption(chat_id, message.id)
                .caption(text)
                .parse_mode(ParseMode::Html);
            if let Some(keyboard) = keyboard {
                request = request.reply_markup(keyboard);
            }
            request.await?;
        } else {
            let mut request = self
                .edit_message_text(chat_id, message.id, text)
                .parse_mode(ParseMode::Html);
            if let Some(keyboard) = keyboard {
                request = request.reply_markup(keyboard);
            }
            request.await?;
        }
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), RequestError> {
        Requester::delete_message(self, chat_id, message_id).await?;
        Ok(())
    }

    async fn show_typing(&self, chat_id: ChatId) -> Result<(), RequestError> {
        self.send_chat_action(chat_id, ChatAction::Typing).await?;
        Ok(())
    }
}

/// Edits the target message when there is one, otherwise sends a new
/// message. Returns a target pointing at the message now showing `text`.
pub async fn show<M: Messenger>(
    messenger: &M,
    target: Target,
    text: &str,
    keyboard: Option<InlineKeyboardMarkup>,
) -> Result<Target, RequestError> {
    match target.message {
        Some(message) => {
            messenger
                .edit_message(target.chat_id, message, text, keyboard)
                .await?;
            Ok(target)
        }
        None => {
            let id = messenger.render_text(target.chat_id, text, keyboard).await?;
            Ok(Target::message(
                target.chat_id,
                MessageRef {
                    id,
                    has_photo: false,
                },
            ))
        }
    }
}

/// Renders a menu, as a photo when `image` exists on disk. A menu opened
/// from a button replaces the button's message.
pub async fn present_menu<M: Messenger>(
    messenger: &M,
    target: Target,
    image: Option<&Path>,
    text: &str,
    keyboard: InlineKeyboardMarkup,
) -> Result<(), RequestError> {
    let image = image.filter(|path| path.exists());
    match (target.message, image) {
        (Some(message), Some(image)) => {
            messenger.delete_message(target.chat_id, message.id).await?;
            messenger
                .render_photo(target.chat_id, image, text, Some(keyboard))
                .await?;
        }
        (Some(message), None) => {
            messenger
                .edit_message(target.chat_id, message, text, Some(keyboard))
                .await?;
        }
        (None, Some(image)) => {
            messenger
                .render_photo(target.chat_id, image, text, Some(keyboard))
                .await?;
        }
        (None, None) => {
            messenger
                .render_text(target.chat_id, text, Some(keyboard))
                .await?;
        }
    }
    Ok(())
}

/// Best-effort error notice: edits the target, falls back to a new message.
pub async fn report<M: Messenger>(messenger: &M, target: Target, text: &str) {
    if let Some(message) = target.message {
        match messenger.edit_message(target.chat_id, message, text, None).await {
            Ok(()) => return,
            Err(err) => warn!(%err, "failed to edit message with error notice"),
        }
    }
    if let Err(err) = messenger.render_text(target.chat_id, text, None).await {
        warn!(%err, "failed to send error notice");
    }
}
