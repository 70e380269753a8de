use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{Message, ParseMode},
    utils::command::BotCommands,
    Bot,
};
use tracing::instrument;

use crate::{
    keyboard::main_menu_keyboard,
    messenger::Target,
    schema::{BotQuiz, BotTalk},
    state::end_session,
    HandlerResult, UserDialogue,
};

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display help.")]
    Help,
    #[command(description = "open the main menu.")]
    Start,
    #[command(description = "start a quiz.")]
    Quiz,
    #[command(description = "chat with a famous person.")]
    Talk,
    #[command(description = "cancel the current conversation.")]
    Cancel,
}

pub(crate) async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

#[instrument(level = "info", skip(bot, dialogue, msg), fields(chat_id = msg.chat.id.0))]
pub(crate) async fn start(bot: Bot, msg: Message, dialogue: UserDialogue) -> HandlerResult {
    end_session(&dialogue).await?;
    bot.send_message(
        msg.chat.id,
        "👋 <b>Hi!</b> I can quiz you on a topic of your choice or let you chat with a star.\n\nWhat would you like to do?",
    )
    .parse_mode(ParseMode::Html)
    .reply_markup(main_menu_keyboard())
    .await?;
    Ok(())
}

pub(crate) async fn cancel(bot: Bot, dialogue: UserDialogue, msg: Message) -> HandlerResult {
    end_session(&dialogue).await?;
    bot.send_message(msg.chat.id, "Cancelling dialogue").await?;
    Ok(())
}

pub(crate) async fn quiz(msg: Message, dialogue: UserDialogue, quiz: Arc<BotQuiz>) -> HandlerResult {
    quiz.start(&dialogue, Target::chat(msg.chat.id)).await
}

pub(crate) async fn talk(msg: Message, dialogue: UserDialogue, talk: Arc<BotTalk>) -> HandlerResult {
    talk.open_menu(&dialogue, Target::chat(msg.chat.id)).await
}
