use std::sync::Arc;

use teloxide::{
    dispatching::{
        dialogue::{self, GetChatId, InMemStorage},
        UpdateFilterExt, UpdateHandler,
    },
    dptree,
    prelude::Requester,
    types::{CallbackQuery, Message, Update},
    Bot,
};
use tracing::{instrument, warn};

use crate::{
    commands::{self, cancel, help, start, Command},
    gpt::{ChatGpt, Conversation},
    keyboard::Callback,
    messenger::{MessageRef, Target},
    runner::QuizRunner,
    score::Scoreboard,
    state::{ActiveQuestion, ChatState},
    talk::{Character, TalkRunner},
    topics::TopicDescriptor,
    HandlerResult, UserDialogue,
};

pub type BotQuiz = QuizRunner<Bot, ChatGpt>;
pub type BotTalk = TalkRunner<Bot, ChatGpt>;

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Quiz].endpoint(commands::quiz))
        .branch(case![Command::Talk].endpoint(commands::talk))
        .branch(case![Command::Cancel].endpoint(cancel));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(
            case![ChatState::AnsweringQuestion {
                score,
                topic,
                question
            }]
            .endpoint(receive_answer),
        )
        .branch(
            case![ChatState::Talking {
                character,
                conversation
            }]
            .endpoint(receive_talk_message),
        )
        .endpoint(invalid_state);

    let callback_handler = Update::filter_callback_query().endpoint(receive_callback);

    dialogue::enter::<Update, InMemStorage<ChatState>, ChatState, _>()
        .branch(message_handler)
        .branch(callback_handler)
}

async fn receive_answer(
    msg: Message,
    dialogue: UserDialogue,
    (score, topic, question): (Scoreboard, TopicDescriptor, ActiveQuestion),
    quiz: Arc<BotQuiz>,
) -> HandlerResult {
    quiz.answer(
        &dialogue,
        msg.chat.id,
        msg.text().unwrap_or_default(),
        score,
        topic,
        question,
    )
    .await
}

async fn receive_talk_message(
    msg: Message,
    dialogue: UserDialogue,
    (character, conversation): (Character, Conversation),
    talk: Arc<BotTalk>,
) -> HandlerResult {
    talk.reply(
        &dialogue,
        msg.chat.id,
        msg.text().unwrap_or_default(),
        character,
        conversation,
    )
    .await
}

#[instrument(level = "info", skip_all, fields(data = ?q.data))]
async fn receive_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: UserDialogue,
    state: ChatState,
    quiz: Arc<BotQuiz>,
    talk: Arc<BotTalk>,
) -> HandlerResult {
    bot.answer_callback_query(&q.id).await?;

    let Some(chat_id) = q.chat_id() else {
        warn!("callback without a chat");
        return Ok(());
    };
    let message = q
        .message
        .as_ref()
        .and_then(|message| message.regular_message())
        .map(MessageRef::from);
    let target = Target { chat_id, message };

    match q.data.as_deref().and_then(Callback::parse) {
        Some(Callback::OpenQuiz) | Some(Callback::ChangeTopic) => {
            quiz.start(&dialogue, target).await
        }
        Some(Callback::Topic(key)) => quiz.select_topic(&dialogue, target, state, &key).await,
        Some(Callback::Continue(key)) => {
            quiz.next_question(&dialogue, target, state, &key).await
        }
        Some(Callback::Finish) => quiz.finish(&dialogue, target, state).await,
        Some(Callback::OpenTalk) => talk.open_menu(&dialogue, target).await,
        Some(Callback::Character(key)) => talk.select_character(&dialogue, target, &key).await,
        None => {
            warn!("unknown callback data");
            Ok(())
        }
    }
}

async fn invalid_state(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(
        msg.chat.id,
        "Unable to handle the message. Enter /help to see usages.",
    )
    .await?;
    Ok(())
}
