use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::{talk::Character, topics::TopicStore};

const TOPIC_PREFIX: &str = "quiz_topic_";
const CONTINUE_PREFIX: &str = "quiz_continue_";
const CHANGE_TOPIC: &str = "quiz_change_topic";
const FINISH: &str = "quiz_finish";
const OPEN_QUIZ: &str = "quiz_interface";
const OPEN_TALK: &str = "talk_interface";
const CHARACTER_PREFIX: &str = "talk_";

/// Button callback data understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    OpenQuiz,
    Topic(String),
    Continue(String),
    ChangeTopic,
    Finish,
    OpenTalk,
    Character(String),
}

impl Callback {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            CHANGE_TOPIC => return Some(Callback::ChangeTopic),
            FINISH => return Some(Callback::Finish),
            OPEN_QUIZ => return Some(Callback::OpenQuiz),
            OPEN_TALK => return Some(Callback::OpenTalk),
            _ => {}
        }

        if let Some(key) = data.strip_prefix(TOPIC_PREFIX) {
            Some(Callback::Topic(key.to_owned()))
        } else if let Some(key) = data.strip_prefix(CONTINUE_PREFIX) {
            Some(Callback::Continue(key.to_owned()))
        } else {
            data.strip_prefix(CHARACTER_PREFIX)
                .filter(|key| !key.is_empty())
                .map(|key| Callback::Character(key.to_owned()))
        }
    }

    pub fn data(&self) -> String {
        match self {
            Callback::OpenQuiz => OPEN_QUIZ.to_owned(),
            Callback::Topic(key) => format!("{TOPIC_PREFIX}{key}"),
            Callback::Continue(key) => format!("{CONTINUE_PREFIX}{key}"),
            Callback::ChangeTopic => CHANGE_TOPIC.to_owned(),
            Callback::Finish => FINISH.to_owned(),
            Callback::OpenTalk => OPEN_TALK.to_owned(),
            Callback::Character(key) => format!("{CHARACTER_PREFIX}{key}"),
        }
    }
}

fn button(text: impl Into<String>, callback: Callback) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, callback.data())
}

pub(crate) fn topics_keyboard(topics: &TopicStore) -> InlineKeyboardMarkup {
    let keyboard = topics.list().iter().map(|topic| {
        vec![button(
            format!("{} {}", topic.emoji, topic.name),
            Callback::Topic(topic.key.to_owned()),
        )]
    });

    InlineKeyboardMarkup::new(keyboard)
}

pub(crate) fn continue_keyboard(topic_key: &str) -> InlineKeyboardMarkup {
    let keyboard = vec![
        vec![button(
            "➡️ Next question",
            Callback::Continue(topic_key.to_owned()),
        )],
        vec![
            button("🔄 Change topic", Callback::ChangeTopic),
            button("🏁 Finish", Callback::Finish),
        ],
    ];

    InlineKeyboardMarkup::new(keyboard)
}

pub(crate) fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        button("🧠 Quiz", Callback::OpenQuiz),
        button("💬 Talk", Callback::OpenTalk),
    ]])
}

pub(crate) fn quiz_again_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("🧠 Quiz", Callback::OpenQuiz)]])
}

pub(crate) fn characters_keyboard(characters: &[Character]) -> InlineKeyboardMarkup {
    let keyboard = characters.iter().map(|character| {
        vec![button(
            format!("{} {}", character.name, character.emoji),
            Callback::Character(character.key.to_owned()),
        )]
    });

    InlineKeyboardMarkup::new(keyboard)
}
