//! Quiz conversation: topic menu, generated questions, graded answers and
//! the final summary.

use std::{path::PathBuf, sync::Arc};

use teloxide::{types::ChatId, utils::html};
use tracing::{error, info, instrument, warn};

use crate::{
    answer::{self, Letter},
    error::QuizError,
    gpt::{Completion, Conversation},
    keyboard::{continue_keyboard, quiz_again_keyboard, topics_keyboard},
    messenger::{present_menu, report, show, Messenger, Target},
    score::Scoreboard,
    state::{end_session, ActiveQuestion, ChatState},
    topics::{TopicDescriptor, TopicStore},
    HandlerResult, UserDialogue,
};

pub const ERROR_MESSAGE: &str =
    "😔 Something went wrong. Please try again later or use /quiz to restart.";
pub const START_ERROR: &str = "😔 Failed to start the quiz. Please try again later.";
pub const GENERATION_ERROR: &str = "😔 Failed to generate a question. Please try again.";
pub const ANSWER_ERROR: &str = "😔 Failed to check your answer. Please try again.";
pub const INVALID_ANSWER: &str = "❌ Please reply with a single letter: A, B, C or D";

const QUESTION_REQUEST: &str = "Create a quiz question";
const EXPLAINER_PROMPT: &str =
    "You are a quiz expert who explains answers in a clear and engaging way.";

pub struct QuizRunner<M, G> {
    messenger: M,
    gateway: Arc<G>,
    topics: Arc<TopicStore>,
    menu_image: Option<PathBuf>,
}

impl<M: Messenger, G: Completion> QuizRunner<M, G> {
    pub fn new(messenger: M, gateway: Arc<G>, topics: Arc<TopicStore>) -> Self {
        Self {
            messenger,
            gateway,
            topics,
            menu_image: None,
        }
    }

    pub fn with_menu_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.menu_image = Some(path.into());
        self
    }

    /// `/quiz`, the main-menu quiz button and "change topic": resets the
    /// counters and shows the topic menu.
    #[instrument(level = "info", skip(self, dialogue))]
    pub async fn start(&self, dialogue: &UserDialogue, target: Target) -> HandlerResult {
        info!("starting quiz");
        if let Err(err) = self.show_topic_menu(dialogue, target).await {
            error!(%err, "failed to start quiz");
            report(&self.messenger, target, START_ERROR).await;
            end_session(dialogue).await?;
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self, dialogue, state))]
    pub async fn select_topic(
        &self,
        dialogue: &UserDialogue,
        target: Target,
        state: ChatState,
        key: &str,
    ) -> HandlerResult {
        // A stale menu can outlive the session, so the key is checked first.
        let outcome = match (self.topics.get(key), state) {
            (None, _) => Err(QuizError::TopicNotFound(key.to_owned())),
            (Some(topic), ChatState::SelectingTopic { score }) => {
                info!(topic = topic.key, "topic selected");
                self.ask_question(dialogue, target, score, topic).await
            }
            (Some(_), _) => Err(QuizError::MissingSession),
        };

        if let Err(err) = outcome {
            self.abort(dialogue, target, err, GENERATION_ERROR).await?;
        }
        Ok(())
    }

    /// "Next question": a fresh question on the stored topic, counters kept.
    #[instrument(level = "info", skip(self, dialogue, state))]
    pub async fn next_question(
        &self,
        dialogue: &UserDialogue,
        target: Target,
        state: ChatState,
        key: &str,
    ) -> HandlerResult {
        let outcome = match state {
            ChatState::AnsweringQuestion { score, topic, .. } => {
                if topic.key != key {
                    warn!(stored = topic.key, "continue pressed for another topic");
                }
                self.ask_question(dialogue, target, score, topic).await
            }
            _ => Err(QuizError::MissingSession),
        };

        if let Err(err) = outcome {
            self.abort(dialogue, target, err, GENERATION_ERROR).await?;
        }
        Ok(())
    }

    /// Grades a free-text reply. Malformed replies are re-prompted and leave
    /// the state untouched.
    #[instrument(level = "info", skip(self, dialogue, topic, question))]
    pub async fn answer(
        &self,
        dialogue: &UserDialogue,
        chat_id: ChatId,
        reply: &str,
        mut score: Scoreboard,
        topic: TopicDescriptor,
        question: ActiveQuestion,
    ) -> HandlerResult {
        let Some(letter) = Letter::parse(reply) else {
            info!("malformed answer");
            self.messenger.render_text(chat_id, INVALID_ANSWER, None).await?;
            return Ok(());
        };

        let is_correct = letter == question.correct;
        score.record(is_correct);
        info!(%letter, correct = %question.correct, is_correct, %score, "answer graded");
        dialogue
            .update(ChatState::AnsweringQuestion {
                score,
                topic,
                question: question.clone(),
            })
            .await?;

        if let Err(err) = self
            .explain(chat_id, letter, score, &topic, &question)
            .await
        {
            error!(%err, "failed to explain answer");
            self.messenger.render_text(chat_id, ANSWER_ERROR, None).await?;
        }
        Ok(())
    }

    #[instrument(level = "info", skip(self, dialogue, state))]
    pub async fn finish(
        &self,
        dialogue: &UserDialogue,
        target: Target,
        state: ChatState,
    ) -> HandlerResult {
        let Some(score) = state.scoreboard() else {
            return self
                .abort(dialogue, target, QuizError::MissingSession, ERROR_MESSAGE)
                .await;
        };

        info!(%score, percentage = score.percentage(), "quiz finished");
        let summary = render_summary(score);
        if let Err(err) = show(&self.messenger, target, &summary, Some(quiz_again_keyboard())).await
        {
            error!(%err, "failed to show quiz summary");
        }
        end_session(dialogue).await?;
        Ok(())
    }

    async fn show_topic_menu(&self, dialogue: &UserDialogue, target: Target) -> Result<(), QuizError> {
        present_menu(
            &self.messenger,
            target,
            self.menu_image.as_deref(),
            &self.topics.menu_text(),
            topics_keyboard(&self.topics),
        )
        .await?;
        dialogue
            .update(ChatState::SelectingTopic {
                score: Scoreboard::default(),
            })
            .await?;
        Ok(())
    }

    async fn ask_question(
        &self,
        dialogue: &UserDialogue,
        target: Target,
        score: Scoreboard,
        topic: TopicDescriptor,
    ) -> Result<(), QuizError> {
        let waiting = format!("{} Generating a question about {}... ⏳", topic.emoji, topic.name);
        let target = show(&self.messenger, target, &waiting, None).await?;

        let text = Conversation::default()
            .generate(self.gateway.as_ref(), topic.prompt, QUESTION_REQUEST)
            .await?;
        let question = ActiveQuestion::new(text);
        info!(correct = %question.correct, "question generated");

        show(
            &self.messenger,
            target,
            &render_question(&topic, &question, score),
            None,
        )
        .await?;
        dialogue
            .update(ChatState::AnsweringQuestion {
                score,
                topic,
                question,
            })
            .await?;
        Ok(())
    }

    async fn explain(
        &self,
        chat_id: ChatId,
        letter: Letter,
        score: Scoreboard,
        topic: &TopicDescriptor,
        question: &ActiveQuestion,
    ) -> Result<(), QuizError> {
        self.messenger.show_typing(chat_id).await?;
        let waiting = self
            .messenger
            .render_text(chat_id, &format!("{} Checking your answer... ⏳", topic.emoji), None)
            .await?;

        let request = explanation_request(&question.text, letter, question.correct);
        let explanation = Conversation::default()
            .generate(self.gateway.as_ref(), EXPLAINER_PROMPT, &request)
            .await;

        if let Err(err) = self.messenger.delete_message(chat_id, waiting).await {
            warn!(%err, "failed to delete progress message");
        }
        let explanation = explanation?;

        let verdict = if letter == question.correct {
            format!("✅ <b>Correct!</b>\n\n{}", html::escape(&explanation))
        } else {
            format!(
                "❌ <b>Incorrect!</b>\n\nCorrect answer: <b>{}</b>\n\n{}",
                question.correct,
                html::escape(&explanation)
            )
        };
        let text = format!(
            "{} <b>Quiz result</b>\n\n{verdict}\n\n📊 <b>Your score:</b> {score}",
            topic.emoji
        );

        self.messenger
            .render_text(chat_id, &text, Some(continue_keyboard(topic.key)))
            .await?;
        Ok(())
    }

    /// Ends the conversation after an unrecoverable error.
    async fn abort(
        &self,
        dialogue: &UserDialogue,
        target: Target,
        err: QuizError,
        fallback: &str,
    ) -> HandlerResult {
        match &err {
            QuizError::TopicNotFound(_) | QuizError::MissingSession => warn!(%err, "quiz ended"),
            _ => error!(%err, "quiz ended"),
        }
        report(&self.messenger, target, err.user_message().unwrap_or(fallback)).await;
        end_session(dialogue).await?;
        Ok(())
    }
}

fn render_question(topic: &TopicDescriptor, question: &ActiveQuestion, score: Scoreboard) -> String {
    format!(
        "{} <b>Quiz: {}</b>\n\n{}\n\n📊 <b>Score:</b> {score}\n\n✍️ Reply with your answer (A, B, C or D):",
        topic.emoji,
        topic.name,
        html::escape(&answer::redact(&question.text)),
    )
}

fn explanation_request(question: &str, given: Letter, correct: Letter) -> String {
    format!(
        "The user answered '{given}' to the question:\n{question}\n\nCorrect answer: {correct}\n\n\
         Give a short explanation (2-3 sentences) of why the answer is right or wrong, \
         and add an interesting fact about the topic."
    )
}

fn render_summary(score: Scoreboard) -> String {
    let grade = score.grade();
    format!(
        "{} <b>Quiz complete!</b>\n\n📊 <b>Final result:</b>\nCorrect answers: {} of {}\n\
         Percentage: {}%\n\n<b>{}</b>\n\nThanks for playing! 🎉",
        grade.emoji(),
        score.score(),
        score.total(),
        score.percentage(),
        grade.label(),
    )
}
