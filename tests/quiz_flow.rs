mod common;

use std::sync::Arc;

use common::{dialogue, pressed, state, RecordingMessenger, ScriptedGateway, Sent, CHAT};
use gptquizbot::{
    answer::Letter,
    gpt::Role,
    messenger::Target,
    runner::{QuizRunner, ANSWER_ERROR, GENERATION_ERROR, INVALID_ANSWER},
    state::ChatState,
    topics::TopicStore,
    UserDialogue,
};

const PLANTS: &str = "Which gas do plants absorb?\nA) Oxygen\nB) Carbon dioxide\nC) Nitrogen\nD) Helium\nCorrect answer: B";
const ORBIT: &str = "What orbits the Earth?\nA) The Moon\nB) Mars\nC) The Sun\nD) Venus\nAnswer: A";
const WATER: &str = "Water boils at sea level at?\nA) 50°C\nB) 80°C\nC) 100°C\nD) 120°C\nThe correct answer is C";

struct Harness {
    messenger: RecordingMessenger,
    gateway: Arc<ScriptedGateway>,
    quiz: QuizRunner<RecordingMessenger, ScriptedGateway>,
    dialogue: UserDialogue,
}

impl Harness {
    fn new() -> Self {
        let messenger = RecordingMessenger::default();
        let gateway = Arc::new(ScriptedGateway::default());
        let quiz = QuizRunner::new(
            messenger.clone(),
            gateway.clone(),
            Arc::new(TopicStore::builtin()),
        );
        Self {
            messenger,
            gateway,
            quiz,
            dialogue: dialogue(),
        }
    }

    async fn state(&self) -> Option<ChatState> {
        state(&self.dialogue).await
    }

    async fn start(&self) {
        self.quiz
            .start(&self.dialogue, Target::chat(CHAT))
            .await
            .unwrap();
    }

    async fn select(&self, key: &str) {
        let current = self.state().await.unwrap_or_default();
        self.quiz
            .select_topic(&self.dialogue, pressed(100), current, key)
            .await
            .unwrap();
    }

    async fn next(&self) {
        let current = self.state().await.unwrap_or_default();
        self.quiz
            .next_question(&self.dialogue, pressed(200), current, "science")
            .await
            .unwrap();
    }

    async fn answer(&self, reply: &str) {
        let Some(ChatState::AnsweringQuestion {
            score,
            topic,
            question,
        }) = self.state().await
        else {
            panic!("not answering a question");
        };
        self.quiz
            .answer(&self.dialogue, CHAT, reply, score, topic, question)
            .await
            .unwrap();
    }

    async fn finish(&self) {
        let current = self.state().await.unwrap_or_default();
        self.quiz
            .finish(&self.dialogue, pressed(300), current)
            .await
            .unwrap();
    }

    async fn counters(&self) -> (u32, u32) {
        let score = self
            .state()
            .await
            .and_then(|state| state.scoreboard())
            .expect("no quiz session");
        (score.score(), score.total())
    }

    async fn correct_letter(&self) -> Letter {
        match self.state().await {
            Some(ChatState::AnsweringQuestion { question, .. }) => question.correct,
            other => panic!("unexpected state {other:?}"),
        }
    }
}

#[tokio::test]
async fn start_shows_topic_menu_and_zeroes_counters() {
    let h = Harness::new();
    h.start().await;

    let menu = h.messenger.last();
    assert!(matches!(menu, Sent::Text { .. }));
    assert!(menu.text().contains("Choose a topic"));
    assert_eq!(
        menu.buttons(),
        [
            "quiz_topic_programming",
            "quiz_topic_history",
            "quiz_topic_science",
            "quiz_topic_geography",
            "quiz_topic_movies",
        ]
    );
    assert!(matches!(h.state().await, Some(ChatState::SelectingTopic { .. })));
    assert_eq!(h.counters().await, (0, 0));
}

#[tokio::test]
async fn correct_answer_scores_a_point() {
    let h = Harness::new();
    h.gateway
        .reply(PLANTS)
        .reply("Plants take in carbon dioxide for photosynthesis.");

    h.start().await;
    h.select("science").await;

    assert_eq!(h.correct_letter().await, Letter::B);
    let question = h.messenger.last();
    assert_eq!(
        question,
        Sent::Edit {
            id: 100,
            text: question.text().to_owned(),
            buttons: vec![],
        }
    );
    assert!(question.text().contains("Quiz: Science"));
    assert!(question.text().contains("B) Carbon dioxide"));
    assert!(!question.text().contains("Correct answer"));
    assert!(question.text().contains("0/0"));

    let request = &h.gateway.requests()[0];
    assert_eq!(request.len(), 2);
    assert_eq!(request[0].role, Role::System);
    assert_eq!(
        request[0].content,
        TopicStore::builtin().get("science").unwrap().prompt
    );
    assert_eq!(request[1].content, "Create a quiz question");

    h.answer("b").await;

    assert_eq!(h.counters().await, (1, 1));
    let result = h.messenger.last();
    assert!(result.text().contains("✅ <b>Correct!</b>"));
    assert!(result.text().contains("photosynthesis"));
    assert!(result.text().contains("1/1"));
    assert_eq!(
        result.buttons(),
        ["quiz_continue_science", "quiz_change_topic", "quiz_finish"]
    );

    let explanation = &h.gateway.requests()[1];
    assert!(explanation[1].content.contains("answered 'B'"));
    assert!(explanation[1].content.contains("Carbon dioxide"));
}

#[tokio::test]
async fn wrong_answer_reveals_the_key() {
    let h = Harness::new();
    h.gateway.reply(PLANTS).reply("Oxygen is what plants release.");

    h.start().await;
    h.select("science").await;
    h.answer("  a ").await;

    assert_eq!(h.counters().await, (0, 1));
    let result = h.messenger.last();
    assert!(result.text().contains("❌ <b>Incorrect!</b>"));
    assert!(result.text().contains("Correct answer: <b>B</b>"));
    assert!(result.text().contains("0/1"));

    let sent = h.messenger.sent();
    assert!(sent.contains(&Sent::Typing));
    assert!(sent.iter().any(|s| matches!(s, Sent::Delete(_))));
}

#[tokio::test]
async fn malformed_answers_change_nothing() {
    let h = Harness::new();
    h.gateway.reply(PLANTS);
    h.start().await;
    h.select("science").await;
    let requests = h.gateway.requests().len();

    for reply in ["E", "AB", "", "answer b", "1", "b)"] {
        h.answer(reply).await;
        assert_eq!(h.messenger.last().text(), INVALID_ANSWER, "{reply:?}");
        assert_eq!(h.counters().await, (0, 0));
        assert_eq!(h.correct_letter().await, Letter::B);
    }
    assert_eq!(h.gateway.requests().len(), requests);
}

#[tokio::test]
async fn every_valid_answer_counts_once() {
    let h = Harness::new();
    h.start().await;

    let rounds = [(PLANTS, "B", true), (ORBIT, "c", false), (WATER, "c", true), (ORBIT, "A", true)];
    h.gateway.reply(rounds[0].0);
    h.select("science").await;

    for (i, (_, reply, is_correct)) in rounds.iter().enumerate() {
        let (score_before, total_before) = h.counters().await;
        h.gateway.reply("Explanation.");
        h.answer(reply).await;

        let (score, total) = h.counters().await;
        assert_eq!(total, total_before + 1);
        assert_eq!(score, score_before + u32::from(*is_correct));
        assert!(score <= total);

        if let Some((next, _, _)) = rounds.get(i + 1) {
            h.gateway.reply(next);
            h.next().await;
        }
    }

    assert_eq!(h.counters().await, (3, 4));
}

#[tokio::test]
async fn continue_keeps_counters_and_replaces_the_question() {
    let h = Harness::new();
    h.gateway.reply(PLANTS).reply("Explanation.");
    h.start().await;
    h.select("science").await;
    h.answer("B").await;

    for (text, letter) in [(ORBIT, Letter::A), (WATER, Letter::C), (PLANTS, Letter::B)] {
        h.gateway.reply(text);
        h.next().await;

        assert_eq!(h.counters().await, (1, 1));
        assert_eq!(h.correct_letter().await, letter);
        let shown = h.messenger.last();
        assert!(shown.text().contains("1/1"));
        assert!(matches!(shown, Sent::Edit { id: 200, .. }));
    }
}

#[tokio::test]
async fn unknown_topic_ends_the_quiz() {
    let h = Harness::new();
    h.start().await;
    h.select("astrology").await;

    assert_eq!(h.messenger.last().text(), "❌ Error: topic not found.");
    assert!(h.state().await.is_none());
    assert!(h.gateway.requests().is_empty());
}

#[tokio::test]
async fn unknown_topic_from_a_stale_menu_reports_the_topic() {
    let h = Harness::new();
    h.select("astrology").await;

    assert_eq!(h.messenger.last().text(), "❌ Error: topic not found.");
    assert!(h.state().await.is_none());
    assert!(h.gateway.requests().is_empty());
}

#[tokio::test]
async fn empty_generation_ends_the_quiz() {
    let h = Harness::new();
    h.gateway.reply("   ");
    h.start().await;
    h.select("history").await;

    assert_eq!(h.messenger.last().text(), GENERATION_ERROR);
    assert!(h.state().await.is_none());
}

#[tokio::test]
async fn failed_explanation_keeps_the_player_answering() {
    let h = Harness::new();
    h.gateway.reply(PLANTS).fail();
    h.start().await;
    h.select("science").await;
    h.answer("B").await;

    assert_eq!(h.messenger.last().text(), ANSWER_ERROR);
    assert!(matches!(h.state().await, Some(ChatState::AnsweringQuestion { .. })));
    assert_eq!(h.counters().await, (1, 1));
    assert!(h
        .messenger
        .sent()
        .iter()
        .any(|s| matches!(s, Sent::Delete(_))));
}

#[tokio::test]
async fn finishing_without_attempts() {
    let h = Harness::new();
    h.start().await;
    h.finish().await;

    let summary = h.messenger.last();
    assert!(summary.text().contains("0 of 0"));
    assert!(summary.text().contains("Percentage: 0%"));
    assert!(summary.text().contains("Give it another try!"));
    assert_eq!(summary.buttons(), ["quiz_interface"]);
    assert!(h.state().await.is_none());
}

#[tokio::test]
async fn finishing_with_four_of_five() {
    let h = Harness::new();
    h.start().await;
    h.gateway.reply(PLANTS);
    h.select("science").await;

    for (i, reply) in ["B", "B", "B", "B", "A"].into_iter().enumerate() {
        h.gateway.reply("Explanation.");
        h.answer(reply).await;
        if i < 4 {
            h.gateway.reply(PLANTS);
            h.next().await;
        }
    }
    assert_eq!(h.counters().await, (4, 5));

    h.finish().await;
    let summary = h.messenger.last();
    assert!(summary.text().contains("4 of 5"));
    assert!(summary.text().contains("Percentage: 80%"));
    assert!(summary.text().contains("Excellent!"));
    assert!(h.state().await.is_none());
}

#[tokio::test]
async fn changing_topic_restarts_the_counters() {
    let h = Harness::new();
    h.gateway.reply(PLANTS).reply("Explanation.");
    h.start().await;
    h.select("science").await;
    h.answer("B").await;

    h.quiz.start(&h.dialogue, pressed(200)).await.unwrap();

    assert!(matches!(h.state().await, Some(ChatState::SelectingTopic { .. })));
    assert_eq!(h.counters().await, (0, 0));
    assert!(matches!(h.messenger.last(), Sent::Edit { id: 200, .. }));
}

#[tokio::test]
async fn buttons_without_a_session_end_with_an_error() {
    let h = Harness::new();

    h.next().await;
    assert_eq!(
        h.messenger.last().text(),
        "❌ Quiz data not found. Use /quiz to start over."
    );
    assert!(h.state().await.is_none());

    h.finish().await;
    assert_eq!(
        h.messenger.last().text(),
        "❌ Quiz data not found. Use /quiz to start over."
    );
    assert!(h.gateway.requests().is_empty());
}

#[tokio::test]
async fn menu_picture_replaces_the_pressed_message() {
    let messenger = RecordingMessenger::default();
    let quiz = QuizRunner::new(
        messenger.clone(),
        Arc::new(ScriptedGateway::default()),
        Arc::new(TopicStore::builtin()),
    )
    .with_menu_image(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
    let dialogue = dialogue();

    quiz.start(&dialogue, pressed(7)).await.unwrap();

    let sent = messenger.sent();
    assert_eq!(sent[0], Sent::Delete(7));
    assert!(matches!(&sent[1], Sent::Photo { caption, .. } if caption.contains("Choose a topic")));
}
