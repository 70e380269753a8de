/// Display metadata and generation prompt of one quiz category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub summary: &'static str,
    pub prompt: &'static str,
}

const BUILTIN: &[TopicDescriptor] = &[
    TopicDescriptor {
        key: "programming",
        name: "Programming",
        emoji: "💻",
        summary: "questions about code and technology",
        prompt: "You are a quiz host. Create one multiple-choice question about programming: \
                 languages, algorithms, data structures or developer tools. Give exactly four \
                 options labelled A), B), C) and D), each on its own line. On the last line write \
                 'Correct answer: ' followed by the letter only.",
    },
    TopicDescriptor {
        key: "history",
        name: "History",
        emoji: "🏛️",
        summary: "historical facts and events",
        prompt: "You are a quiz host. Create one multiple-choice question about world history: \
                 events, people, dates or civilisations. Give exactly four options labelled A), \
                 B), C) and D), each on its own line. On the last line write 'Correct answer: ' \
                 followed by the letter only.",
    },
    TopicDescriptor {
        key: "science",
        name: "Science",
        emoji: "🔬",
        summary: "physics, chemistry, biology",
        prompt: "You are a quiz host. Create one multiple-choice question about physics, \
                 chemistry or biology. Give exactly four options labelled A), B), C) and D), each \
                 on its own line. On the last line write 'Correct answer: ' followed by the letter \
                 only.",
    },
    TopicDescriptor {
        key: "geography",
        name: "Geography",
        emoji: "🌍",
        summary: "countries, capitals, nature",
        prompt: "You are a quiz host. Create one multiple-choice question about geography: \
                 countries, capitals, rivers, mountains or climate. Give exactly four options \
                 labelled A), B), C) and D), each on its own line. On the last line write \
                 'Correct answer: ' followed by the letter only.",
    },
    TopicDescriptor {
        key: "movies",
        name: "Movies",
        emoji: "🎬",
        summary: "films and actors",
        prompt: "You are a quiz host. Create one multiple-choice question about cinema: famous \
                 films, directors, actors or awards. Give exactly four options labelled A), B), \
                 C) and D), each on its own line. On the last line write 'Correct answer: ' \
                 followed by the letter only.",
    },
];

/// Read-only catalogue of quiz topics, in menu order.
#[derive(Debug, Clone)]
pub struct TopicStore {
    topics: Vec<TopicDescriptor>,
}

impl TopicStore {
    pub fn new(topics: Vec<TopicDescriptor>) -> Self {
        Self { topics }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN.to_vec())
    }

    pub fn list(&self) -> &[TopicDescriptor] {
        &self.topics
    }

    pub fn get(&self, key: &str) -> Option<TopicDescriptor> {
        self.topics.iter().find(|topic| topic.key == key).copied()
    }

    pub fn menu_text(&self) -> String {
        let mut text = String::from("🧠 <b>Quiz - test your knowledge!</b>\n\nTopics:\n\n");
        for topic in &self.topics {
            text.push_str(&format!(
                "{} <b>{}</b> - {}\n",
                topic.emoji, topic.name, topic.summary
            ));
        }
        text.push_str("\nChoose a topic:");
        text
    }
}

impl Default for TopicStore {
    fn default() -> Self {
        Self::builtin()
    }
}
