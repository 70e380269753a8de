use std::fmt;

/// Running counters of one quiz session. `score <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    score: u32,
    total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    KeepLearning,
    NoAttempts,
}

impl Scoreboard {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.score += 1;
        }
    }

    /// Share of correct answers, rounded half to even.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (f64::from(self.score) / f64::from(self.total) * 100.0).round_ties_even() as u32
    }

    pub fn grade(&self) -> Grade {
        if self.total == 0 {
            return Grade::NoAttempts;
        }
        match self.percentage() {
            80.. => Grade::Excellent,
            60..=79 => Grade::Good,
            40..=59 => Grade::Fair,
            _ => Grade::KeepLearning,
        }
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.score, self.total)
    }
}

impl Grade {
    pub fn emoji(self) -> &'static str {
        match self {
            Grade::Excellent => "🏆",
            Grade::Good => "🥈",
            Grade::Fair => "🥉",
            Grade::KeepLearning => "📚",
            Grade::NoAttempts => "🤔",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "Excellent!",
            Grade::Good => "Good job!",
            Grade::Fair => "Not bad!",
            Grade::KeepLearning => "Room to grow!",
            Grade::NoAttempts => "Give it another try!",
        }
    }
}
