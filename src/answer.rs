//! Multiple-choice letters and the correct-answer extractor.
//!
//! Generated questions are expected to carry their answer key in the text,
//! either as a line mentioning the "correct answer" or as an `Answer: X`
//! marker. When neither is found the key falls back to [`Letter::A`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([abcd])\b").expect("invalid letter regex"));

static ANSWER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)answer:\s*([abcd])\b").expect("invalid answer regex"));

const KEY_PHRASE: &str = "correct answer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Letter {
    #[default]
    A,
    B,
    C,
    D,
}

impl Letter {
    /// Parses a user reply. Only a single letter (any case, surrounding
    /// whitespace ignored) is accepted.
    pub fn parse(input: &str) -> Option<Self> {
        let mut chars = input.trim().chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(letter)
    }

    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Finds the correct letter of a generated question.
pub fn extract(question: &str) -> Letter {
    locate_key(question)
        .map(|(_, letter)| letter)
        .unwrap_or_default()
}

/// Index of the line carrying the answer key, and the letter it names.
fn locate_key(question: &str) -> Option<(usize, Letter)> {
    let lines: Vec<&str> = question.lines().collect();
    lines
        .iter()
        .enumerate()
        .find_map(|(index, line)| key_line_letter(line).map(|letter| (index, letter)))
        .or_else(|| {
            lines
                .iter()
                .enumerate()
                .find_map(|(index, line)| marker_letter(line).map(|letter| (index, letter)))
        })
}

fn key_line_letter(line: &str) -> Option<Letter> {
    let lowered = line.to_lowercase();
    let at = lowered.find(KEY_PHRASE)?;
    // Lowercasing may shift byte offsets for non-ASCII text, so search
    // the lowered line instead of slicing the input line.
    first_letter(&lowered[at + KEY_PHRASE.len()..]).or_else(|| first_letter(&lowered))
}

fn marker_letter(line: &str) -> Option<Letter> {
    let captures = ANSWER_MARKER.captures(line)?;
    captures
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Letter::from_char)
}

fn first_letter(text: &str) -> Option<Letter> {
    LETTER
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(Letter::from_char)
}

/// Removes the answer key line so the question can be shown to the player.
/// Only the line the key was read from is dropped.
pub fn redact(question: &str) -> String {
    let Some((key_line, _)) = locate_key(question) else {
        return question.trim().to_owned();
    };
    question
        .lines()
        .enumerate()
        .filter(|(index, _)| *index != key_line)
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}
