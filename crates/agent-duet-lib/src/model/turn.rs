// Turns carry only speaker identity and text; display labels live on `Speaker`.
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two conversation participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    A,
    B,
}

impl Speaker {
    /// Label used in transcripts and summary prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            Speaker::A => "Agent A",
            Speaker::B => "Agent B",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single utterance appended to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

/// Ordered, append-only turn history of one conversation.
///
/// The only way to shrink a transcript is [`Transcript::clear`], which the
/// session calls when a new conversation starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The conversation seed (first turn), if any.
    pub fn first(&self) -> Option<&Turn> {
        self.turns.first()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Most recent turn spoken by `speaker`.
    pub fn last_by(&self, speaker: Speaker) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.speaker == speaker)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}
