//! Per-conversation state.
//!
//! A [`Session`] owns everything one conversation needs: the document index,
//! the transcript, the current follow-up set and the turn counter. Sessions
//! are plain values; two sessions never share an index or a transcript.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::LexicalIndex;
use crate::model::turn::Transcript;

/// Where a conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No conversation started yet.
    Idle,
    /// The last turn is Agent A's; Agent B has not answered.
    AwaitingAgentB,
    /// Agent B answered; the next Agent A turn can be chosen.
    AwaitingFollowupChoice,
    /// The turn budget is spent; only `start` or `summarize` make progress.
    Exhausted,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingAgentB => "awaiting Agent B",
            SessionState::AwaitingFollowupChoice => "awaiting a follow-up choice",
            SessionState::Exhausted => "turn budget exhausted",
        };
        f.write_str(s)
    }
}

/// Mutable state of one conversation.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) index: LexicalIndex,
    pub(crate) transcript: Transcript,
    pub(crate) followups: Vec<String>,
    pub(crate) turn_counter: usize,
    pub(crate) state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            index: LexicalIndex::empty(),
            transcript: Transcript::new(),
            followups: Vec::new(),
            turn_counter: 0,
            state: SessionState::Idle,
        }
    }

    /// Forget the conversation but keep the ingested document.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.followups.clear();
        self.turn_counter = 0;
        self.state = SessionState::Idle;
    }

    /// Replace the index wholesale.
    pub(crate) fn replace_index(&mut self, index: LexicalIndex) {
        self.index = index;
    }

    pub fn index(&self) -> &LexicalIndex {
        &self.index
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn followups(&self) -> &[String] {
        &self.followups
    }

    pub fn turn_counter(&self) -> usize {
        self.turn_counter
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}
