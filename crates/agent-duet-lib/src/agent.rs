//! The two conversation participants.

use tracing::debug;

use crate::completion::{CompletionClient, CompletionError};
use crate::index::LexicalIndex;
use crate::model::persona::Persona;
use crate::model::turn::Speaker;
use crate::prompt::{grounded_query_prompt, persona_query, persona_response};
use crate::retrieval::retrieve_context;

/// A speaker identity plus an optional persona.
///
/// Agents are stateless: the transcript lives in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub speaker: Speaker,
    pub persona: Option<Persona>,
}

impl Agent {
    pub fn new(speaker: Speaker, persona: Option<Persona>) -> Self {
        Self { speaker, persona }
    }

    /// Answer `query` grounded on the chunks of `index` most similar to it.
    ///
    /// Returns the raw completion text; persona framing is applied separately
    /// by [`Agent::frame`].
    pub fn ask<C: CompletionClient + ?Sized>(
        &self,
        client: &C,
        index: &LexicalIndex,
        query: &str,
        top_k: usize,
    ) -> Result<String, CompletionError> {
        let context = retrieve_context(index, query, top_k);
        debug!(
            speaker = %self.speaker,
            context_chars = context.len(),
            "asking with retrieved context"
        );
        client.complete(&grounded_query_prompt(&context, query))
    }

    /// Apply this agent's persona framing to `text`.
    pub fn frame(&self, text: &str) -> String {
        match self.speaker {
            Speaker::A => persona_query(self.persona, text),
            Speaker::B => persona_response(self.persona, text),
        }
    }
}
