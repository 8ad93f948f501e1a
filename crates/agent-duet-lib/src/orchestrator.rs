//! Conversation orchestrator: drives the bounded Agent A / Agent B exchange.
//!
//! Transitions:
//!  - `start(seed)`            any state      -> AwaitingAgentB
//!  - `advance()`              AwaitingAgentB -> AwaitingFollowupChoice | Exhausted
//!  - `choose_followup(text)`  AwaitingFollowupChoice -> AwaitingFollowupChoice | Exhausted
//!  - `summarize()`            any state, no mutation
//!
//! Each transition finishes every completion call it needs before touching the
//! session, so a failed call leaves transcript, follow-ups and counter as they
//! were.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::agent::Agent;
use crate::completion::CompletionClient;
use crate::document::TextExtractor;
use crate::error::DuetError;
use crate::index::LexicalIndex;
use crate::model::persona::Persona;
use crate::model::turn::{Speaker, Turn};
use crate::prompt::{
    followup_prompt, format_transcript, long_summary_prompt, parse_followups,
    short_summary_prompt, with_document_context,
};
use crate::report::{write_transcript_json, ReportRenderer, DEFAULT_REPORT_TITLE};
use crate::retrieval::DEFAULT_TOP_K;
use crate::session::{Session, SessionState};

/// Smallest accepted turn budget.
pub const MIN_TURNS: usize = 1;
/// Largest accepted turn budget.
pub const MAX_TURNS: usize = 10;
pub const DEFAULT_MAX_TURNS: usize = 3;

/// Orchestrator settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Number of completed A -> B exchanges allowed, in `[MIN_TURNS, MAX_TURNS]`.
    pub max_turns: usize,
    /// Chunks retrieved to ground each Agent B answer.
    pub top_k: usize,
    pub persona_a: Option<Persona>,
    pub persona_b: Option<Persona>,
    /// Append the whole document text to every Agent A turn.
    pub inline_document_context: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            top_k: DEFAULT_TOP_K,
            persona_a: None,
            persona_b: None,
            inline_document_context: false,
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> Result<(), DuetError> {
        if !(MIN_TURNS..=MAX_TURNS).contains(&self.max_turns) {
            return Err(DuetError::InvalidMaxTurns {
                got: self.max_turns,
                min: MIN_TURNS,
                max: MAX_TURNS,
            });
        }
        Ok(())
    }
}

/// Outcome of a document ingestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub chunks: usize,
    pub vocabulary: usize,
    pub chars: usize,
}

impl IngestReport {
    /// The document produced no chunks; answers will not be grounded.
    pub fn is_empty(&self) -> bool {
        self.chunks == 0
    }
}

/// Short bullet summary and long FAQ rendering of one conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub short: String,
    pub long: String,
}

/// Completed-but-not-yet-recorded Agent B answer and the follow-ups derived from it.
struct Exchange {
    agent_b_text: String,
    followups: Vec<String>,
}

/// Coordinates agents, retrieval and completions over one [`Session`].
pub struct ConversationOrchestrator<C: CompletionClient> {
    client: C,
    config: OrchestratorConfig,
    session: Session,
}

impl<C: CompletionClient> ConversationOrchestrator<C> {
    /// Create an orchestrator with a fresh session.
    ///
    /// # Errors
    ///
    /// `InvalidMaxTurns` when `config.max_turns` is outside `[MIN_TURNS, MAX_TURNS]`.
    pub fn new(client: C, config: OrchestratorConfig) -> Result<Self, DuetError> {
        config.validate()?;
        Ok(Self {
            client,
            config,
            session: Session::new(),
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn transcript(&self) -> &[Turn] {
        self.session.transcript().turns()
    }

    pub fn followups(&self) -> &[String] {
        self.session.followups()
    }

    pub fn turn_counter(&self) -> usize {
        self.session.turn_counter()
    }

    /// Whether another exchange is still allowed.
    pub fn can_advance(&self) -> bool {
        self.session.turn_counter() < self.config.max_turns
    }

    fn agent(&self, speaker: Speaker) -> Agent {
        match speaker {
            Speaker::A => Agent::new(Speaker::A, self.config.persona_a),
            Speaker::B => Agent::new(Speaker::B, self.config.persona_b),
        }
    }

    /// Replace the session's index with one built from `text`.
    ///
    /// A document that yields no chunks is accepted: retrieval then returns
    /// no context and answers are not grounded.
    pub fn ingest_document(&mut self, text: &str) -> IngestReport {
        let index = LexicalIndex::build(text);
        let report = IngestReport {
            chunks: index.len(),
            vocabulary: index.vocabulary_len(),
            chars: text.chars().count(),
        };
        if report.is_empty() {
            warn!("document produced no text; answers will not be grounded");
        } else {
            info!(
                chunks = report.chunks,
                vocabulary = report.vocabulary,
                "document ingested"
            );
        }
        self.session.replace_index(index);
        report
    }

    /// Extract text from raw document bytes and ingest it.
    pub fn ingest_bytes<E: TextExtractor + ?Sized>(
        &mut self,
        extractor: &E,
        bytes: &[u8],
    ) -> anyhow::Result<IngestReport> {
        let text = extractor.extract(bytes)?;
        Ok(self.ingest_document(&text))
    }

    /// Agent A turn text: persona framing, then the optional inline document.
    fn compose_agent_a(&self, text: &str) -> String {
        let framed = self.agent(Speaker::A).frame(text);
        if self.config.inline_document_context {
            with_document_context(&framed, &self.session.index().document_text())
        } else {
            framed
        }
    }

    /// Start a new conversation seeded by `seed_query`.
    ///
    /// Clears transcript, follow-ups and turn counter; the ingested document is kept.
    pub fn start(&mut self, seed_query: &str) -> &Turn {
        let text = self.compose_agent_a(seed_query);
        self.session.reset();
        self.session.transcript.push(Turn::new(Speaker::A, text));
        self.session.state = SessionState::AwaitingAgentB;
        info!(max_turns = self.config.max_turns, "conversation started");
        self.last_turn()
    }

    fn last_turn(&self) -> &Turn {
        // Only called right after a push.
        &self.session.transcript().turns()[self.session.transcript().len() - 1]
    }

    fn ensure_budget(&self) -> Result<(), DuetError> {
        if self.can_advance() {
            Ok(())
        } else {
            Err(DuetError::TurnLimitReached {
                max_turns: self.config.max_turns,
            })
        }
    }

    fn ensure_state(&self, action: &'static str, expected: SessionState) -> Result<(), DuetError> {
        let state = self.session.state();
        if state == expected {
            Ok(())
        } else {
            Err(DuetError::InvalidState { action, state })
        }
    }

    /// Ask Agent B about `agent_a_text` and derive follow-ups, without recording anything.
    fn exchange(&self, agent_a_text: &str) -> Result<Exchange, DuetError> {
        let agent_b = self.agent(Speaker::B);
        let raw = agent_b.ask(
            &self.client,
            self.session.index(),
            agent_a_text,
            self.config.top_k,
        )?;
        let agent_b_text = agent_b.frame(&raw);

        let topic = self
            .session
            .transcript()
            .first()
            .map(|t| t.text.as_str())
            .unwrap_or(agent_a_text);
        let raw_followups = self
            .client
            .complete(&followup_prompt(topic, agent_a_text, &agent_b_text))?;
        let followups = parse_followups(&raw_followups);
        if followups.is_empty() {
            warn!("follow-up completion yielded no questions");
        }

        Ok(Exchange {
            agent_b_text,
            followups,
        })
    }

    fn commit(&mut self, exchange: Exchange) -> &Turn {
        self.session
            .transcript
            .push(Turn::new(Speaker::B, exchange.agent_b_text));
        self.session.followups = exchange.followups;
        self.session.turn_counter += 1;
        self.session.state = if self.can_advance() {
            SessionState::AwaitingFollowupChoice
        } else {
            SessionState::Exhausted
        };
        info!(
            turn = self.session.turn_counter,
            max_turns = self.config.max_turns,
            followups = self.session.followups.len(),
            "exchange recorded"
        );
        self.last_turn()
    }

    /// Let Agent B answer the pending Agent A turn.
    ///
    /// # Returns
    ///
    /// The recorded Agent B turn.
    ///
    /// # Errors
    ///
    /// - `TurnLimitReached` when the budget is spent
    /// - `InvalidState` unless the session is awaiting Agent B
    /// - `Completion` when either completion call fails
    ///
    /// On error nothing is recorded.
    pub fn advance(&mut self) -> Result<&Turn, DuetError> {
        self.ensure_budget()?;
        self.ensure_state("advance", SessionState::AwaitingAgentB)?;

        let agent_a_text = self
            .session
            .transcript()
            .last_by(Speaker::A)
            .map(|t| t.text.clone())
            .ok_or(DuetError::InvalidState {
                action: "advance",
                state: self.session.state(),
            })?;

        let exchange = self.exchange(&agent_a_text)?;
        Ok(self.commit(exchange))
    }

    /// Record `text` as the next Agent A turn and let Agent B answer it.
    ///
    /// `text` is usually one of [`ConversationOrchestrator::followups`] but any
    /// free text is accepted.
    ///
    /// # Errors
    ///
    /// Same as [`ConversationOrchestrator::advance`], with `InvalidState` unless
    /// the session is awaiting a follow-up choice. On error neither the
    /// Agent A nor the Agent B turn is recorded.
    pub fn choose_followup(&mut self, text: &str) -> Result<&Turn, DuetError> {
        self.ensure_budget()?;
        self.ensure_state("choose a follow-up", SessionState::AwaitingFollowupChoice)?;

        let agent_a_text = self.compose_agent_a(text);
        let exchange = self.exchange(&agent_a_text)?;

        self.session
            .transcript
            .push(Turn::new(Speaker::A, agent_a_text));
        Ok(self.commit(exchange))
    }

    /// Produce the short and long summaries of the current transcript.
    ///
    /// Allowed in every state, including before `start`. Each call requests
    /// fresh completions; the session is not modified.
    pub fn summarize(&self) -> Result<ConversationSummary, DuetError> {
        let conversation = format_transcript(self.session.transcript());
        let short = self.client.complete(&short_summary_prompt(&conversation))?;
        let long = self.client.complete(&long_summary_prompt(&conversation))?;
        Ok(ConversationSummary { short, long })
    }

    /// Render `summary` with the default report title.
    pub fn render_report<R: ReportRenderer + ?Sized>(
        &self,
        renderer: &R,
        summary: &ConversationSummary,
    ) -> anyhow::Result<Vec<u8>> {
        renderer.render(DEFAULT_REPORT_TITLE, summary)
    }

    /// Write the current transcript to `path` as JSON.
    pub fn export_transcript(&self, path: &Path) -> anyhow::Result<()> {
        write_transcript_json(self.transcript(), path)
    }

    /// Drop the conversation, keeping the ingested document.
    pub fn reset(&mut self) {
        self.session.reset();
    }
}
