//! Library entry point for the dual-agent, document-grounded conversation engine.
//!
//! A document is split into fixed-size chunks and indexed with TF-IDF. Agent A
//! asks, Agent B answers from the chunks most similar to the question, and
//! each answer yields a set of follow-up questions for the next turn. The
//! [`ConversationOrchestrator`] bounds the exchange with a turn budget and can
//! summarize the transcript into a short and a detailed report.
//!
//! All language-model calls go through [`CompletionClient`]; the bundled
//! [`OpenRouterClient`] speaks the OpenRouter chat-completions protocol.

pub mod agent;
pub mod completion;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod model;
pub mod orchestrator;
pub mod prompt;
pub mod report;
pub mod retrieval;
pub mod session;

// Re-export primary types for ergonomic use.
pub use agent::Agent;
pub use completion::{CompletionClient, CompletionError, OpenRouterClient};
pub use config::{CompletionConfig, Credentials};
pub use document::{extractor_for_path, PlainTextExtractor, TextExtractor};
#[cfg(feature = "pdf")]
pub use document::PdfExtractor;
pub use error::DuetError;
pub use index::LexicalIndex;
pub use model::{
    chunk::Chunk,
    persona::Persona,
    turn::{Speaker, Transcript, Turn},
};
pub use orchestrator::{
    ConversationOrchestrator, ConversationSummary, IngestReport, OrchestratorConfig,
};
pub use report::{write_transcript_json, MarkdownReport, ReportRenderer, DEFAULT_REPORT_TITLE};
pub use retrieval::{retrieve, retrieve_context, ScoredChunk};
pub use session::{Session, SessionState};
