//! Chat-completion boundary.
//!
//! The rest of the crate only sees [`CompletionClient`]: one prompt in, one
//! text out. [`OpenRouterClient`] is the network implementation. The `fake`
//! module provides scripted clients for tests and offline runs; it is compiled
//! for `cfg(test)` or when the `fake-completion` feature is enabled.

use thiserror::Error;

mod openrouter;

#[cfg(any(test, feature = "fake-completion"))]
pub mod fake;

pub use openrouter::{parse_chat_response, ChatMessage, ChatRequest, OpenRouterClient};

/// Failures of a completion call.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// Required configuration (the API key) is missing; no request was sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The endpoint answered with a non-success status.
    #[error("remote service error (HTTP {status}): {body}")]
    RemoteService { status: u16, body: String },

    /// The request could not be sent or the response could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered 2xx but without an assistant message.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Turns a prompt into model text.
///
/// Implementations block until the text is available or the call fails; they
/// must surface failures as errors rather than returning empty text.
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

impl<C: CompletionClient + ?Sized> CompletionClient for &C {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        (**self).complete(prompt)
    }
}

impl<C: CompletionClient + ?Sized> CompletionClient for Box<C> {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        (**self).complete(prompt)
    }
}
