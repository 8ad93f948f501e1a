//! Deterministic completion clients for tests and offline runs.

use std::cell::RefCell;
use std::collections::VecDeque;

use super::{CompletionClient, CompletionError};

/// Replies from a fixed script, then falls back to a constant reply.
///
/// Every prompt is recorded so tests can assert on what was sent.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    script: RefCell<VecDeque<Result<String, (u16, String)>>>,
    fallback: Option<String>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedClient {
    /// A client that answers every prompt with `reply`.
    pub fn constant(reply: impl Into<String>) -> Self {
        Self {
            fallback: Some(reply.into()),
            ..Self::default()
        }
    }

    /// Queue a successful reply.
    pub fn then_reply(self, reply: impl Into<String>) -> Self {
        self.script.borrow_mut().push_back(Ok(reply.into()));
        self
    }

    /// Queue a remote failure with the given status and payload.
    pub fn then_fail(self, status: u16, body: impl Into<String>) -> Self {
        self.script.borrow_mut().push_back(Err((status, body.into())));
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl CompletionClient for ScriptedClient {
    fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.script.borrow_mut().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err((status, body))) => Err(CompletionError::RemoteService { status, body }),
            None => self.fallback.clone().ok_or_else(|| CompletionError::RemoteService {
                status: 503,
                body: "script exhausted".to_string(),
            }),
        }
    }
}

/// Fails every call with the same remote error.
#[derive(Debug, Clone)]
pub struct FailingClient {
    pub status: u16,
    pub body: String,
}

impl Default for FailingClient {
    fn default() -> Self {
        Self {
            status: 500,
            body: "{\"error\":\"upstream unavailable\"}".to_string(),
        }
    }
}

impl CompletionClient for FailingClient {
    fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::RemoteService {
            status: self.status,
            body: self.body.clone(),
        })
    }
}
