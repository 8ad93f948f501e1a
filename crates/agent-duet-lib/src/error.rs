//! Error types for the conversation engine.

use crate::completion::CompletionError;
use crate::session::SessionState;

/// Errors from orchestrator transitions.
///
/// Every variant leaves the session exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum DuetError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("turn limit of {max_turns} reached; start a new conversation")]
    TurnLimitReached { max_turns: usize },
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },
    #[error("max turns must be between {min} and {max}, got {got}")]
    InvalidMaxTurns { got: usize, min: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = DuetError::TurnLimitReached { max_turns: 3 };
        assert_eq!(
            err.to_string(),
            "turn limit of 3 reached; start a new conversation"
        );

        let err = DuetError::InvalidState {
            action: "advance",
            state: SessionState::Idle,
        };
        assert_eq!(err.to_string(), "cannot advance while idle");

        let err = DuetError::InvalidMaxTurns {
            got: 11,
            min: 1,
            max: 10,
        };
        assert_eq!(err.to_string(), "max turns must be between 1 and 10, got 11");
    }

    #[test]
    fn completion_error_is_transparent() {
        let err: DuetError = CompletionError::RemoteService {
            status: 502,
            body: "bad gateway".to_string(),
        }
        .into();
        assert!(err.to_string().contains("bad gateway"));
        assert!(matches!(err, DuetError::Completion(_)));
    }
}
