//! Error types for PST Core
//!
//! Provides error handling for:
//! - Workflow transitions refused by the controller
//! - Grading and session collaborator failures
//! - Session summaries over an empty session

use crate::workflow::Phase;
use pst_model::{NodeId, ScenarioError};

/// Main workflow error type
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// Topic id not in the current scenario
    #[error("unknown topic '{0}' for the current scenario")]
    InvalidTopic(String),

    /// Node id not in the current scenario, or not extant
    #[error("node '{0}' cannot be classified in the current scenario")]
    UnknownNode(String),

    /// Submission attempted before every extant node was classified
    #[error("{} extant source(s) still unclassified", missing.len())]
    IncompleteClassification {
        /// Extant nodes without a classification, in node order
        missing: Vec<NodeId>,
    },

    /// A grading request is already outstanding
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The grader failed or answered with something unusable
    #[error("grading failed: {0}")]
    GradingCollaboratorFailure(#[source] CollaboratorError),

    /// The session collaborator refused or could not be reached
    #[error("session submission failed: {0}")]
    SessionSubmissionFailure(String),

    /// Summary requested before any scenario was graded
    #[error("no graded scenarios in this session")]
    NoResults,

    /// Operation not allowed in the current phase
    #[error("cannot {operation} while {phase}")]
    InvalidTransition {
        /// Refused operation
        operation: &'static str,
        /// Phase at the time of the call
        phase: Phase,
    },

    /// Scenario failed structural validation
    #[error("malformed scenario: {0}")]
    MalformedScenario(#[from] ScenarioError),
}

impl WorkflowError {
    /// Whether the controller can keep going after this error
    ///
    /// Everything except a malformed scenario leaves the controller in a
    /// usable state.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::MalformedScenario(_))
    }

    /// Check if retrying the same call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SubmissionInFlight | Self::SessionSubmissionFailure(_) => true,
            Self::GradingCollaboratorFailure(err) => err.is_retryable(),
            _ => false,
        }
    }
}

impl From<SessionError> for WorkflowError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoResults => Self::NoResults,
        }
    }
}

/// Collaborator (grader, scenario source, session sink) errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum CollaboratorError {
    /// Request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl CollaboratorError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

/// Session aggregation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No points were available across the session
    #[error("no graded scenarios in this session")]
    NoResults,
}

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_malformed_scenario_is_fatal() {
        let fatal = WorkflowError::MalformedScenario(ScenarioError::NoTopics {
            scenario: "s1".into(),
        });
        assert!(!fatal.is_recoverable());

        let recoverable = [
            WorkflowError::InvalidTopic("t9".into()),
            WorkflowError::UnknownNode("n9".into()),
            WorkflowError::IncompleteClassification { missing: vec![] },
            WorkflowError::SubmissionInFlight,
            WorkflowError::GradingCollaboratorFailure(CollaboratorError::Transport("down".into())),
            WorkflowError::SessionSubmissionFailure("smtp".into()),
            WorkflowError::NoResults,
            WorkflowError::InvalidTransition {
                operation: "submit",
                phase: Phase::Graded,
            },
        ];
        assert!(recoverable.iter().all(WorkflowError::is_recoverable));
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = CollaboratorError::Status {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_retryable());
        assert!(!CollaboratorError::Status {
            status: 422,
            body: String::new()
        }
        .is_retryable());
        assert!(WorkflowError::GradingCollaboratorFailure(err).is_retryable());
    }

    #[test]
    fn incomplete_message_counts_missing() {
        let err = WorkflowError::IncompleteClassification {
            missing: vec!["n1".into(), "n3".into()],
        };
        assert_eq!(err.to_string(), "2 extant source(s) still unclassified");
    }

    #[test]
    fn session_error_converts() {
        assert!(matches!(
            WorkflowError::from(SessionError::NoResults),
            WorkflowError::NoResults
        ));
    }
}
