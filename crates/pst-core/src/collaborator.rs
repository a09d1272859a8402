//! Collaborator seams
//!
//! The controller never decides correctness or stores reports itself. It talks
//! to three collaborators: where scenarios come from, who grades a set of
//! picks, and who receives the finished session.

use crate::error::CollaboratorError;
use pst_model::{GradeRequest, GradingResult, Scenario, SessionReceipt, SessionSubmission};

/// Supplies the scenario catalogue
#[async_trait::async_trait]
pub trait ScenarioSource: Send + Sync {
    /// Every available scenario, in presentation order
    async fn fetch_scenarios(&self) -> Result<Vec<Scenario>, CollaboratorError>;
}

/// Grades one scenario's classifications
#[async_trait::async_trait]
pub trait Grader: Send + Sync {
    /// Grade a complete set of picks against a topic
    async fn grade(&self, request: GradeRequest) -> Result<GradingResult, CollaboratorError>;
}

/// Receives the results of a finished session
#[async_trait::async_trait]
pub trait SessionSink: Send + Sync {
    /// Hand over all scenario results
    async fn submit_session(
        &self,
        submission: SessionSubmission,
    ) -> Result<SessionReceipt, CollaboratorError>;
}

/// Fetch the catalogue and keep the first `session_length` scenarios
///
/// # Errors
/// Propagates the source's [`CollaboratorError`].
pub async fn load_session_scenarios(
    source: &dyn ScenarioSource,
    session_length: usize,
) -> Result<Vec<Scenario>, CollaboratorError> {
    let mut scenarios = source.fetch_scenarios().await?;
    let available = scenarios.len();
    scenarios.truncate(session_length);
    tracing::debug!(available, kept = scenarios.len(), "loaded session scenarios");
    Ok(scenarios)
}

/// Scenarios held in memory, e.g. read from a JSON file
#[derive(Debug, Clone, Default)]
pub struct StaticScenarios {
    scenarios: Vec<Scenario>,
}

impl StaticScenarios {
    /// Serve a fixed list
    #[inline]
    #[must_use]
    pub fn new(scenarios: Vec<Scenario>) -> Self {
        Self { scenarios }
    }

    /// Parse a JSON array of scenarios
    ///
    /// # Errors
    /// `CollaboratorError::Decode` when the text is not a scenario array.
    pub fn from_json(json: &str) -> Result<Self, CollaboratorError> {
        serde_json::from_str(json)
            .map(Self::new)
            .map_err(|e| CollaboratorError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl ScenarioSource for StaticScenarios {
    async fn fetch_scenarios(&self) -> Result<Vec<Scenario>, CollaboratorError> {
        Ok(self.scenarios.clone())
    }
}
