//! Validated Scenario - proof-carrying wrapper
//!
//! `ValidatedScenario` can only be obtained through [`Scenario::validate`].
//! Layout engines and the workflow controller accept nothing else, so a
//! scenario with no topics or clashing ids never produces geometry or
//! workflow state.

use crate::ids::TopicId;
use crate::scenario::{Scenario, Topic};
use std::collections::HashSet;
use std::ops::Deref;

/// Structural defects that make a scenario unusable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    /// No research question to classify against
    #[error("scenario {scenario} has no topics")]
    NoTopics {
        /// Offending scenario
        scenario: String,
    },

    /// Two nodes share an id, or a node reuses the event id
    #[error("scenario {scenario} has duplicate node id {node}")]
    DuplicateNode {
        /// Offending scenario
        scenario: String,
        /// Repeated node id
        node: String,
    },

    /// Two topics share an id
    #[error("scenario {scenario} has duplicate topic id {topic}")]
    DuplicateTopic {
        /// Offending scenario
        scenario: String,
        /// Repeated topic id
        topic: String,
    },
}

/// A scenario that passed structural validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedScenario {
    inner: Scenario,
}

impl ValidatedScenario {
    /// Topic selected when the scenario is first shown
    #[inline]
    #[must_use]
    pub fn default_topic(&self) -> &Topic {
        // validation guarantees at least one topic
        &self.inner.topics[0]
    }

    /// Resolve a topic id
    #[must_use]
    pub fn find_topic(&self, id: &TopicId) -> Option<&Topic> {
        self.inner.topic(id.as_str())
    }
}

impl Deref for ValidatedScenario {
    type Target = Scenario;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Scenario {
    /// Check structural invariants and seal the scenario
    ///
    /// # Errors
    /// - `ScenarioError::NoTopics` when the topic list is empty
    /// - `ScenarioError::DuplicateNode` when two nodes, or a node and the
    ///   event, share an id
    /// - `ScenarioError::DuplicateTopic` when two topics share an id
    pub fn validate(self) -> Result<ValidatedScenario, ScenarioError> {
        if self.topics.is_empty() {
            return Err(ScenarioError::NoTopics {
                scenario: self.id.to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(self.nodes.len() + 1);
        seen.insert(self.event.id.as_str());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(ScenarioError::DuplicateNode {
                    scenario: self.id.to_string(),
                    node: node.id.to_string(),
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.topics.len());
        for topic in &self.topics {
            if !seen.insert(topic.id.as_str()) {
                return Err(ScenarioError::DuplicateTopic {
                    scenario: self.id.to_string(),
                    topic: topic.id.to_string(),
                });
            }
        }

        Ok(ValidatedScenario { inner: self })
    }
}
