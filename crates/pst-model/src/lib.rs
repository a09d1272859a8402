//! PST Model - scenario domain types
//!
//! Data shared by the layout engines and the workflow controller:
//! - Scenarios, events, topics, source nodes and their relationships
//! - Structural validation into [`ValidatedScenario`]
//! - Learner classifications and the completeness predicate
//! - Grading and session wire types exchanged with collaborators
//!
//! # Example
//!
//! ```rust,ignore
//! use pst_model::{Classification, ClassificationLabel, Classifications, Scenario};
//!
//! let scenario: Scenario = serde_json::from_str(payload)?;
//! let scenario = scenario.validate()?;
//!
//! let mut picks = Classifications::new();
//! picks.upsert(Classification::new("n1", ClassificationLabel::Primary, "eyewitness"));
//! assert!(!pst_model::is_complete(&scenario, &picks));
//! ```

#![warn(unreachable_pub)]

pub mod classification;
pub mod grading;
pub mod ids;
pub mod scenario;
pub mod validated;

pub use classification::{
    is_complete, missing_nodes, Classification, ClassificationLabel, Classifications,
};
pub use grading::{
    percentage, GradeRequest, GradingResult, NodeOutcome, SessionReceipt, SessionSubmission,
};
pub use ids::{EventId, NodeId, ScenarioId, TopicId};
pub use scenario::{
    Difficulty, Edge, Event, Scenario, SourceKind, SourceNode, Topic, TransmissionKind,
    TransmissionStep,
};
pub use validated::{ScenarioError, ValidatedScenario};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
