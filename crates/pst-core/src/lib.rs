//! PST Core - classification workflow engine
//!
//! Drives a learner through a fixed-length session of scenarios:
//! - [`ClassificationWorkflow`]: topic selection, classification, grading
//!   submission and advancing, as an explicit state machine
//! - [`SessionAggregator`]: totals, percentage and pass/fail over the session
//! - Collaborator traits for scenario loading, grading and session delivery,
//!   with an HTTP implementation in [`HttpTrainerApi`]
//!
//! # Example
//!
//! ```rust,ignore
//! use pst_core::{ClassificationWorkflow, HttpTrainerApi, TrainerConfig};
//! use pst_model::ClassificationLabel;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrainerConfig::from_env();
//! let api = Arc::new(HttpTrainerApi::new(&config));
//!
//! let scenarios = pst_core::load_session_scenarios(api.as_ref(), config.session_length).await?;
//! let workflow = ClassificationWorkflow::new(scenarios, api.clone(), &config, "Bede")?;
//!
//! workflow.classify("n1", ClassificationLabel::Primary, "The author witnessed the event firsthand")?;
//! let result = workflow.submit().await?;
//! println!("{}/{}", result.score, result.max_score);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod collaborator;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod workflow;

pub use collaborator::{
    load_session_scenarios, Grader, ScenarioSource, SessionSink, StaticScenarios,
};
pub use config::TrainerConfig;
pub use error::{CollaboratorError, SessionError, WorkflowError, WorkflowResult};
pub use http::HttpTrainerApi;
pub use session::{ScenarioBreakdown, SessionAggregator, SessionSummary};
pub use workflow::{ClassificationWorkflow, Phase, Progress, ANONYMOUS_STUDENT};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a session
    pub use crate::{
        ClassificationWorkflow, Grader, Phase, ScenarioSource, SessionSink, TrainerConfig,
        WorkflowError,
    };
    pub use pst_model::{ClassificationLabel, Scenario, ValidatedScenario};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
