//! Classification Workflow Controller
//!
//! State machine for one learner session:
//!
//! ```text
//! AwaitingClassification --submit--> Graded --advance--> AwaitingClassification (next)
//!                                                    \--> SessionComplete
//! ```
//!
//! All transitions take `&self`; state lives behind a `parking_lot::Mutex` so
//! the controller can be shared between the UI loop and the task awaiting the
//! grader. The lock is released before the grading call and re-taken to store
//! its outcome. While that call is outstanding the in-flight flag rejects a
//! second submit as well as `classify` and `select_topic`.

use crate::collaborator::{Grader, SessionSink};
use crate::config::TrainerConfig;
use crate::error::{WorkflowError, WorkflowResult};
use crate::session::{SessionAggregator, SessionSummary};
use parking_lot::Mutex;
use pst_model::{
    missing_nodes, Classification, ClassificationLabel, Classifications, GradeRequest,
    GradingResult, NodeId, Scenario, SessionReceipt, SessionSubmission, Topic, TopicId,
    ValidatedScenario,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Learner is classifying the current scenario
    AwaitingClassification,
    /// Current scenario has a grading result
    Graded,
    /// Every scenario has been graded
    SessionComplete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::AwaitingClassification => "awaiting classification",
            Phase::Graded => "graded",
            Phase::SessionComplete => "session complete",
        })
    }
}

/// Position within the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    /// 1-based index of the current scenario, equal to `total` once complete
    pub position: usize,
    /// Scenarios in the session
    pub total: usize,
    /// Scenarios graded and advanced past
    pub completed: usize,
}

impl Progress {
    /// Completed share of the session, 0.0 - 1.0
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let fraction = self.completed as f64 / self.total as f64;
        fraction
    }
}

#[derive(Debug)]
struct State {
    index: usize,
    phase: Phase,
    active_topic: Option<TopicId>,
    classifications: Classifications,
    grading: Option<GradingResult>,
    in_flight: bool,
    session: SessionAggregator,
}

impl State {
    /// Reset everything tied to the current scenario in one step
    fn enter_scenario(&mut self, index: usize, scenarios: &[ValidatedScenario]) {
        self.index = index;
        self.classifications.clear();
        self.grading = None;
        self.in_flight = false;
        match scenarios.get(index) {
            Some(scenario) => {
                self.phase = Phase::AwaitingClassification;
                self.active_topic = Some(scenario.default_topic().id.clone());
            }
            None => {
                self.phase = Phase::SessionComplete;
                self.active_topic = None;
            }
        }
    }

    fn ensure_mutable(&self, operation: &'static str) -> WorkflowResult<()> {
        if self.in_flight {
            return Err(WorkflowError::SubmissionInFlight);
        }
        if self.phase == Phase::SessionComplete {
            return Err(WorkflowError::InvalidTransition {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn invalidate_grading(&mut self) {
        self.grading = None;
        self.phase = Phase::AwaitingClassification;
    }
}

/// Clears the in-flight flag if the grading future is dropped early
struct InFlight<'a> {
    state: &'a Mutex<State>,
    armed: bool,
}

impl InFlight<'_> {
    fn settle(mut self, state: &mut State) {
        state.in_flight = false;
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().in_flight = false;
        }
    }
}

/// Name sent when the learner leaves theirs blank
pub const ANONYMOUS_STUDENT: &str = "Anonymous";

/// Controller for one learner session
pub struct ClassificationWorkflow {
    scenarios: Vec<ValidatedScenario>,
    grader: Arc<dyn Grader>,
    student_name: String,
    state: Mutex<State>,
}

impl fmt::Debug for ClassificationWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationWorkflow")
            .field("scenarios", &self.scenarios.len())
            .field("student_name", &self.student_name)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl ClassificationWorkflow {
    /// Start a session over the first `config.session_length` scenarios
    ///
    /// An empty list starts directly in [`Phase::SessionComplete`]. A blank
    /// `student_name` becomes [`ANONYMOUS_STUDENT`].
    ///
    /// # Errors
    /// `WorkflowError::MalformedScenario` if any kept scenario fails
    /// validation; no controller is built in that case.
    pub fn new(
        mut scenarios: Vec<Scenario>,
        grader: Arc<dyn Grader>,
        config: &TrainerConfig,
        student_name: impl Into<String>,
    ) -> WorkflowResult<Self> {
        scenarios.truncate(config.session_length);
        let scenarios = scenarios
            .into_iter()
            .map(Scenario::validate)
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = State {
            index: 0,
            phase: Phase::AwaitingClassification,
            active_topic: None,
            classifications: Classifications::new(),
            grading: None,
            in_flight: false,
            session: SessionAggregator::new(config.pass_threshold),
        };
        state.enter_scenario(0, &scenarios);

        let mut student_name = student_name.into();
        if student_name.trim().is_empty() {
            student_name = ANONYMOUS_STUDENT.to_string();
        }
        info!(
            student = %student_name,
            scenarios = scenarios.len(),
            "session started"
        );

        Ok(Self {
            scenarios,
            grader,
            student_name,
            state: Mutex::new(state),
        })
    }

    /// Switch the research question for the current scenario
    ///
    /// Picks are kept; a stored grading result is discarded because
    /// correctness depends on the topic. Re-selecting the active topic
    /// changes nothing.
    ///
    /// # Errors
    /// - `InvalidTopic` if the id is not one of the scenario's topics
    /// - `SubmissionInFlight` while grading is outstanding
    /// - `InvalidTransition` once the session is complete
    pub fn select_topic(&self, topic_id: &str) -> WorkflowResult<()> {
        let mut state = self.state.lock();
        state.ensure_mutable("select a topic")?;

        let scenario = &self.scenarios[state.index];
        let topic = scenario
            .topic(topic_id)
            .ok_or_else(|| WorkflowError::InvalidTopic(topic_id.to_string()))?;

        if state.active_topic.as_ref() == Some(&topic.id) {
            return Ok(());
        }
        debug!(scenario = %scenario.id, topic = %topic.id, "topic changed");
        state.active_topic = Some(topic.id.clone());
        state.invalidate_grading();
        Ok(())
    }

    /// Record or overwrite the learner's pick for an extant node
    ///
    /// A changed pick while graded discards the grading result, since the
    /// graded picks no longer match. Repeating an identical pick is a no-op.
    ///
    /// # Errors
    /// - `UnknownNode` if the node is not in the scenario or is lost
    /// - `SubmissionInFlight` while grading is outstanding
    /// - `InvalidTransition` once the session is complete
    pub fn classify(
        &self,
        node_id: &str,
        label: ClassificationLabel,
        justification: impl Into<String>,
    ) -> WorkflowResult<()> {
        let mut state = self.state.lock();
        state.ensure_mutable("classify")?;

        let scenario = &self.scenarios[state.index];
        let node = scenario
            .node(node_id)
            .filter(|node| node.extant)
            .ok_or_else(|| WorkflowError::UnknownNode(node_id.to_string()))?;

        let changed = state
            .classifications
            .upsert(Classification::new(node.id.clone(), label, justification));
        if changed {
            debug!(scenario = %scenario.id, node = %node.id, %label, "classified");
            if state.phase == Phase::Graded {
                state.invalidate_grading();
            }
        }
        Ok(())
    }

    /// Send the current picks to the grader
    ///
    /// # Errors
    /// - `InvalidTransition` unless awaiting classification
    /// - `SubmissionInFlight` if a submission is outstanding
    /// - `IncompleteClassification` when extant nodes are unclassified; the
    ///   grader is not called
    /// - `GradingCollaboratorFailure` when the grader fails; the phase stays
    ///   at awaiting classification with picks intact
    pub async fn submit(&self) -> WorkflowResult<GradingResult> {
        let request = {
            let mut state = self.state.lock();
            if state.in_flight {
                return Err(WorkflowError::SubmissionInFlight);
            }
            if state.phase != Phase::AwaitingClassification {
                return Err(WorkflowError::InvalidTransition {
                    operation: "submit",
                    phase: state.phase,
                });
            }

            let scenario = &self.scenarios[state.index];
            let missing = missing_nodes(scenario, &state.classifications);
            if !missing.is_empty() {
                debug!(scenario = %scenario.id, missing = missing.len(), "submission incomplete");
                return Err(WorkflowError::IncompleteClassification { missing });
            }

            state.in_flight = true;
            GradeRequest {
                scenario_id: scenario.id.clone(),
                topic_id: state
                    .active_topic
                    .clone()
                    .unwrap_or_else(|| scenario.default_topic().id.clone()),
                student_name: self.student_name.clone(),
                classifications: state.classifications.in_node_order(scenario),
            }
        };

        info!(
            scenario = %request.scenario_id,
            topic = %request.topic_id,
            picks = request.classifications.len(),
            "submitting for grading"
        );
        let guard = InFlight {
            state: &self.state,
            armed: true,
        };
        let outcome = self.grader.grade(request).await;

        let mut state = self.state.lock();
        guard.settle(&mut state);
        match outcome {
            Ok(result) => {
                info!(
                    scenario = %result.scenario_id,
                    score = result.score,
                    max_score = result.max_score,
                    "scenario graded"
                );
                state.grading = Some(result.clone());
                state.phase = Phase::Graded;
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, "grading failed");
                Err(WorkflowError::GradingCollaboratorFailure(err))
            }
        }
    }

    /// Hand the grading result to the session and move on
    ///
    /// Returns the phase entered.
    ///
    /// # Errors
    /// `InvalidTransition` unless graded.
    pub fn advance(&self) -> WorkflowResult<Phase> {
        let mut state = self.state.lock();
        let refused = WorkflowError::InvalidTransition {
            operation: "advance",
            phase: state.phase,
        };
        if state.phase != Phase::Graded {
            return Err(refused);
        }
        let Some(result) = state.grading.take() else {
            return Err(refused);
        };

        state.session.record(result);
        let next = state.index + 1;
        state.enter_scenario(next, &self.scenarios);

        match state.phase {
            Phase::SessionComplete => {
                info!(completed = state.session.len(), "session complete");
            }
            _ => {
                info!(
                    scenario = %self.scenarios[next].id,
                    position = next + 1,
                    total = self.scenarios.len(),
                    "advanced to next scenario"
                );
            }
        }
        Ok(state.phase)
    }

    /// Send the finished session to the session collaborator
    ///
    /// # Errors
    /// - `InvalidTransition` before the session is complete
    /// - `NoResults` when no scenario was graded
    /// - `SessionSubmissionFailure` when the collaborator is unreachable or
    ///   answers `success = false`; its message is passed through
    pub async fn submit_session(
        &self,
        sink: &dyn SessionSink,
        student_email: Option<String>,
    ) -> WorkflowResult<SessionReceipt> {
        let submission = {
            let state = self.state.lock();
            if state.phase != Phase::SessionComplete {
                return Err(WorkflowError::InvalidTransition {
                    operation: "submit the session",
                    phase: state.phase,
                });
            }
            if state.session.is_empty() {
                return Err(WorkflowError::NoResults);
            }
            SessionSubmission {
                student_name: self.student_name.clone(),
                student_email,
                scenario_results: state.session.results().to_vec(),
            }
        };

        info!(
            student = %submission.student_name,
            scenarios = submission.scenario_results.len(),
            "submitting session"
        );
        let receipt = sink.submit_session(submission).await.map_err(|err| {
            warn!(error = %err, "session submission failed");
            WorkflowError::SessionSubmissionFailure(err.to_string())
        })?;

        if !receipt.success {
            let message = receipt
                .message
                .unwrap_or_else(|| "session results were not accepted".to_string());
            warn!(message = %message, "session submission rejected");
            return Err(WorkflowError::SessionSubmissionFailure(message));
        }
        Ok(receipt)
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.lock().phase
    }

    /// Whether a grading call is outstanding
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.state.lock().in_flight
    }

    /// Learner name sent with every request
    #[inline]
    #[must_use]
    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    /// Scenarios in this session
    #[inline]
    #[must_use]
    pub fn scenarios(&self) -> &[ValidatedScenario] {
        &self.scenarios
    }

    /// Scenario being classified, `None` once the session is complete
    #[must_use]
    pub fn current_scenario(&self) -> Option<&ValidatedScenario> {
        let index = self.state.lock().index;
        self.scenarios.get(index)
    }

    /// Active research question
    #[must_use]
    pub fn active_topic(&self) -> Option<Topic> {
        let state = self.state.lock();
        let topic_id = state.active_topic.as_ref()?;
        self.scenarios.get(state.index)?.find_topic(topic_id).cloned()
    }

    /// Snapshot of the current picks
    #[must_use]
    pub fn classifications(&self) -> Classifications {
        self.state.lock().classifications.clone()
    }

    /// Stored grading result for the current scenario
    #[must_use]
    pub fn grading_result(&self) -> Option<GradingResult> {
        self.state.lock().grading.clone()
    }

    /// Extant nodes still unclassified, in node order
    #[must_use]
    pub fn missing_nodes(&self) -> Vec<NodeId> {
        let state = self.state.lock();
        self.scenarios
            .get(state.index)
            .map(|scenario| missing_nodes(scenario, &state.classifications))
            .unwrap_or_default()
    }

    /// Whether every extant node of the current scenario is classified
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let state = self.state.lock();
        self.scenarios
            .get(state.index)
            .is_some_and(|scenario| pst_model::is_complete(scenario, &state.classifications))
    }

    /// Position within the session
    #[must_use]
    pub fn progress(&self) -> Progress {
        let state = self.state.lock();
        let total = self.scenarios.len();
        Progress {
            position: (state.index + 1).min(total),
            total,
            completed: state.session.len(),
        }
    }

    /// Totals over the scenarios advanced past so far
    ///
    /// # Errors
    /// `NoResults` before the first scenario is recorded.
    pub fn session_summary(&self) -> WorkflowResult<SessionSummary> {
        Ok(self.state.lock().session.summary()?)
    }

    /// Grading results recorded so far, in completion order
    #[must_use]
    pub fn session_results(&self) -> Vec<GradingResult> {
        self.state.lock().session.results().to_vec()
    }
}
