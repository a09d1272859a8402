//! Scripted collaborators
//!
//! Stand-ins for the grading and session services that record what they were
//! sent and answer from a script.

use crate::perfect_grade;
use parking_lot::Mutex;
use pst_core::{CollaboratorError, Grader, SessionSink};
use pst_model::{GradeRequest, GradingResult, SessionReceipt, SessionSubmission};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Grader answering from a queue, falling back to a perfect grade
#[derive(Debug, Default)]
pub struct ScriptedGrader {
    script: Mutex<VecDeque<Result<GradingResult, CollaboratorError>>>,
    requests: Mutex<Vec<GradeRequest>>,
    points_each: i64,
}

impl ScriptedGrader {
    pub fn new() -> Self {
        Self {
            points_each: 2,
            ..Self::default()
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Queue a result for the next call
    pub fn push_result(&self, result: GradingResult) {
        self.script.lock().push_back(Ok(result));
    }

    /// Queue a failure for the next call
    pub fn push_failure(&self, error: CollaboratorError) {
        self.script.lock().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<GradeRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait::async_trait]
impl Grader for ScriptedGrader {
    async fn grade(&self, request: GradeRequest) -> Result<GradingResult, CollaboratorError> {
        self.requests.lock().push(request.clone());
        let scripted = self.script.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(perfect_grade(&request, self.points_each)))
    }
}

/// Grader that parks every call until [`GatedGrader::release`]
#[derive(Debug, Default)]
pub struct GatedGrader {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

impl GatedGrader {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Wait until a grading call is parked
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let one parked call finish
    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Grader for GatedGrader {
    async fn grade(&self, request: GradeRequest) -> Result<GradingResult, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(perfect_grade(&request, 1))
    }
}

/// Session sink recording submissions
#[derive(Debug)]
pub struct RecordingSink {
    answer: Result<SessionReceipt, CollaboratorError>,
    submissions: Mutex<Vec<SessionSubmission>>,
}

impl RecordingSink {
    /// Accepts everything
    pub fn accepting() -> Self {
        Self::answering(Ok(SessionReceipt {
            success: true,
            message: Some("Results sent to instructor".to_string()),
            report_data: None,
            filename: None,
        }))
    }

    /// Answers `success = false` with `message`
    pub fn rejecting(message: &str) -> Self {
        Self::answering(Ok(SessionReceipt {
            success: false,
            message: Some(message.to_string()),
            report_data: None,
            filename: None,
        }))
    }

    /// Fails at the transport level
    pub fn unreachable() -> Self {
        Self::answering(Err(CollaboratorError::Transport(
            "connection refused".to_string(),
        )))
    }

    fn answering(answer: Result<SessionReceipt, CollaboratorError>) -> Self {
        Self {
            answer,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn submissions(&self) -> Vec<SessionSubmission> {
        self.submissions.lock().clone()
    }
}

#[async_trait::async_trait]
impl SessionSink for RecordingSink {
    async fn submit_session(
        &self,
        submission: SessionSubmission,
    ) -> Result<SessionReceipt, CollaboratorError> {
        self.submissions.lock().push(submission);
        self.answer.clone()
    }
}
