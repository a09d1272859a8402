//! Grading and session wire types
//!
//! These are the shapes exchanged with the grading and session collaborators.
//! Correctness is decided by the grader; nothing here computes it.

use crate::classification::Classification;
use crate::ids::{NodeId, ScenarioId, TopicId};
use serde::{Deserialize, Serialize};

/// Request sent to the grader for one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRequest {
    /// Graded scenario
    pub scenario_id: ScenarioId,
    /// Research question the picks were made against
    pub topic_id: TopicId,
    /// Learner name
    pub student_name: String,
    /// Picks in scenario node order
    pub classifications: Vec<Classification>,
}

/// Grader verdict for one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingResult {
    /// Graded scenario
    pub scenario_id: ScenarioId,
    /// Points earned
    pub score: i64,
    /// Points available
    pub max_score: i64,
    /// Label of the topic graded against
    pub topic_label: String,
    /// Per-node verdicts
    #[serde(rename = "results")]
    pub outcomes: Vec<NodeOutcome>,
}

impl GradingResult {
    /// Number of correctly classified nodes
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_correct).count()
    }

    /// Scenario percentage, `None` when nothing was gradable
    #[must_use]
    pub fn percentage(&self) -> Option<u32> {
        percentage(self.score, self.max_score)
    }
}

/// Verdict for one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOutcome {
    /// Node the verdict is for
    pub node_id: NodeId,
    /// Whether the learner's label matched
    pub is_correct: bool,
    /// Points awarded
    pub points: i64,
    /// What the learner answered
    pub student_answer: String,
    /// What the grader expected
    pub correct_answer: String,
    /// Explanation shown to the learner
    pub feedback: String,
}

/// End-of-session payload for the session collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSubmission {
    /// Learner name
    pub student_name: String,
    /// Optional address for a copy of the report
    #[serde(default)]
    pub student_email: Option<String>,
    /// One result per completed scenario, in session order
    pub scenario_results: Vec<GradingResult>,
}

/// Session collaborator response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReceipt {
    /// Whether the results were accepted
    pub success: bool,
    /// User-facing explanation
    #[serde(default)]
    pub message: Option<String>,
    /// Report document the learner can download
    #[serde(default)]
    pub report_data: Option<serde_json::Value>,
    /// Suggested file name for `report_data`
    #[serde(default)]
    pub filename: Option<String>,
}

/// `round(100 × score / max)`, `None` for a zero or negative maximum
#[must_use]
pub fn percentage(score: i64, max: i64) -> Option<u32> {
    if max <= 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (100.0 * score as f64 / max as f64).round().max(0.0) as u32;
    Some(pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(14, 20), Some(70));
        assert_eq!(percentage(1, 3), Some(33));
        assert_eq!(percentage(2, 3), Some(67));
        assert_eq!(percentage(1, 8), Some(13));
        assert_eq!(percentage(0, 0), None);
    }

    #[test]
    fn grading_result_reads_grader_payload() {
        let json = r#"{
            "scenario_id": "s1",
            "score": 8,
            "max_score": 10,
            "topic_label": "The raid itself",
            "results": [
                {"node_id": "n1", "student_answer": "primary", "correct_answer": "primary",
                 "is_correct": true, "points": 5, "feedback": "Eyewitness letter."},
                {"node_id": "n2", "student_answer": "primary", "correct_answer": "secondary",
                 "is_correct": false, "points": 0, "feedback": "Compiled later."}
            ]
        }"#;
        let result: GradingResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.correct_count(), 1);
        assert_eq!(result.percentage(), Some(80));
    }

    #[test]
    fn receipt_tolerates_missing_optionals() {
        let receipt: SessionReceipt = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!receipt.success);
        assert!(receipt.message.is_none());
    }
}
