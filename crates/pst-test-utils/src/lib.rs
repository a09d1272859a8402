//! Testing utilities for the PST workspace
//!
//! Shared scenario fixtures, grading result builders and scripted
//! collaborators.

#![allow(missing_docs)]

pub mod collaborators;
pub mod fixtures;

pub use collaborators::{GatedGrader, RecordingSink, ScriptedGrader};

use pst_model::{GradeRequest, GradingResult, NodeOutcome};

/// Result awarding `points_each` for every submitted pick
pub fn perfect_grade(request: &GradeRequest, points_each: i64) -> GradingResult {
    let outcomes: Vec<NodeOutcome> = request
        .classifications
        .iter()
        .map(|c| NodeOutcome {
            node_id: c.node_id.clone(),
            is_correct: true,
            points: points_each,
            student_answer: c.label.to_string(),
            correct_answer: c.label.to_string(),
            feedback: "Correct.".to_string(),
        })
        .collect();
    let max = points_each * i64::try_from(outcomes.len()).unwrap_or(i64::MAX);

    GradingResult {
        scenario_id: request.scenario_id.clone(),
        score: max,
        max_score: max,
        topic_label: request.topic_id.to_string(),
        outcomes,
    }
}

/// Result with the given totals and `correct` of `questions` nodes right
pub fn grading_result(
    scenario_id: &str,
    score: i64,
    max_score: i64,
    correct: usize,
    questions: usize,
) -> GradingResult {
    GradingResult {
        scenario_id: scenario_id.into(),
        score,
        max_score,
        topic_label: format!("Topic of {scenario_id}"),
        outcomes: (0..questions)
            .map(|i| NodeOutcome {
                node_id: format!("n{}", i + 1).into(),
                is_correct: i < correct,
                points: 0,
                student_answer: "primary".to_string(),
                correct_answer: if i < correct { "primary" } else { "secondary" }.to_string(),
                feedback: String::new(),
            })
            .collect(),
    }
}
