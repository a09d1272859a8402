//! Session Aggregator
//!
//! Collects one [`GradingResult`] per finished scenario and derives the
//! session totals shown on the final summary and sent to the instructor.

use crate::error::SessionError;
use pst_model::{percentage, GradingResult, ScenarioId};
use serde::Serialize;
use std::fmt::Write as _;

/// Ordered grading results for one session
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    results: Vec<GradingResult>,
    pass_threshold: u32,
}

impl SessionAggregator {
    /// Empty session with the given pass threshold (percent)
    #[inline]
    #[must_use]
    pub fn new(pass_threshold: u32) -> Self {
        Self {
            results: Vec::new(),
            pass_threshold,
        }
    }

    /// Aggregate pre-existing results, e.g. loaded from a file
    #[must_use]
    pub fn from_results(results: Vec<GradingResult>, pass_threshold: u32) -> Self {
        Self {
            results,
            pass_threshold,
        }
    }

    /// Append a finished scenario
    pub fn record(&mut self, result: GradingResult) {
        self.results.push(result);
    }

    /// Results in completion order
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[GradingResult] {
        &self.results
    }

    /// Number of finished scenarios
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True before the first scenario is recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Session totals
    ///
    /// # Errors
    /// `SessionError::NoResults` when no points were available, which
    /// includes an empty session.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let total_score: i64 = self.results.iter().map(|r| r.score).sum();
        let total_max: i64 = self.results.iter().map(|r| r.max_score).sum();
        let percentage = percentage(total_score, total_max).ok_or(SessionError::NoResults)?;

        let breakdown = self
            .results
            .iter()
            .map(|r| ScenarioBreakdown {
                scenario_id: r.scenario_id.clone(),
                topic_label: r.topic_label.clone(),
                score: r.score,
                max_score: r.max_score,
                percentage: r.percentage(),
            })
            .collect();

        Ok(SessionSummary {
            scenarios_completed: self.results.len(),
            total_score,
            total_max,
            percentage,
            correct_count: self.results.iter().map(GradingResult::correct_count).sum(),
            total_questions: self.results.iter().map(|r| r.outcomes.len()).sum(),
            pass_threshold: self.pass_threshold,
            passed: percentage >= self.pass_threshold,
            breakdown,
        })
    }
}

/// Derived session statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Scenarios recorded
    pub scenarios_completed: usize,
    /// Sum of scenario scores
    pub total_score: i64,
    /// Sum of scenario maxima
    pub total_max: i64,
    /// `round(100 × total_score / total_max)`
    pub percentage: u32,
    /// Correct node verdicts across the session
    pub correct_count: usize,
    /// Node verdicts across the session
    pub total_questions: usize,
    /// Threshold the pass flag was computed against
    pub pass_threshold: u32,
    /// `percentage >= pass_threshold`
    pub passed: bool,
    /// Per-scenario rows in completion order
    pub breakdown: Vec<ScenarioBreakdown>,
}

/// One row of the per-scenario breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioBreakdown {
    /// Scenario graded
    pub scenario_id: ScenarioId,
    /// Research question graded against
    pub topic_label: String,
    /// Points earned
    pub score: i64,
    /// Points available
    pub max_score: i64,
    /// Scenario percentage, `None` when nothing was gradable
    pub percentage: Option<u32>,
}

impl SessionSummary {
    /// Pass/fail label
    #[inline]
    #[must_use]
    pub fn verdict(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// Plain-text report for the instructor
    #[must_use]
    pub fn render_text(&self, student_name: &str) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = writeln!(out, "PRIMARY SOURCE TRAINER - SESSION REPORT");
        let _ = writeln!(out, "Student: {student_name}");
        let _ = writeln!(out, "Scenarios completed: {}", self.scenarios_completed);
        let _ = writeln!(out);

        for (i, row) in self.breakdown.iter().enumerate() {
            let pct = row
                .percentage
                .map_or_else(|| "n/a".to_string(), |p| format!("{p}%"));
            let _ = writeln!(
                out,
                "{}. {} ({}): {}/{} ({pct})",
                i + 1,
                row.scenario_id,
                row.topic_label,
                row.score,
                row.max_score
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total: {}/{} ({}%)",
            self.total_score, self.total_max, self.percentage
        );
        let _ = writeln!(
            out,
            "Correct answers: {}/{}",
            self.correct_count, self.total_questions
        );
        let _ = writeln!(
            out,
            "Result: {} (threshold {}%)",
            self.verdict(),
            self.pass_threshold
        );
        out
    }
}
