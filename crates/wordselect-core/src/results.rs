//! Per-submission grading results.

use serde::{Deserialize, Serialize};

use crate::model::{GradeResult, GradedState};
use crate::question::ValidationIssue;

/// The outcome of grading one learner's attempts at one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Learner identifier.
    pub learner: String,
    /// Question that was graded.
    pub question_id: String,
    /// Attempts present in the submission.
    pub attempts_submitted: usize,
    /// Attempts left after repeated ones were collapsed.
    pub attempts_graded: usize,
    /// Score of the last graded attempt on its own.
    pub last_attempt: GradeResult,
    /// State label for `last_attempt`.
    pub last_state: GradedState,
    /// Aggregate score across all graded attempts.
    pub final_fraction: f64,
    /// State label for `final_fraction`.
    pub final_state: GradedState,
    /// Displayed words selected in the last attempt.
    pub summary: String,
    /// Set when the last attempt selected nothing.
    #[serde(default)]
    pub validation: Option<ValidationIssue>,
}

/// Why a submission could not be graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The submission names a question that no loaded set contains.
    UnknownQuestion,
    /// The question cannot be graded as configured.
    Configuration,
}

/// A submission that was recorded but not graded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionFailure {
    pub learner: String,
    pub question_id: String,
    pub kind: FailureKind,
    pub message: String,
}
