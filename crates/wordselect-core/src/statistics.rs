//! Aggregate statistics across graded submissions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::GradedState;
use crate::results::SubmissionResult;

/// Aggregate statistics across all results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Per-question statistics.
    pub per_question: HashMap<String, QuestionStats>,
    /// Per-learner statistics.
    pub per_learner: HashMap<String, LearnerStats>,
    /// Mean final fraction over every graded submission.
    pub mean_final_fraction: f64,
}

/// Statistics for a single question across all learners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionStats {
    /// Question identifier.
    pub question_id: String,
    /// Graded submissions for this question.
    pub submissions: usize,
    /// Mean final fraction.
    pub mean_final_fraction: f64,
    /// Mean number of attempts graded.
    pub mean_attempts: f64,
    /// Submissions whose final state was right.
    pub right: usize,
    /// Submissions whose final state was partial.
    pub partial: usize,
    /// Submissions whose final state was wrong.
    pub wrong: usize,
}

/// Statistics for a single learner across all questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerStats {
    /// Learner identifier.
    pub learner: String,
    /// Questions graded for this learner.
    pub questions: usize,
    /// Mean final fraction.
    pub mean_final_fraction: f64,
    /// Sum of final fractions, i.e. marks out of `questions`.
    pub total: f64,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Compute aggregate statistics from all results.
pub fn compute_aggregate_stats(results: &[SubmissionResult]) -> AggregateStats {
    let mut by_question: HashMap<&str, Vec<&SubmissionResult>> = HashMap::new();
    let mut by_learner: HashMap<&str, Vec<&SubmissionResult>> = HashMap::new();
    for r in results {
        by_question.entry(&r.question_id).or_default().push(r);
        by_learner.entry(&r.learner).or_default().push(r);
    }

    let per_question = by_question
        .into_iter()
        .map(|(question_id, group)| {
            let count_state =
                |state: GradedState| group.iter().filter(|r| r.final_state == state).count();
            let stats = QuestionStats {
                question_id: question_id.to_string(),
                submissions: group.len(),
                mean_final_fraction: mean(group.iter().map(|r| r.final_fraction)),
                mean_attempts: mean(group.iter().map(|r| r.attempts_graded as f64)),
                right: count_state(GradedState::GradedRight),
                partial: count_state(GradedState::GradedPartial),
                wrong: count_state(GradedState::GradedWrong),
            };
            (question_id.to_string(), stats)
        })
        .collect();

    let per_learner = by_learner
        .into_iter()
        .map(|(learner, group)| {
            let stats = LearnerStats {
                learner: learner.to_string(),
                questions: group.len(),
                mean_final_fraction: mean(group.iter().map(|r| r.final_fraction)),
                total: group.iter().map(|r| r.final_fraction).sum(),
            };
            (learner.to_string(), stats)
        })
        .collect();

    AggregateStats {
        per_question,
        per_learner,
        mean_final_fraction: mean(results.iter().map(|r| r.final_fraction)),
    }
}
