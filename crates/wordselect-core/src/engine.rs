//! Batch grading engine.
//!
//! Grades many learners' submissions against loaded question sets. Each
//! submission is independent: a failure is recorded and the rest carry on.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::error::GradingError;
use crate::model::{GradedState, QuestionSet, Submission};
use crate::question::Question;
use crate::report::{GradingReport, QuestionSetSummary};
use crate::response::{is_same_response, Response};
use crate::results::{FailureKind, SubmissionFailure, SubmissionResult};
use crate::statistics::compute_aggregate_stats;

/// Configuration for the grading engine.
#[derive(Debug, Clone)]
pub struct GradingEngineConfig {
    /// Drop an attempt identical to the one immediately before it.
    pub collapse_repeated_attempts: bool,
    /// Penalty used instead of each question's own.
    pub penalty_override: Option<f64>,
}

impl Default for GradingEngineConfig {
    fn default() -> Self {
        Self {
            collapse_repeated_attempts: true,
            penalty_override: None,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_submission_start(&self, learner: &str, question_id: &str, attempts: usize);
    fn on_submission_complete(&self, result: &SubmissionResult);
    fn on_submission_error(&self, failure: &SubmissionFailure);
    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_submission_start(&self, _: &str, _: &str, _: usize) {}
    fn on_submission_complete(&self, _: &SubmissionResult) {}
    fn on_submission_error(&self, _: &SubmissionFailure) {}
    fn on_set_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Remove attempts that repeat the attempt right before them.
pub fn collapse_repeats(attempts: &[Response]) -> Vec<Response> {
    let mut kept: Vec<Response> = Vec::with_capacity(attempts.len());
    for attempt in attempts {
        if kept.last().is_some_and(|prev| is_same_response(prev, attempt)) {
            continue;
        }
        kept.push(attempt.clone());
    }
    kept
}

/// The batch grading engine.
pub struct GradingEngine {
    config: GradingEngineConfig,
}

impl GradingEngine {
    pub fn new(config: GradingEngineConfig) -> Self {
        Self { config }
    }

    /// Grade one submission against its question.
    pub fn grade_submission(
        &self,
        question: &Question,
        submission: &Submission,
    ) -> Result<SubmissionResult, GradingError> {
        let question = match self.config.penalty_override {
            Some(penalty) => question.clone().with_penalty(penalty),
            None => question.clone(),
        };

        let attempts = if self.config.collapse_repeated_attempts {
            collapse_repeats(&submission.attempts)
        } else {
            submission.attempts.clone()
        };

        let empty = Response::new();
        let last = attempts.last().unwrap_or(&empty);
        let (last_attempt, last_state) = question.grade_response(last)?;
        let final_grade = question.compute_final_grade(&attempts)?;

        Ok(SubmissionResult {
            learner: submission.learner.clone(),
            question_id: submission.question_id.clone(),
            attempts_submitted: submission.attempts.len(),
            attempts_graded: attempts.len(),
            last_attempt,
            last_state,
            final_fraction: final_grade.fraction,
            final_state: GradedState::for_fraction(final_grade.fraction),
            summary: question.summarise_response(last),
            validation: question.validation_error(last),
        })
    }

    /// Grade every submission against the given question sets.
    pub fn run(
        &self,
        sets: &[QuestionSet],
        submissions: &[Submission],
        progress: &dyn ProgressReporter,
    ) -> GradingReport {
        let start = Instant::now();
        let run_id = Uuid::new_v4();

        let mut results = Vec::new();
        let mut failures = Vec::new();

        for submission in submissions {
            progress.on_submission_start(
                &submission.learner,
                &submission.question_id,
                submission.attempts.len(),
            );

            let question = sets
                .iter()
                .find_map(|set| set.question(&submission.question_id));

            let outcome = match question {
                Some(question) => self
                    .grade_submission(question, submission)
                    .map_err(|e| (FailureKind::Configuration, e.to_string())),
                None => Err((
                    FailureKind::UnknownQuestion,
                    format!("unknown question: {}", submission.question_id),
                )),
            };

            match outcome {
                Ok(result) => {
                    progress.on_submission_complete(&result);
                    results.push(result);
                }
                Err((kind, message)) => {
                    match kind {
                        FailureKind::UnknownQuestion => tracing::warn!(
                            "skipping {}/{}: {message}",
                            submission.learner,
                            submission.question_id
                        ),
                        FailureKind::Configuration => tracing::error!(
                            "grading failed for {}/{}: {message}",
                            submission.learner,
                            submission.question_id
                        ),
                    }
                    let failure = SubmissionFailure {
                        learner: submission.learner.clone(),
                        question_id: submission.question_id.clone(),
                        kind,
                        message,
                    };
                    progress.on_submission_error(&failure);
                    failures.push(failure);
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_set_complete(submissions.len(), results.len(), failures.len(), elapsed);

        let aggregate = compute_aggregate_stats(&results);
        let learners_graded: Vec<String> = results
            .iter()
            .map(|r| r.learner.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        GradingReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            question_sets: sets
                .iter()
                .map(|set| QuestionSetSummary {
                    id: set.id.clone(),
                    name: set.name.clone(),
                    question_count: set.questions.len(),
                })
                .collect(),
            learners_graded,
            results,
            failures,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DelimiterPair, DEFAULT_PENALTY};

    fn set() -> QuestionSet {
        QuestionSet {
            id: "animals".into(),
            name: "Animals".into(),
            description: String::new(),
            questions: vec![
                Question::new("cow", "The cow [jumped] over [the] moon").with_penalty(0.1),
                Question::new("broken", "nothing marked"),
            ],
            default_delimiters: DelimiterPair::default(),
            default_penalty: DEFAULT_PENALTY,
        }
    }

    fn submission(learner: &str, question_id: &str, attempts: Vec<Response>) -> Submission {
        Submission {
            learner: learner.into(),
            question_id: question_id.into(),
            attempts,
        }
    }

    #[test]
    fn collapse_drops_consecutive_repeats_only() {
        let a = Response::selecting([2]);
        let b = Response::selecting([2, 4]);
        let kept = collapse_repeats(&[a.clone(), a.clone(), b.clone(), a.clone()]);
        assert_eq!(kept, vec![a.clone(), b, a]);
    }

    #[test]
    fn grades_and_isolates_failures() {
        let engine = GradingEngine::new(GradingEngineConfig::default());
        let submissions = vec![
            submission(
                "ada",
                "cow",
                vec![Response::new(), Response::selecting([2]), Response::selecting([2, 4])],
            ),
            submission("bob", "broken", vec![Response::selecting([0])]),
            submission("cy", "missing", vec![]),
            submission("dee", "cow", vec![Response::selecting([2])]),
        ];

        let report = engine.run(&[set()], &submissions, &NoopReporter);

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].kind, FailureKind::Configuration);
        assert_eq!(report.failures[1].kind, FailureKind::UnknownQuestion);
        assert_eq!(report.learners_graded, vec!["ada", "dee"]);

        let ada = &report.results[0];
        assert!((ada.final_fraction - 0.85).abs() < 1e-9);
        assert_eq!(ada.final_state, GradedState::GradedPartial);
        assert_eq!(ada.last_state, GradedState::GradedRight);
        assert_eq!(ada.summary, "jumped the");
    }

    #[test]
    fn repeated_attempts_not_penalized_when_collapsed() {
        let attempts = vec![
            Response::selecting([2, 4]),
            Response::selecting([4, 2]),
        ];
        let sub = submission("ada", "cow", attempts);
        let question = set().questions[0].clone();

        let collapsing = GradingEngine::new(GradingEngineConfig::default());
        let result = collapsing.grade_submission(&question, &sub).unwrap();
        assert_eq!(result.attempts_graded, 1);
        assert!((result.final_fraction - 1.0).abs() < 1e-9);

        let keeping = GradingEngine::new(GradingEngineConfig {
            collapse_repeated_attempts: false,
            penalty_override: None,
        });
        let result = keeping.grade_submission(&question, &sub).unwrap();
        assert_eq!(result.attempts_graded, 2);
        // both places present in every attempt, so still full credit
        assert!((result.final_fraction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn penalty_override_applies() {
        let sub = submission(
            "ada",
            "cow",
            vec![Response::new(), Response::selecting([2, 4])],
        );
        let question = set().questions[0].clone();
        let engine = GradingEngine::new(GradingEngineConfig {
            collapse_repeated_attempts: true,
            penalty_override: Some(0.5),
        });
        let result = engine.grade_submission(&question, &sub).unwrap();
        assert!((result.final_fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn negative_question_penalty_is_a_failure() {
        let mut steep = set();
        steep.questions[0] = steep.questions[0].clone().with_penalty(-0.5);
        let submissions = vec![submission(
            "ada",
            "cow",
            vec![Response::new(), Response::selecting([2, 4])],
        )];

        let report = GradingEngine::new(GradingEngineConfig::default()).run(
            &[steep],
            &submissions,
            &NoopReporter,
        );

        assert!(report.results.is_empty());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::Configuration);
        assert!(report.failures[0].message.contains("penalty"));
    }

    #[test]
    fn empty_submission_scores_zero_with_validation_issue() {
        let engine = GradingEngine::new(GradingEngineConfig::default());
        let question = set().questions[0].clone();
        let result = engine
            .grade_submission(&question, &submission("ada", "cow", vec![]))
            .unwrap();
        assert_eq!(result.final_fraction, 0.0);
        assert_eq!(result.last_state, GradedState::GradedWrong);
        assert!(result.validation.is_some());
    }
}
