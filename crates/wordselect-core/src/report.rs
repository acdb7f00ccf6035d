//! Grading report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::{SubmissionFailure, SubmissionResult};
use crate::statistics::AggregateStats;

/// A complete grading report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Question sets the submissions were graded against.
    pub question_sets: Vec<QuestionSetSummary>,
    /// Learners with at least one graded submission, sorted.
    pub learners_graded: Vec<String>,
    /// Individual submission results, in input order.
    pub results: Vec<SubmissionResult>,
    /// Submissions that could not be graded.
    #[serde(default)]
    pub failures: Vec<SubmissionFailure>,
    /// Aggregate statistics.
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of a question set (without the full question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSetSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl GradingReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} graded, {} failed, mean final grade {:.1}%\n\n",
            self.results.len(),
            self.failures.len(),
            self.aggregate.mean_final_fraction * 100.0
        ));

        if !self.results.is_empty() {
            md.push_str("### Results\n\n");
            md.push_str("| Learner | Question | Attempts | Last | Final | State |\n");
            md.push_str("|---------|----------|----------|------|-------|-------|\n");
            for r in &self.results {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.1}% | {:.1}% | {} |\n",
                    r.learner,
                    r.question_id,
                    r.attempts_graded,
                    r.last_attempt.fraction * 100.0,
                    r.final_fraction * 100.0,
                    r.final_state
                ));
            }
            md.push('\n');
        }

        if !self.aggregate.per_question.is_empty() {
            let mut questions: Vec<_> = self.aggregate.per_question.values().collect();
            questions.sort_by(|a, b| a.question_id.cmp(&b.question_id));

            md.push_str("### Questions\n\n");
            md.push_str("| Question | Submissions | Mean | Right | Partial | Wrong |\n");
            md.push_str("|----------|-------------|------|-------|---------|-------|\n");
            for q in questions {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {} | {} | {} |\n",
                    q.question_id,
                    q.submissions,
                    q.mean_final_fraction * 100.0,
                    q.right,
                    q.partial,
                    q.wrong
                ));
            }
            md.push('\n');
        }

        if !self.failures.is_empty() {
            md.push_str("### Failures\n\n");
            for f in &self.failures {
                md.push_str(&format!("- {} / {}: {}\n", f.learner, f.question_id, f.message));
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GradingEngine, GradingEngineConfig, NoopReporter};
    use crate::model::{QuestionSet, Submission, DEFAULT_PENALTY};
    use crate::question::Question;
    use crate::response::Response;

    fn make_report() -> GradingReport {
        let set = QuestionSet {
            id: "animals".into(),
            name: "Animals".into(),
            description: String::new(),
            questions: vec![Question::new("cow", "The cow [jumped] over [the] moon")],
            default_delimiters: Default::default(),
            default_penalty: DEFAULT_PENALTY,
        };
        let submissions = vec![
            Submission {
                learner: "ada".into(),
                question_id: "cow".into(),
                attempts: vec![Response::selecting([2, 4])],
            },
            Submission {
                learner: "bob".into(),
                question_id: "nope".into(),
                attempts: vec![],
            },
        ];
        GradingEngine::new(GradingEngineConfig::default()).run(&[set], &submissions, &NoopReporter)
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = GradingReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.question_sets[0].question_count, 1);
    }

    #[test]
    fn markdown_output() {
        let md = make_report().to_markdown();
        assert!(md.contains("1 graded, 1 failed"));
        assert!(md.contains("| ada | cow | 1 | 100.0% | 100.0% | gradedright |"));
        assert!(md.contains("### Failures"));
        assert!(md.contains("unknown question: nope"));
    }

    #[test]
    fn load_missing_report_is_error() {
        assert!(GradingReport::load_json(Path::new("/nonexistent/report.json")).is_err());
    }
}
