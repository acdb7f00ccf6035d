//! The `wordselect grade` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};

use wordselect_core::config::load_config_from;
use wordselect_core::engine::{GradingEngine, GradingEngineConfig, ProgressReporter};
use wordselect_core::parser::{load_question_sets, load_submissions};
use wordselect_core::report::GradingReport;
use wordselect_core::results::{SubmissionFailure, SubmissionResult};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_submission_start(&self, learner: &str, question_id: &str, attempts: usize) {
        tracing::debug!("grading {learner} :: {question_id} ({attempts} attempts)");
    }

    fn on_submission_complete(&self, result: &SubmissionResult) {
        eprintln!(
            "  Graded: {} :: {} [{} attempts] final {:.1}% ({})",
            result.learner,
            result.question_id,
            result.attempts_graded,
            result.final_fraction * 100.0,
            result.final_state,
        );
    }

    fn on_submission_error(&self, failure: &SubmissionFailure) {
        eprintln!(
            "  ERROR: {} :: {}: {}",
            failure.learner, failure.question_id, failure.message
        );
    }

    fn on_set_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} graded, {failed} failed ({:.3}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub fn execute(
    question_set_path: PathBuf,
    submissions_path: PathBuf,
    penalty: Option<f64>,
    output: Option<PathBuf>,
    format: String,
    keep_repeats: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if let Some(p) = penalty {
        anyhow::ensure!(
            (0.0..=1.0).contains(&p),
            "penalty must be between 0.0 and 1.0"
        );
    }
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "markdown" | "md"),
        "unknown format: {format} (expected text, json or markdown)"
    );

    let config = load_config_from(config_path.as_deref())?;
    let sets = load_question_sets(&question_set_path, &config.question_defaults())?;
    anyhow::ensure!(
        !sets.is_empty(),
        "no question sets found in {}",
        question_set_path.display()
    );
    let submissions = load_submissions(&submissions_path)?;

    let question_count: usize = sets.iter().map(|s| s.questions.len()).sum();
    eprintln!(
        "wordselect v{}: grading {} submissions against {} questions",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        question_count
    );
    eprintln!();

    let engine = GradingEngine::new(GradingEngineConfig {
        collapse_repeated_attempts: config.collapse_repeated_attempts && !keep_repeats,
        penalty_override: penalty,
    });
    let report = engine.run(&sets, &submissions, &ConsoleReporter);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "markdown" | "md" => println!("{}", report.to_markdown()),
        _ => print_summary(&report),
    }

    let output = output.unwrap_or(config.output_dir);
    std::fs::create_dir_all(&output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &GradingReport) {
    let mut table = Table::new();
    table.set_header(vec![
        "Learner", "Question", "Attempts", "Last", "Final", "State", "Selected",
    ]);

    for r in &report.results {
        table.add_row(vec![
            Cell::new(&r.learner),
            Cell::new(&r.question_id),
            Cell::new(r.attempts_graded),
            Cell::new(format!("{:.1}%", r.last_attempt.fraction * 100.0)),
            Cell::new(format!("{:.1}%", r.final_fraction * 100.0)),
            Cell::new(r.final_state),
            Cell::new(&r.summary),
        ]);
    }

    println!("{table}");
    println!(
        "Mean final grade: {:.1}% across {} learner(s)",
        report.aggregate.mean_final_fraction * 100.0,
        report.learners_graded.len()
    );
    if report.has_failures() {
        println!("{} submission(s) could not be graded", report.failures.len());
    }
}
