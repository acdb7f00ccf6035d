//! Question set and submission loaders.
//!
//! Question sets are TOML files (or directories of them); submissions are
//! JSON. Both are validated here rather than deep inside scoring.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::final_grade::check_penalty;
use crate::model::{DelimiterPair, QuestionSet, Submission, DEFAULT_PENALTY};
use crate::question::Question;

/// Intermediate TOML structure for parsing question set files.
#[derive(Debug, Deserialize)]
struct TomlQuestionFile {
    question_set: TomlQuestionSetHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestionSetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    default_delimiters: Option<String>,
    #[serde(default)]
    default_penalty: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(default)]
    name: Option<String>,
    text: String,
    #[serde(default)]
    delimiters: Option<String>,
    #[serde(default)]
    penalty: Option<f64>,
}

/// Defaults applied to questions that leave delimiters or penalty unset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionDefaults {
    pub delimiters: DelimiterPair,
    pub penalty: f64,
}

impl Default for QuestionDefaults {
    fn default() -> Self {
        Self {
            delimiters: DelimiterPair::default(),
            penalty: DEFAULT_PENALTY,
        }
    }
}

/// Top-level shape of a submissions file.
#[derive(Debug, Deserialize)]
struct SubmissionsFile {
    #[serde(default)]
    submissions: Vec<Submission>,
}

fn parse_delimiters(raw: &str, context: &str) -> Result<DelimiterPair> {
    raw.parse::<DelimiterPair>()
        .with_context(|| format!("invalid delimiters for {context}"))
}

/// Parse a single TOML file into a `QuestionSet`.
pub fn parse_question_set(path: &Path, defaults: &QuestionDefaults) -> Result<QuestionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question set file: {}", path.display()))?;

    parse_question_set_str(&content, path, defaults)
}

/// Parse a TOML string into a `QuestionSet` (useful for testing).
pub fn parse_question_set_str(
    content: &str,
    source_path: &Path,
    defaults: &QuestionDefaults,
) -> Result<QuestionSet> {
    let parsed: TomlQuestionFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let header = parsed.question_set;
    let default_delimiters = match &header.default_delimiters {
        Some(raw) => parse_delimiters(raw, &format!("question set '{}'", header.id))?,
        None => defaults.delimiters,
    };
    let default_penalty = check_penalty(header.default_penalty.unwrap_or(defaults.penalty))
        .with_context(|| format!("invalid default penalty for question set '{}'", header.id))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let delimiters = match &q.delimiters {
                Some(raw) => parse_delimiters(raw, &format!("question '{}'", q.id))?,
                None => default_delimiters,
            };
            let penalty = check_penalty(q.penalty.unwrap_or(default_penalty))
                .with_context(|| format!("invalid penalty for question '{}'", q.id))?;
            Ok(Question {
                name: q.name.unwrap_or_else(|| q.id.clone()),
                id: q.id,
                text: q.text,
                delimiters,
                penalty,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionSet {
        id: header.id,
        name: header.name,
        description: header.description,
        questions,
        default_delimiters,
        default_penalty,
    })
}

/// Recursively load all `.toml` question set files from a directory.
pub fn load_question_directory(dir: &Path, defaults: &QuestionDefaults) -> Result<Vec<QuestionSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            sets.extend(load_question_directory(&path, defaults)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_set(&path, defaults) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a single file or every question set below a directory.
pub fn load_question_sets(path: &Path, defaults: &QuestionDefaults) -> Result<Vec<QuestionSet>> {
    if path.is_dir() {
        load_question_directory(path, defaults)
    } else {
        Ok(vec![parse_question_set(path, defaults)?])
    }
}

/// Load learner submissions from a JSON file.
pub fn load_submissions(path: &Path) -> Result<Vec<Submission>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions file: {}", path.display()))?;
    parse_submissions_str(&content)
        .with_context(|| format!("failed to parse submissions: {}", path.display()))
}

/// Parse submissions JSON; entry order inside each attempt is preserved.
pub fn parse_submissions_str(content: &str) -> Result<Vec<Submission>> {
    let parsed: SubmissionsFile = serde_json::from_str(content)?;
    Ok(parsed.submissions)
}

/// A warning from question set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for common authoring issues.
pub fn validate_question_set(set: &QuestionSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if set.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "question set has no questions".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = std::collections::HashSet::new();
    for question in &set.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &set.questions {
        let warn = |message: String| ValidationWarning {
            question_id: Some(question.id.clone()),
            message,
        };

        if question.text.trim().is_empty() {
            warnings.push(warn("text is empty".into()));
            continue;
        }

        if question.correct_places().is_empty() {
            warnings.push(warn(format!(
                "no words marked with {} delimiters; responses cannot be graded",
                question.delimiters
            )));
        }

        if !(0.0..=1.0).contains(&question.penalty) {
            warnings.push(warn(format!(
                "penalty {} is outside 0.0..=1.0",
                question.penalty
            )));
        }

        let unselectable = question.unselectable_words();
        let correct = question.correct_places();
        if unselectable.keys().any(|&i| correct.contains_index(i)) {
            warnings.push(warn("a correct word sits inside an unselectable *fence*".into()));
        }
    }

    warnings
}
