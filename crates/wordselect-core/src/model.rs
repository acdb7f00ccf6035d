//! Core data model types for wordselect.
//!
//! These are the plain data records shared by the tokenizer, the scoring
//! functions, and the batch grading engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DelimiterError;
use crate::response::Response;

/// Penalty applied per extra attempt when nothing else is configured.
pub const DEFAULT_PENALTY: f64 = 0.3333333;

/// The two characters that mark a correct token, e.g. `[cat]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DelimiterPair {
    left: char,
    right: char,
}

impl DelimiterPair {
    /// Build a pair from two characters. Equal characters (e.g. `##`) are allowed.
    pub fn new(left: char, right: char) -> Result<Self, DelimiterError> {
        for c in [left, right] {
            if c.is_whitespace() {
                return Err(DelimiterError::Whitespace(c));
            }
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> char {
        self.left
    }

    pub fn right(&self) -> char {
        self.right
    }

    /// Whether `c` is either delimiter character.
    pub fn contains(&self, c: char) -> bool {
        c == self.left || c == self.right
    }
}

impl Default for DelimiterPair {
    fn default() -> Self {
        Self {
            left: '[',
            right: ']',
        }
    }
}

impl fmt::Display for DelimiterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.left, self.right)
    }
}

impl FromStr for DelimiterPair {
    type Err = DelimiterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(left), Some(right), None) => Self::new(left, right),
            _ => Err(DelimiterError::WrongLength(s.to_string())),
        }
    }
}

impl TryFrom<String> for DelimiterPair {
    type Error = DelimiterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DelimiterPair> for String {
    fn from(pair: DelimiterPair) -> Self {
        pair.to_string()
    }
}

/// Positional identifier of one token. Rendered as `p<index>` in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Place(pub usize);

impl Place {
    /// The response key for this place, e.g. `p3`.
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Parse a response key. Anything but `p` followed by digits is not a place.
    pub fn from_key(key: &str) -> Option<Self> {
        let digits = key.strip_prefix('p')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Place)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// One raw token of a tokenized passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 0-based position in the whitespace split.
    pub index: usize,
    /// Raw token text, delimiters and markup included.
    pub text: String,
    /// Whether this position is a correct place.
    pub is_correct: bool,
}

/// Outcome of scoring a single response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Score in `[0, 1]`.
    pub fraction: f64,
    /// Correct places that were selected.
    pub right_count: usize,
    /// Selected places that are not correct.
    pub wrong_count: usize,
}

/// Outcome of aggregating a sequence of attempts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalGradeResult {
    /// Score in `[0, 1]`.
    pub fraction: f64,
}

/// Terminal state label handed to the host for a graded fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradedState {
    GradedWrong,
    GradedPartial,
    GradedRight,
}

impl GradedState {
    /// Map a fraction onto wrong / partial / right with a small tolerance
    /// on both ends.
    pub fn for_fraction(fraction: f64) -> Self {
        if fraction < 0.0000001 {
            GradedState::GradedWrong
        } else if fraction > 0.9999999 {
            GradedState::GradedRight
        } else {
            GradedState::GradedPartial
        }
    }
}

impl fmt::Display for GradedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradedState::GradedWrong => write!(f, "gradedwrong"),
            GradedState::GradedPartial => write!(f, "gradedpartial"),
            GradedState::GradedRight => write!(f, "gradedright"),
        }
    }
}

impl FromStr for GradedState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gradedwrong" | "wrong" => Ok(GradedState::GradedWrong),
            "gradedpartial" | "partial" => Ok(GradedState::GradedPartial),
            "gradedright" | "right" => Ok(GradedState::GradedRight),
            other => Err(format!("unknown graded state: {other}")),
        }
    }
}

/// A collection of questions loaded from one question-set file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSet {
    /// Unique identifier for this question set.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of this question set.
    #[serde(default)]
    pub description: String,
    /// The questions in this set.
    #[serde(default)]
    pub questions: Vec<crate::question::Question>,
    /// Delimiters for questions that don't specify their own.
    #[serde(default)]
    pub default_delimiters: DelimiterPair,
    /// Penalty for questions that don't specify their own.
    #[serde(default = "default_penalty")]
    pub default_penalty: f64,
}

impl QuestionSet {
    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&crate::question::Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

fn default_penalty() -> f64 {
    DEFAULT_PENALTY
}

/// One learner's attempts at one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Learner identifier.
    pub learner: String,
    /// The question these attempts belong to.
    pub question_id: String,
    /// Responses in the order they were submitted.
    #[serde(default)]
    pub attempts: Vec<Response>,
}
