//! A graded select-the-words question.
//!
//! `Question` composes a passage, its delimiters and its penalty with the
//! free functions of the tokenizer and scoring modules. Hosts drive it
//! through these methods; nothing here keeps state between calls.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::display::selectable_words;
use crate::error::GradingError;
use crate::final_grade::final_grade;
use crate::model::{
    DelimiterPair, FinalGradeResult, GradeResult, GradedState, Place, Token, DEFAULT_PENALTY,
};
use crate::places::{correct_places, CorrectPlaces};
use crate::response::{self, Response};
use crate::scoring::evaluate;
use crate::tokenizer;

/// A problem with a response that should be shown to the learner instead of grading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Nothing was selected.
    NoSelection,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::NoSelection => write!(f, "please select an answer"),
        }
    }
}

/// One question: a passage with delimiter-marked correct words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its question set.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// The passage, possibly containing markup.
    pub text: String,
    /// Characters marking correct words.
    #[serde(default)]
    pub delimiters: DelimiterPair,
    /// Credit lost per extra attempt before a word was right.
    #[serde(default = "default_penalty")]
    pub penalty: f64,
}

fn default_penalty() -> f64 {
    DEFAULT_PENALTY
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            text: text.into(),
            delimiters: DelimiterPair::default(),
            penalty: DEFAULT_PENALTY,
        }
    }

    pub fn with_delimiters(mut self, delimiters: DelimiterPair) -> Self {
        self.delimiters = delimiters;
        self
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn correct_places(&self) -> CorrectPlaces {
        correct_places(&self.text, &self.delimiters)
    }

    pub fn tokens(&self) -> Vec<Token> {
        tokenizer::tokens(&self.text, &self.delimiters)
    }

    pub fn selectable_words(&self) -> Vec<String> {
        selectable_words(&self.text, &self.delimiters)
    }

    pub fn unselectable_words(&self) -> BTreeMap<usize, String> {
        tokenizer::unselectable_words(&self.text)
    }

    /// Keys a response to this question may carry: `p0` up to the last word.
    pub fn expected_places(&self) -> Vec<String> {
        (0..self.selectable_words().len())
            .map(|i| Place(i).key())
            .collect()
    }

    pub fn correct_response(&self) -> Response {
        response::correct_response(&self.text, &self.delimiters)
    }

    pub fn is_complete_response(&self, response: &Response) -> bool {
        response::is_complete_response(response)
    }

    pub fn is_same_response(&self, previous: &Response, current: &Response) -> bool {
        response::is_same_response(previous, current)
    }

    pub fn validation_error(&self, response: &Response) -> Option<ValidationIssue> {
        if self.is_complete_response(response) {
            None
        } else {
            Some(ValidationIssue::NoSelection)
        }
    }

    /// The displayed words the response touched, in response order.
    pub fn summarise_response(&self, response: &Response) -> String {
        response::summarise(response, &self.selectable_words())
    }

    /// Grade one response and label the outcome.
    pub fn grade_response(
        &self,
        response: &Response,
    ) -> Result<(GradeResult, GradedState), GradingError> {
        let result = evaluate(&self.correct_places(), response)?;
        Ok((result, GradedState::for_fraction(result.fraction)))
    }

    /// Aggregate all attempts at this question with its penalty.
    pub fn compute_final_grade(
        &self,
        attempts: &[Response],
    ) -> Result<FinalGradeResult, GradingError> {
        final_grade(attempts, &self.correct_places(), self.penalty)
    }
}
