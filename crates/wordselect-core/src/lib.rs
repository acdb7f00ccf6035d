//! wordselect-core: tokenizer, correctness index, and scoring engine.
//!
//! This crate grades "select the correct words" questions: a passage marks
//! its correct words with delimiters (`The cow [jumped]`), a learner selects
//! word positions, and the scoring functions turn one response, or a whole
//! sequence of attempts, into a fraction.

pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod final_grade;
pub mod model;
pub mod parser;
pub mod places;
pub mod question;
pub mod report;
pub mod response;
pub mod results;
pub mod scoring;
pub mod statistics;
pub mod tokenizer;

pub use display::{selectable_text, selectable_words};
pub use error::{DelimiterError, GradingError};
pub use final_grade::final_grade;
pub use model::{DelimiterPair, FinalGradeResult, GradeResult, GradedState, Place, Token};
pub use places::{correct_places, CorrectPlaces};
pub use question::Question;
pub use response::{
    correct_response, is_complete_response, is_same_response, is_selected, summarise, Response,
    Selection,
};
pub use scoring::evaluate;
pub use tokenizer::{expand_markup, split_passage, tokenize};
