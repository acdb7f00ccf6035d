//! Single-response scoring.
//!
//! Partial credit for each correct place selected, minus the same weight for
//! each wrong selection, floored at zero. Counts are returned, never kept.

use crate::error::GradingError;
use crate::model::{GradeResult, Place};
use crate::places::CorrectPlaces;
use crate::response::{Response, SELECTED};

/// Selected entries that are not correct places.
///
/// Only the exact value `"on"` counts here; `"true"` is accepted as a
/// selection of a correct place but not held against the learner.
pub fn wrong_count(correct: &CorrectPlaces, response: &Response) -> usize {
    response
        .entries()
        .filter(|(key, value)| {
            let is_correct = Place::from_key(key).is_some_and(|p| correct.contains(p));
            !is_correct && *value == SELECTED
        })
        .count()
}

/// Correct places selected in `response`.
pub fn right_count(correct: &CorrectPlaces, response: &Response) -> usize {
    correct
        .iter()
        .filter(|&place| response.selection(place).is_selected())
        .count()
}

/// Score one response against the correct places.
pub fn evaluate(correct: &CorrectPlaces, response: &Response) -> Result<GradeResult, GradingError> {
    let total = correct.divisor()?;
    let right_count = right_count(correct, response);
    let wrong_count = wrong_count(correct, response);

    let fraction = (right_count as f64 / total - wrong_count as f64 / total).max(0.0);

    tracing::debug!(right_count, wrong_count, fraction, "evaluated response");

    Ok(GradeResult {
        fraction,
        right_count,
        wrong_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DelimiterPair;
    use crate::places::correct_places;
    use crate::response::correct_response;

    const PASSAGE: &str = "The cow [jumped] over [the] moon";

    fn places() -> CorrectPlaces {
        correct_places(PASSAGE, &DelimiterPair::default())
    }

    #[test]
    fn half_credit() {
        let result = evaluate(&places(), &Response::selecting([2])).unwrap();
        assert_eq!(result.right_count, 1);
        assert_eq!(result.wrong_count, 0);
        assert!((result.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn wrong_selection_cancels_right_one() {
        let result = evaluate(&places(), &Response::selecting([2, 3])).unwrap();
        assert_eq!(result.right_count, 1);
        assert_eq!(result.wrong_count, 1);
        assert_eq!(result.fraction, 0.0);
    }

    #[test]
    fn floored_at_zero() {
        let result = evaluate(&places(), &Response::selecting([0, 1, 3, 5])).unwrap();
        assert_eq!(result.wrong_count, 4);
        assert_eq!(result.fraction, 0.0);
    }

    #[test]
    fn full_marks_for_correct_response() {
        let response = correct_response(PASSAGE, &DelimiterPair::default());
        let result = evaluate(&places(), &response).unwrap();
        assert_eq!(result.fraction, 1.0);
        assert_eq!(result.wrong_count, 0);
    }

    #[test]
    fn true_counts_right_but_never_wrong() {
        let response: Response = [("p2", "true"), ("p3", "true")].into_iter().collect();
        let result = evaluate(&places(), &response).unwrap();
        assert_eq!(result.right_count, 1);
        assert_eq!(result.wrong_count, 0);
        assert!((result.fraction - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn unselected_values_are_ignored() {
        let response: Response = [("p2", "off"), ("p3", "")].into_iter().collect();
        let result = evaluate(&places(), &response).unwrap();
        assert_eq!(result.right_count, 0);
        assert_eq!(result.wrong_count, 0);
        assert_eq!(result.fraction, 0.0);
    }

    #[test]
    fn empty_response_scores_zero() {
        let result = evaluate(&places(), &Response::new()).unwrap();
        assert_eq!(result.fraction, 0.0);
    }

    #[test]
    fn no_correct_places_is_configuration_error() {
        let empty = CorrectPlaces::default();
        assert_eq!(
            evaluate(&empty, &Response::selecting([0])),
            Err(GradingError::NoCorrectPlaces)
        );
    }

    #[test]
    fn evaluate_leaves_response_untouched() {
        let response = Response::selecting([2, 3]);
        let before = response.clone();
        let _ = evaluate(&places(), &response);
        assert_eq!(response, before);
    }
}
