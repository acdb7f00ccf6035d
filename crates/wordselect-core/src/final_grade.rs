//! Multi-attempt aggregation with per-attempt penalty decay.
//!
//! A correct place earns `1 - (k + 1) * penalty` when it is present in the
//! last attempt, where `k` is the index of the last attempt that lacked it
//! (`-1` if none did). Wrong selections are charged once, from the first
//! attempt only.

use crate::error::GradingError;
use crate::model::{FinalGradeResult, Place};
use crate::places::CorrectPlaces;
use crate::response::Response;
use crate::scoring::wrong_count;

/// Credit one correct place earns across the attempt sequence.
///
/// The scan runs forward over every attempt without stopping early: an
/// absence records its attempt index, and the place counts as finally right
/// only if the last attempt has an entry for it.
fn place_credit(place: Place, attempts: &[Response], penalty: f64) -> f64 {
    let mut last_wrong: Option<usize> = None;
    let mut finally_right = false;

    for (i, attempt) in attempts.iter().enumerate() {
        if attempt.selection(place).is_present() {
            finally_right = true;
        } else {
            last_wrong = Some(i);
            finally_right = false;
        }
    }

    if !finally_right {
        return 0.0;
    }
    let tries_before_right = last_wrong.map_or(0, |i| i + 1);
    (1.0 - tries_before_right as f64 * penalty).max(0.0)
}

/// Accept `penalty` only if it is finite and within `0.0..=1.0`.
pub fn check_penalty(penalty: f64) -> Result<f64, GradingError> {
    if (0.0..=1.0).contains(&penalty) {
        Ok(penalty)
    } else {
        Err(GradingError::InvalidPenalty(penalty))
    }
}

/// Aggregate an ordered attempt sequence into one fraction.
pub fn final_grade(
    attempts: &[Response],
    correct: &CorrectPlaces,
    penalty: f64,
) -> Result<FinalGradeResult, GradingError> {
    let total = correct.divisor()?;
    let penalty = check_penalty(penalty)?;
    let Some(first) = attempts.first() else {
        return Ok(FinalGradeResult { fraction: 0.0 });
    };

    let credit: f64 = correct
        .iter()
        .map(|place| place_credit(place, attempts, penalty))
        .sum();
    let wrong_fraction = wrong_count(correct, first) as f64 / total;
    let fraction = (credit / total - wrong_fraction).max(0.0);

    tracing::debug!(
        attempts = attempts.len(),
        credit,
        wrong_fraction,
        fraction,
        "computed final grade"
    );

    Ok(FinalGradeResult { fraction })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn places() -> CorrectPlaces {
        CorrectPlaces::from_indices([2, 4])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn decays_for_late_corrections() {
        let attempts = vec![
            Response::new(),
            Response::selecting([2]),
            Response::selecting([2, 4]),
        ];
        let result = final_grade(&attempts, &places(), 0.1).unwrap();
        assert_close(result.fraction, 0.85);
    }

    #[test]
    fn right_first_time_is_full_credit() {
        let attempts = vec![Response::selecting([2, 4])];
        let result = final_grade(&attempts, &places(), 0.3333333).unwrap();
        assert_close(result.fraction, 1.0);
    }

    #[test]
    fn dropped_in_last_attempt_earns_nothing() {
        let attempts = vec![Response::selecting([2, 4]), Response::selecting([2])];
        let result = final_grade(&attempts, &places(), 0.1).unwrap();
        // place 2 stays right (1.0), place 4 finally absent (0.0)
        assert_close(result.fraction, 0.5);
    }

    #[test]
    fn absence_after_presence_moves_last_wrong_index() {
        let attempts = vec![
            Response::selecting([2, 4]),
            Response::selecting([4]),
            Response::selecting([2, 4]),
        ];
        let result = final_grade(&attempts, &places(), 0.25).unwrap();
        // place 2: last absence at 1 -> 1 - 2 * 0.25 = 0.5; place 4: 1.0
        assert_close(result.fraction, 0.75);
    }

    #[test]
    fn credit_floored_per_place() {
        let attempts = vec![
            Response::new(),
            Response::new(),
            Response::new(),
            Response::selecting([2, 4]),
        ];
        let result = final_grade(&attempts, &places(), 0.5).unwrap();
        assert_eq!(result.fraction, 0.0);
    }

    #[test]
    fn first_attempt_wrong_selections_charged_once() {
        let attempts = vec![Response::selecting([1, 2, 4]), Response::selecting([2, 4])];
        let result = final_grade(&attempts, &places(), 0.1).unwrap();
        // credit 2.0 / 2 = 1.0, minus 1 wrong / 2
        assert_close(result.fraction, 0.5);
    }

    #[test]
    fn later_wrong_selections_not_charged() {
        let attempts = vec![Response::selecting([2, 4]), Response::selecting([1, 2, 4])];
        let result = final_grade(&attempts, &places(), 0.1).unwrap();
        assert_close(result.fraction, 1.0);
    }

    #[test]
    fn presence_counts_regardless_of_value() {
        let attempt: Response = [("p2", "off"), ("p4", "on")].into_iter().collect();
        let result = final_grade(&[attempt], &places(), 0.1).unwrap();
        assert_close(result.fraction, 1.0);
    }

    #[test]
    fn no_attempts_scores_zero() {
        let result = final_grade(&[], &places(), 0.1).unwrap();
        assert_eq!(result.fraction, 0.0);
    }

    #[test]
    fn penalty_outside_unit_interval_rejected() {
        let attempts = vec![Response::new(), Response::selecting([2, 4])];
        assert_eq!(
            final_grade(&attempts, &places(), -0.5),
            Err(GradingError::InvalidPenalty(-0.5))
        );
        assert_eq!(
            final_grade(&attempts, &places(), 1.5),
            Err(GradingError::InvalidPenalty(1.5))
        );
        assert!(matches!(
            final_grade(&attempts, &places(), f64::NAN),
            Err(GradingError::InvalidPenalty(_))
        ));
    }

    #[test]
    fn penalty_bounds_are_inclusive() {
        let attempts = vec![Response::new(), Response::selecting([2, 4])];
        assert_close(final_grade(&attempts, &places(), 0.0).unwrap().fraction, 1.0);
        assert_close(final_grade(&attempts, &places(), 1.0).unwrap().fraction, 0.0);
    }

    #[test]
    fn no_correct_places_is_configuration_error() {
        let result = final_grade(&[Response::new()], &CorrectPlaces::default(), 0.1);
        assert_eq!(result, Err(GradingError::NoCorrectPlaces));
    }
}
