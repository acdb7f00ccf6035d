//! Correctness index: which token positions are delimiter-marked.

use serde::{Deserialize, Serialize};

use crate::error::GradingError;
use crate::model::{DelimiterPair, Place};
use crate::tokenizer::split_passage;

/// Correct token positions of a passage, in discovery order.
///
/// Serialized as a list of indices; deserializing goes through
/// [`CorrectPlaces::from_indices`], so repeats are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct CorrectPlaces {
    places: Vec<Place>,
}

impl From<Vec<usize>> for CorrectPlaces {
    fn from(indices: Vec<usize>) -> Self {
        Self::from_indices(indices)
    }
}

impl From<CorrectPlaces> for Vec<usize> {
    fn from(places: CorrectPlaces) -> Self {
        places.places.into_iter().map(|p| p.0).collect()
    }
}

impl CorrectPlaces {
    /// Build from raw indices, dropping repeats while keeping first-seen order.
    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut places: Vec<Place> = Vec::new();
        for index in indices {
            if !places.iter().any(|p| p.0 == index) {
                places.push(Place(index));
            }
        }
        Self { places }
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn contains(&self, place: Place) -> bool {
        self.places.contains(&place)
    }

    pub fn contains_index(&self, index: usize) -> bool {
        self.contains(Place(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = Place> + '_ {
        self.places.iter().copied()
    }

    pub fn as_slice(&self) -> &[Place] {
        &self.places
    }

    /// The number of correct places as a divisor, or a configuration error
    /// when there are none.
    pub(crate) fn divisor(&self) -> Result<f64, GradingError> {
        if self.places.is_empty() {
            return Err(GradingError::NoCorrectPlaces);
        }
        Ok(self.places.len() as f64)
    }
}

/// Whether a single raw token holds the left delimiter followed, anywhere
/// later in the token, by the right one.
pub fn is_marked(token: &str, delimiters: &DelimiterPair) -> bool {
    let left = delimiters.left();
    match token.find(left) {
        Some(pos) => token[pos + left.len_utf8()..].contains(delimiters.right()),
        None => false,
    }
}

/// Compute the correct places of a passage.
///
/// Runs over the raw, markup-expanded split with delimiters intact. Every
/// caller that needs correctness must go through here so indices agree.
pub fn correct_places(passage: &str, delimiters: &DelimiterPair) -> CorrectPlaces {
    let places = split_passage(passage)
        .iter()
        .enumerate()
        .filter(|(_, token)| is_marked(token, delimiters))
        .map(|(index, _)| Place(index))
        .collect();
    CorrectPlaces { places }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brackets() -> DelimiterPair {
        DelimiterPair::default()
    }

    #[test]
    fn finds_marked_tokens() {
        let places = correct_places("The cow [jumped] over [the] moon", &brackets());
        let indices: Vec<usize> = places.iter().map(|p| p.index()).collect();
        assert_eq!(indices, vec![2, 4]);
    }

    #[test]
    fn marker_needs_left_before_right() {
        assert!(is_marked("[cat]", &brackets()));
        assert!(is_marked("x[cat]y.", &brackets()));
        assert!(is_marked("[]", &brackets()));
        assert!(!is_marked("]cat[", &brackets()));
        assert!(!is_marked("[cat", &brackets()));
        assert!(!is_marked("cat]", &brackets()));
    }

    #[test]
    fn spanning_delimiters_do_not_match() {
        // "[two words]" splits into two tokens, neither of which is marked.
        let places = correct_places("pick [two words] here", &brackets());
        assert!(places.is_empty());
    }

    #[test]
    fn equal_delimiters() {
        let hashes: DelimiterPair = "##".parse().unwrap();
        let places = correct_places("a #b# #c", &hashes);
        assert_eq!(places.as_slice(), &[Place(1)]);
    }

    #[test]
    fn custom_delimiters_ignore_brackets() {
        let braces: DelimiterPair = "{}".parse().unwrap();
        let places = correct_places("[a] {b} c", &braces);
        assert_eq!(places.as_slice(), &[Place(1)]);
    }

    #[test]
    fn markup_shifts_positions() {
        let places = correct_places("<p>The [cow]</p>", &brackets());
        // " <p> The [cow] </p> " -> "", "<p>", "The", "[cow]", "</p>", ""
        assert_eq!(places.as_slice(), &[Place(3)]);
    }

    #[test]
    fn divisor_rejects_empty() {
        assert_eq!(
            CorrectPlaces::default().divisor(),
            Err(GradingError::NoCorrectPlaces)
        );
        assert_eq!(CorrectPlaces::from_indices([1, 1, 2]).len(), 2);
    }

    #[test]
    fn deserializing_drops_repeated_places() {
        let places: CorrectPlaces = serde_json::from_str("[4, 2, 4]").unwrap();
        assert_eq!(places.as_slice(), &[Place(4), Place(2)]);
        assert_eq!(places.divisor(), Ok(2.0));
        assert_eq!(serde_json::to_string(&places).unwrap(), "[4,2]");
    }
}
