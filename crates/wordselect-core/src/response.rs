//! Learner responses and the response-level helpers.
//!
//! A response maps place keys (`p0`, `p1`, …) to the string values a form
//! submits. The accepted selection strings live only here; everything past
//! this boundary works with [`Selection`].

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::{DelimiterPair, Place};
use crate::places::correct_places;

/// Value submitted for a selected word.
pub const SELECTED: &str = "on";

/// Alternative value some clients send for a selected word.
pub const SELECTED_ALT: &str = "true";

/// Selection state of one place in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// The place has an entry whose value is `"on"` or `"true"`.
    Selected,
    /// The place has an entry with any other value.
    Unselected,
    /// The response has no entry for the place.
    Absent,
}

impl Selection {
    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(SELECTED) | Some(SELECTED_ALT) => Selection::Selected,
            Some(_) => Selection::Unselected,
            None => Selection::Absent,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected)
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Selection::Absent)
    }
}

/// One attempt's key/value pairs, in the order the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    entries: Vec<(String, String)>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// A response with `"on"` for every given place index.
    pub fn selecting<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        indices
            .into_iter()
            .map(|i| (Place(i).key(), SELECTED.to_string()))
            .collect()
    }

    /// Set `key` to `value`. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn selection(&self, place: Place) -> Selection {
        Selection::from_value(self.get(&place.key()))
    }

    /// Entries in supplied order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Response {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut response = Response::new();
        for (k, v) in iter {
            response.insert(k, v);
        }
        response
    }
}

impl Serialize for Response {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct ResponseVisitor;

impl<'de> Visitor<'de> for ResponseVisitor {
    type Value = Response;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of place keys to selection values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut response = Response::new();
        while let Some((key, value)) = access.next_entry::<String, String>()? {
            response.insert(key, value);
        }
        Ok(response)
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ResponseVisitor)
    }
}

/// Whether `place` is selected in `response`.
pub fn is_selected(place: Place, response: &Response) -> bool {
    response.selection(place).is_selected()
}

/// Whether at least one entry is `"on"`. Says nothing about correctness.
pub fn is_complete_response(response: &Response) -> bool {
    response.entries().any(|(_, v)| v == SELECTED)
}

/// Whether two responses hold the same key/value pairs, ignoring order.
pub fn is_same_response(a: &Response, b: &Response) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let a: BTreeSet<(&str, &str)> = a.entries().collect();
    let b: BTreeSet<(&str, &str)> = b.entries().collect();
    a == b
}

/// The response that earns full marks: every correct place set to `"on"`.
pub fn correct_response(passage: &str, delimiters: &DelimiterPair) -> Response {
    correct_places(passage, delimiters)
        .iter()
        .map(|place| (place.key(), SELECTED))
        .collect()
}

/// Words of every place present in `response`, space-joined in response order.
///
/// `words` is indexed by place. Keys that are not places, or that fall
/// outside `words`, are skipped.
pub fn summarise<S: AsRef<str>>(response: &Response, words: &[S]) -> String {
    response
        .entries()
        .filter_map(|(key, _)| Place::from_key(key))
        .filter_map(|place| words.get(place.index()))
        .map(|word| word.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}
