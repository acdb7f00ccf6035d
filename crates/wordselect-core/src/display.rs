//! Display view of a passage: the words a learner sees and can select.
//!
//! Delimiters, anchor elements and markup tags are removed. The view is
//! position-aligned with the raw tokenizer: word `i` here is what remains of
//! raw token `i`, so markup-only positions become empty strings. Nothing in
//! this module feeds correctness; that always comes from the raw split.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::DelimiterPair;
use crate::tokenizer::{expand_markup, split_with_offsets};

/// Anchor elements, removed together with their content.
static ANCHOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<a\b[^>]*>.*?</a>").unwrap());

/// Any remaining tag; its text content is kept.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Byte ranges of `text` occupied by markup, sorted and non-overlapping.
fn markup_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = ANCHOR
        .find_iter(text)
        .chain(TAG.find_iter(text))
        .map(|m| m.range())
        .collect();
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

fn in_markup(ranges: &[Range<usize>], pos: usize) -> bool {
    let idx = ranges.partition_point(|r| r.start <= pos);
    idx > 0 && ranges[idx - 1].end > pos
}

/// Keep the characters of `text[offset..]` that are neither markup nor delimiters.
fn visible(text: &str, offset: usize, ranges: &[Range<usize>], delimiters: &DelimiterPair) -> String {
    text.char_indices()
        .filter(|&(i, c)| !delimiters.contains(c) && !in_markup(ranges, offset + i))
        .map(|(_, c)| c)
        .collect()
}

/// The selectable words of a passage, one per raw token position.
pub fn selectable_words(passage: &str, delimiters: &DelimiterPair) -> Vec<String> {
    let expanded = expand_markup(passage);
    let ranges = markup_ranges(&expanded);
    split_with_offsets(&expanded)
        .map(|(offset, token)| visible(token, offset, &ranges, delimiters))
        .collect()
}

/// The whole passage with delimiters, anchors and tags removed.
pub fn selectable_text(passage: &str, delimiters: &DelimiterPair) -> String {
    let expanded = expand_markup(passage);
    let ranges = markup_ranges(&expanded);
    visible(&expanded, 0, &ranges, delimiters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::split_passage;

    fn brackets() -> DelimiterPair {
        DelimiterPair::default()
    }

    #[test]
    fn strips_delimiters() {
        let words = selectable_words("The cow [jumped] over [the] moon", &brackets());
        assert_eq!(words, vec!["The", "cow", "jumped", "over", "the", "moon"]);
    }

    #[test]
    fn tags_become_empty_positions() {
        let passage = "The <b>[cow]</b> ran";
        let words = selectable_words(passage, &brackets());
        assert_eq!(words, vec!["The", "", "", "cow", "", "", "ran"]);
        assert_eq!(words.len(), split_passage(passage).len());
    }

    #[test]
    fn anchors_removed_with_content() {
        let passage = r#"Listen <a href="x.mp3">audio clip</a> [now]"#;
        let words = selectable_words(passage, &brackets());
        assert_eq!(words.len(), split_passage(passage).len());
        assert!(!words.iter().any(|w| w.contains("audio") || w.contains("clip")));
        assert!(!words.iter().any(|w| w.contains("href")));
        assert_eq!(words.last().map(String::as_str), Some("now"));
    }

    #[test]
    fn tag_with_attributes_split_across_tokens() {
        let words = selectable_words(r#"<span class="x">word</span>"#, &brackets());
        let visible: Vec<&str> = words.iter().map(String::as_str).filter(|w| !w.is_empty()).collect();
        assert_eq!(visible, vec!["word"]);
    }

    #[test]
    fn selectable_text_preview() {
        let text = selectable_text("A <i>[big]</i> <a href=\"#\">link</a>dog", &brackets());
        let words: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(words, vec!["A", "big", "dog"]);
    }

    #[test]
    fn custom_delimiters() {
        let braces: DelimiterPair = "{}".parse().unwrap();
        let words = selectable_words("a {b} [c]", &braces);
        assert_eq!(words, vec!["a", "b", "[c]"]);
    }
}
