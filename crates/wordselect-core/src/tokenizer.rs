//! Passage tokenizer.
//!
//! Token positions produced here are the identity that correctness marking,
//! display words, and response keys all share. The split must therefore stay
//! byte-for-byte stable: every single whitespace character is a boundary, so
//! runs of whitespace yield empty tokens rather than being collapsed.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::model::{DelimiterPair, Token};
use crate::places::correct_places;

/// Characters that separate tokens: space, tab, newline, vertical tab,
/// form feed, carriage return.
pub(crate) fn is_split_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Put a space before every `<` and after every `>` so tags split as words.
pub fn expand_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '<' => out.push_str(" <"),
            '>' => out.push_str("> "),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Split already-expanded text on every whitespace character.
///
/// Consecutive separators produce empty tokens, and leading or trailing
/// separators produce leading or trailing empty tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(is_split_char).collect()
}

/// Split `text` like [`tokenize`], also yielding each token's byte offset.
pub(crate) fn split_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    let mut start = 0;
    text.split(is_split_char).map(move |token| {
        let offset = start;
        // Every separator is a single byte, so the next token starts one past this one.
        start += token.len() + 1;
        (offset, token)
    })
}

/// Expand markup in a raw passage and split it into owned tokens.
pub fn split_passage(passage: &str) -> Vec<String> {
    let expanded = expand_markup(passage);
    tokenize(&expanded).into_iter().map(str::to_string).collect()
}

/// Tokenize a passage into positional tokens flagged with their correctness.
pub fn tokens(passage: &str, delimiters: &DelimiterPair) -> Vec<Token> {
    let correct = correct_places(passage, delimiters);
    split_passage(passage)
        .into_iter()
        .enumerate()
        .map(|(index, text)| Token {
            index,
            is_correct: correct.contains_index(index),
            text,
        })
        .collect()
}

/// Words fenced by asterisks, keyed by token position.
///
/// A word starting with `*` opens a fence and a word ending with `*` closes
/// it; both fence words and everything between them are reported.
pub fn unselectable_words(passage: &str) -> BTreeMap<usize, String> {
    let mut unselectable = BTreeMap::new();
    let mut started = false;

    for (index, word) in split_passage(passage).into_iter().enumerate() {
        if word.starts_with('*') {
            started = true;
        }
        if word.ends_with('*') {
            started = false;
            unselectable.insert(index, word);
            continue;
        }
        if started {
            unselectable.insert(index, word);
        }
    }

    unselectable
}
