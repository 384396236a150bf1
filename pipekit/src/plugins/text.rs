//! Text steps.

use crate::config::json_kind;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// A word is a run of letters, optionally joined by inner apostrophes.
#[allow(clippy::expect_used)]
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}+(?:'\p{L}+)*").expect("word pattern is valid"));

fn expect_str(value: &Value) -> anyhow::Result<&str> {
    value
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("expected a string input, found {}", json_kind(value)))
}

/// Trims leading and trailing whitespace.
///
/// # Errors
///
/// Returns an error if the input is not a string.
pub fn strip(value: Value) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str(&value)?.trim().to_string()))
}

/// Converts to uppercase.
///
/// # Errors
///
/// Returns an error if the input is not a string.
pub fn upper(value: Value) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str(&value)?.to_uppercase()))
}

/// Converts to lowercase.
///
/// # Errors
///
/// Returns an error if the input is not a string.
pub fn lower(value: Value) -> anyhow::Result<Value> {
    Ok(Value::String(expect_str(&value)?.to_lowercase()))
}

/// Counts case-insensitive word occurrences, ignoring punctuation.
#[must_use]
pub fn count_word_frequencies(text: &str) -> BTreeMap<String, u64> {
    let lowered = text.to_lowercase();
    let mut counts = BTreeMap::new();
    for word in WORD.find_iter(&lowered) {
        *counts.entry(word.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Replaces a text with an object mapping each lowercase word to its count.
///
/// # Errors
///
/// Returns an error if the input is not a string.
pub fn word_frequencies(value: Value) -> anyhow::Result<Value> {
    let counts = count_word_frequencies(expect_str(&value)?);
    let object: Map<String, Value> = counts
        .into_iter()
        .map(|(word, count)| (word, Value::from(count)))
        .collect();
    Ok(Value::Object(object))
}
