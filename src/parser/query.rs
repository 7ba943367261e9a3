//! Query-string derivation.

use std::collections::HashMap;

/// Split a raw query string into a key/value map.
///
/// Pairs are separated by `&` and split on their first `=`. A pair without
/// `=` maps to an empty value, empty segments are skipped, and a repeated key
/// keeps its last value. No percent-decoding is performed.
pub fn parse_query(raw: &str) -> HashMap<String, String> {
    raw.split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}
