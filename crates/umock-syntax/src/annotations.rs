//! Marker annotations and directives embedded in leading comments.
//!
//! A declaration opts into synthesis with `<key>:AutoMockable` anywhere in
//! its leading comment, for any configured marker key. Directives use a
//! second configurable prefix and the forms `key=value` and
//! `key=[v1, v2, ...]`; bare directives map to themselves. A bracketed value
//! that does not parse as a list falls back to one literal token — malformed
//! input never fails the run.

use indexmap::IndexMap;
use serde_json::Value;

/// The marker token that opts a declaration into synthesis.
pub const AUTO_MOCKABLE: &str = "AutoMockable";

/// Multi-valued string annotation map, in first-seen key order.
pub type AnnotationMap = IndexMap<String, Vec<String>>;

/// Whether the comment carries `<key>:AutoMockable` for any marker key.
pub fn has_marker(comment: &str, marker_keys: &[String]) -> bool {
    marker_keys
        .iter()
        .any(|key| comment.contains(&format!("{key}:{AUTO_MOCKABLE}")))
}

/// Parse all `<prefix>:` directives out of a leading comment.
pub fn parse_annotations(comment: &str, prefix: &str) -> AnnotationMap {
    let mut annotations = AnnotationMap::new();
    let needle = format!("{prefix}:");

    for line in comment.lines() {
        let trimmed = line.trim();
        let Some(start) = trimmed.find(&needle) else {
            continue;
        };
        let content = trimmed[start + needle.len()..].trim();
        if content.is_empty() {
            continue;
        }

        match content.split_once('=') {
            Some((key, raw_value)) => {
                let key = key.trim();
                let values = parse_values(raw_value);
                if key.is_empty() || values.is_empty() {
                    continue;
                }
                annotations
                    .entry(key.to_string())
                    .or_default()
                    .extend(values);
            }
            None => {
                // A bare directive maps to itself, so presence checks and
                // value lookups behave the same way.
                annotations
                    .entry(content.to_string())
                    .or_default()
                    .push(content.to_string());
            }
        }
    }

    annotations
}

/// Parse one directive value: a bracketed list or a single literal.
fn parse_values(raw_value: &str) -> Vec<String> {
    let value = raw_value.trim();
    if value.is_empty() {
        return Vec::new();
    }

    if value.starts_with('[') && value.ends_with(']') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(value) {
            return items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    Value::Bool(flag) => Some(flag.to_string()),
                    _ => None,
                })
                .collect();
        }
        // Malformed bracketed list: treat the whole value as one literal.
        return vec![value.to_string()];
    }

    vec![value.trim_matches('"').to_string()]
}
