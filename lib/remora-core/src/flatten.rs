//! Recursive flattening of structured values into [`FlatParams`].
//!
//! Any serializable value whose JSON form is a mapping (or null) can be
//! flattened into the repeated key/value pairs HTTP form and query
//! encodings expect:
//!
//! - a scalar at key `k` emits one entry `(k, rendered scalar)`;
//! - a sequence at key `k` emits one entry per element under the same
//!   key, order preserved;
//! - a nested mapping recurses with a key derived by the [`KeyJoin`]
//!   policy (default [`bracket_join`]: `parent[child]`);
//! - nulls are omitted entirely.
//!
//! # Example
//!
//! ```
//! use remora_core::flatten;
//! use serde_json::json;
//!
//! let params = flatten(&json!({"tags": ["x", "y"], "meta": {"a": 1}})).expect("flatten");
//! assert_eq!(params.get("tags"), Some(&["x".to_string(), "y".to_string()][..]));
//! assert_eq!(params.get("meta[a]"), Some(&["1".to_string()][..]));
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::{Error, FlatParams, Result};

/// Key-join policy for nested mappings.
///
/// Called with the parent key and the child key; returns the flattened
/// key for the child's subtree. Callers rely on the emitted key shape,
/// so a custom join must be deterministic.
pub type KeyJoin = fn(parent: &str, child: &str) -> String;

/// Default key join: `parent[child]`, or the child key alone when the
/// parent is the root (empty key).
#[must_use]
pub fn bracket_join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}[{child}]")
    }
}

/// Flattens `value` with the default [`bracket_join`] policy.
///
/// The value's JSON form must be a mapping or null; null (and `None`)
/// flatten to an empty set rather than an error.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if `value` cannot be serialized or its
/// top level is not a mapping.
pub fn flatten<T: Serialize>(value: &T) -> Result<FlatParams> {
    flatten_with(value, bracket_join)
}

/// Flattens `value` with a caller-supplied key-join policy.
///
/// # Errors
///
/// Returns [`Error::Encoding`] if `value` cannot be serialized or its
/// top level is not a mapping.
pub fn flatten_with<T: Serialize>(value: &T, join: KeyJoin) -> Result<FlatParams> {
    let value = serde_json::to_value(value).map_err(|e| Error::encoding(e.to_string()))?;
    let mut params = FlatParams::new();
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in &map {
                add_value(&mut params, key, child, join);
            }
        }
        other => {
            return Err(Error::encoding(format!(
                "top-level value must be a mapping, got {}",
                kind_of(&other)
            )));
        }
    }
    Ok(params)
}

fn add_value(params: &mut FlatParams, key: &str, value: &Value, join: KeyJoin) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                add_value(params, key, item, join);
            }
        }
        Value::Object(map) => {
            for (child_key, child) in map {
                add_value(params, &join(key, child_key), child, join);
            }
        }
        Value::String(s) => params.append(key, s.as_str()),
        Value::Bool(b) => params.append(key, b.to_string()),
        // Number renders through serde_json: integers exactly, floats
        // with the shortest round-trip representation.
        Value::Number(n) => params.append(key, n.to_string()),
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
