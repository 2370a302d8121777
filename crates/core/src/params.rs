//! Pure helpers for reading typed overrides out of a JSON params object.
//!
//! Every field variant ships compile-time defaults and accepts a JSON object
//! of overrides. A missing key, a mistyped value or an unparsable color falls
//! back to the default, so a params object can never stop a backdrop from
//! starting.

use serde_json::Value;

use crate::color::Rgba;

/// `params[name]` as `f64` (integers accepted), else `default`.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer, else `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| v as usize)
        .unwrap_or(default)
}

/// `params[name]` parsed as a CSS color string, else `default`.
pub fn param_color(params: &Value, name: &str, default: Rgba) -> Rgba {
    params
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| Rgba::parse(s).ok())
        .unwrap_or(default)
}

/// `params[name]` as an array of non-negative integers, else `default`.
///
/// One bad element rejects the whole array.
pub fn param_usize_list(params: &Value, name: &str, default: &[usize]) -> Vec<usize> {
    params
        .get(name)
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|v| v.as_u64().map(|n| n as usize))
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_else(|| default.to_vec())
}
