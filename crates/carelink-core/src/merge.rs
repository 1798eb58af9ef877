//! Deep merge of JSON values.
//!
//! Used to overlay extra fields onto already serialized entries.
//!
//! ```
//! use carelink_core::merge::overlay;
//! use serde_json::json;
//!
//! let entry = json!({"type": "sgv", "sgv": 120});
//! let merged = overlay(&entry, Some(&json!({"trend": 2, "direction": "SingleUp"})));
//! assert_eq!(merged, json!({"type": "sgv", "sgv": 120, "trend": 2, "direction": "SingleUp"}));
//!
//! // An absent source changes nothing.
//! assert_eq!(overlay(&entry, None), entry);
//! ```

use serde_json::Value;

/// Return a copy of `dest` with `source` overlaid.
///
/// Objects merge key by key, recursively. Any other source value, `null`
/// included, replaces the destination value outright. `dest` is not modified.
#[must_use]
pub fn overlay(dest: &Value, source: Option<&Value>) -> Value {
    let mut merged = dest.clone();
    if let Some(source) = source {
        overlay_in_place(&mut merged, source);
    }
    merged
}

fn overlay_in_place(dest: &mut Value, source: &Value) {
    match (dest, source) {
        (Value::Object(dest), Value::Object(source)) => {
            for (key, value) in source {
                match dest.get_mut(key) {
                    Some(existing) => overlay_in_place(existing, value),
                    None => {
                        dest.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (dest, source) => *dest = source.clone(),
    }
}
