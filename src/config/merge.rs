//! Deep merge over JSON values.
//!
//! Precedence, applied recursively:
//! - object + object: union of keys, override wins on conflicts
//! - anything + null: base kept (null means "not set")
//! - anything else: override replaces base outright, arrays included
//!
//! Merging an empty object is the identity.

use serde_json::Value;

/// Merge `overrides` on top of `base`.
pub fn deep_merge(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (base, Value::Null) => base,
        (Value::Object(mut base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => {
                        let current = slot.take();
                        *slot = deep_merge(current, value);
                    }
                    None if value.is_null() => {}
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            Value::Object(base)
        }
        (_, overrides) => overrides,
    }
}
