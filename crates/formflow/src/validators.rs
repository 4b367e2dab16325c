//! Ready-made field validators.
//!
//! Validators are plain closures over `(&Value, &all_values)` returning an
//! optional error message. The helpers here cover the two rules the form
//! layer itself relies on: required fields (driven by the configured
//! required message) and cross-field equality.

use formflow_core::value::Value;

use crate::registry::Validator;
use std::sync::Arc;

/// A validator that rejects empty values with the given message.
///
/// Emptiness follows [`Value::is_empty`]: `Null`, the empty string, and the
/// empty list fail; `Bool(false)` and `Int(0)` pass.
pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Arc::new(move |value, _all| {
        if value.is_empty() {
            Some(message.clone())
        } else {
            None
        }
    })
}

/// A validator that accepts every value.
pub fn accept_any() -> Validator {
    Arc::new(|_, _| None)
}

/// A cross-field validator requiring the value to equal another field's
/// current value (e.g. password confirmation).
///
/// Because it reads the *other* field from the values snapshot, a change to
/// that field can invalidate this one without this one changing — exactly
/// the case submit-time revalidation exists for.
pub fn matches_field(other: impl Into<String>, message: impl Into<String>) -> Validator {
    let other = other.into();
    let message = message.into();
    Arc::new(move |value, all| {
        let expected = all.get(&other).cloned().unwrap_or(Value::Null);
        if *value == expected {
            None
        } else {
            Some(message.clone())
        }
    })
}
