//! The canonical state record for one form instance.
//!
//! [`FormState`] holds everything a form knows about itself: which fields
//! are mounted, their current and initial values, their validation errors,
//! which of them should be visibly flagged as invalid, and the overall
//! `valid`/`submitting` flags. It is mutated only through the named
//! transitions in [`crate::transition`], never by direct field writes.

use std::collections::HashMap;
use std::fmt;

use formflow_core::value::Value;

/// Identifies one form instance inside a [`FormStore`](crate::store::FormStore).
///
/// Each id owns exactly one [`FormState`]; there is no cross-form sharing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FormId(String);

impl FormId {
    /// Creates a new form id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FormId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FormId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The canonical data for one form instance.
///
/// Created when the form is first initialized, destroyed when the form
/// unmounts. All mutation goes through
/// [`FormState::apply`](crate::transition) so that every change is a named,
/// total, synchronous transition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FormState {
    /// Mount flag per registered field name. A field that unmounted keeps
    /// its entry with `false` so that its value and initial value survive
    /// remount churn.
    pub fields: HashMap<String, bool>,

    /// Current value per field.
    pub values: HashMap<String, Value>,

    /// Initial field values, restored on form reset.
    pub initial_values: HashMap<String, Value>,

    /// Latest validation result per field. No entry means the field is valid.
    pub errors: HashMap<String, String>,

    /// Whether the UI should visibly flag a field as invalid. Distinct from
    /// "has an error" so that untouched fields are not flagged.
    pub indicate_invalid: HashMap<String, bool>,

    /// Whether the whole form currently passes validation. Used to decide
    /// whether externally-surfaced submission errors should be suppressed.
    pub valid: bool,

    /// `true` strictly while an asynchronous submit action is in flight.
    pub submitting: bool,

    /// The field that most recently received focus. Read by abandonment
    /// analytics plugins.
    pub latest_focused_field: Option<String>,
}

impl FormState {
    /// Creates the pristine state for a new form instance.
    pub fn new(initial_values: HashMap<String, Value>) -> Self {
        Self {
            fields: HashMap::new(),
            values: HashMap::new(),
            initial_values,
            errors: HashMap::new(),
            indicate_invalid: HashMap::new(),
            valid: true,
            submitting: false,
            latest_focused_field: None,
        }
    }

    /// Returns `true` if the field is currently mounted.
    pub fn is_mounted(&self, name: &str) -> bool {
        self.fields.get(name).copied().unwrap_or(false)
    }

    /// Returns the current value of a field, or [`Value::Null`] if unset.
    pub fn value(&self, name: &str) -> Value {
        self.values.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Returns the initial value of a field, or [`Value::Null`] if none was
    /// recorded.
    pub fn initial_value(&self, name: &str) -> Value {
        self.initial_values
            .get(name)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Returns the current validation error of a field, if any.
    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    /// Returns `true` if the UI should flag this field as invalid.
    pub fn indicates_invalid(&self, name: &str) -> bool {
        self.indicate_invalid.get(name).copied().unwrap_or(false)
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}
