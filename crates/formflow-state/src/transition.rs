//! Named state transitions.
//!
//! Every mutation of a [`FormState`] is expressed as a [`Transition`] value
//! applied through [`FormState::apply`]. Transitions are synchronous, total
//! (they never partially apply), and leave unrelated parts of the state
//! untouched.

use std::collections::HashMap;

use formflow_core::value::Value;

use crate::state::FormState;

/// A single named state-transition operation.
///
/// Transitions are plain data so they can be dispatched through the store,
/// logged, and serialized for inspection.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Transition {
    /// Resets the whole record to pristine state with the given initial
    /// value snapshot.
    Initialize {
        /// Initial field values, restored on form reset.
        initial_values: HashMap<String, Value>,
    },

    /// Marks a field as mounted.
    RegisterField {
        /// The field name.
        name: String,
    },

    /// Marks a field as unmounted. The field's entry (and with it the value
    /// and initial value) is retained so a quick remount loses nothing.
    UnregisterField {
        /// The field name.
        name: String,
    },

    /// Records a field's initial value at first registration. First write
    /// wins; later registrations do not overwrite it.
    SetInitialValue {
        /// The field name.
        name: String,
        /// The initial value supplied at field mount.
        value: Value,
    },

    /// Writes a field's current value together with its latest validation
    /// result. `error: None` marks the field valid.
    SetFieldValue {
        /// The field name.
        name: String,
        /// The new value.
        value: Value,
        /// The validation result for the new value.
        error: Option<String>,
    },

    /// Clears a field's value (sets it to [`Value::Null`]) together with the
    /// validation result for the cleared value.
    ClearField {
        /// The field name.
        name: String,
        /// The validation result for the cleared value.
        error: Option<String>,
    },

    /// Sets or clears a field's visible invalid indication.
    IndicateFieldInvalid {
        /// The field name.
        name: String,
        /// Whether the UI should flag the field.
        indicate: bool,
    },

    /// Clears every field's invalid indication, making the form "untouched"
    /// again.
    ResetInvalidIndication,

    /// Sets the overall form validity flag.
    SetValid {
        /// The new validity flag.
        valid: bool,
    },

    /// Sets the submitting flag.
    SetSubmitting {
        /// The new submitting flag.
        submitting: bool,
    },

    /// Records the field that most recently received focus.
    FieldFocused {
        /// The field name.
        name: String,
    },
}

impl FormState {
    /// Applies a transition, constructing the next state in place.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Initialize { initial_values } => {
                *self = Self::new(initial_values);
            }
            Transition::RegisterField { name } => {
                self.fields.insert(name, true);
            }
            Transition::UnregisterField { name } => {
                self.fields.insert(name, false);
            }
            Transition::SetInitialValue { name, value } => {
                self.initial_values.entry(name).or_insert(value);
            }
            Transition::SetFieldValue { name, value, error } => {
                self.values.insert(name.clone(), value);
                match error {
                    Some(message) => {
                        self.errors.insert(name, message);
                    }
                    None => {
                        self.errors.remove(&name);
                    }
                }
            }
            Transition::ClearField { name, error } => {
                self.apply(Transition::SetFieldValue {
                    name,
                    value: Value::Null,
                    error,
                });
            }
            Transition::IndicateFieldInvalid { name, indicate } => {
                self.indicate_invalid.insert(name, indicate);
            }
            Transition::ResetInvalidIndication => {
                self.indicate_invalid.clear();
            }
            Transition::SetValid { valid } => {
                self.valid = valid;
            }
            Transition::SetSubmitting { submitting } => {
                self.submitting = submitting;
            }
            Transition::FieldFocused { name } => {
                self.latest_focused_field = Some(name);
            }
        }
    }
}
