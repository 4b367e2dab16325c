//! Per-form field registry.
//!
//! The registry maps field names to the callbacks a mounted field supplies:
//! its validator and its scroll/focus handlers, plus the initial value
//! recorded at first registration. Registration is idempotent (the first
//! registration wins) and unregistration is deliberately inert — a field
//! that unmounts may remount a moment later due to view-layer churn, and
//! dropping its registration would lose its validator and initial value.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use formflow_core::error::{FormError, FormResult};
use formflow_core::value::Value;

/// A field validator.
///
/// Receives the field's value and a snapshot of *all* current field values
/// (cross-field rules need both). Returns `Some(message)` when the value is
/// invalid, `None` when it passes.
pub type Validator = Arc<dyn Fn(&Value, &HashMap<String, Value>) -> Option<String> + Send + Sync>;

/// A scroll or focus handler supplied by a field's rendering.
pub type FieldHandler = Arc<dyn Fn() + Send + Sync>;

/// Everything a mounted field hands to its form: the initial value, the
/// validator, and the scroll/focus handlers.
#[derive(Clone)]
pub struct FieldRegistration {
    /// The value the field mounts with; restored on form reset.
    pub initial_value: Value,
    /// The field's validator.
    pub validate: Validator,
    /// Scrolls the field into view.
    pub scroll: FieldHandler,
    /// Moves input focus to the field.
    pub focus: FieldHandler,
}

impl FieldRegistration {
    /// Creates a registration with no-op scroll/focus handlers.
    pub fn new(initial_value: impl Into<Value>, validate: Validator) -> Self {
        Self {
            initial_value: initial_value.into(),
            validate,
            scroll: Arc::new(|| {}),
            focus: Arc::new(|| {}),
        }
    }

    /// Sets the scroll handler.
    #[must_use]
    pub fn with_scroll(mut self, scroll: FieldHandler) -> Self {
        self.scroll = scroll;
        self
    }

    /// Sets the focus handler.
    #[must_use]
    pub fn with_focus(mut self, focus: FieldHandler) -> Self {
        self.focus = focus;
        self
    }
}

impl fmt::Debug for FieldRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistration")
            .field("initial_value", &self.initial_value)
            .finish_non_exhaustive()
    }
}

/// The per-form registry of field registrations.
///
/// Owned exclusively by one form instance. Keeps fields in registration
/// order and remembers the first field ever registered as the default
/// focus/scroll target; that memory is never reassigned, even if the first
/// field later unmounts.
#[derive(Default)]
pub struct FieldRegistry {
    entries: HashMap<String, FieldRegistration>,
    order: Vec<String>,
    first_field: Option<String>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field.
    ///
    /// Idempotent: if the name is already registered, the existing
    /// registration (validator, handlers, initial value) is kept and this
    /// returns `false`. The first field ever registered becomes the default
    /// autofocus target.
    pub fn register(&mut self, name: &str, registration: FieldRegistration) -> bool {
        if self.first_field.is_none() {
            self.first_field = Some(name.to_string());
        }
        if self.entries.contains_key(name) {
            return false;
        }
        self.entries.insert(name.to_string(), registration);
        self.order.push(name.to_string());
        true
    }

    /// Unregisters a field.
    ///
    /// A semantic no-op that exists only to mark intent: the registration
    /// is retained so a remounting field keeps its validator and initial
    /// value. The mount flag lives in form state, not here.
    pub fn unregister(&mut self, name: &str) {
        let _ = name;
    }

    /// Returns the registration for a field, or
    /// [`FormError::UnknownField`] if it was never registered.
    pub fn resolve(&self, name: &str) -> FormResult<&FieldRegistration> {
        self.entries
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }

    /// Returns `true` if the field was ever registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns the first field ever registered, the default focus/scroll
    /// target.
    pub fn first_field(&self) -> Option<&str> {
        self.first_field.as_deref()
    }

    /// Returns field names in registration order.
    pub fn order(&self) -> &[String] {
        &self.order
    }
}
