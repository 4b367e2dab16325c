//! The dispatch/subscribe state container.
//!
//! A [`FormStore`] holds one [`FormState`] per [`FormId`] and exposes the
//! two primitives the form layer builds on: `dispatch`, which applies a
//! named [`Transition`] and makes the new state observable, and `subscribe`,
//! which registers a callback invoked with a snapshot of the state after
//! every dispatch for that form. Subscribers are notified in connection
//! order.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use formflow_core::error::{FormError, FormResult};
use formflow_core::value::Value;

use crate::state::{FormId, FormState};
use crate::transition::Transition;

/// The type signature for a store subscriber callback.
///
/// Subscribers receive a snapshot of the new state, never a mutable handle;
/// mutation is only possible through [`FormStore::dispatch`]. They must be
/// `Send + Sync` so a store can be shared across task boundaries.
pub type Subscriber = Arc<dyn Fn(&FormState) + Send + Sync>;

/// A state container holding the [`FormState`] of every live form.
///
/// The store is passed down to forms as an explicit handle; there is no
/// ambient global lookup.
///
/// # Examples
///
/// ```
/// use formflow_state::store::FormStore;
/// use formflow_state::state::FormId;
/// use formflow_state::transition::Transition;
/// use std::collections::HashMap;
///
/// let store = FormStore::new();
/// let id = FormId::new("login");
/// store.initialize(&id, HashMap::new());
/// store
///     .dispatch(&id, Transition::SetValid { valid: false })
///     .unwrap();
/// assert!(!store.state(&id).unwrap().valid);
/// ```
#[derive(Default)]
pub struct FormStore {
    forms: RwLock<HashMap<FormId, FormState>>,
    subscribers: RwLock<Vec<(String, FormId, Subscriber)>>,
}

impl FormStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes (or re-initializes) the state record for a form.
    pub fn initialize(&self, id: &FormId, initial_values: HashMap<String, Value>) {
        let mut forms = self.forms.write().expect("store lock poisoned");
        tracing::debug!(form = %id, "initializing form state");
        forms.insert(id.clone(), FormState::new(initial_values));
    }

    /// Returns `true` if the store holds state for the given form.
    pub fn contains(&self, id: &FormId) -> bool {
        self.forms
            .read()
            .expect("store lock poisoned")
            .contains_key(id)
    }

    /// Destroys the state record for a form.
    ///
    /// Returns `true` if a record was present and removed.
    pub fn destroy(&self, id: &FormId) -> bool {
        let mut forms = self.forms.write().expect("store lock poisoned");
        tracing::debug!(form = %id, "destroying form state");
        forms.remove(id).is_some()
    }

    /// Applies a transition to a form's state and notifies subscribers.
    ///
    /// Fails with [`FormError::Configuration`] if the form was never
    /// initialized in this store.
    pub fn dispatch(&self, id: &FormId, transition: Transition) -> FormResult<()> {
        let snapshot = {
            let mut forms = self.forms.write().expect("store lock poisoned");
            let state = forms.get_mut(id).ok_or_else(|| {
                FormError::Configuration(format!("form \"{id}\" is not initialized in this store"))
            })?;
            tracing::trace!(form = %id, ?transition, "dispatching transition");
            state.apply(transition);
            state.clone()
        };

        // Notify outside the state lock so subscribers can read the store.
        let subscribers = self.subscribers.read().expect("store lock poisoned");
        for (_, form_id, callback) in subscribers.iter().filter(|(_, fid, _)| fid == id) {
            debug_assert_eq!(form_id, id);
            callback(&snapshot);
        }
        Ok(())
    }

    /// Returns a snapshot of a form's current state.
    pub fn state(&self, id: &FormId) -> Option<FormState> {
        self.forms
            .read()
            .expect("store lock poisoned")
            .get(id)
            .cloned()
    }

    /// Subscribes a callback to a form's state changes.
    ///
    /// The `subscriber_id` identifies the subscription for later removal;
    /// subscribing again with the same id replaces the previous callback.
    pub fn subscribe(&self, subscriber_id: impl Into<String>, form: &FormId, callback: Subscriber) {
        let sid = subscriber_id.into();
        let mut subscribers = self.subscribers.write().expect("store lock poisoned");
        if let Some(entry) = subscribers.iter_mut().find(|(id, _, _)| *id == sid) {
            entry.1 = form.clone();
            entry.2 = callback;
        } else {
            subscribers.push((sid, form.clone(), callback));
        }
    }

    /// Removes the subscription with the given id.
    ///
    /// Returns `true` if a subscription was found and removed.
    pub fn unsubscribe(&self, subscriber_id: &str) -> bool {
        let mut subscribers = self.subscribers.write().expect("store lock poisoned");
        let len_before = subscribers.len();
        subscribers.retain(|(id, _, _)| id != subscriber_id);
        subscribers.len() < len_before
    }

    /// Returns the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("store lock poisoned").len()
    }
}
