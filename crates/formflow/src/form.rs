//! The form controller: lifecycle, field registration, and submit
//! orchestration.
//!
//! A [`Form`] is a cheap-to-clone handle binding a [`FormId`] inside an
//! explicit [`FormStore`] to a private [`FieldRegistry`]. It owns the
//! mount/unmount sequencing, the public field API (`get`/`set`/`clear`,
//! `focus`/`scroll`, `reset`), and [`Form::submit`], which drives the
//! whole submit sequence: revalidate every mounted field against the latest
//! cross-field values, indicate/scroll/focus the first invalid field, or
//! collect the (optionally trimmed) values and run the external submit
//! action with `submitting` tracking and a liveness guard for forms torn
//! down mid-flight.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use formflow_core::error::{FormError, FormResult, SubmitError};
use formflow_core::value::Value;
use formflow_state::state::{FormId, FormState};
use formflow_state::store::FormStore;
use formflow_state::transition::Transition;

use crate::options::FormOptions;
use crate::plugin::{FormPlugin, PluginContext};
use crate::registry::{FieldRegistration, FieldRegistry};

/// What an external submit action produced.
///
/// `Done` is the synchronous path: the action finished (or failed) before
/// returning, and `submitting` is never set. `Pending` is the asynchronous
/// path: `submitting` is set for exactly as long as the boxed future is
/// unresolved.
pub enum SubmitOutcome {
    /// The action completed synchronously.
    Done(Result<(), SubmitError>),
    /// The action is still running; the form tracks the future's progress.
    Pending(Pin<Box<dyn Future<Output = Result<(), SubmitError>> + Send>>),
}

impl SubmitOutcome {
    /// A synchronous success.
    pub const fn done() -> Self {
        Self::Done(Ok(()))
    }

    /// A synchronous failure.
    pub fn failed(error: impl Into<SubmitError>) -> Self {
        Self::Done(Err(error.into()))
    }

    /// An asynchronous result to be awaited.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<(), SubmitError>> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }
}

struct FormInner {
    id: FormId,
    store: Arc<FormStore>,
    options: FormOptions,
    registry: RwLock<FieldRegistry>,
    plugins: RwLock<Vec<Box<dyn FormPlugin>>>,
    alive: AtomicBool,
}

/// A handle to one form instance.
///
/// Clones share the same underlying form. All state mutation routes through
/// the store's named transitions; the handle itself only holds the field
/// registry and the liveness flag.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use formflow::form::Form;
/// use formflow::options::FormOptions;
/// use formflow::registry::FieldRegistration;
/// use formflow::validators;
/// use formflow_state::store::FormStore;
///
/// let store = Arc::new(FormStore::new());
/// let form = Form::new(store, "login", FormOptions::default());
/// form.register_field(
///     "email",
///     FieldRegistration::new("", validators::required("Required")),
/// )
/// .unwrap();
/// form.mount().unwrap();
/// ```
#[derive(Clone)]
pub struct Form {
    inner: Arc<FormInner>,
}

impl Form {
    /// Creates a form bound to `id` inside the given store.
    ///
    /// If the store already holds state for the id (pre-initialized by an
    /// external container) that state is adopted; otherwise a pristine
    /// record with no initial values is created.
    pub fn new(store: Arc<FormStore>, id: impl Into<FormId>, options: FormOptions) -> Self {
        Self::with_initial_values(store, id, options, HashMap::new())
    }

    /// Creates a form with a form-level initial-value snapshot.
    ///
    /// Snapshot entries take precedence over the per-field initial values
    /// supplied later at registration.
    pub fn with_initial_values(
        store: Arc<FormStore>,
        id: impl Into<FormId>,
        options: FormOptions,
        initial_values: HashMap<String, Value>,
    ) -> Self {
        let id = id.into();
        if !store.contains(&id) {
            store.initialize(&id, initial_values);
        }
        Self {
            inner: Arc::new(FormInner {
                id,
                store,
                options,
                registry: RwLock::new(FieldRegistry::new()),
                plugins: RwLock::new(Vec::new()),
                alive: AtomicBool::new(true),
            }),
        }
    }

    /// The form's id.
    pub fn id(&self) -> &FormId {
        &self.inner.id
    }

    /// Returns a snapshot of the form's current state.
    pub fn state(&self) -> FormResult<FormState> {
        self.inner.store.state(&self.inner.id).ok_or_else(|| {
            FormError::Configuration(format!(
                "form \"{}\" is not initialized in this store",
                self.inner.id
            ))
        })
    }

    fn dispatch(&self, transition: Transition) -> FormResult<()> {
        self.inner.store.dispatch(&self.inner.id, transition)
    }

    // ── Field registration ───────────────────────────────────────────

    /// Registers a field as it mounts.
    ///
    /// Idempotent: a second registration for the same name keeps the first
    /// validator, handlers, and initial value. The first registration also
    /// records the field's initial value (first write wins against the
    /// form-level snapshot) and seeds the current value so `get` works
    /// before any `set`.
    pub fn register_field(&self, name: &str, registration: FieldRegistration) -> FormResult<()> {
        let first_registration = {
            let mut registry = self.inner.registry.write().expect("registry lock poisoned");
            registry.register(name, registration.clone())
        };

        if first_registration {
            self.dispatch(Transition::SetInitialValue {
                name: name.to_string(),
                value: registration.initial_value,
            })?;
            let state = self.state()?;
            if !state.values.contains_key(name) {
                let initial = state.initial_value(name);
                let error = (registration.validate)(&initial, &state.values);
                self.dispatch(Transition::SetFieldValue {
                    name: name.to_string(),
                    value: initial,
                    error,
                })?;
            }
        }

        self.dispatch(Transition::RegisterField {
            name: name.to_string(),
        })
    }

    /// Unregisters a field as it unmounts.
    ///
    /// Clears the mount flag but keeps the stored registration, value, and
    /// initial value so a quick remount loses nothing.
    pub fn unregister_field(&self, name: &str) -> FormResult<()> {
        self.inner
            .registry
            .write()
            .expect("registry lock poisoned")
            .unregister(name);
        self.dispatch(Transition::UnregisterField {
            name: name.to_string(),
        })
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Mounts the form: instantiates plugins, fires their mount hooks, and
    /// autofocuses the first field if configured.
    ///
    /// Call after all fields have registered; mount ordering makes a single
    /// focus call sufficient.
    pub fn mount(&self) -> FormResult<()> {
        {
            let mut plugins = self.inner.plugins.write().expect("plugins lock poisoned");
            *plugins = self
                .inner
                .options
                .plugins
                .iter()
                .map(|factory| factory())
                .collect();
        }
        self.notify_plugins(self.state()?, |plugin, ctx| plugin.on_mount(ctx));
        if self.inner.options.auto_focus {
            self.autofocus();
        }
        Ok(())
    }

    /// Unmounts the form: fires plugin unmount hooks, marks the instance
    /// dead (in-flight submit completions become state no-ops), and destroys
    /// its state record.
    pub fn unmount(&self) {
        if let Ok(state) = self.state() {
            self.notify_plugins(state, |plugin, ctx| plugin.on_unmount(ctx));
        }
        self.inner.alive.store(false, Ordering::SeqCst);
        self.inner.store.destroy(&self.inner.id);
        tracing::debug!(form = %self.inner.id, "form unmounted");
    }

    /// Restores every registered field to its initial value (re-running its
    /// validator), clears all invalid indication, forces the form valid,
    /// and autofocuses if configured.
    pub fn reset(&self) -> FormResult<()> {
        let order = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            registry.order().to_vec()
        };
        let state = self.state()?;
        for name in &order {
            self.set(name, state.initial_value(name))?;
        }
        self.dispatch(Transition::ResetInvalidIndication)?;
        self.dispatch(Transition::SetValid { valid: true })?;
        if self.inner.options.auto_focus {
            self.autofocus();
        }
        Ok(())
    }

    // ── Field access ─────────────────────────────────────────────────

    /// Returns a field's current value ([`Value::Null`] if unset).
    pub fn get(&self, name: &str) -> FormResult<Value> {
        Ok(self.state()?.value(name))
    }

    /// Sets a field's value, re-running its validator against the latest
    /// cross-field values.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> FormResult<()> {
        let validate = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            registry.resolve(name)?.validate.clone()
        };
        let state = self.state()?;
        let value = value.into();
        let error = validate(&value, &state.values);
        self.dispatch(Transition::SetFieldValue {
            name: name.to_string(),
            value,
            error,
        })
    }

    /// Clears a field's value, re-running its validator against the cleared
    /// value.
    pub fn clear(&self, name: &str) -> FormResult<()> {
        let validate = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            registry.resolve(name)?.validate.clone()
        };
        let state = self.state()?;
        let error = validate(&Value::Null, &state.values);
        self.dispatch(Transition::ClearField {
            name: name.to_string(),
            error,
        })
    }

    /// Returns the current values of all fields.
    pub fn values(&self) -> FormResult<HashMap<String, Value>> {
        Ok(self.state()?.values)
    }

    /// A required-field validator carrying the configured
    /// [`required_message`](FormOptions::required_message).
    pub fn required_validator(&self) -> crate::registry::Validator {
        crate::validators::required(self.inner.options.required_message.clone())
    }

    /// Returns `true` while an asynchronous submit action is in flight.
    pub fn submitting(&self) -> bool {
        self.inner
            .store
            .state(&self.inner.id)
            .is_some_and(|state| state.submitting)
    }

    /// Clears all invalid indication, making the form "untouched" again.
    pub fn reset_invalid_indication(&self) -> FormResult<()> {
        self.dispatch(Transition::ResetInvalidIndication)
    }

    // ── Focus and scroll ─────────────────────────────────────────────

    /// Focuses a field, or the first registered field when `None`.
    pub fn focus(&self, field: Option<&str>) -> FormResult<()> {
        let handler = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            let name = self.target_field(&registry, field)?;
            registry.resolve(&name)?.focus.clone()
        };
        handler();
        Ok(())
    }

    /// Scrolls to a field, or to the first registered field when `None`.
    pub fn scroll(&self, field: Option<&str>) -> FormResult<()> {
        let handler = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            let name = self.target_field(&registry, field)?;
            registry.resolve(&name)?.scroll.clone()
        };
        handler();
        Ok(())
    }

    /// Records that a field received focus (read later by abandonment
    /// analytics through [`Form::latest_focused_field`]).
    pub fn field_focused(&self, name: &str) -> FormResult<()> {
        {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            registry.resolve(name)?;
        }
        self.dispatch(Transition::FieldFocused {
            name: name.to_string(),
        })
    }

    /// Returns the field that most recently received focus.
    pub fn latest_focused_field(&self) -> FormResult<Option<String>> {
        Ok(self.state()?.latest_focused_field)
    }

    fn target_field(&self, registry: &FieldRegistry, field: Option<&str>) -> FormResult<String> {
        match field {
            Some(name) => Ok(name.to_string()),
            None => registry.first_field().map(str::to_string).ok_or_else(|| {
                FormError::Configuration(format!(
                    "form \"{}\" has no registered fields to focus",
                    self.inner.id
                ))
            }),
        }
    }

    fn autofocus(&self) {
        let handler = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            registry
                .first_field()
                .and_then(|name| registry.resolve(name).ok())
                .map(|registration| registration.focus.clone())
        };
        match handler {
            Some(focus) => focus(),
            None => tracing::debug!(form = %self.inner.id, "autofocus skipped: no fields"),
        }
    }

    // ── Submit orchestration ─────────────────────────────────────────

    /// Submits the form.
    ///
    /// Returns `Ok(false)` when nothing was submitted (a submit is already
    /// in flight, or validation failed — in which case the first invalid
    /// field in registration order has been indicated, scrolled to, and
    /// focused). Returns `Ok(true)` when the action ran, and
    /// `Err(FormError::SubmitAction)` when it failed and the configured
    /// error handler elected to re-raise.
    pub async fn submit<A>(&self, action: A) -> FormResult<bool>
    where
        A: FnOnce(HashMap<String, Value>) -> SubmitOutcome,
    {
        self.submit_with(|| {}, action).await
    }

    /// Submits the form, running `before_submit` first.
    ///
    /// The hook fires before validation; use it to reset form-level error
    /// banners that are not tied to any field.
    pub async fn submit_with<B, A>(&self, before_submit: B, action: A) -> FormResult<bool>
    where
        B: FnOnce(),
        A: FnOnce(HashMap<String, Value>) -> SubmitOutcome,
    {
        if self.state()?.submitting {
            tracing::debug!(form = %self.inner.id, "submit ignored: already in flight");
            return Ok(false);
        }

        before_submit();

        if !self.validate()? {
            return Ok(false);
        }

        let values = self.collect_field_values()?;
        tracing::debug!(form = %self.inner.id, fields = values.len(), "submitting");

        match action(values) {
            SubmitOutcome::Done(result) => {
                let reraise = self.handle_action_failure(result);
                self.run_after_submit_hooks(self.state()?);
                reraise.map_or(Ok(true), |error| Err(FormError::SubmitAction(error)))
            }
            SubmitOutcome::Pending(future) => {
                self.dispatch(Transition::SetSubmitting { submitting: true })?;
                // The hooks fire on settlement even if the form unmounts
                // while the action is in flight; hold a snapshot for the
                // plugin context in that case.
                let snapshot = self.state()?;
                let result = future.await;
                let reraise = self.handle_action_failure(result);
                if self.inner.alive.load(Ordering::SeqCst) {
                    self.run_after_submit_hooks(self.state()?);
                    self.dispatch(Transition::SetSubmitting { submitting: false })?;
                } else {
                    self.run_after_submit_hooks(snapshot);
                    tracing::debug!(
                        form = %self.inner.id,
                        "submit settled after unmount; submitting flag left untouched"
                    );
                }
                reraise.map_or(Ok(true), |error| Err(FormError::SubmitAction(error)))
            }
        }
    }

    /// Validates every mounted field and commits the outcome.
    ///
    /// Returns `true` when the form is valid. On failure the first invalid
    /// field (in registration order) is indicated, scrolled to, and
    /// focused, and every mounted field's error entry is refreshed in state
    /// so all unfilled required fields light up at once.
    fn validate(&self) -> FormResult<bool> {
        // Ignore previous submission errors until validation passes.
        self.dispatch(Transition::SetValid { valid: false })?;

        let snapshot = self.state()?;
        let order = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            registry.order().to_vec()
        };

        if let Some(first_invalid) = self.first_invalid_field(&order, &snapshot) {
            // The search above was scratch work over the snapshot; commit a
            // fresh validator result for every mounted field so the state's
            // errors reflect the same pass.
            for name in order.iter().filter(|name| snapshot.is_mounted(name)) {
                self.set(name, snapshot.value(name))?;
            }
            self.dispatch(Transition::IndicateFieldInvalid {
                name: first_invalid.clone(),
                indicate: true,
            })?;
            self.scroll(Some(&first_invalid))?;
            self.focus(Some(&first_invalid))?;
            tracing::debug!(form = %self.inner.id, field = %first_invalid, "validation failed");
            return Ok(false);
        }

        // Stop ignoring submission errors.
        self.dispatch(Transition::SetValid { valid: true })?;
        Ok(true)
    }

    /// Finds the first invalid mounted field in registration order.
    ///
    /// Every mounted field is re-validated against the latest cross-field
    /// values — a field whose own value never changed can still have gone
    /// stale because some other field's value did. Externally set errors
    /// count as invalid too.
    fn first_invalid_field(&self, order: &[String], state: &FormState) -> Option<String> {
        let registry = self.inner.registry.read().expect("registry lock poisoned");
        for name in order {
            if !state.is_mounted(name) {
                continue;
            }
            if state.error(name).is_some() {
                return Some(name.clone());
            }
            let Ok(registration) = registry.resolve(name) else {
                continue;
            };
            let value = state.value(name);
            if (registration.validate)(&value, &state.values).is_some() {
                return Some(name.clone());
            }
        }
        None
    }

    /// Collects the values snapshot handed to the submit action.
    ///
    /// Restricted to currently-mounted fields — an unregistered field's
    /// stale value is dropped even though it lingers in state. String
    /// values are trimmed when configured.
    fn collect_field_values(&self) -> FormResult<HashMap<String, Value>> {
        let state = self.state()?;
        let order = {
            let registry = self.inner.registry.read().expect("registry lock poisoned");
            registry.order().to_vec()
        };
        let mut values = HashMap::new();
        for name in order.into_iter().filter(|name| state.is_mounted(name)) {
            let mut value = state.value(&name);
            if self.inner.options.trim {
                value = value.trimmed();
            }
            values.insert(name, value);
        }
        Ok(values)
    }

    /// Routes an action failure through the configured error handler.
    ///
    /// Returns the error when the handler elected to re-raise.
    fn handle_action_failure(&self, result: Result<(), SubmitError>) -> Option<SubmitError> {
        match result {
            Ok(()) => None,
            Err(error) => {
                tracing::debug!(form = %self.inner.id, %error, "submit action failed");
                if (self.inner.options.on_error)(error.as_ref()) {
                    Some(error)
                } else {
                    None
                }
            }
        }
    }

    fn run_after_submit_hooks(&self, state: FormState) {
        self.notify_plugins(state, |plugin, ctx| plugin.on_after_submit(ctx));
        if let Some(hook) = &self.inner.options.on_after_submit {
            hook();
        }
    }

    fn notify_plugins(
        &self,
        state: FormState,
        invoke: impl Fn(&mut dyn FormPlugin, &PluginContext<'_>),
    ) {
        let ctx = PluginContext::new(
            &self.inner.id,
            &self.inner.store,
            &self.inner.options,
            state,
        );
        let mut plugins = self.inner.plugins.write().expect("plugins lock poisoned");
        for plugin in plugins.iter_mut() {
            invoke(plugin.as_mut(), &ctx);
        }
    }
}
