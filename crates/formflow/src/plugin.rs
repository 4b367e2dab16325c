//! Form plugin capability interface.
//!
//! Plugins observe a form's lifecycle through three optional hooks:
//! mount, unmount, and after-submit. A plugin implements whichever subset
//! it needs; the default method bodies make the rest no-ops, so the form
//! never has to check capability presence by type. Plugins receive
//! read-only accessors to configuration and state and may only mutate the
//! form through the same named transitions as everything else.

use formflow_core::error::FormResult;
use formflow_state::state::{FormId, FormState};
use formflow_state::store::FormStore;
use formflow_state::transition::Transition;

use crate::options::FormOptions;

/// A form lifecycle plugin.
///
/// Implement whichever hooks the plugin needs; unimplemented hooks default
/// to no-ops. An abandonment-analytics plugin, for example, would implement
/// `on_mount`/`on_unmount` and read
/// [`FormState::latest_focused_field`] from the context.
pub trait FormPlugin: Send + Sync {
    /// Called once when the form mounts, after all fields have registered.
    fn on_mount(&mut self, ctx: &PluginContext<'_>) {
        let _ = ctx;
    }

    /// Called once when the form unmounts.
    fn on_unmount(&mut self, ctx: &PluginContext<'_>) {
        let _ = ctx;
    }

    /// Called after every submit attempt that passed validation, whether
    /// the submit action succeeded or failed.
    fn on_after_submit(&mut self, ctx: &PluginContext<'_>) {
        let _ = ctx;
    }
}

/// Read-only view of a form handed to plugin hooks.
///
/// State is a snapshot taken when the hook fires; configuration is borrowed.
/// The only mutation path is [`PluginContext::dispatch`], which routes
/// through the store's named transitions.
pub struct PluginContext<'a> {
    form: &'a FormId,
    store: &'a FormStore,
    options: &'a FormOptions,
    state: FormState,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(
        form: &'a FormId,
        store: &'a FormStore,
        options: &'a FormOptions,
        state: FormState,
    ) -> Self {
        Self {
            form,
            store,
            options,
            state,
        }
    }

    /// The owning form's id.
    pub fn form_id(&self) -> &FormId {
        self.form
    }

    /// Snapshot of the form's state at the moment the hook fired.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// The form's configuration.
    pub fn options(&self) -> &FormOptions {
        self.options
    }

    /// Applies a named transition to the owning form's state.
    pub fn dispatch(&self, transition: Transition) -> FormResult<()> {
        self.store.dispatch(self.form, transition)
    }
}
