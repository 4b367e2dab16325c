//! Form configuration.
//!
//! [`FormOptions`] collects the recognized per-form settings: autofocus,
//! string trimming at the submit boundary, the default required-field
//! message, the submit-action error handler, the after-submit callback, and
//! the plugin factories. Construction follows a builder chain with the same
//! defaults the behavior was specified with.

use std::fmt;
use std::sync::Arc;

use crate::plugin::FormPlugin;

/// Handles a submit-action failure.
///
/// Returns `true` to have `submit` re-raise the failure to its caller,
/// `false` to suppress it locally. The default handler suppresses.
pub type ErrorHandler = Arc<dyn Fn(&(dyn std::error::Error + Send + Sync)) -> bool + Send + Sync>;

/// Runs after every submit attempt that passed validation.
pub type AfterSubmitHook = Arc<dyn Fn() + Send + Sync>;

/// Produces a fresh plugin instance when the form mounts.
pub type PluginFactory = Arc<dyn Fn() -> Box<dyn FormPlugin> + Send + Sync>;

/// Configuration for one form instance.
///
/// # Examples
///
/// ```
/// use formflow::options::FormOptions;
///
/// let options = FormOptions::default()
///     .auto_focus(true)
///     .trim(false)
///     .required_message("This field is required");
/// assert!(options.auto_focus);
/// ```
#[derive(Clone)]
pub struct FormOptions {
    /// Focus the first field when the form mounts and after reset.
    pub auto_focus: bool,
    /// Trim string values before handing them to the submit action.
    pub trim: bool,
    /// Default message for the required-field validator.
    pub required_message: String,
    /// Handles submit-action failures; `true` = re-raise.
    pub on_error: ErrorHandler,
    /// Runs after every submit attempt that passed validation.
    pub on_after_submit: Option<AfterSubmitHook>,
    /// Plugin factories, instantiated at mount.
    pub plugins: Vec<PluginFactory>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            auto_focus: false,
            trim: true,
            required_message: "Required".to_string(),
            on_error: Arc::new(|_| false),
            on_after_submit: None,
            plugins: Vec::new(),
        }
    }
}

impl FormOptions {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the first field is focused on mount and reset.
    #[must_use]
    pub const fn auto_focus(mut self, auto_focus: bool) -> Self {
        self.auto_focus = auto_focus;
        self
    }

    /// Sets whether string values are trimmed at the submit boundary.
    #[must_use]
    pub const fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Sets the default required-field message.
    #[must_use]
    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Sets the submit-action error handler.
    #[must_use]
    pub fn on_error(mut self, handler: ErrorHandler) -> Self {
        self.on_error = handler;
        self
    }

    /// Sets the after-submit callback.
    #[must_use]
    pub fn on_after_submit(mut self, hook: AfterSubmitHook) -> Self {
        self.on_after_submit = Some(hook);
        self
    }

    /// Adds a plugin factory.
    #[must_use]
    pub fn plugin(mut self, factory: PluginFactory) -> Self {
        self.plugins.push(factory);
        self
    }
}

impl fmt::Debug for FormOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormOptions")
            .field("auto_focus", &self.auto_focus)
            .field("trim", &self.trim)
            .field("required_message", &self.required_message)
            .field("plugins", &self.plugins.len())
            .finish_non_exhaustive()
    }
}
