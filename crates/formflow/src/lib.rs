//! # formflow
//!
//! Form-state management: describe a form as a set of named, validated
//! fields and let the [`Form`] controller track values, validity,
//! invalid-indication flags, and the submit lifecycle inside a
//! dispatch/subscribe [`FormStore`].
//!
//! The view layer registers each field as it mounts (name, initial value,
//! validator, scroll/focus handlers) and calls [`Form::submit`] with an
//! external submit action; the controller revalidates every field against
//! the latest cross-field values, walks to the first invalid field in
//! registration order, and otherwise collects the trimmed values and tracks
//! the action's asynchronous progress through the `submitting` flag.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use formflow::form::{Form, SubmitOutcome};
//! use formflow::options::FormOptions;
//! use formflow::registry::FieldRegistration;
//! use formflow::validators;
//! use formflow_state::store::FormStore;
//!
//! # tokio_runtime().block_on(async {
//! let store = Arc::new(FormStore::new());
//! let form = Form::new(store, "login", FormOptions::default());
//! form.register_field(
//!     "email",
//!     FieldRegistration::new("", validators::required("Required")),
//! )
//! .unwrap();
//! form.mount().unwrap();
//!
//! // Empty email: not submitted, error recorded.
//! let submitted = form.submit(|_values| SubmitOutcome::done()).await.unwrap();
//! assert!(!submitted);
//!
//! form.set("email", "someone@example.com").unwrap();
//! let submitted = form.submit(|_values| SubmitOutcome::done()).await.unwrap();
//! assert!(submitted);
//! # });
//! # fn tokio_runtime() -> tokio::runtime::Runtime {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap()
//! # }
//! ```

pub mod form;
pub mod options;
pub mod plugin;
pub mod registry;
pub mod validators;

pub use form::{Form, SubmitOutcome};
pub use options::FormOptions;
pub use plugin::{FormPlugin, PluginContext};
pub use registry::{FieldHandler, FieldRegistration, FieldRegistry, Validator};

/// Foundation types: errors, values, logging.
pub use formflow_core as core;

/// The form state store: state record, transitions, and the container.
pub use formflow_state as state;
