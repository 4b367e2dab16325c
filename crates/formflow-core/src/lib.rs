//! # formflow-core
//!
//! Foundation types for the formflow workspace: the [`FormError`] taxonomy,
//! the widget-agnostic field [`Value`] payload, and logging setup helpers.

pub mod error;
pub mod logging;
pub mod value;

pub use error::{FormError, FormResult, SubmitError};
pub use value::Value;
