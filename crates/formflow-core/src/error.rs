//! Core error types for the formflow workspace.
//!
//! This module provides the [`FormError`] enum covering every failure that
//! can propagate out of the form layer: unknown field references, missing
//! wiring, and submit-action failures. Per-field validation errors are
//! deliberately *not* part of this taxonomy — they are data, stored as
//! messages inside the form state, and never thrown.

use thiserror::Error;

/// The opaque error produced by an external submit action.
///
/// The submit action is supplied by the caller and simply awaited; its
/// failure type is whatever the caller's transport or business layer uses.
pub type SubmitError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type for the formflow workspace.
///
/// Variants map to the failure categories of the form layer:
///
/// - [`FormError::UnknownField`] — an operation referenced a field name that
///   was never registered. Fatal to that call.
/// - [`FormError::Configuration`] — required wiring is absent (for example,
///   dispatching into a store that holds no state for the form). Raised
///   immediately, never deferred.
/// - [`FormError::SubmitAction`] — the external submit action failed and the
///   configured error handler elected to re-raise.
#[derive(Error, Debug)]
pub enum FormError {
    /// An operation referenced a field name that was never registered.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Required wiring is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external submit action failed and was not suppressed.
    #[error("submit action failed: {0}")]
    SubmitAction(#[source] SubmitError),
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
