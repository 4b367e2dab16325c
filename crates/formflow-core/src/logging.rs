//! Logging integration for the formflow workspace.
//!
//! Provides helpers for configuring [`tracing`]-based logging and for
//! creating per-form spans so that state transitions and submit attempts
//! carry the owning form's id.

/// Sets up the global tracing subscriber.
///
/// The filter is read from `level` (e.g. "debug", "info",
/// "formflow=trace"). With `debug` set a pretty, human-readable format is
/// used; otherwise a structured JSON format is used. Installation is
/// best-effort: if a subscriber is already set, this is a no-op.
pub fn setup_logging(level: &str, debug: bool) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    if debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one form instance.
///
/// Attach this span around form interactions so that every log entry
/// emitted while handling the form includes its id.
///
/// # Examples
///
/// ```
/// use formflow_core::logging::form_span;
///
/// let span = form_span("login");
/// let _guard = span.enter();
/// tracing::debug!("handling field change");
/// ```
pub fn form_span(form_id: &str) -> tracing::Span {
    tracing::debug_span!("form", id = form_id)
}
