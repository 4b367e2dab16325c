//! Integration tests for the full form lifecycle.
//!
//! These tests exercise the complete register -> edit -> submit pipeline,
//! covering:
//! 1. Registration and state retention across remounts
//! 2. Validation ordering and submit gating
//! 3. The asynchronous submit path (submitting flag, hooks, teardown)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use formflow::form::{Form, SubmitOutcome};
use formflow::options::FormOptions;
use formflow::plugin::{FormPlugin, PluginContext};
use formflow::registry::{FieldRegistration, Validator};
use formflow::validators;
use formflow_core::error::{FormError, SubmitError};
use formflow_core::value::Value;
use formflow_state::store::FormStore;
use formflow_state::transition::Transition;

// ============================================================================
// Shared helpers
// ============================================================================

fn new_form(id: &str) -> (Arc<FormStore>, Form) {
    new_form_with(id, FormOptions::default())
}

fn new_form_with(id: &str, options: FormOptions) -> (Arc<FormStore>, Form) {
    let store = Arc::new(FormStore::new());
    let form = Form::new(store.clone(), id, options);
    (store, form)
}

/// A validator that counts its invocations before delegating.
fn counting(counter: Arc<AtomicUsize>, inner: Validator) -> Validator {
    Arc::new(move |value, all| {
        counter.fetch_add(1, Ordering::SeqCst);
        inner(value, all)
    })
}

/// A field whose scroll/focus handlers append to a shared event log.
fn logged_field(name: &str, log: &Arc<Mutex<Vec<String>>>, validate: Validator) -> FieldRegistration {
    let scroll_log = log.clone();
    let scroll_name = name.to_string();
    let focus_log = log.clone();
    let focus_name = name.to_string();
    FieldRegistration::new(Value::Null, validate)
        .with_scroll(Arc::new(move || {
            scroll_log
                .lock()
                .unwrap()
                .push(format!("scroll:{scroll_name}"));
        }))
        .with_focus(Arc::new(move || {
            focus_log.lock().unwrap().push(format!("focus:{focus_name}"));
        }))
}

/// A plugin counting every hook invocation.
#[derive(Default)]
struct CountingPlugin {
    mounts: Arc<AtomicUsize>,
    unmounts: Arc<AtomicUsize>,
    after_submits: Arc<AtomicUsize>,
}

impl FormPlugin for CountingPlugin {
    fn on_mount(&mut self, _ctx: &PluginContext<'_>) {
        self.mounts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_unmount(&mut self, _ctx: &PluginContext<'_>) {
        self.unmounts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_after_submit(&mut self, _ctx: &PluginContext<'_>) {
        self.after_submits.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_registering_twice_keeps_first_validator() {
    let (_store, form) = new_form("signup");
    form.register_field(
        "email",
        FieldRegistration::new("", validators::required("Required")),
    )
    .unwrap();
    // Second registration tries to swap in an accept-everything validator.
    form.register_field("email", FieldRegistration::new("", validators::accept_any()))
        .unwrap();

    let submitted = form.submit(|_| SubmitOutcome::done()).await.unwrap();
    assert!(!submitted, "first validator must still reject empty email");
    assert_eq!(form.state().unwrap().error("email"), Some("Required"));
}

#[tokio::test]
async fn test_unregister_does_not_erase_state() {
    let (_store, form) = new_form("signup");
    form.register_field(
        "email",
        FieldRegistration::new("original@b.com", validators::required("Required")),
    )
    .unwrap();

    form.unregister_field("email").unwrap();
    // Remount with a different initial value and validator.
    form.register_field(
        "email",
        FieldRegistration::new("different@b.com", validators::accept_any()),
    )
    .unwrap();

    form.reset().unwrap();
    assert_eq!(form.get("email").unwrap(), Value::from("original@b.com"));

    // The original validator still applies.
    form.clear("email").unwrap();
    assert_eq!(form.state().unwrap().error("email"), Some("Required"));
}

#[tokio::test]
async fn test_unmounted_fields_dropped_from_submitted_values() {
    let (_store, form) = new_form("signup");
    form.register_field("keep", FieldRegistration::new("a", validators::accept_any()))
        .unwrap();
    form.register_field("drop", FieldRegistration::new("b", validators::accept_any()))
        .unwrap();
    form.unregister_field("drop").unwrap();

    let seen = Arc::new(Mutex::new(None));
    let s = seen.clone();
    form.submit(move |values| {
        *s.lock().unwrap() = Some(values);
        SubmitOutcome::done()
    })
    .await
    .unwrap();

    let values = seen.lock().unwrap().take().unwrap();
    assert_eq!(values.get("keep"), Some(&Value::from("a")));
    assert!(!values.contains_key("drop"), "stale value must be dropped");
}

// ============================================================================
// Validation and submit gating
// ============================================================================

#[tokio::test]
async fn test_submit_with_empty_required_field() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (_store, form) = new_form("contact");
    form.register_field(
        "email",
        logged_field("email", &log, validators::required("Required")),
    )
    .unwrap();

    let invoked = Arc::new(AtomicUsize::new(0));
    let i = invoked.clone();
    let submitted = form
        .submit(move |_| {
            i.fetch_add(1, Ordering::SeqCst);
            SubmitOutcome::done()
        })
        .await
        .unwrap();

    assert!(!submitted);
    assert_eq!(invoked.load(Ordering::SeqCst), 0, "action must not run");

    let state = form.state().unwrap();
    assert_eq!(state.error("email"), Some("Required"));
    assert!(state.indicates_invalid("email"));
    assert!(!state.valid);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["scroll:email".to_string(), "focus:email".to_string()],
        "scroll fires before focus"
    );
}

#[tokio::test]
async fn test_first_invalid_field_selected_by_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (_store, form) = new_form("contact");
    form.register_field("a", logged_field("a", &log, validators::accept_any()))
        .unwrap();
    form.register_field("b", logged_field("b", &log, validators::required("Required")))
        .unwrap();
    form.register_field("c", logged_field("c", &log, validators::required("Required")))
        .unwrap();
    form.set("a", "filled").unwrap();

    let submitted = form.submit(|_| SubmitOutcome::done()).await.unwrap();
    assert!(!submitted);

    let state = form.state().unwrap();
    assert!(state.indicates_invalid("b"), "b is first in order");
    assert!(!state.indicates_invalid("c"));
    // Both invalid fields get their error committed, only b is handled.
    assert_eq!(state.error("b"), Some("Required"));
    assert_eq!(state.error("c"), Some("Required"));
    assert_eq!(
        *log.lock().unwrap(),
        vec!["scroll:b".to_string(), "focus:b".to_string()]
    );
}

#[tokio::test]
async fn test_externally_set_error_blocks_submit() {
    let (store, form) = new_form("contact");
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();

    // An error surfaced from outside the validator (e.g. a server check).
    store
        .dispatch(
            form.id(),
            Transition::SetFieldValue {
                name: "email".into(),
                value: Value::from("a@b.com"),
                error: Some("Address already taken".into()),
            },
        )
        .unwrap();

    let submitted = form.submit(|_| SubmitOutcome::done()).await.unwrap();
    assert!(!submitted);
    assert!(form.state().unwrap().indicates_invalid("email"));
}

#[tokio::test]
async fn test_cross_field_staleness_caught_at_submit() {
    let (_store, form) = new_form("signup");
    form.register_field(
        "password",
        FieldRegistration::new("hunter2", validators::accept_any()),
    )
    .unwrap();
    form.register_field(
        "confirm",
        FieldRegistration::new(
            "hunter2",
            validators::matches_field("password", "Passwords do not match"),
        ),
    )
    .unwrap();

    // Both fields agree; then password changes and confirm goes stale
    // without its own value ever changing.
    form.set("password", "correct horse").unwrap();
    assert!(form.state().unwrap().error("confirm").is_none());

    let submitted = form.submit(|_| SubmitOutcome::done()).await.unwrap();
    assert!(!submitted);

    let state = form.state().unwrap();
    assert_eq!(state.error("confirm"), Some("Passwords do not match"));
    assert!(state.indicates_invalid("confirm"));
}

#[tokio::test]
async fn test_before_submit_hook_runs_before_validation() {
    let (store, form) = new_form("contact");
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();
    store
        .dispatch(
            form.id(),
            Transition::SetFieldValue {
                name: "email".into(),
                value: Value::from("a@b.com"),
                error: Some("stale banner error".into()),
            },
        )
        .unwrap();

    // The hook clears the externally surfaced error before validation runs.
    let store2 = store.clone();
    let id = form.id().clone();
    let submitted = form
        .submit_with(
            move || {
                store2
                    .dispatch(
                        &id,
                        Transition::SetFieldValue {
                            name: "email".into(),
                            value: Value::from("a@b.com"),
                            error: None,
                        },
                    )
                    .unwrap();
            },
            |_| SubmitOutcome::done(),
        )
        .await
        .unwrap();
    assert!(submitted);
}

// ============================================================================
// Value collection
// ============================================================================

#[tokio::test]
async fn test_trim_enabled_trims_string_values() {
    let (_store, form) = new_form_with("contact", FormOptions::default().trim(true));
    form.register_field("name", FieldRegistration::new("  x  ", validators::accept_any()))
        .unwrap();

    let seen = Arc::new(Mutex::new(None));
    let s = seen.clone();
    form.submit(move |values| {
        *s.lock().unwrap() = Some(values);
        SubmitOutcome::done()
    })
    .await
    .unwrap();

    let values = seen.lock().unwrap().take().unwrap();
    assert_eq!(values.get("name"), Some(&Value::from("x")));
    // Trimming happens at the boundary only; state keeps the raw value.
    assert_eq!(form.get("name").unwrap(), Value::from("  x  "));
}

#[tokio::test]
async fn test_trim_disabled_passes_values_unchanged() {
    let (_store, form) = new_form_with("contact", FormOptions::default().trim(false));
    form.register_field("name", FieldRegistration::new("  x  ", validators::accept_any()))
        .unwrap();

    let seen = Arc::new(Mutex::new(None));
    let s = seen.clone();
    form.submit(move |values| {
        *s.lock().unwrap() = Some(values);
        SubmitOutcome::done()
    })
    .await
    .unwrap();

    let values = seen.lock().unwrap().take().unwrap();
    assert_eq!(values.get("name"), Some(&Value::from("  x  ")));
}

// ============================================================================
// Reset
// ============================================================================

#[tokio::test]
async fn test_reset_restores_initial_values() {
    let (_store, form) = new_form("contact");
    form.register_field(
        "email",
        FieldRegistration::new("a@b.com", validators::required("Required")),
    )
    .unwrap();
    form.register_field("name", FieldRegistration::new("Alice", validators::accept_any()))
        .unwrap();

    form.set("email", "other@b.com").unwrap();
    form.clear("name").unwrap();
    // Fail a submit so indication and validity are dirty.
    form.clear("email").unwrap();
    assert!(!form.submit(|_| SubmitOutcome::done()).await.unwrap());

    form.reset().unwrap();

    let state = form.state().unwrap();
    assert_eq!(form.get("email").unwrap(), Value::from("a@b.com"));
    assert_eq!(form.get("name").unwrap(), Value::from("Alice"));
    assert!(state.indicate_invalid.is_empty());
    assert!(state.valid);
}

#[tokio::test]
async fn test_reset_autofocuses_when_configured() {
    let focused = Arc::new(AtomicUsize::new(0));
    let (_store, form) = new_form_with("contact", FormOptions::default().auto_focus(true));
    let f = focused.clone();
    form.register_field(
        "first",
        FieldRegistration::new("x", validators::accept_any()).with_focus(Arc::new(move || {
            f.fetch_add(1, Ordering::SeqCst);
        })),
    )
    .unwrap();

    form.mount().unwrap();
    assert_eq!(focused.load(Ordering::SeqCst), 1);
    form.reset().unwrap();
    assert_eq!(focused.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Asynchronous submit path
// ============================================================================

#[tokio::test]
async fn test_async_submit_tracks_submitting_flag() {
    let after_submits = Arc::new(AtomicUsize::new(0));
    let hook_count = after_submits.clone();
    let (_store, form) = new_form_with(
        "contact",
        FormOptions::default().on_after_submit(Arc::new(move || {
            hook_count.fetch_add(1, Ordering::SeqCst);
        })),
    );
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let submitter = form.clone();
    let handle = tokio::spawn(async move {
        submitter
            .submit(move |_| {
                SubmitOutcome::pending(async move {
                    let _ = rx.await;
                    Ok(())
                })
            })
            .await
    });

    // Let the spawned submit reach its await point.
    while !form.submitting() {
        tokio::task::yield_now().await;
    }
    assert!(form.submitting());
    assert_eq!(after_submits.load(Ordering::SeqCst), 0);

    tx.send(()).unwrap();
    let submitted = handle.await.unwrap().unwrap();
    assert!(submitted);
    assert!(!form.submitting());
    assert_eq!(after_submits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_submit_blocked_while_in_flight() {
    let (_store, form) = new_form("contact");
    let validations = Arc::new(AtomicUsize::new(0));
    form.register_field(
        "email",
        FieldRegistration::new(
            "a@b.com",
            counting(validations.clone(), validators::accept_any()),
        ),
    )
    .unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let submitter = form.clone();
    let handle = tokio::spawn(async move {
        submitter
            .submit(move |_| {
                SubmitOutcome::pending(async move {
                    let _ = rx.await;
                    Ok(())
                })
            })
            .await
    });

    while !form.submitting() {
        tokio::task::yield_now().await;
    }
    let validations_before = validations.load(Ordering::SeqCst);

    // Re-entrant submit: rejected without a validation pass.
    let second = Arc::new(AtomicUsize::new(0));
    let s = second.clone();
    let submitted = form
        .submit(move |_| {
            s.fetch_add(1, Ordering::SeqCst);
            SubmitOutcome::done()
        })
        .await
        .unwrap();
    assert!(!submitted);
    assert_eq!(second.load(Ordering::SeqCst), 0);
    assert_eq!(validations.load(Ordering::SeqCst), validations_before);

    tx.send(()).unwrap();
    assert!(handle.await.unwrap().unwrap());
}

#[tokio::test]
async fn test_unmount_during_in_flight_submit() {
    let after_submits = Arc::new(AtomicUsize::new(0));
    let hook_count = after_submits.clone();
    let plugin_after_submits = Arc::new(AtomicUsize::new(0));
    let p = plugin_after_submits.clone();
    let (store, form) = new_form_with(
        "contact",
        FormOptions::default()
            .on_after_submit(Arc::new(move || {
                hook_count.fetch_add(1, Ordering::SeqCst);
            }))
            .plugin(Arc::new(move || -> Box<dyn FormPlugin> {
                Box::new(CountingPlugin {
                    after_submits: p.clone(),
                    ..CountingPlugin::default()
                })
            })),
    );
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();
    form.mount().unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let submitter = form.clone();
    let handle = tokio::spawn(async move {
        submitter
            .submit(move |_| {
                SubmitOutcome::pending(async move {
                    let _ = rx.await;
                    Ok(())
                })
            })
            .await
    });

    while !form.submitting() {
        tokio::task::yield_now().await;
    }
    form.unmount();
    assert!(!store.contains(form.id()));
    assert_eq!(after_submits.load(Ordering::SeqCst), 0);

    // Settlement after teardown: the action's result is returned and the
    // after-submit hooks still run once, but no state transition is applied
    // to the dead instance.
    tx.send(()).unwrap();
    let submitted = handle.await.unwrap().unwrap();
    assert!(submitted);
    assert!(!store.contains(form.id()));
    assert_eq!(after_submits.load(Ordering::SeqCst), 1);
    assert_eq!(plugin_after_submits.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Error handling
// ============================================================================

#[tokio::test]
async fn test_sync_failure_suppressed_by_default() {
    let (_store, form) = new_form("contact");
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();

    let submitted = form
        .submit(|_| SubmitOutcome::failed("boom"))
        .await
        .unwrap();
    assert!(submitted, "suppressed failure still counts as submitted");
}

#[tokio::test]
async fn test_sync_failure_reraised_when_handler_asks() {
    let (_store, form) = new_form_with(
        "contact",
        FormOptions::default().on_error(Arc::new(|_| true)),
    );
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();

    let err = form
        .submit(|_| SubmitOutcome::failed("boom"))
        .await
        .unwrap_err();
    assert!(matches!(err, FormError::SubmitAction(_)));
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn test_async_failure_clears_submitting_before_reraise() {
    let after_submits = Arc::new(AtomicUsize::new(0));
    let hook_count = after_submits.clone();
    let (_store, form) = new_form_with(
        "contact",
        FormOptions::default()
            .on_error(Arc::new(|_| true))
            .on_after_submit(Arc::new(move || {
                hook_count.fetch_add(1, Ordering::SeqCst);
            })),
    );
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();

    let err = form
        .submit(|_| {
            SubmitOutcome::pending(async { Err::<(), SubmitError>("rejected".into()) })
        })
        .await
        .unwrap_err();

    assert!(matches!(err, FormError::SubmitAction(_)));
    assert!(!form.submitting(), "flag cleared before the re-raise");
    assert_eq!(after_submits.load(Ordering::SeqCst), 1, "hooks ran once");
}

// ============================================================================
// Plugins
// ============================================================================

#[tokio::test]
async fn test_plugin_hooks_fire_across_lifecycle() {
    let mounts = Arc::new(AtomicUsize::new(0));
    let unmounts = Arc::new(AtomicUsize::new(0));
    let after_submits = Arc::new(AtomicUsize::new(0));

    let (m, u, a) = (mounts.clone(), unmounts.clone(), after_submits.clone());
    let options = FormOptions::default().plugin(Arc::new(move || -> Box<dyn FormPlugin> {
        Box::new(CountingPlugin {
            mounts: m.clone(),
            unmounts: u.clone(),
            after_submits: a.clone(),
        })
    }));

    let (_store, form) = new_form_with("contact", options);
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();

    form.mount().unwrap();
    assert_eq!(mounts.load(Ordering::SeqCst), 1);

    assert!(form.submit(|_| SubmitOutcome::done()).await.unwrap());
    assert_eq!(after_submits.load(Ordering::SeqCst), 1);

    // A failed validation never reaches the after-submit hooks.
    form.clear("email").unwrap();
    form.register_field(
        "required",
        FieldRegistration::new("", validators::required("Required")),
    )
    .unwrap();
    assert!(!form.submit(|_| SubmitOutcome::done()).await.unwrap());
    assert_eq!(after_submits.load(Ordering::SeqCst), 1);

    form.unmount();
    assert_eq!(unmounts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_plugin_reads_latest_focused_field() {
    let seen = Arc::new(Mutex::new(None::<String>));

    struct AbandonObserver {
        seen: Arc<Mutex<Option<String>>>,
    }
    impl FormPlugin for AbandonObserver {
        fn on_unmount(&mut self, ctx: &PluginContext<'_>) {
            *self.seen.lock().unwrap() = ctx.state().latest_focused_field.clone();
        }
    }

    let s = seen.clone();
    let options = FormOptions::default().plugin(Arc::new(move || -> Box<dyn FormPlugin> {
        Box::new(AbandonObserver { seen: s.clone() })
    }));
    let (_store, form) = new_form_with("contact", options);
    form.register_field("email", FieldRegistration::new("", validators::accept_any()))
        .unwrap();
    form.mount().unwrap();

    form.field_focused("email").unwrap();
    form.unmount();

    assert_eq!(seen.lock().unwrap().as_deref(), Some("email"));
}

// ============================================================================
// Store snapshots
// ============================================================================

#[tokio::test]
async fn test_subscribers_observe_submit_lifecycle() {
    let (store, form) = new_form("contact");
    form.register_field("email", FieldRegistration::new("a@b.com", validators::accept_any()))
        .unwrap();

    let flags = Arc::new(Mutex::new(Vec::new()));
    let f = flags.clone();
    store.subscribe(
        "watcher",
        form.id(),
        Arc::new(move |state| {
            f.lock().unwrap().push((state.valid, state.submitting));
        }),
    );

    assert!(form.submit(|_| SubmitOutcome::done()).await.unwrap());

    let observed = flags.lock().unwrap().clone();
    // Validity dips while validating, then recovers before the action runs.
    assert!(observed.contains(&(false, false)));
    assert_eq!(observed.last(), Some(&(true, false)));
}
