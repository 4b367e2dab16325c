//! # formflow-state
//!
//! The form state store: the per-form [`FormState`] record, the named
//! [`Transition`] operations that are the only way to mutate it, and the
//! [`FormStore`] dispatch/subscribe container that holds one record per
//! [`FormId`].

pub mod state;
pub mod store;
pub mod transition;

pub use state::{FormId, FormState};
pub use store::{FormStore, Subscriber};
pub use transition::Transition;
