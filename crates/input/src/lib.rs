//! Input tracking: raw edge events debounced into per-button states.
//!
//! # Invariants
//! - Button state is mutated only through [`InputTracker::handle_event`]
//!   and [`InputTracker::tick`]; queries never mutate.
//! - Edges overwrite on arrival, they are never queued: a same-tick
//!   double edge collapses to the most recent one.
//! - With no incoming events a button stays `None` indefinitely.

mod tracker;

pub use tracker::{ButtonState, InputTracker};
