//! Shared value types for the aperture host.
//!
//! # Invariants
//! - Every type here is a plain immutable value; no GPU or windowing
//!   dependency ever enters this crate.
//! - [`Event`] is the closed union every dispatcher in the host consumes.
//!   It is `#[non_exhaustive]` so downstream matches must carry a
//!   catch-all arm.

pub mod codes;
pub mod event;
pub mod viewport;

pub use codes::{Key, MouseButton};
pub use event::{ButtonAction, Event, Modifiers};
pub use viewport::Viewport;
