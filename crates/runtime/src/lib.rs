//! The loop driver: per tick, drain platform events, dispatch in fixed
//! order (overlay filter, input tracker, application handler), then the
//! optional update and render hooks, then present.
//!
//! # Invariants
//! - Single-threaded and cooperative: every step runs to completion
//!   before the next begins; there are no suspension points and no locks.
//! - Hooks are fixed at composition time through the `HANDLES_*`
//!   associated consts; an absent hook is skipped at compile time.
//! - The only termination path is the platform's close signal.

mod clock;
mod driver;
mod hooks;
mod platform;

pub use clock::FrameClock;
pub use driver::Driver;
pub use hooks::{AppHooks, TickContext};
pub use platform::Platform;
