//! Renderer-agnostic view math.
//!
//! # Invariants
//! - [`Camera`]'s cached projection is valid iff no aspect/size mutation
//!   occurred since the cache was populated.
//! - The projection is reversed-depth with an infinite far plane: pair it
//!   with a zero-to-one depth range, a depth clear of 0.0 and a "greater"
//!   depth comparison.
//! - Nothing in this crate touches a GPU API; [`CameraConstants`] is the
//!   Pod record backends upload verbatim.

mod camera;
mod constants;
mod transform;

pub use camera::Camera;
pub use constants::CameraConstants;
pub use transform::Transform;
