//! Math types for kiln.
//!
//! Vectors come straight from `glam`; everything else here is a small value
//! type built on top of them.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::{min_extent_at, Aabb};
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// RGB color with linear components. Channels may exceed 1.0 for emitters.
pub type Color = Vec3;
