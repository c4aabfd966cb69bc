//! kiln renderer - CPU path tracing core.
//!
//! A Monte Carlo path tracer with BVH acceleration, importance sampling of
//! lights, participating media and motion blur.

mod bvh;
mod camera;
mod cuboid;
mod error;
mod hittable;
mod instance;
mod list;
mod material;
mod medium;
mod pdf;
mod perlin;
mod rect;
mod renderer;
mod scene;
mod sphere;
mod texture;

pub mod sampling;

pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, Primitive};
pub use instance::{FlipNormals, RotateY, Translate};
pub use list::PrimitiveList;
pub use material::{reflect, refract, schlick, Material, ScatterRecord};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, MixturePdf, Pdf, PrimitivePdf};
pub use perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};
pub use rect::{AaRect, Plane};
pub use renderer::{
    color_to_rgb8, de_nan, linear_to_gamma, ray_color, ray_color_with_stats, render,
    render_pixel, ImageBuffer, RenderConfig, TraceStats, HIT_EPSILON,
};
pub use scene::Scene;
pub use sphere::{sphere_uv, MovingSphere, Sphere};
pub use texture::Texture;

/// Re-export common math types from kiln_math
pub use kiln_math::{Aabb, Color, Interval, Ray, Vec3};
