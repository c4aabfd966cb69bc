//! Hittable trait, HitRecord, and the closed set of scene primitives.

use std::sync::Arc;

use kiln_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::bvh::BvhNode;
use crate::cuboid::Cuboid;
use crate::instance::{FlipNormals, RotateY, Translate};
use crate::list::PrimitiveList;
use crate::material::Material;
use crate::medium::ConstantMedium;
use crate::rect::AaRect;
use crate::sphere::{MovingSphere, Sphere};

/// Record of a ray-primitive intersection.
///
/// Borrowed from the primitive that produced it and discarded after one
/// integrator step.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the hit
    pub t: f32,
    /// Surface parameterization for texture lookup
    pub u: f32,
    pub v: f32,
    /// World-space hit point
    pub p: Vec3,
    /// Unit geometric normal on the side the primitive was built to face
    pub normal: Vec3,
    /// Material at the hit
    pub material: &'a Material,
}

/// Capabilities shared by every primitive.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `ray` inside `ray_t`, if any.
    ///
    /// `rng` is only consumed by stochastic primitives such as participating
    /// media; surfaces ignore it.
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>>;

    /// Box enclosing the primitive over the shutter interval
    /// `[time0, time1]`. `None` means the primitive has no finite extent.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;

    /// Solid-angle density of sampling `direction` from `origin` toward this
    /// primitive. Zero for primitives that cannot act as lights.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Direction from `origin` toward a random point on this primitive.
    fn random_direction(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// Every kind of geometry the renderer knows about.
pub enum Primitive {
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AaRect),
    Cuboid(Cuboid),
    ConstantMedium(ConstantMedium),
    Translate(Translate),
    RotateY(RotateY),
    FlipNormals(FlipNormals),
    List(PrimitiveList),
    Bvh(BvhNode),
}

impl Primitive {
    /// Wraps the primitive for sharing between lists, BVHs and wrappers.
    pub fn shared(self) -> Arc<Primitive> {
        Arc::new(self)
    }

    fn as_hittable(&self) -> &dyn Hittable {
        match self {
            Primitive::Sphere(p) => p,
            Primitive::MovingSphere(p) => p,
            Primitive::Rect(p) => p,
            Primitive::Cuboid(p) => p,
            Primitive::ConstantMedium(p) => p,
            Primitive::Translate(p) => p,
            Primitive::RotateY(p) => p,
            Primitive::FlipNormals(p) => p,
            Primitive::List(p) => p,
            Primitive::Bvh(p) => p,
        }
    }
}

impl Hittable for Primitive {
    #[inline]
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.as_hittable().hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.as_hittable().bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.as_hittable().pdf_value(origin, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.as_hittable().random_direction(origin, rng)
    }
}

macro_rules! impl_from_primitive {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Primitive {
                fn from(p: $ty) -> Self {
                    Primitive::$variant(p)
                }
            }
        )*
    };
}

impl_from_primitive!(
    Sphere(Sphere),
    MovingSphere(MovingSphere),
    Rect(AaRect),
    Cuboid(Cuboid),
    ConstantMedium(ConstantMedium),
    Translate(Translate),
    RotateY(RotateY),
    FlipNormals(FlipNormals),
    List(PrimitiveList),
    Bvh(BvhNode),
);
