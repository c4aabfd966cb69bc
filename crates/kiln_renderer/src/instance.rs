//! Wrapper primitives that place or re-orient a child.
//!
//! Each wrapper moves the incoming ray into the child's frame, queries the
//! child, and moves the hit back out. None of them copy geometry.

use kiln_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, Primitive};

/// Shutter span used when a wrapper needs its child's box up front.
const BOX_TIME0: f32 = 0.0;
const BOX_TIME1: f32 = 1.0;

/// Shifts a child by a constant offset.
pub struct Translate {
    child: Box<Primitive>,
    offset: Vec3,
}

impl Translate {
    pub fn new(child: Primitive, offset: Vec3) -> Self {
        Self {
            child: Box::new(child),
            offset,
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let moved = Ray::new(ray.origin - self.offset, ray.direction, ray.time);
        let mut rec = self.child.hit(&moved, ray_t, rng)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.child
            .bounding_box(time0, time1)
            .map(|bbox| bbox.translate(self.offset))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.child.pdf_value(origin - self.offset, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.child.random_direction(origin - self.offset, rng)
    }
}

/// Rotates a child about the +Y axis. A positive angle turns +X toward -Z.
pub struct RotateY {
    child: Box<Primitive>,
    to_world: Mat4,
    to_local: Mat4,
    bbox: Option<Aabb>,
}

impl RotateY {
    pub fn new(child: Primitive, degrees: f32) -> Self {
        let to_world = Mat4::rotation_y_degrees(degrees);
        let to_local = to_world.transpose();
        let bbox = child
            .bounding_box(BOX_TIME0, BOX_TIME1)
            .map(|bbox| to_world.transform_aabb(&bbox));

        Self {
            child: Box::new(child),
            to_world,
            to_local,
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let local = Ray::new(
            self.to_local.transform_point3(ray.origin),
            self.to_local.transform_vector3(ray.direction),
            ray.time,
        );
        let mut rec = self.child.hit(&local, ray_t, rng)?;
        rec.p = self.to_world.transform_point3(rec.p);
        rec.normal = self.to_world.transform_vector3(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.child.pdf_value(
            self.to_local.transform_point3(origin),
            self.to_local.transform_vector3(direction),
        )
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let local = self
            .child
            .random_direction(self.to_local.transform_point3(origin), rng);
        self.to_world.transform_vector3(local)
    }
}

/// Reverses the facing of a child's normals.
pub struct FlipNormals {
    child: Box<Primitive>,
}

impl FlipNormals {
    pub fn new(child: Primitive) -> Self {
        Self {
            child: Box::new(child),
        }
    }
}

impl Hittable for FlipNormals {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut rec = self.child.hit(ray, ray_t, rng)?;
        rec.normal = -rec.normal;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.child.bounding_box(time0, time1)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        self.child.pdf_value(origin, direction)
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.child.random_direction(origin, rng)
    }
}
