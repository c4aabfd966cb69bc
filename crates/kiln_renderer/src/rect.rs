//! Axis-aligned rectangles.

use std::sync::Arc;

use kiln_math::{min_extent_at, Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::sampling::gen_range;

/// Half thickness of the bounding slab around the rectangle's plane.
const SLAB: f32 = 0.0001;

/// Which coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Spans x and y at constant z; faces +Z.
    Xy,
    /// Spans x and z at constant y; faces +Y.
    Xz,
    /// Spans y and z at constant x; faces +X.
    Yz,
}

impl Plane {
    /// Indices of the (a, b) spanning axes and the constant axis.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::Xy => (0, 1, 2),
            Plane::Xz => (0, 2, 1),
            Plane::Yz => (1, 2, 0),
        }
    }

    fn normal(self) -> Vec3 {
        match self {
            Plane::Xy => Vec3::Z,
            Plane::Xz => Vec3::Y,
            Plane::Yz => Vec3::X,
        }
    }
}

/// Rectangle `[a0, a1] x [b0, b1]` in `plane` at offset `k` along the
/// remaining axis.
pub struct AaRect {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Arc<Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        a0: f32,
        a1: f32,
        b0: f32,
        b1: f32,
        k: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, z: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::Xy, x0, x1, y0, y1, z, material)
    }

    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, y: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::Xz, x0, x1, z0, z1, y, material)
    }

    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, x: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::Yz, y0, y1, z0, z1, x, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn area(&self) -> f32 {
        (self.a1 - self.a0) * (self.b1 - self.b0)
    }

    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let (ai, bi, ki) = self.plane.axes();
        let t = (self.k - ray.origin[ki]) / ray.direction[ki];
        if !ray_t.contains(t) {
            return None;
        }

        let a = ray.origin[ai] + t * ray.direction[ai];
        let b = ray.origin[bi] + t * ray.direction[bi];
        // Written so NaN coordinates fall through as misses
        if !(a >= self.a0 && a <= self.a1 && b >= self.b0 && b <= self.b1) {
            return None;
        }

        Some(HitRecord {
            t,
            u: (a - self.a0) / (self.a1 - self.a0),
            v: (b - self.b0) / (self.b1 - self.b0),
            p: ray.at(t),
            normal: self.plane.normal(),
            material: &self.material,
        })
    }
}

impl Hittable for AaRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.intersect(ray, ray_t)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let (ai, bi, ki) = self.plane.axes();
        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;
        lo[ai] = self.a0;
        hi[ai] = self.a1;
        lo[bi] = self.b0;
        hi[bi] = self.b1;
        let slab = SLAB.max(min_extent_at(self.k));
        lo[ki] = self.k - slab;
        hi[ki] = self.k + slab;
        Some(Aabb::from_points(lo, hi))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let probe = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.intersect(&probe, Interval::from_min(0.001)) else {
            return 0.0;
        };

        let distance_squared = rec.t * rec.t * direction.length_squared();
        let cosine = (direction.dot(rec.normal) / direction.length()).abs();
        distance_squared / (cosine * self.area())
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let (ai, bi, ki) = self.plane.axes();
        let mut point = Vec3::ZERO;
        point[ai] = gen_range(rng, self.a0, self.a1);
        point[bi] = gen_range(rng, self.b0, self.b1);
        point[ki] = self.k;
        point - origin
    }
}
