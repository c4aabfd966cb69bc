//! Flat primitive list.

use std::sync::Arc;

use kiln_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, Primitive};
use crate::sampling::gen_f32;

/// An unordered group of primitives queried one by one.
///
/// Also the usual light target: as a PDF it picks a member uniformly and
/// averages the members' densities.
#[derive(Default)]
pub struct PrimitiveList {
    objects: Vec<Arc<Primitive>>,
}

impl PrimitiveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: Arc<Primitive>) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<Primitive>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hands the members over, e.g. to a BVH build.
    pub fn into_objects(self) -> Vec<Arc<Primitive>> {
        self.objects
    }
}

impl From<Vec<Arc<Primitive>>> for PrimitiveList {
    fn from(objects: Vec<Arc<Primitive>>) -> Self {
        Self { objects }
    }
}

impl Hittable for PrimitiveList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far), rng) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let mut objects = self.objects.iter();
        let first = objects.next()?.bounding_box(time0, time1)?;
        objects.try_fold(first, |acc, object| {
            object
                .bounding_box(time0, time1)
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }
        let count = self.objects.len();
        let index = ((gen_f32(rng) * count as f32) as usize).min(count - 1);
        self.objects[index].random_direction(origin, rng)
    }
}
