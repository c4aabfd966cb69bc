//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over shared primitives. Every node has exactly two children;
//! a single primitive is stored in both slots rather than leaving one empty.

use std::sync::Arc;
use std::time::Instant;

use kiln_math::{Aabb, Interval, Ray};
use rand::RngCore;

use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable, Primitive};
use crate::sampling::gen_f32;

/// A primitive paired with its precomputed box for the build.
type Entry = (Aabb, Arc<Primitive>);

pub struct BvhNode {
    left: Arc<Primitive>,
    right: Arc<Primitive>,
    bbox: Aabb,
}

impl BvhNode {
    /// Builds a BVH over `objects` for the shutter interval
    /// `[time0, time1]`.
    ///
    /// Each level sorts its primitives by box minimum along a randomly
    /// chosen axis and splits them in half (the left half takes the extra
    /// one). Fails if the set is empty or any primitive has no box.
    pub fn new(
        objects: Vec<Arc<Primitive>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> RenderResult<Self> {
        if objects.is_empty() {
            return Err(RenderError::EmptyPrimitiveSet);
        }

        let start = Instant::now();
        let count = objects.len();

        let mut entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                object
                    .bounding_box(time0, time1)
                    .map(|bbox| (bbox, object))
                    .ok_or(RenderError::MissingBoundingBox { index })
            })
            .collect::<RenderResult<Vec<Entry>>>()?;

        let root = Self::build(&mut entries, rng);

        log::debug!(
            "Built BVH over {} primitives (depth {}) in {:.2?}",
            count,
            root.depth(),
            start.elapsed()
        );

        Ok(root)
    }

    fn build(entries: &mut [Entry], rng: &mut dyn RngCore) -> Self {
        let axis = ((gen_f32(rng) * 3.0) as usize).min(2);
        entries.sort_by(|a, b| {
            a.0.axis_interval(axis)
                .min
                .total_cmp(&b.0.axis_interval(axis).min)
        });

        let ((left_box, left), (right_box, right)) = match entries.len() {
            1 => (entries[0].clone(), entries[0].clone()),
            2 => (entries[0].clone(), entries[1].clone()),
            n => {
                let (lower, upper) = entries.split_at_mut((n + 1) / 2);
                let left = Self::build(lower, rng);
                let right = Self::build(upper, rng);
                (
                    (left.bbox, Primitive::Bvh(left).shared()),
                    (right.bbox, Primitive::Bvh(right).shared()),
                )
            }
        };

        Self {
            left,
            right,
            bbox: Aabb::surrounding(&left_box, &right_box),
        }
    }

    pub fn bbox(&self) -> Aabb {
        self.bbox
    }

    /// Number of node levels from here down to the deepest leaf.
    pub fn depth(&self) -> usize {
        let child_depth = |child: &Primitive| match child {
            Primitive::Bvh(node) => node.depth(),
            _ => 0,
        };
        1 + child_depth(&self.left).max(child_depth(&self.right))
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        // Both children are always queried over the full interval
        let hit_left = self.left.hit(ray, ray_t, rng);
        let hit_right = self.right.hit(ray, ray_t, rng);

        match (hit_left, hit_right) {
            (Some(l), Some(r)) => Some(if l.t < r.t { l } else { r }),
            (l, None) => l,
            (None, r) => r,
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}
