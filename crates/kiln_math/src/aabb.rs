use crate::{Interval, Ray, Vec3};

/// Thickness given to any axis that would otherwise be flat.
const MIN_EXTENT: f32 = 0.0001;

/// Smallest non-degenerate thickness for an axis at `coord`. Far from the
/// origin a fixed pad falls below the float spacing and rounds away.
pub fn min_extent_at(coord: f32) -> f32 {
    MIN_EXTENT.max(coord.abs() * 8.0 * f32::EPSILON)
}

/// Axis-aligned bounding box, stored as one interval per axis.
///
/// Boxes built through [`Aabb::new`] or [`Aabb::from_points`] are padded so
/// that no axis is thinner than `MIN_EXTENT`; a flat rectangle still gets a
/// slab the ray can enter and leave.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Contains nothing. Identity element of [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Box spanned by two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Smallest box containing both inputs: min of the minimum corners, max
    /// of the maximum corners.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::hull(&box0.x, &box1.x),
            y: Interval::hull(&box0.y, &box1.y),
            z: Interval::hull(&box0.z, &box1.z),
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Interval for an axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Slab test against the ray parameter range `ray_t`.
    ///
    /// A zero direction component divides to +/-infinity, which keeps the
    /// slab test valid: the ray either lies inside that slab for every t or
    /// for none.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (slab.min - ray.origin[axis]) * inv_d;
            let mut t1 = (slab.max - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }
        true
    }

    /// Moves the box by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.shifted(offset.x),
            self.y.shifted(offset.y),
            self.z.shifted(offset.z),
        )
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    fn pad_to_minimums(&mut self) {
        for axis in [&mut self.x, &mut self.y, &mut self.z] {
            let extent = min_extent_at(axis.min.abs().max(axis.max.abs()));
            if extent.is_finite() && axis.length() < extent {
                *axis = axis.padded(extent);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_aabb_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));
        assert_eq!(aabb.min(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(aabb.max(), Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_aabb_flat_axis_is_padded() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));
        assert!(aabb.z.length() > 0.0);
        assert!(aabb.z.contains(2.0));
    }

    #[test]
    fn test_aabb_flat_axis_far_from_origin_keeps_thickness() {
        for k in [2048.0, 5000.0, -1.0e6] {
            let aabb = Aabb::from_points(Vec3::new(0.0, k, 0.0), Vec3::new(1.0, k, 1.0));
            assert!(aabb.y.min < k && aabb.y.max > k, "flat slab at {k}: {:?}", aabb.y);

            let ray = Ray::new(Vec3::new(0.5, k - 10.0, 0.5), Vec3::Y, 0.0);
            assert!(aabb.hit(&ray, Interval::from_min(0.001)), "missed slab at {k}");
        }
    }

    #[test]
    fn test_aabb_surrounding_contains_both() {
        let a = Aabb::from_points(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 1.0, 1.0));
        let b = Aabb::from_points(Vec3::new(-3.0, 2.0, -1.0), Vec3::new(1.0, 8.0, 0.5));
        let s = Aabb::surrounding(&a, &b);

        for corner in a.corners().iter().chain(b.corners().iter()) {
            assert!(s.contains_point(*corner), "{corner:?} outside {s:?}");
        }
        assert_eq!(s.min(), Vec3::new(-3.0, 0.0, -1.0));
        assert_eq!(s.max(), Vec3::new(5.0, 8.0, 1.0));
    }

    #[test]
    fn test_aabb_surrounding_disjoint_uses_max_corners() {
        // Both maximum corners lie beyond both minimum corners
        let a = Aabb::from_points(Vec3::ZERO, Vec3::splat(1.0));
        let b = Aabb::from_points(Vec3::splat(2.0), Vec3::splat(3.0));
        let s = Aabb::surrounding(&a, &b);
        assert_eq!(s.max(), Vec3::splat(3.0));
        assert!(s.contains_point(Vec3::splat(2.5)));
    }

    #[test]
    fn test_aabb_hit_and_miss() {
        let aabb = unit_box();
        let t = Interval::new(0.0, 100.0);

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&toward, t));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&away, t));

        let beside = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&beside, t));
    }

    #[test]
    fn test_aabb_hit_respects_interval() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        // Box spans t in [4, 6]
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.5)));
        assert!(!aabb.hit(&ray, Interval::new(6.5, 10.0)));
        assert!(aabb.hit(&ray, Interval::new(5.5, 10.0)));
    }

    #[test]
    fn test_aabb_hit_symmetric_under_direction_flip() {
        let aabb = unit_box();
        let t = Interval::new(0.0, f32::INFINITY);
        let forward = Ray::new(Vec3::new(-4.0, -3.0, -5.0), Vec3::new(1.0, 0.7, 1.2), 0.0);
        // Same line traversed from the far side with the direction negated
        let backward = Ray::new(forward.at(8.0), -forward.direction, 0.0);
        assert_eq!(aabb.hit(&forward, t), aabb.hit(&backward, t));
        assert!(aabb.hit(&forward, t));
    }

    #[test]
    fn test_aabb_positive_direction_is_interval_overlap() {
        let aabb = unit_box();
        let ray = Ray::new(Vec3::splat(-3.0), Vec3::new(1.0, 1.0, 1.0), 0.0);
        // On every axis the slab is entered at t=2 and left at t=4
        assert!(aabb.hit(&ray, Interval::new(0.0, 2.5)));
        assert!(aabb.hit(&ray, Interval::new(3.9, 8.0)));
        assert!(!aabb.hit(&ray, Interval::new(4.1, 8.0)));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 1.9)));
    }

    #[test]
    fn test_aabb_zero_direction_component() {
        let aabb = unit_box();
        let t = Interval::new(0.0, 100.0);

        // Parallel to the x slab, inside it
        let inside = Ray::new(Vec3::new(0.5, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&inside, t));

        // Parallel to the x slab, outside it
        let outside = Ray::new(Vec3::new(1.5, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&outside, t));
    }

    #[test]
    fn test_aabb_translate() {
        let moved = Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, -1.0, 0.0));
        assert_eq!(moved.min(), Vec3::new(5.0, -1.0, 0.0));
        assert_eq!(moved.max(), Vec3::new(6.0, 0.0, 1.0));
    }
}
