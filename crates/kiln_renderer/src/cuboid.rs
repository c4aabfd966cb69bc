//! Axis-aligned box built from six rectangles.

use std::sync::Arc;

use kiln_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, Primitive};
use crate::instance::FlipNormals;
use crate::list::PrimitiveList;
use crate::material::Material;
use crate::rect::AaRect;

/// A box between two corners. The faces on the minimum side are flipped so
/// every normal points out of the box.
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    sides: PrimitiveList,
}

impl Cuboid {
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<Material>) -> Self {
        let min = p0.min(p1);
        let max = p0.max(p1);

        // (face, flip) pairs; the min-side faces are flipped
        let faces = [
            (AaRect::xy(min.x, max.x, min.y, max.y, max.z, material.clone()), false),
            (AaRect::xy(min.x, max.x, min.y, max.y, min.z, material.clone()), true),
            (AaRect::xz(min.x, max.x, min.z, max.z, max.y, material.clone()), false),
            (AaRect::xz(min.x, max.x, min.z, max.z, min.y, material.clone()), true),
            (AaRect::yz(min.y, max.y, min.z, max.z, max.x, material.clone()), false),
            (AaRect::yz(min.y, max.y, min.z, max.z, min.x, material), true),
        ];

        let mut sides = PrimitiveList::new();
        for (rect, flip) in faces {
            let face = if flip {
                Primitive::from(FlipNormals::new(rect.into()))
            } else {
                Primitive::from(rect)
            };
            sides.add(Arc::new(face));
        }

        Self { min, max, sides }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::from_points(self.min, self.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;
    use kiln_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn white() -> Arc<Material> {
        Material::lambertian(Texture::solid(Color::splat(0.73)))
    }

    #[test]
    fn test_normals_point_outward() {
        let cube = Cuboid::new(Vec3::ZERO, Vec3::ONE, white());
        let mut rng = StdRng::seed_from_u64(0);
        let center = Vec3::splat(0.5);

        let axes = [Vec3::X, Vec3::Y, Vec3::Z];
        for axis in axes {
            for sign in [1.0, -1.0] {
                let dir = axis * sign;
                let origin = center + dir * 5.0;
                let ray = Ray::new(origin, -dir, 0.0);
                let rec = cube.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();
                assert!((rec.normal - dir).length() < 1e-6, "face {dir:?}");
                assert!((rec.t - 4.5).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_corners_in_any_order() {
        let cube = Cuboid::new(Vec3::new(2.0, 3.0, 4.0), Vec3::new(-1.0, 0.0, 1.0), white());
        let bbox = cube.bounding_box(0.0, 1.0).unwrap();
        assert_eq!(bbox.min(), Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(bbox.max(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_ray_from_inside_hits_far_face() {
        let cube = Cuboid::new(Vec3::splat(-1.0), Vec3::splat(1.0), white());
        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = cube.hit(&ray, Interval::from_min(0.001), &mut rng).unwrap();
        assert!((rec.t - 1.0).abs() < 1e-6);
        assert_eq!(rec.normal, Vec3::X);
    }
}
