//! Homogeneous participating medium.

use std::sync::Arc;

use kiln_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, Primitive};
use crate::material::Material;
use crate::sampling::gen_f32;
use crate::texture::Texture;

/// Gap past the entry point when looking for the exit point.
const EXIT_EPSILON: f32 = 0.0001;

/// Smoke or fog filling a closed boundary with constant density.
///
/// A ray crossing the boundary scatters at an exponentially distributed
/// distance; if that distance is longer than the path inside, the ray
/// passes through untouched.
pub struct ConstantMedium {
    boundary: Arc<Primitive>,
    density: f32,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<Primitive>, density: f32, albedo: Arc<Texture>) -> Self {
        Self {
            boundary,
            density,
            phase_function: Material::Isotropic { albedo },
        }
    }

    pub fn density(&self) -> f32 {
        self.density
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Entry and exit along the whole line, then clipped to ray_t
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self
            .boundary
            .hit(ray, Interval::from_min(entry.t + EXIT_EPSILON), rng)?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction.length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = -(1.0 / self.density) * gen_f32(rng).ln();
        if hit_distance >= distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            t,
            u: 0.0,
            v: 0.0,
            p: ray.at(t),
            // Arbitrary; the isotropic phase function ignores it
            normal: Vec3::X,
            material: &self.phase_function,
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;
    use kiln_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fog(density: f32) -> ConstantMedium {
        let white = Material::lambertian(Texture::solid(Color::ONE));
        let boundary = Primitive::from(Sphere::new(Vec3::ZERO, 1.0, white)).shared();
        ConstantMedium::new(boundary, density, Texture::solid(Color::ONE))
    }

    #[test]
    fn test_dense_medium_scatters_near_entry() {
        let medium = fog(1000.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let rec = medium
                .hit(&ray, Interval::from_min(0.001), &mut rng)
                .unwrap();
            assert!(rec.t >= 4.0);
            assert!(rec.t < 4.05, "t = {}", rec.t);
            assert!(matches!(rec.material, Material::Isotropic { .. }));
        }
    }

    #[test]
    fn test_sparse_medium_mostly_transparent() {
        let medium = fog(1e-4);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        let hits = (0..1000)
            .filter(|_| medium.hit(&ray, Interval::from_min(0.001), &mut rng).is_some())
            .count();
        // P(scatter) = 1 - exp(-2e-4) ~ 0.0002
        assert!(hits < 10, "{hits} scatters");
    }

    #[test]
    fn test_ray_starting_inside() {
        let medium = fog(1000.0);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let mut rng = StdRng::seed_from_u64(9);
        let rec = medium
            .hit(&ray, Interval::from_min(0.001), &mut rng)
            .unwrap();
        assert!(rec.t >= 0.001 && rec.t < 0.05);
    }

    #[test]
    fn test_interval_excluding_medium_misses() {
        let medium = fog(1000.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(medium
            .hit(&ray, Interval::new(0.001, 3.0), &mut rng)
            .is_none());
    }

    #[test]
    fn test_scale_invariant_in_direction_length() {
        let medium = fog(1000.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -10.0), 0.0);
        let mut rng = StdRng::seed_from_u64(5);
        let rec = medium
            .hit(&ray, Interval::from_min(0.001), &mut rng)
            .unwrap();
        // Distance is measured in world units, not ray parameter
        assert!(rec.t >= 0.4 && rec.t < 0.405);
        assert!(rec.p.z <= 1.0 && rec.p.z > 0.95);
    }
}
