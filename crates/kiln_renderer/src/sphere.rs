//! Static and moving sphere primitives.

use std::f32::consts::PI;
use std::sync::Arc;

use kiln_math::{Aabb, Interval, Onb, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::sampling::random_to_sphere;

/// A sphere. A negative radius keeps the same surface but turns the
/// normals inward, which is how hollow glass shells are built.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, &self.material, ray, ray_t)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(sphere_box(self.center, self.radius))
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let probe = Ray::new(origin, direction, 0.0);
        if hit_sphere(
            self.center,
            self.radius,
            &self.material,
            &probe,
            Interval::from_min(0.001),
        )
        .is_none()
        {
            return 0.0;
        }

        let distance_squared = (self.center - origin).length_squared();
        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared)
            .max(0.0)
            .sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    fn random_direction(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(rng, self.radius, distance_squared))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to
/// `center1` at `time1`.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Center at `time`. Exact at both endpoints; extrapolates linearly
    /// outside `[time0, time1]`.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        let s = (time - self.time0) / span;
        self.center0 * (1.0 - s) + self.center1 * s
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center(ray.time), self.radius, &self.material, ray, ray_t)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let box0 = sphere_box(self.center(time0), self.radius);
        let box1 = sphere_box(self.center(time1), self.radius);
        Some(Aabb::surrounding(&box0, &box1))
    }
}

fn sphere_box(center: Vec3, radius: f32) -> Aabb {
    let rvec = Vec3::splat(radius.abs());
    Aabb::from_points(center - rvec, center + rvec)
}

/// (u, v) for a point on the unit sphere: u runs around +Y starting at -X,
/// v runs from the south pole (0) to the north pole (1).
pub fn sphere_uv(p: Vec3) -> (f32, f32) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();
    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + PI / 2.0) / PI;
    (u, v)
}

fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = ray.origin - center;
    let a = ray.direction.length_squared();
    let half_b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;

    // Tangent rays count as misses
    let discriminant = half_b * half_b - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let mut root = (-half_b - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (-half_b + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let p = ray.at(root);
    let normal = (p - center) / radius;
    let (u, v) = sphere_uv(normal);

    Some(HitRecord {
        t: root,
        u,
        v,
        p,
        normal,
        material,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::Texture;
    use kiln_math::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<Material> {
        Material::lambertian(Texture::solid(Color::splat(0.5)))
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);

        let rec = sphere
            .hit(&ray, Interval::from_min(0.001), &mut rng())
            .unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::Y, 0.0);
        assert!(sphere
            .hit(&ray, Interval::from_min(0.001), &mut rng())
            .is_none());
    }

    #[test]
    fn test_tangent_ray_misses() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::X, 0.0);
        assert!(sphere
            .hit(&ray, Interval::from_min(0.001), &mut rng())
            .is_none());
    }

    #[test]
    fn test_hit_point_on_surface() {
        let radius = 2.5;
        let sphere = Sphere::new(Vec3::ZERO, radius, grey());
        let mut r = rng();
        for i in 0..64 {
            let angle = i as f32 * 0.1;
            let origin = Vec3::new(angle.cos() * 10.0, 0.3 * angle, angle.sin() * 10.0);
            let ray = Ray::new(origin, -origin + Vec3::splat(0.2), 0.0);
            if let Some(rec) = sphere.hit(&ray, Interval::from_min(0.001), &mut r) {
                assert!((rec.p.length() - radius).abs() < 1e-4);
                assert!((rec.normal.length() - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_origin_inside_uses_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);
        let rec = sphere
            .hit(&ray, Interval::from_min(0.001), &mut rng())
            .unwrap();
        assert!((rec.t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_negative_radius_flips_normal() {
        let sphere = Sphere::new(Vec3::ZERO, -1.0, grey());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        let rec = sphere
            .hit(&ray, Interval::from_min(0.001), &mut rng())
            .unwrap();
        assert!((rec.normal + Vec3::Z).length() < 1e-5);

        let bbox = sphere.bounding_box(0.0, 1.0).unwrap();
        assert!(bbox.contains_point(Vec3::splat(0.99)));
        assert!(bbox.contains_point(Vec3::splat(-0.99)));
    }

    #[test]
    fn test_sphere_uv_poles_and_equator() {
        let (_, v_north) = sphere_uv(Vec3::Y);
        let (_, v_south) = sphere_uv(-Vec3::Y);
        assert!((v_north - 1.0).abs() < 1e-6);
        assert!(v_south.abs() < 1e-6);

        let (u, v) = sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_moving_center_exact_at_endpoints() {
        let c0 = Vec3::new(0.1, 0.7, -3.3);
        let c1 = Vec3::new(1.9, -0.3, 2.2);
        let sphere = MovingSphere::new(c0, c1, 0.0, 1.0, 0.5, grey());
        assert_eq!(sphere.center(0.0), c0);
        assert_eq!(sphere.center(1.0), c1);
        assert!((sphere.center(0.5) - (c0 + c1) * 0.5).length() < 1e-6);
        // Outside the interval the motion extrapolates
        assert!((sphere.center(2.0) - (c1 + (c1 - c0))).length() < 1e-5);
    }

    #[test]
    fn test_moving_sphere_hit_follows_time() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 0.0, 1.0, 1.0, grey());
        let mut r = rng();

        let early = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);
        assert!(sphere.hit(&early, Interval::from_min(0.001), &mut r).is_some());

        let late = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 1.0);
        assert!(sphere.hit(&late, Interval::from_min(0.001), &mut r).is_none());

        let bbox = sphere.bounding_box(0.0, 1.0).unwrap();
        assert!(bbox.contains_point(Vec3::new(-0.9, 0.0, 0.0)));
        assert!(bbox.contains_point(Vec3::new(10.9, 0.0, 0.0)));
    }

    #[test]
    fn test_light_sampling_hits_sphere() {
        let sphere = Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0, grey());
        let mut r = rng();
        for _ in 0..100 {
            let dir = sphere.random_direction(Vec3::ZERO, &mut r);
            let pdf = sphere.pdf_value(Vec3::ZERO, dir);
            assert!(pdf > 0.0);
            // Uniform over the cone
            let cos_theta_max = (1.0 - 1.0 / 25.0_f32).sqrt();
            let expected = 1.0 / (2.0 * PI * (1.0 - cos_theta_max));
            assert!((pdf - expected).abs() / expected < 1e-3);
        }
        assert_eq!(sphere.pdf_value(Vec3::ZERO, -Vec3::Y), 0.0);
    }
}
