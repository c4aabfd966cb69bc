//! A BVH must answer every ray exactly like a flat list of the same
//! primitives.

use std::sync::Arc;

use kiln_math::{Color, Interval, Ray, Vec3};
use kiln_renderer::{
    sampling::{gen_f32, gen_range},
    AaRect, BvhNode, Cuboid, HitRecord, Hittable, Material, MovingSphere, Primitive,
    PrimitiveList, RotateY, Sphere, Texture, Translate,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_point(rng: &mut StdRng, extent: f32) -> Vec3 {
    Vec3::new(
        gen_range(rng, -extent, extent),
        gen_range(rng, -extent, extent),
        gen_range(rng, -extent, extent),
    )
}

/// Mixed bag of primitives, each with its own material so hits can be told
/// apart by material identity.
fn random_primitives(count: usize, extent: f32, rng: &mut StdRng) -> Vec<Arc<Primitive>> {
    (0..count)
        .map(|i| {
            let material = Material::lambertian(Texture::solid(Color::new(
                gen_f32(rng),
                gen_f32(rng),
                gen_f32(rng),
            )));
            let center = random_point(rng, extent);
            let size = gen_range(rng, 0.2, 2.0);

            let primitive: Primitive = match i % 6 {
                0 | 1 => Sphere::new(center, size, material).into(),
                2 => MovingSphere::new(
                    center,
                    center + random_point(rng, 1.5),
                    0.0,
                    1.0,
                    size,
                    material,
                )
                .into(),
                3 => AaRect::xz(
                    center.x - size,
                    center.x + size,
                    center.z - size,
                    center.z + size,
                    center.y,
                    material,
                )
                .into(),
                4 => Cuboid::new(center - Vec3::splat(size), center + Vec3::splat(size), material)
                    .into(),
                _ => {
                    let cube = Cuboid::new(Vec3::ZERO, Vec3::splat(size), material);
                    let rotated = RotateY::new(cube.into(), gen_range(rng, 0.0, 360.0));
                    Translate::new(rotated.into(), center).into()
                }
            };
            primitive.shared()
        })
        .collect()
}

fn random_ray(rng: &mut StdRng, extent: f32) -> Ray {
    let origin = random_point(rng, extent * 1.2);
    let target = random_point(rng, extent);
    Ray::new(origin, target - origin, gen_f32(rng))
}

fn assert_same_hit(expected: Option<HitRecord>, got: Option<HitRecord>, ray: &Ray) {
    match (expected, got) {
        (None, None) => {}
        (Some(e), Some(g)) => {
            assert_eq!(e.t, g.t, "t differs for {ray:?}");
            assert_eq!(e.p, g.p, "p differs for {ray:?}");
            assert_eq!(e.normal, g.normal, "normal differs for {ray:?}");
            assert!(
                std::ptr::eq(e.material, g.material),
                "material differs for {ray:?}"
            );
        }
        (e, g) => panic!(
            "list hit: {}, bvh hit: {} for {ray:?}",
            e.is_some(),
            g.is_some()
        ),
    }
}

fn check_equivalence(count: usize, rays: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let extent = (count as f32).cbrt() * 4.0 + 5.0;
    let primitives = random_primitives(count, extent, &mut rng);

    let list = PrimitiveList::from(primitives.clone());
    let bvh = BvhNode::new(primitives, 0.0, 1.0, &mut rng).unwrap();

    let mut hits = 0;
    for _ in 0..rays {
        let ray = random_ray(&mut rng, extent);
        let interval = Interval::from_min(0.001);
        let expected = list.hit(&ray, interval, &mut rng);
        let got = bvh.hit(&ray, interval, &mut rng);
        hits += usize::from(expected.is_some());
        assert_same_hit(expected, got, &ray);
    }

    if count >= 100 {
        assert!(hits > 0, "no ray hit anything; test is vacuous");
    }
}

#[test]
fn test_single_primitive() {
    check_equivalence(1, 500, 1);
}

#[test]
fn test_two_and_three_primitives() {
    check_equivalence(2, 500, 2);
    check_equivalence(3, 500, 3);
}

#[test]
fn test_odd_counts() {
    for (seed, count) in [7, 13, 31, 99].into_iter().enumerate() {
        check_equivalence(count, 300, 10 + seed as u64);
    }
}

#[test]
fn test_thousand_primitives() {
    check_equivalence(1000, 500, 4);
}

#[test]
fn test_fifty_thousand_primitives() {
    check_equivalence(50_000, 100, 5);
}

#[test]
fn test_bounded_interval() {
    let mut rng = StdRng::seed_from_u64(6);
    let primitives = random_primitives(500, 20.0, &mut rng);
    let list = PrimitiveList::from(primitives.clone());
    let bvh = BvhNode::new(primitives, 0.0, 1.0, &mut rng).unwrap();

    for _ in 0..300 {
        let ray = random_ray(&mut rng, 20.0);
        let interval = Interval::new(0.5, gen_range(&mut rng, 1.0, 3.0));
        let expected = list.hit(&ray, interval, &mut rng);
        let got = bvh.hit(&ray, interval, &mut rng);
        assert_same_hit(expected, got, &ray);
    }
}

#[test]
fn test_coplanar_rects_far_from_origin() {
    let mut rng = StdRng::seed_from_u64(8);
    for k in [554.0, 2048.0, 5000.0, 250_000.0] {
        // Four floor tiles sharing one plane, so every box is flat along y
        let quadrants = [
            (-2.0, 0.0, -2.0, 0.0),
            (0.0, 2.0, -2.0, 0.0),
            (-2.0, 0.0, 0.0, 2.0),
            (0.0, 2.0, 0.0, 2.0),
        ];
        let tiles: Vec<_> = quadrants
            .into_iter()
            .map(|(x0, x1, z0, z1)| {
                let material = Material::lambertian(Texture::solid(Color::splat(0.5)));
                Primitive::from(AaRect::xz(x0, x1, z0, z1, k, material)).shared()
            })
            .collect();

        let list = PrimitiveList::from(tiles.clone());
        let bvh = BvhNode::new(tiles, 0.0, 1.0, &mut rng).unwrap();

        for _ in 0..50 {
            let x = gen_range(&mut rng, -1.9, 1.9);
            let z = gen_range(&mut rng, -1.9, 1.9);
            let origin = Vec3::new(x, k - 10.0, z);
            let ray = Ray::new(origin, Vec3::Y, 0.0);
            let expected = list.hit(&ray, Interval::from_min(0.001), &mut rng);
            assert!(expected.is_some(), "list missed the plane at {k}");
            assert_same_hit(expected, bvh.hit(&ray, Interval::from_min(0.001), &mut rng), &ray);
        }
    }
}
