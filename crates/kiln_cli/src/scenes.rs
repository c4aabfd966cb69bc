//! Demo scene catalogue.
//!
//! Every entry builds its own camera and, where it has emitters worth
//! sampling, the light target the integrator aims next-event rays at.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::ValueEnum;
use kiln_core::ImageData;
use kiln_math::{Color, Vec3};
use kiln_renderer::sampling::{gen_f32, gen_range};
use kiln_renderer::{
    AaRect, BvhNode, Camera, ConstantMedium, Cuboid, FlipNormals, Material, MovingSphere, Perlin,
    Primitive, PrimitiveList, RotateY, Scene, Sphere, Texture, Translate,
};
use rand::RngCore;

/// Sky color for the outdoor scenes that have no emitters.
const SKY: Color = Color::new(0.7, 0.8, 1.0);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    #[default]
    CornellBox,
    CornellSmoke,
    Final,
    SimpleLight,
    TwoPerlinSpheres,
    TwoSpheres,
    Random,
    Earth,
}

pub struct SceneSetup {
    pub camera: Camera,
    pub scene: Scene,
}

/// Builds `name` for an image of the given aspect ratio. `texture` maps the
/// globe in `final` and is required by `earth`.
pub fn build(
    name: SceneName,
    aspect: f32,
    texture: Option<Arc<ImageData>>,
    rng: &mut dyn RngCore,
) -> Result<SceneSetup> {
    let setup = match name {
        SceneName::CornellBox => cornell_box(aspect),
        SceneName::CornellSmoke => cornell_smoke(aspect),
        SceneName::Final => final_scene(aspect, texture, rng)?,
        SceneName::SimpleLight => simple_light(aspect, rng),
        SceneName::TwoPerlinSpheres => two_perlin_spheres(aspect, rng),
        SceneName::TwoSpheres => two_spheres(aspect),
        SceneName::Random => random_spheres(aspect, rng)?,
        SceneName::Earth => match texture {
            Some(texture) => earth(aspect, texture),
            None => bail!("the earth scene needs an image passed with --texture"),
        },
    };

    log::info!(
        "Built scene {:?} (light sampling {})",
        name,
        if setup.scene.lights.is_some() { "on" } else { "off" }
    );
    Ok(setup)
}

fn shared(p: impl Into<Primitive>) -> Arc<Primitive> {
    p.into().shared()
}

fn flipped(p: impl Into<Primitive>) -> Arc<Primitive> {
    shared(FlipNormals::new(p.into()))
}

fn camera(look_from: Vec3, look_at: Vec3, vfov: f32, aperture: f32, aspect: f32) -> Camera {
    let mut camera = Camera::new()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, aperture, 10.0)
        .with_aspect(aspect)
        .with_shutter(0.0, 1.0);
    camera.initialize();
    camera
}

fn solid(r: f32, g: f32, b: f32) -> Arc<Material> {
    Material::lambertian(Texture::solid(Color::new(r, g, b)))
}

fn light(intensity: f32) -> Arc<Material> {
    Material::diffuse_light(Texture::solid(Color::splat(intensity)))
}

/// The five walls of the 555-unit Cornell room; the light is added by the
/// caller.
fn cornell_walls(world: &mut PrimitiveList) {
    let red = solid(0.65, 0.05, 0.05);
    let white = solid(0.73, 0.73, 0.73);
    let green = solid(0.12, 0.45, 0.15);

    world.add(flipped(AaRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)));
    world.add(shared(AaRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)));
    world.add(flipped(AaRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())));
    world.add(shared(AaRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())));
    world.add(flipped(AaRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white)));
}

fn cornell_camera(aspect: f32) -> Camera {
    camera(
        Vec3::new(278.0, 278.0, -800.0),
        Vec3::new(278.0, 278.0, 0.0),
        40.0,
        0.0,
        aspect,
    )
}

/// Box rotated about its base corner and moved into the room.
fn placed_box(size: Vec3, degrees: f32, offset: Vec3, material: Arc<Material>) -> Primitive {
    let cube = Cuboid::new(Vec3::ZERO, size, material);
    let rotated = RotateY::new(cube.into(), degrees);
    Translate::new(rotated.into(), offset).into()
}

fn cornell_box(aspect: f32) -> SceneSetup {
    let mut world = PrimitiveList::new();
    cornell_walls(&mut world);

    let lamp = flipped(AaRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, light(15.0)));
    let glass = shared(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, Material::dielectric(1.5)));
    world.add(lamp.clone());
    world.add(glass.clone());
    world.add(shared(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        solid(0.73, 0.73, 0.73),
    )));

    // Aim next-event rays at the lamp and the glass ball
    let lights = PrimitiveList::from(vec![lamp, glass]);

    SceneSetup {
        camera: cornell_camera(aspect),
        scene: Scene::new(shared(world)).with_lights(shared(lights)),
    }
}

fn cornell_smoke(aspect: f32) -> SceneSetup {
    let mut world = PrimitiveList::new();
    cornell_walls(&mut world);

    let lamp = flipped(AaRect::xz(113.0, 443.0, 127.0, 432.0, 554.0, light(7.0)));
    world.add(lamp.clone());

    let white = solid(0.73, 0.73, 0.73);
    let short = placed_box(Vec3::splat(165.0), -18.0, Vec3::new(130.0, 0.0, 65.0), white.clone());
    let tall = placed_box(Vec3::new(165.0, 330.0, 165.0), 15.0, Vec3::new(265.0, 0.0, 295.0), white);

    world.add(shared(ConstantMedium::new(
        shared(short),
        0.01,
        Texture::solid(Color::ONE),
    )));
    world.add(shared(ConstantMedium::new(
        shared(tall),
        0.01,
        Texture::solid(Color::ZERO),
    )));

    SceneSetup {
        camera: cornell_camera(aspect),
        scene: Scene::new(shared(world)).with_lights(lamp),
    }
}

fn final_scene(
    aspect: f32,
    texture: Option<Arc<ImageData>>,
    rng: &mut dyn RngCore,
) -> Result<SceneSetup> {
    let mut world = PrimitiveList::new();

    // Field of boxes of random height
    let ground = solid(0.48, 0.83, 0.53);
    let boxes_per_side = 20;
    let mut ground_boxes = Vec::with_capacity(boxes_per_side * boxes_per_side);
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = 100.0 * (gen_f32(rng) + 0.01);
            ground_boxes.push(shared(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }
    world.add(shared(BvhNode::new(ground_boxes, 0.0, 1.0, rng)?));

    let lamp = shared(AaRect::xz(123.0, 423.0, 147.0, 412.0, 554.0, light(7.0)));
    world.add(lamp.clone());

    let center = Vec3::new(400.0, 400.0, 200.0);
    world.add(shared(MovingSphere::new(
        center,
        center + Vec3::new(30.0, 0.0, 0.0),
        0.0,
        1.0,
        50.0,
        solid(0.7, 0.3, 0.1),
    )));
    world.add(shared(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Material::dielectric(1.5),
    )));
    world.add(shared(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Material::metal(Color::new(0.8, 0.8, 0.9), 10.0),
    )));

    // Glass ball filled with blue haze
    let shell = shared(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Material::dielectric(1.5),
    ));
    world.add(shell.clone());
    world.add(shared(ConstantMedium::new(
        shell,
        0.2,
        Texture::solid(Color::new(0.2, 0.4, 0.9)),
    )));

    // Thin fog over everything
    let mist = shared(Sphere::new(Vec3::ZERO, 5000.0, Material::dielectric(1.5)));
    world.add(shared(ConstantMedium::new(mist, 0.0001, Texture::solid(Color::ONE))));

    let globe = match texture {
        Some(data) => Material::lambertian(Texture::image(data)),
        None => solid(0.2, 0.3, 0.8),
    };
    world.add(shared(Sphere::new(Vec3::new(400.0, 200.0, 400.0), 100.0, globe)));

    let perlin = Arc::new(Perlin::new(rng));
    world.add(shared(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Material::lambertian(Texture::noise(perlin, 0.1)),
    )));

    // Cluster of small spheres, rotated and moved as one
    let white = solid(0.73, 0.73, 0.73);
    let cluster: Vec<_> = (0..1000)
        .map(|_| {
            let c = Vec3::new(
                gen_range(rng, 0.0, 165.0),
                gen_range(rng, 0.0, 165.0),
                gen_range(rng, 0.0, 165.0),
            );
            shared(Sphere::new(c, 10.0, white.clone()))
        })
        .collect();
    let cluster = BvhNode::new(cluster, 0.0, 1.0, rng)?;
    world.add(shared(Translate::new(
        RotateY::new(cluster.into(), 15.0).into(),
        Vec3::new(-100.0, 270.0, 395.0),
    )));

    Ok(SceneSetup {
        camera: camera(
            Vec3::new(478.0, 278.0, -600.0),
            Vec3::new(278.0, 278.0, 0.0),
            40.0,
            0.0,
            aspect,
        ),
        scene: Scene::new(shared(world)).with_lights(lamp),
    })
}

fn simple_light(aspect: f32, rng: &mut dyn RngCore) -> SceneSetup {
    let perlin = Arc::new(Perlin::new(rng));
    let marble = Material::lambertian(Texture::noise(perlin, 4.0));

    let mut world = PrimitiveList::new();
    world.add(shared(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(shared(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    let bulb = shared(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light(4.0)));
    let panel = shared(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, light(4.0)));
    world.add(bulb.clone());
    world.add(panel.clone());

    SceneSetup {
        camera: camera(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), 20.0, 0.0, aspect),
        scene: Scene::new(shared(world)).with_lights(shared(PrimitiveList::from(vec![bulb, panel]))),
    }
}

fn outdoor_camera(aperture: f32, aspect: f32) -> Camera {
    camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, aperture, aspect)
}

fn two_perlin_spheres(aspect: f32, rng: &mut dyn RngCore) -> SceneSetup {
    let perlin = Arc::new(Perlin::new(rng));
    let marble = Material::lambertian(Texture::noise(perlin, 4.0));

    let mut world = PrimitiveList::new();
    world.add(shared(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, marble.clone())));
    world.add(shared(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));

    SceneSetup {
        camera: outdoor_camera(0.0, aspect),
        scene: Scene::new(shared(world)).with_background(SKY),
    }
}

fn checker() -> Arc<Texture> {
    Texture::checker(
        Texture::solid(Color::new(0.2, 0.3, 0.1)),
        Texture::solid(Color::splat(0.9)),
    )
}

fn two_spheres(aspect: f32) -> SceneSetup {
    let checked = Material::lambertian(checker());

    let mut world = PrimitiveList::new();
    world.add(shared(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, checked.clone())));
    world.add(shared(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, checked)));

    SceneSetup {
        camera: outdoor_camera(0.0, aspect),
        scene: Scene::new(shared(world)).with_background(SKY),
    }
}

fn random_spheres(aspect: f32, rng: &mut dyn RngCore) -> Result<SceneSetup> {
    let mut objects = vec![shared(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::lambertian(checker()),
    ))];

    for a in -10..10 {
        for b in -10..10 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let sphere: Primitive = if choose_mat < 0.8 {
                let albedo = solid(
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                    gen_f32(rng) * gen_f32(rng),
                );
                let bounce = Vec3::new(0.0, 0.5 * gen_f32(rng), 0.0);
                MovingSphere::new(center, center + bounce, 0.0, 1.0, 0.2, albedo).into()
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                    0.5 * (1.0 + gen_f32(rng)),
                );
                Sphere::new(center, 0.2, Material::metal(albedo, 0.5 * gen_f32(rng))).into()
            } else {
                Sphere::new(center, 0.2, Material::dielectric(1.5)).into()
            };
            objects.push(sphere.shared());
        }
    }

    objects.push(shared(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, Material::dielectric(1.5))));
    objects.push(shared(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, solid(0.4, 0.2, 0.1))));
    objects.push(shared(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::metal(Color::new(0.7, 0.6, 0.5), 0.0),
    )));

    let world = BvhNode::new(objects, 0.0, 1.0, rng)?;
    Ok(SceneSetup {
        camera: outdoor_camera(0.1, aspect),
        scene: Scene::new(shared(world)).with_background(SKY),
    })
}

fn earth(aspect: f32, texture: Arc<ImageData>) -> SceneSetup {
    let globe = Sphere::new(Vec3::ZERO, 2.0, Material::lambertian(Texture::image(texture)));
    SceneSetup {
        camera: outdoor_camera(0.0, aspect),
        scene: Scene::new(shared(globe)).with_background(SKY),
    }
}
