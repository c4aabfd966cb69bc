//! Surface and volume scattering models.

use std::f32::consts::PI;
use std::sync::Arc;

use kiln_math::{Color, Onb, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, Pdf};
use crate::sampling::{gen_f32, random_cosine_direction, random_in_unit_sphere};
use crate::texture::Texture;

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterRecord {
    /// Per-channel throughput of the bounce
    pub attenuation: Color,
    /// Proposed continuation ray
    pub scattered: Ray,
    /// Density of `scattered`'s direction. Meaningless for specular
    /// bounces, which report 1.
    pub pdf: f32,
    /// Delta lobe: the integrator must follow `scattered` as is
    pub specular: bool,
}

/// How a surface or volume responds to light.
pub enum Material {
    /// Ideal diffuse reflector.
    Lambertian { albedo: Arc<Texture> },
    /// Mirror with optional roughness. `fuzz` is clamped to [0, 1].
    Metal { albedo: Color, fuzz: f32 },
    /// Glass-like refractor with index of refraction `ref_idx`.
    Dielectric { ref_idx: f32 },
    /// Emitter; absorbs everything that hits it.
    DiffuseLight { emit: Arc<Texture> },
    /// Phase function of participating media: scatters uniformly in all
    /// directions.
    Isotropic { albedo: Arc<Texture> },
}

impl Material {
    pub fn lambertian(albedo: Arc<Texture>) -> Arc<Self> {
        Arc::new(Material::Lambertian { albedo })
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Arc<Self> {
        Arc::new(Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        })
    }

    pub fn dielectric(ref_idx: f32) -> Arc<Self> {
        Arc::new(Material::Dielectric { ref_idx })
    }

    pub fn diffuse_light(emit: Arc<Texture>) -> Arc<Self> {
        Arc::new(Material::DiffuseLight { emit })
    }

    pub fn isotropic(albedo: Arc<Texture>) -> Arc<Self> {
        Arc::new(Material::Isotropic { albedo })
    }

    /// Samples a continuation of `ray_in` at `hit`. `None` means the ray was
    /// absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        hit: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        match self {
            Material::Lambertian { albedo } => {
                let uvw = Onb::from_w(hit.normal);
                let direction = uvw.local(random_cosine_direction(rng));
                Some(ScatterRecord {
                    attenuation: albedo.value(hit.u, hit.v, hit.p),
                    scattered: Ray::new(hit.p, direction, ray_in.time),
                    pdf: uvw.w().dot(direction) / PI,
                    specular: false,
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction.normalize(), hit.normal);
                let direction = reflected + *fuzz * random_in_unit_sphere(rng);
                // Fuzz pushed the reflection below the surface
                if direction.dot(hit.normal) <= 0.0 {
                    return None;
                }
                Some(ScatterRecord {
                    attenuation: *albedo,
                    scattered: Ray::new(hit.p, direction, ray_in.time),
                    pdf: 1.0,
                    specular: true,
                })
            }
            Material::Dielectric { ref_idx } => {
                let direction = refract_or_reflect(ray_in.direction, hit.normal, *ref_idx, rng);
                Some(ScatterRecord {
                    attenuation: Color::ONE,
                    scattered: Ray::new(hit.p, direction, ray_in.time),
                    pdf: 1.0,
                    specular: true,
                })
            }
            Material::DiffuseLight { .. } => None,
            Material::Isotropic { albedo } => Some(ScatterRecord {
                attenuation: albedo.value(hit.u, hit.v, hit.p),
                scattered: Ray::new(hit.p, random_in_unit_sphere(rng), ray_in.time),
                pdf: 1.0 / (4.0 * PI),
                specular: false,
            }),
        }
    }

    /// Density with which this material would scatter `ray_in` into
    /// `scattered`'s direction.
    pub fn scattering_pdf(&self, _ray_in: &Ray, hit: &HitRecord, scattered: &Ray) -> f32 {
        match self {
            Material::Lambertian { .. } => {
                let cosine = hit.normal.dot(scattered.direction.normalize());
                if cosine > 0.0 {
                    cosine / PI
                } else {
                    0.0
                }
            }
            Material::Isotropic { .. } => 1.0 / (4.0 * PI),
            _ => 0.0,
        }
    }

    /// Direction sampler for non-specular scattering; what the integrator
    /// mixes with light sampling. `None` for specular and absorbing
    /// materials.
    pub fn sampling_pdf(&self, hit: &HitRecord) -> Option<Pdf<'static>> {
        match self {
            Material::Lambertian { .. } => Some(Pdf::Cosine(CosinePdf::new(hit.normal))),
            Material::Isotropic { .. } => Some(Pdf::Sphere),
            _ => None,
        }
    }

    /// Radiance leaving the surface at `hit`. Emitters glow on both sides.
    pub fn emitted(&self, hit: &HitRecord) -> Color {
        match self {
            Material::DiffuseLight { emit } => emit.value(hit.u, hit.v, hit.p),
            _ => Color::ZERO,
        }
    }

    pub fn is_specular(&self) -> bool {
        matches!(self, Material::Metal { .. } | Material::Dielectric { .. })
    }
}

/// Mirror `v` about `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of `v` through a surface with normal `n` (pointing to
/// the incident side). `None` on total internal reflection.
pub fn refract(v: Vec3, n: Vec3, ni_over_nt: f32) -> Option<Vec3> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of Fresnel reflectance.
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

fn refract_or_reflect(direction: Vec3, normal: Vec3, ref_idx: f32, rng: &mut dyn RngCore) -> Vec3 {
    let reflected = reflect(direction, normal);
    let d_dot_n = direction.dot(normal) / direction.length();

    // Leaving the material when the ray travels along the normal
    let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
        (-normal, ref_idx, (ref_idx * d_dot_n).min(1.0))
    } else {
        (normal, 1.0 / ref_idx, -d_dot_n)
    };

    match refract(direction, outward_normal, ni_over_nt) {
        Some(refracted) if gen_f32(rng) >= schlick(cosine, ref_idx) => refracted,
        _ => reflected,
    }
}
