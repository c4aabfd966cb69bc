//! Direction densities used for importance sampling.
//!
//! A PDF can both draw a direction and report the density of any direction;
//! the integrator divides by the reported density of what it drew.

use std::f32::consts::PI;

use kiln_math::{Onb, Vec3};
use rand::RngCore;

use crate::hittable::{Hittable, Primitive};
use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};

/// Cosine-weighted hemisphere around a direction.
#[derive(Debug, Clone, Copy)]
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(w),
        }
    }

    pub fn value(&self, direction: Vec3) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w());
        if cosine > 0.0 {
            cosine / PI
        } else {
            0.0
        }
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Directions from a fixed origin toward a primitive, using the primitive's
/// own light-sampling routines.
#[derive(Clone, Copy)]
pub struct PrimitivePdf<'a> {
    target: &'a Primitive,
    origin: Vec3,
}

impl<'a> PrimitivePdf<'a> {
    pub fn new(target: &'a Primitive, origin: Vec3) -> Self {
        Self { target, origin }
    }

    pub fn value(&self, direction: Vec3) -> f32 {
        self.target.pdf_value(self.origin, direction)
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.target.random_direction(self.origin, rng)
    }
}

/// Equal-weight blend of two PDFs.
#[derive(Clone, Copy)]
pub struct MixturePdf<'a> {
    parts: [&'a Pdf<'a>; 2],
}

impl<'a> MixturePdf<'a> {
    pub fn new(p0: &'a Pdf<'a>, p1: &'a Pdf<'a>) -> Self {
        Self { parts: [p0, p1] }
    }

    pub fn value(&self, direction: Vec3) -> f32 {
        0.5 * self.parts[0].value(direction) + 0.5 * self.parts[1].value(direction)
    }

    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < 0.5 {
            self.parts[0].generate(rng)
        } else {
            self.parts[1].generate(rng)
        }
    }
}

/// The PDFs the integrator can sample from.
#[derive(Clone, Copy)]
pub enum Pdf<'a> {
    Cosine(CosinePdf),
    /// Uniform over all directions.
    Sphere,
    Primitive(PrimitivePdf<'a>),
    Mixture(MixturePdf<'a>),
}

impl<'a> Pdf<'a> {
    /// Density of `direction`; zero where the PDF cannot generate it.
    pub fn value(&self, direction: Vec3) -> f32 {
        match self {
            Pdf::Cosine(pdf) => pdf.value(direction),
            Pdf::Sphere => 1.0 / (4.0 * PI),
            Pdf::Primitive(pdf) => pdf.value(direction),
            Pdf::Mixture(pdf) => pdf.value(direction),
        }
    }

    /// Draws a direction distributed according to [`Pdf::value`]. Not
    /// necessarily normalized.
    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Cosine(pdf) => pdf.generate(rng),
            Pdf::Sphere => random_unit_vector(rng),
            Pdf::Primitive(pdf) => pdf.generate(rng),
            Pdf::Mixture(pdf) => pdf.generate(rng),
        }
    }
}
