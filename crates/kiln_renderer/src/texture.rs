//! Textures: pure functions from surface coordinates to color.

use std::sync::Arc;

use kiln_core::ImageData;
use kiln_math::{Color, Vec3};

use crate::perlin::{Perlin, DEFAULT_TURBULENCE_DEPTH};

/// A texture is evaluated at the hit's `(u, v)` parameterization and its
/// world-space point `p`. Variants share sub-textures and pixel data through
/// `Arc`, so cloning a texture is cheap.
#[derive(Clone)]
pub enum Texture {
    /// The same color everywhere.
    Constant(Color),
    /// 3D checker pattern: the sign of `sin(10x) sin(10y) sin(10z)` picks
    /// `odd` (negative) or `even`.
    Checker {
        even: Arc<Texture>,
        odd: Arc<Texture>,
    },
    /// Marble-like Perlin pattern; `scale` sets the stripe frequency.
    Noise { perlin: Arc<Perlin>, scale: f32 },
    /// Nearest-texel lookup into a decoded image.
    Image(Arc<ImageData>),
}

impl Texture {
    pub fn solid(color: Color) -> Arc<Self> {
        Arc::new(Texture::Constant(color))
    }

    pub fn checker(even: Arc<Texture>, odd: Arc<Texture>) -> Arc<Self> {
        Arc::new(Texture::Checker { even, odd })
    }

    pub fn noise(perlin: Arc<Perlin>, scale: f32) -> Arc<Self> {
        Arc::new(Texture::Noise { perlin, scale })
    }

    pub fn image(data: Arc<ImageData>) -> Arc<Self> {
        Arc::new(Texture::Image(data))
    }

    pub fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match self {
            Texture::Constant(color) => *color,
            Texture::Checker { even, odd } => {
                let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
            Texture::Noise { perlin, scale } => {
                let turbulence = perlin.turbulence(p, DEFAULT_TURBULENCE_DEPTH);
                Color::ONE * 0.5 * (1.0 + (scale * p.z + 10.0 * turbulence).sin())
            }
            Texture::Image(data) => data.sample(u, v),
        }
    }
}
