//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive radiance estimation with a fixed bounce limit
//! - Light sampling mixed 50/50 with material sampling
//! - Row bands rendered in parallel, one RNG per band

use std::io::{self, Write};
use std::time::Instant;

use kiln_math::{Color, Interval, Ray};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{RenderError, RenderResult};
use crate::hittable::Hittable;
use crate::pdf::{MixturePdf, Pdf, PrimitivePdf};
use crate::sampling::gen_f32;
use crate::scene::Scene;

/// Smallest ray parameter accepted as a hit; keeps bounces off their own
/// surface.
pub const HIT_EPSILON: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Depth at which paths stop scattering
    pub max_depth: u32,
    /// Number of row bands and worker threads. `None` uses rayon's global pool.
    pub threads: Option<usize>,
    /// Base seed for the per-band generators. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            samples_per_pixel: 100,
            max_depth: 50,
            threads: None,
            seed: None,
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Path statistics gathered while tracing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Calls to the radiance estimator, primary rays included
    pub invocations: u64,
    /// Largest bounce depth reached
    pub deepest: u32,
}

impl TraceStats {
    #[inline]
    fn record(&mut self, depth: u32) {
        self.invocations += 1;
        self.deepest = self.deepest.max(depth);
    }

    pub fn merge(self, other: TraceStats) -> TraceStats {
        TraceStats {
            invocations: self.invocations + other.invocations,
            deepest: self.deepest.max(other.deepest),
        }
    }
}

/// Radiance arriving along `ray`.
///
/// `depth` counts bounces so far; primary rays start at 0.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    ray_color_with_stats(ray, scene, depth, config, rng, &mut TraceStats::default())
}

/// [`ray_color`] that also records every invocation into `stats`.
pub fn ray_color_with_stats(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
    stats: &mut TraceStats,
) -> Color {
    stats.record(depth);

    let Some(hit) = scene.world.hit(ray, Interval::from_min(HIT_EPSILON), rng) else {
        return scene.background;
    };

    let emitted = hit.material.emitted(&hit);
    if depth >= config.max_depth {
        return emitted;
    }

    let Some(srec) = hit.material.scatter(ray, &hit, rng) else {
        return emitted;
    };

    if srec.specular {
        let incoming = ray_color_with_stats(&srec.scattered, scene, depth + 1, config, rng, stats);
        return emitted + srec.attenuation * incoming;
    }

    let Some(material_pdf) = hit.material.sampling_pdf(&hit) else {
        return emitted;
    };

    let light_pdf;
    let mixture;
    let pdf = match &scene.lights {
        Some(lights) => {
            light_pdf = Pdf::Primitive(PrimitivePdf::new(lights, hit.p));
            mixture = Pdf::Mixture(MixturePdf::new(&light_pdf, &material_pdf));
            &mixture
        }
        None => &material_pdf,
    };

    let scattered = Ray::new(hit.p, pdf.generate(rng), ray.time);
    let pdf_val = pdf.value(scattered.direction);
    // Directions the mixture cannot produce carry no estimate
    if !(pdf_val > 0.0 && pdf_val.is_finite()) {
        return emitted;
    }

    let scattering_pdf = hit.material.scattering_pdf(ray, &hit, &scattered);
    let incoming = ray_color_with_stats(&scattered, scene, depth + 1, config, rng, stats);
    emitted + srec.attenuation * scattering_pdf * incoming / pdf_val
}

/// Replaces NaN channels with zero. Infinities pass through.
#[inline]
pub fn de_nan(c: Color) -> Color {
    Color::new(
        if c.x.is_nan() { 0.0 } else { c.x },
        if c.y.is_nan() { 0.0 } else { c.y },
        if c.z.is_nan() { 0.0 } else { c.z },
    )
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-encode, clamp to [0, 1] and quantize an averaged pixel.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.99 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Rendered 8-bit RGB image, row-major with the top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y), y = 0 being the top row.
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Writes the image as plain-text PPM (P3).
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "P3\n{} {}\n255", self.width, self.height)?;
        for px in self.data.chunks_exact(3) {
            writeln!(out, "{} {} {}", px[0], px[1], px[2])?;
        }
        Ok(())
    }
}

/// Render a single pixel with multi-sampling. `row` 0 is the top of the
/// image.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    row: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
    stats: &mut TraceStats,
) -> Color {
    let width = config.width as f32;
    let height = config.height as f32;
    let flipped = (config.height - 1 - row) as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..config.samples_per_pixel {
        let u = (x as f32 + gen_f32(rng)) / width;
        let v = (flipped + gen_f32(rng)) / height;
        let ray = camera.get_ray(u, v, rng);
        pixel_color += de_nan(ray_color_with_stats(&ray, scene, 0, config, rng, stats));
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Render the whole image.
///
/// Rows are split into contiguous bands, each rendered by one task with its
/// own generator; bands never share pixels. With a seed the result is
/// reproducible for a fixed band count.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let start = Instant::now();
    let width = config.width as usize;
    let height = config.height as usize;
    let bands = config
        .threads
        .unwrap_or_else(rayon::current_num_threads)
        .clamp(1, height);
    let rows_per_band = height.div_ceil(bands);
    let base_seed = config.seed.unwrap_or_else(rand::random);

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}, {} bands",
        config.width,
        config.height,
        config.samples_per_pixel,
        config.max_depth,
        bands
    );

    let mut image = ImageBuffer::new(config.width, config.height);
    let data = &mut image.data;

    let mut run = move || {
        data.par_chunks_mut(rows_per_band * width * 3)
            .enumerate()
            .map(|(band, chunk)| {
                let mut rng = match config.seed {
                    Some(_) => StdRng::seed_from_u64(base_seed.wrapping_add(band as u64)),
                    None => StdRng::from_entropy(),
                };
                let first_row = band * rows_per_band;
                let mut stats = TraceStats::default();

                for (offset, row_pixels) in chunk.chunks_exact_mut(width * 3).enumerate() {
                    let row = (first_row + offset) as u32;
                    for (x, px) in row_pixels.chunks_exact_mut(3).enumerate() {
                        let color =
                            render_pixel(camera, scene, x as u32, row, config, &mut rng, &mut stats);
                        px.copy_from_slice(&color_to_rgb8(color));
                    }
                }
                stats
            })
            .reduce(TraceStats::default, TraceStats::merge)
    };

    let stats = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| RenderError::InvalidConfig(format!("thread pool: {e}")))?
            .install(run),
        None => run(),
    };

    let primary = width as u64 * height as u64 * config.samples_per_pixel as u64;
    log::info!(
        "Rendered in {:.2?}: {} primary rays, {} total, deepest bounce {}",
        start.elapsed(),
        primary,
        stats.invocations,
        stats.deepest
    );

    Ok(image)
}
