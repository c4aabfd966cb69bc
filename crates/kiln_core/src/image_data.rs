//! Decoded pixel buffers for image-mapped textures.

use std::path::Path;

use kiln_math::Color;
use thiserror::Error;

/// Errors produced while building or decoding a pixel buffer.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),
}

pub type ImageResult<T> = Result<T, ImageError>;

/// An already-decoded image: row-major bytes, top row first, `channels`
/// interleaved bytes per pixel.
#[derive(Clone, Debug)]
pub struct ImageData {
    width: u32,
    height: u32,
    channels: u8,
    bytes: Vec<u8>,
}

impl ImageData {
    /// Wraps raw bytes. The buffer must hold exactly
    /// `width * height * channels` bytes and `channels` must be 1..=4.
    pub fn new(width: u32, height: u32, channels: u8, bytes: Vec<u8>) -> ImageResult<Self> {
        if !(1..=4).contains(&channels) {
            return Err(ImageError::InvalidBuffer(format!(
                "unsupported channel count {channels}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(ImageError::InvalidBuffer(format!(
                "empty image {width}x{height}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if bytes.len() != expected {
            return Err(ImageError::InvalidBuffer(format!(
                "expected {expected} bytes for {width}x{height}x{channels}, got {}",
                bytes.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Color of the texel at integer coordinates, channels scaled to [0, 1].
    /// One- and two-channel images are grey (the second channel is alpha).
    pub fn texel(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let channels = self.channels as usize;
        let idx = (y * self.width as usize + x) * channels;
        let scale = 1.0 / 255.0;

        if channels >= 3 {
            Color::new(
                self.bytes[idx] as f32 * scale,
                self.bytes[idx + 1] as f32 * scale,
                self.bytes[idx + 2] as f32 * scale,
            )
        } else {
            Color::splat(self.bytes[idx] as f32 * scale)
        }
    }

    /// Nearest-texel lookup. `(0, 0)` is the bottom-left corner of the image,
    /// `(1, 1)` the top-right; out-of-range coordinates clamp to the border.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let i = (u * self.width as f32).max(0.0) as u32;
        let j = ((1.0 - v) * self.height as f32 - 0.001).max(0.0) as u32;
        self.texel(i, j)
    }
}

/// Decodes an image file into an 8-bit RGB [`ImageData`].
pub fn load_image(path: impl AsRef<Path>) -> ImageResult<ImageData> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| ImageError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    log::debug!(
        "Decoded image: {} ({}x{}, {:.1} KB)",
        path.display(),
        width,
        height,
        (width * height * 3) as f32 / 1024.0
    );

    ImageData::new(width, height, 3, rgb.into_raw())
}
