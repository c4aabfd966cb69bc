//! kiln core - data shared between the renderer and its collaborators.
//!
//! The renderer never decodes files itself. It samples an [`ImageData`], a
//! raw pixel buffer with known width, height and channel count. This crate
//! owns that type and an optional decoder built on the `image` crate.
//!
//! # Example
//!
//! ```ignore
//! use kiln_core::load_image;
//!
//! let earth = load_image("earthmap.jpg")?;
//! println!("{}x{} with {} channels", earth.width(), earth.height(), earth.channels());
//! ```

pub mod image_data;

pub use image_data::{load_image, ImageData, ImageError, ImageResult};
