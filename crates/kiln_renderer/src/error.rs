//! Errors raised while assembling or configuring a render.
//!
//! Per-sample numerical trouble is never an error: degenerate samples are
//! zeroed by the renderer and simply contribute nothing.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot build a BVH over an empty primitive set")]
    EmptyPrimitiveSet,

    #[error("primitive #{index} has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox { index: usize },

    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
