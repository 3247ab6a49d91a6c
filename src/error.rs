//! Crate-wide error type.

use std::collections::TryReserveError;

use crate::light::MAX_LIGHTS;

/// Errors surfaced by construction, resize and presentation.
///
/// Degenerate geometry never produces an error; it is skipped where it occurs.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Light set already holds the maximum number of lights
    #[error("Light limit is reached (max {} lights)", MAX_LIGHTS)]
    LightLimit,

    /// An index refers past the end of the array it indexes
    #[error("{what} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Index count doesn't fit the submesh topology
    #[error("{count} indices do not form whole {topology} primitives")]
    IndexCount { count: usize, topology: &'static str },

    /// UV index array length doesn't match the position index array
    #[error("UV index count {uv} does not match index count {indices}")]
    UvIndexMismatch { uv: usize, indices: usize },

    /// Zero or oversized framebuffer/viewport dimensions
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pixel plane allocation failed
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    /// Presentation surface failure
    #[error("Surface error: {0}")]
    Surface(String),

    /// Image decode or encode failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
