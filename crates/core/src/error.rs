//! Error types for the backdrop core.

use thiserror::Error;

/// Errors produced while setting up or configuring a backdrop.
///
/// Once a [`Backdrop`](crate::Backdrop) is running nothing in the frame loop
/// is fallible: out-of-bounds particles are respawned, not reported.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Width or height was zero (or their product overflowed) where a
    /// non-empty raster is required.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The host could not hand out a 2D drawing surface.
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// The host refused to schedule the first animation frame.
    #[error("frame loop unavailable: host refused to schedule a frame")]
    FrameLoopUnavailable,

    /// A field variant name was not recognized by the registry.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Scene text was not valid scene JSON.
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// Writing an output artifact failed.
    #[error("i/o error: {0}")]
    Io(String),
}
