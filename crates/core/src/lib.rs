#![deny(unsafe_code)]
//! Core types and traits for the animated backdrop engine.
//!
//! Provides the [`Surface`] drawing abstraction and its [`SurfaceManager`],
//! the [`ParticleField`] trait implemented by each simulation variant, the
//! [`Host`] scheduling trait, the [`Backdrop`] start/frame/resize/stop
//! lifecycle, the CPU [`Pixmap`] raster, [`Rgba`] colors, the seedable
//! [`Xorshift64`] PRNG, [`Scene`] descriptions and JSON parameter helpers.

pub mod backdrop;
pub mod color;
pub mod error;
pub mod field;
pub mod host;
pub mod params;
pub mod prng;
pub mod raster;
pub mod scene;
pub mod surface;

pub use backdrop::{Backdrop, LifecycleState};
pub use color::Rgba;
pub use error::BackdropError;
pub use field::ParticleField;
pub use host::{FrameHandle, Host, ListenerHandle, ManualHost};
pub use prng::Xorshift64;
pub use raster::Pixmap;
pub use scene::Scene;
pub use surface::{DrawCall, RecordingSurface, Size, Surface, SurfaceManager};

/// Re-exported so field crates and hosts agree on the point type.
pub use glam::DVec2;
