//! The `ParticleField` trait every backdrop simulation implements.
//!
//! The trait is object-safe so a [`Backdrop`](crate::Backdrop) can drive
//! either the circuit-trail or the neural-layer model as `Box<dyn ParticleField>`.

use serde_json::Value;

use crate::color::Rgba;
use crate::surface::{Size, Surface};

/// A frame-stepped simulation that paints itself onto a [`Surface`].
///
/// One frame is `step()` followed by `draw()`. Both are infallible: a field
/// keeps its own invariants (bounded histories, in-bounds positions, signal
/// caps) by correcting state, never by reporting errors.
pub trait ParticleField {
    /// Rebuilds all size-dependent state for a surface of `size`.
    ///
    /// Called once at start and again after every resize. Everything derived
    /// from the previous size is discarded.
    fn init(&mut self, size: Size);

    /// Advances the simulation by one frame.
    fn step(&mut self);

    /// Issues this frame's draw calls.
    fn draw(&self, surface: &mut dyn Surface);

    /// Translucent color painted over the whole surface before each frame.
    fn fade_color(&self) -> Rgba;

    /// Number of live entities (particles, or nodes plus signals).
    fn population(&self) -> usize;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every tunable parameter, its type, range and default.
    fn param_schema(&self) -> Value;
}
