#![deny(unsafe_code)]
//! Field registry: maps variant names to implementations and renders
//! headless snapshots.
//!
//! This crate sits between `backdrop-core` (which defines the
//! `ParticleField` trait) and the individual field crates
//! (`backdrop-circuit`, `backdrop-neural`). Both the CLI and the WASM
//! bindings depend on it so name dispatch lives in one place.

pub mod headless;

#[cfg(feature = "png")]
pub mod snapshot;

use backdrop_circuit::CircuitField;
use backdrop_core::{BackdropError, ParticleField, Rgba, Size, Surface};
use backdrop_neural::NeuralField;
use serde_json::Value;

/// All available field names.
const FIELD_NAMES: &[&str] = &["circuit", "neural"];

/// Every backdrop variant, behind one `ParticleField` implementation.
///
/// Use [`FieldKind::from_name`] for string-based construction (CLI, WASM).
pub enum FieldKind {
    /// Wandering particles that leave fading circuit-trace trails.
    Circuit(CircuitField),
    /// Layered nodes with signals travelling between them.
    Neural(NeuralField),
}

impl FieldKind {
    /// Constructs a field by name.
    ///
    /// Returns `BackdropError::UnknownField` if the name is not recognized.
    /// The field has no layout until `init` is called.
    pub fn from_name(name: &str, seed: u64, params: &Value) -> Result<Self, BackdropError> {
        match name {
            "circuit" => Ok(FieldKind::Circuit(CircuitField::from_json(seed, params))),
            "neural" => Ok(FieldKind::Neural(NeuralField::from_json(seed, params))),
            _ => Err(BackdropError::UnknownField(name.to_string())),
        }
    }

    /// Returns a slice of all recognized field names.
    pub fn list_fields() -> &'static [&'static str] {
        FIELD_NAMES
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Circuit(_) => "circuit",
            FieldKind::Neural(_) => "neural",
        }
    }

    fn inner(&self) -> &dyn ParticleField {
        match self {
            FieldKind::Circuit(f) => f,
            FieldKind::Neural(f) => f,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ParticleField {
        match self {
            FieldKind::Circuit(f) => f,
            FieldKind::Neural(f) => f,
        }
    }
}

impl ParticleField for FieldKind {
    fn init(&mut self, size: Size) {
        self.inner_mut().init(size)
    }

    fn step(&mut self) {
        self.inner_mut().step()
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.inner().draw(surface)
    }

    fn fade_color(&self) -> Rgba {
        self.inner().fade_color()
    }

    fn population(&self) -> usize {
        self.inner().population()
    }

    fn params(&self) -> Value {
        self.inner().params()
    }

    fn param_schema(&self) -> Value {
        self.inner().param_schema()
    }
}
