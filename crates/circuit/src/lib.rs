#![deny(unsafe_code)]
//! Circuit-trace particle field.
//!
//! A population of particles drifts across the surface, each dragging a short
//! polyline trail of its recent positions. Now and then a particle snaps to a
//! new heading along exactly one axis, which gives the trails the right-angle
//! look of traces on a circuit board. Trails brighten as a particle ages
//! ("charges") and the per-frame fade leaves a phosphor afterglow.
//!
//! The population size is fixed by the surface area. A particle that leaves
//! the surface or outlives its lifespan is respawned in place: same slot, new
//! random position, velocity and lifespan, empty trail.

use backdrop_core::params::{param_color, param_f64, param_usize};
use backdrop_core::{DVec2, ParticleField, Rgba, Size, Surface, Xorshift64};
use serde_json::{json, Value};
use tracing::debug;

/// Square pixels per particle.
const DEFAULT_DENSITY: f64 = 25_000.0;
/// Trail points kept per particle.
const DEFAULT_HISTORY_LEN: usize = 25;
/// Per-frame chance that a particle turns onto a single axis.
const DEFAULT_TURN_PROBABILITY: f64 = 0.02;
/// Width of the velocity range; each component is drawn from ±span/2.
const DEFAULT_SPEED_SPAN: f64 = 0.7;
const DEFAULT_LIFESPAN_MIN: f64 = 150.0;
const DEFAULT_LIFESPAN_MAX: f64 = 350.0;
const DEFAULT_TRAIL_COLOR: Rgba = Rgba::rgb(0, 255, 255);
/// Trail opacity of a newborn particle.
const DEFAULT_BASE_OPACITY: f64 = 0.1;
/// Opacity added by the time a particle reaches its lifespan.
const DEFAULT_CHARGE_OPACITY: f64 = 0.5;
const DEFAULT_LINE_WIDTH: f64 = 1.0;
const DEFAULT_FADE: Rgba = Rgba::new(2, 16, 39, 0.1);

const MIN_DENSITY: f64 = 1_000.0;
const MAX_DENSITY: f64 = 200_000.0;
const MIN_HISTORY_LEN: usize = 2;
const MAX_HISTORY_LEN: usize = 200;
const MIN_SPEED_SPAN: f64 = 0.05;
const MAX_SPEED_SPAN: f64 = 10.0;

/// Tunables for the circuit field.
///
/// [`Default`] gives the stock look: about one particle per 25 000
/// square pixels, 25-point cyan trails and a 2% turn chance per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircuitParams {
    pub density: f64,
    pub history_len: usize,
    pub turn_probability: f64,
    pub speed_span: f64,
    pub lifespan_min: f64,
    pub lifespan_max: f64,
    pub trail_color: Rgba,
    pub base_opacity: f64,
    pub charge_opacity: f64,
    pub line_width: f64,
    pub fade: Rgba,
}

impl Default for CircuitParams {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            history_len: DEFAULT_HISTORY_LEN,
            turn_probability: DEFAULT_TURN_PROBABILITY,
            speed_span: DEFAULT_SPEED_SPAN,
            lifespan_min: DEFAULT_LIFESPAN_MIN,
            lifespan_max: DEFAULT_LIFESPAN_MAX,
            trail_color: DEFAULT_TRAIL_COLOR,
            base_opacity: DEFAULT_BASE_OPACITY,
            charge_opacity: DEFAULT_CHARGE_OPACITY,
            line_width: DEFAULT_LINE_WIDTH,
            fade: DEFAULT_FADE,
        }
    }
}

impl CircuitParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// A non-positive density or speed span is ignored, density, trail
    /// length and speed span are clamped to their schema range, and a
    /// lifespan range given backwards is swapped.
    pub fn from_json(params: &Value) -> Self {
        let density = param_f64(params, "density", DEFAULT_DENSITY);
        let speed_span = param_f64(params, "speed_span", DEFAULT_SPEED_SPAN);
        let lo = param_f64(params, "lifespan_min", DEFAULT_LIFESPAN_MIN);
        let hi = param_f64(params, "lifespan_max", DEFAULT_LIFESPAN_MAX);
        Self {
            density: if density > 0.0 {
                density.clamp(MIN_DENSITY, MAX_DENSITY)
            } else {
                DEFAULT_DENSITY
            },
            history_len: param_usize(params, "history_len", DEFAULT_HISTORY_LEN)
                .clamp(MIN_HISTORY_LEN, MAX_HISTORY_LEN),
            turn_probability: param_f64(params, "turn_probability", DEFAULT_TURN_PROBABILITY),
            speed_span: if speed_span > 0.0 {
                speed_span.clamp(MIN_SPEED_SPAN, MAX_SPEED_SPAN)
            } else {
                DEFAULT_SPEED_SPAN
            },
            lifespan_min: lo.min(hi),
            lifespan_max: lo.max(hi),
            trail_color: param_color(params, "trail_color", DEFAULT_TRAIL_COLOR),
            base_opacity: param_f64(params, "base_opacity", DEFAULT_BASE_OPACITY),
            charge_opacity: param_f64(params, "charge_opacity", DEFAULT_CHARGE_OPACITY),
            line_width: param_f64(params, "line_width", DEFAULT_LINE_WIDTH),
            fade: param_color(params, "fade", DEFAULT_FADE),
        }
    }
}

/// Number of particles for a surface: `floor(area / density)`.
pub fn particle_count(size: Size, density: f64) -> usize {
    (size.area() as f64 / density).floor() as usize
}

/// One trail-emitting particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pos: DVec2,
    vel: DVec2,
    age: u32,
    lifespan: f64,
    /// Oldest first.
    trail: Vec<DVec2>,
}

impl Particle {
    fn spawn(size: Size, params: &CircuitParams, rng: &mut Xorshift64) -> Self {
        let mut p = Self {
            pos: DVec2::ZERO,
            vel: DVec2::ZERO,
            age: 0,
            lifespan: 0.0,
            trail: Vec::with_capacity(params.history_len.min(MAX_HISTORY_LEN).saturating_add(1)),
        };
        p.respawn(size, params, rng);
        p
    }

    /// Overwrites every field in place; the trail keeps its allocation.
    fn respawn(&mut self, size: Size, params: &CircuitParams, rng: &mut Xorshift64) {
        self.pos = DVec2::new(
            rng.next_range(0.0, size.width as f64),
            rng.next_range(0.0, size.height as f64),
        );
        self.vel = DVec2::new(
            rng.next_centered(params.speed_span),
            rng.next_centered(params.speed_span),
        );
        self.age = 0;
        self.lifespan = rng.next_range(params.lifespan_min, params.lifespan_max);
        self.trail.clear();
    }

    /// Snaps the velocity onto one randomly chosen axis.
    ///
    /// Without a positive span there is no non-zero speed to draw, so the
    /// velocity is left alone.
    fn turn(&mut self, speed_span: f64, rng: &mut Xorshift64) {
        if speed_span.is_nan() || speed_span <= 0.0 {
            return;
        }
        self.vel = if rng.chance(0.5) {
            DVec2::new(rng.next_centered_nonzero(speed_span), 0.0)
        } else {
            DVec2::new(0.0, rng.next_centered_nonzero(speed_span))
        };
    }

    fn record(&mut self, history_len: usize) {
        self.trail.push(self.pos);
        if self.trail.len() > history_len {
            let excess = self.trail.len() - history_len;
            self.trail.drain(..excess);
        }
    }

    pub fn position(&self) -> DVec2 {
        self.pos
    }

    pub fn velocity(&self) -> DVec2 {
        self.vel
    }

    /// Frames since the last (re)spawn.
    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn lifespan(&self) -> f64 {
        self.lifespan
    }

    /// Recent positions, oldest first.
    pub fn trail(&self) -> &[DVec2] {
        &self.trail
    }

    /// Fraction of the lifespan used up.
    pub fn charge(&self) -> f64 {
        if self.lifespan > 0.0 {
            self.age as f64 / self.lifespan
        } else {
            1.0
        }
    }
}

/// The circuit-trace field.
pub struct CircuitField {
    params: CircuitParams,
    size: Size,
    particles: Vec<Particle>,
    rng: Xorshift64,
}

impl CircuitField {
    /// Creates an empty field; [`ParticleField::init`] populates it.
    pub fn new(seed: u64, params: CircuitParams) -> Self {
        Self {
            params,
            size: Size::default(),
            particles: Vec::new(),
            rng: Xorshift64::new(seed),
        }
    }

    /// Creates a field from a JSON params object (see [`CircuitParams::from_json`]).
    pub fn from_json(seed: u64, params: &Value) -> Self {
        Self::new(seed, CircuitParams::from_json(params))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn circuit_params(&self) -> &CircuitParams {
        &self.params
    }

    pub fn size(&self) -> Size {
        self.size
    }

    fn trail_color(&self, particle: &Particle) -> Rgba {
        let opacity = self.params.base_opacity + particle.charge() * self.params.charge_opacity;
        self.params.trail_color.with_alpha(opacity)
    }
}

impl ParticleField for CircuitField {
    fn init(&mut self, size: Size) {
        let Self {
            params,
            particles,
            rng,
            ..
        } = self;
        let count = particle_count(size, params.density);
        particles.clear();
        particles.extend((0..count).map(|_| Particle::spawn(size, params, rng)));
        self.size = size;
        debug!(
            width = size.width,
            height = size.height,
            particles = count,
            "circuit field initialized"
        );
    }

    fn step(&mut self) {
        let Self {
            params,
            size,
            particles,
            rng,
        } = self;
        for p in particles.iter_mut() {
            p.pos += p.vel;
            p.age += 1;
            if rng.chance(params.turn_probability) {
                p.turn(params.speed_span, rng);
            }
            p.record(params.history_len);
            if !size.contains(p.pos) || p.age as f64 > p.lifespan {
                p.respawn(*size, params, rng);
            }
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            // A respawned particle has an empty trail, so it stays invisible
            // until it has moved twice.
            if p.trail.len() < 2 {
                continue;
            }
            surface.stroke_polyline(&p.trail, self.params.line_width, self.trail_color(p));
        }
    }

    fn fade_color(&self) -> Rgba {
        self.params.fade
    }

    fn population(&self) -> usize {
        self.particles.len()
    }

    fn params(&self) -> Value {
        json!({
            "density": self.params.density,
            "history_len": self.params.history_len,
            "turn_probability": self.params.turn_probability,
            "speed_span": self.params.speed_span,
            "lifespan_min": self.params.lifespan_min,
            "lifespan_max": self.params.lifespan_max,
            "trail_color": self.params.trail_color,
            "base_opacity": self.params.base_opacity,
            "charge_opacity": self.params.charge_opacity,
            "line_width": self.params.line_width,
            "fade": self.params.fade,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "density": {
                "type": "number",
                "default": DEFAULT_DENSITY,
                "min": MIN_DENSITY,
                "max": MAX_DENSITY,
                "description": "Square pixels per particle; count = floor(area / density)"
            },
            "history_len": {
                "type": "integer",
                "default": DEFAULT_HISTORY_LEN,
                "min": MIN_HISTORY_LEN,
                "max": MAX_HISTORY_LEN,
                "description": "Trail points kept per particle"
            },
            "turn_probability": {
                "type": "number",
                "default": DEFAULT_TURN_PROBABILITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-frame chance of a right-angle turn"
            },
            "speed_span": {
                "type": "number",
                "default": DEFAULT_SPEED_SPAN,
                "min": MIN_SPEED_SPAN,
                "max": MAX_SPEED_SPAN,
                "description": "Velocity components are drawn from ±span/2 pixels per frame"
            },
            "lifespan_min": {
                "type": "number",
                "default": DEFAULT_LIFESPAN_MIN,
                "min": 1.0,
                "max": 5000.0,
                "description": "Shortest lifespan in frames"
            },
            "lifespan_max": {
                "type": "number",
                "default": DEFAULT_LIFESPAN_MAX,
                "min": 1.0,
                "max": 5000.0,
                "description": "Longest lifespan in frames"
            },
            "trail_color": {
                "type": "color",
                "default": DEFAULT_TRAIL_COLOR,
                "description": "Trail stroke color (alpha is replaced by the charge curve)"
            },
            "base_opacity": {
                "type": "number",
                "default": DEFAULT_BASE_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Trail opacity of a newborn particle"
            },
            "charge_opacity": {
                "type": "number",
                "default": DEFAULT_CHARGE_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Opacity gained over a full lifespan"
            },
            "line_width": {
                "type": "number",
                "default": DEFAULT_LINE_WIDTH,
                "min": 0.1,
                "max": 10.0,
                "description": "Trail stroke width in pixels"
            },
            "fade": {
                "type": "color",
                "default": DEFAULT_FADE,
                "description": "Per-frame overpaint color; its alpha sets trail persistence"
            }
        })
    }
}
