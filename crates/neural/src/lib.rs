#![deny(unsafe_code)]
//! Layered neural-network field.
//!
//! Columns of glowing nodes sit on an even grid, every node wired to every
//! node in the next column. Small bright signals spawn at random, travel
//! along one of those wires from a node in layer `i` to a node in layer
//! `i + 1`, and vanish on arrival.
//!
//! Node placement is fully determined by the layer sizes and the surface
//! size. Only signal spawning uses the PRNG.

use backdrop_core::params::{param_color, param_f64, param_usize, param_usize_list};
use backdrop_core::{DVec2, ParticleField, Rgba, Size, Surface, Xorshift64};
use serde_json::{json, Value};
use tracing::debug;

const DEFAULT_LAYERS: [usize; 4] = [5, 7, 7, 5];
const DEFAULT_NODE_RADIUS: f64 = 3.0;
/// Glow radius as a multiple of the node radius.
const GLOW_SCALE: f64 = 3.0;
/// Signal radius as a fraction of the node radius.
const SIGNAL_SCALE: f64 = 1.0 / 1.5;
const DEFAULT_NODE_COLOR: Rgba = Rgba::new(0, 255, 255, 0.7);
const DEFAULT_GLOW_COLOR: Rgba = Rgba::new(0, 255, 255, 0.2);
const DEFAULT_CONNECTION_COLOR: Rgba = Rgba::new(0, 255, 255, 0.1);
const DEFAULT_CONNECTION_WIDTH: f64 = 0.5;
const DEFAULT_SIGNAL_COLOR: Rgba = Rgba::rgb(255, 255, 255);
const DEFAULT_SIGNAL_GLOW: f64 = 5.0;
/// Progress added per frame; a signal crosses in 40 frames.
const DEFAULT_SIGNAL_SPEED: f64 = 0.025;
const DEFAULT_SPAWN_PROBABILITY: f64 = 0.04;
const DEFAULT_MAX_SIGNALS: usize = 100;
const DEFAULT_FADE: Rgba = Rgba::new(2, 16, 39, 0.15);

const MAX_LAYERS: usize = 16;
const MAX_LAYER_NODES: usize = 64;
const MAX_SIGNALS: usize = 1000;

/// Tunables for the neural field.
#[derive(Debug, Clone, PartialEq)]
pub struct NeuralParams {
    /// Node count per layer, left to right.
    pub layers: Vec<usize>,
    pub node_radius: f64,
    pub node_color: Rgba,
    pub glow_color: Rgba,
    pub connection_color: Rgba,
    pub connection_width: f64,
    pub signal_color: Rgba,
    pub signal_glow: f64,
    pub signal_speed: f64,
    pub spawn_probability: f64,
    pub max_signals: usize,
    pub fade: Rgba,
}

impl Default for NeuralParams {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYERS.to_vec(),
            node_radius: DEFAULT_NODE_RADIUS,
            node_color: DEFAULT_NODE_COLOR,
            glow_color: DEFAULT_GLOW_COLOR,
            connection_color: DEFAULT_CONNECTION_COLOR,
            connection_width: DEFAULT_CONNECTION_WIDTH,
            signal_color: DEFAULT_SIGNAL_COLOR,
            signal_glow: DEFAULT_SIGNAL_GLOW,
            signal_speed: DEFAULT_SIGNAL_SPEED,
            spawn_probability: DEFAULT_SPAWN_PROBABILITY,
            max_signals: DEFAULT_MAX_SIGNALS,
            fade: DEFAULT_FADE,
        }
    }
}

impl NeuralParams {
    /// Extracts parameters from a JSON object, falling back to defaults.
    ///
    /// Signal speed must be positive so every signal eventually arrives.
    /// Extra layers are dropped and layer sizes and the signal cap are
    /// clamped to their schema range.
    pub fn from_json(params: &Value) -> Self {
        let speed = param_f64(params, "signal_speed", DEFAULT_SIGNAL_SPEED);
        let mut layers = param_usize_list(params, "layers", &DEFAULT_LAYERS);
        layers.truncate(MAX_LAYERS);
        for count in &mut layers {
            *count = (*count).min(MAX_LAYER_NODES);
        }
        Self {
            layers,
            node_radius: param_f64(params, "node_radius", DEFAULT_NODE_RADIUS),
            node_color: param_color(params, "node_color", DEFAULT_NODE_COLOR),
            glow_color: param_color(params, "glow_color", DEFAULT_GLOW_COLOR),
            connection_color: param_color(params, "connection_color", DEFAULT_CONNECTION_COLOR),
            connection_width: param_f64(params, "connection_width", DEFAULT_CONNECTION_WIDTH),
            signal_color: param_color(params, "signal_color", DEFAULT_SIGNAL_COLOR),
            signal_glow: param_f64(params, "signal_glow", DEFAULT_SIGNAL_GLOW),
            signal_speed: if speed > 0.0 {
                speed
            } else {
                DEFAULT_SIGNAL_SPEED
            },
            spawn_probability: param_f64(params, "spawn_probability", DEFAULT_SPAWN_PROBABILITY),
            max_signals: param_usize(params, "max_signals", DEFAULT_MAX_SIGNALS).min(MAX_SIGNALS),
            fade: param_color(params, "fade", DEFAULT_FADE),
        }
    }
}

/// Address of a node: layer index and position within the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub layer: usize,
    pub index: usize,
}

/// A pulse travelling between nodes in adjacent layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    source: NodeRef,
    target: NodeRef,
    progress: f64,
}

impl Signal {
    pub fn source(&self) -> NodeRef {
        self.source
    }

    pub fn target(&self) -> NodeRef {
        self.target
    }

    /// Fraction of the way travelled, in [0, 1).
    pub fn progress(&self) -> f64 {
        self.progress
    }
}

/// Lays out `counts` as evenly spaced columns of evenly spaced nodes.
///
/// Layer `i` of `L` sits at `x = W / (L + 1) * (i + 1)`; node `j` of `n` in a
/// layer sits at `y = H / (n + 1) * (j + 1)`.
pub fn layout(counts: &[usize], size: Size) -> Vec<Vec<DVec2>> {
    let layer_spacing = size.width as f64 / (counts.len() + 1) as f64;
    counts
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            let x = layer_spacing * (i + 1) as f64;
            let node_spacing = size.height as f64 / (n + 1) as f64;
            (0..n)
                .map(|j| DVec2::new(x, node_spacing * (j + 1) as f64))
                .collect()
        })
        .collect()
}

/// The neural-network field.
pub struct NeuralField {
    params: NeuralParams,
    size: Size,
    layers: Vec<Vec<DVec2>>,
    signals: Vec<Signal>,
    rng: Xorshift64,
}

impl NeuralField {
    /// Creates a field with no layout; [`ParticleField::init`] places the nodes.
    pub fn new(seed: u64, params: NeuralParams) -> Self {
        Self {
            params,
            size: Size::default(),
            layers: Vec::new(),
            signals: Vec::new(),
            rng: Xorshift64::new(seed),
        }
    }

    pub fn from_json(seed: u64, params: &Value) -> Self {
        Self::new(seed, NeuralParams::from_json(params))
    }

    pub fn layers(&self) -> &[Vec<DVec2>] {
        &self.layers
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn neural_params(&self) -> &NeuralParams {
        &self.params
    }

    pub fn node(&self, at: NodeRef) -> Option<DVec2> {
        self.layers.get(at.layer)?.get(at.index).copied()
    }

    pub fn node_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Wires drawn per frame: every node to every node of the next layer.
    pub fn connection_count(&self) -> usize {
        self.layers.windows(2).map(|w| w[0].len() * w[1].len()).sum()
    }

    /// Current on-screen position of a signal.
    pub fn signal_position(&self, signal: &Signal) -> Option<DVec2> {
        let from = self.node(signal.source)?;
        let to = self.node(signal.target)?;
        Some(from.lerp(to, signal.progress))
    }

    fn try_spawn(&mut self) {
        if !self.rng.chance(self.params.spawn_probability)
            || self.signals.len() >= self.params.max_signals
            || self.layers.len() < 2
        {
            return;
        }
        let layer = self.rng.next_usize(self.layers.len() - 1);
        let (from_len, to_len) = (self.layers[layer].len(), self.layers[layer + 1].len());
        if from_len == 0 || to_len == 0 {
            return;
        }
        let source = NodeRef {
            layer,
            index: self.rng.next_usize(from_len),
        };
        let target = NodeRef {
            layer: layer + 1,
            index: self.rng.next_usize(to_len),
        };
        self.signals.push(Signal {
            source,
            target,
            progress: 0.0,
        });
    }
}

impl ParticleField for NeuralField {
    fn init(&mut self, size: Size) {
        self.size = size;
        self.layers = layout(&self.params.layers, size);
        self.signals.clear();
        debug!(
            width = size.width,
            height = size.height,
            nodes = self.node_count(),
            connections = self.connection_count(),
            "neural field initialized"
        );
    }

    fn step(&mut self) {
        self.try_spawn();
        let speed = self.params.signal_speed;
        for s in &mut self.signals {
            s.progress += speed;
        }
        self.signals.retain(|s| s.progress < 1.0);
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let p = &self.params;

        for pair in self.layers.windows(2) {
            for &a in &pair[0] {
                for &b in &pair[1] {
                    surface.stroke_polyline(&[a, b], p.connection_width, p.connection_color);
                }
            }
        }

        let glow_radius = p.node_radius * GLOW_SCALE;
        let glow_edge = p.glow_color.with_alpha(0.0);
        for &node in self.layers.iter().flatten() {
            surface.fill_radial_gradient(node, glow_radius, p.glow_color, glow_edge);
            surface.fill_circle(node, p.node_radius, p.node_color, 0.0);
        }

        let signal_radius = p.node_radius * SIGNAL_SCALE;
        for s in &self.signals {
            if let Some(pos) = self.signal_position(s) {
                surface.fill_circle(pos, signal_radius, p.signal_color, p.signal_glow);
            }
        }
    }

    fn fade_color(&self) -> Rgba {
        self.params.fade
    }

    fn population(&self) -> usize {
        self.node_count() + self.signals.len()
    }

    fn params(&self) -> Value {
        json!({
            "layers": self.params.layers,
            "node_radius": self.params.node_radius,
            "node_color": self.params.node_color,
            "glow_color": self.params.glow_color,
            "connection_color": self.params.connection_color,
            "connection_width": self.params.connection_width,
            "signal_color": self.params.signal_color,
            "signal_glow": self.params.signal_glow,
            "signal_speed": self.params.signal_speed,
            "spawn_probability": self.params.spawn_probability,
            "max_signals": self.params.max_signals,
            "fade": self.params.fade,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "layers": {
                "type": "array",
                "items": "integer",
                "default": DEFAULT_LAYERS,
                "max_items": MAX_LAYERS,
                "min": 0,
                "max": MAX_LAYER_NODES,
                "description": "Node count per layer; every node connects to every node of the next layer"
            },
            "node_radius": {
                "type": "number",
                "default": DEFAULT_NODE_RADIUS,
                "min": 0.5,
                "max": 20.0,
                "description": "Solid core radius; the glow reaches three times as far"
            },
            "node_color": {
                "type": "color",
                "default": DEFAULT_NODE_COLOR,
                "description": "Node core fill"
            },
            "glow_color": {
                "type": "color",
                "default": DEFAULT_GLOW_COLOR,
                "description": "Node glow at the center, fading to transparent"
            },
            "connection_color": {
                "type": "color",
                "default": DEFAULT_CONNECTION_COLOR,
                "description": "Stroke color of the static inter-layer wires"
            },
            "connection_width": {
                "type": "number",
                "default": DEFAULT_CONNECTION_WIDTH,
                "min": 0.1,
                "max": 5.0,
                "description": "Wire stroke width in pixels"
            },
            "signal_color": {
                "type": "color",
                "default": DEFAULT_SIGNAL_COLOR,
                "description": "Signal fill and glow color"
            },
            "signal_glow": {
                "type": "number",
                "default": DEFAULT_SIGNAL_GLOW,
                "min": 0.0,
                "max": 30.0,
                "description": "Signal halo blur in pixels"
            },
            "signal_speed": {
                "type": "number",
                "default": DEFAULT_SIGNAL_SPEED,
                "min": 0.001,
                "max": 1.0,
                "description": "Progress per frame along a wire"
            },
            "spawn_probability": {
                "type": "number",
                "default": DEFAULT_SPAWN_PROBABILITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Per-frame chance of launching a new signal"
            },
            "max_signals": {
                "type": "integer",
                "default": DEFAULT_MAX_SIGNALS,
                "min": 0,
                "max": MAX_SIGNALS,
                "description": "Cap on concurrently travelling signals"
            },
            "fade": {
                "type": "color",
                "default": DEFAULT_FADE,
                "description": "Per-frame overpaint color"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{DrawCall, RecordingSurface};

    fn field(width: u32, height: u32, seed: u64) -> NeuralField {
        field_with(width, height, seed, NeuralParams::default())
    }

    fn field_with(width: u32, height: u32, seed: u64, params: NeuralParams) -> NeuralField {
        let mut f = NeuralField::new(seed, params);
        f.init(Size::new(width, height));
        f
    }

    /// Spawns every frame, four frames per crossing.
    fn busy(max_signals: usize) -> NeuralParams {
        NeuralParams {
            spawn_probability: 1.0,
            signal_speed: 0.25,
            max_signals,
            ..NeuralParams::default()
        }
    }

    fn quiet() -> NeuralParams {
        NeuralParams {
            spawn_probability: 0.0,
            ..NeuralParams::default()
        }
    }

    fn signal(from: (usize, usize), to: (usize, usize), progress: f64) -> Signal {
        Signal {
            source: NodeRef {
                layer: from.0,
                index: from.1,
            },
            target: NodeRef {
                layer: to.0,
                index: to.1,
            },
            progress,
        }
    }

    // ---- Layout ----

    #[test]
    fn layout_is_evenly_spaced() {
        let f = field(1000, 600, 1);
        let xs: Vec<f64> = f.layers().iter().map(|l| l[0].x).collect();
        assert_eq!(xs, vec![200.0, 400.0, 600.0, 800.0]);
        let ys: Vec<f64> = f.layers()[0].iter().map(|n| n.y).collect();
        assert_eq!(ys, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
        assert_eq!(f.layers()[1][0].y, 600.0 / 8.0);
    }

    #[test]
    fn layout_ignores_seed() {
        let a = field(1280, 720, 1);
        let b = field(1280, 720, 999);
        assert_eq!(a.layers(), b.layers());
    }

    #[test]
    fn default_layers_have_24_nodes_and_119_connections() {
        let f = field(800, 600, 1);
        assert_eq!(f.node_count(), 24);
        assert_eq!(f.connection_count(), 35 + 49 + 35);
        assert_eq!(f.population(), 24);
    }

    #[test]
    fn reinit_lays_out_for_new_size() {
        let mut f = field(1000, 600, 1);
        f.init(Size::new(2000, 300));
        assert_eq!(f.layers()[0][0], DVec2::new(400.0, 50.0));
        assert_eq!(f.node_count(), 24);
    }

    #[test]
    fn reinit_drops_signals() {
        let mut f = field_with(800, 600, 1, busy(10));
        for _ in 0..3 {
            f.step();
        }
        assert!(!f.signals().is_empty());
        f.init(Size::new(400, 300));
        assert!(f.signals().is_empty());
    }

    // ---- Signals ----

    #[test]
    fn signal_count_ramps_then_holds_at_crossing_time() {
        let mut f = field_with(800, 600, 3, busy(100));
        let counts: Vec<usize> = (0..8)
            .map(|_| {
                f.step();
                f.signals().len()
            })
            .collect();
        assert_eq!(counts, vec![1, 2, 3, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn signal_count_respects_cap() {
        let mut f = field_with(800, 600, 3, NeuralParams {
            signal_speed: 0.01,
            ..busy(5)
        });
        for _ in 0..50 {
            f.step();
            assert!(f.signals().len() <= 5);
        }
        assert_eq!(f.signals().len(), 5);
        for _ in 0..150 {
            f.step();
            assert!(f.signals().len() <= 5);
        }
    }

    #[test]
    fn zero_cap_never_spawns() {
        let mut f = field_with(800, 600, 3, busy(0));
        for _ in 0..20 {
            f.step();
        }
        assert!(f.signals().is_empty());
    }

    #[test]
    fn arrival_removes_signal_in_the_same_step() {
        let mut f = field_with(800, 600, 1, NeuralParams {
            signal_speed: 0.25,
            ..quiet()
        });
        f.signals = vec![
            signal((0, 0), (1, 0), 0.0),
            signal((1, 2), (2, 3), 0.5),
            signal((2, 6), (3, 4), 0.75),
        ];
        f.step();
        let progress: Vec<f64> = f.signals().iter().map(Signal::progress).collect();
        assert_eq!(progress, vec![0.25, 0.75]);
    }

    #[test]
    fn progress_strictly_increases_until_removal() {
        let mut f = field_with(800, 600, 1, quiet());
        f.signals = vec![signal((0, 1), (1, 1), 0.0)];
        let mut last = 0.0;
        let mut frames = 0;
        while !f.signals().is_empty() {
            f.step();
            frames += 1;
            if let Some(s) = f.signals().first() {
                assert!(s.progress() > last);
                assert!(s.progress() < 1.0);
                last = s.progress();
            }
            assert!(frames <= 41, "signal never arrived");
        }
        assert!(frames >= 40);
    }

    #[test]
    fn signals_run_between_adjacent_layers() {
        let mut f = field_with(800, 600, 17, busy(100));
        for _ in 0..50 {
            f.step();
            for s in f.signals() {
                assert_eq!(s.target().layer, s.source().layer + 1);
                assert!(f.node(s.source()).is_some());
                assert!(f.node(s.target()).is_some());
                assert!(s.progress() > 0.0 && s.progress() < 1.0);
            }
        }
    }

    #[test]
    fn single_layer_never_spawns() {
        let mut f = field_with(800, 600, 1, NeuralParams {
            layers: vec![6],
            ..busy(10)
        });
        for _ in 0..10 {
            f.step();
        }
        assert!(f.signals().is_empty());
        assert_eq!(f.connection_count(), 0);
    }

    #[test]
    fn empty_layer_is_tolerated() {
        let mut f = field_with(800, 600, 1, NeuralParams {
            layers: vec![0, 0],
            ..busy(10)
        });
        for _ in 0..10 {
            f.step();
        }
        assert!(f.signals().is_empty());
        let mut s = RecordingSurface::new(f.size);
        f.draw(&mut s);
        assert!(s.calls().is_empty());
    }

    // ---- Drawing ----

    #[test]
    fn draw_issues_connections_glows_and_cores() {
        let f = field(800, 600, 1);
        let mut s = RecordingSurface::new(Size::new(800, 600));
        f.draw(&mut s);
        assert_eq!(s.stroke_count(), 119);
        assert_eq!(s.gradient_count(), 24);
        assert_eq!(s.circle_count(), 24);
    }

    #[test]
    fn glow_is_drawn_before_its_core() {
        let f = field(800, 600, 1);
        let mut s = RecordingSurface::new(Size::new(800, 600));
        f.draw(&mut s);
        let after_wires = &s.calls()[119..];
        for pair in after_wires.chunks(2) {
            match (&pair[0], &pair[1]) {
                (
                    DrawCall::FillRadialGradient {
                        center: g,
                        radius,
                        inner,
                        outer,
                    },
                    DrawCall::FillCircle {
                        center: c,
                        radius: core,
                        ..
                    },
                ) => {
                    assert_eq!(g, c);
                    assert_eq!(*radius, 9.0);
                    assert_eq!(*core, 3.0);
                    assert_eq!(*inner, DEFAULT_GLOW_COLOR);
                    assert_eq!(outer.a, 0.0);
                }
                other => panic!("unexpected node draw pair {other:?}"),
            }
        }
    }

    #[test]
    fn signal_drawn_at_interpolated_position() {
        let mut f = field_with(1000, 600, 1, quiet());
        f.signals = vec![signal((0, 0), (1, 0), 0.5)];
        let mut s = RecordingSurface::new(Size::new(1000, 600));
        f.draw(&mut s);
        let from = f.layers()[0][0];
        let to = f.layers()[1][0];
        match s.calls().last().unwrap() {
            DrawCall::FillCircle {
                center,
                radius,
                color,
                glow_blur,
            } => {
                assert!((*center - (from + to) / 2.0).length() < 1e-9);
                assert!((*radius - 2.0).abs() < 1e-12);
                assert_eq!(*color, Rgba::rgb(255, 255, 255));
                assert_eq!(*glow_blur, 5.0);
            }
            other => panic!("expected signal circle, got {other:?}"),
        }
    }

    // ---- Determinism ----

    #[test]
    fn same_seed_same_signals() {
        let mut a = field(800, 600, 2024);
        let mut b = field(800, 600, 2024);
        let mut spawned = false;
        for _ in 0..500 {
            a.step();
            b.step();
            assert_eq!(a.signals(), b.signals());
            spawned |= !a.signals().is_empty();
        }
        assert!(spawned);
    }

    // ---- Params ----

    #[test]
    fn from_json_uses_defaults_for_empty_object() {
        assert_eq!(NeuralParams::from_json(&json!({})), NeuralParams::default());
    }

    #[test]
    fn from_json_reads_overrides() {
        let p = NeuralParams::from_json(&json!({
            "layers": [3, 4],
            "max_signals": 12,
            "signal_speed": 0.1,
            "node_color": "rgba(255, 0, 0, 0.5)",
        }));
        assert_eq!(p.layers, vec![3, 4]);
        assert_eq!(p.max_signals, 12);
        assert_eq!(p.signal_speed, 0.1);
        assert_eq!(p.node_color, Rgba::new(255, 0, 0, 0.5));
    }

    #[test]
    fn oversized_layers_are_clamped_before_layout() {
        let p = NeuralParams::from_json(&json!({
            "layers": [1_000_000_000_u64, 3, u64::MAX],
            "max_signals": 1_000_000,
        }));
        assert_eq!(p.layers, vec![MAX_LAYER_NODES, 3, MAX_LAYER_NODES]);
        assert_eq!(p.max_signals, MAX_SIGNALS);
        let f = field_with(800, 600, 1, p);
        assert_eq!(f.population(), 2 * MAX_LAYER_NODES + 3);
    }

    #[test]
    fn extra_layers_are_dropped() {
        let layers = vec![2; 40];
        let p = NeuralParams::from_json(&json!({ "layers": layers }));
        assert_eq!(p.layers, vec![2; MAX_LAYERS]);
    }

    #[test]
    fn non_positive_speed_falls_back_to_default() {
        let p = NeuralParams::from_json(&json!({"signal_speed": 0}));
        assert_eq!(p.signal_speed, DEFAULT_SIGNAL_SPEED);
    }

    #[test]
    fn params_round_trip_through_json() {
        let f = field(10, 10, 1);
        assert_eq!(NeuralParams::from_json(&f.params()), NeuralParams::default());
    }

    #[test]
    fn param_schema_covers_every_param() {
        let f = field(10, 10, 1);
        let schema = f.param_schema();
        for key in f.params().as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
            assert!(schema[key].get("default").is_some(), "{key} missing default");
        }
    }

    #[test]
    fn fade_is_heavier_than_circuit() {
        assert_eq!(field(10, 10, 1).fade_color(), Rgba::new(2, 16, 39, 0.15));
    }

    // ---- Property-based tests ----

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cap_and_progress_invariants(
                seed: u64,
                spawn in 0.0_f64..=1.0,
                speed in 0.005_f64..0.5,
                cap in 0_usize..20,
                layers in proptest::collection::vec(0_usize..8, 0..6),
            ) {
                let params = NeuralParams {
                    layers,
                    spawn_probability: spawn,
                    signal_speed: speed,
                    max_signals: cap,
                    ..NeuralParams::default()
                };
                let mut f = field_with(640, 480, seed, params);
                for _ in 0..120 {
                    f.step();
                    prop_assert!(f.signals().len() <= cap);
                    for s in f.signals() {
                        prop_assert!(s.progress() < 1.0);
                        prop_assert_eq!(s.target().layer, s.source().layer + 1);
                    }
                }
            }

            #[test]
            fn layout_stays_inside_surface(
                w in 1_u32..4000,
                h in 1_u32..4000,
                layers in proptest::collection::vec(0_usize..12, 0..8),
            ) {
                let size = Size::new(w, h);
                for node in layout(&layers, size).iter().flatten() {
                    prop_assert!(node.x > 0.0 && node.x < w as f64);
                    prop_assert!(node.y > 0.0 && node.y < h as f64);
                }
            }
        }
    }
}
