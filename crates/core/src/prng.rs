//! Seedable Xorshift64 generator driving every random decision in a field.
//!
//! Particle spawns, turns, lifespans and signal routing all pull from one
//! generator owned by the field, so a fixed seed replays the exact same
//! animation frame for frame.

use serde::{Deserialize, Serialize};

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A seed of 0 is a fixed point of the algorithm and is swapped for a
/// non-zero constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const ZERO_SEED_REPLACEMENT: u64 = 0x0B5E_55ED_C1AC_0001;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 {
                Self::ZERO_SEED_REPLACEMENT
            } else {
                seed
            },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1) built from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max). Returns `min` when the range is empty.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform f64 in [-span / 2, span / 2), centered on zero.
    pub fn next_centered(&mut self, span: f64) -> f64 {
        (self.next_f64() - 0.5) * span
    }

    /// Like [`next_centered`](Self::next_centered) but never returns exactly
    /// zero. Redraws until a non-zero value comes up.
    pub fn next_centered_nonzero(&mut self, span: f64) -> f64 {
        loop {
            let v = self.next_centered(span);
            if v != 0.0 || span == 0.0 {
                return v;
            }
        }
    }

    /// Returns `true` with probability `p` (clamped to [0, 1]).
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform usize in [0, max), or 0 when `max` is 0.
    pub fn next_usize(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_42_first_value_is_stable() {
        // Changing this value invalidates every recorded scene.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn equal_seeds_replay_equal_sequences() {
        let mut a = Xorshift64::new(2024);
        let mut b = Xorshift64::new(2024);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at draw {i}");
        }
    }

    #[test]
    fn centered_values_straddle_zero() {
        let mut rng = Xorshift64::new(5);
        let samples: Vec<f64> = (0..1000).map(|_| rng.next_centered(0.7)).collect();
        assert!(samples.iter().all(|v| (-0.35..0.35).contains(v)));
        assert!(samples.iter().any(|&v| v < 0.0));
        assert!(samples.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn chance_extremes() {
        let mut rng = Xorshift64::new(77);
        assert!((0..500).all(|_| !rng.chance(0.0)));
        assert!((0..500).all(|_| rng.chance(1.0)));
    }

    #[test]
    fn next_usize_of_zero_is_zero() {
        let mut rng = Xorshift64::new(3);
        assert_eq!(rng.next_usize(0), 0);
    }

    #[test]
    fn state_survives_serialization() {
        let mut rng = Xorshift64::new(42);
        for _ in 0..17 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: Xorshift64 = serde_json::from_str(&json).unwrap();
        for _ in 0..50 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "{v} out of [0, 1)");
                }
            }

            #[test]
            fn next_range_in_bounds(
                seed: u64,
                min in -1e4_f64..1e4,
                len in 1e-3_f64..1e4,
            ) {
                let max = min + len;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "{v} outside [{min}, {max})");
                }
            }

            #[test]
            fn nonzero_centered_is_never_zero(seed: u64, span in 1e-3_f64..10.0) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_centered_nonzero(span);
                    prop_assert!(v != 0.0);
                    prop_assert!(v.abs() <= span / 2.0);
                }
            }

            #[test]
            fn next_usize_below_max(seed: u64, max in 1_usize..10_000) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    prop_assert!(rng.next_usize(max) < max);
                }
            }
        }
    }
}
