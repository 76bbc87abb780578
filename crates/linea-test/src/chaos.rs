//! Chaos delivery
//!
//! Applies the transport's misbehavior to a scripted feed: duplicate
//! delivery, adjacent reordering, and loss. Seeded, so a failing case
//! replays exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chaos parameters, all probabilities in `[0, 1]`
#[derive(Clone, Copy, Debug)]
pub struct ChaosConfig {
    pub duplicate_rate: f64,
    pub swap_rate: f64,
    pub drop_rate: f64,
    pub seed: u64,
}

impl Default for ChaosConfig {
    fn default() -> Self {
        ChaosConfig {
            duplicate_rate: 0.1,
            swap_rate: 0.1,
            drop_rate: 0.0,
            seed: 42,
        }
    }
}

/// Applies duplication, reordering, and loss to a frame sequence
pub struct ChaosDelivery {
    config: ChaosConfig,
    rng: StdRng,
}

impl ChaosDelivery {
    pub fn new(config: ChaosConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        ChaosDelivery { config, rng }
    }

    /// Mangle a frame sequence
    pub fn deliver(&mut self, frames: Vec<String>) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(frames.len() * 2);

        for frame in frames {
            if self.rng.gen_bool(self.config.drop_rate) {
                continue;
            }
            let duplicate = self.rng.gen_bool(self.config.duplicate_rate);
            out.push(frame.clone());
            if duplicate {
                out.push(frame);
            }
        }

        // Swap adjacent frames to simulate reordering
        let mut i = 1;
        while i < out.len() {
            if self.rng.gen_bool(self.config.swap_rate) {
                out.swap(i - 1, i);
            }
            i += 1;
        }

        out
    }
}
