//! Seeded sampling helpers over `rand::rngs::StdRng`

use ember_core::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct ParticleRng {
    rng: StdRng,
}

impl ParticleRng {
    /// Deterministic generator for a given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Returns a float in [min, max), or `min` when the range is empty
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Returns a float in [-span/2, span/2)
    pub fn centered(&mut self, span: f32) -> f32 {
        let half = span * 0.5;
        self.range(-half, half)
    }

    /// Uniform random color, each channel in [0, 1)
    pub fn color(&mut self) -> Color {
        Color::new(self.next_f32(), self.next_f32(), self.next_f32())
    }
}
