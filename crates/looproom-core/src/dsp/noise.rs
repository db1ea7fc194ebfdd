//! Seedable Gaussian noise source
//!
//! The reverb tail is built from white noise. The generator is owned by the
//! caller: seed it for reproducible renders, or draw the seed from the OS
//! when every render should sound slightly different.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Standard-normal noise generator (Box-Muller over ChaCha8)
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: ChaCha8Rng,
    /// Second value of the last Box-Muller pair
    spare: Option<f64>,
}

impl NoiseSource {
    /// Deterministic source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            spare: None,
        }
    }

    /// Source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            spare: None,
        }
    }

    /// Seeded if `seed` is set, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }

    /// Draw one N(0, 1) sample
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(spare) = self.spare.take() {
            return spare;
        }
        // 1 - u keeps the log argument in (0, 1]
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = self.rng.gen::<f64>();
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = std::f64::consts::TAU * u2;
        self.spare = Some(radius * angle.sin());
        radius * angle.cos()
    }

    /// Fill a buffer with N(0, 1) samples
    pub fn fill_gaussian(&mut self, buffer: &mut [f64]) {
        for x in buffer.iter_mut() {
            *x = self.next_gaussian();
        }
    }
}

impl Default for NoiseSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
