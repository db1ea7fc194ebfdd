//! High boost - adds a high-passed copy of the signal back onto itself

use crate::dsp::{peak_normalize, DspResult, FilterSpec};
use crate::effect::{Effect, EffectInfo};
use crate::types::{Sample, BLEND_PEAK_CEILING};

const HIGH_BAND: FilterSpec = FilterSpec::high_pass(2000.0, 4);

/// Brighten a buffer: `x + amount * highpass(x)`, normalized to 0.95
pub fn high_boost(input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>> {
    if amount <= 0.0 {
        return Ok(input.to_vec());
    }

    let high = HIGH_BAND.design(sample_rate)?.apply(input);
    let mut out: Vec<Sample> = input
        .iter()
        .zip(&high)
        .map(|(&dry, &hi)| dry + amount * hi)
        .collect();
    peak_normalize(&mut out, BLEND_PEAK_CEILING);
    Ok(out)
}

/// High boost as a section effect
pub struct HighBoostEffect {
    info: EffectInfo,
}

impl HighBoostEffect {
    pub fn new() -> Self {
        Self {
            info: EffectInfo::new("High Boost", "EQ", BLEND_PEAK_CEILING).with_filter(HIGH_BAND),
        }
    }
}

impl Default for HighBoostEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for HighBoostEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn process(&mut self, input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>> {
        high_boost(input, sample_rate, amount)
    }
}
