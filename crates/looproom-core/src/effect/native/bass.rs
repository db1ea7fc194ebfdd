//! Bass boost - low-shelf approximation around 120 Hz

use crate::dsp::{db_to_gain, peak_normalize, DspResult, FilterSpec};
use crate::effect::{Effect, EffectInfo};
use crate::types::{Sample, PEAK_CEILING};

/// Low band that gets boosted
const LOW_BAND: FilterSpec = FilterSpec::low_pass(120.0, 4);

/// Input attenuation before boosting (~ -1 dB)
const HEADROOM: Sample = 0.9;

/// Boost at full amount
const MAX_BOOST_DB: f32 = 15.0;

/// Boost the lows of a buffer
///
/// The input is attenuated by [`HEADROOM`], low-passed at 120 Hz, and the low
/// band is added back with `(gain - 1)` where gain rises from 0 dB to 15 dB
/// as `amount` goes 0 to 1. Output peak is normalized to 0.98.
pub fn bass_boost(input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>> {
    if amount <= 0.0 {
        return Ok(input.to_vec());
    }

    let filter = LOW_BAND.design(sample_rate)?;

    let work: Vec<Sample> = input.iter().map(|&s| s * HEADROOM).collect();
    let low = filter.apply(&work);
    let shelf = db_to_gain(MAX_BOOST_DB * amount) - 1.0;

    let mut out: Vec<Sample> = work
        .iter()
        .zip(&low)
        .map(|(&dry, &lo)| dry + shelf * lo)
        .collect();
    peak_normalize(&mut out, PEAK_CEILING);
    Ok(out)
}

/// Bass boost as a section effect
pub struct BassBoostEffect {
    info: EffectInfo,
}

impl BassBoostEffect {
    /// Create a new bass boost effect
    pub fn new() -> Self {
        Self {
            info: EffectInfo::new("Bass Boost", "EQ", PEAK_CEILING).with_filter(LOW_BAND),
        }
    }
}

impl Default for BassBoostEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for BassBoostEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn process(&mut self, input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>> {
        bass_boost(input, sample_rate, amount)
    }
}
