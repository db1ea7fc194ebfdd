//! Convolution reverb with a synthetic noise tail
//!
//! The impulse response is white Gaussian noise under an exponential decay,
//! softened by a 6 kHz low-pass. Its length grows with the amount:
//! 1.5 s at amount 0 up to 3.0 s at amount 1. The wet signal is the input
//! convolved with that tail, truncated to the input length.

use crate::dsp::{convolve_truncated, peak_normalize, DspResult, FilterSpec, NoiseSource};
use crate::effect::{Effect, EffectInfo};
use crate::types::{Sample, PEAK_CEILING};

/// Smoothing applied to the raw noise tail
const TAIL_SMOOTHING: FilterSpec = FilterSpec::low_pass(6000.0, 2);

const MIN_TAIL_SECS: f64 = 1.5;
const TAIL_SECS_PER_AMOUNT: f64 = 1.5;

/// Exponential decay rate over the normalized tail time axis
const DECAY_RATE: f64 = 3.5;

const MIN_WET_MIX: f32 = 0.2;
const WET_MIX_PER_AMOUNT: f32 = 0.6;

/// Number of impulse response samples for `amount`
pub fn tail_len(sample_rate: u32, amount: f32) -> usize {
    let secs = MIN_TAIL_SECS + TAIL_SECS_PER_AMOUNT * amount as f64;
    (secs * sample_rate as f64).max(0.0) as usize
}

/// Build the decaying noise impulse response
fn build_tail(len: usize, sample_rate: u32, noise: &mut NoiseSource) -> DspResult<Vec<f64>> {
    let smoothing = TAIL_SMOOTHING.design(sample_rate)?;

    let mut tail = vec![0.0; len];
    noise.fill_gaussian(&mut tail);

    // Time axis runs 0..=1 across the tail regardless of its length
    let span = len.saturating_sub(1).max(1) as f64;
    for (k, x) in tail.iter_mut().enumerate() {
        *x *= (-DECAY_RATE * k as f64 / span).exp();
    }

    smoothing.apply_f64(&mut tail);
    Ok(tail)
}

/// Add reverb to a buffer, drawing the tail from `noise`
///
/// Wet mix rises from 0.2 to 0.8 with `amount`; output peak is 0.98.
pub fn reverb(
    input: &[Sample],
    sample_rate: u32,
    amount: f32,
    noise: &mut NoiseSource,
) -> DspResult<Vec<Sample>> {
    if amount <= 0.0 {
        return Ok(input.to_vec());
    }

    let len = tail_len(sample_rate, amount);
    if len == 0 {
        return Ok(input.to_vec());
    }

    let tail = build_tail(len, sample_rate, noise)?;
    let mut wet = convolve_truncated(input, &tail)?;
    peak_normalize(&mut wet, 1.0);

    let wet_mix = MIN_WET_MIX + WET_MIX_PER_AMOUNT * amount;
    let dry_mix = 1.0 - wet_mix;
    let mut out: Vec<Sample> = input
        .iter()
        .zip(&wet)
        .map(|(&dry, &w)| dry_mix * dry + wet_mix * w)
        .collect();
    peak_normalize(&mut out, PEAK_CEILING);
    Ok(out)
}

/// Reverb as a section effect, owning its noise source
pub struct ReverbEffect {
    info: EffectInfo,
    noise: NoiseSource,
}

impl ReverbEffect {
    /// Create a reverb whose tails come from `noise`
    pub fn new(noise: NoiseSource) -> Self {
        Self {
            info: EffectInfo::new("Reverb", "Reverb", PEAK_CEILING).with_filter(TAIL_SMOOTHING),
            noise,
        }
    }

    /// Create a reverb with reproducible tails
    pub fn seeded(seed: u64) -> Self {
        Self::new(NoiseSource::seeded(seed))
    }
}

impl Default for ReverbEffect {
    fn default() -> Self {
        Self::new(NoiseSource::from_entropy())
    }
}

impl Effect for ReverbEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn process(&mut self, input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>> {
        reverb(input, sample_rate, amount, &mut self.noise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::DspError;
    use crate::types::peak;

    const SR: u32 = 16000;

    fn click_train(len: usize) -> Vec<Sample> {
        let mut input = vec![0.0; len];
        for i in (0..len).step_by(4000) {
            input[i] = 0.8;
        }
        input
    }

    #[test]
    fn test_tail_length() {
        assert_eq!(tail_len(44100, 0.0), 66150);
        assert_eq!(tail_len(44100, 1.0), 132300);
        assert_eq!(tail_len(16000, 0.5), 36000);
    }

    #[test]
    fn test_zero_amount_is_identity() {
        let input = click_train(8000);
        let mut noise = NoiseSource::seeded(1);
        assert_eq!(reverb(&input, SR, 0.0, &mut noise).unwrap(), input);
    }

    #[test]
    fn test_length_and_ceiling() {
        let input = click_train(16000);
        let mut noise = NoiseSource::seeded(1);
        let out = reverb(&input, SR, 0.6, &mut noise).unwrap();
        assert_eq!(out.len(), input.len());
        assert!(peak(&out) <= PEAK_CEILING + 1e-6);
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_tail_fills_silence() {
        // A single click must ring on into the following silence
        let mut input = vec![0.0; 16000];
        input[0] = 1.0;
        let mut noise = NoiseSource::seeded(3);
        let out = reverb(&input, SR, 0.5, &mut noise).unwrap();
        assert!(peak(&out[1000..4000]) > 0.01);
    }

    #[test]
    fn test_seeded_reverb_is_deterministic() {
        let input = click_train(12000);
        let mut a = ReverbEffect::seeded(99);
        let mut b = ReverbEffect::seeded(99);
        assert_eq!(
            a.process(&input, SR, 0.4).unwrap(),
            b.process(&input, SR, 0.4).unwrap()
        );
    }

    #[test]
    fn test_smoothing_needs_nyquist_above_6k() {
        let input = click_train(4000);
        let mut noise = NoiseSource::seeded(1);
        assert!(matches!(
            reverb(&input, 11025, 0.3, &mut noise),
            Err(DspError::CutoffAboveNyquist { .. })
        ));
    }
}
