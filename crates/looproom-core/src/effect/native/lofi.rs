//! Lo-fi - crossfade toward a 2.5 kHz low-passed copy

use crate::dsp::{peak_normalize, DspResult, FilterSpec};
use crate::effect::{Effect, EffectInfo};
use crate::types::{Sample, BLEND_PEAK_CEILING};

const DULL_BAND: FilterSpec = FilterSpec::low_pass(2500.0, 4);

/// Blend `(1 - amount) * x + amount * lowpass(x)`, normalized to 0.95
pub fn lofi(input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>> {
    if amount <= 0.0 {
        return Ok(input.to_vec());
    }

    let dull = DULL_BAND.design(sample_rate)?.apply(input);
    let dry_mix = 1.0 - amount;
    let mut out: Vec<Sample> = input
        .iter()
        .zip(&dull)
        .map(|(&dry, &wet)| dry_mix * dry + amount * wet)
        .collect();
    peak_normalize(&mut out, BLEND_PEAK_CEILING);
    Ok(out)
}

/// Lo-fi blend as a section effect
pub struct LofiEffect {
    info: EffectInfo,
}

impl LofiEffect {
    pub fn new() -> Self {
        Self {
            info: EffectInfo::new("Lo-Fi", "Filter", BLEND_PEAK_CEILING).with_filter(DULL_BAND),
        }
    }
}

impl Default for LofiEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for LofiEffect {
    fn info(&self) -> &EffectInfo {
        &self.info
    }

    fn process(&mut self, input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>> {
        lofi(input, sample_rate, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::peak;
    use std::f32::consts::TAU;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<Sample> {
        (0..len)
            .map(|i| (TAU * freq * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_zero_amount_is_identity() {
        let input = sine(440.0, 44100, 512);
        assert_eq!(lofi(&input, 44100, 0.0).unwrap(), input);
    }

    #[test]
    fn test_full_amount_removes_highs() {
        let sr = 44100;
        let mut input = sine(200.0, sr, 22050);
        input.extend(sine(12000.0, sr, 22050));

        let out = lofi(&input, sr, 1.0).unwrap();
        assert_eq!(out.len(), input.len());
        assert!(peak(&out) <= BLEND_PEAK_CEILING + 1e-6);

        let low_peak = peak(&out[11025..22050]);
        let high_peak = peak(&out[33075..]);
        assert!(high_peak < low_peak * 0.05, "low {low_peak}, high {high_peak}");
    }

    #[test]
    fn test_partial_amount_keeps_some_highs() {
        let sr = 44100;
        let input = sine(12000.0, sr, 22050);
        let out = lofi(&input, sr, 0.5).unwrap();
        // Normalization lifts the half-level dry part back up
        assert!(peak(&out[11025..]) > 0.9);
    }
}
