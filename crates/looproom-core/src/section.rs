//! Sections - per-section parameters, boundary clamping, splitting, and the
//! fixed effect chain each section runs through

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::dsp::{DspResult, NoiseSource};
use crate::effect::{BassBoostEffect, Effect, HighBoostEffect, LofiEffect, ReverbEffect};
use crate::types::{Sample, Section, Waveform, NUM_SECTIONS};

/// Effect intensities for one section, each in 0.0-1.0
///
/// Values are applied as given; use [`SectionParams::clamped`] to force them
/// into range. Fields missing from a parameter file default to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionParams {
    pub bass: f32,
    pub high: f32,
    pub reverb: f32,
    pub lofi: f32,
}

impl SectionParams {
    pub const fn new(bass: f32, high: f32, reverb: f32, lofi: f32) -> Self {
        Self {
            bass,
            high,
            reverb,
            lofi,
        }
    }

    pub const INTRO_DEFAULT: Self = Self::new(0.2, 0.2, 0.2, 0.0);
    pub const DROP_DEFAULT: Self = Self::new(0.7, 0.4, 0.3, 0.1);
    pub const OUTRO_DEFAULT: Self = Self::new(0.35, 0.2, 0.4, 0.4);

    /// Default intensities for a section
    pub fn default_for(section: Section) -> Self {
        match section {
            Section::Intro => Self::INTRO_DEFAULT,
            Section::Drop => Self::DROP_DEFAULT,
            Section::Outro => Self::OUTRO_DEFAULT,
        }
    }

    /// Copy with every intensity clamped to 0.0-1.0 (NaN becomes 0.0)
    pub fn clamped(&self) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self::new(
            clamp(self.bass),
            clamp(self.high),
            clamp(self.reverb),
            clamp(self.lofi),
        )
    }

    /// True if no effect in the chain would run
    pub fn is_bypass(&self) -> bool {
        self.chain_amounts().iter().all(|&a| a <= 0.0)
    }

    /// Intensities in chain order: reverb, bass, high, lo-fi
    pub fn chain_amounts(&self) -> [f32; 4] {
        [self.reverb, self.bass, self.high, self.lofi]
    }
}

/// Parameters for all three sections
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionSet {
    pub intro: SectionParams,
    pub drop: SectionParams,
    pub outro: SectionParams,
}

impl Default for SectionSet {
    fn default() -> Self {
        Self {
            intro: SectionParams::INTRO_DEFAULT,
            drop: SectionParams::DROP_DEFAULT,
            outro: SectionParams::OUTRO_DEFAULT,
        }
    }
}

impl SectionSet {
    pub fn get(&self, section: Section) -> &SectionParams {
        match section {
            Section::Intro => &self.intro,
            Section::Drop => &self.drop,
            Section::Outro => &self.outro,
        }
    }

    pub fn get_mut(&mut self, section: Section) -> &mut SectionParams {
        match section {
            Section::Intro => &mut self.intro,
            Section::Drop => &mut self.drop,
            Section::Outro => &mut self.outro,
        }
    }
}

/// Clamp section boundary times so `0 <= t1 <= t2 <= duration`
pub fn clamp_section_times(t1: f64, t2: f64, duration: f64) -> (f64, f64) {
    let duration = duration.max(0.0);
    let t1 = if t1.is_nan() { 0.0 } else { t1.clamp(0.0, duration) };
    let t2 = if t2.is_nan() { t1 } else { t2.min(duration).max(t1) };
    (t1, t2)
}

/// Clamped section boundaries of one waveform, in seconds and samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub t1: f64,
    pub t2: f64,
    /// First sample of the drop
    pub i1: usize,
    /// First sample of the outro
    pub i2: usize,
    /// Total sample count
    pub len: usize,
}

impl SectionBounds {
    /// Derive bounds for `waveform` from requested boundary times
    pub fn new(waveform: &Waveform, t1: f64, t2: f64) -> Self {
        let (t1, t2) = clamp_section_times(t1, t2, waveform.duration_secs());
        let len = waveform.len();
        let i1 = waveform.index_at(t1).min(len);
        let i2 = waveform.index_at(t2).clamp(i1, len);
        Self { t1, t2, i1, i2, len }
    }

    /// Sample range of a section
    pub fn range(&self, section: Section) -> Range<usize> {
        match section {
            Section::Intro => 0..self.i1,
            Section::Drop => self.i1..self.i2,
            Section::Outro => self.i2..self.len,
        }
    }
}

/// Split a waveform into intro, drop, and outro
///
/// The three parts always cover the waveform exactly; any may be empty.
pub fn split_sections(waveform: &Waveform, bounds: &SectionBounds) -> [Waveform; NUM_SECTIONS] {
    Section::ALL.map(|section| waveform.slice(bounds.range(section)))
}

/// Runs one section through reverb, bass boost, high boost, and lo-fi
///
/// Holds the only state shared between sections: the reverb's noise source.
pub struct SectionProcessor {
    chain: [Box<dyn Effect>; 4],
}

impl SectionProcessor {
    /// Create a processor whose reverb draws from `noise`
    pub fn new(noise: NoiseSource) -> Self {
        Self {
            chain: [
                Box::new(ReverbEffect::new(noise)),
                Box::new(BassBoostEffect::new()),
                Box::new(HighBoostEffect::new()),
                Box::new(LofiEffect::new()),
            ],
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(NoiseSource::seeded(seed))
    }

    /// Check the filters of every effect `sections` will run can be designed
    /// at `sample_rate`
    ///
    /// An effect whose amount is zero in all three sections never runs and is
    /// not checked.
    pub fn validate(&self, sample_rate: u32, sections: &SectionSet) -> DspResult<()> {
        let amounts = Section::ALL.map(|section| sections.get(section).chain_amounts());
        self.chain
            .iter()
            .enumerate()
            .filter(|(slot, _)| amounts.iter().any(|a| a[*slot] > 0.0))
            .try_for_each(|(_, effect)| effect.validate(sample_rate))
    }

    /// Effect names in chain order
    pub fn effect_names(&self) -> Vec<&str> {
        self.chain.iter().map(|e| e.info().name.as_str()).collect()
    }

    /// Run the chain over one section's samples
    ///
    /// Empty input returns empty output without touching any effect.
    pub fn process(
        &mut self,
        input: &[Sample],
        sample_rate: u32,
        params: &SectionParams,
    ) -> DspResult<Vec<Sample>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mut samples = input.to_vec();
        for (effect, amount) in self.chain.iter_mut().zip(params.chain_amounts()) {
            if amount <= 0.0 {
                continue;
            }
            log::debug!(
                "{}: amount {:.2} over {} samples",
                effect.info().name,
                amount,
                samples.len()
            );
            samples = effect.process(&samples, sample_rate, amount)?;
        }
        Ok(samples)
    }

    /// Run the chain over a section waveform, keeping its sample rate
    pub fn process_waveform(&mut self, section: &Waveform, params: &SectionParams) -> DspResult<Waveform> {
        let samples = self.process(section.samples(), section.sample_rate(), params)?;
        Ok(section.with_samples(samples))
    }
}

impl Default for SectionProcessor {
    fn default() -> Self {
        Self::new(NoiseSource::from_entropy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{peak, PEAK_CEILING};

    fn noise_wave(len: usize, sample_rate: u32) -> Waveform {
        let mut noise = NoiseSource::seeded(11);
        let samples = (0..len).map(|_| (noise.next_gaussian() * 0.2) as Sample).collect();
        Waveform::new(samples, sample_rate)
    }

    #[test]
    fn test_default_params() {
        let set = SectionSet::default();
        assert_eq!(*set.get(Section::Intro), SectionParams::new(0.2, 0.2, 0.2, 0.0));
        assert_eq!(*set.get(Section::Drop), SectionParams::new(0.7, 0.4, 0.3, 0.1));
        assert_eq!(*set.get(Section::Outro), SectionParams::new(0.35, 0.2, 0.4, 0.4));
        assert_eq!(SectionParams::default_for(Section::Drop), set.drop);
    }

    #[test]
    fn test_clamped() {
        let p = SectionParams::new(1.5, -0.2, f32::NAN, 0.5).clamped();
        assert_eq!(p, SectionParams::new(1.0, 0.0, 0.0, 0.5));
        assert!(SectionParams::default().is_bypass());
        assert!(!SectionParams::INTRO_DEFAULT.is_bypass());
    }

    #[test]
    fn test_clamp_section_times() {
        assert_eq!(clamp_section_times(30.0, 60.0, 90.0), (30.0, 60.0));
        assert_eq!(clamp_section_times(100.0, 120.0, 90.0), (90.0, 90.0));
        assert_eq!(clamp_section_times(50.0, 20.0, 90.0), (50.0, 50.0));
        assert_eq!(clamp_section_times(-5.0, 10.0, 90.0), (0.0, 10.0));
        assert_eq!(clamp_section_times(30.0, 60.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn test_sections_cover_waveform() {
        let wave = Waveform::silence(9000, 100);
        for (t1, t2) in [(30.0, 60.0), (0.0, 0.0), (95.0, 10.0), (-1.0, 200.0), (45.5, 45.5)] {
            let bounds = SectionBounds::new(&wave, t1, t2);
            assert!(0.0 <= bounds.t1 && bounds.t1 <= bounds.t2 && bounds.t2 <= 90.0);

            let parts = split_sections(&wave, &bounds);
            let total: usize = parts.iter().map(Waveform::len).sum();
            assert_eq!(total, wave.len(), "t1 {t1}, t2 {t2}");
        }
    }

    #[test]
    fn test_split_at_truncated_indices() {
        let wave = Waveform::silence(9000, 100);
        let bounds = SectionBounds::new(&wave, 30.0, 60.0);
        assert_eq!((bounds.i1, bounds.i2), (3000, 6000));

        let [intro, drop, outro] = split_sections(&wave, &bounds);
        assert_eq!((intro.len(), drop.len(), outro.len()), (3000, 3000, 3000));
    }

    #[test]
    fn test_empty_section_passes_through() {
        let mut processor = SectionProcessor::seeded(1);
        let full = SectionParams::new(1.0, 1.0, 1.0, 1.0);
        assert!(processor.process(&[], 44100, &full).unwrap().is_empty());
        // Even at a rate no filter can be designed for
        assert!(processor.process(&[], 8000, &full).unwrap().is_empty());
    }

    #[test]
    fn test_bypass_is_identity() {
        let wave = noise_wave(4000, 16000);
        let mut processor = SectionProcessor::seeded(1);
        let out = processor.process_waveform(&wave, &SectionParams::default()).unwrap();
        assert_eq!(out, wave);
    }

    #[test]
    fn test_chain_preserves_length_and_bounds() {
        let wave = noise_wave(16000, 16000);
        let mut processor = SectionProcessor::seeded(5);
        let out = processor
            .process_waveform(&wave, &SectionParams::DROP_DEFAULT)
            .unwrap();
        assert_eq!(out.len(), wave.len());
        assert_eq!(out.sample_rate(), 16000);
        // Lo-fi runs last, so its ceiling applies
        assert!(peak(out.samples()) <= PEAK_CEILING);
    }

    #[test]
    fn test_chain_order_and_validation() {
        let processor = SectionProcessor::seeded(1);
        assert_eq!(
            processor.effect_names(),
            vec!["Reverb", "Bass Boost", "High Boost", "Lo-Fi"]
        );
        let sections = SectionSet::default();
        assert!(processor.validate(44100, &sections).is_ok());
        assert!(processor.validate(16000, &sections).is_ok());
        assert!(processor.validate(11025, &sections).is_err());
    }

    #[test]
    fn test_validation_skips_unused_effects() {
        let processor = SectionProcessor::seeded(1);
        let mut sections = SectionSet::default();
        for section in Section::ALL {
            sections.get_mut(section).reverb = 0.0;
        }
        // Only the reverb tail filter needs more than 12 kHz
        assert!(processor.validate(8000, &sections).is_ok());
        assert!(processor.validate(11025, &sections).is_ok());

        sections.outro.reverb = 0.1;
        assert!(processor.validate(8000, &sections).is_err());

        // Lo-fi at 2.5 kHz still fails below 5 kHz
        let lofi_only = SectionSet {
            intro: SectionParams::default(),
            drop: SectionParams::default(),
            outro: SectionParams::new(0.0, 0.0, 0.0, 0.5),
        };
        assert!(processor.validate(4000, &lofi_only).is_err());
        let silent = SectionSet {
            intro: SectionParams::default(),
            drop: SectionParams::default(),
            outro: SectionParams::default(),
        };
        assert!(processor.validate(4000, &silent).is_ok());
    }
}
