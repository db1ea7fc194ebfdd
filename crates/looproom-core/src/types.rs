//! Common types for LoopRoom
//!
//! This module contains the fundamental audio types used throughout the remix
//! pipeline: the mono [`Waveform`] and the three timeline [`Section`]s.

use std::ops::{Index, Range};

/// Audio sample type (32-bit float, mono)
pub type Sample = f32;

/// Number of timeline sections in a remix (Intro, Drop, Outro)
pub const NUM_SECTIONS: usize = 3;

/// Peak ceiling for the final mix and for gain-heavy stages (bass, reverb)
pub const PEAK_CEILING: Sample = 0.98;

/// Peak ceiling for the filter-blend stages (high boost, lo-fi)
pub const BLEND_PEAK_CEILING: Sample = 0.95;

/// Added to every normalization divisor so silence never divides by zero
pub const NORMALIZE_EPSILON: Sample = 1e-6;

/// Timeline sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Section {
    Intro = 0,
    Drop = 1,
    Outro = 2,
}

impl Section {
    /// Get all sections in timeline order
    pub const ALL: [Section; NUM_SECTIONS] = [Section::Intro, Section::Drop, Section::Outro];

    /// Convert from index (0-2) to Section
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Section::Intro),
            1 => Some(Section::Drop),
            2 => Some(Section::Outro),
            _ => None,
        }
    }

    /// Get the name of this section
    pub fn name(&self) -> &'static str {
        match self {
            Section::Intro => "Intro",
            Section::Drop => "Drop",
            Section::Outro => "Outro",
        }
    }
}

/// A single-channel waveform with its sample rate
///
/// The sample rate is fixed when the waveform is created; every operation in
/// the pipeline produces a new waveform at the same rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<Sample>,
    sample_rate: u32,
}

impl Waveform {
    /// Create a waveform from mono samples
    pub fn new(samples: Vec<Sample>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a silent waveform of `len` samples
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Create a waveform by averaging interleaved channels down to mono
    pub fn from_interleaved(interleaved: &[Sample], channels: usize, sample_rate: u32) -> Self {
        if channels <= 1 {
            return Self::new(interleaved.to_vec(), sample_rate);
        }
        let scale = 1.0 / channels as Sample;
        let samples = interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<Sample>() * scale)
            .collect();
        Self::new(samples, sample_rate)
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the waveform has no samples
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Borrow the samples
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Take ownership of the samples
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// Replace the samples, keeping the sample rate
    pub fn with_samples(&self, samples: Vec<Sample>) -> Self {
        Self::new(samples, self.sample_rate)
    }

    /// Copy out a sample range (clamped to the waveform length)
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.samples.len());
        let start = range.start.min(end);
        self.with_samples(self.samples[start..end].to_vec())
    }

    /// Copy out the samples between two times in seconds (truncating, clamped)
    pub fn slice_secs(&self, start_secs: f64, end_secs: f64) -> Self {
        self.slice(self.index_at(start_secs)..self.index_at(end_secs))
    }

    /// Convert a time in seconds to a sample index (truncating)
    #[inline]
    pub fn index_at(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate as f64) as usize
    }

    /// Peak absolute amplitude
    pub fn peak(&self) -> Sample {
        peak(&self.samples)
    }
}

impl Index<usize> for Waveform {
    type Output = Sample;

    fn index(&self, index: usize) -> &Self::Output {
        &self.samples[index]
    }
}

/// Peak absolute amplitude of a sample slice
pub fn peak(samples: &[Sample]) -> Sample {
    samples.iter().fold(0.0, |acc: Sample, &s| acc.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_order() {
        assert_eq!(Section::ALL.len(), NUM_SECTIONS);
        for (i, section) in Section::ALL.iter().enumerate() {
            assert_eq!(Section::from_index(i), Some(*section));
        }
        assert_eq!(Section::from_index(3), None);
        assert_eq!(Section::Drop.name(), "Drop");
    }

    #[test]
    fn test_waveform_duration() {
        let wave = Waveform::silence(88200, 44100);
        assert!((wave.duration_secs() - 2.0).abs() < 1e-9);
        assert_eq!(wave.index_at(1.5), 66150);
    }

    #[test]
    fn test_downmix_averages_channels() {
        let interleaved = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let wave = Waveform::from_interleaved(&interleaved, 2, 48000);
        assert_eq!(wave.samples(), &[0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_slice_is_clamped() {
        let wave = Waveform::new(vec![0.1, 0.2, 0.3, 0.4], 4);
        assert_eq!(wave.slice(1..3).samples(), &[0.2, 0.3]);
        assert_eq!(wave.slice(3..10).samples(), &[0.4]);
        assert!(wave.slice(8..10).is_empty());
        assert_eq!(wave.slice_secs(0.25, 0.75).samples(), &[0.2, 0.3]);
    }

    #[test]
    fn test_peak() {
        let wave = Waveform::new(vec![0.2, -0.7, 0.5], 8000);
        assert_eq!(wave.peak(), 0.7);
        assert_eq!(peak(&[]), 0.0);
    }
}
