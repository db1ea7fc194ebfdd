//! Effect system - the per-section effect trait and its native implementations
//!
//! Every effect takes a whole mono buffer, its sample rate, and an amount in
//! 0.0-1.0, and returns a new peak-normalized buffer. An amount of zero (or
//! less) returns the input untouched, bit for bit.

pub mod native;

pub use native::{
    bass_boost, high_boost, lofi, reverb, BassBoostEffect, HighBoostEffect, LofiEffect,
    ReverbEffect,
};

use crate::dsp::{DspResult, FilterSpec};
use crate::types::Sample;

/// Information about an effect
#[derive(Debug, Clone)]
pub struct EffectInfo {
    /// Effect name for display and logs
    pub name: String,
    /// Effect category (e.g., "EQ", "Filter", "Reverb")
    pub category: String,
    /// Filters the effect designs at process time
    pub filters: Vec<FilterSpec>,
    /// Peak ceiling of the effect's output
    pub peak_ceiling: Sample,
}

impl EffectInfo {
    /// Create a new effect info
    pub fn new(name: impl Into<String>, category: impl Into<String>, peak_ceiling: Sample) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            filters: Vec::new(),
            peak_ceiling,
        }
    }

    /// Declare a filter this effect designs
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }
}

/// The core effect trait - implemented by all section effects
pub trait Effect: Send {
    /// Get information about this effect (name, category, filters, ceiling)
    fn info(&self) -> &EffectInfo;

    /// Process a buffer at `amount` (0.0-1.0)
    ///
    /// `amount <= 0.0` must return a copy of `input` unchanged.
    fn process(&mut self, input: &[Sample], sample_rate: u32, amount: f32) -> DspResult<Vec<Sample>>;

    /// Check that every filter this effect needs can be designed at `sample_rate`
    ///
    /// Lets callers fail on an unusable sample rate before any processing.
    fn validate(&self, sample_rate: u32) -> DspResult<()> {
        self.info()
            .filters
            .iter()
            .try_for_each(|spec| spec.design(sample_rate).map(|_| ()))
    }
}
