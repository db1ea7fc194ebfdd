//! Time-stretching and pitch-shifting via signalsmith-stretch
//!
//! Wraps the signalsmith-stretch library for offline use on a whole mono
//! buffer. Stretching changes duration and keeps pitch; pitch shifting keeps
//! duration. The stretcher's latency is compensated so the output lines up
//! with the input and has exactly `round(len / rate)` samples.

use signalsmith_stretch::Stretch;

use crate::types::{Sample, Waveform};

/// Number of channels (mono)
const CHANNELS: u32 = 1;

/// Input samples handed to the stretcher per call
const BLOCK_SIZE: usize = 8192;

/// Output length for `len` input samples played at `rate`
pub fn stretched_len(len: usize, rate: f64) -> usize {
    if rate <= 0.0 || !rate.is_finite() {
        return len;
    }
    (len as f64 / rate).round() as usize
}

/// Offline time stretcher for one sample rate
pub struct TimeStretcher {
    /// The underlying signalsmith stretcher
    stretcher: Stretch,
    sample_rate: u32,
    /// Pitch shift in semitones (positive = up, negative = down)
    pitch_semitones: f32,
}

impl TimeStretcher {
    /// Create a new time stretcher for mono audio at `sample_rate`
    pub fn new(sample_rate: u32) -> Self {
        Self {
            stretcher: Stretch::preset_default(CHANNELS, sample_rate),
            sample_rate,
            pitch_semitones: 0.0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Set pitch shift in semitones applied by the next render
    pub fn set_pitch_semitones(&mut self, semitones: f32) {
        self.pitch_semitones = semitones;
    }

    pub fn pitch_semitones(&self) -> f32 {
        self.pitch_semitones
    }

    /// Get the input latency in samples
    pub fn input_latency(&self) -> usize {
        self.stretcher.input_latency()
    }

    /// Get the output latency in samples
    pub fn output_latency(&self) -> usize {
        self.stretcher.output_latency()
    }

    /// Render a whole buffer at playback `rate`
    ///
    /// rate > 1.0: speed up (shorter output)
    /// rate < 1.0: slow down (longer output)
    /// rate = 1.0: same length, only the pitch shift applies
    pub fn render(&mut self, input: &[Sample], rate: f64) -> Vec<Sample> {
        let rate = if rate > 0.0 && rate.is_finite() { rate } else { 1.0 };
        let target = stretched_len(input.len(), rate);
        if target == 0 {
            return Vec::new();
        }

        self.stretcher.reset();
        self.stretcher
            .set_transpose_factor_semitones(self.pitch_semitones, None);

        let input_latency = self.input_latency();
        let output_latency = self.output_latency();
        // Output lags the input by both latencies, measured in output samples
        let skip = (input_latency as f64 / rate).round() as usize + output_latency;

        // Trailing zeros push the last real samples through the lookahead
        let mut padded = Vec::with_capacity(input.len() + input_latency);
        padded.extend_from_slice(input);
        padded.resize(input.len() + input_latency, 0.0);

        let mut output = Vec::with_capacity(target + skip + output_latency);
        let mut block = Vec::with_capacity(stretched_len(BLOCK_SIZE, rate) + 1);
        let mut consumed = 0usize;
        for chunk in padded.chunks(BLOCK_SIZE) {
            consumed += chunk.len();
            // Cumulative rounding keeps block sizes from drifting off the rate
            let produce = stretched_len(consumed, rate) - output.len();
            block.clear();
            block.resize(produce, 0.0);
            self.stretcher.process(chunk, &mut block[..]);
            output.extend_from_slice(&block);
        }

        block.clear();
        block.resize(output_latency, 0.0);
        self.stretcher.flush(&mut block[..]);
        output.extend_from_slice(&block);

        let mut rendered: Vec<Sample> = output.into_iter().skip(skip).take(target).collect();
        rendered.resize(target, 0.0);
        rendered
    }
}

/// Change duration by `rate` without changing pitch
pub fn time_stretch(waveform: &Waveform, rate: f64) -> Waveform {
    if waveform.is_empty() {
        return waveform.clone();
    }
    let mut stretcher = TimeStretcher::new(waveform.sample_rate());
    waveform.with_samples(stretcher.render(waveform.samples(), rate))
}

/// Shift pitch by whole semitones without changing duration
pub fn pitch_shift(waveform: &Waveform, semitones: i32) -> Waveform {
    if waveform.is_empty() {
        return waveform.clone();
    }
    let mut stretcher = TimeStretcher::new(waveform.sample_rate());
    stretcher.set_pitch_semitones(semitones as f32);
    waveform.with_samples(stretcher.render(waveform.samples(), 1.0))
}
