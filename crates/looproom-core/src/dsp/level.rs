//! Level utilities - gain conversion, peak normalization, fades, reversal

use crate::types::{peak, Sample, NORMALIZE_EPSILON};

/// Convert decibels to a linear gain factor
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Scale samples so the peak lands just under `ceiling`
///
/// The divisor is `peak + 1e-6`, so silence stays silent and the result never
/// exceeds the ceiling.
pub fn peak_normalize(samples: &mut [Sample], ceiling: Sample) {
    let divisor = peak(samples) + NORMALIZE_EPSILON;
    for s in samples.iter_mut() {
        *s = *s / divisor * ceiling;
    }
}

/// Apply linear fade-in and fade-out ramps of `fade_secs` each
///
/// Skipped entirely when the fade would be empty or when the two ramps would
/// overlap (track shorter than two fades).
pub fn fade_in_out(samples: &mut [Sample], sample_rate: u32, fade_secs: f64) {
    let n = samples.len();
    let fade_len = (fade_secs * sample_rate as f64) as usize;
    if fade_len == 0 || fade_len.checked_mul(2).map_or(true, |both| both > n) {
        return;
    }

    // Ramp endpoints are exactly 0.0 and 1.0
    let step = if fade_len > 1 {
        1.0 / (fade_len - 1) as f64
    } else {
        0.0
    };
    for i in 0..fade_len {
        let ramp = (i as f64 * step) as Sample;
        samples[i] *= ramp;
        samples[n - 1 - i] *= ramp;
    }
}

/// Reverse sample order in place
#[inline]
pub fn reverse(samples: &mut [Sample]) {
    samples.reverse();
}
