//! Global pre-processing - preview crop, speed, pitch, reverse
//!
//! Everything here runs on the whole waveform before it is split into
//! sections, always in the same order: crop, speed, pitch, reverse.
//! Out-of-range speed and pitch are clamped, never rejected.

use serde::{Deserialize, Serialize};

use crate::dsp::reverse;
use crate::remix::RemixRequest;
use crate::timestretch::{pitch_shift, time_stretch};
use crate::types::Waveform;

/// Slowest allowed playback speed
pub const MIN_SPEED: f64 = 0.6;
/// Fastest allowed playback speed
pub const MAX_SPEED: f64 = 1.3;
/// Largest allowed pitch shift in either direction, in semitones
pub const MAX_PITCH_STEPS: i32 = 7;

/// Time window rendered for a preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewWindow {
    /// Requested start in seconds (clamped so the window fits the track)
    pub start_time: f64,
    /// Length in seconds; zero or less disables cropping
    pub duration: f64,
}

impl PreviewWindow {
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            start_time,
            duration,
        }
    }
}

/// Clamp a speed factor into 0.6-1.3 (NaN becomes 1.0)
pub fn clamp_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        return 1.0;
    }
    speed.clamp(MIN_SPEED, MAX_SPEED)
}

/// Clamp a pitch shift into -7..=7 semitones
pub fn clamp_pitch(steps: i32) -> i32 {
    steps.clamp(-MAX_PITCH_STEPS, MAX_PITCH_STEPS)
}

/// Clamp a preview start into `[0, max(0, total - duration)]`
pub fn clamp_preview_start(start_time: f64, duration: f64, total_duration: f64) -> f64 {
    let latest = (total_duration - duration).max(0.0);
    if start_time.is_nan() {
        return 0.0;
    }
    start_time.min(latest).max(0.0)
}

/// Cut the preview window out of a waveform
///
/// A window with a non-positive duration returns the waveform unchanged.
pub fn crop_preview(waveform: &Waveform, window: &PreviewWindow) -> Waveform {
    if window.duration.is_nan() || window.duration <= 0.0 {
        return waveform.clone();
    }
    let start = clamp_preview_start(window.start_time, window.duration, waveform.duration_secs());
    waveform.slice_secs(start, start + window.duration)
}

/// Time-stretch to a clamped speed, skipped at exactly 1.0
pub fn apply_speed(waveform: Waveform, speed: f64) -> Waveform {
    let speed = clamp_speed(speed);
    if speed == 1.0 {
        return waveform;
    }
    log::debug!("Stretching {} samples at speed {:.2}", waveform.len(), speed);
    time_stretch(&waveform, speed)
}

/// Pitch-shift by a clamped number of semitones, skipped at 0
pub fn apply_pitch(waveform: Waveform, steps: i32) -> Waveform {
    let steps = clamp_pitch(steps);
    if steps == 0 {
        return waveform;
    }
    log::debug!("Shifting pitch by {} semitones", steps);
    pitch_shift(&waveform, steps)
}

/// Reverse the sample order
pub fn apply_reverse(waveform: Waveform) -> Waveform {
    let sample_rate = waveform.sample_rate();
    let mut samples = waveform.into_samples();
    reverse(&mut samples);
    Waveform::new(samples, sample_rate)
}

/// Run crop, speed, pitch and reverse as the request asks
pub fn preprocess(waveform: Waveform, request: &RemixRequest) -> Waveform {
    let mut waveform = match &request.preview {
        Some(window) => {
            let cropped = crop_preview(&waveform, window);
            log::debug!(
                "Preview crop: {:.2}s of {:.2}s",
                cropped.duration_secs(),
                waveform.duration_secs()
            );
            cropped
        }
        None => waveform,
    };

    waveform = apply_speed(waveform, request.speed);
    waveform = apply_pitch(waveform, request.pitch_steps);
    if request.reverse {
        waveform = apply_reverse(waveform);
    }
    waveform
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize, sample_rate: u32) -> Waveform {
        Waveform::new((0..len).map(|i| i as f32 / len as f32).collect(), sample_rate)
    }

    #[test]
    fn test_clamp_speed() {
        assert_eq!(clamp_speed(1.0), 1.0);
        assert_eq!(clamp_speed(0.1), MIN_SPEED);
        assert_eq!(clamp_speed(2.0), MAX_SPEED);
        assert_eq!(clamp_speed(0.82), 0.82);
        assert_eq!(clamp_speed(f64::NAN), 1.0);
    }

    #[test]
    fn test_clamp_pitch() {
        assert_eq!(clamp_pitch(0), 0);
        assert_eq!(clamp_pitch(-3), -3);
        assert_eq!(clamp_pitch(12), 7);
        assert_eq!(clamp_pitch(-100), -7);
    }

    #[test]
    fn test_clamp_preview_start() {
        assert_eq!(clamp_preview_start(5.0, 15.0, 60.0), 5.0);
        assert_eq!(clamp_preview_start(50.0, 15.0, 60.0), 45.0);
        assert_eq!(clamp_preview_start(-2.0, 15.0, 60.0), 0.0);
        // Track shorter than the window starts at zero
        assert_eq!(clamp_preview_start(3.0, 15.0, 10.0), 0.0);
    }

    #[test]
    fn test_crop_preview() {
        let sr = 100;
        let wave = ramp(6000, sr);

        let cropped = crop_preview(&wave, &PreviewWindow::new(5.0, 15.0));
        assert_eq!(cropped.len(), 1500);
        assert_eq!(cropped[0], wave[500]);

        let clamped = crop_preview(&wave, &PreviewWindow::new(55.0, 15.0));
        assert_eq!(clamped.len(), 1500);
        assert_eq!(clamped[0], wave[4500]);

        let whole = crop_preview(&wave, &PreviewWindow::new(10.0, 0.0));
        assert_eq!(whole, wave);
    }

    #[test]
    fn test_crop_short_track() {
        let wave = ramp(500, 100);
        let cropped = crop_preview(&wave, &PreviewWindow::new(2.0, 15.0));
        assert_eq!(cropped, wave);
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let wave = ramp(1000, 100);
        let reversed = apply_reverse(wave.clone());
        assert_eq!(reversed[0], wave[999]);
        assert_eq!(apply_reverse(reversed), wave);
    }

    #[test]
    fn test_neutral_request_is_untouched() {
        let wave = ramp(1000, 16000);
        let request = RemixRequest::default();
        assert_eq!(preprocess(wave.clone(), &request), wave);
    }

    #[test]
    fn test_preprocess_crops_then_reverses() {
        let wave = ramp(6000, 100);
        let request = RemixRequest {
            preview: Some(PreviewWindow::new(10.0, 5.0)),
            reverse: true,
            ..RemixRequest::default()
        };
        let out = preprocess(wave.clone(), &request);
        assert_eq!(out.len(), 500);
        assert_eq!(out[0], wave[1499]);
        assert_eq!(out[499], wave[1000]);
    }

    #[test]
    fn test_slow_speed_lengthens() {
        let wave = Waveform::silence(16000, 16000);
        let out = apply_speed(wave, 0.5);
        // Clamped to 0.6
        assert_eq!(out.len(), (16000.0_f64 / 0.6).round() as usize);
    }
}
