//! FFT convolution (overlap-add)
//!
//! Convolves a long signal with a kernel of up to a few seconds. The kernel
//! spectrum is computed once, then the signal is processed in blocks of
//! `fft_len - kernel_len + 1` samples and the block outputs are summed.
//! Only the first `signal.len()` samples of the full convolution are kept.

use realfft::num_complex::Complex;
use realfft::RealFftPlanner;

use super::error::{DspError, DspResult};
use crate::types::Sample;

/// Smallest FFT size used, so tiny kernels still get reasonably large blocks
const MIN_FFT_LEN: usize = 1024;

/// Full linear convolution of `signal` with `kernel`, truncated to `signal.len()`
pub fn convolve_truncated(signal: &[Sample], kernel: &[f64]) -> DspResult<Vec<Sample>> {
    let n = signal.len();
    if n == 0 || kernel.is_empty() {
        return Ok(vec![0.0; n]);
    }

    let m = kernel.len();
    let fft_len = (2 * m).next_power_of_two().max(MIN_FFT_LEN);
    let block_len = fft_len - m + 1;

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(fft_len);
    let c2r = planner.plan_fft_inverse(fft_len);

    // Kernel spectrum, computed once
    let mut time = r2c.make_input_vec();
    time[..m].copy_from_slice(kernel);
    let mut kernel_spectrum = r2c.make_output_vec();
    r2c.process(&mut time, &mut kernel_spectrum)
        .map_err(|e| DspError::Fft(e.to_string()))?;

    let mut spectrum = r2c.make_output_vec();
    let mut block_out = c2r.make_output_vec();
    let mut output = vec![0.0f64; n];
    let scale = 1.0 / fft_len as f64;

    for start in (0..n).step_by(block_len) {
        let end = (start + block_len).min(n);

        time.fill(0.0);
        for (dst, &src) in time.iter_mut().zip(&signal[start..end]) {
            *dst = src as f64;
        }

        r2c.process(&mut time, &mut spectrum)
            .map_err(|e| DspError::Fft(e.to_string()))?;
        for (bin, k) in spectrum.iter_mut().zip(&kernel_spectrum) {
            *bin *= *k;
        }
        // DC and Nyquist bins of a real signal have no imaginary part
        zero_edge_imaginary(&mut spectrum);

        c2r.process(&mut spectrum, &mut block_out)
            .map_err(|e| DspError::Fft(e.to_string()))?;

        for (dst, &v) in output[start..].iter_mut().zip(&block_out) {
            *dst += v * scale;
        }
    }

    Ok(output.into_iter().map(|s| s as Sample).collect())
}

fn zero_edge_imaginary(spectrum: &mut [Complex<f64>]) {
    if let Some(first) = spectrum.first_mut() {
        first.im = 0.0;
    }
    if let Some(last) = spectrum.last_mut() {
        last.im = 0.0;
    }
}
