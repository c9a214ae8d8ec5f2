use super::features::SpectrumFrame;
use super::plan::FftPlan;
use crate::error::{Result, SpectrogramError};

/// Windowed magnitude spectrum of one frame.
///
/// Iterative radix-2 decimation-in-time over per-call scratch buffers,
/// so concurrent calls may share one `plan`.
pub fn transform(plan: &FftPlan, frame: &[f32]) -> Result<SpectrumFrame> {
    let size = plan.frame_length();
    if frame.len() != size {
        return Err(SpectrogramError::invalid(format!(
            "buffer size mismatch: FFT size {}, buffer size {}",
            size,
            frame.len()
        )));
    }

    let reverse = plan.bit_reverse_table();
    let window = plan.window_coeffs();
    let cos_table = plan.cos_table();
    let sin_table = plan.sin_table();

    let mut real: Vec<f64> = reverse
        .iter()
        .map(|&r| frame[r] as f64 * window[r])
        .collect();
    let mut imag = vec![0.0f64; size];

    let mut half_size = 1;
    while half_size < size {
        let step_re = cos_table[half_size];
        let step_im = sin_table[half_size];
        let mut cur_re = 1.0;
        let mut cur_im = 0.0;

        for fft_step in 0..half_size {
            let mut i = fft_step;
            while i < size {
                let off = i + half_size;
                let tr = cur_re * real[off] - cur_im * imag[off];
                let ti = cur_re * imag[off] + cur_im * real[off];
                real[off] = real[i] - tr;
                imag[off] = imag[i] - ti;
                real[i] += tr;
                imag[i] += ti;
                i += half_size << 1;
            }
            let tmp = cur_re;
            cur_re = tmp * step_re - cur_im * step_im;
            cur_im = tmp * step_im + cur_im * step_re;
        }
        half_size <<= 1;
    }

    let scale = 2.0 / size as f64;
    let mut peak_bin = 0;
    let mut peak_magnitude = 0.0f32;
    let magnitudes: Vec<f32> = (0..size / 2)
        .map(|i| {
            let mag = (scale * (real[i] * real[i] + imag[i] * imag[i]).sqrt()) as f32;
            if mag > peak_magnitude {
                peak_bin = i;
                peak_magnitude = mag;
            }
            mag
        })
        .collect();

    Ok(SpectrumFrame {
        magnitudes,
        peak_bin,
        peak_magnitude,
    })
}
