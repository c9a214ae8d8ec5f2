use std::f64::consts::PI;

use super::window::WindowSpec;
use crate::error::{Result, SpectrogramError};

/// Precomputed tables for one (frame length, sample rate, window) triple.
///
/// Immutable once built, so a single plan can be shared by reference
/// across every frame and every worker thread of an analysis run.
#[derive(Debug, Clone)]
pub struct FftPlan {
    frame_length: usize,
    sample_rate: u32,
    window: WindowSpec,
    window_coeffs: Vec<f64>,
    sin_table: Vec<f64>,
    cos_table: Vec<f64>,
    bit_reverse: Vec<usize>,
}

impl FftPlan {
    pub fn new(frame_length: usize, sample_rate: u32, window: WindowSpec) -> Result<Self> {
        if !frame_length.is_power_of_two() {
            return Err(SpectrogramError::invalid(format!(
                "invalid buffer size {}, must be a power of 2",
                frame_length
            )));
        }
        if frame_length < 2 {
            return Err(SpectrogramError::invalid(
                "frame length must be at least 2 samples",
            ));
        }
        if sample_rate == 0 {
            return Err(SpectrogramError::config("sample rate must be positive"));
        }
        window.validate()?;

        // i = 0 yields NaN; stage sizes start at 1 so it is never read.
        let (sin_table, cos_table) = (0..frame_length)
            .map(|i| {
                let angle = -PI / i as f64;
                (angle.sin(), angle.cos())
            })
            .unzip();

        Ok(Self {
            frame_length,
            sample_rate,
            window,
            window_coeffs: window.generate(frame_length),
            sin_table,
            cos_table,
            bit_reverse: bit_reverse_table(frame_length),
        })
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn window(&self) -> &WindowSpec {
        &self.window
    }

    pub fn window_coeffs(&self) -> &[f64] {
        &self.window_coeffs
    }

    pub(crate) fn sin_table(&self) -> &[f64] {
        &self.sin_table
    }

    pub(crate) fn cos_table(&self) -> &[f64] {
        &self.cos_table
    }

    pub fn bit_reverse_table(&self) -> &[usize] {
        &self.bit_reverse
    }

    /// Number of magnitude bins per spectrum.
    pub fn bin_count(&self) -> usize {
        self.frame_length / 2
    }

    /// Center frequency of bin `i` in Hz.
    pub fn bin_frequency(&self, i: usize) -> f64 {
        i as f64 * self.sample_rate as f64 / self.frame_length as f64
    }

    /// Usable bandwidth of a single bin in Hz.
    pub fn bandwidth(&self) -> f64 {
        2.0 / self.frame_length as f64 * (self.sample_rate as f64 / 2.0)
    }

    pub fn frame_duration(&self) -> f64 {
        self.frame_length as f64 / self.sample_rate as f64
    }
}

fn bit_reverse_table(size: usize) -> Vec<usize> {
    let mut table = vec![0usize; size];
    let mut limit = 1;
    let mut bit = size >> 1;
    while limit < size {
        for i in 0..limit {
            table[i + limit] = table[i] + bit;
        }
        limit <<= 1;
        bit >>= 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_reversal_for_eight() {
        assert_eq!(bit_reverse_table(8), vec![0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn bit_reversal_is_a_permutation() {
        let reversed = bit_reverse_table(1024);
        // reversing twice is the identity
        for (i, &r) in reversed.iter().enumerate() {
            assert_eq!(reversed[r], i);
        }
        let mut table = reversed.clone();
        table.sort_unstable();
        assert!(table.iter().enumerate().all(|(i, &r)| i == r));
    }

    #[test]
    fn rejects_non_power_of_two() {
        let err = FftPlan::new(100, 44100, WindowSpec::default()).unwrap_err();
        assert!(matches!(err, SpectrogramError::InvalidInput(_)));
        assert!(FftPlan::new(0, 44100, WindowSpec::default()).is_err());
        assert!(FftPlan::new(1, 44100, WindowSpec::default()).is_err());
    }

    #[test]
    fn accepts_small_powers_of_two() {
        let plan = FftPlan::new(8, 8000, WindowSpec::default()).unwrap();
        assert_eq!(plan.bin_count(), 4);
        assert_eq!(plan.window_coeffs().len(), 8);
    }

    #[test]
    fn rejects_zero_sample_rate() {
        let err = FftPlan::new(512, 0, WindowSpec::default()).unwrap_err();
        assert!(matches!(err, SpectrogramError::Configuration(_)));
    }

    #[test]
    fn twiddles_match_stage_angles() {
        let plan = FftPlan::new(16, 16000, WindowSpec::default()).unwrap();
        assert!((plan.cos_table()[1] + 1.0).abs() < 1e-12);
        assert!((plan.sin_table()[2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn frequency_axis() {
        let plan = FftPlan::new(512, 44100, WindowSpec::default()).unwrap();
        assert!((plan.bin_frequency(1) - 86.1328125).abs() < 1e-9);
        assert!((plan.bandwidth() - 86.1328125).abs() < 1e-9);
        assert!((plan.bin_frequency(256) - 22050.0).abs() < 1e-9);
    }
}
