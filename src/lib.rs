//! Spectrogram rendering: windowed FFT analysis of a sample sequence into
//! a log-compressed intensity matrix, then color mapping into RGBA pixels.

pub mod audio;
pub mod error;
pub mod render;

pub use audio::analysis::{
    compress, CancelToken, Execution, IntensityScale, SpectrogramBuilder, DEFAULT_FFT_SAMPLES,
};
pub use audio::features::{IntensityMatrix, MagnitudeMatrix, SpectrogramMatrix, SpectrumFrame};
pub use audio::fft::transform;
pub use audio::frames::FrameExtractor;
pub use audio::plan::FftPlan;
pub use audio::window::{WindowKind, WindowSpec};
pub use error::{Result, SpectrogramError};
pub use render::colormap::ColorMap;
pub use render::frame::{colorize, colorize_channels, PixelBuffer};
pub use render::resample::resample;

/// Analyse `samples` into a `frame_length / 2` row intensity matrix.
///
/// `overlap` wins over `target_width` when both are given; when only
/// `target_width` is given the overlap is derived from it. The result is
/// resampled to `target_width` columns whenever that differs from the
/// number of frames.
pub fn compute_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    frame_length: usize,
    overlap: Option<usize>,
    window: WindowSpec,
    target_width: Option<usize>,
) -> Result<IntensityMatrix> {
    SpectrogramBuilder::new(sample_rate)
        .frame_length(frame_length)
        .overlap(overlap)
        .window(window)
        .target_width(target_width)
        .execution(Execution::Sequential)
        .build(samples)
}

/// Color a matrix with `color_map`, or the default grayscale ramp.
pub fn colorize_matrix(matrix: &IntensityMatrix, color_map: Option<&ColorMap>) -> PixelBuffer {
    match color_map {
        Some(map) => colorize(matrix, map),
        None => colorize(matrix, &ColorMap::default()),
    }
}
