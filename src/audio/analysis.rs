use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::features::{IntensityMatrix, MagnitudeMatrix, SpectrumFrame};
use super::fft;
use super::frames::FrameExtractor;
use super::plan::FftPlan;
use super::window::WindowSpec;
use crate::error::{Result, SpectrogramError};
use crate::render::resample;

pub const DEFAULT_FFT_SAMPLES: usize = 512;

/// How magnitudes become display bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntensityScale {
    /// `log10(m) * 45`, floored at -255, truncated, then clamped to 0..=255.
    #[default]
    Clamp,
    /// Same curve, but the truncated value wraps modulo 256 like a raw
    /// byte-array store instead of clamping.
    Wrap,
}

impl IntensityScale {
    pub fn compress(&self, magnitude: f32) -> u8 {
        // log10 of zero, negative or NaN input counts as -infinity
        let level = if magnitude > 0.0 {
            (magnitude.log10() * 45.0).max(-255.0)
        } else {
            -255.0
        };
        // saturating cast truncates toward zero
        let truncated = level as i32;
        match self {
            IntensityScale::Clamp => truncated.clamp(0, 255) as u8,
            IntensityScale::Wrap => truncated.rem_euclid(256) as u8,
        }
    }
}

/// Compress every cell of a magnitude matrix.
pub fn compress(matrix: &MagnitudeMatrix, scale: IntensityScale) -> IntensityMatrix {
    matrix.map(|m| scale.compress(m))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Execution {
    Sequential,
    /// `threads: None` runs on the global rayon pool.
    Parallel { threads: Option<usize> },
}

impl Default for Execution {
    fn default() -> Self {
        Execution::Parallel { threads: None }
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Execution::Sequential => write!(f, "sequential"),
            Execution::Parallel { threads: None } => write!(f, "parallel"),
            Execution::Parallel { threads: Some(n) } => write!(f, "parallel ({} threads)", n),
        }
    }
}

/// Shared flag checked once per frame.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

type ProgressHook = Arc<dyn Fn(usize) + Send + Sync>;

/// Runs frame extraction and the transform across a whole signal.
#[derive(Clone)]
pub struct SpectrogramBuilder {
    sample_rate: u32,
    frame_length: usize,
    overlap: Option<usize>,
    window: WindowSpec,
    target_width: Option<usize>,
    scale: IntensityScale,
    execution: Execution,
    cancel: Option<CancelToken>,
    progress: Option<ProgressHook>,
}

impl fmt::Debug for SpectrogramBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrogramBuilder")
            .field("sample_rate", &self.sample_rate)
            .field("frame_length", &self.frame_length)
            .field("overlap", &self.overlap)
            .field("window", &self.window)
            .field("target_width", &self.target_width)
            .field("scale", &self.scale)
            .field("execution", &self.execution)
            .finish_non_exhaustive()
    }
}

impl SpectrogramBuilder {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            frame_length: DEFAULT_FFT_SAMPLES,
            overlap: None,
            window: WindowSpec::default(),
            target_width: None,
            scale: IntensityScale::default(),
            execution: Execution::default(),
            cancel: None,
            progress: None,
        }
    }

    pub fn frame_length(mut self, frame_length: usize) -> Self {
        self.frame_length = frame_length;
        self
    }

    /// `None` derives the overlap from the target width.
    pub fn overlap(mut self, overlap: Option<usize>) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn window(mut self, window: WindowSpec) -> Self {
        self.window = window;
        self
    }

    /// Column count of the finished matrix.
    pub fn target_width(mut self, width: Option<usize>) -> Self {
        self.target_width = width;
        self
    }

    pub fn scale(mut self, scale: IntensityScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Called with the frame index after each frame is transformed.
    pub fn on_progress(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(hook));
        self
    }

    /// Validates the configuration against `samples` without transforming.
    pub fn prepare(&self, samples: &[f32]) -> Result<(FftPlan, FrameExtractor)> {
        let plan = FftPlan::new(self.frame_length, self.sample_rate, self.window)?;
        if samples.is_empty() {
            return Err(SpectrogramError::unavailable("no sample data"));
        }
        if samples.len() <= self.frame_length {
            return Err(SpectrogramError::invalid(format!(
                "{} samples are shorter than one frame of {}",
                samples.len(),
                self.frame_length
            )));
        }
        if self.target_width == Some(0) {
            return Err(SpectrogramError::config("target width must be positive"));
        }
        let extractor = FrameExtractor::with_overlap(
            self.frame_length,
            self.overlap,
            samples.len(),
            self.target_width,
        )?;
        Ok((plan, extractor))
    }

    /// Number of frames `spectra` will transform.
    pub fn frame_count(&self, samples: &[f32]) -> Result<usize> {
        let (_, extractor) = self.prepare(samples)?;
        Ok(extractor.frame_count(samples.len()))
    }

    /// Per-frame magnitude spectra in frame order.
    pub fn spectra(&self, samples: &[f32]) -> Result<Vec<SpectrumFrame>> {
        let (plan, extractor) = self.prepare(samples)?;
        let count = extractor.frame_count(samples.len());

        log::debug!(
            "Spectrogram: {} frames of {} (step {}), {} window, {}",
            count,
            plan.frame_length(),
            extractor.step(),
            plan.window().kind,
            self.execution
        );

        let run_frame = |index: usize| -> Result<SpectrumFrame> {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(SpectrogramError::Cancelled);
            }
            let spectrum = fft::transform(&plan, extractor.frame(samples, index))?;
            if let Some(ref hook) = self.progress {
                hook(index);
            }
            Ok(spectrum)
        };

        let spectra = match self.execution {
            Execution::Sequential => (0..count).map(run_frame).collect::<Result<Vec<_>>>()?,
            Execution::Parallel { threads: None } => {
                (0..count).into_par_iter().map(run_frame).collect::<Result<Vec<_>>>()?
            }
            Execution::Parallel { threads: Some(n) } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SpectrogramError::config(format!("worker pool: {}", e)))?;
                pool.install(|| {
                    (0..count).into_par_iter().map(run_frame).collect::<Result<Vec<_>>>()
                })?
            }
        };

        if let Some((index, loudest)) = spectra
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.peak_magnitude.total_cmp(&b.1.peak_magnitude))
        {
            log::debug!(
                "Loudest peak: frame {}, bin {} ({:.1} Hz), magnitude {:.4}",
                index,
                loudest.peak_bin,
                plan.bin_frequency(loudest.peak_bin),
                loudest.peak_magnitude
            );
        }

        Ok(spectra)
    }

    /// Raw magnitude matrix, one column per frame.
    pub fn magnitudes(&self, samples: &[f32]) -> Result<MagnitudeMatrix> {
        MagnitudeMatrix::from_spectra(self.spectra(samples)?)
    }

    /// Compressed intensity matrix, resampled to the target width if set.
    pub fn build(&self, samples: &[f32]) -> Result<IntensityMatrix> {
        let matrix = compress(&self.magnitudes(samples)?, self.scale);
        match self.target_width {
            Some(width) if width != matrix.width() => resample::resample(&matrix, width),
            _ => Ok(matrix),
        }
    }
}
