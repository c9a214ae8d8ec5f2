use serde::Serialize;

use crate::error::{Result, SpectrogramError};

/// Magnitude spectrum of one frame (transform output).
#[derive(Clone, Debug, PartialEq)]
pub struct SpectrumFrame {
    /// frame_length / 2 non-negative magnitudes, lowest bin first
    pub magnitudes: Vec<f32>,
    /// Index of the loudest bin in this frame
    pub peak_bin: usize,
    pub peak_magnitude: f32,
}

/// Time-frequency matrix stored column-major: one column per frame,
/// one row per frequency bin (row 0 = lowest frequency).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SpectrogramMatrix<T> {
    columns: Vec<Vec<T>>,
}

/// Raw magnitudes before compression.
pub type MagnitudeMatrix = SpectrogramMatrix<f32>;
/// Display intensities in 0..=255.
pub type IntensityMatrix = SpectrogramMatrix<u8>;

impl<T> SpectrogramMatrix<T> {
    /// Every column must exist and share the same non-zero length.
    pub fn from_columns(columns: Vec<Vec<T>>) -> Result<Self> {
        let height = match columns.first() {
            Some(c) => c.len(),
            None => return Err(SpectrogramError::invalid("spectrogram has no columns")),
        };
        if height == 0 {
            return Err(SpectrogramError::invalid("spectrogram columns are empty"));
        }
        if let Some(i) = columns.iter().position(|c| c.len() != height) {
            return Err(SpectrogramError::invalid(format!(
                "column {} has {} bins, expected {}",
                i,
                columns[i].len(),
                height
            )));
        }
        Ok(Self { columns })
    }

    /// Column count (time axis).
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Bins per column (frequency axis).
    pub fn height(&self) -> usize {
        self.columns[0].len()
    }

    pub fn column(&self, index: usize) -> &[T] {
        &self.columns[index]
    }

    pub fn columns(&self) -> &[Vec<T>] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Vec<T>> {
        self.columns
    }
}

impl<T: Copy> SpectrogramMatrix<T> {
    pub fn get(&self, column: usize, row: usize) -> T {
        self.columns[column][row]
    }

    /// Cell-wise conversion; the shape carries over unchanged.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> SpectrogramMatrix<U> {
        SpectrogramMatrix {
            columns: self
                .columns
                .iter()
                .map(|col| col.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }
}

impl MagnitudeMatrix {
    pub fn from_spectra(frames: Vec<SpectrumFrame>) -> Result<Self> {
        Self::from_columns(frames.into_iter().map(|f| f.magnitudes).collect())
    }
}
