use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

use super::colormap::ColorMap;
use crate::audio::features::IntensityMatrix;
use crate::error::SpectrogramError;

/// Row-major RGBA pixels; row 0 holds the highest frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn into_image(self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data)
            .context("Pixel buffer does not match its dimensions")
    }

    pub fn save_png(self, path: &Path) -> Result<()> {
        let (width, height) = (self.width, self.height);
        self.into_image()?
            .save(path)
            .with_context(|| format!("Failed to write {}x{} image: {}", width, height, path.display()))?;
        log::info!("Wrote {}x{} spectrogram to {}", width, height, path.display());
        Ok(())
    }
}

/// Paint one matrix: column x is time, bin y lands on row `height - 1 - y`.
pub fn colorize(matrix: &IntensityMatrix, color_map: &ColorMap) -> PixelBuffer {
    let width = matrix.width();
    let height = matrix.height();
    let mut data = vec![0u8; width * height * 4];
    paint(&mut data, width, 0, matrix, &color_map.lut());
    PixelBuffer {
        width: width as u32,
        height: height as u32,
        data,
    }
}

/// Stack one image per channel vertically, channel 0 on top.
pub fn colorize_channels(
    channels: &[IntensityMatrix],
    color_map: &ColorMap,
) -> crate::error::Result<PixelBuffer> {
    let first = channels
        .first()
        .ok_or_else(|| SpectrogramError::unavailable("no channels to render"))?;
    let (width, height) = (first.width(), first.height());
    if let Some(c) = channels
        .iter()
        .position(|m| m.width() != width || m.height() != height)
    {
        return Err(SpectrogramError::invalid(format!(
            "channel {} is {}x{}, expected {}x{}",
            c,
            channels[c].width(),
            channels[c].height(),
            width,
            height
        )));
    }

    let lut = color_map.lut();
    let mut data = vec![0u8; width * height * channels.len() * 4];
    for (c, matrix) in channels.iter().enumerate() {
        paint(&mut data, width, c * height, matrix, &lut);
    }
    Ok(PixelBuffer {
        width: width as u32,
        height: (height * channels.len()) as u32,
        data,
    })
}

fn paint(data: &mut [u8], width: usize, row_offset: usize, matrix: &IntensityMatrix, lut: &[[u8; 4]]) {
    let height = matrix.height();
    for (x, column) in matrix.columns().iter().enumerate() {
        for (y, &intensity) in column.iter().enumerate() {
            let row = row_offset + height - 1 - y;
            let i = (row * width + x) * 4;
            data[i..i + 4].copy_from_slice(&lut[intensity as usize]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(columns: Vec<Vec<u8>>) -> IntensityMatrix {
        IntensityMatrix::from_columns(columns).unwrap()
    }

    #[test]
    fn low_frequencies_render_at_the_bottom() {
        // one column, bin 0 silent, bin 2 loudest
        let m = matrix(vec![vec![0, 128, 255], vec![255, 255, 255]]);
        let px = colorize(&m, &ColorMap::grayscale());
        assert_eq!((px.width, px.height), (2, 3));
        assert_eq!(px.data.len(), 2 * 3 * 4);
        assert_eq!(px.pixel(0, 2), [254, 254, 254, 255]);
        assert_eq!(px.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(px.pixel(1, 1), [0, 0, 0, 255]);
    }

    #[test]
    fn channels_stack_vertically() {
        let a = matrix(vec![vec![0, 0]]);
        let b = matrix(vec![vec![255, 255]]);
        let px = colorize_channels(&[a, b], &ColorMap::grayscale()).unwrap();
        assert_eq!((px.width, px.height), (1, 4));
        assert_eq!(px.pixel(0, 0), [254, 254, 254, 255]);
        assert_eq!(px.pixel(0, 1), [254, 254, 254, 255]);
        assert_eq!(px.pixel(0, 2), [0, 0, 0, 255]);
        assert_eq!(px.pixel(0, 3), [0, 0, 0, 255]);
    }

    #[test]
    fn mismatched_channels_are_rejected() {
        let a = matrix(vec![vec![0, 0]]);
        let b = matrix(vec![vec![0, 0, 0]]);
        let err = colorize_channels(&[a, b], &ColorMap::grayscale()).unwrap_err();
        assert!(matches!(err, SpectrogramError::InvalidInput(_)));
        assert!(colorize_channels(&[], &ColorMap::grayscale()).is_err());
    }

    #[test]
    fn writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let m = matrix(vec![vec![0, 64, 128, 255]; 8]);
        colorize(&m, &ColorMap::grayscale()).save_png(&path).unwrap();
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(3, 0).0, [0, 0, 0, 255]);
    }
}
