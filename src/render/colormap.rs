use std::path::Path;

use anyhow::Context;

use crate::error::{Result, SpectrogramError};

pub const COLOR_MAP_LEN: usize = 256;

/// 256-entry RGBA palette indexed by intensity, components in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    entries: Vec<[f32; 4]>,
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl ColorMap {
    /// White at intensity 0 fading to black at 255.
    pub fn grayscale() -> Self {
        let entries = (0..COLOR_MAP_LEN)
            .map(|i| {
                let v = (255 - i) as f32 / 256.0;
                [v, v, v, 1.0]
            })
            .collect();
        Self { entries }
    }

    /// Exactly 256 entries of exactly 4 components each.
    pub fn from_entries(entries: Vec<Vec<f32>>) -> Result<Self> {
        if entries.len() != COLOR_MAP_LEN {
            return Err(SpectrogramError::config(format!(
                "color map must contain {} entries, got {}",
                COLOR_MAP_LEN,
                entries.len()
            )));
        }
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, e)| {
                let rgba: [f32; 4] = e.as_slice().try_into().map_err(|_| {
                    SpectrogramError::config(format!(
                        "color map entry {} must contain 4 values, got {}",
                        i,
                        e.len()
                    ))
                })?;
                if rgba.iter().any(|c| !(0.0..=1.0).contains(c)) {
                    return Err(SpectrogramError::config(format!(
                        "color map entry {} has a component outside [0, 1]",
                        i
                    )));
                }
                Ok(rgba)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Parse a JSON array of 256 `[r, g, b, a]` arrays.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Vec<f32>> = serde_json::from_str(json)
            .map_err(|e| SpectrogramError::config(format!("color map is not valid JSON: {}", e)))?;
        Self::from_entries(entries)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read color map: {}", path.display()))?;
        Self::from_json(&json)
            .with_context(|| format!("Failed to parse color map: {}", path.display()))
    }

    pub fn entry(&self, intensity: u8) -> [f32; 4] {
        self.entries[intensity as usize]
    }

    /// Entry as RGBA bytes.
    pub fn rgba(&self, intensity: u8) -> [u8; 4] {
        self.entry(intensity).map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
    }

    /// Byte lookup table for all 256 intensities.
    pub fn lut(&self) -> Vec<[u8; 4]> {
        (0..=255u8).map(|i| self.rgba(i)).collect()
    }
}
