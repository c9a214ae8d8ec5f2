use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_fft_samples")]
    pub fft_samples: usize,
    #[serde(default)]
    pub noverlap: Option<usize>,
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default = "default_channels")]
    pub channels: String,
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub wrap_intensity: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub width: Option<usize>,
    #[serde(default)]
    pub color_map: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fft_samples: default_fft_samples(),
            noverlap: None,
            window: default_window(),
            alpha: None,
            channels: default_channels(),
            threads: None,
            wrap_intensity: false,
        }
    }
}

fn default_fft_samples() -> usize { sonogram::DEFAULT_FFT_SAMPLES }
fn default_window() -> String { "hann".into() }
fn default_channels() -> String { "first".into() }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// `./sonogram.toml`, then the XDG-style path, then the platform config dir.
pub fn discover() -> Option<PathBuf> {
    let local = PathBuf::from("sonogram.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("sonogram").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("sonogram").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
