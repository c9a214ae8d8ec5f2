use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sonogram", about = "Render audio files as spectrogram images")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Render a precomputed [frame][bin] or [channel][frame][bin] JSON payload instead
    #[arg(long, conflicts_with = "input")]
    pub from_json: Option<PathBuf>,

    /// Output PNG file
    #[arg(short, long, default_value = "spectrogram.png")]
    pub output: PathBuf,

    /// Also write the intensity matrix as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// FFT frame length (power of two)
    #[arg(long)]
    pub fft_samples: Option<usize>,

    /// Samples shared by consecutive frames
    #[arg(long)]
    pub noverlap: Option<usize>,

    /// Window function name (see --list-windows)
    #[arg(long)]
    pub window: Option<String>,

    /// Alpha parameter for blackman and gauss windows
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Image width in columns; derives the overlap when --noverlap is absent
    #[arg(long)]
    pub width: Option<usize>,

    /// JSON color map of 256 [r, g, b, a] entries in [0, 1]
    #[arg(long)]
    pub color_map: Option<PathBuf>,

    /// Channels to analyse: first, mix or split
    #[arg(long)]
    pub channels: Option<String>,

    /// Worker threads for the frame transforms
    #[arg(long)]
    pub threads: Option<usize>,

    /// Transform frames on the calling thread
    #[arg(long)]
    pub sequential: bool,

    /// Wrap out-of-range intensities modulo 256 instead of clamping
    #[arg(long)]
    pub wrap_intensity: bool,

    /// Config file (defaults to sonogram.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List available window functions and exit
    #[arg(long)]
    pub list_windows: bool,
}
