mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use config::Config;
use sonogram::audio::decode::{self, ChannelMode};
use sonogram::audio::precomputed;
use sonogram::{
    colorize_channels, resample, ColorMap, Execution, IntensityMatrix, IntensityScale,
    SpectrogramBuilder, WindowKind, WindowSpec,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    if cli.list_windows {
        println!("Available windows:");
        for kind in WindowKind::ALL {
            match kind.default_alpha() {
                Some(alpha) => println!("  {:<14} alpha {}", kind.name(), alpha),
                None => println!("  {}", kind.name()),
            }
        }
        return Ok(());
    }

    // Explicit --config path, or auto-detect sonogram.toml / user config
    let config_path = cli.config.clone().or_else(config::discover);
    let cfg = match config_path {
        Some(ref path) => match config::load_config(path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                Config::default()
            }
        },
        None => Config::default(),
    };

    let width = cli.width.or(cfg.output.width);
    let color_map = match cli.color_map.as_ref().or(cfg.output.color_map.as_ref()) {
        Some(path) => {
            log::info!("Color map: {}", path.display());
            ColorMap::load(path)?
        }
        None => ColorMap::default(),
    };

    let channels = match cli.from_json {
        Some(ref path) => {
            log::info!("Loading precomputed data from {}", path.display());
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read precomputed data: {}", path.display()))?;
            let channels = precomputed::parse(&json)?;
            match width {
                Some(w) => channels
                    .iter()
                    .map(|m| resample(m, w))
                    .collect::<sonogram::Result<Vec<_>>>()?,
                None => channels,
            }
        }
        None => analyse(&cli, &cfg, width)?,
    };

    if let Some(ref path) = cli.export_json {
        std::fs::write(path, precomputed::to_json(&channels)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Exported intensity matrix to {}", path.display());
    }

    log::info!("Rendering {} channel(s)...", channels.len());
    colorize_channels(&channels, &color_map)?.save_png(&cli.output)?;

    Ok(())
}

fn analyse(cli: &Cli, cfg: &Config, width: Option<usize>) -> Result<Vec<IntensityMatrix>> {
    let input = cli
        .input
        .as_ref()
        .context("Input audio file or --from-json is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let window = WindowSpec::parse(
        Some(cli.window.as_deref().unwrap_or(&cfg.analysis.window)),
        cli.alpha.or(cfg.analysis.alpha),
    )?;
    let mode: ChannelMode = cli
        .channels
        .as_deref()
        .unwrap_or(&cfg.analysis.channels)
        .parse()?;
    let execution = if cli.sequential {
        Execution::Sequential
    } else {
        Execution::Parallel {
            threads: cli.threads.or(cfg.analysis.threads),
        }
    };
    let scale = if cli.wrap_intensity || cfg.analysis.wrap_intensity {
        IntensityScale::Wrap
    } else {
        IntensityScale::Clamp
    };
    let fft_samples = cli.fft_samples.unwrap_or(cfg.analysis.fft_samples);

    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!("Window: {}, FFT size {}, channels {:?}, {}", window.kind, fft_samples, mode, execution);

    log::info!("Decoding audio...");
    let audio = decode::decode_audio(input)?;
    let signals = audio.select(mode);

    let builder = SpectrogramBuilder::new(audio.sample_rate)
        .frame_length(fft_samples)
        .overlap(cli.noverlap.or(cfg.analysis.noverlap))
        .window(window)
        .target_width(width)
        .scale(scale)
        .execution(execution);

    let total: usize = signals
        .iter()
        .map(|s| builder.frame_count(s))
        .sum::<sonogram::Result<usize>>()?;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")?
            .progress_chars("=>-"),
    );

    log::info!("Analysing {} frames...", total);
    let hook = pb.clone();
    let builder = builder.on_progress(move |_| hook.inc(1));
    let channels = signals
        .iter()
        .map(|s| builder.build(s))
        .collect::<sonogram::Result<Vec<_>>>()?;
    pb.finish_and_clear();

    Ok(channels)
}
