use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::SpectrogramError;

/// Decoded audio, one sample vector per channel.
pub struct AudioData {
    pub channels: Vec<Vec<f32>>,
    pub sample_rate: u32,
}

/// Which signals get analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    #[default]
    First,
    Mix,
    Split,
}

impl FromStr for ChannelMode {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(ChannelMode::First),
            "mix" | "mono" => Ok(ChannelMode::Mix),
            "split" => Ok(ChannelMode::Split),
            _ => Err(SpectrogramError::Configuration(format!(
                "unknown channel mode '{}' (expected first, mix or split)",
                s
            ))),
        }
    }
}

impl AudioData {
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }

    /// Average of all channels.
    pub fn mixdown(&self) -> Vec<f32> {
        let count = self.channels.len().max(1) as f32;
        (0..self.frames())
            .map(|i| self.channels.iter().map(|c| c[i]).sum::<f32>() / count)
            .collect()
    }

    /// Signals to analyse under `mode`.
    pub fn select(&self, mode: ChannelMode) -> Vec<Vec<f32>> {
        match mode {
            ChannelMode::First => self.channels.iter().take(1).cloned().collect(),
            ChannelMode::Mix => vec![self.mixdown()],
            ChannelMode::Split => self.channels.clone(),
        }
    }
}

pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    // Sized from the first decoded packet; tracks need not report a layout.
    let mut channels: Vec<Vec<f32>> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        let channel_count = spec.channels.count().max(1);
        if channels.is_empty() {
            channels = vec![Vec::new(); channel_count];
        } else if channels.len() != channel_count {
            anyhow::bail!(
                "Channel count changed from {} to {} mid-stream",
                channels.len(),
                channel_count
            );
        }

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        deinterleave(sample_buf.samples(), &mut channels);
    }

    let audio = AudioData {
        channels,
        sample_rate,
    };

    if audio.frames() == 0 {
        return Err(SpectrogramError::ResourceUnavailable(format!(
            "no sample data in {}",
            path.display()
        ))
        .into());
    }

    log::info!(
        "Decoded audio: {} samples x {} channels, {}Hz, {:.1}s",
        audio.frames(),
        audio.channels.len(),
        sample_rate,
        audio.duration()
    );

    Ok(audio)
}

fn deinterleave(interleaved: &[f32], channels: &mut [Vec<f32>]) {
    let count = channels.len();
    for frame in interleaved.chunks_exact(count) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }
}
