use serde_json::Value;

use super::features::IntensityMatrix;
use crate::error::{Result, SpectrogramError};

/// Parse a precomputed payload, either `[frame][bin]` for one channel or
/// `[channel][frame][bin]` for several, into one matrix per channel.
pub fn parse(json: &str) -> Result<Vec<IntensityMatrix>> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SpectrogramError::invalid(format!("precomputed data is not valid JSON: {}", e)))?;
    from_value(&value)
}

pub fn from_value(value: &Value) -> Result<Vec<IntensityMatrix>> {
    let outer = value
        .as_array()
        .ok_or_else(|| SpectrogramError::invalid("precomputed data must be an array"))?;
    if outer.is_empty() {
        return Err(SpectrogramError::unavailable("precomputed data is empty"));
    }

    // A number at [0][0] means the single-channel shape.
    let single = outer[0]
        .as_array()
        .and_then(|frame| frame.first())
        .is_some_and(Value::is_number);

    if single {
        Ok(vec![channel(outer, 0)?])
    } else {
        outer
            .iter()
            .enumerate()
            .map(|(c, frames)| {
                let frames = frames.as_array().ok_or_else(|| {
                    SpectrogramError::invalid(format!("channel {} must be an array of frames", c))
                })?;
                channel(frames, c)
            })
            .collect()
    }
}

fn channel(frames: &[Value], index: usize) -> Result<IntensityMatrix> {
    let columns = frames
        .iter()
        .enumerate()
        .map(|(f, frame)| {
            let bins = frame.as_array().ok_or_else(|| {
                SpectrogramError::invalid(format!("channel {} frame {} is not an array", index, f))
            })?;
            bins.iter()
                .map(|v| {
                    v.as_u64()
                        .filter(|&n| n <= 255)
                        .map(|n| n as u8)
                        .ok_or_else(|| {
                            SpectrogramError::invalid(format!(
                                "channel {} frame {} holds {}, expected an integer in 0..=255",
                                index, f, v
                            ))
                        })
                })
                .collect::<Result<Vec<u8>>>()
        })
        .collect::<Result<Vec<_>>>()?;
    IntensityMatrix::from_columns(columns)
}

/// Serialize in the same exchange format: 2-D for one channel, 3-D otherwise.
pub fn to_json(channels: &[IntensityMatrix]) -> Result<String> {
    let encoded = match channels {
        [] => return Err(SpectrogramError::unavailable("no channels to export")),
        [single] => serde_json::to_string(single),
        many => serde_json::to_string(many),
    };
    encoded.map_err(|e| SpectrogramError::invalid(format!("failed to encode matrix: {}", e)))
}
