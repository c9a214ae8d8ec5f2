use crate::error::{Result, SpectrogramError};

/// Slices a signal into overlapping frames of `frame_length` samples,
/// `step` samples apart.
///
/// Only frames with `offset + frame_length < samples.len()` are produced;
/// the trailing partial frame is dropped, not zero-padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameExtractor {
    frame_length: usize,
    step: usize,
}

impl FrameExtractor {
    pub fn new(frame_length: usize, step: usize) -> Result<Self> {
        if step == 0 {
            return Err(SpectrogramError::config("frame step must be positive"));
        }
        Ok(Self { frame_length, step })
    }

    /// Step from an explicit overlap, or one derived so the frame count
    /// approximates `target_width`. Without either the frames do not overlap.
    pub fn with_overlap(
        frame_length: usize,
        overlap: Option<usize>,
        sample_count: usize,
        target_width: Option<usize>,
    ) -> Result<Self> {
        let overlap = match (overlap, target_width) {
            (Some(o), _) => o,
            (None, Some(0)) => {
                return Err(SpectrogramError::config("target width must be positive"))
            }
            (None, Some(width)) => auto_overlap(frame_length, sample_count, width),
            (None, None) => 0,
        };
        if overlap >= frame_length {
            return Err(SpectrogramError::config(format!(
                "overlap {} leaves no step for frames of {} samples",
                overlap, frame_length
            )));
        }
        Self::new(frame_length, frame_length - overlap)
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn overlap(&self) -> usize {
        self.frame_length.saturating_sub(self.step)
    }

    /// Number of frames `extract` yields for `sample_count` samples.
    pub fn frame_count(&self, sample_count: usize) -> usize {
        if sample_count <= self.frame_length {
            0
        } else {
            (sample_count - self.frame_length - 1) / self.step + 1
        }
    }

    /// Frame `index` of `samples`. Panics past `frame_count`.
    pub fn frame<'a>(&self, samples: &'a [f32], index: usize) -> &'a [f32] {
        let start = index * self.step;
        &samples[start..start + self.frame_length]
    }

    pub fn extract<'a>(&self, samples: &'a [f32]) -> Frames<'a> {
        Frames {
            samples,
            extractor: *self,
            next: 0,
            count: self.frame_count(samples.len()),
        }
    }
}

fn auto_overlap(frame_length: usize, sample_count: usize, width: usize) -> usize {
    let samples_per_column = sample_count as f64 / width as f64;
    (frame_length as f64 - samples_per_column).round().max(0.0) as usize
}

/// Lazy iterator over borrowed frame slices.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    samples: &'a [f32],
    extractor: FrameExtractor,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let frame = self.extractor.frame(self.samples, self.next);
        self.next += 1;
        Some(frame)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Frames<'_> {}
