//! Signal side of the pipeline: decoding, windowing, the transform and
//! frame-by-frame analysis.

pub mod analysis;
pub mod decode;
pub mod features;
pub mod fft;
pub mod frames;
pub mod plan;
pub mod precomputed;
pub mod window;
