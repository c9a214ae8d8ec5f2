//! Image side of the pipeline: resampling, color mapping and pixel output.

pub mod colormap;
pub mod frame;
pub mod resample;
