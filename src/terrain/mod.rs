//! Terrain queries over the calibrated heightmap

pub mod field;
pub mod sampler;

pub use field::Terrain;
pub use sampler::{ElevationAdjust, HeightSampler};
