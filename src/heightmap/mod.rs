//! Heightmap asset decoding
//!
//! The heightmap raster carries elevation (red by default) and city
//! density (green). A separate grayscale noise raster drives layout
//! selection for procedural city blocks.

pub mod raster;
pub mod channels;
pub mod decoder;

pub use raster::Raster;
pub use channels::{ElevationRange, HeightmapChannels};
pub use decoder::{DecodedChannels, HeightChannel, HeightmapDecoder};
