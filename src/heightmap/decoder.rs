//! Heightmap and noise raster decoding

use std::path::Path;

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};

use super::raster::Raster;
use crate::core::{Error, Result};

/// Which RGB channel carries elevation. Density is always green.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeightChannel {
    #[default]
    Red,
    Green,
    Blue,
}

impl HeightChannel {
    fn index(self) -> usize {
        match self {
            HeightChannel::Red => 0,
            HeightChannel::Green => 1,
            HeightChannel::Blue => 2,
        }
    }
}

/// Output of decoding the heightmap asset.
#[derive(Clone, Debug)]
pub struct DecodedChannels {
    pub elevation: Raster,
    pub density: Raster,
}

/// sRGB transfer function → linear, on a normalized sample.
pub fn srgb_to_linear(c: f32) -> f32 {
    const A: f32 = 0.055;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + A) / (1.0 + A)).powf(2.4)
    }
}

/// Decodes the heightmap raster into elevation and density channels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapDecoder {
    /// Reverse row order so row 0 is the bottom image row
    pub flip_vertical: bool,
    /// Treat samples as sRGB encoded and convert to linear
    pub linearize_srgb: bool,
    /// Channel carrying elevation
    pub height_channel: HeightChannel,
}

impl Default for HeightmapDecoder {
    fn default() -> Self {
        Self {
            flip_vertical: true,
            linearize_srgb: false,
            height_channel: HeightChannel::Red,
        }
    }
}

impl HeightmapDecoder {
    /// Read and decode a heightmap file. A missing file is fatal.
    pub fn load(&self, path: &Path) -> Result<DecodedChannels> {
        let image = image::open(path)?;
        log::debug!("Decoding heightmap {} ({}x{})", path.display(), image.width(), image.height());
        self.decode(&image)
    }

    /// Decode an already loaded image (converted to RGB8).
    pub fn decode(&self, image: &DynamicImage) -> Result<DecodedChannels> {
        self.decode_rgb(&image.to_rgb8())
    }

    /// Decode RGB8 pixels.
    pub fn decode_rgb(&self, rgb: &RgbImage) -> Result<DecodedChannels> {
        let (w, h) = (rgb.width() as usize, rgb.height() as usize);
        if w < 2 || h < 2 {
            return Err(Error::InvalidAsset(format!("heightmap is {}x{}, need at least 2x2", w, h)));
        }

        let channel = |c: usize| {
            Raster::from_fn(w, h, |x, y| {
                let v = rgb.get_pixel(x as u32, y as u32).0[c] as f32 / 255.0;
                if self.linearize_srgb { srgb_to_linear(v) } else { v }
            })
        };

        let mut elevation = channel(self.height_channel.index());
        let mut density = channel(1);
        if self.flip_vertical {
            elevation = elevation.flipped_vertical();
            density = density.flipped_vertical();
        }
        Ok(DecodedChannels { elevation, density })
    }

    /// Read and decode the layout-selector noise raster. A missing file is
    /// fatal.
    pub fn load_noise(&self, path: &Path) -> Result<Raster> {
        let image = image::open(path)?;
        Ok(self.decode_noise(&image))
    }

    /// Decode the noise raster as luma, flipped like the heightmap.
    pub fn decode_noise(&self, image: &DynamicImage) -> Raster {
        let luma = image.to_luma8();
        let (w, h) = (luma.width() as usize, luma.height() as usize);
        let noise = Raster::from_fn(w, h, |x, y| luma.get_pixel(x as u32, y as u32).0[0] as f32 / 255.0);
        if self.flip_vertical { noise.flipped_vertical() } else { noise }
    }
}
