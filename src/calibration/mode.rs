//! The 8 UV → pixel orientation conventions

use serde::{Deserialize, Serialize};

use crate::core::types::DVec2;
use crate::core::Error;

/// One of the 8 ways a renderer may address a raster from tile UVs: an
/// optional axis swap followed by two independent flips.
///
/// Serialized as its index 0..=7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CalibrationMode {
    /// px = u, py = v
    Identity,
    /// px = v, py = u
    Transpose,
    /// px = 1 - u, py = v
    FlipX,
    /// px = v, py = 1 - u
    TransposeFlipY,
    /// px = u, py = 1 - v
    FlipY,
    /// px = 1 - v, py = u
    TransposeFlipX,
    /// px = 1 - u, py = 1 - v
    FlipXY,
    /// px = 1 - v, py = 1 - u
    TransposeFlipXY,
}

impl CalibrationMode {
    /// All modes in search order.
    pub const ALL: [CalibrationMode; 8] = [
        CalibrationMode::Identity,
        CalibrationMode::Transpose,
        CalibrationMode::FlipX,
        CalibrationMode::TransposeFlipY,
        CalibrationMode::FlipY,
        CalibrationMode::TransposeFlipX,
        CalibrationMode::FlipXY,
        CalibrationMode::TransposeFlipXY,
    ];

    /// Mode used when no reference point is available.
    pub const FALLBACK: CalibrationMode = CalibrationMode::FlipY;

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// u and v are exchanged before flipping
    pub fn swaps(self) -> bool {
        matches!(
            self,
            CalibrationMode::Transpose
                | CalibrationMode::TransposeFlipY
                | CalibrationMode::TransposeFlipX
                | CalibrationMode::TransposeFlipXY
        )
    }

    /// Pixel column runs against the (possibly swapped) first axis
    pub fn flips_x(self) -> bool {
        matches!(
            self,
            CalibrationMode::FlipX
                | CalibrationMode::TransposeFlipX
                | CalibrationMode::FlipXY
                | CalibrationMode::TransposeFlipXY
        )
    }

    /// Pixel row runs against the (possibly swapped) second axis
    pub fn flips_y(self) -> bool {
        matches!(
            self,
            CalibrationMode::TransposeFlipY
                | CalibrationMode::FlipY
                | CalibrationMode::FlipXY
                | CalibrationMode::TransposeFlipXY
        )
    }

    /// Map a tile UV to a fractional pixel on a `width` × `height` raster.
    /// UV 0 and 1 land on pixel centers 0 and `size - 1`. No clamping.
    pub fn uv_to_pixel(self, u: f64, v: f64, width: usize, height: usize) -> DVec2 {
        let (a, b) = if self.swaps() { (v, u) } else { (u, v) };
        let a = if self.flips_x() { 1.0 - a } else { a };
        let b = if self.flips_y() { 1.0 - b } else { b };
        DVec2::new(a * (width - 1) as f64, b * (height - 1) as f64)
    }

    /// Inverse of [`Self::uv_to_pixel`].
    pub fn pixel_to_uv(self, px: f64, py: f64, width: usize, height: usize) -> DVec2 {
        let a = px / (width - 1) as f64;
        let b = py / (height - 1) as f64;
        let a = if self.flips_x() { 1.0 - a } else { a };
        let b = if self.flips_y() { 1.0 - b } else { b };
        if self.swaps() { DVec2::new(b, a) } else { DVec2::new(a, b) }
    }
}

impl Default for CalibrationMode {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl From<CalibrationMode> for u8 {
    fn from(mode: CalibrationMode) -> u8 {
        mode.index()
    }
}

impl TryFrom<u8> for CalibrationMode {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Error> {
        CalibrationMode::from_index(index)
            .ok_or_else(|| Error::InvalidConfig(format!("calibration mode {} out of range 0..=7", index)))
    }
}

impl std::fmt::Display for CalibrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.index(), self)
    }
}
