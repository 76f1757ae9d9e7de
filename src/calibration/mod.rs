//! World → raster orientation calibration
//!
//! The renderer that produced a heightmap addresses it with one of 8
//! orientation conventions. Which one is recovered once per tile from a
//! reference object whose ground elevation is known, then kept fixed.

pub mod mode;
pub mod calibrator;
pub mod height_fit;
pub mod rounding;

pub use mode::CalibrationMode;
pub use calibrator::{Calibration, CalibrationOutcome, CoordinateCalibrator, sample_uv};
pub use height_fit::{RangeFit, fit_elevation_range};
pub use rounding::GridRounding;
