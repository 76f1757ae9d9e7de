//! Tileterrain - terrain queries and placement on procedurally described map tiles
//!
//! A [`tile::Tile`] is built once from a heightmap, a scene description and
//! shared resource databases, then answers: how high is the ground at
//! (x, z), which way does it face, and where should an object standing
//! there be mounted.

pub mod core;
pub mod math;
pub mod heightmap;
pub mod calibration;
pub mod terrain;
pub mod bases;
pub mod city;
pub mod roads;
pub mod scene;
pub mod placement;
pub mod tile;

pub use tile::{Tile, TileConfig, TileSources};
