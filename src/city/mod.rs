//! City grid and procedural city blocks

pub mod grid;
pub mod layout;

pub use grid::{GridAddressing, GridLayout};
pub use layout::{CityBlock, CityLayout, CityLayoutEngine, CitySettings};
