//! Road network extraction and on-road queries

pub mod network;

pub use network::{RoadNetwork, RoadSegment, RoadSettings};
