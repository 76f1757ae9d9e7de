//! Mathematical utilities and data structures

pub mod aabb;
pub mod curve;
pub mod orientation;
pub mod polygon;

pub use aabb::Aabb;
pub use orientation::Orientation;
pub use polygon::point_in_polygon;
