//! Bases and their flattened terrain

pub mod registry;
pub mod spawn;

pub use registry::{Base, BaseRegistry, BaseSettings, Footprint};
pub use spawn::{SpawnPoint, SpawnPointTable, WorldSpawn};
