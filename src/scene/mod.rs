//! Scene inputs: description, resource databases and authored surfaces

pub mod catalog;
pub mod description;
pub mod meta;
pub mod surfaces;

pub use catalog::{LayoutDatabase, LayoutSurface, SurfaceCatalog, SurfaceSpec};
pub use description::{PrefabPlacement, RoadCurve, SceneDescription};
pub use meta::HeightHints;
pub use surfaces::{StaticSurface, build_static_surfaces};
