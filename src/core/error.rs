//! Error types for tile construction

use thiserror::Error;

/// Main error type for the crate
///
/// Only construction can fail. Once a [`crate::tile::Tile`] exists every
/// query is infallible.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
