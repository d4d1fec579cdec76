//! Error types for plotaxes.

use thiserror::Error;

use crate::tick::Axis;

/// The main error type for plotaxes operations.
///
/// Collaborators (renderers, text rasterizers, tick formatters) report their
/// failures through this type and the layer forwards them untouched.
#[derive(Error, Debug)]
pub enum AxesError {
    /// A tick formatter rejected a value.
    #[error("failed to format {axis} tick {value}: {message}")]
    Format {
        axis: Axis,
        value: f64,
        message: String,
    },

    /// The renderer collaborator failed.
    #[error("render error: {0}")]
    Render(String),

    /// The text rasterizer collaborator failed.
    #[error("rasterize error: {0}")]
    Rasterize(String),

    /// A model handle was not created by this renderer, or was already released.
    #[error("unknown model handle {0}")]
    UnknownModel(u64),

    /// A texture handle was not created by this renderer, or was already released.
    #[error("unknown texture handle {0}")]
    UnknownTexture(u64),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for plotaxes operations.
pub type Result<T> = std::result::Result<T, AxesError>;
