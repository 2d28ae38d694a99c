//! Error types for configuration-time failures.
//!
//! Errors are only raised while building cameras, meshes, textures and scenes,
//! or while exporting a frame. Per-triangle and per-pixel degeneracies are
//! handled inside the pipeline and never surface here.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    /// A parameter was outside its valid range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Vertex/index data does not describe a triangle list.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// Texture dimensions do not match the supplied pixel data.
    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    #[error("failed to load texture '{path}': {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load OBJ '{path}': {source}")]
    ObjLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to parse scene config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// TGA stores dimensions as 16-bit integers.
    #[error("{width}x{height} exceeds the TGA size limit of 65535x65535")]
    ImageTooLarge { width: usize, height: usize },
}

impl RasterError {
    pub(crate) fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RasterError>;
