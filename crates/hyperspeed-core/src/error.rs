use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("drawing surface {id:?} not found")]
    SurfaceNotFound { id: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("platform collaborator failed: {0}")]
    Platform(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;
