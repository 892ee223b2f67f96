use std::path::PathBuf;

use thiserror::Error;

use crate::params::Dims;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid dimensions: {0}")]
    InvalidDims(String),

    #[error("parameter vector has length {got}, expected {expected} for {dims}")]
    ParamLength {
        expected: usize,
        got: usize,
        dims: Dims,
    },

    #[error("{what} shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("batch must contain at least one example")]
    EmptyBatch,

    #[error("objective returned a gradient of length {got}, expected {expected}")]
    GradientLength { expected: usize, got: usize },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
