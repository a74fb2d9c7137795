use std::{num::ParseFloatError, path::PathBuf};

use thiserror::Error;

/// Broad classification of a failed checked evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// an input does not have the structure the evaluator relies on
    Type,
    /// an input has the right structure but the wrong shape
    Value,
}

/// Errors reported by the checked entry points in [`crate::eval`].
#[derive(Error, Clone, Debug, PartialEq)]
pub enum EvalError {
    /// The points are neither an `(N, 3)` array nor a single 3-vector.
    #[error("points must be an (N, 3) array or a single 3-vector, got shape {0:?}")]
    PointsShape(Vec<usize>),

    /// Derivative orders must be given for exactly x, y and z.
    #[error("derivative orders must have exactly 3 entries, got {0}")]
    OrdersLength(usize),

    /// One of the shell's tables does not match the others.
    #[error("shell attribute `{attribute}` has shape {found:?}, expected {expected:?}")]
    ShellStructure {
        attribute: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PointsShape(_) | Self::OrdersLength(_) => ErrorKind::Value,
            Self::ShellStructure { .. } => ErrorKind::Type,
        }
    }
}

/// Errors raised while building a [`crate::basis::ContractedShell`].
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ShellError {
    #[error("angular momentum must be non-negative, got {0}")]
    NegativeAngularMomentum(i32),

    #[error("angular component {0:?} has a negative entry")]
    NegativeComponent([i32; 3]),

    #[error("exponent {0} must be positive and finite")]
    InvalidExponent(f64),

    #[error("a shell needs at least one primitive")]
    NoPrimitives,

    #[error("a shell needs at least one contraction")]
    NoContractions,

    #[error("{found} coefficient rows given for {expected} exponents")]
    CoefficientCount { expected: usize, found: usize },
}

/// Errors raised while loading shells and grids from configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid number in basis set: {0}")]
    ParseFloat(#[from] ParseFloatError),

    #[error(
        "shell lists {angular_momenta} angular momenta but {coefficient_rows} coefficient rows"
    )]
    CoefficientRows {
        angular_momenta: usize,
        coefficient_rows: usize,
    },

    #[error("shell lists no angular momentum")]
    NoAngularMomentum,

    #[error("coordinates must have 3 entries, got {0}")]
    Coordinate(usize),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error("I/O error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}
