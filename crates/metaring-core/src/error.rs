//! Error types shared across the core pipeline.

use thiserror::Error;

/// Errors surfaced by the circuit-model pipeline.
///
/// Every failure is reported to the caller immediately; the core never
/// substitutes defaults or recovers silently.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Bad construction or geometry parameters.
    #[error("invalid parameters: {0}")]
    Validation(String),

    /// Array-length or matrix-dimension mismatch between collaborating data.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Ring geometry too degenerate for the coupling formula.
    #[error("degenerate ring geometry: {0}")]
    NumericalDomain(String),

    /// Impedance matrix not solvable within tolerance.
    #[error(
        "impedance matrix numerically singular: relative residual {residual:.3e} \
         exceeds tolerance {tolerance:.3e}"
    )]
    Singular { residual: f64, tolerance: f64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("npz read error: {0}")]
    NpzRead(#[from] ndarray_npy::ReadNpzError),

    #[error("npz write error: {0}")]
    NpzWrite(#[from] ndarray_npy::WriteNpzError),
}

pub type ModelResult<T> = Result<T, ModelError>;
