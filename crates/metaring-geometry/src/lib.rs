//! # Metaring Geometry
//!
//! Lattice geometry for the Metaring framework. This crate provides:
//!
//! - **Structure registry** ([`structure`]) — The supported metastructure
//!   variants with their canonical parameter records.
//! - **Cubic lattice** ([`cubic`]) — Vertex/edge/face enumeration and ring
//!   placement for regular cubic grids.
//!
//! Generated positions and orientations feed the ring network in
//! `metaring-core`; the vertex/edge/face soup exists for external viewers
//! and is never required by the solve pipeline.

pub mod cubic;
pub mod structure;

use thiserror::Error;

/// Errors produced while validating or generating lattice geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid structure parameters: {0}")]
    Validation(String),
}
