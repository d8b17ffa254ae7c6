//! Structure-type registry.
//!
//! Every supported metastructure variant is an explicit enum arm carrying
//! its canonical parameter record; generation and validation dispatch
//! through `match`. Adding a variant (split-ring `Srr` and capacitively
//! loaded `Clr` are the planned next ones) extends the enum rather than
//! probing runtime attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cubic::{CubicStructure, LatticeGeometry, RingSite};
use crate::GeometryError;

/// A metastructure variant selected at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Structure {
    Cubic(CubicStructure),
}

impl Default for Structure {
    fn default() -> Self {
        Structure::Cubic(CubicStructure::default())
    }
}

impl Structure {
    /// Variant name as spelled in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Structure::Cubic(_) => "cubic",
        }
    }

    /// Check the parameter record for this variant.
    pub fn validate(&self) -> Result<(), GeometryError> {
        match self {
            Structure::Cubic(c) => c.validate(),
        }
    }

    /// Enumerate lattice vertices, edges, and faces.
    pub fn generate_geometry(&self) -> Result<LatticeGeometry, GeometryError> {
        match self {
            Structure::Cubic(c) => c.generate_geometry(),
        }
    }

    /// Enumerate ring placements with their circuit parameters.
    pub fn ring_sites(&self) -> Result<Vec<RingSite>, GeometryError> {
        match self {
            Structure::Cubic(c) => c.ring_sites(),
        }
    }

    /// Drive frequency declared by the parameter record (Hz).
    pub fn frequency_hz(&self) -> f64 {
        match self {
            Structure::Cubic(c) => c.frequency,
        }
    }

    /// Flat numeric view of the parameter record, for reports and the
    /// persisted solution artifact. Booleans are recorded as 0/1.
    pub fn parameter_map(&self) -> BTreeMap<String, f64> {
        match self {
            Structure::Cubic(c) => {
                let flag = |b: bool| if b { 1.0 } else { 0.0 };
                let mut map = BTreeMap::new();
                map.insert("num_cubes_x".into(), c.num_cubes[0] as f64);
                map.insert("num_cubes_y".into(), c.num_cubes[1] as f64);
                map.insert("num_cubes_z".into(), c.num_cubes[2] as f64);
                map.insert("cube_size".into(), c.cube_size);
                map.insert("unit_size".into(), c.unit_size);
                map.insert("ring_radius".into(), c.ring_radius);
                map.insert("strip_width".into(), c.strip_width);
                map.insert("resistance".into(), c.resistance);
                map.insert("inductance".into(), c.inductance);
                map.insert("capacitance".into(), c.capacitance);
                map.insert("frequency".into(), c.frequency);
                map.insert("rings_on_faces".into(), flag(c.rings_on_faces));
                map.insert("rings_on_edges".into(), flag(c.rings_on_edges));
                map.insert("rings_on_corners".into(), flag(c.rings_on_corners));
                map
            }
        }
    }
}
