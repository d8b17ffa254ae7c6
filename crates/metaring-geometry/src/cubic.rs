//! Cubic ring-lattice generation.
//!
//! A cubic metastructure is a regular grid of `num_cubes` unit cubes with
//! lattice constant `cube_size * unit_size` metres. Rings can be placed on
//! cube faces, at edge midpoints, and on lattice vertices, each category
//! gated by its own inclusion flag.
//!
//! Ring ordering is part of the contract: sites are emitted as faces-X,
//! faces-Y, faces-Z, edges-X, edges-Y, edges-Z, corners, each category in
//! nested x/y/z loop order with z varying fastest, so a rerun with the same
//! parameters reproduces index-for-index the same placement.

use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// Parameters of a cubic ring lattice.
///
/// One canonical record per structure variant; every field has a typical
/// default, so TOML jobs only spell out what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubicStructure {
    /// Number of unit cubes along x, y, z.
    pub num_cubes: [usize; 3],
    /// Cube edge length in lattice units.
    pub cube_size: f64,
    /// Metres per lattice unit.
    pub unit_size: f64,
    /// Ring loop radius (m).
    pub ring_radius: f64,
    /// Conductor strip width (m).
    pub strip_width: f64,
    /// Per-ring series resistance (Ω).
    pub resistance: f64,
    /// Per-ring self-inductance (H).
    pub inductance: f64,
    /// Per-ring lumped capacitance (F).
    pub capacitance: f64,
    /// Drive frequency (Hz).
    pub frequency: f64,
    /// Place a ring on every unit-cube face.
    pub rings_on_faces: bool,
    /// Place a ring at every unit-edge midpoint.
    pub rings_on_edges: bool,
    /// Place a ring on every lattice vertex.
    pub rings_on_corners: bool,
}

impl Default for CubicStructure {
    fn default() -> Self {
        Self {
            num_cubes: [1, 1, 1],
            cube_size: 1.0,
            unit_size: 0.01,
            ring_radius: 0.003,
            strip_width: 0.0005,
            resistance: 1.0,
            inductance: 1.0e-9,
            capacitance: 470.0e-12,
            frequency: 1.0e6,
            rings_on_faces: true,
            rings_on_edges: true,
            rings_on_corners: true,
        }
    }
}

/// Vertex/edge/face soup of a generated lattice.
///
/// Edges and faces are emitted per unit cube (12 and 6 respectively) with
/// no deduplication across shared cube boundaries, so an interior edge
/// appears once for every cube scan that produces it. Consumers needing a
/// deduplicated wireframe must collapse index pairs themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatticeGeometry {
    /// Grid points, lexicographic in (x, y, z) with z fastest.
    pub vertices: Vec<[f64; 3]>,
    /// Vertex-index pairs, 12 per unit cube.
    pub edges: Vec<[usize; 2]>,
    /// Ordered 4-vertex loops, 6 per unit cube.
    pub faces: Vec<[usize; 4]>,
}

/// A ring placement produced by a structure generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSite {
    /// Ring centre (m).
    pub position: [f64; 3],
    /// Unit normal of the ring plane.
    pub normal: [f64; 3],
    /// Circuit parameters attached to this ring.
    pub params: RingParams,
}

/// Lumped-circuit and conductor parameters attached to a ring site.
///
/// Uniform across the lattice in the current scope; carried per site so a
/// future variant can grade them spatially without an interface change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingParams {
    pub resistance: f64,
    pub inductance: f64,
    pub capacitance: f64,
    /// Angular drive frequency ω = 2πf (rad/s).
    pub omega: f64,
    pub radius: f64,
    pub strip_width: f64,
}

impl CubicStructure {
    /// Lattice constant `cube_size * unit_size` (m).
    pub fn lattice_constant(&self) -> f64 {
        self.cube_size * self.unit_size
    }

    /// Reject non-positive grid dimensions, sizes, or drive frequency.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let [gx, gy, gz] = self.num_cubes;
        if gx == 0 || gy == 0 || gz == 0 {
            return Err(GeometryError::Validation(format!(
                "grid dimensions must be positive, got {gx}x{gy}x{gz}"
            )));
        }
        if self.cube_size <= 0.0 {
            return Err(GeometryError::Validation(format!(
                "cube_size must be positive, got {}",
                self.cube_size
            )));
        }
        if self.unit_size <= 0.0 {
            return Err(GeometryError::Validation(format!(
                "unit_size must be positive, got {}",
                self.unit_size
            )));
        }
        if self.ring_radius <= 0.0 {
            return Err(GeometryError::Validation(format!(
                "ring_radius must be positive, got {}",
                self.ring_radius
            )));
        }
        if self.strip_width <= 0.0 {
            return Err(GeometryError::Validation(format!(
                "strip_width must be positive, got {}",
                self.strip_width
            )));
        }
        if self.frequency <= 0.0 {
            return Err(GeometryError::Validation(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        Ok(())
    }

    /// Enumerate lattice vertices, edges, and faces.
    ///
    /// Vertices are ordered lexicographically by (x, y, z) with z fastest.
    /// Each unit cube contributes its 12 local edges (4 x-aligned, then 4
    /// y-aligned, then 4 z-aligned) and its 6 faces in −x, +x, −y, +y, −z,
    /// +z order.
    pub fn generate_geometry(&self) -> Result<LatticeGeometry, GeometryError> {
        self.validate()?;
        let [gx, gy, gz] = self.num_cubes;
        let a = self.lattice_constant();

        let mut vertices = Vec::with_capacity((gx + 1) * (gy + 1) * (gz + 1));
        for i in 0..=gx {
            for j in 0..=gy {
                for k in 0..=gz {
                    vertices.push([i as f64 * a, j as f64 * a, k as f64 * a]);
                }
            }
        }

        let vidx = |i: usize, j: usize, k: usize| (i * (gy + 1) + j) * (gz + 1) + k;

        let mut edges = Vec::with_capacity(12 * gx * gy * gz);
        let mut faces = Vec::with_capacity(6 * gx * gy * gz);
        for i in 0..gx {
            for j in 0..gy {
                for k in 0..gz {
                    // Cube corners: bit 0 = +x, bit 1 = +y, bit 2 = +z.
                    let c = [
                        vidx(i, j, k),
                        vidx(i + 1, j, k),
                        vidx(i, j + 1, k),
                        vidx(i + 1, j + 1, k),
                        vidx(i, j, k + 1),
                        vidx(i + 1, j, k + 1),
                        vidx(i, j + 1, k + 1),
                        vidx(i + 1, j + 1, k + 1),
                    ];
                    edges.extend_from_slice(&[
                        [c[0], c[1]],
                        [c[2], c[3]],
                        [c[4], c[5]],
                        [c[6], c[7]],
                        [c[0], c[2]],
                        [c[1], c[3]],
                        [c[4], c[6]],
                        [c[5], c[7]],
                        [c[0], c[4]],
                        [c[1], c[5]],
                        [c[2], c[6]],
                        [c[3], c[7]],
                    ]);
                    faces.extend_from_slice(&[
                        [c[0], c[2], c[6], c[4]],
                        [c[1], c[3], c[7], c[5]],
                        [c[0], c[1], c[5], c[4]],
                        [c[2], c[3], c[7], c[6]],
                        [c[0], c[1], c[3], c[2]],
                        [c[4], c[5], c[7], c[6]],
                    ]);
                }
            }
        }

        Ok(LatticeGeometry {
            vertices,
            edges,
            faces,
        })
    }

    /// Enumerate ring placements for the enabled categories.
    ///
    /// Face rings sit on every axis-aligned unit-cube face with the outward
    /// axis normal, flipped to negative only on the far boundary plane of
    /// that axis. Edge rings sit at unit-edge midpoints oriented along the
    /// edge. Corner rings sit on every vertex along the (1,1,1) diagonal.
    pub fn ring_sites(&self) -> Result<Vec<RingSite>, GeometryError> {
        self.validate()?;
        let [gx, gy, gz] = self.num_cubes;
        let a = self.lattice_constant();
        let params = self.ring_params();
        let mut sites = Vec::new();

        if self.rings_on_faces {
            for i in 0..=gx {
                let normal = if i == gx {
                    [-1.0, 0.0, 0.0]
                } else {
                    [1.0, 0.0, 0.0]
                };
                for j in 0..gy {
                    for k in 0..gz {
                        sites.push(RingSite {
                            position: [
                                i as f64 * a,
                                (j as f64 + 0.5) * a,
                                (k as f64 + 0.5) * a,
                            ],
                            normal,
                            params,
                        });
                    }
                }
            }
            for i in 0..gx {
                for j in 0..=gy {
                    let normal = if j == gy {
                        [0.0, -1.0, 0.0]
                    } else {
                        [0.0, 1.0, 0.0]
                    };
                    for k in 0..gz {
                        sites.push(RingSite {
                            position: [
                                (i as f64 + 0.5) * a,
                                j as f64 * a,
                                (k as f64 + 0.5) * a,
                            ],
                            normal,
                            params,
                        });
                    }
                }
            }
            for i in 0..gx {
                for j in 0..gy {
                    for k in 0..=gz {
                        let normal = if k == gz {
                            [0.0, 0.0, -1.0]
                        } else {
                            [0.0, 0.0, 1.0]
                        };
                        sites.push(RingSite {
                            position: [
                                (i as f64 + 0.5) * a,
                                (j as f64 + 0.5) * a,
                                k as f64 * a,
                            ],
                            normal,
                            params,
                        });
                    }
                }
            }
        }

        if self.rings_on_edges {
            for i in 0..gx {
                for j in 0..=gy {
                    for k in 0..=gz {
                        sites.push(RingSite {
                            position: [(i as f64 + 0.5) * a, j as f64 * a, k as f64 * a],
                            normal: [1.0, 0.0, 0.0],
                            params,
                        });
                    }
                }
            }
            for i in 0..=gx {
                for j in 0..gy {
                    for k in 0..=gz {
                        sites.push(RingSite {
                            position: [i as f64 * a, (j as f64 + 0.5) * a, k as f64 * a],
                            normal: [0.0, 1.0, 0.0],
                            params,
                        });
                    }
                }
            }
            for i in 0..=gx {
                for j in 0..=gy {
                    for k in 0..gz {
                        sites.push(RingSite {
                            position: [i as f64 * a, j as f64 * a, (k as f64 + 0.5) * a],
                            normal: [0.0, 0.0, 1.0],
                            params,
                        });
                    }
                }
            }
        }

        if self.rings_on_corners {
            let d = 1.0 / 3.0_f64.sqrt();
            let normal = [d, d, d];
            for i in 0..=gx {
                for j in 0..=gy {
                    for k in 0..=gz {
                        sites.push(RingSite {
                            position: [i as f64 * a, j as f64 * a, k as f64 * a],
                            normal,
                            params,
                        });
                    }
                }
            }
        }

        Ok(sites)
    }

    fn ring_params(&self) -> RingParams {
        RingParams {
            resistance: self.resistance,
            inductance: self.inductance,
            capacitance: self.capacitance,
            omega: 2.0 * std::f64::consts::PI * self.frequency,
            radius: self.ring_radius,
            strip_width: self.strip_width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid(nx: usize, ny: usize, nz: usize) -> CubicStructure {
        CubicStructure {
            num_cubes: [nx, ny, nz],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_parameters_validate() {
        assert!(CubicStructure::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_degenerate_parameters() {
        assert!(grid(0, 1, 1).validate().is_err());
        assert!(grid(1, 0, 1).validate().is_err());
        assert!(grid(1, 1, 0).validate().is_err());

        let mut s = CubicStructure::default();
        s.cube_size = 0.0;
        assert!(s.validate().is_err());

        let mut s = CubicStructure::default();
        s.unit_size = -0.01;
        assert!(s.validate().is_err());

        let mut s = CubicStructure::default();
        s.frequency = 0.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_vertex_count_and_ordering() {
        let s = grid(2, 2, 2);
        let geom = s.generate_geometry().unwrap();
        assert_eq!(geom.vertices.len(), 27);

        // z varies fastest: the second vertex sits one lattice step up in z.
        let a = s.lattice_constant();
        assert_abs_diff_eq!(geom.vertices[0][2], 0.0);
        assert_abs_diff_eq!(geom.vertices[1][2], a, epsilon = 1e-15);
        assert_abs_diff_eq!(geom.vertices[1][0], 0.0);
        // After a full z column the y coordinate advances.
        assert_abs_diff_eq!(geom.vertices[3][1], a, epsilon = 1e-15);
    }

    #[test]
    fn test_edge_and_face_counts() {
        let geom = grid(2, 3, 4).generate_geometry().unwrap();
        assert_eq!(geom.vertices.len(), 3 * 4 * 5);
        assert_eq!(geom.edges.len(), 12 * 2 * 3 * 4);
        assert_eq!(geom.faces.len(), 6 * 2 * 3 * 4);

        let nv = geom.vertices.len();
        assert!(geom.edges.iter().all(|e| e[0] < nv && e[1] < nv));
        assert!(geom.faces.iter().all(|f| f.iter().all(|&v| v < nv)));
    }

    #[test]
    fn test_face_ring_counts_and_normals() {
        let s = CubicStructure {
            num_cubes: [2, 2, 2],
            rings_on_faces: true,
            rings_on_edges: false,
            rings_on_corners: false,
            ..Default::default()
        };
        let sites = s.ring_sites().unwrap();
        // Per axis: (g+1) planes of g*g faces.
        assert_eq!(sites.len(), 3 * 3 * 2 * 2);

        for site in &sites {
            let n = site.normal;
            let norm = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-12);
        }

        // The normal flips only on the far boundary plane of each axis.
        let flipped_x = sites.iter().filter(|s| s.normal == [-1.0, 0.0, 0.0]).count();
        let flipped_z = sites.iter().filter(|s| s.normal == [0.0, 0.0, -1.0]).count();
        assert_eq!(flipped_x, 4);
        assert_eq!(flipped_z, 4);
    }

    #[test]
    fn test_edge_ring_counts() {
        let s = CubicStructure {
            num_cubes: [1, 1, 1],
            rings_on_faces: false,
            rings_on_edges: true,
            rings_on_corners: false,
            ..Default::default()
        };
        let sites = s.ring_sites().unwrap();
        assert_eq!(sites.len(), 12);

        // Edge rings point along their edge's axis.
        let along_x = sites.iter().filter(|s| s.normal == [1.0, 0.0, 0.0]).count();
        assert_eq!(along_x, 4);
    }

    #[test]
    fn test_corner_ring_counts_and_diagonal_normal() {
        let s = CubicStructure {
            num_cubes: [2, 1, 1],
            rings_on_faces: false,
            rings_on_edges: false,
            rings_on_corners: true,
            ..Default::default()
        };
        let sites = s.ring_sites().unwrap();
        assert_eq!(sites.len(), 3 * 2 * 2);

        let d = 1.0 / 3.0_f64.sqrt();
        for site in &sites {
            assert_abs_diff_eq!(site.normal[0], d, epsilon = 1e-15);
            assert_abs_diff_eq!(site.normal[1], d, epsilon = 1e-15);
            assert_abs_diff_eq!(site.normal[2], d, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_category_ordering_is_reproducible() {
        let s = grid(2, 2, 1);
        let first = s.ring_sites().unwrap();
        let second = s.ring_sites().unwrap();
        assert_eq!(first, second);

        // Faces come first, then edges, then corners.
        let n_face = (2 + 1) * 2 * 1 + 2 * (2 + 1) * 1 + 2 * 2 * (1 + 1);
        let n_edge = 2 * 3 * 2 + 3 * 2 * 2 + 3 * 3 * 1;
        let n_corner = 3 * 3 * 2;
        assert_eq!(first.len(), n_face + n_edge + n_corner);
        assert!(first[..n_face]
            .iter()
            .all(|s| s.normal[0].abs() == 1.0 || s.normal[1].abs() == 1.0 || s.normal[2].abs() == 1.0));
        let d = 1.0 / 3.0_f64.sqrt();
        assert!(first[n_face + n_edge..].iter().all(|s| s.normal == [d, d, d]));
    }

    #[test]
    fn test_ring_params_carry_structure_values() {
        let s = CubicStructure {
            frequency: 2.0e9,
            ring_radius: 0.004,
            ..Default::default()
        };
        let sites = s.ring_sites().unwrap();
        let p = sites[0].params;
        assert_abs_diff_eq!(p.omega, 2.0 * std::f64::consts::PI * 2.0e9, epsilon = 1.0);
        assert_abs_diff_eq!(p.radius, 0.004);
        assert_abs_diff_eq!(p.resistance, 1.0);
    }
}
