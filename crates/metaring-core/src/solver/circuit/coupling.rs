//! Mutual inductance between circular conducting loops.
//!
//! Two evaluation regimes, selected by centre-to-centre separation `d`:
//!
//! - **Far field** (`d > far_field_factor · max(r_a, r_b)`): each loop is a
//!   magnetic dipole of moment I·A, giving
//!   $$M = \frac{\mu_0 A_a A_b}{4\pi d^3}
//!       \left[3(\hat{n}_a\cdot\hat{d})(\hat{n}_b\cdot\hat{d})
//!       - \hat{n}_a\cdot\hat{n}_b\right]$$
//! - **Near field** (otherwise): the dipole form diverges as d → 0, so the
//!   Neumann double line integral
//!   $$M = \frac{\mu_0}{4\pi} \oint\oint
//!       \frac{d\mathbf{l}_a \cdot d\mathbf{l}_b}{|\mathbf{x}_a - \mathbf{x}_b|}$$
//!   is evaluated over both loop contours, discretised into straight
//!   segments. The kernel distance carries the flat-strip equivalent-radius
//!   regularisation (w/4 per conductor), which keeps overlapping contours
//!   finite.
//!
//! Loops whose centres are closer than the configured minimum separation
//! (default: sum of the two strip widths) are rejected as degenerate
//! instead of evaluated, so coincident centres never produce NaN or ∞.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{ModelError, ModelResult};
use crate::types::{RingElement, RingNetwork};

/// Vacuum permeability μ₀ (H/m).
pub const MU_0: f64 = 4.0e-7 * std::f64::consts::PI;

/// Geometry of a single circular loop as the coupling model sees it.
#[derive(Debug, Clone, Copy)]
pub struct LoopGeometry {
    /// Loop centre (m).
    pub centre: [f64; 3],
    /// Unit normal of the loop plane.
    pub normal: [f64; 3],
    /// Loop radius (m).
    pub radius: f64,
    /// Conductor strip width (m).
    pub strip_width: f64,
}

impl LoopGeometry {
    /// Build a loop geometry, normalising the normal. Zero-length normals
    /// and non-positive radii are rejected.
    pub fn new(
        centre: [f64; 3],
        normal: [f64; 3],
        radius: f64,
        strip_width: f64,
    ) -> ModelResult<Self> {
        if radius <= 0.0 {
            return Err(ModelError::Validation(format!(
                "loop radius must be positive, got {radius}"
            )));
        }
        let norm = norm3(normal);
        if norm <= f64::EPSILON {
            return Err(ModelError::Validation(
                "loop normal must have non-zero length".into(),
            ));
        }
        Ok(Self {
            centre,
            normal: [normal[0] / norm, normal[1] / norm, normal[2] / norm],
            radius,
            strip_width,
        })
    }

    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl From<&RingElement> for LoopGeometry {
    fn from(ring: &RingElement) -> Self {
        // RingNetwork::add_ring already normalised the normal.
        Self {
            centre: ring.position,
            normal: ring.normal,
            radius: ring.radius,
            strip_width: ring.strip_width,
        }
    }
}

/// Configuration of the pairwise coupling computation.
#[derive(Debug, Clone)]
pub struct CouplingModel {
    /// Separations beyond `far_field_factor · max(r_a, r_b)` use the
    /// dipole approximation; closer pairs use the Neumann integral.
    pub far_field_factor: f64,
    /// Straight segments per loop contour in the Neumann integral.
    pub contour_segments: usize,
    /// Minimum allowed centre separation (m). `None` uses the per-pair sum
    /// of strip widths.
    pub min_separation: Option<f64>,
}

impl Default for CouplingModel {
    fn default() -> Self {
        Self {
            far_field_factor: 5.0,
            contour_segments: 32,
            min_separation: None,
        }
    }
}

impl CouplingModel {
    /// Mutual inductance M between two loops (H). Symmetric in its
    /// arguments; signed, since anti-aligned loops couple negatively.
    pub fn mutual_inductance(&self, a: &LoopGeometry, b: &LoopGeometry) -> ModelResult<f64> {
        let d = [
            b.centre[0] - a.centre[0],
            b.centre[1] - a.centre[1],
            b.centre[2] - a.centre[2],
        ];
        let dist = norm3(d);
        let min_sep = self
            .min_separation
            .unwrap_or(a.strip_width + b.strip_width);
        if dist < min_sep {
            return Err(ModelError::NumericalDomain(format!(
                "loop centres {dist:.3e} m apart are closer than the minimum \
                 separation {min_sep:.3e} m"
            )));
        }

        if dist > self.far_field_factor * a.radius.max(b.radius) {
            Ok(dipole_mutual(a, b, d, dist))
        } else {
            Ok(self.neumann_mutual(a, b))
        }
    }

    /// Assemble the full N×N coupling matrix: real, symmetric, zero
    /// diagonal (self-coupling lives in the self-inductance term instead).
    ///
    /// Off-diagonal pairs depend only on two immutable ring geometries, so
    /// they are evaluated in parallel; each cell is written exactly once
    /// after the join.
    pub fn coupling_matrix(&self, network: &RingNetwork) -> ModelResult<Array2<f64>> {
        let n = network.len();
        let loops: Vec<LoopGeometry> = network.rings().iter().map(LoopGeometry::from).collect();

        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let entries = pairs
            .par_iter()
            .map(|&(i, j)| {
                self.mutual_inductance(&loops[i], &loops[j])
                    .map(|m| (i, j, m))
            })
            .collect::<ModelResult<Vec<_>>>()?;

        let mut matrix = Array2::<f64>::zeros((n, n));
        for (i, j, m) in entries {
            matrix[[i, j]] = m;
            matrix[[j, i]] = m;
        }
        Ok(matrix)
    }

    /// Neumann double line integral over both discretised loop contours.
    fn neumann_mutual(&self, a: &LoopGeometry, b: &LoopGeometry) -> f64 {
        let segments = self.contour_segments;
        let (mid_a, dl_a) = contour_segments(a, segments);
        let (mid_b, dl_b) = contour_segments(b, segments);

        // Flat-strip equivalent radius w/4 per conductor.
        let reg = 0.25 * (a.strip_width + b.strip_width);
        let reg_sq = reg * reg;

        let mut sum = 0.0;
        for i in 0..segments {
            for j in 0..segments {
                let dx = mid_a[i][0] - mid_b[j][0];
                let dy = mid_a[i][1] - mid_b[j][1];
                let dz = mid_a[i][2] - mid_b[j][2];
                let dist = (dx * dx + dy * dy + dz * dz + reg_sq).sqrt();
                sum += dot3(dl_a[i], dl_b[j]) / dist;
            }
        }

        MU_0 / (4.0 * std::f64::consts::PI) * sum
    }
}

/// Magnetic-dipole mutual inductance, valid for well-separated loops.
fn dipole_mutual(a: &LoopGeometry, b: &LoopGeometry, d: [f64; 3], dist: f64) -> f64 {
    let d_hat = [d[0] / dist, d[1] / dist, d[2] / dist];
    let alignment =
        3.0 * dot3(a.normal, d_hat) * dot3(b.normal, d_hat) - dot3(a.normal, b.normal);
    MU_0 * a.area() * b.area() / (4.0 * std::f64::consts::PI * dist.powi(3)) * alignment
}

/// Segment midpoints and segment vectors of a discretised loop contour.
fn contour_segments(loop_geom: &LoopGeometry, segments: usize) -> (Vec<[f64; 3]>, Vec<[f64; 3]>) {
    let (u, v) = loop_basis(&loop_geom.normal);
    let r = loop_geom.radius;
    let c = loop_geom.centre;
    let dtheta = 2.0 * std::f64::consts::PI / segments as f64;

    let point = |theta: f64| -> [f64; 3] {
        let (sin_t, cos_t) = theta.sin_cos();
        [
            c[0] + r * (cos_t * u[0] + sin_t * v[0]),
            c[1] + r * (cos_t * u[1] + sin_t * v[1]),
            c[2] + r * (cos_t * u[2] + sin_t * v[2]),
        ]
    };

    let mut midpoints = Vec::with_capacity(segments);
    let mut vectors = Vec::with_capacity(segments);
    for s in 0..segments {
        let theta = s as f64 * dtheta;
        let p0 = point(theta);
        let p1 = point(theta + dtheta);
        midpoints.push(point(theta + 0.5 * dtheta));
        vectors.push([p1[0] - p0[0], p1[1] - p0[1], p1[2] - p0[2]]);
    }
    (midpoints, vectors)
}

/// Orthonormal in-plane basis (u, v) for a loop with the given unit normal.
fn loop_basis(normal: &[f64; 3]) -> ([f64; 3], [f64; 3]) {
    // Choose a seed vector not parallel to the normal.
    let seed = if normal[0].abs() < 0.9 {
        [1.0, 0.0, 0.0]
    } else {
        [0.0, 1.0, 0.0]
    };

    let proj = dot3(seed, *normal);
    let mut u = [
        seed[0] - proj * normal[0],
        seed[1] - proj * normal[1],
        seed[2] - proj * normal[2],
    ];
    let u_norm = norm3(u);
    u = [u[0] / u_norm, u[1] / u_norm, u[2] / u_norm];

    let v = [
        normal[1] * u[2] - normal[2] * u[1],
        normal[2] * u[0] - normal[0] * u[2],
        normal[0] * u[1] - normal[1] * u[0],
    ];
    (u, v)
}

fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm3(a: [f64; 3]) -> f64 {
    dot3(a, a).sqrt()
}
