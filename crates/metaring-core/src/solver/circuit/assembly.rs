//! Impedance matrix assembly for the coupled-circuit model.
//!
//! Constructs the N×N complex impedance matrix Z where:
//!
//! - Diagonal (i = i): the ring's self-impedance Z₀ = R + jωL + 1/(jωC).
//! - Off-diagonal (i ≠ j): the mutual term jω·M\[i,j\].
//!
//! The self-consistent currents I satisfy Z·I = V with V the external
//! driving-voltage vector.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{ModelError, ModelResult};
use crate::types::RingElement;

/// Relative tolerance for the coupling-matrix symmetry check.
const SYMMETRY_TOL: f64 = 1e-9;

/// Assemble the impedance matrix from per-ring circuit parameters and the
/// mutual-coupling matrix.
///
/// Uniform R/L/C across the lattice is the common case, but each
/// [`RingElement`] carries its own values, so spatially graded circuits
/// assemble through the same path.
pub fn assemble_impedance_matrix(
    rings: &[RingElement],
    coupling: &Array2<f64>,
    omega: f64,
) -> ModelResult<Array2<Complex64>> {
    let n = rings.len();
    if omega <= 0.0 {
        return Err(ModelError::Validation(format!(
            "angular frequency must be positive, got {omega}"
        )));
    }
    if coupling.nrows() != n || coupling.ncols() != n {
        return Err(ModelError::ShapeMismatch(format!(
            "coupling matrix is {}x{}, expected {n}x{n}",
            coupling.nrows(),
            coupling.ncols()
        )));
    }

    let scale = coupling
        .iter()
        .fold(0.0_f64, |acc, m| acc.max(m.abs()))
        .max(f64::MIN_POSITIVE);
    for i in 0..n {
        for j in (i + 1)..n {
            if (coupling[[i, j]] - coupling[[j, i]]).abs() > SYMMETRY_TOL * scale {
                return Err(ModelError::ShapeMismatch(format!(
                    "coupling matrix is not symmetric at ({i}, {j})"
                )));
            }
        }
    }

    let mut z = Array2::<Complex64>::zeros((n, n));
    for i in 0..n {
        z[[i, i]] = rings[i].self_impedance(omega);
        for j in 0..n {
            if i != j {
                z[[i, j]] = Complex64::new(0.0, omega * coupling[[i, j]]);
            }
        }
    }
    Ok(z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn test_ring() -> RingElement {
        RingElement {
            position: [0.0; 3],
            normal: [0.0, 0.0, 1.0],
            resistance: 2.0,
            inductance: 1.5e-9,
            capacitance: 330.0e-12,
            omega: 1.0e9,
            radius: 0.004,
            strip_width: 0.0005,
        }
    }

    #[test]
    fn test_diagonal_is_self_impedance() {
        let rings = vec![test_ring(), test_ring()];
        let coupling = array![[0.0, 1.0e-10], [1.0e-10, 0.0]];
        let omega = 1.0e9;

        let z = assemble_impedance_matrix(&rings, &coupling, omega).unwrap();
        let expected_im = omega * 1.5e-9 - 1.0 / (omega * 330.0e-12);
        for i in 0..2 {
            assert_abs_diff_eq!(z[[i, i]].re, 2.0, epsilon = 1e-12);
            assert_abs_diff_eq!(z[[i, i]].im, expected_im, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_off_diagonal_is_j_omega_m() {
        let rings = vec![test_ring(), test_ring()];
        let m = 3.0e-10;
        let coupling = array![[0.0, m], [m, 0.0]];
        let omega = 1.0e9;

        let z = assemble_impedance_matrix(&rings, &coupling, omega).unwrap();
        assert_abs_diff_eq!(z[[0, 1]].re, 0.0);
        assert_abs_diff_eq!(z[[0, 1]].im, omega * m, epsilon = 1e-12);
        assert_eq!(z[[0, 1]], z[[1, 0]]);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let rings = vec![test_ring(), test_ring()];
        let coupling = Array2::<f64>::zeros((3, 3));
        let err = assemble_impedance_matrix(&rings, &coupling, 1.0e9).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch(_)));
    }

    #[test]
    fn test_rejects_asymmetric_coupling() {
        let rings = vec![test_ring(), test_ring()];
        let coupling = array![[0.0, 1.0e-10], [2.0e-10, 0.0]];
        let err = assemble_impedance_matrix(&rings, &coupling, 1.0e9).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch(_)));
    }

    #[test]
    fn test_rejects_non_positive_frequency() {
        let rings = vec![test_ring()];
        let coupling = Array2::<f64>::zeros((1, 1));
        let err = assemble_impedance_matrix(&rings, &coupling, 0.0).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
    }
}
