//! Direct dense solver for the circuit system.
//!
//! LU decomposition with partial pivoting via `faer` solves the N×N complex
//! system Z·I = V; the factorisation is deterministic for fixed inputs.
//! Singularity is detected after the fact: non-finite solution entries or a
//! relative residual ‖Z·I − V‖₂ / ‖V‖₂ above the caller's tolerance reject
//! the solve instead of returning garbage.
//!
//! Dense LU is O(N³) in time and O(N²) in memory, which is comfortable for
//! the ring counts lattice models produce (N up to a few thousand). A
//! matrix-free iterative method (GMRES) is the planned fallback for larger
//! networks.

use faer::linalg::solvers::SpSolver;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::{ModelError, ModelResult};

/// Default relative-residual tolerance for accepting a solve.
pub const DEFAULT_RESIDUAL_TOLERANCE: f64 = 1e-8;

/// Solve Z·I = V by LU decomposition.
///
/// # Arguments
/// * `matrix` - The N×N impedance matrix Z.
/// * `rhs` - The driving-voltage vector V (length N).
/// * `residual_tolerance` - Maximum accepted relative residual.
///
/// # Returns
/// The current vector I (length N), or [`ModelError::Singular`] when the
/// system is singular or ill-conditioned beyond the tolerance.
pub fn solve_direct(
    matrix: &Array2<Complex64>,
    rhs: &Array1<Complex64>,
    residual_tolerance: f64,
) -> ModelResult<Array1<Complex64>> {
    let dim = matrix.nrows();
    if matrix.ncols() != dim {
        return Err(ModelError::ShapeMismatch(format!(
            "impedance matrix must be square, got {}x{}",
            dim,
            matrix.ncols()
        )));
    }
    if rhs.len() != dim {
        return Err(ModelError::ShapeMismatch(format!(
            "voltage vector length {} does not match matrix dimension {dim}",
            rhs.len()
        )));
    }

    // Convert ndarray to faer Mat<c64>
    let faer_mat = faer::Mat::<faer::complex_native::c64>::from_fn(dim, dim, |i, j| {
        let z = matrix[[i, j]];
        faer::complex_native::c64::new(z.re, z.im)
    });
    let faer_rhs = faer::Col::<faer::complex_native::c64>::from_fn(dim, |i| {
        let v = rhs[i];
        faer::complex_native::c64::new(v.re, v.im)
    });

    // LU decomposition with partial pivoting
    let lu = faer_mat.partial_piv_lu();
    let faer_sol = lu.solve(&faer_rhs);

    let solution = Array1::from_vec(
        (0..dim)
            .map(|i| {
                let c = faer_sol[i];
                Complex64::new(c.re, c.im)
            })
            .collect(),
    );

    if solution
        .iter()
        .any(|c| !c.re.is_finite() || !c.im.is_finite())
    {
        return Err(ModelError::Singular {
            residual: f64::INFINITY,
            tolerance: residual_tolerance,
        });
    }

    let residual_vec = matrix.dot(&solution) - rhs;
    let residual_norm = residual_vec.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    let rhs_norm = rhs.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    let relative = residual_norm / rhs_norm.max(f64::MIN_POSITIVE);
    if relative > residual_tolerance {
        return Err(ModelError::Singular {
            residual: relative,
            tolerance: residual_tolerance,
        });
    }

    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_solve_identity_system() {
        // Zx = v where Z = I, so x = v
        let dim = 6;
        let mut matrix = Array2::<Complex64>::zeros((dim, dim));
        for i in 0..dim {
            matrix[[i, i]] = Complex64::from(1.0);
        }
        let rhs = Array1::from_vec((0..dim).map(|i| Complex64::new(i as f64, 0.0)).collect());

        let sol = solve_direct(&matrix, &rhs, DEFAULT_RESIDUAL_TOLERANCE).unwrap();
        for i in 0..dim {
            assert!((sol[i] - rhs[i]).norm() < 1e-12);
        }
    }

    #[test]
    fn test_solve_complex_system() {
        // 2x2 complex system
        let matrix = Array2::from_shape_vec(
            (2, 2),
            vec![
                Complex64::new(1.0, 1.0),
                Complex64::new(2.0, 0.0),
                Complex64::new(0.0, 1.0),
                Complex64::new(3.0, -1.0),
            ],
        )
        .unwrap();
        let rhs = array![Complex64::new(5.0, 1.0), Complex64::new(4.0, 2.0)];

        let sol = solve_direct(&matrix, &rhs, DEFAULT_RESIDUAL_TOLERANCE).unwrap();

        let check = matrix.dot(&sol);
        for i in 0..2 {
            assert!(
                (check[i] - rhs[i]).norm() < 1e-10,
                "Mismatch at {}: got {:?}, expected {:?}",
                i,
                check[i],
                rhs[i]
            );
        }
    }

    #[test]
    fn test_zero_rhs_gives_zero_solution() {
        let matrix = array![
            [Complex64::new(2.0, 1.0), Complex64::new(0.5, 0.0)],
            [Complex64::new(0.5, 0.0), Complex64::new(2.0, -1.0)],
        ];
        let rhs = Array1::<Complex64>::zeros(2);

        let sol = solve_direct(&matrix, &rhs, DEFAULT_RESIDUAL_TOLERANCE).unwrap();
        for c in sol.iter() {
            assert_eq!(*c, Complex64::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_singular_system_is_rejected() {
        // Rank-1 matrix with an inconsistent right-hand side.
        let matrix = array![
            [Complex64::from(1.0), Complex64::from(1.0)],
            [Complex64::from(1.0), Complex64::from(1.0)],
        ];
        let rhs = array![Complex64::from(1.0), Complex64::from(0.0)];

        let err = solve_direct(&matrix, &rhs, DEFAULT_RESIDUAL_TOLERANCE).unwrap_err();
        assert!(matches!(err, ModelError::Singular { .. }));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let matrix = Array2::<Complex64>::zeros((2, 2));
        let rhs = Array1::<Complex64>::zeros(3);
        let err = solve_direct(&matrix, &rhs, DEFAULT_RESIDUAL_TOLERANCE).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch(_)));
    }
}
