//! External-field excitation: flux projection and driving voltages.
//!
//! A ring links flux Φᵢ = (Bᵢ·n̂ᵢ)·Aᵢ from the applied field, independent of
//! every other ring's current; the induced EMF enters the circuit system as
//! the driving voltage Vᵢ = −jω·Φᵢ.

use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{ModelError, ModelResult};
use crate::types::{DriveField, RingNetwork};

/// Project per-ring field samples onto ring normals.
///
/// # Arguments
/// * `b_field` - B sample at each ring centre (T), length N.
/// * `orientations` - Unit ring normals, length N.
/// * `areas` - Loop areas (m²), length N.
pub fn external_flux(
    b_field: &[[f64; 3]],
    orientations: &[[f64; 3]],
    areas: &[f64],
) -> ModelResult<Array1<f64>> {
    if b_field.len() != orientations.len() || b_field.len() != areas.len() {
        return Err(ModelError::ShapeMismatch(format!(
            "field samples ({}), orientations ({}), and areas ({}) must agree in length",
            b_field.len(),
            orientations.len(),
            areas.len()
        )));
    }

    Ok(Array1::from_iter(
        b_field
            .iter()
            .zip(orientations.iter())
            .zip(areas.iter())
            .map(|((b, n), area)| (b[0] * n[0] + b[1] * n[1] + b[2] * n[2]) * area),
    ))
}

/// Flux through every ring of a network under a drive field (Wb).
pub fn network_flux(network: &RingNetwork, drive: &DriveField) -> ModelResult<Array1<f64>> {
    let samples = drive.sample_at(network.positions())?;
    let areas: Vec<f64> = network.rings().iter().map(|r| r.loop_area()).collect();
    external_flux(&samples, network.orientations(), &areas)
}

/// Driving-voltage vector Vᵢ = −jω·Φᵢ (V).
pub fn driving_voltage(flux: &Array1<f64>, omega: f64) -> Array1<Complex64> {
    flux.mapv(|phi| Complex64::new(0.0, -omega * phi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_flux_projects_onto_normals() {
        let b = [[0.0, 0.0, 2.0e-6]; 3];
        let orientations = [
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.70710678118654752, 0.70710678118654752],
        ];
        let areas = [1.0e-4; 3];

        let flux = external_flux(&b, &orientations, &areas).unwrap();
        assert_abs_diff_eq!(flux[0], 2.0e-10, epsilon = 1e-20);
        assert_abs_diff_eq!(flux[1], 0.0, epsilon = 1e-20);
        // 45° ring links cos(45°) of the aligned flux.
        assert_abs_diff_eq!(flux[2], 2.0e-10 * 0.70710678118654752, epsilon = 1e-20);
    }

    #[test]
    fn test_flux_is_linear_in_field_amplitude() {
        let orientations = [[0.0, 0.0, 1.0]];
        let areas = [3.0e-5];

        let f1 = external_flux(&[[0.0, 0.0, 1.0e-6]], &orientations, &areas).unwrap();
        let f3 = external_flux(&[[0.0, 0.0, 3.0e-6]], &orientations, &areas).unwrap();
        assert_abs_diff_eq!(f3[0], 3.0 * f1[0], epsilon = 1e-22);
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let err = external_flux(&[[0.0; 3]; 2], &[[0.0, 0.0, 1.0]], &[1.0]).unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch(_)));
    }

    #[test]
    fn test_driving_voltage_is_minus_j_omega_phi() {
        let flux = Array1::from_vec(vec![2.0e-10, -1.0e-10]);
        let omega = 1.0e9;

        let v = driving_voltage(&flux, omega);
        assert_abs_diff_eq!(v[0].re, 0.0);
        assert_abs_diff_eq!(v[0].im, -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(v[1].im, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_network_flux_uses_ring_geometry() {
        let mut network = RingNetwork::new();
        network
            .add_ring(
                [0.0; 3],
                [0.0, 0.0, 1.0],
                1.0,
                1.0e-9,
                470.0e-12,
                1.0e9,
                0.005,
                0.0005,
            )
            .unwrap();
        let drive = DriveField {
            direction: [0.0, 0.0, 1.0],
            amplitude: 1.0e-6,
        };

        let flux = network_flux(&network, &drive).unwrap();
        let area = std::f64::consts::PI * 0.005 * 0.005;
        assert_abs_diff_eq!(flux[0], 1.0e-6 * area, epsilon = 1e-18);
    }
}
