//! Core types shared across the Metaring framework.
//!
//! This module defines the fundamental data structures used throughout the
//! simulation pipeline: ring elements, the owned ring-network aggregate,
//! the external drive field, and the solved-response container.

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// A single conducting ring resonator, lumped into a series RLC circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingElement {
    /// Ring centre (m).
    pub position: [f64; 3],
    /// Unit normal of the ring plane. ‖normal‖ = 1 is maintained by
    /// [`RingNetwork::add_ring`].
    pub normal: [f64; 3],
    /// Series resistance (Ω).
    pub resistance: f64,
    /// Self-inductance (H).
    pub inductance: f64,
    /// Lumped capacitance (F).
    pub capacitance: f64,
    /// Angular drive frequency ω = 2πf (rad/s) recorded at construction.
    pub omega: f64,
    /// Loop radius (m).
    pub radius: f64,
    /// Conductor strip width (m).
    pub strip_width: f64,
}

impl RingElement {
    /// Loop area π·r² (m²).
    pub fn loop_area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }

    /// Self-impedance Z₀ = R + jωL + 1/(jωC) at the given angular frequency.
    pub fn self_impedance(&self, omega: f64) -> Complex64 {
        let inductive = Complex64::new(0.0, omega * self.inductance);
        let capacitive = Complex64::from(1.0) / Complex64::new(0.0, omega * self.capacitance);
        Complex64::from(self.resistance) + inductive + capacitive
    }
}

/// An ordered collection of rings with position/orientation snapshot arrays
/// kept in lock-step with the ring sequence.
///
/// The three sequences always agree in length, and index `i` refers to the
/// same physical ring in all of them; keeping them inside one owned
/// aggregate preserves that invariant mechanically.
#[derive(Debug, Clone, Default)]
pub struct RingNetwork {
    rings: Vec<RingElement>,
    positions: Vec<[f64; 3]>,
    orientations: Vec<[f64; 3]>,
}

impl RingNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Append a ring, normalising its orientation. A zero-length
    /// orientation is rejected. Existing entries are never reordered.
    #[allow(clippy::too_many_arguments)]
    pub fn add_ring(
        &mut self,
        position: [f64; 3],
        orientation: [f64; 3],
        resistance: f64,
        inductance: f64,
        capacitance: f64,
        omega: f64,
        radius: f64,
        strip_width: f64,
    ) -> ModelResult<()> {
        let norm = (orientation[0] * orientation[0]
            + orientation[1] * orientation[1]
            + orientation[2] * orientation[2])
            .sqrt();
        if norm <= f64::EPSILON {
            return Err(ModelError::Validation(
                "ring orientation must have non-zero length".into(),
            ));
        }
        let normal = [
            orientation[0] / norm,
            orientation[1] / norm,
            orientation[2] / norm,
        ];

        self.rings.push(RingElement {
            position,
            normal,
            resistance,
            inductance,
            capacitance,
            omega,
            radius,
            strip_width,
        });
        self.positions.push(position);
        self.orientations.push(normal);
        Ok(())
    }

    /// Remove the ring at `index`, preserving the relative order of the
    /// remaining rings. Fails without modifying the network when the index
    /// is out of range.
    pub fn remove_ring(&mut self, index: usize) -> ModelResult<RingElement> {
        if index >= self.rings.len() {
            return Err(ModelError::Validation(format!(
                "ring index {index} out of range for {} rings",
                self.rings.len()
            )));
        }
        self.positions.remove(index);
        self.orientations.remove(index);
        Ok(self.rings.remove(index))
    }

    /// Current position snapshot. Not stable across subsequent mutations.
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    /// Current orientation snapshot. Not stable across subsequent mutations.
    pub fn orientations(&self) -> &[[f64; 3]] {
        &self.orientations
    }

    pub fn rings(&self) -> &[RingElement] {
        &self.rings
    }
}

/// Uniform external magnetic drive field.
///
/// The quasi-static analogue of an incident wave: the field is sampled at
/// every ring centre and projected onto the ring normals by the excitation
/// module. A spatially varying drive would extend `sample_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveField {
    /// Field direction (normalised when sampled).
    pub direction: [f64; 3],
    /// Field amplitude (T).
    pub amplitude: f64,
}

impl Default for DriveField {
    fn default() -> Self {
        Self {
            direction: [0.0, 0.0, 1.0],
            amplitude: 1.0e-6,
        }
    }
}

impl DriveField {
    /// Sample the B field at each position (T).
    pub fn sample_at(&self, positions: &[[f64; 3]]) -> ModelResult<Vec<[f64; 3]>> {
        let norm = (self.direction[0] * self.direction[0]
            + self.direction[1] * self.direction[1]
            + self.direction[2] * self.direction[2])
            .sqrt();
        if norm <= f64::EPSILON {
            return Err(ModelError::Validation(
                "drive field direction must have non-zero length".into(),
            ));
        }
        let b = [
            self.direction[0] / norm * self.amplitude,
            self.direction[1] / norm * self.amplitude,
            self.direction[2] / norm * self.amplitude,
        ];
        Ok(vec![b; positions.len()])
    }
}

/// The solved per-ring currents for a given drive.
#[derive(Debug, Clone)]
pub struct CurrentResponse {
    /// Drive frequency (Hz).
    pub frequency_hz: f64,
    /// Complex ring currents (A), length N.
    pub currents: Array1<Complex64>,
    /// Driving voltages −jωΦ (V), length N.
    pub driving_voltages: Array1<Complex64>,
}

impl CurrentResponse {
    /// Time-averaged dissipated power Σ ½·Rᵢ·|Iᵢ|² (W).
    pub fn dissipated_power(&self, rings: &[RingElement]) -> f64 {
        rings
            .iter()
            .zip(self.currents.iter())
            .map(|(ring, i)| 0.5 * ring.resistance * i.norm_sqr())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn add_default_ring(network: &mut RingNetwork, orientation: [f64; 3]) -> ModelResult<()> {
        network.add_ring(
            [0.0, 0.0, 0.0],
            orientation,
            1.0,
            1.0e-9,
            470.0e-12,
            2.0 * std::f64::consts::PI * 1.0e6,
            0.003,
            0.0005,
        )
    }

    #[test]
    fn test_add_ring_normalises_orientation() {
        let mut network = RingNetwork::new();
        add_default_ring(&mut network, [0.0, 0.0, 2.0]).unwrap();
        assert_eq!(network.orientations()[0], [0.0, 0.0, 1.0]);
        assert_eq!(network.rings()[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_add_ring_rejects_zero_orientation() {
        let mut network = RingNetwork::new();
        let err = add_default_ring(&mut network, [0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert!(network.is_empty());
    }

    #[test]
    fn test_snapshots_stay_in_lock_step() {
        let mut network = RingNetwork::new();
        add_default_ring(&mut network, [1.0, 0.0, 0.0]).unwrap();
        add_default_ring(&mut network, [0.0, 1.0, 0.0]).unwrap();
        add_default_ring(&mut network, [0.0, 0.0, 1.0]).unwrap();
        assert_eq!(network.len(), 3);
        assert_eq!(network.positions().len(), 3);
        assert_eq!(network.orientations().len(), 3);

        network.remove_ring(1).unwrap();
        assert_eq!(network.len(), 2);
        assert_eq!(network.positions().len(), 2);
        assert_eq!(network.orientations().len(), 2);
        // The survivors keep their relative order.
        assert_eq!(network.orientations()[0], [1.0, 0.0, 0.0]);
        assert_eq!(network.orientations()[1], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_remove_ring_out_of_range_leaves_network_unchanged() {
        let mut network = RingNetwork::new();
        add_default_ring(&mut network, [0.0, 0.0, 1.0]).unwrap();
        let err = network.remove_ring(5).unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert_eq!(network.len(), 1);
    }

    #[test]
    fn test_self_impedance_matches_series_rlc() {
        let mut network = RingNetwork::new();
        add_default_ring(&mut network, [0.0, 0.0, 1.0]).unwrap();
        let ring = &network.rings()[0];
        let omega = 2.0 * std::f64::consts::PI * 1.0e8;

        let z = ring.self_impedance(omega);
        assert_abs_diff_eq!(z.re, 1.0, epsilon = 1e-12);
        let expected_im = omega * 1.0e-9 - 1.0 / (omega * 470.0e-12);
        assert_abs_diff_eq!(z.im, expected_im, epsilon = 1e-9);
    }

    #[test]
    fn test_loop_area() {
        let mut network = RingNetwork::new();
        add_default_ring(&mut network, [0.0, 0.0, 1.0]).unwrap();
        let area = network.rings()[0].loop_area();
        assert_abs_diff_eq!(area, std::f64::consts::PI * 9.0e-6, epsilon = 1e-18);
    }

    #[test]
    fn test_drive_field_sampling() {
        let field = DriveField {
            direction: [0.0, 3.0, 0.0],
            amplitude: 2.0e-6,
        };
        let samples = field.sample_at(&[[0.0; 3], [1.0; 3]]).unwrap();
        assert_eq!(samples.len(), 2);
        assert_abs_diff_eq!(samples[0][1], 2.0e-6, epsilon = 1e-18);
        assert_abs_diff_eq!(samples[0][0], 0.0);

        let degenerate = DriveField {
            direction: [0.0; 3],
            amplitude: 1.0,
        };
        assert!(degenerate.sample_at(&[[0.0; 3]]).is_err());
    }
}
