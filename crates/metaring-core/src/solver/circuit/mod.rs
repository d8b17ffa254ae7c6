//! Magnetoinductive coupled-circuit solver.
//!
//! Models each ring as a lumped series RLC circuit magnetically coupled to
//! every other ring. The per-ring currents satisfy the N×N complex system
//!
//! $$\mathbf{Z}\,\mathbf{I} = \mathbf{V}$$
//!
//! with Z assembled from self-impedances and mutual inductances
//! ([`assembly`], [`coupling`]) and V the EMF induced by the external drive
//! field ([`crate::excitation`]).
//!
//! # Method selection
//!
//! The dense system is solved directly by LU decomposition ([`direct`]),
//! exact and appropriate for the ring counts lattice models produce. An
//! iterative fallback for very large networks is a planned extension.

pub mod assembly;
pub mod coupling;
pub mod direct;

use crate::error::{ModelError, ModelResult};
use crate::excitation;
use crate::solver::ResponseSolver;
use crate::types::{CurrentResponse, DriveField, RingNetwork};

use self::coupling::CouplingModel;

/// The coupled-circuit solver, holding configuration for the numerical
/// method and the external drive.
#[derive(Debug, Clone)]
pub struct CircuitSolver {
    /// Mutual-coupling evaluation settings.
    pub coupling: CouplingModel,
    /// External drive field.
    pub drive: DriveField,
    /// Relative-residual tolerance for accepting the direct solve.
    pub residual_tolerance: f64,
}

impl Default for CircuitSolver {
    fn default() -> Self {
        Self {
            coupling: CouplingModel::default(),
            drive: DriveField::default(),
            residual_tolerance: direct::DEFAULT_RESIDUAL_TOLERANCE,
        }
    }
}

impl CircuitSolver {
    /// Create a solver for the given drive field with default numerics.
    pub fn with_drive(drive: DriveField) -> Self {
        Self {
            drive,
            ..Default::default()
        }
    }
}

impl ResponseSolver for CircuitSolver {
    fn solve_currents(
        &self,
        network: &RingNetwork,
        frequency_hz: f64,
    ) -> ModelResult<CurrentResponse> {
        if network.is_empty() {
            return Err(ModelError::Validation("no rings in the network".into()));
        }
        if frequency_hz <= 0.0 {
            return Err(ModelError::Validation(format!(
                "drive frequency must be positive, got {frequency_hz}"
            )));
        }
        let omega = 2.0 * std::f64::consts::PI * frequency_hz;

        let coupling = self.coupling.coupling_matrix(network)?;
        let impedance = assembly::assemble_impedance_matrix(network.rings(), &coupling, omega)?;
        let flux = excitation::network_flux(network, &self.drive)?;
        let voltages = excitation::driving_voltage(&flux, omega);
        let currents = direct::solve_direct(&impedance, &voltages, self.residual_tolerance)?;

        Ok(CurrentResponse {
            frequency_hz,
            currents,
            driving_voltages: voltages,
        })
    }

    fn method_name(&self) -> &str {
        "Magnetoinductive coupled-circuit model"
    }
}
