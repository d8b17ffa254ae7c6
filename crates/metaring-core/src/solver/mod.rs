//! Network-response solver abstraction and implementations.
//!
//! The [`ResponseSolver`] trait defines the interface that all response
//! methods must implement. The magnetoinductive coupled-circuit model
//! ([`circuit::CircuitSolver`]) is the first implementation; future methods
//! (retarded full-wave coupling, transmission-line ladders) will implement
//! the same trait.

pub mod circuit;

use crate::error::ModelResult;
use crate::types::{CurrentResponse, RingNetwork};

/// The core trait every network-response method implements.
pub trait ResponseSolver {
    /// Solve for the per-ring currents at a single drive frequency.
    fn solve_currents(
        &self,
        network: &RingNetwork,
        frequency_hz: f64,
    ) -> ModelResult<CurrentResponse>;

    /// Human-readable name of the method.
    fn method_name(&self) -> &str;
}
