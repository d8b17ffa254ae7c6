//! Effective-medium homogenisation.
//!
//! **Status: extension point, not yet computed.**
//!
//! The solved ring currents determine a magnetisation density from which
//! homogenised effective permeability (and, with bianisotropic coupling,
//! effective permittivity) of the lattice could be retrieved. Neither
//! quantity is computed yet; this module records the intended seam.
//!
//! # Physical considerations
//!
//! For a lattice of magnetic moments m_i = I_i·A_i·n̂_i, the volume-averaged
//! magnetisation M = Σ m_i / V relates the macroscopic B and H fields, and
//! a Clausius–Mossotti-style relation yields μ_eff of the homogenised
//! medium. Retrieval is only meaningful when the lattice constant is deeply
//! subwavelength and the current distribution is close to uniform across
//! the grid, so a trustworthy implementation needs both the solved response
//! and a validity check on the operating point.

// This module is intentionally left as a documented stub.
