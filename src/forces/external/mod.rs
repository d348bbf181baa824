//! External potentials: single-particle forces parametrized per type.

pub mod periodic;

pub use periodic::{Periodic, PeriodicForce};
