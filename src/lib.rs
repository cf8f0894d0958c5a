//! Intersection Simulation Library
//!
//! Discrete-event microsimulation of a signalized four-way intersection,
//! estimating vehicle wait times for a signal-timing plan.

pub mod export;
pub mod simulation;
