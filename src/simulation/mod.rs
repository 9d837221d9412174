//! Simulated traffic for the command-line driver.
//!
//! Stands in for an interactive client: generates requests on a timer and
//! periodically reads the distribution statistics.

pub mod driver;
pub mod generator;

pub use driver::{submit_batch, SimulationDriver, SimulationReport};
pub use generator::RequestGenerator;
