//! Application-level configuration.
//!
//! - [`ExecutionParams`] - generation and input timeouts, persistence cadence

pub mod execution_params;

pub use execution_params::ExecutionParams;
