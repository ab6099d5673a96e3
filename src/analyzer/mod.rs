// Analyzer module: pricing lookup and the revenue figure derived from it.

pub mod pricing;
pub mod revenue;

// Re-export the main Estimator implementation for ease of use.
pub use revenue::{Estimate, Estimator, EstimatorImpl};
