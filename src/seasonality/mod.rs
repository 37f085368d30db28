//! Seasonal-trend decomposition.
//!
//! Median-based decomposition with a drifting-period seasonal alignment,
//! used to isolate the residual that anomalies are scored on.

mod decompose;

pub use decompose::{decompose, median_trend, DecompositionResult, MedianDecomposition};
