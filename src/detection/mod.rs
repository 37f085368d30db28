//! Detection utilities for time series analysis.
//!
//! This module provides:
//! - A radix-2 FFT and spectral period range estimation
//! - Robust anomaly scoring on seasonal-trend residuals

pub mod anomaly;
pub mod fft;
pub mod period;

pub use anomaly::{
    detect, detect_anomalies, interpolate_missing, robust_scores, AnomalyConfig, AnomalyResult,
    RobustScores,
};
pub use period::{estimate_period_range, PeriodEstimate, PeriodEstimator, PeriodRange, SpectralBand};
