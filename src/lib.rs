//! # anofox-anomaly
//!
//! Unsupervised anomaly detection for a single equally-spaced time series.
//!
//! The dominant seasonal period range is estimated from the FFT spectrum,
//! the series is split into trend, seasonal and residual components with a
//! median-based decomposition, and every point is scored by its median
//! absolute deviation on the residual.
//!
//! # Example
//!
//! ```
//! use anofox_anomaly::prelude::*;
//!
//! let mut series: Vec<f64> = (0..256)
//!     .map(|t| (2.0 * std::f64::consts::PI * t as f64 / 16.0).sin())
//!     .collect();
//! series[200] += 10.0;
//!
//! let result = detect(&series, &AnomalyConfig::default()).unwrap();
//! assert_eq!(result.max_score().map(|(i, _)| i), Some(200));
//! ```

#![allow(clippy::needless_range_loop)]

pub mod detection;
pub mod error;
pub mod seasonality;
pub mod utils;

pub use error::{AnomalyError, Result};

pub mod prelude {
    pub use crate::detection::{
        detect, detect_anomalies, AnomalyConfig, AnomalyResult, PeriodRange, SpectralBand,
    };
    pub use crate::error::{AnomalyError, Result};
    pub use crate::seasonality::{decompose, DecompositionResult, MedianDecomposition};
}
