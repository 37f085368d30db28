//! Utility functions shared by the spectral, decomposition and scoring steps.

pub mod stats;

pub use stats::{
    mean_centered, mean_squared_difference, median, safe_average, select_median, variance,
    window_median,
};
