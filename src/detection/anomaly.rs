//! Seasonal-decomposition anomaly scoring.
//!
//! Pipeline:
//! 1. Fill NaN gaps by linear interpolation.
//! 2. Estimate the seasonal period range from the spectrum of the first
//!    `fft_length` points.
//! 3. Decompose into trend, seasonal and residual.
//! 4. Score each point by `|residual - median| / MAD`.
//!
//! The score is a robust, scale-free deviation: a value of 1 is a typical
//! residual, so thresholds carry over between series of different units.

use super::fft::is_valid_fft_length;
use super::period::{PeriodEstimator, PeriodRange, SpectralBand};
use crate::error::{AnomalyError, Result};
use crate::seasonality::{DecompositionResult, MedianDecomposition};
use crate::utils::stats::{median, safe_average};

/// Configuration for anomaly detection.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyConfig {
    /// FFT length used for period estimation (power of two, at least 64).
    pub fft_length: usize,
    /// Half-width of the trend median filter.
    pub trend_smoothness: usize,
    /// Number of seasonal refinement passes.
    pub decomposition_loops: usize,
    /// Frequency band scanned for the seasonal peak.
    pub band: SpectralBand,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            fft_length: 256,
            trend_smoothness: 8,
            decomposition_loops: 2,
            band: SpectralBand::Low,
        }
    }
}

impl AnomalyConfig {
    /// Create a configuration with explicit parameters and the default band.
    pub fn new(fft_length: usize, trend_smoothness: usize, decomposition_loops: usize) -> Self {
        Self {
            fft_length,
            trend_smoothness,
            decomposition_loops,
            band: SpectralBand::default(),
        }
    }

    /// Set the FFT length.
    pub fn with_fft_length(mut self, fft_length: usize) -> Self {
        self.fft_length = fft_length;
        self
    }

    /// Set the trend median filter half-width.
    pub fn with_trend_smoothness(mut self, half_window: usize) -> Self {
        self.trend_smoothness = half_window;
        self
    }

    /// Set the number of seasonal refinement passes.
    pub fn with_decomposition_loops(mut self, loops: usize) -> Self {
        self.decomposition_loops = loops;
        self
    }

    /// Set the spectral band.
    pub fn with_band(mut self, band: SpectralBand) -> Self {
        self.band = band;
        self
    }

    /// Check the parameters against a series of length `len`.
    pub fn validate(&self, len: usize) -> Result<()> {
        if !is_valid_fft_length(self.fft_length) {
            return Err(AnomalyError::InvalidFftLength(self.fft_length));
        }
        if len < self.fft_length {
            return Err(AnomalyError::InsufficientData {
                needed: self.fft_length,
                got: len,
            });
        }
        if self.trend_smoothness == 0 {
            return Err(AnomalyError::InvalidParameter(
                "trend smoothness must be positive".to_string(),
            ));
        }
        if self.decomposition_loops == 0 {
            return Err(AnomalyError::InvalidParameter(
                "decomposition loops must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Robust deviation scores of a residual.
#[derive(Debug, Clone, PartialEq)]
pub struct RobustScores {
    /// `|x - median| / mad` for every point.
    pub scores: Vec<f64>,
    /// Median of the input.
    pub median: f64,
    /// Scale used for normalization.
    pub mad: f64,
    /// Whether the median absolute deviation was zero and the mean absolute
    /// deviation was used instead.
    pub mad_fallback: bool,
}

/// Score `values` by median absolute deviation.
///
/// When the MAD is zero (more than half the points sit exactly on the
/// median) the mean absolute deviation is used instead. If that is zero as
/// well every deviation is zero and every score is `0 / 0 = NaN`, meaning
/// "no residual variance", not an error.
pub fn robust_scores(values: &[f64]) -> RobustScores {
    let center = median(values);
    let diff: Vec<f64> = values.iter().map(|x| (x - center).abs()).collect();

    let mut mad = median(&diff);
    let mad_fallback = mad == 0.0;
    if mad_fallback {
        mad = safe_average(diff.iter().copied());
        tracing::debug!(mad, "median absolute deviation is zero, using mean absolute deviation");
    }

    let scores = diff.iter().map(|d| d / mad).collect();
    RobustScores {
        scores,
        median: center,
        mad,
        mad_fallback,
    }
}

/// Result of anomaly detection.
#[derive(Debug, Clone)]
pub struct AnomalyResult {
    /// Deviation score per point (higher = more anomalous).
    pub scores: Vec<f64>,
    /// Decomposition of the gap-filled series.
    pub decomposition: DecompositionResult,
    /// Period range estimated from the spectrum.
    pub period_range: PeriodRange,
    /// Median of the residual.
    pub median: f64,
    /// Scale used to normalize deviations.
    pub mad: f64,
    /// Whether the mean absolute deviation replaced a zero MAD.
    pub mad_fallback: bool,
    /// Number of NaN points filled before analysis.
    pub interpolated: usize,
}

impl AnomalyResult {
    /// Indices whose score exceeds `threshold`.
    pub fn anomalies(&self, threshold: f64) -> Vec<usize> {
        self.scores
            .iter()
            .enumerate()
            .filter(|(_, &score)| score > threshold)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of points whose score exceeds `threshold`.
    pub fn anomaly_count(&self, threshold: f64) -> usize {
        self.scores.iter().filter(|&&score| score > threshold).count()
    }

    /// Check if a specific index scores above `threshold`.
    pub fn is_anomaly(&self, index: usize, threshold: f64) -> bool {
        self.scores.get(index).is_some_and(|&score| score > threshold)
    }

    /// Largest finite score and its index.
    pub fn max_score(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in self.scores.iter().enumerate() {
            if !score.is_finite() {
                continue;
            }
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((i, score));
            }
        }
        best
    }
}

/// Fill NaN runs in place by linear interpolation.
///
/// A run between two valid values becomes a ramp with step
/// `(right - left) / (run_length + 1)`. A leading run takes the first valid
/// value, a trailing run the last valid value. A series with no valid value
/// is left unchanged.
///
/// Returns the number of points filled.
pub fn interpolate_missing(series: &mut [f64]) -> usize {
    let n = series.len();
    let mut filled = 0;
    let mut run_start: Option<usize> = None;

    for i in 0..=n {
        if i < n && series[i].is_nan() {
            if run_start.is_none() {
                run_start = Some(i);
            }
            continue;
        }
        let Some(start) = run_start.take() else {
            continue;
        };

        let left = if start > 0 { Some(series[start - 1]) } else { None };
        let right = if i < n { Some(series[i]) } else { None };
        let (left, right) = match (left, right) {
            (Some(l), Some(r)) => (l, r),
            (Some(l), None) => (l, l),
            (None, Some(r)) => (r, r),
            (None, None) => continue,
        };

        let step = (right - left) / (i - start + 1) as f64;
        for (k, value) in series[start..i].iter_mut().enumerate() {
            *value = left + step * (k + 1) as f64;
        }
        filled += i - start;
    }

    filled
}

/// Detect anomalies in a time series.
///
/// The input is not modified; NaN gaps are filled on a copy.
///
/// # Errors
/// - [`AnomalyError::EmptyData`] for an empty series.
/// - [`AnomalyError::InvalidFftLength`], [`AnomalyError::InsufficientData`]
///   or [`AnomalyError::InvalidParameter`] for invalid configuration.
/// - [`AnomalyError::MissingValues`] if no point is valid.
/// - [`AnomalyError::InvalidPeriod`] if the spectral peak cannot be turned
///   into a period range.
pub fn detect(series: &[f64], config: &AnomalyConfig) -> Result<AnomalyResult> {
    if series.is_empty() {
        return Err(AnomalyError::EmptyData);
    }
    config.validate(series.len())?;

    let mut values = series.to_vec();
    let interpolated = interpolate_missing(&mut values);
    // Only an all-NaN series survives interpolation with gaps
    if values.iter().any(|x| x.is_nan()) {
        return Err(AnomalyError::MissingValues);
    }
    if interpolated > 0 {
        tracing::debug!(interpolated, "filled missing values");
    }

    let estimate = PeriodEstimator::new(config.fft_length)?
        .with_band(config.band)
        .estimate(&values)?;
    let range = estimate.range;

    let decomposition = MedianDecomposition::new(range.min_period, range.max_period)
        .with_trend_smoothness(config.trend_smoothness)
        .with_iterations(config.decomposition_loops)
        .decompose(&values)?;

    let RobustScores {
        scores,
        median,
        mad,
        mad_fallback,
    } = robust_scores(&decomposition.residual);

    Ok(AnomalyResult {
        scores,
        decomposition,
        period_range: range,
        median,
        mad,
        mad_fallback,
        interpolated,
    })
}

/// Detect anomalies with explicit parameters and the default spectral band.
///
/// `fft_length` must be a power of two of at least 64 and no longer than the
/// series.
pub fn detect_anomalies(
    series: &[f64],
    fft_length: usize,
    trend_smoothness: usize,
    decomposition_loops: usize,
) -> Result<AnomalyResult> {
    detect(
        series,
        &AnomalyConfig::new(fft_length, trend_smoothness, decomposition_loops),
    )
}
