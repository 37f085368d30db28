//! Median-based seasonal-trend decomposition.
//!
//! A simplified STL variant built for anomaly scoring (Cleveland et al. 1990;
//! Hochenbaum, Vallis and Kejariwal 2017). Every smoothing step is a median,
//! so a single bad cycle or spike barely moves the fitted components:
//!
//! 1. Trend: centered median filter clamped at the series boundaries.
//! 2. Seasonal: starting from a seed cycle, repeatedly find the best-aligned
//!    next cycle within `[min_period, max_period]` samples, take the per-phase
//!    median across all aligned cycles, and tile that pattern back over the
//!    series. The pattern seeds the next pass.
//! 3. Residual: series minus trend minus seasonal.
//!
//! Letting each cycle start anywhere in the period range allows the seasonal
//! period to drift slightly over time.

use crate::error::{AnomalyError, Result};
use crate::utils::stats::{mean_centered, mean_squared_difference, select_median, variance};

/// Result of a seasonal-trend decomposition.
///
/// `trend`, `seasonal` and `residual` have the input length and sum back to
/// the input at every index.
#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionResult {
    /// Trend component.
    pub trend: Vec<f64>,
    /// Seasonal component.
    pub seasonal: Vec<f64>,
    /// Residual component.
    pub residual: Vec<f64>,
    /// Final one-cycle seasonal pattern (length `max_period`).
    pub pattern: Vec<f64>,
    /// Start index of every aligned cycle in the final pass.
    pub offsets: Vec<usize>,
}

impl DecompositionResult {
    /// Length of the decomposed series.
    pub fn len(&self) -> usize {
        self.trend.len()
    }

    /// Whether the decomposition is empty.
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    /// Rebuild the series as `trend + seasonal + residual`.
    pub fn reconstruct(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(self.seasonal.iter())
            .zip(self.residual.iter())
            .map(|((t, s), r)| t + s + r)
            .collect()
    }

    /// Get the seasonal strength (0 to 1).
    /// Values close to 1 indicate strong seasonality.
    pub fn seasonal_strength(&self) -> f64 {
        strength(&self.seasonal, &self.residual)
    }

    /// Get the trend strength (0 to 1).
    /// Values close to 1 indicate strong trend.
    pub fn trend_strength(&self) -> f64 {
        strength(&self.trend, &self.residual)
    }
}

/// `1 - Var(residual) / Var(component + residual)`, floored at zero.
fn strength(component: &[f64], residual: &[f64]) -> f64 {
    let var_residual = variance(residual);
    let combined: Vec<f64> = component
        .iter()
        .zip(residual.iter())
        .map(|(c, r)| c + r)
        .collect();
    let var_combined = variance(&combined);

    if var_combined.is_nan() || var_combined < 1e-10 {
        return 0.0;
    }

    (1.0 - var_residual / var_combined).max(0.0)
}

/// Median seasonal-trend decomposition configuration and algorithm.
#[derive(Debug, Clone)]
pub struct MedianDecomposition {
    /// Longest period; also the seasonal cycle length.
    max_period: usize,
    /// Shortest period considered when aligning cycles.
    min_period: usize,
    /// Half-width of the trend median filter.
    trend_smoothness: usize,
    /// Number of seasonal refinement passes.
    iterations: usize,
}

impl MedianDecomposition {
    /// Create a decomposer for cycles between `min_period` and `max_period`
    /// samples long.
    ///
    /// Defaults to a trend half-width of `max_period / 2` (at least 1) and
    /// two refinement passes.
    pub fn new(min_period: usize, max_period: usize) -> Self {
        Self {
            max_period,
            min_period,
            trend_smoothness: (max_period / 2).max(1),
            iterations: 2,
        }
    }

    /// Set the trend median filter half-width.
    pub fn with_trend_smoothness(mut self, half_window: usize) -> Self {
        self.trend_smoothness = half_window;
        self
    }

    /// Set the number of seasonal refinement passes.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Decompose the series into trend, seasonal and residual.
    ///
    /// The series must be free of NaN values.
    pub fn decompose(&self, series: &[f64]) -> Result<DecompositionResult> {
        self.validate(series)?;
        let n = series.len();

        let trend = median_trend(series, self.trend_smoothness);
        let detrended: Vec<f64> = series
            .iter()
            .zip(trend.iter())
            .map(|(y, t)| y - t)
            .collect();

        let mut pass = SeasonalPass {
            pattern: series[..self.max_period].to_vec(),
            seasonal: vec![0.0; n],
            offsets: Vec::new(),
        };
        for iteration in 0..self.iterations {
            pass = self.seasonal_pass(&detrended, &pass.pattern);
            tracing::trace!(iteration, cycles = pass.offsets.len(), "seasonal pass");
        }

        let residual: Vec<f64> = detrended
            .iter()
            .zip(pass.seasonal.iter())
            .map(|(d, s)| d - s)
            .collect();

        Ok(DecompositionResult {
            trend,
            seasonal: pass.seasonal,
            residual,
            pattern: pass.pattern,
            offsets: pass.offsets,
        })
    }

    fn validate(&self, series: &[f64]) -> Result<()> {
        if series.is_empty() {
            return Err(AnomalyError::EmptyData);
        }
        if series.iter().any(|x| x.is_nan()) {
            return Err(AnomalyError::MissingValues);
        }
        if self.min_period == 0 || self.min_period > self.max_period || self.max_period > series.len()
        {
            return Err(AnomalyError::InvalidPeriodRange {
                min_period: self.min_period,
                max_period: self.max_period,
                len: series.len(),
            });
        }
        if self.trend_smoothness == 0 {
            return Err(AnomalyError::InvalidParameter(
                "trend smoothness must be positive".to_string(),
            ));
        }
        if self.iterations == 0 {
            return Err(AnomalyError::InvalidParameter(
                "decomposition iterations must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// One alignment-and-aggregation pass over the detrended series.
    ///
    /// Windows that start inside the series but run past its end still take
    /// part in the alignment search and are tiled, so the seasonal component
    /// covers the tail; only full-length cycles feed the per-phase median.
    fn seasonal_pass(&self, detrended: &[f64], seed: &[f64]) -> SeasonalPass {
        let n = detrended.len();
        let cycle_len = self.max_period;
        let seed = mean_centered(seed);

        let mut cycles = vec![mean_centered(&detrended[..cycle_len])];
        let mut offsets = vec![0];
        let mut offset = 0;

        loop {
            let first = offset + self.min_period;
            if first >= n {
                break;
            }
            let last = (offset + self.max_period).min(n - 1);

            let mut best: Option<(usize, Vec<f64>, f64)> = None;
            for start in first..=last {
                let end = (start + cycle_len).min(n);
                let candidate = mean_centered(&detrended[start..end]);
                let distance = mean_squared_difference(&seed, &candidate);
                let better = match &best {
                    Some((_, _, best_distance)) => distance < *best_distance,
                    None => true,
                };
                if better {
                    best = Some((start, candidate, distance));
                }
            }

            let Some((start, candidate, _)) = best else {
                break;
            };
            offset = start;
            offsets.push(start);
            if candidate.len() == cycle_len {
                cycles.push(candidate);
            }
        }

        let mut column = Vec::with_capacity(cycles.len());
        let pattern: Vec<f64> = (0..cycle_len)
            .map(|phase| {
                column.clear();
                column.extend(cycles.iter().map(|cycle| cycle[phase]));
                select_median(&mut column)
            })
            .collect();

        let mut seasonal = vec![0.0; n];
        for &start in &offsets {
            let len = cycle_len.min(n - start);
            seasonal[start..start + len].copy_from_slice(&pattern[..len]);
        }

        SeasonalPass {
            pattern,
            seasonal,
            offsets,
        }
    }
}

/// State carried between seasonal refinement passes.
struct SeasonalPass {
    pattern: Vec<f64>,
    seasonal: Vec<f64>,
    offsets: Vec<usize>,
}

/// Centered median filter: `trend[i] = median(series[i-h ..= i+h])`, with
/// the window clamped to the series bounds.
pub fn median_trend(series: &[f64], half_window: usize) -> Vec<f64> {
    let n = series.len();
    let width = half_window.saturating_mul(2).saturating_add(1);
    let mut buffer = Vec::with_capacity(width.min(n));
    (0..n)
        .map(|i| {
            let left = i.saturating_sub(half_window);
            let right = i.saturating_add(half_window).min(n - 1);
            buffer.clear();
            buffer.extend_from_slice(&series[left..=right]);
            select_median(&mut buffer)
        })
        .collect()
}

/// Decompose `series` with a known period range.
///
/// Shorthand for
/// `MedianDecomposition::new(min_period, max_period)
///     .with_trend_smoothness(trend_smooth).with_iterations(loops)`.
pub fn decompose(
    series: &[f64],
    max_period: usize,
    min_period: usize,
    trend_smooth: usize,
    loops: usize,
) -> Result<DecompositionResult> {
    MedianDecomposition::new(min_period, max_period)
        .with_trend_smoothness(trend_smooth)
        .with_iterations(loops)
        .decompose(series)
}
