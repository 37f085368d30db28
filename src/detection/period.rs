//! Seasonal period range estimation from the FFT spectrum.
//!
//! The first `fft_length` points are transformed, the strongest bin inside a
//! frequency band is located and converted into a `[min_period, max_period]`
//! range that brackets the true period:
//!
//! ```text
//! max_period = fft_length / (peak - 1)
//! min_period = fft_length / (peak + 1)
//! ```

use super::fft::{fft_in_place, is_valid_fft_length, magnitude, real_to_complex};
use crate::error::{AnomalyError, Result};

/// Inclusive range of candidate seasonal periods, in samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodRange {
    /// Shortest period considered.
    pub min_period: usize,
    /// Longest period considered; also the length of one seasonal cycle.
    pub max_period: usize,
}

impl PeriodRange {
    /// Create a period range, checking `1 <= min_period <= max_period`.
    pub fn new(min_period: usize, max_period: usize) -> Result<Self> {
        if min_period == 0 || min_period > max_period {
            return Err(AnomalyError::InvalidParameter(format!(
                "period range [{min_period}, {max_period}] must satisfy 1 <= min <= max"
            )));
        }
        Ok(Self {
            min_period,
            max_period,
        })
    }

    /// Convert a spectral peak index into the bracketing period range.
    ///
    /// A peak at index 0 or 1 has no finite upper period and is rejected.
    pub fn from_peak_index(index: usize, fft_length: usize) -> Result<Self> {
        if index <= 1 || index + 1 > fft_length {
            return Err(AnomalyError::InvalidPeriod { index });
        }
        Self::new(fft_length / (index + 1), fft_length / (index - 1))
            .map_err(|_| AnomalyError::InvalidPeriod { index })
    }

    /// Check whether `period` lies inside the range.
    pub fn contains(&self, period: usize) -> bool {
        (self.min_period..=self.max_period).contains(&period)
    }

    /// Number of candidate periods in the range.
    pub fn width(&self) -> usize {
        self.max_period - self.min_period + 1
    }
}

/// Frequency-index band scanned for the spectral peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectralBand {
    /// Indices `fft_length/64 ..= fft_length/16` (periods of 16 to 64 samples
    /// per 1024-point window).
    #[default]
    Low,
    /// Indices `fft_length/32 ..= fft_length/8` (periods of 8 to 32 samples
    /// per 1024-point window).
    Mid,
    /// Explicit inclusive index bounds.
    Custom { left: usize, right: usize },
}

impl SpectralBand {
    /// Raw inclusive index bounds for the given FFT length.
    pub fn bounds(&self, fft_length: usize) -> (usize, usize) {
        match *self {
            SpectralBand::Low => (fft_length / 64, fft_length / 16),
            SpectralBand::Mid => (fft_length / 32, fft_length / 8),
            SpectralBand::Custom { left, right } => (left, right),
        }
    }

    /// Index bounds clamped to `[2, fft_length / 2]`.
    ///
    /// The lower clamp keeps `peak - 1` positive; the upper one stops at the
    /// Nyquist bin.
    pub fn clamped_bounds(&self, fft_length: usize) -> Result<(usize, usize)> {
        let (left, right) = self.bounds(fft_length);
        let left = left.max(2);
        let right = right.min(fft_length / 2);
        if left > right {
            return Err(AnomalyError::InvalidParameter(format!(
                "empty spectral band [{}, {}] for fft length {}",
                left, right, fft_length
            )));
        }
        Ok((left, right))
    }
}

/// Result of spectral period estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodEstimate {
    /// Bracketing period range.
    pub range: PeriodRange,
    /// FFT bin with the largest magnitude inside the band.
    pub peak_index: usize,
    /// Magnitude of that bin.
    pub peak_magnitude: f64,
}

impl PeriodEstimate {
    /// Period implied directly by the peak bin.
    pub fn dominant_period(&self, fft_length: usize) -> usize {
        fft_length / self.peak_index
    }
}

/// FFT-based period range estimator.
#[derive(Debug, Clone)]
pub struct PeriodEstimator {
    fft_length: usize,
    band: SpectralBand,
}

impl Default for PeriodEstimator {
    fn default() -> Self {
        Self {
            fft_length: 256,
            band: SpectralBand::Low,
        }
    }
}

impl PeriodEstimator {
    /// Create an estimator for the given FFT length (power of two >= 64).
    pub fn new(fft_length: usize) -> Result<Self> {
        if !is_valid_fft_length(fft_length) {
            return Err(AnomalyError::InvalidFftLength(fft_length));
        }
        Ok(Self {
            fft_length,
            band: SpectralBand::default(),
        })
    }

    /// Set the frequency band to scan.
    pub fn with_band(mut self, band: SpectralBand) -> Self {
        self.band = band;
        self
    }

    /// FFT length in use.
    pub fn fft_length(&self) -> usize {
        self.fft_length
    }

    /// Frequency band in use.
    pub fn band(&self) -> SpectralBand {
        self.band
    }

    /// Estimate the period range from the first `fft_length` points.
    ///
    /// The series must not contain NaN values.
    pub fn estimate(&self, series: &[f64]) -> Result<PeriodEstimate> {
        if series.is_empty() {
            return Err(AnomalyError::EmptyData);
        }
        if series.len() < self.fft_length {
            return Err(AnomalyError::InsufficientData {
                needed: self.fft_length,
                got: series.len(),
            });
        }
        let (left, right) = self.band.clamped_bounds(self.fft_length)?;

        let mut samples = real_to_complex(series, self.fft_length);
        fft_in_place(&mut samples, self.fft_length);

        let mut peak_index = left;
        let mut peak_magnitude = magnitude(samples[left]);
        for (index, &sample) in samples.iter().enumerate().take(right + 1).skip(left + 1) {
            let m = magnitude(sample);
            // Strict comparison keeps the lowest index on ties.
            if m > peak_magnitude {
                peak_index = index;
                peak_magnitude = m;
            }
        }

        let range = PeriodRange::from_peak_index(peak_index, self.fft_length)?;
        tracing::debug!(
            peak_index,
            peak_magnitude,
            min_period = range.min_period,
            max_period = range.max_period,
            "estimated seasonal period range"
        );

        Ok(PeriodEstimate {
            range,
            peak_index,
            peak_magnitude,
        })
    }
}

/// Estimate the seasonal period range of `series`.
///
/// Convenience wrapper around [`PeriodEstimator`].
pub fn estimate_period_range(
    series: &[f64],
    fft_length: usize,
    band: SpectralBand,
) -> Result<PeriodRange> {
    PeriodEstimator::new(fft_length)?
        .with_band(band)
        .estimate(series)
        .map(|estimate| estimate.range)
}
