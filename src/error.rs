//! Error types for the anofox-anomaly library.

use thiserror::Error;

/// Result type alias for anomaly detection operations.
pub type Result<T> = std::result::Result<T, AnomalyError>;

/// Errors that can occur during decomposition and anomaly scoring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnomalyError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// FFT length is not a power of two of at least 64.
    #[error("invalid fft length: {0} (must be a power of two >= 64)")]
    InvalidFftLength(usize),

    /// Spectral peak index cannot be converted into a period range.
    #[error("invalid period: spectral peak at index {index}")]
    InvalidPeriod { index: usize },

    /// Period bounds are inconsistent with each other or with the series.
    #[error("invalid period range [{min_period}, {max_period}] for series of length {len}")]
    InvalidPeriodRange {
        min_period: usize,
        max_period: usize,
        len: usize,
    },

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = AnomalyError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = AnomalyError::InsufficientData {
            needed: 64,
            got: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 64, got 10"
        );

        let err = AnomalyError::InvalidFftLength(100);
        assert_eq!(
            err.to_string(),
            "invalid fft length: 100 (must be a power of two >= 64)"
        );

        let err = AnomalyError::InvalidPeriod { index: 1 };
        assert_eq!(err.to_string(), "invalid period: spectral peak at index 1");

        let err = AnomalyError::InvalidPeriodRange {
            min_period: 20,
            max_period: 10,
            len: 100,
        };
        assert_eq!(
            err.to_string(),
            "invalid period range [20, 10] for series of length 100"
        );
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = AnomalyError::MissingValues;
        let err2 = err1.clone();
        assert_eq!(err1, err2);
        assert_ne!(err1, AnomalyError::EmptyData);
    }
}
