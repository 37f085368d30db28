//! Property-based tests for the selection, transform, decomposition and
//! scoring primitives.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series.

use anofox_anomaly::detection::fft::{
    fft_in_place, inverse_fft_in_place, real_to_complex,
};
use anofox_anomaly::detection::{interpolate_missing, robust_scores};
use anofox_anomaly::seasonality::decompose;
use anofox_anomaly::utils::{safe_average, select_median, window_median};
use proptest::prelude::*;
use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;

/// Strategy for values with plenty of duplicates and negatives.
fn coarse_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((-20i32..20).prop_map(|v| v as f64 * 0.5), min_len..max_len)
}

/// Strategy for power-of-two lengths from 64 to 1024.
fn fft_signal_strategy() -> impl Strategy<Value = Vec<f64>> {
    (6u32..=10).prop_flat_map(|k| prop::collection::vec(-100.0..100.0_f64, 1usize << k))
}

/// Strategy for a seasonal series with a period range that fits it.
fn seasonal_case_strategy() -> impl Strategy<Value = (Vec<f64>, usize, usize, usize, usize)> {
    (4usize..20, 3usize..8).prop_flat_map(|(period, cycles)| {
        let n = period * cycles;
        (
            prop::collection::vec(-1.0..1.0_f64, n),
            0.5..20.0_f64,
            1usize..10,
            1usize..4,
        )
            .prop_map(move |(noise, amplitude, trend_smooth, loops)| {
                let series: Vec<f64> = noise
                    .iter()
                    .enumerate()
                    .map(|(t, e)| {
                        amplitude * (2.0 * std::f64::consts::PI * t as f64 / period as f64).sin()
                            + e
                    })
                    .collect();
                (series, period + 1, period - 1, trend_smooth, loops)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn median_equals_sorted_order_statistic(values in coarse_values_strategy(1, 200)) {
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected = sorted[(sorted.len() - 1) / 2];

        let mut buffer = values.clone();
        prop_assert_eq!(select_median(&mut buffer), expected);

        // Selection only reorders the buffer
        buffer.sort_by(|a, b| a.partial_cmp(b).unwrap());
        prop_assert_eq!(buffer, sorted);
    }

    #[test]
    fn window_median_matches_sorted_window(
        values in coarse_values_strategy(1, 100),
        a in 0usize..100,
        b in 0usize..100,
    ) {
        let n = values.len();
        let (x, y) = (a % n, b % n);
        let (l, r) = (x.min(y), x.max(y));

        let mut window = values[l..=r].to_vec();
        window.sort_by(|x, y| x.partial_cmp(y).unwrap());
        prop_assert_eq!(window_median(&values, l, r), window[(r - l) / 2]);
    }

    #[test]
    fn safe_average_matches_naive_mean(values in prop::collection::vec(-1e6..1e6_f64, 1..500)) {
        let naive = values.iter().sum::<f64>() / values.len() as f64;
        let avg = safe_average(values.iter().copied());
        prop_assert!((avg - naive).abs() <= 1e-6 * (1.0 + naive.abs()));
    }

    #[test]
    fn fft_round_trip_reconstructs_signal(signal in fft_signal_strategy()) {
        let n = signal.len();
        let mut samples = real_to_complex(&signal, n);
        fft_in_place(&mut samples, n);
        inverse_fft_in_place(&mut samples, n);

        for (c, &x) in samples.iter().zip(signal.iter()) {
            prop_assert!((c.re - x).abs() < 1e-8, "re {} vs {}", c.re, x);
            prop_assert!(c.im.abs() < 1e-8);
        }
    }

    #[test]
    fn fft_agrees_with_rustfft(signal in fft_signal_strategy()) {
        let n = signal.len();
        let mut ours = real_to_complex(&signal, n);
        fft_in_place(&mut ours, n);

        let mut reference: Vec<Complex64> = real_to_complex(&signal, n);
        FftPlanner::new().plan_fft_forward(n).process(&mut reference);

        let scale = n as f64 * 100.0;
        for (a, b) in ours.iter().zip(reference.iter()) {
            prop_assert!((a - b).norm() < 1e-10 * scale);
        }
    }

    #[test]
    fn decomposition_is_additive(
        (series, max_period, min_period, trend_smooth, loops) in seasonal_case_strategy()
    ) {
        let result = decompose(&series, max_period, min_period, trend_smooth, loops).unwrap();

        prop_assert_eq!(result.trend.len(), series.len());
        prop_assert_eq!(result.seasonal.len(), series.len());
        prop_assert_eq!(result.residual.len(), series.len());
        prop_assert_eq!(result.pattern.len(), max_period);

        for (i, &y) in series.iter().enumerate() {
            let rebuilt = result.trend[i] + result.seasonal[i] + result.residual[i];
            prop_assert!(
                (y - rebuilt).abs() <= 1e-9 * (1.0 + y.abs()),
                "index {}: {} vs {}", i, y, rebuilt
            );
        }

        for pair in result.offsets.windows(2) {
            let gap = pair[1] - pair[0];
            prop_assert!(gap >= min_period && gap <= max_period);
        }
    }

    #[test]
    fn robust_scores_are_non_negative(values in prop::collection::vec(-1e3..1e3_f64, 2..300)) {
        let result = robust_scores(&values);
        prop_assert_eq!(result.scores.len(), values.len());
        prop_assert!(result.mad >= 0.0);
        for s in &result.scores {
            prop_assert!(s.is_nan() || *s >= 0.0);
        }
    }

    #[test]
    fn interpolation_removes_every_gap(
        values in prop::collection::vec(-50.0..50.0_f64, 1..100),
        mask in prop::collection::vec(any::<bool>(), 100),
    ) {
        let mut series: Vec<f64> = values
            .iter()
            .zip(mask.iter())
            .map(|(&v, &missing)| if missing { f64::NAN } else { v })
            .collect();
        let gaps = series.iter().filter(|x| x.is_nan()).count();
        let all_missing = gaps == series.len();

        let filled = interpolate_missing(&mut series);

        if all_missing {
            prop_assert_eq!(filled, 0);
        } else {
            prop_assert_eq!(filled, gaps);
            prop_assert!(series.iter().all(|x| x.is_finite()));
            // Untouched points keep their values
            for ((&v, &missing), &out) in values.iter().zip(mask.iter()).zip(series.iter()) {
                if !missing {
                    prop_assert_eq!(v, out);
                }
            }
        }
    }
}
