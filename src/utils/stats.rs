//! Order statistics and running averages.
//!
//! The median here is always a single element of the input: for even-length
//! windows it is the lower-middle value, never an average of the two middle
//! values. Selection is done by partitioning, not by sorting.

/// Select the median of `window` in place.
///
/// Returns the element that would sit at index `(len - 1) / 2` after sorting.
/// The window is reordered as a side effect. Uses single-pivot Hoare-style
/// partitioning that keeps narrowing the search range until the target order
/// statistic is isolated, giving expected linear time.
///
/// Returns NaN for an empty window.
///
/// # Example
/// ```
/// use anofox_anomaly::utils::select_median;
///
/// let mut values = vec![4.0, 1.0, 3.0, 2.0];
/// assert_eq!(select_median(&mut values), 2.0);
/// ```
pub fn select_median(window: &mut [f64]) -> f64 {
    if window.is_empty() {
        return f64::NAN;
    }

    let target = (window.len() - 1) / 2;
    let mut left = 0;
    let mut right = window.len() - 1;

    loop {
        let pivot = window[left];
        let mut i = left + 1;
        let mut j = right;

        // Invariant: window[left+1..i] < pivot <= window[j+1..=right]
        while i <= j {
            if window[i] < pivot {
                i += 1;
            } else if window[j] >= pivot {
                j -= 1;
            } else {
                window.swap(i, j);
                i += 1;
                j -= 1;
            }
        }

        let split = i - 1;
        if split == target {
            return pivot;
        }
        window.swap(split, left);

        if target < split {
            right = split - 1;
        } else {
            left = i;
        }
    }
}

/// Median of a slice, leaving the input untouched.
///
/// Returns NaN for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    let mut buffer = values.to_vec();
    select_median(&mut buffer)
}

/// Median of `values[left..=right]` (inclusive bounds).
///
/// Bounds past the end of the slice are clamped. Returns NaN when the window
/// is empty.
pub fn window_median(values: &[f64], left: usize, right: usize) -> f64 {
    if values.is_empty() || left > right || left >= values.len() {
        return f64::NAN;
    }
    let right = right.min(values.len() - 1);
    median(&values[left..=right])
}

/// Running mean using the incremental update `avg += (x - avg) / count`.
///
/// Avoids accumulating a large intermediate sum on long series.
/// Returns `0.0` for an empty input.
pub fn safe_average<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut avg = 0.0;
    let mut count = 1.0;
    for x in values {
        avg += (x - avg) / count;
        count += 1.0;
    }
    avg
}

/// Copy of `values` with its running mean subtracted.
pub fn mean_centered(values: &[f64]) -> Vec<f64> {
    let avg = safe_average(values.iter().copied());
    values.iter().map(|x| x - avg).collect()
}

/// Mean squared difference over the overlapping prefix of `a` and `b`.
pub fn mean_squared_difference(a: &[f64], b: &[f64]) -> f64 {
    safe_average(a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)))
}

/// Sample variance (n-1 denominator). Returns NaN for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let m = safe_average(values.iter().copied());
    let mean_sq = safe_average(values.iter().map(|x| (x - m).powi(2)));
    mean_sq * n / (n - 1.0)
}
