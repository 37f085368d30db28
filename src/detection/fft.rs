//! In-place radix-2 FFT for spectral period estimation.
//!
//! After [`fft_in_place`] on a length `N = 2^k` buffer, `a[m]` holds the
//! complex amplitude of the component with period `N / m`. The DC component
//! is `m = 0`. The modulus `|a[m]|` is returned by [`magnitude`]; the
//! amplitude of a real sinusoid is `2 * |a[m]| / N`.

use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

/// Smallest FFT length accepted by the detector (`2^6`).
pub const MIN_FFT_LENGTH: usize = 64;

/// Check that `length` is a power of two with exponent of at least 6.
pub fn is_valid_fft_length(length: usize) -> bool {
    length >= MIN_FFT_LENGTH && length.is_power_of_two()
}

/// Build zero-imaginary complex samples from the first `length` values.
///
/// If the signal is shorter than `length` the buffer is truncated to the
/// signal length.
pub fn real_to_complex(signal: &[f64], length: usize) -> Vec<Complex64> {
    signal
        .iter()
        .take(length)
        .map(|&x| Complex64::new(x, 0.0))
        .collect()
}

/// Compute the discrete Fourier transform of `samples[..length]` in place.
///
/// Iterative Cooley-Tukey: bit-reversal permutation followed by `log2(length)`
/// butterfly stages. Within each stage the twiddle factor is rotated
/// incrementally rather than recomputed per butterfly.
///
/// # Contract
/// `length` must be a power of two and `length <= samples.len()`. This is
/// not checked in release builds; callers validate with
/// [`is_valid_fft_length`].
pub fn fft_in_place(samples: &mut [Complex64], length: usize) {
    debug_assert!(length.is_power_of_two(), "fft length must be a power of two");
    debug_assert!(length <= samples.len(), "fft length exceeds sample count");

    bit_reverse_permute(samples, length);

    let mut h = 2;
    while h <= length {
        let angle = -2.0 * PI / h as f64;
        let wn = Complex64::new(angle.cos(), angle.sin());
        let half = h / 2;

        for start in (0..length).step_by(h) {
            let mut w = Complex64::new(1.0, 0.0);
            for k in start..start + half {
                let u = samples[k];
                let t = w * samples[k + half];
                samples[k] = u + t;
                samples[k + half] = u - t;
                w *= wn;
            }
        }

        h *= 2;
    }
}

/// Inverse of [`fft_in_place`], including the `1 / length` scaling.
///
/// Same contract as the forward transform.
pub fn inverse_fft_in_place(samples: &mut [Complex64], length: usize) {
    for c in samples[..length].iter_mut() {
        *c = c.conj();
    }
    fft_in_place(samples, length);
    let scale = 1.0 / length as f64;
    for c in samples[..length].iter_mut() {
        *c = c.conj() * scale;
    }
}

/// Modulus `sqrt(re^2 + im^2)` of a complex sample.
#[inline]
pub fn magnitude(c: Complex64) -> f64 {
    (c.re * c.re + c.im * c.im).sqrt()
}

/// Modulus of every sample.
pub fn magnitudes(samples: &[Complex64]) -> Vec<f64> {
    samples.iter().map(|&c| magnitude(c)).collect()
}

/// Reorder `samples[..length]` so that index `i` holds the element
/// previously at the bit-reversal of `i`.
fn bit_reverse_permute(samples: &mut [Complex64], length: usize) {
    // j tracks the bit-reversal of i as a reversed binary counter
    let mut j = 0usize;
    for i in 1..length {
        let mut bit = length >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        // Each pair is swapped once, from its smaller index.
        if i < j {
            samples.swap(i, j);
        }
    }
}
