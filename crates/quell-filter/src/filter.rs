//! FIR filter application and frequency response evaluation.

use quell_analysis::spectrum::{Spectrum, SpectrumPoint};
use quell_analysis::Fft;
use quell_core::{Error, Result, Signal};
use rustfft::num_complex::Complex;
use std::f32::consts::PI;

/// Default number of evaluation points for [`frequency_response`].
pub const DEFAULT_RESPONSE_POINTS: usize = 8000;

/// An FIR filter: tap coefficients plus the sample rate it was designed
/// for. Immutable once designed.
#[derive(Debug, Clone, PartialEq)]
pub struct FirFilter {
    taps: Vec<f32>,
    sample_rate: u32,
}

impl FirFilter {
    /// Create a filter from raw taps.
    pub fn new(taps: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if taps.is_empty() {
            return Err(Error::InvalidInput("filter has no taps".into()));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be positive".into()));
        }
        Ok(Self { taps, sample_rate })
    }

    /// Tap coefficients.
    pub fn taps(&self) -> &[f32] {
        &self.taps
    }

    /// Number of taps.
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Always false by invariant.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sample rate the filter was designed for, in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Apply the filter to a signal: direct-form causal FIR.
///
/// Output length equals input length; the startup transient over the first
/// `len(filter) - 1` samples is left uncorrected. Fails with
/// `MismatchedRate` when the signal's rate differs from the filter's
/// design rate.
pub fn apply(signal: &Signal, filter: &FirFilter) -> Result<Signal> {
    if signal.sample_rate() != filter.sample_rate() {
        return Err(Error::MismatchedRate {
            expected: filter.sample_rate(),
            actual: signal.sample_rate(),
        });
    }

    let x = signal.samples();
    let h = filter.taps();
    let mut y = vec![0.0f32; x.len()];

    for (n, out) in y.iter_mut().enumerate() {
        // y[n] = sum over k of h[k] * x[n - k], truncated at the signal start.
        let k_max = h.len().min(n + 1);
        let acc: f32 = h[..k_max]
            .iter()
            .zip(x[n + 1 - k_max..=n].iter().rev())
            .map(|(hk, xk)| hk * xk)
            .sum();
        *out = acc;
    }

    Signal::new(y, signal.sample_rate())
}

/// Evaluate the filter's magnitude response at `num_points` evenly spaced
/// frequencies over [0, Nyquist].
pub fn frequency_response(filter: &FirFilter, num_points: usize) -> Result<Spectrum> {
    if num_points < 2 {
        return Err(Error::InvalidInput(
            "frequency response needs at least two points".into(),
        ));
    }

    let nyquist = filter.sample_rate() as f32 / 2.0;
    let fft_size = 2 * (num_points - 1);

    let magnitudes: Vec<f32> = if fft_size >= filter.len() {
        // Zero-padded FFT lands exactly on the requested grid.
        let fft = Fft::new(fft_size);
        fft.forward(filter.taps())
            .iter()
            .take(num_points)
            .map(|c| c.norm())
            .collect()
    } else {
        // More taps than FFT bins: evaluate the transfer function directly.
        (0..num_points)
            .map(|i| {
                let omega = PI * i as f32 / (num_points - 1) as f32;
                let sum: Complex<f32> = filter
                    .taps()
                    .iter()
                    .enumerate()
                    .map(|(k, &h)| Complex::from_polar(h, -omega * k as f32))
                    .sum();
                sum.norm()
            })
            .collect()
    };

    let points = magnitudes
        .iter()
        .enumerate()
        .map(|(i, &magnitude)| SpectrumPoint {
            frequency_hz: i as f32 * nyquist / (num_points - 1) as f32,
            magnitude,
        })
        .collect();

    Spectrum::new(points)
}
