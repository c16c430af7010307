//! Mono audio signal value type.

use crate::{Error, Result};

/// An immutable mono signal: samples plus the rate they were captured at.
///
/// Invariants (enforced at construction): at least one sample, sample rate
/// strictly positive. Operations that derive new signals (normalization,
/// filtering) return fresh `Signal` values and never mutate in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Signal {
    /// Create a signal from raw samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("signal has no samples".into()));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidInput("sample rate must be positive".into()));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Sample buffer.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false by invariant; kept for clippy's `len` convention.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Nyquist frequency (half the sample rate) in Hz.
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }

    /// New signal scaled so the maximum absolute sample is 1.0.
    ///
    /// An all-zero signal is returned unchanged.
    pub fn normalize(&self) -> Signal {
        let peak = self
            .samples
            .iter()
            .map(|s| s.abs())
            .fold(0.0f32, f32::max);

        if peak == 0.0 {
            return self.clone();
        }

        Signal {
            samples: self.samples.iter().map(|s| s / peak).collect(),
            sample_rate: self.sample_rate,
        }
    }
}
