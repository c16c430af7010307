//! Frequency band value type.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A closed frequency range `[low_hz, high_hz]`.
///
/// Used both as a stop-band specification for filter design and as a query
/// range for energy/ripple/attenuation metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    /// Lower edge in Hz.
    pub low_hz: f32,
    /// Upper edge in Hz.
    pub high_hz: f32,
}

impl FrequencyBand {
    /// Create a band, validating `low <= high` and non-negative finite edges.
    pub fn new(low_hz: f32, high_hz: f32) -> Result<Self> {
        if !low_hz.is_finite() || !high_hz.is_finite() {
            return Err(Error::InvalidSpec(format!(
                "band edges must be finite, got {low_hz}..{high_hz}"
            )));
        }
        if low_hz < 0.0 {
            return Err(Error::InvalidSpec(format!(
                "band edge {low_hz} Hz is negative"
            )));
        }
        if low_hz > high_hz {
            return Err(Error::InvalidSpec(format!(
                "band is inverted: {low_hz} > {high_hz}"
            )));
        }
        Ok(Self { low_hz, high_hz })
    }

    /// True when `frequency_hz` falls inside the band (inclusive edges).
    pub fn contains(&self, frequency_hz: f32) -> bool {
        frequency_hz >= self.low_hz && frequency_hz <= self.high_hz
    }

    /// Bandwidth in Hz.
    pub fn bandwidth(&self) -> f32 {
        self.high_hz - self.low_hz
    }

    /// Arithmetic center of the band in Hz.
    pub fn center_hz(&self) -> f32 {
        (self.low_hz + self.high_hz) / 2.0
    }

    /// Band label used as a report key suffix, e.g. `"48-51Hz"`.
    pub fn label(&self) -> String {
        format!("{}-{}Hz", self.low_hz, self.high_hz)
    }

    /// Sort bands by lower edge and coalesce touching or overlapping ones.
    ///
    /// Peak-derived stop-bands routinely overlap (two dominant bins a few
    /// Hz apart each spawn a band); the merged set is valid filter design
    /// input where the raw set would be rejected as non-monotonic.
    pub fn merge_overlapping(mut bands: Vec<FrequencyBand>) -> Vec<FrequencyBand> {
        if bands.len() < 2 {
            return bands;
        }
        bands.sort_by(|a, b| a.low_hz.total_cmp(&b.low_hz));

        let mut merged: Vec<FrequencyBand> = Vec::with_capacity(bands.len());
        for band in bands {
            match merged.last_mut() {
                Some(last) if band.low_hz <= last.high_hz => {
                    last.high_hz = last.high_hz.max(band.high_hz);
                }
                _ => merged.push(band),
            }
        }
        merged
    }
}
