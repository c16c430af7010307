//! Spectral estimation: FFT magnitude spectrum and Welch power spectral
//! density.

use crate::fft::{Fft, Window};
use quell_core::{Error, FrequencyBand, Result, Signal};
use serde::Serialize;

/// Default Welch segment length in samples.
pub const DEFAULT_SEGMENT_LENGTH: usize = 1024;

/// One magnitude spectrum bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumPoint {
    /// Bin frequency in Hz.
    pub frequency_hz: f32,
    /// Complex modulus of the DFT at this bin.
    pub magnitude: f32,
}

/// Magnitude spectrum: bins ordered by ascending frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    points: Vec<SpectrumPoint>,
}

impl Spectrum {
    /// Build a spectrum from bins, validating ascending frequency order.
    pub fn new(points: Vec<SpectrumPoint>) -> Result<Self> {
        if points
            .windows(2)
            .any(|w| w[1].frequency_hz < w[0].frequency_hz)
        {
            return Err(Error::InvalidInput(
                "spectrum bins must be ordered by ascending frequency".into(),
            ));
        }
        Ok(Self { points })
    }

    /// All bins.
    pub fn points(&self) -> &[SpectrumPoint] {
        &self.points
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the spectrum has no bins.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bins whose frequency falls within the band (inclusive edges).
    pub fn band_points(&self, band: &FrequencyBand) -> &[SpectrumPoint] {
        let lo = self
            .points
            .partition_point(|p| p.frequency_hz < band.low_hz);
        let hi = self
            .points
            .partition_point(|p| p.frequency_hz <= band.high_hz);
        &self.points[lo..hi]
    }

    /// Index of the bin nearest to `frequency_hz`, or `None` if empty.
    pub fn nearest_bin(&self, frequency_hz: f32) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (a.frequency_hz - frequency_hz)
                    .abs()
                    .total_cmp(&(b.frequency_hz - frequency_hz).abs())
            })
            .map(|(i, _)| i)
    }
}

/// One power spectral density bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PsdPoint {
    /// Bin frequency in Hz.
    pub frequency_hz: f32,
    /// Power density (power per Hz), non-negative.
    pub power: f32,
}

/// Welch PSD estimate: bins ordered by ascending frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Psd {
    points: Vec<PsdPoint>,
}

impl Psd {
    /// All bins.
    pub fn points(&self) -> &[PsdPoint] {
        &self.points
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the estimate has no bins.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bins whose frequency falls within the band (inclusive edges).
    pub fn band_points(&self, band: &FrequencyBand) -> &[PsdPoint] {
        let lo = self
            .points
            .partition_point(|p| p.frequency_hz < band.low_hz);
        let hi = self
            .points
            .partition_point(|p| p.frequency_hz <= band.high_hz);
        &self.points[lo..hi]
    }
}

/// Compute the DFT magnitude spectrum of the full signal.
///
/// Returns the non-negative frequency bins only: frequency `k * fs / N` for
/// `k` in `[0, N/2]`, magnitude the complex modulus. Deterministic, no side
/// effects; the degenerate empty-signal case is unrepresentable because
/// [`Signal`] guarantees at least one sample.
pub fn fft_spectrum(signal: &Signal) -> Spectrum {
    let n = signal.len();
    let fft = Fft::new(n);
    let bins = fft.forward(signal.samples());

    let bin_width = signal.sample_rate() as f32 / n as f32;
    let points = bins
        .iter()
        .enumerate()
        .map(|(k, c)| SpectrumPoint {
            frequency_hz: k as f32 * bin_width,
            magnitude: c.norm(),
        })
        .collect();

    // Construction order is ascending by k, so the ordering invariant holds.
    Spectrum { points }
}

/// Estimate the power spectral density with Welch's method.
///
/// Hann-windowed segments with 50% overlap, periodograms averaged across
/// segments, one-sided density scaling (power per Hz). `segment_length` is
/// clamped to the signal length, so at least one segment always exists.
pub fn psd_welch(signal: &Signal, segment_length: usize) -> Result<Psd> {
    if segment_length == 0 {
        return Err(Error::InvalidInput(
            "Welch segment length must be positive".into(),
        ));
    }

    let samples = signal.samples();
    let fs = signal.sample_rate() as f32;
    let seg_len = segment_length.min(samples.len());
    let step = (seg_len - seg_len / 2).max(1);

    // A one-sample segment would get a degenerate (all-zero) Hann window.
    let taper = if seg_len > 1 {
        Window::Hann
    } else {
        Window::Rectangular
    };
    let window = taper.coefficients(seg_len);
    let window_power: f32 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (fs * window_power);

    let fft = Fft::new(seg_len);
    let num_bins = seg_len / 2 + 1;
    let mut averaged = vec![0.0f32; num_bins];
    let mut num_segments = 0u32;

    let mut start = 0;
    while start + seg_len <= samples.len() {
        let mut segment: Vec<f32> = samples[start..start + seg_len].to_vec();
        for (s, w) in segment.iter_mut().zip(window.iter()) {
            *s *= w;
        }

        let bins = fft.forward(&segment);
        for (k, c) in bins.iter().enumerate() {
            let mut power = c.norm_sqr() * scale;
            // One-sided spectrum: double everything except DC and (for even
            // segment lengths) the Nyquist bin.
            if k != 0 && !(seg_len % 2 == 0 && k == num_bins - 1) {
                power *= 2.0;
            }
            averaged[k] += power;
        }

        num_segments += 1;
        start += step;
    }

    debug_assert!(num_segments >= 1);
    let bin_width = fs / seg_len as f32;
    let points = averaged
        .iter()
        .enumerate()
        .map(|(k, p)| PsdPoint {
            frequency_hz: k as f32 * bin_width,
            power: p / num_segments as f32,
        })
        .collect();

    Ok(Psd { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_signal(freq: f32, sample_rate: u32, num_samples: usize) -> Signal {
        let samples: Vec<f32> = (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        Signal::new(samples, sample_rate).unwrap()
    }

    #[test]
    fn test_fft_spectrum_bin_count_and_ordering() {
        let signal = sine_signal(440.0, 8000, 1000);
        let spectrum = fft_spectrum(&signal);

        assert_eq!(spectrum.len(), 501);
        assert_eq!(spectrum.points()[0].frequency_hz, 0.0);
        assert!(
            spectrum
                .points()
                .windows(2)
                .all(|w| w[1].frequency_hz > w[0].frequency_hz)
        );
    }

    #[test]
    fn test_fft_spectrum_peak_at_tone() {
        let signal = sine_signal(1000.0, 8000, 4000);
        let spectrum = fft_spectrum(&signal);

        let peak = spectrum
            .points()
            .iter()
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
            .unwrap();
        assert!(
            (peak.frequency_hz - 1000.0).abs() < 2.0,
            "peak at {} Hz",
            peak.frequency_hz
        );
    }

    #[test]
    fn test_psd_welch_frequency_range_and_sign() {
        let signal = sine_signal(440.0, 8000, 5000);
        let psd = psd_welch(&signal, 1024).unwrap();

        assert_eq!(psd.len(), 513);
        for point in psd.points() {
            assert!(point.power >= 0.0);
            assert!(point.frequency_hz >= 0.0);
            assert!(point.frequency_hz <= 4000.0);
        }
    }

    #[test]
    fn test_psd_welch_clamps_segment_length() {
        // Signal shorter than the requested segment: still one window.
        let signal = sine_signal(100.0, 8000, 300);
        let psd = psd_welch(&signal, 1024).unwrap();
        assert_eq!(psd.len(), 151);
    }

    #[test]
    fn test_psd_welch_rejects_zero_segment() {
        let signal = sine_signal(100.0, 8000, 300);
        assert!(psd_welch(&signal, 0).is_err());
    }

    #[test]
    fn test_psd_welch_tone_concentrated_in_band() {
        let signal = sine_signal(1000.0, 8000, 16000);
        let psd = psd_welch(&signal, 1024).unwrap();

        let band = FrequencyBand::new(950.0, 1050.0).unwrap();
        let in_band: f32 = psd.band_points(&band).iter().map(|p| p.power).sum();
        let total: f32 = psd.points().iter().map(|p| p.power).sum();

        assert!(
            in_band / total > 0.95,
            "tone energy should concentrate near 1 kHz, got ratio {}",
            in_band / total
        );
    }

    #[test]
    fn test_band_points_inclusive_edges() {
        let signal = sine_signal(100.0, 8000, 8000);
        let spectrum = fft_spectrum(&signal);

        // Bin width is exactly 1 Hz here.
        let band = FrequencyBand::new(10.0, 12.0).unwrap();
        let slice = spectrum.band_points(&band);
        assert_eq!(slice.len(), 3);
        assert_eq!(slice[0].frequency_hz, 10.0);
        assert_eq!(slice[2].frequency_hz, 12.0);
    }

    #[test]
    fn test_nearest_bin() {
        let signal = sine_signal(100.0, 8000, 8000);
        let spectrum = fft_spectrum(&signal);
        let idx = spectrum.nearest_bin(49.6).unwrap();
        assert_eq!(spectrum.points()[idx].frequency_hz, 50.0);
    }

    #[test]
    fn test_spectrum_new_rejects_unordered() {
        let points = vec![
            SpectrumPoint {
                frequency_hz: 10.0,
                magnitude: 1.0,
            },
            SpectrumPoint {
                frequency_hz: 5.0,
                magnitude: 1.0,
            },
        ];
        assert!(Spectrum::new(points).is_err());
    }
}
