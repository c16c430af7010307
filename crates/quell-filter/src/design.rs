//! FIR band-stop synthesis via frequency-sampling design.
//!
//! The desired response is piecewise constant over normalized frequency
//! [0, 1] (1.0 = Nyquist): unity in the passbands, zero across each stop
//! span. It is sampled on a dense grid, given the linear phase of a type-I
//! filter, inverse-transformed, truncated to the requested tap count, and
//! smoothed with a Hamming window.

use crate::filter::FirFilter;
use quell_analysis::Fft;
use quell_core::{Error, FrequencyBand, Result};
use rustfft::num_complex::Complex;
use std::f32::consts::PI;
use tracing::warn;

/// Default tap count for [`design_bandstop`].
pub const DEFAULT_NUM_TAPS: usize = 101;

/// Symmetric Hamming window (distinct from the periodic analysis window:
/// filter taps must stay symmetric about the center for linear phase).
fn hamming_symmetric(size: usize) -> Vec<f32> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f32 / (size - 1) as f32).cos())
        .collect()
}

/// Validate stop-bands against [0, Nyquist] and return normalized
/// `(low, high)` spans sorted by lower edge, clamped to Nyquist.
fn normalized_spans(stopbands: &[FrequencyBand], nyquist: f32) -> Result<Vec<(f32, f32)>> {
    let mut spans = Vec::with_capacity(stopbands.len());
    for band in stopbands {
        // Re-validate: FrequencyBand fields are public, so a hand-built
        // inverted or negative band could reach here.
        let band = FrequencyBand::new(band.low_hz, band.high_hz)?;
        if band.low_hz > nyquist {
            return Err(Error::InvalidSpec(format!(
                "stop-band {} lies entirely above Nyquist ({nyquist} Hz)",
                band.label()
            )));
        }
        let high = band.high_hz.min(nyquist);
        spans.push((band.low_hz / nyquist, high / nyquist));
    }

    spans.sort_by(|a, b| a.0.total_cmp(&b.0));
    for pair in spans.windows(2) {
        if pair[1].0 < pair[0].1 {
            return Err(Error::InvalidSpec(format!(
                "stop-bands overlap: breakpoints are not monotonic near normalized \
                 frequency {}",
                pair[1].0
            )));
        }
    }
    Ok(spans)
}

/// Design a linear-phase FIR band-stop filter.
///
/// `num_taps` must be odd (type-I filter, symmetric group delay of
/// `(num_taps - 1) / 2` samples). An empty stop-band set yields an
/// identity-like all-pass (single unit center tap).
///
/// Attenuation at the center of a stop-band degrades once the band is
/// narrower than roughly `2 * sample_rate / num_taps` Hz — the Hamming
/// main-lobe width. Very narrow notches therefore need tap counts in the
/// thousands; see [`crate::denoise::DEFAULT_PIPELINE_TAPS`].
pub fn design_bandstop(
    stopbands: &[FrequencyBand],
    sample_rate: u32,
    num_taps: usize,
) -> Result<FirFilter> {
    if sample_rate == 0 {
        return Err(Error::InvalidSpec("sample rate must be positive".into()));
    }
    if num_taps == 0 {
        return Err(Error::InvalidSpec("filter needs at least one tap".into()));
    }
    if num_taps % 2 == 0 {
        return Err(Error::InvalidSpec(format!(
            "num_taps must be odd for a symmetric band-stop filter, got {num_taps}"
        )));
    }

    let nyquist = sample_rate as f32 / 2.0;
    let spans = normalized_spans(stopbands, nyquist)?;

    // Dense sampling grid: 2^ceil(log2(num_taps)) + 1 points over [0, 1].
    let nfreqs = num_taps.next_power_of_two() + 1;
    let fft_size = 2 * (nfreqs - 1);
    let group_delay = (num_taps - 1) as f32 / 2.0;

    // A span narrower than the grid spacing covers no sample point and
    // drops out of the design, leaving an all-pass in its place.
    let grid = (nfreqs - 1) as f32;
    for &(lo, hi) in &spans {
        if (lo * grid).ceil() > (hi * grid).floor() {
            warn!(
                low_hz = lo * nyquist,
                high_hz = hi * nyquist,
                grid_spacing_hz = nyquist / grid,
                "stop-band narrower than the design grid spacing; increase num_taps"
            );
        }
    }

    let mut buffer = vec![Complex::new(0.0f32, 0.0); fft_size];
    for k in 0..nfreqs {
        let x = k as f32 / (nfreqs - 1) as f32;
        let desired = if spans.iter().any(|&(lo, hi)| x >= lo && x <= hi) {
            0.0
        } else {
            1.0
        };
        // Linear phase so the impulse response centers on the middle tap.
        let angle = -PI * x * group_delay;
        buffer[k] = Complex::from_polar(desired, angle);
    }
    // Conjugate symmetry for a real impulse response.
    for k in 1..nfreqs - 1 {
        buffer[fft_size - k] = buffer[k].conj();
    }

    let fft = Fft::new(fft_size);
    fft.inverse_complex(&mut buffer);

    let window = hamming_symmetric(num_taps);
    let taps: Vec<f32> = buffer[..num_taps]
        .iter()
        .zip(window.iter())
        .map(|(c, w)| c.re * w)
        .collect();

    FirFilter::new(taps, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::frequency_response;

    fn band(low: f32, high: f32) -> FrequencyBand {
        FrequencyBand::new(low, high).unwrap()
    }

    fn gain_at(filter: &FirFilter, frequency_hz: f32) -> f32 {
        let response = frequency_response(filter, 8000).unwrap();
        let idx = response.nearest_bin(frequency_hz).unwrap();
        response.points()[idx].magnitude
    }

    #[test]
    fn test_rejects_even_taps() {
        assert!(design_bandstop(&[band(100.0, 200.0)], 8000, 100).is_err());
    }

    #[test]
    fn test_rejects_zero_taps() {
        assert!(design_bandstop(&[], 8000, 0).is_err());
    }

    #[test]
    fn test_rejects_band_above_nyquist() {
        assert!(design_bandstop(&[band(5000.0, 6000.0)], 8000, 101).is_err());
    }

    #[test]
    fn test_rejects_overlapping_bands() {
        let bands = [band(100.0, 200.0), band(150.0, 300.0)];
        assert!(design_bandstop(&bands, 8000, 101).is_err());
    }

    #[test]
    fn test_touching_bands_are_monotonic() {
        let bands = [band(100.0, 200.0), band(200.0, 300.0)];
        assert!(design_bandstop(&bands, 8000, 101).is_ok());
    }

    #[test]
    fn test_empty_stopbands_is_allpass() {
        let filter = design_bandstop(&[], 8000, 101).unwrap();
        assert_eq!(filter.len(), 101);

        // Center tap ~1, everything else negligible.
        assert!((filter.taps()[50] - 1.0).abs() < 1e-3);

        let response = frequency_response(&filter, 2000).unwrap();
        for point in response.points() {
            assert!(
                (point.magnitude - 1.0).abs() < 0.05,
                "gain {} at {} Hz",
                point.magnitude,
                point.frequency_hz
            );
        }
    }

    #[test]
    fn test_taps_are_symmetric() {
        let filter = design_bandstop(&[band(400.0, 600.0)], 8000, 101).unwrap();
        let taps = filter.taps();
        for i in 0..taps.len() / 2 {
            let mirror = taps[taps.len() - 1 - i];
            assert!(
                (taps[i] - mirror).abs() < 1e-5,
                "tap {i}: {} vs {}",
                taps[i],
                mirror
            );
        }
    }

    #[test]
    fn test_wide_bandstop_with_default_taps() {
        // A 600 Hz-wide stop is comfortably wider than the ~260 Hz Hamming
        // transition of a 101-tap design at fs 8000.
        let filter = design_bandstop(&[band(1000.0, 1600.0)], 8000, DEFAULT_NUM_TAPS).unwrap();

        assert!(gain_at(&filter, 1300.0) < 0.1, "stop center should be deep");
        assert!(gain_at(&filter, 500.0) > 0.8, "low passband should survive");
        assert!(gain_at(&filter, 3000.0) > 0.9, "high passband should survive");
    }

    #[test]
    fn test_band_narrower_than_grid_passes_through() {
        // At 101 taps the grid spacing is 4000/128 = 31.25 Hz; a 0.5 Hz
        // band covers no grid sample, so the design degenerates to an
        // all-pass (and logs a warning rather than failing).
        let filter = design_bandstop(&[band(48.0, 48.5)], 8000, 101).unwrap();
        assert!(gain_at(&filter, 48.25) > 0.9);
    }

    #[test]
    fn test_narrow_notch_needs_long_filter() {
        // (48, 51) Hz at fs 8000: a 3 Hz notch requires thousands of taps.
        let filter = design_bandstop(&[band(48.0, 51.0)], 8000, 12001).unwrap();

        assert!(
            gain_at(&filter, 49.5) < 0.3,
            "gain at 49.5 Hz = {}",
            gain_at(&filter, 49.5)
        );
        assert!(
            gain_at(&filter, 2000.0) > 0.8,
            "gain at 2 kHz = {}",
            gain_at(&filter, 2000.0)
        );
    }

    #[test]
    fn test_multiple_stopbands() {
        let bands = [band(400.0, 600.0), band(1400.0, 1600.0)];
        let filter = design_bandstop(&bands, 8000, 401).unwrap();

        assert!(gain_at(&filter, 500.0) < 0.1);
        assert!(gain_at(&filter, 1500.0) < 0.1);
        assert!(gain_at(&filter, 1000.0) > 0.9);
        assert!(gain_at(&filter, 3000.0) > 0.9);
    }
}
