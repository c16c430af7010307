//! Dominant frequency extraction and stop-band selection.

use crate::spectrum::{Spectrum, SpectrumPoint};
use quell_core::FrequencyBand;

/// Default half-width of a peak-derived stop-band in Hz.
pub const DEFAULT_HALF_WIDTH_HZ: f32 = 2.0;

/// Rank spectrum bins by magnitude and return the strongest `n`.
///
/// The sort is stable, so bins with equal magnitude keep their spectral
/// order (first-seen wins) and the result is deterministic for a given
/// input.
pub fn top_frequencies(spectrum: &Spectrum, n: usize) -> Vec<SpectrumPoint> {
    let mut ranked: Vec<SpectrumPoint> = spectrum.points().to_vec();
    ranked.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude));
    ranked.truncate(n);
    ranked
}

/// Turn dominant peaks into a set of narrow stop-bands.
///
/// Each peak becomes `center ± half_width_hz`, clamped to `[0, nyquist]`.
/// Bands from nearby peaks frequently overlap; the returned set is merged
/// so it is always valid band-stop design input.
pub fn noise_bands(
    peaks: &[SpectrumPoint],
    half_width_hz: f32,
    nyquist_hz: f32,
) -> Vec<FrequencyBand> {
    let bands: Vec<FrequencyBand> = peaks
        .iter()
        .filter(|p| p.frequency_hz <= nyquist_hz)
        .map(|p| FrequencyBand {
            low_hz: (p.frequency_hz - half_width_hz).max(0.0),
            high_hz: (p.frequency_hz + half_width_hz).min(nyquist_hz),
        })
        .collect();

    FrequencyBand::merge_overlapping(bands)
}
