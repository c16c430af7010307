//! Property-based tests for the spectral estimators.
//!
//! Uses proptest to verify the estimator invariants over arbitrary finite
//! signals: bounded PSD bins, ordered spectra, flatness staying in [0, 1].

use proptest::prelude::*;
use quell_analysis::{fft_spectrum, psd_welch, spectral_flatness};
use quell_core::Signal;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// For any finite signal and any positive segment length, every PSD
    /// bin has non-negative finite power and a frequency in [0, Nyquist].
    #[test]
    fn psd_welch_bins_are_bounded(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..1024),
        sample_rate in 1u32..48_000,
        segment_length in 1usize..1024,
    ) {
        let signal = Signal::new(samples, sample_rate).unwrap();
        let psd = psd_welch(&signal, segment_length).unwrap();
        let nyquist = sample_rate as f32 / 2.0;

        prop_assert!(!psd.is_empty());
        for point in psd.points() {
            prop_assert!(point.power >= 0.0);
            prop_assert!(point.power.is_finite());
            prop_assert!(point.frequency_hz >= 0.0);
            prop_assert!(
                point.frequency_hz <= nyquist * 1.0001 + 1e-3,
                "bin at {} Hz above Nyquist {} Hz",
                point.frequency_hz, nyquist
            );
        }
    }

    /// Spectral flatness is a geometric-to-arithmetic mean ratio, so it
    /// never leaves [0, 1] (up to float rounding) for any input.
    #[test]
    fn spectral_flatness_stays_in_unit_interval(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 8..2048),
        segment_length in 2usize..512,
    ) {
        let signal = Signal::new(samples, 8000).unwrap();
        let flatness = spectral_flatness(&psd_welch(&signal, segment_length).unwrap());

        prop_assert!(flatness >= 0.0);
        prop_assert!(flatness <= 1.0 + 1e-4, "flatness {flatness} above 1");
    }

    /// The full-signal spectrum always has N/2 + 1 bins, ascending
    /// frequencies, and non-negative magnitudes.
    #[test]
    fn fft_spectrum_is_ordered_and_nonnegative(
        samples in prop::collection::vec(-1.0f32..=1.0f32, 1..512),
        sample_rate in 1u32..48_000,
    ) {
        let n = samples.len();
        let signal = Signal::new(samples, sample_rate).unwrap();
        let spectrum = fft_spectrum(&signal);

        prop_assert_eq!(spectrum.len(), n / 2 + 1);
        prop_assert!(spectrum.points().iter().all(|p| p.magnitude >= 0.0));
        prop_assert!(
            spectrum
                .points()
                .windows(2)
                .all(|w| w[1].frequency_hz >= w[0].frequency_hz)
        );
    }
}
