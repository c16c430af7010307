//! Quality metrics for before/after filtering comparison.
//!
//! SNR and flatness follow the conventions of the evaluation stage: SNR is
//! mean-square power ratio in dB with a +∞ limit for exactly-zero noise
//! power, flatness is the geometric-to-arithmetic mean ratio of an
//! epsilon-floored PSD.

use crate::report::MetricsReport;
use crate::spectrum::{Psd, Spectrum};
use quell_core::{Error, FrequencyBand, Result, Signal};

/// Floor applied to PSD bins before any logarithm to avoid `-inf`.
pub const PSD_EPSILON: f32 = 1e-12;

/// Number of bins inspected on each side of the main peak for the relative
/// side-lobe level.
const SIDE_LOBE_SPAN: usize = 5;

fn mean_square(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32
}

/// Signal-to-noise ratio in dB: `10·log10(P_ref / P_other)`.
///
/// Powers are mean squares over the overlapping prefix of the two slices
/// (the caller aligns/truncates signals that are meant to be compared
/// sample-by-sample). Returns +∞ when the denominator power is exactly
/// zero, never NaN.
pub fn snr_db(reference: &[f32], other: &[f32]) -> Result<f32> {
    let len = reference.len().min(other.len());
    if len == 0 {
        return Err(Error::InvalidInput(
            "SNR requires at least one overlapping sample".into(),
        ));
    }

    let p_ref = mean_square(&reference[..len]);
    let p_other = mean_square(&other[..len]);

    if p_other == 0.0 {
        return Ok(f32::INFINITY);
    }
    Ok(10.0 * (p_ref / p_other).log10())
}

/// Spectral flatness in (0, 1]: geometric mean over arithmetic mean of the
/// PSD, after flooring bins at [`PSD_EPSILON`].
///
/// Close to 0 for tonal content, close to 1 for white-noise-like content.
/// Returns 0 for a degenerate (empty or non-positive) estimate.
pub fn spectral_flatness(psd: &Psd) -> f32 {
    if psd.is_empty() {
        return 0.0;
    }

    let n = psd.len() as f32;
    let log_sum: f32 = psd
        .points()
        .iter()
        .map(|p| p.power.max(PSD_EPSILON).ln())
        .sum();
    let geometric_mean = (log_sum / n).exp();
    let arithmetic_mean: f32 = psd
        .points()
        .iter()
        .map(|p| p.power.max(PSD_EPSILON))
        .sum::<f32>()
        / n;

    if arithmetic_mean > 0.0 {
        geometric_mean / arithmetic_mean
    } else {
        0.0
    }
}

/// Sum of PSD power whose frequency falls within the band (inclusive).
///
/// Zero when no bins fall in range, e.g. a band entirely above Nyquist.
pub fn band_energy(psd: &Psd, band: &FrequencyBand) -> f32 {
    psd.band_points(band).iter().map(|p| p.power).sum()
}

/// Passband ripple in dB: `20·log10(max/min magnitude)` within the band.
pub fn passband_ripple_db(spectrum: &Spectrum, passband: &FrequencyBand) -> Result<f32> {
    let bins = spectrum.band_points(passband);
    if bins.is_empty() {
        return Err(Error::InvalidInput(format!(
            "passband {} selects no spectrum bins",
            passband.label()
        )));
    }

    let max = bins.iter().map(|p| p.magnitude).fold(f32::MIN, f32::max);
    let min = bins.iter().map(|p| p.magnitude).fold(f32::MAX, f32::min);
    if min <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "passband {} contains a zero magnitude, ripple undefined",
            passband.label()
        )));
    }

    Ok(20.0 * (max / min).log10())
}

/// Peak stop-band level in dB: `20·log10(max magnitude)` within the band.
///
/// This is an absolute level, not an attenuation relative to the passband;
/// callers must supply pre-normalized magnitudes (e.g. a filter response
/// with unity passband gain) for the value to read as attenuation. The
/// literal computation is kept deliberately.
pub fn stopband_attenuation_db(spectrum: &Spectrum, stopband: &FrequencyBand) -> Result<f32> {
    let bins = spectrum.band_points(stopband);
    if bins.is_empty() {
        return Err(Error::InvalidInput(format!(
            "stopband {} selects no spectrum bins",
            stopband.label()
        )));
    }

    let max = bins.iter().map(|p| p.magnitude).fold(f32::MIN, f32::max);
    if max <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "stopband {} has no positive magnitude, level undefined",
            stopband.label()
        )));
    }

    Ok(20.0 * max.log10())
}

/// Relative side-lobe level in dB.
///
/// Locates the bin nearest `main_frequency_hz` and compares its magnitude
/// against the strongest of the 5 bins on each side (main bin excluded):
/// `20·log10(side_max / main)`. Returns −∞ when every side bin is zero.
pub fn relative_side_lobe_db(spectrum: &Spectrum, main_frequency_hz: f32) -> Result<f32> {
    let Some(main_idx) = spectrum.nearest_bin(main_frequency_hz) else {
        return Err(Error::InvalidInput("spectrum has no bins".into()));
    };

    if main_idx < SIDE_LOBE_SPAN || main_idx + SIDE_LOBE_SPAN >= spectrum.len() {
        return Err(Error::InvalidInput(format!(
            "main peak at bin {main_idx} has fewer than {SIDE_LOBE_SPAN} bins on a side"
        )));
    }

    let points = spectrum.points();
    let main = points[main_idx].magnitude;
    if main <= 0.0 {
        return Err(Error::InvalidInput(
            "main peak magnitude is zero, side-lobe level undefined".into(),
        ));
    }

    let side_max = points[main_idx - SIDE_LOBE_SPAN..main_idx]
        .iter()
        .chain(&points[main_idx + 1..=main_idx + SIDE_LOBE_SPAN])
        .map(|p| p.magnitude)
        .fold(f32::MIN, f32::max);

    Ok(20.0 * (side_max / main).log10())
}

/// Noise characteristics of a single signal, as reported by the analyzer:
/// RMS amplitude, mean-PSD noise floor, and the approximate SNR of signal
/// power against that floor.
pub fn noise_characteristics(signal: &Signal, psd: &Psd) -> MetricsReport {
    let rms = mean_square(signal.samples()).sqrt();
    let noise_floor =
        psd.points().iter().map(|p| p.power).sum::<f32>() / psd.len().max(1) as f32;

    let signal_power = mean_square(signal.samples());
    let snr = if noise_floor > 0.0 {
        10.0 * (signal_power / noise_floor).log10()
    } else {
        f32::INFINITY
    };

    let mut report = MetricsReport::new();
    report.insert("rms_amplitude", f64::from(rms));
    report.insert("noise_floor", f64::from(noise_floor));
    report.insert("signal_to_noise_ratio_db", f64::from(snr));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::{SpectrumPoint, psd_welch};
    use std::f32::consts::PI;

    fn sine_signal(freq: f32, sample_rate: u32, num_samples: usize) -> Signal {
        let samples: Vec<f32> = (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect();
        Signal::new(samples, sample_rate).unwrap()
    }

    /// Deterministic uniform noise in [-1, 1] (xorshift).
    fn noise_samples(num_samples: usize, mut state: u32) -> Vec<f32> {
        (0..num_samples)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state as i32 as f32) / (i32::MAX as f32)
            })
            .collect()
    }

    #[test]
    fn test_snr_zero_noise_is_infinite() {
        let x = [0.5f32, -0.25, 0.75];
        let zeros = [0.0f32; 3];
        assert_eq!(snr_db(&x, &zeros).unwrap(), f32::INFINITY);
    }

    #[test]
    fn test_snr_known_ratio() {
        // Reference power 1.0, other power 0.01 -> 20 dB.
        let reference = [1.0f32, -1.0, 1.0, -1.0];
        let other = [0.1f32, -0.1, 0.1, -0.1];
        let snr = snr_db(&reference, &other).unwrap();
        assert!((snr - 20.0).abs() < 1e-3, "snr = {snr}");
    }

    #[test]
    fn test_snr_uses_overlapping_prefix() {
        let reference = [1.0f32, 1.0, 1.0, 1.0, 100.0];
        let other = [0.1f32, 0.1, 0.1, 0.1];
        let snr = snr_db(&reference, &other).unwrap();
        assert!((snr - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_snr_empty_is_error() {
        assert!(snr_db(&[], &[1.0]).is_err());
    }

    #[test]
    fn test_flatness_separates_tone_from_noise() {
        let sample_rate = 8000;
        let tone = sine_signal(440.0, sample_rate, 8000);
        let noise = Signal::new(noise_samples(8000, 0x1234_5678), sample_rate).unwrap();

        let flat_tone = spectral_flatness(&psd_welch(&tone, 1024).unwrap());
        let flat_noise = spectral_flatness(&psd_welch(&noise, 1024).unwrap());

        assert!(flat_tone < 0.3, "tone flatness {flat_tone}");
        assert!(flat_noise > 0.5, "noise flatness {flat_noise}");
        assert!(flat_noise - flat_tone >= 0.3);
    }

    #[test]
    fn test_flatness_bounded() {
        let noise = Signal::new(noise_samples(4000, 42), 8000).unwrap();
        let flatness = spectral_flatness(&psd_welch(&noise, 1024).unwrap());
        assert!(flatness > 0.0 && flatness <= 1.0);
    }

    #[test]
    fn test_band_energy_above_nyquist_is_zero() {
        let signal = sine_signal(440.0, 8000, 8000);
        let psd = psd_welch(&signal, 1024).unwrap();
        let band = FrequencyBand::new(5000.0, 6000.0).unwrap();
        assert_eq!(band_energy(&psd, &band), 0.0);
    }

    #[test]
    fn test_band_energy_captures_tone() {
        let signal = sine_signal(1000.0, 8000, 16000);
        let psd = psd_welch(&signal, 1024).unwrap();

        let at_tone = band_energy(&psd, &FrequencyBand::new(980.0, 1020.0).unwrap());
        let elsewhere = band_energy(&psd, &FrequencyBand::new(2000.0, 2040.0).unwrap());
        assert!(at_tone > elsewhere * 1000.0);
    }

    fn flat_spectrum(mags: &[f32]) -> Spectrum {
        Spectrum::new(
            mags.iter()
                .enumerate()
                .map(|(i, &magnitude)| SpectrumPoint {
                    frequency_hz: i as f32,
                    magnitude,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_passband_ripple() {
        let spectrum = flat_spectrum(&[1.0, 2.0, 1.0, 0.5, 1.0]);
        let band = FrequencyBand::new(0.0, 4.0).unwrap();
        let ripple = passband_ripple_db(&spectrum, &band).unwrap();
        // max/min = 2.0/0.5 = 4 -> ~12.04 dB
        assert!((ripple - 12.04).abs() < 0.01);
    }

    #[test]
    fn test_passband_ripple_empty_band_is_error() {
        let spectrum = flat_spectrum(&[1.0, 1.0]);
        let band = FrequencyBand::new(10.0, 20.0).unwrap();
        assert!(passband_ripple_db(&spectrum, &band).is_err());
    }

    #[test]
    fn test_passband_ripple_zero_min_is_error() {
        let spectrum = flat_spectrum(&[1.0, 0.0, 1.0]);
        let band = FrequencyBand::new(0.0, 2.0).unwrap();
        assert!(passband_ripple_db(&spectrum, &band).is_err());
    }

    #[test]
    fn test_stopband_attenuation_is_absolute_level() {
        let spectrum = flat_spectrum(&[1.0, 0.1, 0.01, 1.0]);
        let band = FrequencyBand::new(1.0, 2.0).unwrap();
        let level = stopband_attenuation_db(&spectrum, &band).unwrap();
        // 20*log10(0.1) = -20 dB, independent of the passband level.
        assert!((level - (-20.0)).abs() < 0.01);
    }

    #[test]
    fn test_relative_side_lobe() {
        let mut mags = vec![0.1f32; 21];
        mags[10] = 1.0; // main peak at bin 10
        mags[12] = 0.5; // strongest side lobe
        let spectrum = flat_spectrum(&mags);

        let level = relative_side_lobe_db(&spectrum, 10.0).unwrap();
        // 20*log10(0.5/1.0) ~ -6.02 dB
        assert!((level - (-6.02)).abs() < 0.01);
    }

    #[test]
    fn test_relative_side_lobe_needs_margin() {
        let spectrum = flat_spectrum(&[1.0, 0.5, 0.2, 0.1]);
        assert!(relative_side_lobe_db(&spectrum, 0.0).is_err());
    }

    #[test]
    fn test_noise_characteristics_keys() {
        let signal = sine_signal(440.0, 8000, 8000);
        let psd = psd_welch(&signal, 1024).unwrap();
        let report = noise_characteristics(&signal, &psd);

        assert!(report.get("rms_amplitude").is_some());
        assert!(report.get("noise_floor").is_some());
        assert!(report.get("signal_to_noise_ratio_db").is_some());

        // RMS of a unit sine is ~0.707.
        let rms = report.get("rms_amplitude").unwrap();
        assert!((rms - 0.707).abs() < 0.01);
    }
}
