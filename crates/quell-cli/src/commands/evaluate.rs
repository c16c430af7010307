//! Original-vs-filtered comparison command.

use super::common::parse_band;
use clap::Args;
use quell_analysis::{MetricsReport, band_energy, psd_welch, snr_db, spectral_flatness};
use quell_core::{FrequencyBand, Signal};
use quell_io::read_signal;
use std::path::PathBuf;

#[derive(Args)]
pub struct EvaluateArgs {
    /// Original (unfiltered) WAV file
    #[arg(value_name = "ORIGINAL")]
    original: PathBuf,

    /// Filtered WAV file
    #[arg(value_name = "FILTERED")]
    filtered: PathBuf,

    /// Frequency band as low:high in Hz to compare energy in (repeatable)
    #[arg(short, long, value_parser = parse_band)]
    band: Vec<FrequencyBand>,

    /// Welch segment length for PSD estimation
    #[arg(long, default_value = "4096")]
    segment_length: usize,

    /// Write the evaluation as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: EvaluateArgs) -> anyhow::Result<()> {
    println!("Comparing:");
    println!("  Original: {}", args.original.display());
    println!("  Filtered: {}", args.filtered.display());

    let original = read_signal(&args.original)?;
    let filtered = read_signal(&args.filtered)?;

    if original.sample_rate() != filtered.sample_rate() {
        anyhow::bail!(
            "Sample rate mismatch: {} vs {}",
            original.sample_rate(),
            filtered.sample_rate()
        );
    }

    // Compare over the common prefix if the lengths differ.
    let len = original.len().min(filtered.len());
    let original = Signal::new(original.samples()[..len].to_vec(), original.sample_rate())?;
    let filtered = Signal::new(filtered.samples()[..len].to_vec(), filtered.sample_rate())?;

    let report = evaluate(&original, &filtered, &args.band, args.segment_length)?;

    println!("\nEvaluation:");
    for (name, value) in report.iter() {
        println!("  {name}: {value:.4}");
    }

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
        println!("\nWrote evaluation to {}", output_path.display());
    }

    Ok(())
}

/// Before/after metrics over a matched pair of signals.
fn evaluate(
    original: &Signal,
    filtered: &Signal,
    bands: &[FrequencyBand],
    segment_length: usize,
) -> anyhow::Result<MetricsReport> {
    let mut report = MetricsReport::new();

    // The removed component stands in for the noise.
    let residual: Vec<f32> = original
        .samples()
        .iter()
        .zip(filtered.samples())
        .map(|(o, f)| o - f)
        .collect();
    report.insert(
        "snr_before_db",
        f64::from(snr_db(original.samples(), &residual)?),
    );
    report.insert(
        "snr_after_db",
        f64::from(snr_db(filtered.samples(), &residual)?),
    );

    let psd_before = psd_welch(original, segment_length)?;
    let psd_after = psd_welch(filtered, segment_length)?;
    report.insert(
        "spectral_flatness_before",
        f64::from(spectral_flatness(&psd_before)),
    );
    report.insert(
        "spectral_flatness_after",
        f64::from(spectral_flatness(&psd_after)),
    );

    for band in bands {
        report.insert_band("band_energy_before", band, f64::from(band_energy(&psd_before, band)));
        report.insert_band("band_energy_after", band, f64::from(band_energy(&psd_after, band)));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_evaluate_identical_signals() {
        let samples: Vec<f32> = (0..4096)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 8000.0).sin())
            .collect();
        let signal = Signal::new(samples, 8000).unwrap();

        let report = evaluate(&signal, &signal, &[], 1024).unwrap();

        // Zero residual means infinite SNR on both sides.
        assert!(report.get("snr_before_db").unwrap().is_infinite());
        assert!(report.get("snr_after_db").unwrap().is_infinite());
    }

    #[test]
    fn test_evaluate_reports_band_energies() {
        let samples: Vec<f32> = (0..8192)
            .map(|i| (2.0 * PI * 1000.0 * i as f32 / 8000.0).sin())
            .collect();
        let original = Signal::new(samples, 8000).unwrap();
        let filtered = Signal::new(vec![0.0; 8192], 8000).unwrap();

        let band = FrequencyBand::new(990.0, 1010.0).unwrap();
        let report = evaluate(&original, &filtered, &[band], 1024).unwrap();

        let before = report.get("band_energy_before_990-1010Hz").unwrap();
        let after = report.get("band_energy_after_990-1010Hz").unwrap();
        assert!(before > 0.0);
        assert_eq!(after, 0.0);
    }
}
