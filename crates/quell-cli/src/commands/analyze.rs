//! Spectral analysis command.

use clap::Args;
use quell_analysis::{fft_spectrum, noise_characteristics, psd_welch, top_frequencies};
use quell_io::read_signal;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Show top N frequency peaks
    #[arg(long, default_value = "10")]
    peaks: usize,

    /// Welch segment length for PSD estimation
    #[arg(long, default_value = "1024")]
    segment_length: usize,

    /// Write the noise report as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the full magnitude spectrum as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    println!("Analyzing {}...", args.input.display());

    let signal = read_signal(&args.input)?;
    println!(
        "  {} samples, {} Hz, {:.2}s",
        signal.len(),
        signal.sample_rate(),
        signal.duration_secs()
    );

    let spectrum = fft_spectrum(&signal);
    let peaks = top_frequencies(&spectrum, args.peaks);

    println!("\nTop {} frequency peaks:", peaks.len());
    println!("  {:>10}  {:>12}", "Freq (Hz)", "Magnitude");
    println!("  {:>10}  {:>12}", "---------", "---------");
    for peak in &peaks {
        println!("  {:>10.1}  {:>12.4}", peak.frequency_hz, peak.magnitude);
    }

    let psd = psd_welch(&signal, args.segment_length)?;
    let report = noise_characteristics(&signal, &psd);

    println!("\nNoise profile:");
    for (name, value) in report.iter() {
        println!("  {name}: {value:.4}");
    }

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
        println!("\nWrote report to {}", output_path.display());
    }

    if let Some(csv_path) = args.csv {
        let mut csv = String::from("frequency_hz,magnitude\n");
        for point in spectrum.points() {
            csv.push_str(&format!("{:.2},{:.6}\n", point.frequency_hz, point.magnitude));
        }
        std::fs::write(&csv_path, csv)?;
        println!("Wrote spectrum to {}", csv_path.display());
    }

    Ok(())
}
