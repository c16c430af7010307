//! Single-file denoising command.

use super::common::FilterOpts;
use clap::Args;
use quell_analysis::{Spectrum, fft_spectrum};
use quell_filter::{DEFAULT_RESPONSE_POINTS, denoise, frequency_response};
use quell_io::{read_signal, write_signal};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct DenoiseArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory to place results under (one subdirectory per input)
    #[arg(short, long, default_value = "results")]
    output_dir: PathBuf,

    /// Also write before/after spectra and the filter response as CSV
    #[arg(long)]
    dump_csv: bool,

    #[command(flatten)]
    filter: FilterOpts,
}

pub fn run(args: DenoiseArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let signal = read_signal(&args.input)?;
    println!(
        "  {} samples, {} Hz, {:.2}s",
        signal.len(),
        signal.sample_rate(),
        signal.duration_secs()
    );

    let config = args.filter.to_config();
    let outcome = denoise(&signal, &config)?;

    println!("\nDominant peaks:");
    for peak in &outcome.peaks {
        println!("  {:>8.1} Hz  (magnitude {:.4})", peak.frequency_hz, peak.magnitude);
    }

    println!("\nStop-bands ({} taps):", outcome.filter.len());
    for band in &outcome.stopbands {
        println!("  {}", band.label());
    }

    println!("\nMetrics:");
    for (name, value) in outcome.report.iter() {
        println!("  {name}: {value:.4}");
    }

    let out_dir = output_subdir(&args.output_dir, &args.input)?;
    std::fs::create_dir_all(&out_dir)?;

    let audio_path = out_dir.join("filtered_audio.wav");
    write_signal(&audio_path, &outcome.filtered)?;

    let report_path = out_dir.join("report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&outcome.report)?)?;

    println!("\nWrote {}", audio_path.display());
    println!("Wrote {}", report_path.display());

    if args.dump_csv {
        write_spectrum_csv(&out_dir.join("spectrum_before.csv"), &fft_spectrum(&outcome.original))?;
        write_spectrum_csv(&out_dir.join("spectrum_after.csv"), &fft_spectrum(&outcome.filtered))?;
        let response = frequency_response(&outcome.filter, DEFAULT_RESPONSE_POINTS)?;
        write_spectrum_csv(&out_dir.join("filter_response.csv"), &response)?;
        println!("Wrote CSV dumps to {}", out_dir.display());
    }

    Ok(())
}

fn write_spectrum_csv(path: &Path, spectrum: &Spectrum) -> anyhow::Result<()> {
    let mut csv = String::from("frequency_hz,magnitude\n");
    for point in spectrum.points() {
        csv.push_str(&format!("{:.2},{:.6}\n", point.frequency_hz, point.magnitude));
    }
    std::fs::write(path, csv)?;
    Ok(())
}

/// `results/<input stem>/` for a given input path.
pub fn output_subdir(output_dir: &Path, input: &Path) -> anyhow::Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("input path has no file name: {}", input.display()))?;
    Ok(output_dir.join(stem))
}
