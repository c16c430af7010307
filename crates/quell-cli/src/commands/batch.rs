//! Directory-wide denoising command.

use super::common::FilterOpts;
use super::denoise::output_subdir;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use quell_filter::denoise;
use quell_io::{read_signal, write_signal};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Args)]
pub struct BatchArgs {
    /// Directory of WAV files to process
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory to place results under (one subdirectory per input)
    #[arg(short, long, default_value = "results")]
    output_dir: PathBuf,

    #[command(flatten)]
    filter: FilterOpts,
}

pub fn run(args: BatchArgs) -> anyhow::Result<()> {
    let mut inputs: Vec<PathBuf> = std::fs::read_dir(&args.input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
        })
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        anyhow::bail!("no WAV files found in {}", args.input_dir.display());
    }

    println!("Processing {} file(s)...", inputs.len());
    let config = args.filter.to_config();

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let mut summary = serde_json::Map::new();
    let mut failures = 0usize;

    for input in &inputs {
        pb.set_message(
            input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        match process_one(input, &args, &config) {
            Ok(report) => {
                summary.insert(input.display().to_string(), report);
            }
            Err(err) => {
                // A bad file should not sink the rest of the batch.
                warn!(input = %input.display(), %err, "skipping file");
                failures += 1;
                summary.insert(input.display().to_string(), json!({ "error": err.to_string() }));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    std::fs::create_dir_all(&args.output_dir)?;
    let summary_path = args.output_dir.join("batch_summary.json");
    std::fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;

    println!(
        "\nProcessed {} file(s), {} failed",
        inputs.len() - failures,
        failures
    );
    println!("Wrote {}", summary_path.display());

    Ok(())
}

fn process_one(
    input: &Path,
    args: &BatchArgs,
    config: &quell_filter::DenoiseConfig,
) -> anyhow::Result<serde_json::Value> {
    let signal = read_signal(input)?;
    let outcome = denoise(&signal, config)?;

    let out_dir = output_subdir(&args.output_dir, input)?;
    std::fs::create_dir_all(&out_dir)?;
    write_signal(out_dir.join("filtered_audio.wav"), &outcome.filtered)?;
    std::fs::write(
        out_dir.join("report.json"),
        serde_json::to_string_pretty(&outcome.report)?,
    )?;

    Ok(serde_json::to_value(&outcome.report)?)
}
