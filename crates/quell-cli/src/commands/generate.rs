//! Test signal generation command.

use clap::Args;
use quell_io::{WavSpec, write_wav};
use std::f32::consts::PI;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Tone as freq:amplitude (repeatable, e.g. --tone 50:1.0 --tone 1000:0.1)
    #[arg(short, long, value_parser = parse_tone)]
    tone: Vec<(f32, f32)>,

    /// White noise amplitude (0 disables)
    #[arg(long, default_value = "0.0")]
    noise: f32,

    /// Noise generator seed
    #[arg(long, default_value = "123456789")]
    seed: u32,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "8000")]
    sample_rate: u32,
}

fn parse_tone(s: &str) -> Result<(f32, f32), String> {
    let parts: Vec<&str> = s.splitn(2, ':').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid tone format: '{s}' (expected freq:amplitude)"));
    }
    let freq: f32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid frequency: '{}'", parts[0]))?;
    let amp: f32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid amplitude: '{}'", parts[1]))?;
    if freq < 0.0 || amp < 0.0 {
        return Err("frequency and amplitude must be non-negative".into());
    }
    Ok((freq, amp))
}

/// xorshift PRNG mapped to [-1, 1].
fn noise_sample(state: &mut u32) -> f32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    (x as i32 as f32) / (i32::MAX as f32)
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.tone.is_empty() && args.noise == 0.0 {
        anyhow::bail!("nothing to generate: pass --tone and/or --noise");
    }
    if args.seed == 0 {
        anyhow::bail!("seed must be non-zero");
    }

    let num_samples = (args.duration * args.sample_rate as f32) as usize;
    if num_samples == 0 {
        anyhow::bail!("duration too short for the given sample rate");
    }

    let mut state = args.seed;
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / args.sample_rate as f32;
            let tones: f32 = args
                .tone
                .iter()
                .map(|&(freq, amp)| amp * (2.0 * PI * freq * t).sin())
                .sum();
            tones + args.noise * noise_sample(&mut state)
        })
        .collect();

    let spec = WavSpec {
        channels: 1,
        sample_rate: args.sample_rate,
        bits_per_sample: 32,
    };
    write_wav(&args.output, &samples, spec)?;

    println!(
        "Wrote {} ({} samples, {} Hz, {:.2}s)",
        args.output.display(),
        num_samples,
        args.sample_rate,
        args.duration
    );

    Ok(())
}
