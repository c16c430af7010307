//! Shared CLI helpers used across multiple commands.

use quell_core::FrequencyBand;
use quell_filter::DenoiseConfig;

/// Parse a `low:high` frequency band for clap's `value_parser`.
pub fn parse_band(s: &str) -> Result<FrequencyBand, String> {
    let parts: Vec<&str> = s.splitn(2, ':').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid band format: '{s}' (expected low:high)"));
    }
    let low: f32 = parts[0]
        .parse()
        .map_err(|_| format!("Invalid lower edge: '{}'", parts[0]))?;
    let high: f32 = parts[1]
        .parse()
        .map_err(|_| format!("Invalid upper edge: '{}'", parts[1]))?;
    FrequencyBand::new(low, high).map_err(|e| e.to_string())
}

/// Filter knobs shared by `denoise` and `batch`.
#[derive(clap::Args)]
pub struct FilterOpts {
    /// Stop-band as low:high in Hz (repeatable; disables peak selection)
    #[arg(short, long, value_parser = parse_band)]
    pub band: Vec<FrequencyBand>,

    /// Number of dominant peaks to notch when no bands are given
    #[arg(long, default_value = "5")]
    pub top: usize,

    /// Half-width of each peak-derived stop-band in Hz
    #[arg(long, default_value = "2.0")]
    pub half_width: f32,

    /// FIR filter length (odd)
    #[arg(long, default_value = "8001")]
    pub taps: usize,

    /// Welch segment length for before/after metrics
    #[arg(long, default_value = "4096")]
    pub segment_length: usize,
}

impl FilterOpts {
    pub fn to_config(&self) -> DenoiseConfig {
        DenoiseConfig {
            top_n: self.top,
            half_width_hz: self.half_width,
            num_taps: self.taps,
            psd_segment_length: self.segment_length,
            stopbands: if self.band.is_empty() {
                None
            } else {
                Some(self.band.clone())
            },
        }
    }
}
