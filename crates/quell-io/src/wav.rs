//! WAV decode/encode on top of hound.
//!
//! Everything downstream works on mono f32 buffers, so decoding converts
//! integer PCM to floats in [-1, 1) and averages multi-channel frames down
//! to one channel. Encoding goes the other way: 32-bit output is written
//! as IEEE float, anything narrower as clamped integer PCM.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use quell_core::Signal;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Sample encoding of a WAV file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Integer PCM.
    Pcm,
    /// IEEE 754 float.
    IeeeFloat,
}

/// Header-level description of a WAV file.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
    /// Frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Sample encoding.
    pub format: WavFormat,
}

/// Parameters for reading or writing a WAV file.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample; 32 means IEEE float, less means integer PCM.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Full-scale value of a signed integer sample at the given bit depth.
fn pcm_full_scale(bits_per_sample: u16) -> f32 {
    (1i32 << (bits_per_sample - 1)) as f32
}

/// Decode every sample (all channels interleaved) to f32.
fn decode_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    match spec.sample_format {
        SampleFormat::Float => Ok(reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?),
        SampleFormat::Int => {
            let scale = pcm_full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| Ok(s.map(|v| v as f32 / scale)?))
                .collect()
        }
    }
}

/// Average interleaved frames down to a single channel.
fn mix_to_mono(samples: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    debug!(channels, "mixing down to mono");
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Read only the header of a WAV file.
///
/// Cheaper than [`read_wav`] when the sample data is not needed, e.g. for
/// listing a directory of recordings.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.len()) / u64::from(spec.channels);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs: num_frames as f64 / f64::from(spec.sample_rate),
        format: match spec.sample_format {
            SampleFormat::Float => WavFormat::IeeeFloat,
            SampleFormat::Int => WavFormat::Pcm,
        },
    })
}

/// Read a WAV file as mono f32 samples plus the file's spec.
///
/// Multi-channel input is collapsed by averaging each frame's channels,
/// so the returned buffer holds one sample per frame. The returned spec
/// still reports the original channel count.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let samples = decode_samples(reader)?;
    Ok((mix_to_mono(samples, spec.channels as usize), spec))
}

/// Write mono f32 samples as a WAV file.
///
/// With `bits_per_sample == 32` the samples go out as IEEE float
/// untouched; narrower depths are scaled to integer PCM and clamped at
/// full scale.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if spec.bits_per_sample == 32 {
        for &sample in samples {
            writer.write_sample(sample)?;
        }
    } else {
        let scale = pcm_full_scale(spec.bits_per_sample);
        for &sample in samples {
            writer.write_sample((sample * scale).clamp(-scale, scale - 1.0) as i32)?;
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Read a WAV file straight into a [`Signal`], mixing down to mono.
pub fn read_signal<P: AsRef<Path>>(path: P) -> Result<Signal> {
    let (samples, spec) = read_wav(path)?;
    Ok(Signal::new(samples, spec.sample_rate)?)
}

/// Write a [`Signal`] as a mono 32-bit float WAV file.
pub fn write_signal<P: AsRef<Path>>(path: P, signal: &Signal) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: signal.sample_rate(),
        bits_per_sample: 32,
    };
    write_wav(path, signal.samples(), spec)
}
