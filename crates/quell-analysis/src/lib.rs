//! Quell Analysis - spectral estimation and quality metrics for narrowband
//! noise characterization.
//!
//! This crate provides the measurement half of the denoising toolkit:
//!
//! - [`fft`] - FFT wrapper with windowing functions
//! - [`spectrum`] - magnitude spectrum and Welch PSD estimation
//! - [`peaks`] - dominant frequency ranking and stop-band selection
//! - [`metrics`] - SNR, spectral flatness, band energy, ripple/attenuation,
//!   side-lobe level
//! - [`report`] - flat metric-name → value report, serializable to JSON
//!
//! Everything is a pure function over [`quell_core`] value types: no cached
//! signals, no mutable analyzer state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use quell_analysis::{fft_spectrum, psd_welch, top_frequencies, DEFAULT_SEGMENT_LENGTH};
//!
//! let spectrum = fft_spectrum(&signal);
//! let peaks = top_frequencies(&spectrum, 5);
//! let psd = psd_welch(&signal, DEFAULT_SEGMENT_LENGTH)?;
//! ```

pub mod fft;
pub mod metrics;
pub mod peaks;
pub mod report;
pub mod spectrum;

// Re-export main types
pub use fft::{Fft, Window};
pub use metrics::{
    PSD_EPSILON, band_energy, noise_characteristics, passband_ripple_db,
    relative_side_lobe_db, snr_db, spectral_flatness, stopband_attenuation_db,
};
pub use peaks::{DEFAULT_HALF_WIDTH_HZ, noise_bands, top_frequencies};
pub use report::MetricsReport;
pub use spectrum::{
    DEFAULT_SEGMENT_LENGTH, Psd, PsdPoint, Spectrum, SpectrumPoint, fft_spectrum, psd_welch,
};
