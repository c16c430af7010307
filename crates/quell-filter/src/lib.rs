//! Quell Filter - FIR band-stop design, application, and the denoising
//! pipeline.
//!
//! - [`design`] - frequency-sampling synthesis of linear-phase band-stop
//!   filters
//! - [`filter`] - [`FirFilter`], causal application, frequency response
//! - [`denoise`] - the end-to-end pipeline: peak selection, design,
//!   filtering, before/after metrics
//!
//! ## Example
//!
//! ```rust,ignore
//! use quell_filter::{denoise, DenoiseConfig};
//!
//! let outcome = denoise(&signal, &DenoiseConfig::default())?;
//! println!("removed {:?}", outcome.stopbands);
//! ```

pub mod denoise;
pub mod design;
pub mod filter;

// Re-export main types
pub use denoise::{
    DEFAULT_METRICS_SEGMENT_LENGTH, DEFAULT_PIPELINE_TAPS, DenoiseConfig, DenoiseOutcome, denoise,
};
pub use design::{DEFAULT_NUM_TAPS, design_bandstop};
pub use filter::{DEFAULT_RESPONSE_POINTS, FirFilter, apply, frequency_response};
