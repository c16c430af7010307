//! Shared value types for the Quell noise analysis toolkit.
//!
//! This crate provides:
//!
//! - [`Signal`] - an immutable mono sample buffer with its sample rate
//! - [`FrequencyBand`] - a `[low, high]` frequency range in Hz
//! - [`Error`] - the error taxonomy shared by all analysis and filter crates
//!
//! Everything here is a plain value type: operations elsewhere in the
//! workspace take these by reference and return fresh values, so there is
//! no hidden mutable state anywhere in the core pipeline.

mod band;
mod error;
mod signal;

pub use band::FrequencyBand;
pub use error::{Error, Result};
pub use signal::Signal;
