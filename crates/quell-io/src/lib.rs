//! Audio I/O layer for the Quell denoising toolkit.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for loading/saving audio files
//! - **Signal bridging**: [`read_signal`] and [`write_signal`] to move
//!   directly between WAV files and [`quell_core::Signal`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quell_io::{read_signal, write_signal};
//!
//! let signal = read_signal("input.wav")?;
//! let cleaned = quell_filter::denoise(&signal, &Default::default())?.filtered;
//! write_signal("output.wav", &cleaned)?;
//! ```

mod wav;

pub use wav::{
    WavFormat, WavInfo, WavSpec, read_signal, read_wav, read_wav_info, write_signal, write_wav,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file decoded but does not form a usable signal.
    #[error("signal error: {0}")]
    Signal(#[from] quell_core::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
