//! CLI subcommand implementations.

pub mod analyze;
pub mod batch;
pub mod common;
pub mod denoise;
pub mod evaluate;
pub mod generate;
