pub mod config;
pub mod decoder;
pub mod resampler;
pub mod transcriber;
