//! # RustI2sTone
//!
//! I2S test tone for ESP32: a sine cycle packed for the I2S slot layout,
//! streamed continuously while its amplitude sweeps up and down.
//!
//! ## Architecture
//!
//! - [`audio`]: pure synthesis, packing, ramp, and the streaming loop body.
//!   No hardware, fully testable on host.
//! - [`hal`]: the [`AudioSink`] seam and its ESP-IDF I2S implementation.
//! - [`config`]: one [`ToneConfig`] drives both packer and sink.
//! - [`logging`]: fixed-ring logging drained between writes.

#![cfg_attr(not(test), no_std)]

pub mod audio;
pub mod config;
pub mod hal;
pub mod logging;

pub use audio::{
    AmplitudeRamp, BitDepth, StepReport, StreamError, ToneStreamer, WaveformError,
    WaveformPacker, WaveformParameters, WriteCadence,
};
pub use config::{ConfigError, ToneConfig, TONE_BUFFER_WORDS};
pub use hal::{AudioSink, I2sConfig};
pub use logging::{LogLevel, LogStream};
