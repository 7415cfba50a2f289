//! Audio subsystem: test tone synthesis and streaming
//!
//! Architecture:
//! - Waveform packer: one sine cycle, packed for the I2S slot layout
//! - Amplitude ramp: tremolo between two bounds, ticked by write count
//! - Streamer: regenerate on cadence, then blocking write to the sink

pub mod pack;
pub mod ramp;
pub mod streamer;
pub mod waveform;

pub use ramp::{AmplitudeRamp, WriteCadence};
pub use streamer::{StepReport, StreamError, ToneStreamer};
pub use waveform::{BitDepth, WaveformError, WaveformPacker, WaveformParameters};
