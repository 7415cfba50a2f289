//! Hardware Abstraction Layer for RustI2sTone.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Waveform logic stays in `audio`, HAL is just I/O.

pub mod i2s;

pub use i2s::{AudioSink, I2sConfig, ESP32_MCLK_PINS};

#[cfg(target_os = "espidf")]
pub use i2s::EspI2sSink;
