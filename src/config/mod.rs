//! Module: config
//!
//! Purpose: Board and tone configuration for RustI2sTone.
//!
//! One [`ToneConfig`] feeds both the waveform packer and the I2S sink, so the
//! packing layout and the channel's slot width cannot disagree. The core never
//! reads back driver state.

use crate::audio::{AmplitudeRamp, BitDepth, WaveformError, WaveformParameters, WriteCadence};
use crate::hal::I2sConfig;

/// Largest packed cycle the firmware streams, in words.
///
/// 44100 / 1700 = 25 samples x 2 channels x 2 words.
pub const TONE_BUFFER_WORDS: usize = 100;

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: waveform parameters rejected
    Waveform(WaveformError),
    /// C02: ramp bounds inverted, initial outside bounds, or zero step
    InvalidRamp,
    /// C03: ramp can exceed what the bit depth can carry
    RampExceedsBitDepth,
    /// C04: MCLK pin cannot output the master clock on this chip
    UnsupportedMclkPin(i32),
    /// C05: ramp cadence of zero writes
    ZeroCadence,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Waveform(_) => "C01",
            Self::InvalidRamp => "C02",
            Self::RampExceedsBitDepth => "C03",
            Self::UnsupportedMclkPin(_) => "C04",
            Self::ZeroCadence => "C05",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Waveform(e) => e.message(),
            Self::InvalidRamp => "invalid ramp bounds",
            Self::RampExceedsBitDepth => "ramp exceeds bit depth",
            Self::UnsupportedMclkPin(_) => "MCLK not available on pin",
            Self::ZeroCadence => "zero ramp cadence",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedMclkPin(pin) => {
                write!(f, "{}: {} GPIO{}", self.code(), self.message(), pin)
            }
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl From<WaveformError> for ConfigError {
    fn from(e: WaveformError) -> Self {
        ConfigError::Waveform(e)
    }
}

/// Tone and board configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneConfig {
    pub sample_rate: u32,
    pub tone_hz: u32,
    pub bit_depth: BitDepth,
    pub channels: u16,
    /// Amplitude of the first generated cycle
    pub initial_amplitude: i32,
    pub ramp_min: i32,
    pub ramp_max: i32,
    /// Signed change per ramp tick
    pub ramp_step: i32,
    /// Output writes between ramp ticks
    pub ramp_every_writes: u32,
    pub i2s: I2sConfig,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            tone_hz: 1700,
            bit_depth: BitDepth::Bits24,
            channels: 2,
            initial_amplitude: 1_000_000,
            ramp_min: 1_000_000,
            ramp_max: 3_000_000,
            ramp_step: 50_000,
            ramp_every_writes: WriteCadence::DEFAULT_PERIOD,
            i2s: I2sConfig::default(),
        }
    }
}

impl ToneConfig {
    /// Waveform parameters at the initial amplitude
    pub fn waveform_params(&self) -> WaveformParameters {
        WaveformParameters {
            sample_rate: self.sample_rate,
            tone_hz: self.tone_hz,
            amplitude: self.initial_amplitude,
            bit_depth: self.bit_depth,
            channels: self.channels,
        }
    }

    /// Fresh ramp at the initial amplitude
    pub fn ramp(&self) -> AmplitudeRamp {
        AmplitudeRamp::new(
            self.initial_amplitude,
            self.ramp_step,
            self.ramp_min,
            self.ramp_max,
        )
    }

    /// Fresh write cadence
    pub fn cadence(&self) -> WriteCadence {
        WriteCadence::new(self.ramp_every_writes)
    }

    /// Check everything that can be checked before touching hardware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.waveform_params().validate()?;

        if self.ramp_step == 0
            || self.ramp_min > self.ramp_max
            || self.initial_amplitude < self.ramp_min
            || self.initial_amplitude > self.ramp_max
        {
            return Err(ConfigError::InvalidRamp);
        }

        // The ramp overshoots by one step on each side
        let limit = self.bit_depth.max_amplitude() as i64;
        let step = (self.ramp_step as i64).abs();
        if self.ramp_max as i64 + step > limit || self.ramp_min as i64 - step < -limit {
            return Err(ConfigError::RampExceedsBitDepth);
        }

        if self.ramp_every_writes == 0 {
            return Err(ConfigError::ZeroCadence);
        }

        if let Some(pin) = self.i2s.mclk_pin {
            if !self.i2s.mclk_pin_supported() {
                return Err(ConfigError::UnsupportedMclkPin(pin));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let cfg = ToneConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!(cfg.waveform_params().required_len(), TONE_BUFFER_WORDS);
    }

    #[test]
    fn test_zero_step_rejected() {
        let cfg = ToneConfig {
            ramp_step: 0,
            ..ToneConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidRamp));
    }

    #[test]
    fn test_error_display() {
        let e = ConfigError::UnsupportedMclkPin(7);
        let mut buf = [0u8; 64];
        let len = crate::logging::format_to_buffer(&mut buf, format_args!("{}", e));
        assert_eq!(&buf[..len], b"C04: MCLK not available on pin GPIO7");
    }
}
