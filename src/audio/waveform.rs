//! Sine waveform synthesis and packing
//!
//! Produces exactly one cycle of the tone, packed for the I2S slot layout.
//! Channel 0 (left) carries the tone, every other channel is silent.
//!
//! `samples_per_cycle` is `sample_rate / tone_hz` truncated, so the emitted
//! pitch is slightly sharp when the division is not exact (44100 / 1700 gives
//! 25 samples, i.e. 1764 Hz). Sample values are truncated toward zero.

use core::f64::consts::TAU;

use super::pack::{pack_16, pack_24, pack_32};

/// Bits per channel sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// One 16-bit word per channel sample.
    Bits16,
    /// 24-bit value left-justified in a 32-bit slot.
    Bits24,
    /// Full 32-bit value.
    Bits32,
}

impl BitDepth {
    /// Number of 16-bit words one channel sample occupies.
    #[inline]
    pub fn words_per_sample(self) -> usize {
        match self {
            BitDepth::Bits16 => 1,
            BitDepth::Bits24 | BitDepth::Bits32 => 2,
        }
    }

    /// Slot width the I2S channel must be configured with.
    #[inline]
    pub fn slot_bits(self) -> u32 {
        match self {
            BitDepth::Bits16 => 16,
            BitDepth::Bits24 | BitDepth::Bits32 => 32,
        }
    }

    /// Largest amplitude magnitude that fits without wrapping.
    #[inline]
    pub fn max_amplitude(self) -> i32 {
        match self {
            BitDepth::Bits16 => i16::MAX as i32,
            BitDepth::Bits24 => 0x7F_FFFF,
            BitDepth::Bits32 => i32::MAX,
        }
    }

    /// Nominal bit count.
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            BitDepth::Bits16 => 16,
            BitDepth::Bits24 => 24,
            BitDepth::Bits32 => 32,
        }
    }
}

/// Waveform error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformError {
    /// W01: tone frequency zero or not below the sample rate
    InvalidFrequency,
    /// W02: channel count is zero
    NoChannels,
    /// W03: amplitude does not fit the bit depth
    AmplitudeOutOfRange,
    /// W04: output buffer cannot hold one cycle
    BufferTooSmall { needed: usize, capacity: usize },
}

impl WaveformError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFrequency => "W01",
            Self::NoChannels => "W02",
            Self::AmplitudeOutOfRange => "W03",
            Self::BufferTooSmall { .. } => "W04",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidFrequency => "tone must be below sample rate and non-zero",
            Self::NoChannels => "no output channels",
            Self::AmplitudeOutOfRange => "amplitude exceeds bit depth",
            Self::BufferTooSmall { .. } => "buffer too small",
        }
    }
}

impl core::fmt::Display for WaveformError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall { needed, capacity } => write!(
                f,
                "{}: {} (need {} words, have {})",
                self.code(),
                self.message(),
                needed,
                capacity
            ),
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

/// Waveform parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformParameters {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Tone frequency in Hz
    pub tone_hz: u32,
    /// Peak sample value (sign flips the phase)
    pub amplitude: i32,
    /// Packing layout
    pub bit_depth: BitDepth,
    /// Interleaved channels per frame
    pub channels: u16,
}

impl WaveformParameters {
    /// Check preconditions without touching any buffer.
    pub fn validate(&self) -> Result<(), WaveformError> {
        if self.tone_hz == 0 || self.sample_rate <= self.tone_hz {
            return Err(WaveformError::InvalidFrequency);
        }
        if self.channels == 0 {
            return Err(WaveformError::NoChannels);
        }
        if self.amplitude.unsigned_abs() > self.bit_depth.max_amplitude() as u32 {
            return Err(WaveformError::AmplitudeOutOfRange);
        }
        Ok(())
    }

    /// Samples needed for one period (truncated).
    #[inline]
    pub fn samples_per_cycle(&self) -> usize {
        (self.sample_rate / self.tone_hz) as usize
    }

    /// Words one period occupies across all channels.
    #[inline]
    pub fn required_len(&self) -> usize {
        self.samples_per_cycle() * self.channels as usize * self.bit_depth.words_per_sample()
    }

    /// Same parameters at a different amplitude.
    #[inline]
    pub fn with_amplitude(self, amplitude: i32) -> Self {
        Self { amplitude, ..self }
    }
}

/// Sine synthesizer.
///
/// Stateless; owns nothing. The caller owns the buffer.
pub struct WaveformPacker;

impl WaveformPacker {
    /// Fill `out` with one packed cycle.
    ///
    /// Returns the number of words written. On error `out` is untouched.
    pub fn generate(params: &WaveformParameters, out: &mut [u16]) -> Result<usize, WaveformError> {
        params.validate()?;

        let needed = params.required_len();
        if out.len() < needed {
            return Err(WaveformError::BufferTooSmall {
                needed,
                capacity: out.len(),
            });
        }

        let samples = params.samples_per_cycle();
        let words = params.bit_depth.words_per_sample();
        let frame_len = words * params.channels as usize;

        for (i, frame) in out[..needed].chunks_exact_mut(frame_len).enumerate() {
            let sample = Self::sample_at(params.amplitude, i, samples);
            let (left, rest) = frame.split_at_mut(words);

            match params.bit_depth {
                BitDepth::Bits16 => left[0] = pack_16(sample),
                BitDepth::Bits24 => left.copy_from_slice(&pack_24(sample)),
                BitDepth::Bits32 => left.copy_from_slice(&pack_32(sample)),
            }
            rest.fill(0);
        }

        Ok(needed)
    }

    /// Unpacked sample value at index `i` of a `samples`-long cycle.
    #[inline]
    pub fn sample_at(amplitude: i32, i: usize, samples: usize) -> i32 {
        let theta = TAU * i as f64 / samples as f64;
        // `as` truncates toward zero
        (amplitude as f64 * libm::sin(theta)) as i32
    }
}
