//! Tone streaming loop body
//!
//! One [`ToneStreamer::step`] is one iteration of the firmware loop:
//! count the write, maybe tick the ramp and regenerate, then block on the
//! sink with the whole buffer. The buffer is only rewritten between writes.

use super::pack::as_bytes;
use super::ramp::{AmplitudeRamp, WriteCadence};
use super::waveform::{WaveformError, WaveformPacker, WaveformParameters};
use crate::hal::AudioSink;

/// Streaming error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError<E> {
    /// Regeneration failed (ramp left the bit depth's range)
    Waveform(WaveformError),
    /// Sink rejected the write
    Sink(E),
}

impl<E> From<WaveformError> for StreamError<E> {
    fn from(e: WaveformError) -> Self {
        StreamError::Waveform(e)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Waveform(e) => write!(f, "{}", e),
            Self::Sink(e) => write!(f, "S01: sink write failed ({:?})", e),
        }
    }
}

/// Outcome of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Bytes the sink accepted
    pub bytes_written: usize,
    /// Bytes handed to the sink
    pub expected_bytes: usize,
    /// New amplitude if the buffer was regenerated this step
    pub amplitude_change: Option<i32>,
}

impl StepReport {
    /// Sink accepted fewer bytes than offered
    #[inline]
    pub fn is_short(&self) -> bool {
        self.bytes_written < self.expected_bytes
    }
}

/// Owns the sample buffer, ramp, cadence, and sink.
///
/// `N` is the buffer capacity in words; it must hold one packed cycle.
pub struct ToneStreamer<S: AudioSink, const N: usize> {
    buffer: [u16; N],
    len: usize,
    params: WaveformParameters,
    ramp: AmplitudeRamp,
    cadence: WriteCadence,
    sink: S,
    writes: u64,
}

impl<S: AudioSink, const N: usize> ToneStreamer<S, N> {
    /// Create streamer and generate the initial cycle at the ramp's amplitude.
    pub fn new(
        params: WaveformParameters,
        ramp: AmplitudeRamp,
        cadence: WriteCadence,
        sink: S,
    ) -> Result<Self, WaveformError> {
        let params = params.with_amplitude(ramp.amplitude());
        let mut buffer = [0u16; N];
        let len = WaveformPacker::generate(&params, &mut buffer)?;

        Ok(Self {
            buffer,
            len,
            params,
            ramp,
            cadence,
            sink,
            writes: 0,
        })
    }

    /// Run one iteration.
    ///
    /// Sink errors are returned as-is; nothing is retried here.
    pub fn step(&mut self) -> Result<StepReport, StreamError<S::Error>> {
        let mut amplitude_change = None;

        if self.cadence.poll() {
            let amplitude = self.ramp.tick();
            self.regenerate(amplitude)?;
            amplitude_change = Some(amplitude);
        }

        let bytes = as_bytes(&self.buffer[..self.len]);
        let expected_bytes = bytes.len();
        let bytes_written = self.sink.write(bytes).map_err(StreamError::Sink)?;
        self.writes += 1;

        Ok(StepReport {
            bytes_written,
            expected_bytes,
            amplitude_change,
        })
    }

    /// Regenerate the cycle in place at `amplitude`.
    pub fn regenerate(&mut self, amplitude: i32) -> Result<(), WaveformError> {
        let params = self.params.with_amplitude(amplitude);
        self.len = WaveformPacker::generate(&params, &mut self.buffer)?;
        self.params = params;
        Ok(())
    }

    /// Packed words currently handed to the sink
    #[inline]
    pub fn words(&self) -> &[u16] {
        &self.buffer[..self.len]
    }

    /// Parameters of the current buffer
    #[inline]
    pub fn params(&self) -> &WaveformParameters {
        &self.params
    }

    /// Current ramp state
    #[inline]
    pub fn ramp(&self) -> &AmplitudeRamp {
        &self.ramp
    }

    /// Successful sink writes so far
    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Borrow the sink
    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Give the sink back
    pub fn into_sink(self) -> S {
        self.sink
    }
}
