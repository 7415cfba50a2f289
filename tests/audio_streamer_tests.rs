//! Streaming loop tests against a recording sink

use rust_i2s_tone::audio::pack::{as_bytes, unpack_24};
use rust_i2s_tone::audio::{
    AmplitudeRamp, BitDepth, StreamError, ToneStreamer, WaveformError, WaveformPacker,
    WaveformParameters, WriteCadence,
};
use rust_i2s_tone::hal::AudioSink;
use rust_i2s_tone::{ConfigError, ToneConfig, TONE_BUFFER_WORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SinkFault;

/// Records every write; can be told to fail or accept short.
#[derive(Default)]
struct RecordingSink {
    writes: Vec<Vec<u8>>,
    fail_on: Option<usize>,
    accept_limit: Option<usize>,
}

impl AudioSink for RecordingSink {
    type Error = SinkFault;

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_on == Some(self.writes.len()) {
            return Err(SinkFault);
        }
        self.writes.push(bytes.to_vec());
        Ok(self.accept_limit.map_or(bytes.len(), |l| l.min(bytes.len())))
    }
}

fn streamer(sink: RecordingSink) -> ToneStreamer<RecordingSink, TONE_BUFFER_WORDS> {
    let config = ToneConfig::default();
    ToneStreamer::new(config.waveform_params(), config.ramp(), config.cadence(), sink).unwrap()
}

fn expected_bytes(amplitude: i32) -> Vec<u8> {
    let params = ToneConfig::default().waveform_params().with_amplitude(amplitude);
    let mut words = [0u16; TONE_BUFFER_WORDS];
    let len = WaveformPacker::generate(&params, &mut words).unwrap();
    as_bytes(&words[..len]).to_vec()
}

#[test]
fn test_initial_buffer_at_initial_amplitude() {
    let s = streamer(RecordingSink::default());
    assert_eq!(s.params().amplitude, 1_000_000);
    assert_eq!(s.words().len(), 100);
    assert_eq!(as_bytes(s.words()), expected_bytes(1_000_000).as_slice());
}

#[test]
fn test_whole_buffer_written_each_step() {
    let mut s = streamer(RecordingSink::default());

    let report = s.step().unwrap();
    assert_eq!(report.bytes_written, 200);
    assert_eq!(report.expected_bytes, 200);
    assert!(!report.is_short());
    assert_eq!(report.amplitude_change, None);
    assert_eq!(s.writes(), 1);
}

#[test]
fn test_regenerates_on_twelfth_write() {
    let mut s = streamer(RecordingSink::default());

    for _ in 0..11 {
        assert_eq!(s.step().unwrap().amplitude_change, None);
    }
    let report = s.step().unwrap();
    assert_eq!(report.amplitude_change, Some(1_050_000));

    let sink = s.into_sink();
    assert_eq!(sink.writes.len(), 12);
    assert_eq!(sink.writes[10], expected_bytes(1_000_000));
    // The 12th write already carries the new amplitude
    assert_eq!(sink.writes[11], expected_bytes(1_050_000));
}

#[test]
fn test_buffer_reused_between_regenerations() {
    let mut s = streamer(RecordingSink::default());
    for _ in 0..12 {
        s.step().unwrap();
    }
    for _ in 0..11 {
        s.step().unwrap();
    }

    let sink = s.sink();
    for w in &sink.writes[11..23] {
        assert_eq!(w, &sink.writes[11]);
    }
}

#[test]
fn test_ramp_overshoot_reaches_sink() {
    let mut s = streamer(RecordingSink::default());

    // 41 ramp ticks = 41 x 12 writes
    let mut last = None;
    for _ in 0..41 * 12 {
        if let Some(a) = s.step().unwrap().amplitude_change {
            last = Some(a);
        }
    }
    assert_eq!(last, Some(3_050_000));
    assert_eq!(s.ramp().step(), -50_000);

    let peak = s
        .words()
        .chunks(4)
        .map(|f| unpack_24([f[0], f[1]]))
        .max()
        .unwrap();
    assert!(peak > 3_000_000 && peak <= 3_050_000, "peak {}", peak);
}

#[test]
fn test_sink_error_surfaced_not_retried() {
    let mut s = streamer(RecordingSink {
        fail_on: Some(2),
        ..RecordingSink::default()
    });

    s.step().unwrap();
    s.step().unwrap();
    assert_eq!(s.step(), Err(StreamError::Sink(SinkFault)));
    assert_eq!(s.writes(), 2);
    assert_eq!(s.sink().writes.len(), 2);
}

#[test]
fn test_short_write_reported() {
    let mut s = streamer(RecordingSink {
        accept_limit: Some(64),
        ..RecordingSink::default()
    });

    let report = s.step().unwrap();
    assert!(report.is_short());
    assert_eq!(report.bytes_written, 64);
    assert_eq!(report.expected_bytes, 200);
}

#[test]
fn test_capacity_too_small_rejected() {
    let config = ToneConfig::default();
    let result: Result<ToneStreamer<RecordingSink, 64>, _> = ToneStreamer::new(
        config.waveform_params(),
        config.ramp(),
        config.cadence(),
        RecordingSink::default(),
    );
    assert_eq!(
        result.err(),
        Some(WaveformError::BufferTooSmall { needed: 100, capacity: 64 })
    );
}

#[test]
fn test_regeneration_out_of_range_is_error() {
    let params = WaveformParameters {
        sample_rate: 8000,
        tone_hz: 1000,
        amplitude: 0,
        bit_depth: BitDepth::Bits16,
        channels: 2,
    };
    // Unvalidated ramp that walks past the 16-bit range on the first tick
    let ramp = AmplitudeRamp::new(32_000, 1_000, 0, 40_000);
    let mut s: ToneStreamer<RecordingSink, 16> =
        ToneStreamer::new(params, ramp, WriteCadence::new(1), RecordingSink::default()).unwrap();

    assert_eq!(
        s.step(),
        Err(StreamError::Waveform(WaveformError::AmplitudeOutOfRange))
    );
    assert!(s.sink().writes.is_empty());
    // Previous cycle is still intact
    assert_eq!(s.params().amplitude, 32_000);
}

#[test]
fn test_config_rejects_ramp_past_bit_depth() {
    let config = ToneConfig {
        bit_depth: BitDepth::Bits16,
        initial_amplitude: 20_000,
        ramp_min: 10_000,
        ramp_max: 32_000,
        ramp_step: 1_000,
        ..ToneConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::RampExceedsBitDepth));
}

#[test]
fn test_config_rejects_initial_outside_ramp() {
    let config = ToneConfig {
        initial_amplitude: 500_000,
        ..ToneConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::InvalidRamp));
}

#[test]
fn test_config_rejects_zero_cadence() {
    let config = ToneConfig {
        ramp_every_writes: 0,
        ..ToneConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::ZeroCadence));
}

#[cfg(feature = "esp32")]
#[test]
fn test_config_rejects_mclk_pin() {
    let mut config = ToneConfig::default();
    config.i2s.mclk_pin = Some(21);
    assert_eq!(config.validate(), Err(ConfigError::UnsupportedMclkPin(21)));
}

#[test]
fn test_config_sink_slot_matches_packing() {
    let config = ToneConfig::default();
    assert_eq!(config.bit_depth.slot_bits(), 32);
    assert_eq!(config.bit_depth.words_per_sample() * 16, 32);
}
