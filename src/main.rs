//! RustI2sTone - Main entry point
//!
//! 1. Validate configuration
//! 2. Open the I2S TX channel (ESP-IDF) or a counting sink (host)
//! 3. Generate the first cycle
//! 4. Loop: maybe regenerate, blocking write, drain logs

use rust_i2s_tone::{
    config::TONE_BUFFER_WORDS,
    hal::AudioSink,
    logging::{format_log_entry, LogStream},
    tone_error, tone_info, tone_warn, StreamError, ToneConfig, ToneStreamer,
};

#[cfg(target_os = "espidf")]
fn main() {
    use esp_idf_svc::hal::peripherals::Peripherals;
    use rust_i2s_tone::hal::EspI2sSink;

    esp_idf_svc::sys::link_patches();
    println!("{}", env!("VERSION_STRING"));

    let config = ToneConfig::default();
    if let Err(e) = config.validate() {
        println!("config rejected: {}", e);
        return;
    }

    let peripherals = match Peripherals::take() {
        Ok(p) => p,
        Err(e) => {
            println!("peripherals unavailable: {:?}", e);
            return;
        }
    };

    let sink = match EspI2sSink::new(
        peripherals.i2s0,
        &config.i2s,
        config.sample_rate,
        config.bit_depth,
    ) {
        Ok(sink) => sink,
        Err(e) => {
            println!("I2S init failed: {:?}", e);
            return;
        }
    };

    // Only returns on a sink error
    let _ = run(&config, sink, None, || unsafe {
        esp_idf_svc::sys::esp_timer_get_time()
    });
}

/// Host build: same loop against a sink that accepts everything.
#[cfg(not(target_os = "espidf"))]
fn main() {
    const HOST_WRITES: u64 = 12 * 100;

    struct CountingSink {
        bytes: usize,
    }

    impl AudioSink for CountingSink {
        type Error = core::convert::Infallible;

        fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
            self.bytes += bytes.len();
            Ok(bytes.len())
        }
    }

    println!("{}", env!("VERSION_STRING"));

    let config = ToneConfig::default();
    if let Err(e) = config.validate() {
        println!("config rejected: {}", e);
        return;
    }

    let start = std::time::Instant::now();
    let _ = run(&config, CountingSink { bytes: 0 }, Some(HOST_WRITES), || {
        start.elapsed().as_micros() as i64
    });
}

/// Stream until the sink fails or `max_writes` writes have completed.
fn run<S>(
    config: &ToneConfig,
    sink: S,
    max_writes: Option<u64>,
    now_us: impl Fn() -> i64,
) -> Result<(), StreamError<S::Error>>
where
    S: AudioSink,
    S::Error: core::fmt::Debug,
{
    let mut log: LogStream = LogStream::new();

    let mut streamer: ToneStreamer<S, TONE_BUFFER_WORDS> = match ToneStreamer::new(
        config.waveform_params(),
        config.ramp(),
        config.cadence(),
        sink,
    ) {
        Ok(s) => s,
        Err(e) => {
            println!("waveform rejected: {}", e);
            return Err(e.into());
        }
    };

    tone_info!(
        log,
        now_us(),
        "{} Hz @ {} Hz, {}-bit, {} samples/cycle, amplitude {}",
        config.tone_hz,
        config.sample_rate,
        config.bit_depth.bits(),
        streamer.params().samples_per_cycle(),
        streamer.params().amplitude
    );

    loop {
        match streamer.step() {
            Ok(report) => {
                if let Some(amplitude) = report.amplitude_change {
                    tone_info!(log, now_us(), "Volume: {}", amplitude);
                }
                if report.is_short() {
                    tone_warn!(
                        log,
                        now_us(),
                        "short write: {}/{} bytes",
                        report.bytes_written,
                        report.expected_bytes
                    );
                }
            }
            Err(e) => {
                tone_error!(log, now_us(), "stream stopped: {}", e);
                drain_log(&mut log);
                return Err(e);
            }
        }

        drain_log(&mut log);

        if max_writes.is_some_and(|max| streamer.writes() >= max) {
            return Ok(());
        }
    }
}

fn drain_log(log: &mut LogStream) {
    let mut line = [0u8; 160];

    while let Some(entry) = log.drain() {
        let len = format_log_entry(&entry, &mut line);
        println!("{}", core::str::from_utf8(&line[..len]).unwrap_or("<invalid utf8>"));
    }

    if log.dropped() > 0 {
        println!("({} log messages dropped)", log.dropped());
        log.reset_dropped();
    }
}
