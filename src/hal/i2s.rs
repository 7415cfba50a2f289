//! I2S transmitter as an audio sink.
//!
//! The waveform code never touches the driver directly: it hands finished
//! buffers to an [`AudioSink`]. On ESP-IDF that is [`EspI2sSink`], a standard
//! mode TX channel that blocks until DMA has taken the data.

/// Blocking byte sink for packed samples.
pub trait AudioSink {
    /// Driver error type.
    type Error;

    /// Write `bytes`, blocking until the sink has accepted them.
    ///
    /// Returns the number of bytes actually accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;
}

impl<S: AudioSink + ?Sized> AudioSink for &mut S {
    type Error = S::Error;

    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(bytes)
    }
}

/// I2S pin and DMA configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2sConfig {
    pub bclk_pin: i32,
    pub ws_pin: i32,
    pub dout_pin: i32,
    /// Master clock output, `None` to leave MCLK unrouted
    pub mclk_pin: Option<i32>,
    /// Number of DMA descriptors
    pub dma_buf_count: u32,
    /// Frames per DMA descriptor
    pub dma_buf_len: u32,
}

impl Default for I2sConfig {
    fn default() -> Self {
        Self {
            bclk_pin: 5,
            ws_pin: 18,
            dout_pin: 19,
            mclk_pin: Some(3),
            dma_buf_count: 3,
            dma_buf_len: 300,
        }
    }
}

/// GPIOs able to output MCLK on the original ESP32 (CLK_OUT1..3).
pub const ESP32_MCLK_PINS: [i32; 3] = [0, 1, 3];

impl I2sConfig {
    /// Whether `mclk_pin` can carry MCLK on the selected chip.
    pub fn mclk_pin_supported(&self) -> bool {
        match self.mclk_pin {
            None => true,
            #[cfg(feature = "esp32")]
            Some(pin) => ESP32_MCLK_PINS.contains(&pin),
            #[cfg(not(feature = "esp32"))]
            Some(pin) => pin >= 0,
        }
    }
}

/// Standard-mode I2S TX channel (ESP-IDF).
#[cfg(target_os = "espidf")]
pub struct EspI2sSink<'d> {
    driver: esp_idf_svc::hal::i2s::I2sDriver<'d, esp_idf_svc::hal::i2s::I2sTx>,
}

#[cfg(target_os = "espidf")]
impl<'d> EspI2sSink<'d> {
    /// Open I2S0 in MSB-justified stereo TX mode and enable the channel.
    ///
    /// Pins are taken from `config`; the slot width follows `bit_depth`, so
    /// the sink always matches the packer's layout.
    pub fn new(
        i2s: esp_idf_svc::hal::i2s::I2S0,
        config: &I2sConfig,
        sample_rate: u32,
        bit_depth: crate::audio::BitDepth,
    ) -> Result<Self, esp_idf_svc::sys::EspError> {
        use esp_idf_svc::hal::gpio::AnyIOPin;
        use esp_idf_svc::hal::i2s::config::{
            Config, DataBitWidth, SlotMode, StdClkConfig, StdConfig, StdGpioConfig,
            StdSlotConfig,
        };

        let width = match bit_depth.slot_bits() {
            16 => DataBitWidth::Bits16,
            _ => DataBitWidth::Bits32,
        };

        let chan_cfg = Config::default()
            .dma_desc(config.dma_buf_count)
            .frames(config.dma_buf_len)
            .auto_clear(true);
        let std_cfg = StdConfig::new(
            chan_cfg,
            StdClkConfig::from_sample_rate_hz(sample_rate),
            StdSlotConfig::msb_slot_default(width, SlotMode::Stereo),
            StdGpioConfig::default(),
        );

        // SAFETY: pin numbers come from the board config and are not
        // claimed anywhere else in this firmware.
        let (bclk, ws, dout, mclk) = unsafe {
            (
                AnyIOPin::new(config.bclk_pin),
                AnyIOPin::new(config.ws_pin),
                AnyIOPin::new(config.dout_pin),
                config.mclk_pin.map(|pin| AnyIOPin::new(pin)),
            )
        };

        let mut driver =
            esp_idf_svc::hal::i2s::I2sDriver::new_std_tx(i2s, &std_cfg, bclk, dout, mclk, ws)?;
        driver.tx_enable()?;

        Ok(Self { driver })
    }
}

#[cfg(target_os = "espidf")]
impl AudioSink for EspI2sSink<'_> {
    type Error = esp_idf_svc::sys::EspError;

    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.driver.write(bytes, esp_idf_svc::hal::delay::BLOCK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pins() {
        let cfg = I2sConfig::default();
        assert_eq!((cfg.bclk_pin, cfg.ws_pin, cfg.dout_pin), (5, 18, 19));
        assert_eq!(cfg.mclk_pin, Some(3));
        assert!(cfg.mclk_pin_supported());
    }

    #[test]
    fn test_unrouted_mclk_always_supported() {
        let cfg = I2sConfig {
            mclk_pin: None,
            ..I2sConfig::default()
        };
        assert!(cfg.mclk_pin_supported());
    }

    #[cfg(feature = "esp32")]
    #[test]
    fn test_esp32_rejects_non_clkout_pin() {
        let cfg = I2sConfig {
            mclk_pin: Some(4),
            ..I2sConfig::default()
        };
        assert!(!cfg.mclk_pin_supported());
    }
}
