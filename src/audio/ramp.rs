//! Amplitude tremolo
//!
//! [`AmplitudeRamp`] walks the amplitude back and forth between two bounds.
//! The bound check runs after the increment, so the amplitude overshoots a
//! bound by one step before the direction flips, and the next tick continues
//! from the overshot value.
//!
//! [`WriteCadence`] decides when the ramp ticks. It counts output writes,
//! not time: ramp speed follows sink throughput.

/// Tremolo state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmplitudeRamp {
    amplitude: i32,
    step: i32,
    min: i32,
    max: i32,
}

impl AmplitudeRamp {
    /// Create new ramp
    ///
    /// # Arguments
    /// * `initial` - Starting amplitude
    /// * `step` - Signed change per tick (positive ramps up first)
    /// * `min`, `max` - Reflection bounds
    pub fn new(initial: i32, step: i32, min: i32, max: i32) -> Self {
        Self {
            amplitude: initial,
            step,
            min,
            max,
        }
    }

    /// Current amplitude
    #[inline]
    pub fn amplitude(&self) -> i32 {
        self.amplitude
    }

    /// Current signed step
    #[inline]
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Advance one step, reflecting at the bounds. Returns the new amplitude.
    #[inline]
    pub fn tick(&mut self) -> i32 {
        self.amplitude = self.amplitude.saturating_add(self.step);
        if self.amplitude > self.max || self.amplitude < self.min {
            self.step = -self.step;
        }
        self.amplitude
    }

    /// Largest value the ramp can ever produce.
    #[inline]
    pub fn peak(&self) -> i32 {
        self.max.saturating_add(self.step.saturating_abs())
    }
}

/// Fires once every `period` polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCadence {
    count: u32,
    period: u32,
}

impl WriteCadence {
    /// Writes between ramp ticks in the reference firmware.
    pub const DEFAULT_PERIOD: u32 = 12;

    /// Create a cadence firing on every `period`-th poll (min 1).
    pub fn new(period: u32) -> Self {
        Self {
            count: 0,
            period: period.max(1),
        }
    }

    /// Configured period
    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Count one write. Returns true when the ramp should tick.
    #[inline]
    pub fn poll(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.period {
            self.count = 0;
            true
        } else {
            false
        }
    }

    /// Restart counting from zero
    #[inline]
    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Default for WriteCadence {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}
