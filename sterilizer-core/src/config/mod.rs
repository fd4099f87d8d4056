//! Compiled-in device configuration
//!
//! The prop has no runtime configuration. Every tunable lives here as a
//! constant; network credentials are injected by the firmware build.

/// Number of addressable cells on the LED strip
pub const STRIP_LEN: usize = 17;

/// Global strip brightness (0-255)
pub const STRIP_BRIGHTNESS: u8 = 120;

/// Inbound messages buffered between ticks
pub const INBOX_DEPTH: usize = 8;

/// Maximum steps in one actuation sequence
pub const MAX_SEQUENCE_STEPS: usize = 8;

/// What a monitor does once its reconnect budget is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// Stay timed out until the channel recovers on its own
    Terminal,
    /// Re-arm the budget after being timed out for `after_ms`
    Cooldown { after_ms: u32 },
}

/// Timing constants (all in milliseconds unless noted)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Link reconnect budget
    pub link_timeout_ms: u32,
    /// Broker reconnect budget (only runs while the link is up)
    pub broker_timeout_ms: u32,
    /// Flame burn time before the pump starts
    pub flame_dwell_ms: u32,
    /// Time each sweep frame stays on the strip
    pub sweep_frame_ms: u32,
    /// Pause between the colors of the reset cue
    pub cue_pause_ms: u32,
    /// Blue sweep passes while the pump runs (count)
    pub pump_sweep_passes: u8,
}

impl TimingConfig {
    /// Duration of one forward-and-back sweep pass over the strip
    pub const fn sweep_pass_ms(&self) -> u32 {
        2 * STRIP_LEN as u32 * self.sweep_frame_ms
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    pub timing: TimingConfig,
    /// Applied to both the link and the broker monitor
    pub retry: RetryPolicy,
}

impl DeviceConfig {
    /// Configuration the prop ships with
    pub const DEFAULT: Self = Self {
        timing: TimingConfig {
            link_timeout_ms: 120_000,
            broker_timeout_ms: 120_000,
            flame_dwell_ms: 5_000,
            sweep_frame_ms: 50,
            cue_pause_ms: 500,
            pump_sweep_passes: 6,
        },
        retry: RetryPolicy::Terminal,
    };
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
