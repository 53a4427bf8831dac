// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Timing and behaviour constants for the bridge.
//!
//! [`Config::default()`] carries the values the firmware ships with. Everything that waits or
//! times out reads its bound from here, so tests can build a config with zero delays and tiny
//! poll budgets instead of burning real time.

/// Busy-wait budget for a multi-byte read from the host link.
///
/// Both counters count polls of the serial receiver, not wall time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadTimeout {
    /// Polls allowed between two received bytes. Reset on every byte.
    pub inter_byte_polls: u32,
    /// Polls allowed for the whole read. Never reset.
    pub transaction_polls: u32,
}

impl ReadTimeout {
    /// ~9 ms between bytes and ~18 ms overall at 115200 baud.
    pub const DEFAULT: Self = Self {
        inter_byte_polls: 15_000,
        transaction_polls: 30_000,
    };
}

impl Default for ReadTimeout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Delays used by bring-up and the accelerometer sampler.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Hold after asserting accelerometer init and after switching the bus role.
    pub role_switch_us: u32,
    /// Hold after releasing accelerometer init, before handing the bus to the FPGA.
    pub init_release_ms: u32,
    /// Settle time before the first sample of a burst.
    pub settle_us: u32,
    /// Time the sensor needs to prepare each sample.
    pub prepare_us: u32,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        role_switch_us: 35,
        init_release_ms: 200,
        settle_us: 1,
        prepare_us: 770,
    };

    /// No delays at all. Useful on the host.
    pub const ZERO: Self = Self {
        role_switch_us: 0,
        init_release_ms: 0,
        settle_us: 0,
        prepare_us: 0,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Top-level bridge configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub timing: Timing,
    pub read_timeout: ReadTimeout,
    /// Whether queued commands are held back until the host sends `EXEC_QUEUE`.
    pub start_deferred: bool,
}

impl Config {
    pub const DEFAULT: Self = Self {
        timing: Timing::DEFAULT,
        read_timeout: ReadTimeout::DEFAULT,
        start_deferred: true,
    };

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_read_timeout(mut self, read_timeout: ReadTimeout) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn with_start_deferred(mut self, deferred: bool) -> Self {
        self.start_deferred = deferred;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
