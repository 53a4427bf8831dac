// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Dual inclinometer sampler (SCA61T-style parts speaking the RDAX read command).
//!
//! Both sensors hang off the synchronous bus with their own chip select. The bus is not owned here
//! and must be passed in as `&mut impl SyncBus` so the same bus can be handed to the FPGA exchange
//! once bring-up is done.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::config::Timing;
use crate::hw::{ChipSelect, SyncBus};

// Sensor commands
pub mod cmd {
    /// Read X-channel acceleration.
    pub const RDAX: u8 = 0x10;
    /// Clock byte shifted out while reading the response.
    pub const DUMMY: u8 = 0x00;
}

/// Raw samples averaged into one reading.
pub const SAMPLES_PER_READING: usize = 17;

/// The sensor left-justifies its 11-bit result in a 16-bit word.
const DATA_SHIFT: u32 = 5;

/// Which sensor to talk to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Rear,
    Front,
}

impl Channel {
    /// The other sensor.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Channel::Rear => Channel::Front,
            Channel::Front => Channel::Rear,
        }
    }
}

/// Latest averaged value for each sensor.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelReading {
    pub rear: u16,
    pub front: u16,
}

impl AccelReading {
    pub fn get(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Rear => self.rear,
            Channel::Front => self.front,
        }
    }

    pub fn set(&mut self, channel: Channel, value: u16) {
        match channel {
            Channel::Rear => self.rear = value,
            Channel::Front => self.front = value,
        }
    }

    /// `[rearHi, rearLo, frontHi, frontLo]`, the `GET_ACCELS` payload.
    pub fn to_be_bytes(&self) -> [u8; 4] {
        let r = self.rear.to_be_bytes();
        let f = self.front.to_be_bytes();
        [r[0], r[1], f[0], f[1]]
    }
}

/// Truncating mean of the 11-bit values carried by `raw`.
///
/// 17 × 0x7FF still fits in a `u16`, so the sum cannot overflow.
pub fn average(raw: &[u16; SAMPLES_PER_READING]) -> u16 {
    let sum: u16 = raw.iter().map(|&r| r >> DATA_SHIFT).sum();
    sum / SAMPLES_PER_READING as u16
}

/// Both sensors, bound to their chip-select lines.
pub struct Sampler<R: OutputPin, F: OutputPin> {
    rear: ChipSelect<R>,
    front: ChipSelect<F>,
    timing: Timing,
}

impl<R: OutputPin, F: OutputPin> Sampler<R, F> {
    pub fn new(rear: ChipSelect<R>, front: ChipSelect<F>, timing: Timing) -> Self {
        Self {
            rear,
            front,
            timing,
        }
    }

    /// Take a full burst from one sensor and return its average.
    ///
    /// The bus must already be in master role. Never fails: a sensor that is absent reads back
    /// whatever the bus floats to.
    pub fn sample<B, D>(&mut self, bus: &mut B, delay: &mut D, channel: Channel) -> u16
    where
        B: SyncBus,
        D: DelayNs,
    {
        delay.delay_us(self.timing.settle_us);
        bus.discard_pending();

        let mut raw = [0u16; SAMPLES_PER_READING];
        for slot in raw.iter_mut() {
            delay.delay_us(self.timing.prepare_us);
            *slot = self.read_raw(bus, channel);
        }

        let value = average(&raw);
        trace!("accel {}: {}", channel, value);
        value
    }

    /// One RDAX transaction: command byte, then two clocked response bytes, MSB first.
    fn read_raw<B: SyncBus>(&mut self, bus: &mut B, channel: Channel) -> u16 {
        self.select(channel, true);
        bus.transfer_byte(cmd::RDAX);
        let hi = bus.transfer_byte(cmd::DUMMY);
        let lo = bus.transfer_byte(cmd::DUMMY);
        self.select(channel, false);
        u16::from_be_bytes([hi, lo])
    }

    fn select(&mut self, channel: Channel, on: bool) {
        match (channel, on) {
            (Channel::Rear, true) => self.rear.select(),
            (Channel::Rear, false) => self.rear.deselect(),
            (Channel::Front, true) => self.front.select(),
            (Channel::Front, false) => self.front.deselect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_samples_average_to_shifted_value() {
        assert_eq!(average(&[0x0400; SAMPLES_PER_READING]), 0x20);
    }

    #[test]
    fn average_truncates() {
        let mut raw = [0u16; SAMPLES_PER_READING];
        // Sixteen zeros and one 16 (after the shift) average to 0.94..., i.e. 0.
        raw[3] = 16 << DATA_SHIFT;
        assert_eq!(average(&raw), 0);
        raw[4] = 1 << DATA_SHIFT;
        assert_eq!(average(&raw), 1);
    }

    #[test]
    fn full_scale_does_not_overflow() {
        assert_eq!(average(&[0xFFFF; SAMPLES_PER_READING]), 0x7FF);
    }

    #[test]
    fn reading_payload_is_big_endian() {
        let reading = AccelReading {
            rear: 0x0123,
            front: 0x0456,
        };
        assert_eq!(reading.to_be_bytes(), [0x01, 0x23, 0x04, 0x56]);
        assert_eq!(reading.get(Channel::Front), 0x0456);
        assert_eq!(Channel::Rear.other(), Channel::Front);
    }
}
