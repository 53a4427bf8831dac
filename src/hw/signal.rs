// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Active-high control lines: FPGA enable, FPGA command strobe and accelerometer init.

use embedded_hal::digital::OutputPin;

/// Output line that is low when idle and driven high while asserted.
pub struct Signal<PIN: OutputPin> {
    pin: PIN,
}

impl<PIN: OutputPin> Signal<PIN> {
    /// Take the pin and drive it to its idle (low) level.
    pub fn active_high(mut pin: PIN) -> Self {
        pin.set_low().ok();
        Self { pin }
    }

    #[inline]
    pub fn assert(&mut self) {
        self.pin.set_high().ok();
    }

    #[inline]
    pub fn deassert(&mut self) {
        self.pin.set_low().ok();
    }
}
