// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SysTick busy-wait delay exposed through `embedded_hal::delay::DelayNs`.

use embedded_hal::delay::DelayNs;

pub struct SysDelay {
    inner: cortex_m::delay::Delay,
}

impl SysDelay {
    /// `ahb_hz` is the core clock SysTick counts.
    pub fn new(syst: cortex_m::peripheral::SYST, ahb_hz: u32) -> Self {
        Self {
            inner: cortex_m::delay::Delay::new(syst, ahb_hz),
        }
    }
}

impl DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.inner.delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.inner.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.inner.delay_ms(ms);
    }
}
