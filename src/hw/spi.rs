// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Synchronous (SPI) bus abstraction layer.
//!
//! The same bus is shared by two very different peers:
//! - as **master** it clocks the two accelerometers, one chip select each;
//! - as **slave** it is clocked by the FPGA, which signals readiness by leaving
//!   [`SYNC_SENTINEL`](crate::protocol::messages::SYNC_SENTINEL) in the data register.
//!
//! - `SyncBus` is the byte-level seam the core drives.
//! - `ChipSelect` is the active-low select line of one inclinometer.
//! - `SpiBus` (feature `board`) implements `SyncBus` on STM32F7 SPI4 at register level, since
//!   the HAL has no slave mode.

use embedded_hal::digital::OutputPin;

/// Which side drives the clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusRole {
    Master,
    Slave,
}

/// Byte-synchronous full-duplex bus.
pub trait SyncBus {
    /// Reconfigure clocking role. The bus is usable as soon as this returns.
    fn configure(&mut self, role: BusRole);

    /// Last byte shifted in by the peer, without starting a transfer.
    fn received(&mut self) -> u8;

    /// Overwrite the data register with 0x00 so a seen byte cannot trigger twice.
    fn clear_received(&mut self);

    /// Shift `out` out and return the byte shifted in. Blocks until the transfer-complete flag
    /// is set.
    fn transfer_byte(&mut self, out: u8) -> u8;

    /// Wait out an in-flight transfer and drop whatever it received.
    fn discard_pending(&mut self);
}

impl<T: SyncBus + ?Sized> SyncBus for &mut T {
    fn configure(&mut self, role: BusRole) {
        (**self).configure(role)
    }

    fn received(&mut self) -> u8 {
        (**self).received()
    }

    fn clear_received(&mut self) {
        (**self).clear_received()
    }

    fn transfer_byte(&mut self, out: u8) -> u8 {
        (**self).transfer_byte(out)
    }

    fn discard_pending(&mut self) {
        (**self).discard_pending()
    }
}

/// Select line of one inclinometer. The sensor listens while the line is low.
pub struct ChipSelect<PIN: OutputPin> {
    pin: PIN,
}

impl<PIN: OutputPin> ChipSelect<PIN> {
    /// Take the pin and park it high so the sensor ignores the bus.
    pub fn active_low(mut pin: PIN) -> Self {
        pin.set_high().ok();
        Self { pin }
    }

    /// Pull the line low for one RDAX transaction.
    #[inline]
    pub fn select(&mut self) {
        self.pin.set_low().ok();
    }

    /// Release the sensor at the end of the transaction.
    #[inline]
    pub fn deselect(&mut self) {
        self.pin.set_high().ok();
    }
}

#[cfg(feature = "board")]
pub use self::board::SpiBus;

#[cfg(feature = "board")]
mod board {
    use super::{BusRole, SyncBus};
    use crate::hw::pins::Spi4Pins;
    use core::ptr;
    use stm32f7xx_hal::pac;

    /// SPI4 driven directly through its registers.
    pub struct SpiBus {
        spi: pac::SPI4,
        _pins: Spi4Pins,
        last: u8,
    }

    impl SpiBus {
        /// Take SPI4, enable its clock and leave it disabled until [`SyncBus::configure`].
        pub fn new(spi: pac::SPI4, pins: Spi4Pins) -> Self {
            // SAFETY: single read-modify-write of this peripheral's own enable bit, before any
            // other code touches SPI4.
            let rcc = unsafe { &*pac::RCC::ptr() };
            rcc.apb2enr.modify(|_, w| w.spi4en().set_bit());
            spi.cr1.modify(|_, w| w.spe().clear_bit());
            Self {
                spi,
                _pins: pins,
                last: 0,
            }
        }

        #[inline]
        fn write_dr(&mut self, byte: u8) {
            // 8-bit access so the TX FIFO takes one byte, not two.
            // SAFETY: DR is a valid, aligned MMIO register of an owned peripheral.
            unsafe { ptr::write_volatile(&self.spi.dr as *const _ as *mut u8, byte) }
        }

        #[inline]
        fn read_dr(&mut self) -> u8 {
            // SAFETY: as above.
            unsafe { ptr::read_volatile(&self.spi.dr as *const _ as *const u8) }
        }
    }

    impl SyncBus for SpiBus {
        fn configure(&mut self, role: BusRole) {
            self.spi.cr1.modify(|_, w| w.spe().clear_bit());
            // 8-bit frames, RXNE on one byte.
            self.spi
                .cr2
                .modify(|_, w| unsafe { w.ds().bits(0b0111) }.frxth().set_bit());
            match role {
                // Mode 0, fPCLK/16, software NSS held high.
                BusRole::Master => self.spi.cr1.modify(|_, w| unsafe {
                    w.mstr()
                        .set_bit()
                        .cpol()
                        .clear_bit()
                        .cpha()
                        .clear_bit()
                        .br()
                        .bits(0b011)
                        .ssm()
                        .set_bit()
                        .ssi()
                        .set_bit()
                }),
                // CPOL=0, CPHA=1: sample on the trailing edge. Always selected.
                BusRole::Slave => self.spi.cr1.modify(|_, w| {
                    w.mstr()
                        .clear_bit()
                        .cpol()
                        .clear_bit()
                        .cpha()
                        .set_bit()
                        .ssm()
                        .set_bit()
                        .ssi()
                        .clear_bit()
                }),
            }
            self.spi.cr1.modify(|_, w| w.spe().set_bit());
            self.last = 0;
        }

        fn received(&mut self) -> u8 {
            if self.spi.sr.read().rxne().bit_is_set() {
                self.last = self.read_dr();
            }
            self.last
        }

        fn clear_received(&mut self) {
            self.last = 0;
            if self.spi.sr.read().txe().bit_is_set() {
                self.write_dr(0x00);
            }
        }

        fn transfer_byte(&mut self, out: u8) -> u8 {
            while self.spi.sr.read().txe().bit_is_clear() {}
            self.write_dr(out);
            while self.spi.sr.read().rxne().bit_is_clear() {}
            self.read_dr()
        }

        fn discard_pending(&mut self) {
            while self.spi.sr.read().bsy().bit_is_set() {}
            while self.spi.sr.read().rxne().bit_is_set() {
                let _ = self.read_dr();
            }
            // Reading SR after DR clears a latched overrun.
            let _ = self.spi.sr.read();
        }
    }
}
