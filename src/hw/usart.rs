// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host serial link abstraction layer.
//!
//! The core only ever needs two things from the UART: "is there a byte, and if so give it to me"
//! without blocking, and "send these bytes". [`SerialLink`] is that seam; [`Usart`] (feature
//! `board`) implements it on top of the HAL serial driver at 115200 8N1.

/// Non-blocking receive, blocking transmit.
pub trait SerialLink {
    type Error;

    /// Take one received byte. `WouldBlock` when nothing is waiting.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Queue `bytes` for transmission, blocking until the transmitter accepted all of them.
    fn write_bytes(&mut self, bytes: &[u8]);
}

impl<T: SerialLink + ?Sized> SerialLink for &mut T {
    type Error = T::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        (**self).read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes)
    }
}

#[cfg(feature = "board")]
pub use self::board::Usart;

#[cfg(feature = "board")]
mod board {
    use super::SerialLink;
    use nb::block;
    use stm32f7xx_hal::{
        prelude::*,
        serial::{self, Instance, Pins, Rx, Serial, Tx},
    };

    pub struct Usart<U: Instance> {
        tx: Tx<U>,
        rx: Rx<U>,
    }

    impl<U: Instance> Usart<U> {
        pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
            let (tx, rx) = serial.split();
            Self { tx, rx }
        }

        #[inline]
        pub fn write_byte(&mut self, b: u8) {
            let _ = block!(self.tx.write(b));
        }
    }

    impl<U: Instance> SerialLink for Usart<U> {
        type Error = serial::Error;

        fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
            self.rx.read()
        }

        fn write_bytes(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.write_byte(b);
            }
        }
    }
}
