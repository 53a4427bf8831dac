// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 bridge board.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stm32f7xx_hal::{
    gpio::{self, gpioa, gpiod, gpioe, Alternate, Floating, Input, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub spi4: Spi4Pins,
    pub accel: AccelPins,
    pub fpga: FpgaPins,
}

/// USART1 TX/RX, host link
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// SPI4 SCK/MISO/MOSI, shared by accelerometers (master) and FPGA (slave)
pub struct Spi4Pins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
}

/// Accelerometer chip selects (normally high) and the shared init line (normally low)
pub struct AccelPins {
    pub cs_rear: Gpio<gpioe::PE4<Output<PushPull>>>,
    pub cs_front: Gpio<gpioe::PE11<Output<PushPull>>>,
    pub init: Gpio<gpiod::PD11<Output<PushPull>>>,
}

/// FPGA handshake lines
pub struct FpgaPins {
    pub enable: Gpio<gpiod::PD12<Output<PushPull>>>,
    pub command: Gpio<gpiod::PD13<Output<PushPull>>>,
    pub ready: Gpio<gpiod::PD14<Input<Floating>>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            spi4: Spi4Pins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
            },

            accel: AccelPins {
                cs_rear: Gpio(gpioe.pe4.into_push_pull_output()),
                cs_front: Gpio(gpioe.pe11.into_push_pull_output()),
                init: Gpio(gpiod.pd11.into_push_pull_output()),
            },

            fpga: FpgaPins {
                enable: Gpio(gpiod.pd12.into_push_pull_output()),
                command: Gpio(gpiod.pd13.into_push_pull_output()),
                ready: Gpio(gpiod.pd14.into_floating_input()),
            },
        }
    }
}

/// Adapts a HAL pin to the `embedded-hal` 1.0 digital traits the core is written against.
pub struct Gpio<PIN>(pub PIN);

impl<PIN> ErrorType for Gpio<PIN> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> OutputPin for Gpio<gpio::Pin<P, N, Output<PushPull>>> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high();
        Ok(())
    }
}

impl<const P: char, const N: u8> InputPin for Gpio<gpio::Pin<P, N, Input<Floating>>> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.is_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.is_low())
    }
}
