// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Hardware Seams
//!
//! Everything the core needs from the MCU goes through the items here: the host serial link,
//! the synchronous bus, and a handful of GPIO lines. Pins and delays use the `embedded-hal` 1.0
//! traits directly; the serial link and the bus get small traits of their own because the core
//! needs operations `embedded-hal` does not model (peeking the SPI data register, switching
//! between master and slave role).
//!
//! With the `board` feature the STM32F777 implementations are compiled in as well.

pub mod signal;
pub mod spi;
pub mod usart;

#[cfg(feature = "board")]
pub mod delay;
#[cfg(feature = "board")]
pub mod pins;

pub use signal::Signal;
pub use spi::{BusRole, ChipSelect, SyncBus};
pub use usart::SerialLink;

#[cfg(feature = "board")]
pub use delay::SysDelay;
#[cfg(feature = "board")]
pub use spi::SpiBus;
#[cfg(feature = "board")]
pub use usart::Usart;
