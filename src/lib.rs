// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Arm Bridge Firmware
//!
//! Motion-controller bridge for a robot arm, written in Rust, targeting an STM32F777 MCU.
//!
//! The bridge terminates the host's serial command protocol, queues motion commands and feeds them
//! to the arm's FPGA over SPI whenever the FPGA asks for one. It also samples the two
//! inclinometers used for levelling, and falls back to reporting only those readings when the FPGA
//! does not come up.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Hardware seams (serial link, SPI bus, GPIO lines) and their STM32F7 implementations |
//! | [`drivers`] | Device-level drivers (RDAX inclinometers) |
//! | [`protocol`] | Wire formats, CRC-16/CCITT, the host command dispatcher and host-side helpers |
//! | [`queue`] | Fixed-capacity command FIFO |
//! | [`exchange`] | FPGA frame exchange |
//! | [`controller`] | Power-on sequencing and the mode state machine |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod drivers;
pub mod exchange;
pub mod hw;
pub mod protocol;
pub mod queue;
pub mod state;

pub use config::Config;
pub use controller::{ControlPins, Controller};
pub use state::{BridgeState, Mode};
