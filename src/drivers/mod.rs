// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! bridge logic.
//!
//! ## Existing drivers
//!
//! - [`accel`] – rear/front RDAX inclinometers on the shared synchronous bus

pub mod accel;

pub use accel::{AccelReading, Channel, Sampler};
