// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod crc;
pub mod dispatcher;
pub mod host;
pub mod messages;

pub use crc::Crc16;
pub use dispatcher::{Dispatch, Dispatcher};
pub use messages::{Command, Frame, Opcode};
