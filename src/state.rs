// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Mutable state shared by the dispatcher, the exchange and the mode state machine.
//!
//! Everything lives in one [`BridgeState`] created at boot and passed by `&mut` to whichever
//! component runs this turn. Only one component runs at a time, so no locking is needed.

use crate::drivers::accel::AccelReading;
use crate::protocol::crc::Crc16;
use crate::queue::CommandQueue;

/// Top-level operating mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Outputs idle, bus unconfigured. Left by `power_on`.
    Bringup,
    /// Bus in slave role, commands flow to the FPGA.
    Normal,
    /// Bus in master role for good, only accelerometer reports are served. Terminal.
    ReportOnly,
}

pub struct BridgeState {
    pub queue: CommandQueue,
    pub crc: Crc16,
    pub accel: AccelReading,
    /// Queued commands are held back while set.
    pub deferred: bool,
    mode: Mode,
}

impl BridgeState {
    pub const fn new(deferred: bool) -> Self {
        Self {
            queue: CommandQueue::new(),
            crc: Crc16::new(),
            accel: AccelReading { rear: 0, front: 0 },
            deferred,
            mode: Mode::Bringup,
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.mode == Mode::ReportOnly
    }

    /// Move to `Normal`. Ignored once report-only mode has been entered.
    pub(crate) fn enter_normal(&mut self) {
        if self.mode == Mode::Bringup {
            self.mode = Mode::Normal;
        }
    }

    /// Latch report-only mode. Returns `false` if it was already latched.
    pub fn latch_report_only(&mut self) -> bool {
        let changed = self.mode != Mode::ReportOnly;
        self.mode = Mode::ReportOnly;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_only_is_terminal() {
        let mut state = BridgeState::new(true);
        assert_eq!(state.mode(), Mode::Bringup);
        assert!(state.latch_report_only());
        assert!(!state.latch_report_only());
        state.enter_normal();
        assert_eq!(state.mode(), Mode::ReportOnly);
    }

    #[test]
    fn normal_only_from_bringup() {
        let mut state = BridgeState::new(false);
        state.enter_normal();
        assert_eq!(state.mode(), Mode::Normal);
        assert!(!state.deferred);
    }
}
