// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! FPGA exchange.
//!
//! In normal operation the bus is a slave to the FPGA. When the FPGA is ready for the next motion
//! command it leaves [`SYNC_SENTINEL`] in the data register; the bridge clears it and answers with
//! one [`Frame`] carrying either the oldest queued command or the idle filler.

use embedded_hal::digital::OutputPin;

use crate::hw::{Signal, SyncBus};
use crate::protocol::messages::{Command, Frame, SYNC_SENTINEL};
use crate::state::BridgeState;

/// What went out in a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameKind {
    /// A command popped from the queue.
    Command,
    /// Idle filler: the queue was empty or held back.
    Filler,
}

pub struct Exchange<PIN: OutputPin> {
    strobe: Signal<PIN>,
}

impl<PIN: OutputPin> Exchange<PIN> {
    /// `strobe` is the FPGA command line, held asserted while a frame is on the bus.
    pub fn new(strobe: Signal<PIN>) -> Self {
        Self { strobe }
    }

    /// Check for the sentinel once. If it is there, send a frame and report what it carried.
    pub fn poll<B: SyncBus>(&mut self, bus: &mut B, state: &mut BridgeState) -> Option<FrameKind> {
        if bus.received() != SYNC_SENTINEL {
            return None;
        }
        bus.clear_received();

        let (frame, kind) = match Self::next_command(state) {
            Some(command) => (Frame::new(&command), FrameKind::Command),
            None => (Frame::filler(), FrameKind::Filler),
        };
        self.send(bus, &frame);
        trace!("frame out: {}", kind);
        Some(kind)
    }

    /// Transmit one frame byte by byte under the command strobe.
    pub fn send<B: SyncBus>(&mut self, bus: &mut B, frame: &Frame) {
        self.strobe.assert();
        // The sentinel transfer is still flagged complete.
        bus.discard_pending();
        for &byte in frame.as_bytes() {
            bus.transfer_byte(byte);
        }
        self.strobe.deassert();
    }

    fn next_command(state: &mut BridgeState) -> Option<Command> {
        if state.deferred {
            return None;
        }
        state.queue.try_pop()
    }
}
