// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host command dispatcher.
//!
//! Each [`Dispatcher::poll`] looks at the serial link once. With nothing waiting it returns
//! straight away; otherwise the byte is an opcode and the whole request is handled before
//! returning. Every response is `payload || crcHi || crcLo` where the checksum is bound to the
//! request that produced it. Anything that cannot be answered (unknown opcode, a command not
//! served in report-only mode, a short read, a bad checksum) is dropped without a reply; the host
//! times out and resends.

use crate::config::ReadTimeout;
use crate::hw::SerialLink;
use crate::protocol::crc::Crc16;
use crate::protocol::messages::*;
use crate::queue::QueueFull;
use crate::state::BridgeState;

/// Why a request got no response.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DropReason {
    /// Opcode outside the known range.
    Unknown(u8),
    /// Known opcode that report-only mode does not serve.
    NotInReportMode(Opcode),
    /// Request payload did not arrive in time.
    Timeout,
    /// Request checksum mismatch.
    Integrity,
}

/// Outcome of one [`Dispatcher::poll`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// No byte was waiting.
    Idle,
    /// Request served (a response was sent if the opcode has one).
    Handled(Opcode),
    /// Request consumed and discarded.
    Dropped(DropReason),
    /// The host asked for report-only mode. The caller owns the mode switch.
    EnterReportMode,
}

/// A timed read gave up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimedOut {
    /// Bytes stored before giving up.
    pub received: usize,
}

/// Fill `buf` from `serial`, giving up when the link stays quiet too long.
///
/// Every empty poll bumps two counters: one reset by each received byte, one never reset. The read
/// fails as soon as either exceeds its bound in `timeout`.
pub fn read_timed<S: SerialLink>(
    serial: &mut S,
    buf: &mut [u8],
    timeout: ReadTimeout,
) -> Result<(), TimedOut> {
    let mut filled = 0;
    let mut inter_byte = 0u32;
    let mut transaction = 0u32;

    while filled < buf.len() {
        match serial.read_byte() {
            Ok(byte) => {
                buf[filled] = byte;
                filled += 1;
                inter_byte = 0;
            }
            Err(_) => {
                inter_byte += 1;
                transaction += 1;
                if inter_byte > timeout.inter_byte_polls
                    || transaction > timeout.transaction_polls
                {
                    return Err(TimedOut { received: filled });
                }
            }
        }
    }
    Ok(())
}

/// Send `payload` followed by its checksum: `opcode` folded fresh, then `payload` carried.
pub fn respond<S: SerialLink>(serial: &mut S, crc: &mut Crc16, opcode: Opcode, payload: &[u8]) {
    crc.fold_fresh(&[u8::from(opcode)]);
    crc.fold_carry(payload);
    serial.write_bytes(payload);
    serial.write_bytes(&crc.to_be_bytes());
}

pub struct Dispatcher {
    timeout: ReadTimeout,
}

impl Dispatcher {
    pub fn new(timeout: ReadTimeout) -> Self {
        Self { timeout }
    }

    /// Handle at most one request.
    pub fn poll<S: SerialLink>(&mut self, serial: &mut S, state: &mut BridgeState) -> Dispatch {
        let byte = match serial.read_byte() {
            Ok(byte) => byte,
            Err(nb::Error::WouldBlock) => return Dispatch::Idle,
            Err(nb::Error::Other(_)) => {
                warn!("serial receive error");
                return Dispatch::Idle;
            }
        };

        let opcode = match Opcode::try_from(byte) {
            Ok(op) => op,
            Err(UnknownOpcode(b)) => {
                warn!("unknown opcode {=u8:#x}", b);
                return Dispatch::Dropped(DropReason::Unknown(b));
            }
        };

        if state.is_report_only() && !opcode.allowed_in_report_mode() {
            debug!("{} ignored in report-only mode", opcode);
            return Dispatch::Dropped(DropReason::NotInReportMode(opcode));
        }

        match opcode {
            Opcode::Ready => {
                respond(serial, &mut state.crc, opcode, &[READY_MAGIC]);
                Dispatch::Handled(opcode)
            }
            Opcode::Steps => self.steps(serial, state),
            Opcode::ExecQueue => {
                if state.deferred {
                    info!("queue released ({} pending)", state.queue.len());
                }
                state.deferred = false;
                Dispatch::Handled(opcode)
            }
            Opcode::GetAccels => {
                let payload = state.accel.to_be_bytes();
                respond(serial, &mut state.crc, opcode, &payload);
                Dispatch::Handled(opcode)
            }
            Opcode::SwitchToAccelReportMode => Dispatch::EnterReportMode,
        }
    }

    /// `STEPS`: read, verify and queue one command, then report whether it fit.
    fn steps<S: SerialLink>(&mut self, serial: &mut S, state: &mut BridgeState) -> Dispatch {
        const BODY: usize = 1 + COMMAND_LEN;
        let mut request = [0u8; 1 + Opcode::Steps.request_len()];
        request[0] = CMD_STEPS;

        if let Err(TimedOut { received }) = read_timed(serial, &mut request[1..], self.timeout) {
            warn!("STEPS timed out after {} bytes", received);
            return Dispatch::Dropped(DropReason::Timeout);
        }

        let (body, crc) = request.split_at(BODY);
        if !state.crc.matches(body, [crc[0], crc[1]]) {
            warn!("STEPS checksum mismatch");
            return Dispatch::Dropped(DropReason::Integrity);
        }

        let mut bytes = [0u8; COMMAND_LEN];
        bytes.copy_from_slice(&body[1..]);
        let status = match state.queue.try_append(Command::from_bytes(bytes)) {
            Ok(()) => {
                trace!("queued, {} pending", state.queue.len());
                STATUS_QUEUED
            }
            Err(QueueFull(_)) => {
                warn!("command queue full");
                STATUS_QUEUE_FULL
            }
        };

        // The accumulator still holds the verified request, so the reply carries on from it.
        state.crc.fold_carry(&[status]);
        serial.write_bytes(&[status]);
        serial.write_bytes(&state.crc.to_be_bytes());
        Dispatch::Handled(Opcode::Steps)
    }
}
