// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host side of the serial protocol.
//!
//! Request encoding and response checking as the PC driver does them, plus the unit conversions
//! the driver applies to joint commands and accelerometer readings. Used by host tooling and by
//! the tests to talk to the bridge the way the real host does.

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::drivers::accel::AccelReading;
use crate::protocol::crc::Crc16;
use crate::protocol::messages::*;

/// Length of an encoded `STEPS` request.
pub const STEPS_REQUEST_LEN: usize = 1 + COMMAND_LEN + 2;

/// Length of a `GET_ACCELS` response.
pub const ACCELS_RESPONSE_LEN: usize = 4 + 2;

/// Raw accelerometer counts per g.
pub const ACCEL_COUNTS_PER_G: f32 = 493.56;

// Direction bits in the control byte
const J1_DIR: u8 = 1 << 7;
const J2_DIR: u8 = 1 << 6;
const J3_DIR: u8 = 1 << 5;

/// The host's running checksum. Started fresh by each request opcode and carried through the rest
/// of the request and the whole response.
#[derive(Copy, Clone, Debug, Default)]
pub struct HostCrc {
    crc: Crc16,
}

impl HostCrc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new exchange with `opcode`.
    pub fn start(&mut self, opcode: Opcode) {
        self.crc.fold_fresh(&[u8::from(opcode)]);
    }

    /// Fold request or response bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        self.crc.fold_carry(bytes);
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.crc.value()
    }

    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 2] {
        self.crc.to_be_bytes()
    }

    /// Fold a received response payload and compare with its trailing checksum.
    pub fn check_response(&mut self, payload: &[u8], crc: [u8; 2]) -> bool {
        self.push(payload);
        self.value() == u16::from_be_bytes(crc)
    }
}

/// One `STEPS` request: three joint command values and their direction bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepsRequest {
    pub j1: u32,
    pub j2: u32,
    pub j3: u32,
    pub j1_dir: bool,
    pub j2_dir: bool,
    pub j3_dir: bool,
}

impl StepsRequest {
    /// All joints idle, all directions clear.
    pub const IDLE: Self = Self {
        j1: IDLE_JOINT,
        j2: IDLE_JOINT,
        j3: IDLE_JOINT,
        j1_dir: false,
        j2_dir: false,
        j3_dir: false,
    };

    pub fn control(&self) -> u8 {
        let mut control = 0;
        if self.j1_dir {
            control |= J1_DIR;
        }
        if self.j2_dir {
            control |= J2_DIR;
        }
        if self.j3_dir {
            control |= J3_DIR;
        }
        control
    }

    pub fn command(&self) -> Command {
        Command::new(self.j1, self.j2, self.j3, self.control())
    }

    /// Encode as `[opcode][13 command bytes][crcHi][crcLo]`, leaving `crc` ready to check the
    /// status reply.
    pub fn encode(&self, crc: &mut HostCrc) -> [u8; STEPS_REQUEST_LEN] {
        let mut out = [0u8; STEPS_REQUEST_LEN];
        out[0] = CMD_STEPS;
        out[1..1 + COMMAND_LEN].copy_from_slice(self.command().as_bytes());

        crc.start(Opcode::Steps);
        crc.push(&out[1..1 + COMMAND_LEN]);
        out[1 + COMMAND_LEN..].copy_from_slice(&crc.to_be_bytes());
        out
    }
}

/// Check a `[status][crcHi][crcLo]` reply to a `STEPS` request encoded with the same `crc`.
///
/// `Some(true)` if the command was queued, `Some(false)` if the queue was full, `None` if the reply
/// is corrupt.
pub fn parse_steps_reply(reply: &[u8; 3], crc: &mut HostCrc) -> Option<bool> {
    if !crc.check_response(&reply[..1], [reply[1], reply[2]]) {
        return None;
    }
    Some(reply[0] == STATUS_QUEUED)
}

/// Check and decode a `GET_ACCELS` response.
pub fn parse_accels(response: &[u8; ACCELS_RESPONSE_LEN]) -> Option<AccelReading> {
    let mut crc = HostCrc::new();
    crc.start(Opcode::GetAccels);
    if !crc.check_response(&response[..4], [response[4], response[5]]) {
        return None;
    }
    Some(AccelReading {
        rear: u16::from_be_bytes([response[0], response[1]]),
        front: u16::from_be_bytes([response[2], response[3]]),
    })
}

/// Joint command value for `steps` steps in one 20 ms period.
pub fn steps_to_cmd_val(steps: u32) -> u32 {
    if steps == 0 {
        return IDLE_JOINT;
    }
    (500_000 / steps).reverse_bits()
}

/// Joint command value for a stepping frequency in Hz.
pub fn freq_to_cmd_val(freq: u32) -> u32 {
    if freq == 0 {
        return IDLE_JOINT;
    }
    (25_000_000 / freq).reverse_bits()
}

/// Tilt angle in degrees for an averaged accelerometer reading and its level offset.
///
/// Readings more than 1 g from `offset` saturate at ±90°.
pub fn accel_to_degrees(value: u16, offset: u16) -> f32 {
    let ratio = (f32::from(value) - f32::from(offset)) / ACCEL_COUNTS_PER_G;
    if ratio >= 1.0 {
        90.0
    } else if ratio <= -1.0 {
        -90.0
    } else {
        ratio.asin() * (180.0 / core::f32::consts::PI)
    }
}
