// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Wire definitions shared by the host link and the FPGA link.

// Opcodes
pub const CMD_READY: u8 = 0;
pub const CMD_STEPS: u8 = 1;
pub const CMD_EXEC_QUEUE: u8 = 2;
pub const CMD_GET_ACCELS: u8 = 3;
pub const CMD_SWITCH_TO_ACCEL_REPORT_MODE: u8 = 4;

/// Liveness magic returned by `READY`.
pub const READY_MAGIC: u8 = 0x40;

// `STEPS` status byte
pub const STATUS_QUEUED: u8 = 1;
pub const STATUS_QUEUE_FULL: u8 = 0;

/// Host request opcodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Opcode {
    Ready,
    Steps,
    ExecQueue,
    GetAccels,
    SwitchToAccelReportMode,
}

impl Opcode {
    /// Request bytes that follow the opcode, checksum included.
    pub const fn request_len(self) -> usize {
        match self {
            Opcode::Steps => COMMAND_LEN + 2,
            Opcode::Ready
            | Opcode::ExecQueue
            | Opcode::GetAccels
            | Opcode::SwitchToAccelReportMode => 0,
        }
    }

    /// Whether the opcode is accepted once the bridge is in report-only mode.
    pub const fn allowed_in_report_mode(self) -> bool {
        matches!(self, Opcode::GetAccels)
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        match op {
            Opcode::Ready => CMD_READY,
            Opcode::Steps => CMD_STEPS,
            Opcode::ExecQueue => CMD_EXEC_QUEUE,
            Opcode::GetAccels => CMD_GET_ACCELS,
            Opcode::SwitchToAccelReportMode => CMD_SWITCH_TO_ACCEL_REPORT_MODE,
        }
    }
}

/// Byte outside the known opcode range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownOpcode(pub u8);

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            CMD_READY => Ok(Opcode::Ready),
            CMD_STEPS => Ok(Opcode::Steps),
            CMD_EXEC_QUEUE => Ok(Opcode::ExecQueue),
            CMD_GET_ACCELS => Ok(Opcode::GetAccels),
            CMD_SWITCH_TO_ACCEL_REPORT_MODE => Ok(Opcode::SwitchToAccelReportMode),
            n => Err(UnknownOpcode(n)),
        }
    }
}

/// Size of one motion command on both links.
pub const COMMAND_LEN: usize = 13;

/// Joint command value meaning "no steps this period".
pub const IDLE_JOINT: u32 = 0x0242_F000;

/// One motion instruction: three 32-bit joint words and a control byte, kept in wire order.
///
/// The bytes are forwarded to the FPGA exactly as the host sent them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    bytes: [u8; COMMAND_LEN],
}

impl Command {
    /// Three idle joints, no direction bits. Sent whenever there is nothing to execute.
    pub const IDLE: Self = Self::new(IDLE_JOINT, IDLE_JOINT, IDLE_JOINT, 0);

    /// Build a command from joint words (big-endian on the wire) and a control byte.
    pub const fn new(j1: u32, j2: u32, j3: u32, control: u8) -> Self {
        let a = j1.to_be_bytes();
        let b = j2.to_be_bytes();
        let c = j3.to_be_bytes();
        Self {
            bytes: [
                a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3], c[0], c[1], c[2], c[3], control,
            ],
        }
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; COMMAND_LEN]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; COMMAND_LEN] {
        &self.bytes
    }

    /// Joint word for joint 0..=2.
    pub fn joint(&self, index: usize) -> Option<u32> {
        if index > 2 {
            return None;
        }
        let w = &self.bytes[index * 4..index * 4 + 4];
        Some(u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
    }

    #[inline]
    pub fn control(&self) -> u8 {
        self.bytes[COMMAND_LEN - 1]
    }
}

/// Value the FPGA writes into the bus data register when it wants a frame.
pub const SYNC_SENTINEL: u8 = 0x5A;

/// Total frame size on the FPGA link.
pub const FRAME_LEN: usize = 19;
/// First frame byte.
pub const FRAME_HEADER: u8 = 0xA5;
/// Where the command sits inside a frame.
pub const COMMAND_OFFSET: usize = 1;
/// Bytes after the command.
pub const FRAME_TRAILER: [u8; 5] = [0x00, 0x00, 0x00, 0x00, 0x5A];

/// Fixed-layout frame sent to the FPGA: header, command, trailer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    bytes: [u8; FRAME_LEN],
}

impl Frame {
    pub fn new(command: &Command) -> Self {
        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = FRAME_HEADER;
        bytes[COMMAND_OFFSET..COMMAND_OFFSET + COMMAND_LEN].copy_from_slice(command.as_bytes());
        bytes[COMMAND_OFFSET + COMMAND_LEN..].copy_from_slice(&FRAME_TRAILER);
        Self { bytes }
    }

    /// Frame carrying [`Command::IDLE`].
    pub fn filler() -> Self {
        Self::new(&Command::IDLE)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// The embedded command.
    pub fn command(&self) -> Command {
        let mut bytes = [0u8; COMMAND_LEN];
        bytes.copy_from_slice(&self.bytes[COMMAND_OFFSET..COMMAND_OFFSET + COMMAND_LEN]);
        Command::from_bytes(bytes)
    }
}
