// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! CRC-16/CCITT running checksum used to frame every host response.
//!
//! Polynomial 0x1021, seed 0xFFFF, no reflection, no final XOR (the "CCITT-FALSE" variant).
//! The accumulator persists between calls: a response checksum is built by folding the request
//! opcode with a fresh seed and then carrying on through the response payload, so the host and the
//! bridge stay in step across one request/response pair.

/// Seed value the accumulator starts from after a reset.
pub const SEED: u16 = 0xFFFF;

const POLY: u16 = 0x1021;

/// Running CRC-16/CCITT accumulator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc16 {
    value: u16,
}

impl Crc16 {
    pub const fn new() -> Self {
        Self { value: SEED }
    }

    /// Reseed to 0xFFFF.
    #[inline]
    pub fn reset(&mut self) {
        self.value = SEED;
    }

    /// Reseed, then fold `bytes`.
    pub fn fold_fresh(&mut self, bytes: &[u8]) -> u16 {
        self.reset();
        self.fold_carry(bytes)
    }

    /// Fold `bytes` into the current accumulator.
    pub fn fold_carry(&mut self, bytes: &[u8]) -> u16 {
        for &b in bytes {
            self.value = update(self.value, b);
        }
        self.value
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.value
    }

    /// Accumulator in transmission order (high byte first).
    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 2] {
        self.value.to_be_bytes()
    }

    /// Fold `bytes` fresh and compare with a received big-endian checksum.
    ///
    /// The accumulator keeps the folded value either way, so a matching request can be carried
    /// straight into its response.
    pub fn matches(&mut self, bytes: &[u8], received: [u8; 2]) -> bool {
        self.fold_fresh(bytes) == u16::from_be_bytes(received)
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Fold one byte into `crc`.
#[inline]
pub const fn update(mut crc: u16, byte: u8) -> u16 {
    crc ^= (byte as u16) << 8;
    let mut n = 0;
    while n < 8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ POLY
        } else {
            crc << 1
        };
        n += 1;
    }
    crc
}

/// One-shot checksum of `bytes` from a fresh seed.
pub const fn checksum(bytes: &[u8]) -> u16 {
    let mut crc = SEED;
    let mut i = 0;
    while i < bytes.len() {
        crc = update(crc, bytes[i]);
        i += 1;
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_check_value() {
        assert_eq!(checksum(b"123456789"), 0x29B1);
    }

    #[test]
    fn carry_continues_where_fresh_left_off() {
        let mut crc = Crc16::new();
        crc.fold_fresh(&[0x00]);
        crc.fold_carry(&[0x40]);
        assert_eq!(crc.value(), checksum(&[0x00, 0x40]));
        assert_eq!(crc.value(), 0x55CB);
        assert_eq!(crc.to_be_bytes(), [0x55, 0xCB]);
    }

    #[test]
    fn fresh_discards_previous_state() {
        let mut crc = Crc16::new();
        crc.fold_fresh(&[0xDE, 0xAD]);
        crc.fold_fresh(&[0x03]);
        assert_eq!(crc.value(), checksum(&[0x03]));
    }

    #[test]
    fn reset_restores_seed() {
        let mut crc = Crc16::new();
        crc.fold_carry(&[1, 2, 3]);
        crc.reset();
        assert_eq!(crc.value(), SEED);
    }

    #[test]
    fn matches_rejects_swapped_bytes() {
        let data = [0x10, 0x20, 0x30];
        let good = checksum(&data).to_be_bytes();
        let mut crc = Crc16::new();
        assert!(crc.matches(&data, good));
        assert!(!crc.matches(&data, [good[1], good[0]]));
    }
}
