// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed-capacity FIFO of motion commands between the host dispatcher and the FPGA exchange.
//!
//! Appending to a full queue fails and leaves the contents untouched; nothing is ever evicted.

use heapless::Deque;

use crate::protocol::messages::Command;

/// Number of command slots.
pub const CAPACITY: usize = 200;

/// Returned when a command does not fit. Carries the rejected command back.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueFull(pub Command);

pub struct CommandQueue {
    slots: Deque<Command, CAPACITY>,
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            slots: Deque::new(),
        }
    }

    /// Append at the tail.
    pub fn try_append(&mut self, command: Command) -> Result<(), QueueFull> {
        self.slots.push_back(command).map_err(QueueFull)
    }

    /// Take the oldest command.
    pub fn try_pop(&mut self) -> Option<Command> {
        self.slots.pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::COMMAND_LEN;

    fn cmd(n: u8) -> Command {
        Command::from_bytes([n; COMMAND_LEN])
    }

    #[test]
    fn pops_in_append_order() {
        let mut q = CommandQueue::new();
        for n in 0..5 {
            q.try_append(cmd(n)).unwrap();
        }
        for n in 0..5 {
            assert_eq!(q.try_pop(), Some(cmd(n)));
        }
        assert_eq!(q.try_pop(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn full_queue_rejects_without_evicting() {
        let mut q = CommandQueue::new();
        for n in 0..CAPACITY {
            q.try_append(cmd(n as u8)).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(q.try_append(cmd(0xEE)), Err(QueueFull(cmd(0xEE))));
        assert_eq!(q.len(), CAPACITY);
        assert_eq!(q.try_pop(), Some(cmd(0)));
    }

    #[test]
    fn wraps_around_the_ring() {
        let mut q = CommandQueue::new();
        for round in 0..3u8 {
            for n in 0..CAPACITY {
                q.try_append(cmd(n as u8 ^ round)).unwrap();
            }
            for n in 0..CAPACITY {
                assert_eq!(q.try_pop(), Some(cmd(n as u8 ^ round)));
            }
        }
        assert!(q.is_empty());
    }
}
