// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side stand-ins for the bridge hardware.
//!
//! Pins, the bus and the delay all append to one shared [`Log`] so tests can check the order in
//! which things happened.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use armbridge::config::{Config, ReadTimeout, Timing};
use armbridge::controller::{ControlPins, Controller};
use armbridge::drivers::accel::cmd::RDAX;
use armbridge::hw::{BusRole, SerialLink, SyncBus};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Pin(&'static str, bool),
    Role(BusRole),
    DelayNs(u32),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Serial link fed from a byte queue; everything written is collected in `tx`.
#[derive(Default)]
pub struct MockSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
}

impl MockSerial {
    pub fn with_rx(bytes: &[u8]) -> Self {
        Self {
            rx: bytes.iter().copied().collect(),
            tx: Vec::new(),
        }
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn take_tx(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.tx)
    }
}

impl SerialLink for MockSerial {
    type Error = ();

    fn read_byte(&mut self) -> nb::Result<u8, ()> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.tx.extend_from_slice(bytes);
    }
}

/// SPI bus model.
///
/// As master it answers every RDAX command with `sensor` (MSB first). As slave it exposes
/// `register` through `received` and records every byte shifted out in `sent`.
pub struct MockBus {
    pub role: Option<BusRole>,
    pub register: u8,
    pub sensor: u16,
    pub sent: Vec<u8>,
    pub discards: usize,
    pending: VecDeque<u8>,
    log: Log,
}

impl MockBus {
    pub fn new(log: &Log) -> Self {
        Self {
            role: None,
            register: 0,
            sensor: 0,
            sent: Vec::new(),
            discards: 0,
            pending: VecDeque::new(),
            log: log.clone(),
        }
    }
}

impl SyncBus for MockBus {
    fn configure(&mut self, role: BusRole) {
        self.role = Some(role);
        self.pending.clear();
        self.log.borrow_mut().push(Event::Role(role));
    }

    fn received(&mut self) -> u8 {
        self.register
    }

    fn clear_received(&mut self) {
        self.register = 0;
    }

    fn transfer_byte(&mut self, out: u8) -> u8 {
        match self.role {
            Some(BusRole::Master) => {
                if out == RDAX {
                    self.pending = self.sensor.to_be_bytes().into_iter().collect();
                    0
                } else {
                    self.pending.pop_front().unwrap_or(0)
                }
            }
            _ => {
                self.sent.push(out);
                0
            }
        }
    }

    fn discard_pending(&mut self) {
        self.discards += 1;
    }
}

/// GPIO line whose level is shared with the test through `level`.
pub struct MockPin {
    name: &'static str,
    pub level: Rc<Cell<bool>>,
    log: Log,
}

impl MockPin {
    pub fn new(name: &'static str, initial: bool, log: &Log) -> Self {
        Self {
            name,
            level: Rc::new(Cell::new(initial)),
            log: log.clone(),
        }
    }

    pub fn handle(&self) -> Rc<Cell<bool>> {
        self.level.clone()
    }

    fn drive(&mut self, high: bool) {
        self.level.set(high);
        self.log.borrow_mut().push(Event::Pin(self.name, high));
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.drive(true);
        Ok(())
    }
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level.get())
    }
}

/// Records requested delays instead of waiting.
pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }
}

/// Short poll budgets so a missing byte times out immediately.
pub const FAST_TIMEOUT: ReadTimeout = ReadTimeout {
    inter_byte_polls: 4,
    transaction_polls: 16,
};

pub fn fast_config() -> Config {
    Config::default()
        .with_timing(Timing::ZERO)
        .with_read_timeout(FAST_TIMEOUT)
}

pub type Bridge = Controller<
    MockSerial,
    MockBus,
    MockDelay,
    MockPin,
    MockPin,
    MockPin,
    MockPin,
    MockPin,
    MockPin,
>;

/// Handles to the pin levels of a [`Bridge`].
pub struct Lines {
    pub cs_rear: Rc<Cell<bool>>,
    pub cs_front: Rc<Cell<bool>>,
    pub accel_init: Rc<Cell<bool>>,
    pub fpga_enable: Rc<Cell<bool>>,
    pub fpga_command: Rc<Cell<bool>>,
    pub fpga_ready: Rc<Cell<bool>>,
}

pub fn bridge(fpga_ready: bool, config: Config) -> (Bridge, Lines, Log) {
    let log = new_log();
    let pins = ControlPins {
        cs_rear: MockPin::new("cs_rear", false, &log),
        cs_front: MockPin::new("cs_front", false, &log),
        accel_init: MockPin::new("accel_init", true, &log),
        fpga_enable: MockPin::new("fpga_enable", true, &log),
        fpga_command: MockPin::new("fpga_command", true, &log),
        fpga_ready: MockPin::new("fpga_ready", fpga_ready, &log),
    };
    let lines = Lines {
        cs_rear: pins.cs_rear.handle(),
        cs_front: pins.cs_front.handle(),
        accel_init: pins.accel_init.handle(),
        fpga_enable: pins.fpga_enable.handle(),
        fpga_command: pins.fpga_command.handle(),
        fpga_ready: pins.fpga_ready.handle(),
    };
    let bridge = Controller::new(
        MockSerial::default(),
        MockBus::new(&log),
        MockDelay::new(&log),
        pins,
        config,
    );
    (bridge, lines, log)
}
