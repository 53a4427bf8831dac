// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Power-on sequencing and the top-level mode state machine.
//!
//! ```text
//!            FPGA ready                       SWITCH_TO_ACCEL_REPORT_MODE
//! Bringup ───────────────► Normal ─────────────────────────────────────► ReportOnly
//!    │                                                                      ▲
//!    └──────────────────────── FPGA not ready ──────────────────────────────┘
//! ```
//!
//! The bus starts in master role for the accelerometers and is handed to the FPGA as a slave.
//! The hardware cannot take it back, so once the bridge falls back to master role for accelerometer
//! reporting it stays in [`Mode::ReportOnly`] until power is removed.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::config::{Config, Timing};
use crate::drivers::accel::{AccelReading, Channel, Sampler};
use crate::exchange::Exchange;
use crate::hw::{BusRole, ChipSelect, SerialLink, Signal, SyncBus};
use crate::protocol::dispatcher::{Dispatch, Dispatcher};
use crate::state::{BridgeState, Mode};

/// Raw GPIO lines the controller drives or reads.
pub struct ControlPins<R, F, I, E, C, RDY> {
    /// Rear accelerometer chip select (active low).
    pub cs_rear: R,
    /// Front accelerometer chip select (active low).
    pub cs_front: F,
    /// Accelerometer init, held high while the sensors own the bus.
    pub accel_init: I,
    /// FPGA enable.
    pub fpga_enable: E,
    /// FPGA command strobe, high during a frame.
    pub fpga_command: C,
    /// FPGA power-good input.
    pub fpga_ready: RDY,
}

/// The whole bridge: hardware, shared state and the mode state machine.
pub struct Controller<S, B, D, R, F, I, E, C, RDY>
where
    R: OutputPin,
    F: OutputPin,
    I: OutputPin,
    E: OutputPin,
    C: OutputPin,
{
    serial: S,
    bus: B,
    delay: D,
    sampler: Sampler<R, F>,
    exchange: Exchange<C>,
    accel_init: Signal<I>,
    fpga_enable: Signal<E>,
    fpga_ready: RDY,
    dispatcher: Dispatcher,
    state: BridgeState,
    timing: Timing,
    next_channel: Channel,
}

impl<S, B, D, R, F, I, E, C, RDY> Controller<S, B, D, R, F, I, E, C, RDY>
where
    S: SerialLink,
    B: SyncBus,
    D: DelayNs,
    R: OutputPin,
    F: OutputPin,
    I: OutputPin,
    E: OutputPin,
    C: OutputPin,
    RDY: InputPin,
{
    /// Take ownership of the hardware and drive every output to its idle level. Nothing else
    /// happens until [`power_on`](Self::power_on).
    pub fn new(
        serial: S,
        bus: B,
        delay: D,
        pins: ControlPins<R, F, I, E, C, RDY>,
        config: Config,
    ) -> Self {
        let sampler = Sampler::new(
            ChipSelect::active_low(pins.cs_rear),
            ChipSelect::active_low(pins.cs_front),
            config.timing,
        );
        Self {
            serial,
            bus,
            delay,
            sampler,
            exchange: Exchange::new(Signal::active_high(pins.fpga_command)),
            accel_init: Signal::active_high(pins.accel_init),
            fpga_enable: Signal::active_high(pins.fpga_enable),
            fpga_ready: pins.fpga_ready,
            dispatcher: Dispatcher::new(config.read_timeout),
            state: BridgeState::new(config.start_deferred),
            timing: config.timing,
            next_channel: Channel::Rear,
        }
    }

    /// Boot sequence. Ends in `Normal`, or in `ReportOnly` when the FPGA never came up.
    ///
    /// Does nothing once bring-up is over.
    pub fn power_on(&mut self) -> Mode {
        if self.state.mode() != Mode::Bringup {
            return self.state.mode();
        }

        // A pin that cannot be read counts as "not ready".
        if !self.fpga_ready.is_high().unwrap_or(false) {
            warn!("FPGA not ready, falling back to accelerometer reporting");
            self.enter_report_mode();
            return self.state.mode();
        }

        self.claim_bus_for_sensors();
        let rear = self
            .sampler
            .sample(&mut self.bus, &mut self.delay, Channel::Rear);
        let front = self
            .sampler
            .sample(&mut self.bus, &mut self.delay, Channel::Front);
        self.state.accel = AccelReading { rear, front };
        info!("baseline accel rear={} front={}", rear, front);

        self.accel_init.deassert();
        self.delay.delay_ms(self.timing.init_release_ms);
        self.bus.configure(BusRole::Slave);
        self.fpga_enable.assert();
        self.state.enter_normal();
        info!("bridge up");
        self.state.mode()
    }

    /// Switch to accelerometer reporting for good. Safe to call more than once.
    pub fn enter_report_mode(&mut self) {
        if !self.state.latch_report_only() {
            return;
        }
        self.fpga_enable.deassert();
        self.claim_bus_for_sensors();
        info!("report-only mode");
    }

    /// One cooperative turn of the current mode.
    ///
    /// Returns what the dispatcher did, or [`Dispatch::Idle`] if it was not polled.
    pub fn step(&mut self) -> Dispatch {
        let outcome = match self.state.mode() {
            Mode::Bringup => return Dispatch::Idle,
            Mode::Normal => match self.exchange.poll(&mut self.bus, &mut self.state) {
                Some(_) => self.dispatcher.poll(&mut self.serial, &mut self.state),
                None => return Dispatch::Idle,
            },
            Mode::ReportOnly => {
                let channel = self.next_channel;
                let value = self
                    .sampler
                    .sample(&mut self.bus, &mut self.delay, channel);
                self.state.accel.set(channel, value);
                self.next_channel = channel.other();
                self.dispatcher.poll(&mut self.serial, &mut self.state)
            }
        };

        if outcome == Dispatch::EnterReportMode {
            self.enter_report_mode();
        }
        outcome
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    #[inline]
    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    #[inline]
    pub fn accel(&self) -> AccelReading {
        self.state.accel
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Init high, master role, with the settle time the sensors need on both sides.
    fn claim_bus_for_sensors(&mut self) {
        self.accel_init.assert();
        self.delay.delay_us(self.timing.role_switch_us);
        self.bus.configure(BusRole::Master);
        self.delay.delay_us(self.timing.role_switch_us);
    }
}
