// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{self, Serial},
};
use stm32f7xx_hal as hal;

use armbridge::{
    config::Config,
    controller::{ControlPins, Controller},
    hw::{pins::BoardPins, SpiBus, SysDelay, Usart},
};

#[entry]
fn main() -> ! {
    // Peripherals
    let (Some(dp), Some(cp)) = (pac::Peripherals::take(), cortex_m::Peripherals::take()) else {
        defmt::panic!("peripherals already taken");
    };

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();

    // GPIO
    let pins = BoardPins::new(dp.GPIOA, dp.GPIOD, dp.GPIOE);

    // USART1 (host link)
    let usart_cfg = serial::Config {
        baud_rate: 115_200.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let usart = Usart::new(serial);

    // SPI4 (accelerometers as master, FPGA as slave)
    let spi_bus = SpiBus::new(dp.SPI4, pins.spi4);

    // SysTick delay
    let delay = SysDelay::new(cp.SYST, clocks.sysclk().raw());

    let control = ControlPins {
        cs_rear: pins.accel.cs_rear,
        cs_front: pins.accel.cs_front,
        accel_init: pins.accel.init,
        fpga_enable: pins.fpga.enable,
        fpga_command: pins.fpga.command,
        fpga_ready: pins.fpga.ready,
    };

    let mut bridge = Controller::new(usart, spi_bus, delay, control, Config::default());
    let mode = bridge.power_on();
    defmt::info!("entering main loop in {}", mode);

    bridge.run()
}
