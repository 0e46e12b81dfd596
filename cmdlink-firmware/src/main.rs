//! Serial command console firmware
//!
//! Listens on UART0 (GPIO0 TX, GPIO1 RX, 115200 baud) for frames such as
//! `$led on\r` and answers every completed frame with a status line such as
//! `:ACK\r\n`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

mod channels;
mod commands;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 128]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("cmdlink firmware starting...");

    let p = embassy_rp::init(Default::default());

    let uart_config = UartConfig::default(); // 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 128]);
    let rx_buf = RX_BUF.init([0u8; 128]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized");

    let led = Output::new(p.PIN_25, Level::Low);

    spawner.spawn(tasks::led_task(led)).unwrap();
    spawner.spawn(tasks::command_task(rx, tx)).unwrap();

    info!("All tasks spawned");
}
