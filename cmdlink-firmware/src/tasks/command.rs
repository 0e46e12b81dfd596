//! Console task
//!
//! Moves received bytes into a ring buffer, steps the parser and writes the
//! status line of every completed frame back to the UART.

use cmdlink_protocol::{State, Status};
use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{with_timeout, Duration, Timer};
use embedded_io_async::{Read, Write};
use heapless::Deque;

use crate::commands;

/// Pending input bytes
const RX_QUEUE_SIZE: usize = 64;

/// Longest wait for input before stepping the parser with no data
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Console task - parses commands and answers with status lines
#[embassy_executor::task]
pub async fn command_task(mut rx: BufferedUartRx, mut tx: BufferedUartTx) {
    info!("Command task started");

    let mut parser = match commands::console() {
        Ok(parser) => parser,
        Err(e) => {
            error!("Failed to register commands: {:?}", e);
            return;
        }
    };
    info!("{} commands registered", parser.command_count());

    let mut pending: Deque<u8, RX_QUEUE_SIZE> = Deque::new();
    let mut buf = [0u8; RX_QUEUE_SIZE];

    loop {
        // Only wait for input when the parser actually needs a byte
        let needs_input = matches!(parser.state(), State::Start | State::Fetch);
        if pending.is_empty() && needs_input {
            match with_timeout(POLL_INTERVAL, rx.read(&mut buf)).await {
                Ok(Ok(n)) => {
                    trace!("RX: {} bytes", n);
                    for &byte in &buf[..n] {
                        if pending.push_back(byte).is_err() {
                            warn!("RX queue full, dropping byte");
                        }
                    }
                }
                Ok(Err(e)) => {
                    warn!("UART read error: {:?}", e);
                    // Counts as one idle interval, like a timeout
                    Timer::after(POLL_INTERVAL).await;
                }
                Err(_) => {
                    // No data this interval; the step below counts it as idle
                }
            }
        }

        let status = parser.process(&mut pending);

        if let Some(line) = parser.info() {
            debug!("{} -> {}", status, line.as_str());
            if let Err(e) = tx.write_all(line.as_bytes()).await {
                warn!("Failed to send status: {:?}", e);
            }
            if let Err(e) = tx.write_all(b"\r\n").await {
                warn!("Failed to send status: {:?}", e);
            }
        }

        if status == Status::Busy && parser.state() == State::Execute {
            // Poll a long command at the input rate instead of spinning
            Timer::after(POLL_INTERVAL).await;
        }
    }
}
