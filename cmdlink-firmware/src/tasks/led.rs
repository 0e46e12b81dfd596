//! LED output task

use defmt::*;
use embassy_rp::gpio::{Level, Output};

use crate::channels::LED_CMD;

/// Applies LED requests posted by the `led` command
#[embassy_executor::task]
pub async fn led_task(mut led: Output<'static>) {
    info!("LED task started");

    loop {
        let on = LED_CMD.wait().await;
        trace!("LED {}", on);
        led.set_level(if on { Level::High } else { Level::Low });
    }
}
