//! Console commands
//!
//! | Command              | Arguments      | Effect                           |
//! |----------------------|----------------|----------------------------------|
//! | `ping`               | none           | acknowledges                     |
//! | `led <bool>`         | on/off         | switches the board LED           |
//! | `add <int>,<int>`    | two integers   | logs the sum, `:ERR` on overflow |
//! | `wait <ms>`          | duration       | acknowledges after `ms` elapsed  |

use cmdlink_protocol::{Arguments, CommandParser, Outcome, ProtocolConfig, RegisterError};
use defmt::*;
use embassy_time::{Duration, Instant};
use portable_atomic::{AtomicU64, Ordering};

use crate::channels::LED_CMD;

/// Message capacity in bytes
pub const MESSAGE_SIZE: usize = 32;

/// Number of command slots
pub const COMMAND_COUNT: usize = 8;

/// Empty polls tolerated inside a frame (see `POLL_INTERVAL` in the task)
pub const STALL_STEPS: u32 = 200;

pub type Console = CommandParser<MESSAGE_SIZE, COMMAND_COUNT>;

/// Deadline of a running `wait`, in ticks; zero when idle
static WAIT_UNTIL: AtomicU64 = AtomicU64::new(0);

/// Create the console parser with every command registered
pub fn console() -> Result<Console, RegisterError> {
    let mut parser = Console::with_config(ProtocolConfig::DEFAULT.with_stall_limit(STALL_STEPS));
    parser.register("ping", ping)?;
    parser.register("led", led)?;
    parser.register("add", add)?;
    parser.register("wait", wait)?;
    Ok(parser)
}

fn ping(args: &mut Arguments<'_, MESSAGE_SIZE>) -> Outcome {
    args.is_valid().into()
}

fn led(args: &mut Arguments<'_, MESSAGE_SIZE>) -> Outcome {
    let on = args.parse_bool();
    if !args.is_valid() {
        return Outcome::Format;
    }
    LED_CMD.signal(on);
    Outcome::Finished
}

fn add(args: &mut Arguments<'_, MESSAGE_SIZE>) -> Outcome {
    let a = args.parse_int();
    let b = args.parse_int();
    if !args.is_valid() {
        return Outcome::Format;
    }
    match a.checked_add(b) {
        Some(sum) => {
            info!("add: {} + {} = {}", a, b, sum);
            Outcome::Finished
        }
        None => {
            warn!("add: {} + {} overflows", a, b);
            Outcome::Error
        }
    }
}

/// Long-running command: stays busy until the requested time has passed
fn wait(args: &mut Arguments<'_, MESSAGE_SIZE>) -> Outcome {
    let deadline = WAIT_UNTIL.load(Ordering::Relaxed);

    if deadline == 0 {
        let ms = args.parse_int();
        if !args.is_valid() || ms < 0 {
            return Outcome::Format;
        }
        let until = Instant::now() + Duration::from_millis(ms as u64);
        // Zero marks "idle"; a deadline of tick 0 cannot occur after boot
        WAIT_UNTIL.store(until.as_ticks().max(1), Ordering::Relaxed);
        return Outcome::Busy;
    }

    if Instant::now().as_ticks() < deadline {
        return Outcome::Busy;
    }

    WAIT_UNTIL.store(0, Ordering::Relaxed);
    Outcome::Finished
}
