//! Signals between command handlers and tasks
//!
//! Handlers run synchronously inside the parser step, so they only post
//! requests here and never await.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Requested LED level (true = on)
pub static LED_CMD: Signal<CriticalSectionRawMutex, bool> = Signal::new();
