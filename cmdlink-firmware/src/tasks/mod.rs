//! Embassy tasks

mod command;
mod led;

pub use command::command_task;
pub use led::led_task;
