//! Command parser state machine
//!
//! One call to [`CommandParser::process`] advances the machine by one step
//! and pulls at most one byte from the byte source:
//!
//! ```text
//!  START ──SOF──▶ FETCH ──EOF──▶ DECODE ──match──▶ EXECUTE ──done──▶ START
//!    ▲              │                │                │  ▲
//!    │   OVF / FMT  │     CMD        │                └──┘ busy
//!    └──────────────┴────────────────┘
//! ```
//!
//! Every error is recovered locally: the machine returns to START and waits
//! for the next start of frame.

use core::fmt::{self, Write};

use heapless::String;

use crate::args::Arguments;
use crate::config::{ProtocolConfig, DEFAULT_COMMAND_COUNT, DEFAULT_MESSAGE_SIZE, INFO_SIZE};
use crate::message::{Fetch, Message};
use crate::source::ByteSource;
use crate::status::Status;
use crate::table::{Action, CommandTable, Handler, RegisterError};

/// Parser states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Waiting for start of frame
    Start,
    /// Receiving the message body
    Fetch,
    /// Looking up the command name
    Decode,
    /// Running the command handler
    Execute,
}

/// Line-oriented command parser
///
/// `CAP` is the message capacity in bytes, `N` the number of commands that
/// can be registered and `H` the handler type shared by all commands.
#[derive(Debug)]
pub struct CommandParser<
    const CAP: usize = DEFAULT_MESSAGE_SIZE,
    const N: usize = DEFAULT_COMMAND_COUNT,
    H = Action<CAP>,
> {
    config: ProtocolConfig,
    state: State,
    status: Status,
    message: Message<CAP>,
    commands: CommandTable<H, N>,
    selected: Option<usize>,
    arg_format_error: bool,
    idle_steps: u32,
}

impl<const CAP: usize, const N: usize, H> Default for CommandParser<CAP, N, H>
where
    H: Handler<CAP>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize, const N: usize, H> CommandParser<CAP, N, H>
where
    H: Handler<CAP>,
{
    /// Create a parser with the default grammar
    pub const fn new() -> Self {
        Self::with_config(ProtocolConfig::DEFAULT)
    }

    /// Create a parser with a custom grammar or stall policy
    pub const fn with_config(config: ProtocolConfig) -> Self {
        Self {
            config,
            state: State::Start,
            status: Status::Syn,
            message: Message::new(),
            commands: CommandTable::new(),
            selected: None,
            arg_format_error: false,
            idle_steps: 0,
        }
    }

    /// Register a command
    ///
    /// Fails once all `N` slots are taken. Names are matched exactly and in
    /// registration order.
    pub fn register(&mut self, name: &'static str, handler: H) -> Result<(), RegisterError> {
        self.commands.register(name, handler)
    }

    /// Advance the state machine by one step and return the current status
    ///
    /// Call this repeatedly from the main loop. A step never blocks: when the
    /// source has no byte the step does nothing.
    pub fn process<S>(&mut self, source: &mut S) -> Status
    where
        S: ByteSource + ?Sized,
    {
        match self.state {
            State::Start => {
                self.status = Status::Syn;
                if source.read_byte() == Some(self.config.framing.sof) {
                    self.begin_frame();
                }
            }
            State::Fetch => match source.read_byte() {
                Some(byte) => {
                    self.idle_steps = 0;
                    self.fetch(byte);
                }
                None => self.stall(),
            },
            State::Decode => self.decode(),
            State::Execute => self.execute(),
        }

        self.status
    }

    /// Returns true if the arguments consumed so far are well-formed
    ///
    /// Always true outside of command execution. While a handler runs, true
    /// only if no decoder has flagged a format error and the cursor sits
    /// exactly at the end of the message.
    pub fn is_valid(&self) -> bool {
        if self.state != State::Execute {
            return true;
        }
        !self.arg_format_error && self.message.remaining() == 0
    }

    /// Status line for the current status, if it has one
    pub fn info(&self) -> Option<String<INFO_SIZE>> {
        if !self.status.has_response() {
            return None;
        }
        let mut line = String::new();
        self.write_info(&mut line).ok()?;
        Some(line)
    }

    /// Write the status line for the current status
    pub fn write_info<W: Write>(&self, out: &mut W) -> fmt::Result {
        self.status
            .write_response(&self.config.tokens, self.message.offset(), out)
    }

    /// Copy the status line into `buffer` as a NUL-terminated string
    ///
    /// Returns true if the status has a line and it fits, terminator
    /// included. Nothing usable is left in `buffer` otherwise.
    pub fn has_info(&self, buffer: &mut [u8]) -> bool {
        if !self.status.has_response() {
            if let Some(first) = buffer.first_mut() {
                *first = 0;
            }
            return false;
        }

        let mut writer = TerminatedWriter { buffer, len: 0 };
        let fits = self.write_info(&mut writer).is_ok() && writer.len > 0;
        writer.terminate(fits);
        fits
    }

    /// Abandon any frame in progress and wait for the next start of frame
    pub fn reset(&mut self) {
        self.message.reset();
        self.restart(Status::Syn);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// The message being received or executed
    pub fn message(&self) -> &Message<CAP> {
        &self.message
    }

    pub fn commands(&self) -> &CommandTable<H, N> {
        &self.commands
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Name of the command currently executing
    pub fn selected_command(&self) -> Option<&'static str> {
        let index = self.selected?;
        self.commands.get(index).map(|command| command.name())
    }

    fn begin_frame(&mut self) {
        self.message.reset();
        self.arg_format_error = false;
        self.selected = None;
        self.idle_steps = 0;
        self.state = State::Fetch;
        self.status = Status::Busy;

        #[cfg(feature = "defmt")]
        defmt::trace!("frame start");
    }

    fn fetch(&mut self, byte: u8) {
        match self.message.fetch(byte, &self.config.framing) {
            Fetch::Pending => {}
            Fetch::Complete => self.state = State::Decode,
            Fetch::Overflow => {
                #[cfg(feature = "defmt")]
                defmt::warn!("frame overflow at {} bytes", self.message.len());

                self.restart(Status::Ovf);
            }
            Fetch::Empty => {
                #[cfg(feature = "defmt")]
                defmt::warn!("empty frame");

                self.restart(Status::Fmt);
            }
        }
    }

    fn stall(&mut self) {
        let Some(limit) = self.config.stall_limit else {
            return;
        };

        self.idle_steps = self.idle_steps.saturating_add(1);
        if self.idle_steps >= limit {
            #[cfg(feature = "defmt")]
            defmt::warn!("frame stalled after {} bytes", self.message.len());

            self.restart(Status::Fmt);
        }
    }

    fn decode(&mut self) {
        match self.commands.find(self.message.name_region()) {
            Some(index) => {
                self.selected = Some(index);
                self.state = State::Execute;

                #[cfg(feature = "defmt")]
                defmt::debug!("command {} selected", index);
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("unknown command: {=[u8]:a}", self.message.name_region());

                self.restart(Status::Cmd);
            }
        }
    }

    fn execute(&mut self) {
        // Without a selected command the machine is inconsistent; resync
        let Some(index) = self.selected else {
            self.restart(Status::Syn);
            return;
        };
        let Some(command) = self.commands.get_mut(index) else {
            self.restart(Status::Syn);
            return;
        };

        let mut args = Arguments::new(
            &mut self.message,
            &mut self.arg_format_error,
            &self.config.framing,
        );
        let outcome = command.handler_mut().handle(&mut args);

        if let Some(status) = outcome.status() {
            #[cfg(feature = "defmt")]
            defmt::debug!("command finished: {}", outcome);

            self.restart(status);
        }
    }

    fn restart(&mut self, status: Status) {
        self.state = State::Start;
        self.status = status;
        self.selected = None;
    }
}

/// `fmt::Write` over a byte slice that keeps one byte for the terminator
struct TerminatedWriter<'a> {
    buffer: &'a mut [u8],
    len: usize,
}

impl TerminatedWriter<'_> {
    fn terminate(self, keep: bool) {
        let end = if keep { self.len } else { 0 };
        if let Some(byte) = self.buffer.get_mut(end) {
            *byte = 0;
        }
    }
}

impl Write for TerminatedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.len + bytes.len();
        // Keep room for the terminator
        if end >= self.buffer.len() {
            return Err(fmt::Error);
        }
        self.buffer[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}
