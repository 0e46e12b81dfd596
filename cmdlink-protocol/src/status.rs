//! Parser status, handler outcomes and the status line
//!
//! Status line format:
//! ```text
//! :ACK | :ERR | :ERR:CMD | :ERR:OVF | :ERR:FMT:<offset>
//! ```

use core::fmt::{self, Write};

use crate::config::ResponseTokens;

/// Outcome of the most recent parser step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Synchronizing on start of frame
    Syn,
    /// A frame is being received or executed
    Busy,
    /// Frame received and command executed
    Ack,
    /// Command ran but reported a failure
    Err,
    /// Unknown command
    Cmd,
    /// Buffer overflow, frame lost
    Ovf,
    /// Invalid frame or argument format
    Fmt,
}

impl Status {
    /// Returns true for the error outcomes
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Err | Status::Cmd | Status::Ovf | Status::Fmt)
    }

    /// Returns true while no frame is in progress
    pub fn is_idle(&self) -> bool {
        !matches!(self, Status::Busy)
    }

    /// Returns true if the status produces a status line
    pub fn has_response(&self) -> bool {
        !matches!(self, Status::Syn | Status::Busy)
    }

    /// Write the status line for this status
    ///
    /// `offset` is only used by [`Status::Fmt`]. Nothing is written for
    /// [`Status::Syn`] and [`Status::Busy`].
    pub fn write_response<W: Write>(
        &self,
        tokens: &ResponseTokens,
        offset: usize,
        out: &mut W,
    ) -> fmt::Result {
        match self {
            Status::Ack => write!(out, ":{}", tokens.ack),
            Status::Err => write!(out, ":{}", tokens.err),
            Status::Cmd => write!(out, ":{}:{}", tokens.err, tokens.cmd),
            Status::Ovf => write!(out, ":{}:{}", tokens.err, tokens.ovf),
            Status::Fmt => write!(out, ":{}:{}:{}", tokens.err, tokens.fmt, offset),
            Status::Syn | Status::Busy => Ok(()),
        }
    }
}

/// Value returned by a command handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Command finished successfully
    Finished,
    /// Command needs another step; the handler is invoked again
    Busy,
    /// Command failed for a reason unrelated to the message format
    Error,
    /// Arguments were malformed, missing or in excess
    Format,
}

// Numeric handler codes
pub const CODE_FINISHED: i8 = 1;
pub const CODE_BUSY: i8 = 0;
pub const CODE_ERROR: i8 = -1;
pub const CODE_FORMAT: i8 = -2;

impl Outcome {
    /// Interpret a numeric handler code
    ///
    /// Any positive code means finished; codes below `-1` other than the
    /// format code are treated as a format error as well.
    pub fn from_code(code: i8) -> Self {
        match code {
            c if c >= CODE_FINISHED => Outcome::Finished,
            CODE_BUSY => Outcome::Busy,
            CODE_ERROR => Outcome::Error,
            _ => Outcome::Format,
        }
    }

    pub fn to_code(self) -> i8 {
        match self {
            Outcome::Finished => CODE_FINISHED,
            Outcome::Busy => CODE_BUSY,
            Outcome::Error => CODE_ERROR,
            Outcome::Format => CODE_FORMAT,
        }
    }

    /// Final status of a frame whose handler returned this outcome
    ///
    /// `None` while the handler is still busy.
    pub fn status(self) -> Option<Status> {
        match self {
            Outcome::Finished => Some(Status::Ack),
            Outcome::Busy => None,
            Outcome::Error => Some(Status::Err),
            Outcome::Format => Some(Status::Fmt),
        }
    }
}

impl From<i8> for Outcome {
    fn from(code: i8) -> Self {
        Outcome::from_code(code)
    }
}

impl From<bool> for Outcome {
    /// `true` finishes the command, `false` reports a format error
    fn from(valid: bool) -> Self {
        if valid {
            Outcome::Finished
        } else {
            Outcome::Format
        }
    }
}
