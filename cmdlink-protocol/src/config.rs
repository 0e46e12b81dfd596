//! Protocol grammar and parser policy
//!
//! The framing bytes and response tokens are plain data so that a deployment
//! can change the grammar without touching the state machine.

/// Default message capacity in bytes (frame delimiters excluded)
pub const DEFAULT_MESSAGE_SIZE: usize = 32;

/// Default number of commands that can be registered
pub const DEFAULT_COMMAND_COUNT: usize = 16;

/// Preferred size of a status line buffer, terminator included
pub const INFO_SIZE: usize = 16;

/// Bytes that delimit a frame and its fields
///
/// Wire format:
/// ```text
/// <SOF><command> <arg1>,<arg2>,...,<argN><EOF>
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Framing {
    /// Start of frame
    pub sof: u8,
    /// End of frame
    pub eof: u8,
    /// Command/argument separator
    pub cas: u8,
    /// Argument/argument separator
    pub aas: u8,
}

impl Framing {
    pub const DEFAULT: Self = Self {
        sof: b'$',
        eof: b'\r',
        cas: b' ',
        aas: b',',
    };

    /// Returns true if `byte` may precede an argument
    pub fn is_separator(&self, byte: u8) -> bool {
        byte == self.cas || byte == self.aas
    }
}

impl Default for Framing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tokens used to build the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseTokens {
    /// Acknowledge
    pub ack: &'static str,
    /// Error
    pub err: &'static str,
    /// Unknown command
    pub cmd: &'static str,
    /// Buffer overflow
    pub ovf: &'static str,
    /// Format error
    pub fmt: &'static str,
}

impl ResponseTokens {
    pub const DEFAULT: Self = Self {
        ack: "ACK",
        err: "ERR",
        cmd: "CMD",
        ovf: "OVF",
        fmt: "FMT",
    };
}

impl Default for ResponseTokens {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete parser configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolConfig {
    /// Frame grammar
    pub framing: Framing,
    /// Status line tokens
    pub tokens: ResponseTokens,
    /// Number of consecutive empty reads tolerated inside a frame
    ///
    /// `None` keeps an unterminated frame open indefinitely. With `Some(n)`,
    /// the frame is abandoned with a format error after `n` steps in which
    /// the byte source had nothing to offer.
    pub stall_limit: Option<u32>,
}

impl ProtocolConfig {
    pub const DEFAULT: Self = Self {
        framing: Framing::DEFAULT,
        tokens: ResponseTokens::DEFAULT,
        stall_limit: None,
    };

    /// Same configuration with a stall limit
    pub const fn with_stall_limit(mut self, steps: u32) -> Self {
        self.stall_limit = Some(steps);
        self
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
