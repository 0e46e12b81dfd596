//! Line-oriented ASCII command protocol
//!
//! This crate implements a byte-at-a-time command parser for devices that
//! receive text commands over a serial link. It uses fixed-size buffers only,
//! never blocks and never allocates.
//!
//! # Wire Format
//!
//! ```text
//! <SOF><command> <arg1>,<arg2>,...,<argN><EOF>      e.g. "$led 1\r"
//! ```
//!
//! Defaults: SOF `$`, EOF `\r`, command/argument separator ` `,
//! argument/argument separator `,`. Integers accept a `-` sign and `0b`/`0x`
//! prefixes, booleans accept `0/1`, `off/on`, `low/high`, `false/true`.
//!
//! Each completed frame yields one status line:
//!
//! ```text
//! :ACK | :ERR | :ERR:CMD | :ERR:OVF | :ERR:FMT:<offset>
//! ```
//!
//! # Usage
//!
//! ```
//! use cmdlink_protocol::{Arguments, CommandParser, Outcome, Status};
//!
//! fn led(args: &mut Arguments<'_, 32>) -> Outcome {
//!     let _on = args.parse_bool();
//!     args.is_valid().into()
//! }
//!
//! let mut parser: CommandParser = CommandParser::new();
//! parser.register("led", led).unwrap();
//!
//! let mut rx = b"$led on\r".iter().copied();
//! let mut source = || rx.next();
//! while parser.process(&mut source) != Status::Ack {}
//! assert_eq!(parser.info().unwrap().as_str(), ":ACK");
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod args;
pub mod chars;
pub mod config;
pub mod message;
pub mod parser;
pub mod source;
pub mod status;
pub mod table;

pub use args::Arguments;
pub use config::{
    Framing, ProtocolConfig, ResponseTokens, DEFAULT_COMMAND_COUNT, DEFAULT_MESSAGE_SIZE,
    INFO_SIZE,
};
pub use message::Message;
pub use parser::{CommandParser, State};
pub use source::{ByteSource, IoSource};
pub use status::{Outcome, Status};
pub use table::{Action, CommandTable, Handler, RegisterError};
