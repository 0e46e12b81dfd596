//! Argument decoding
//!
//! A handler receives [`Arguments`] while its command executes. Every decoder
//! is entered with the cursor on a separator (the command/argument separator
//! for the first argument, the argument/argument separator afterwards) and
//! leaves the cursor on the byte that ended the argument.
//!
//! Decoders never panic. A malformed argument sets a sticky format-error flag,
//! returns a neutral value (`0` or `false`) and leaves the cursor where
//! scanning stopped; that offset is what the status line reports.

use heapless::Vec;

use crate::chars::{to_lower, Radix};
use crate::config::Framing;
use crate::message::Message;

/// Longest boolean token (`false`)
pub const MAX_BOOL_LEN: usize = 5;

/// Argument decoding facet of the parser, valid for one handler invocation
#[derive(Debug)]
pub struct Arguments<'a, const CAP: usize> {
    message: &'a mut Message<CAP>,
    format_error: &'a mut bool,
    framing: &'a Framing,
}

impl<'a, const CAP: usize> Arguments<'a, CAP> {
    pub(crate) fn new(
        message: &'a mut Message<CAP>,
        format_error: &'a mut bool,
        framing: &'a Framing,
    ) -> Self {
        Self {
            message,
            format_error,
            framing,
        }
    }

    /// Name of the command being executed
    pub fn command_name(&self) -> &[u8] {
        self.message.command_name()
    }

    /// Argument list as received, leading separator included
    pub fn raw_arguments(&self) -> &[u8] {
        self.message.arguments()
    }

    /// Cursor position within the message
    pub fn offset(&self) -> usize {
        self.message.offset()
    }

    /// Number of bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.message.remaining()
    }

    /// Returns true if a decoder has flagged a format error
    pub fn has_format_error(&self) -> bool {
        *self.format_error
    }

    /// Returns true if every argument was consumed without a format error
    ///
    /// Call after reading the expected arguments: a missing argument has set
    /// the error flag, an extra one leaves bytes behind the cursor.
    pub fn is_valid(&self) -> bool {
        !*self.format_error && self.message.remaining() == 0
    }

    /// Decode the next argument as a signed 32-bit integer
    ///
    /// Accepts an optional `-` sign and an optional, case-insensitive `0b`
    /// or `0x` prefix; otherwise the value is decimal. A value outside the
    /// `i32` range is a format error.
    pub fn parse_int(&mut self) -> i32 {
        if !self.enter_argument() {
            return 0;
        }

        let negative = self.message.peek() == Some(b'-');
        if negative {
            self.message.advance();
        }

        let mut radix = Radix::Decimal;
        let mut digits = 0usize;

        if self.message.peek() == Some(b'0') {
            match self.message.peek_ahead(1).and_then(Radix::from_prefix) {
                Some(prefixed) => {
                    radix = prefixed;
                    self.message.advance_by(2);
                }
                None => {
                    // The leading zero is itself a decimal digit
                    self.message.advance();
                    digits = 1;
                }
            }
        }

        let limit = if negative {
            i32::MIN.unsigned_abs()
        } else {
            i32::MAX.unsigned_abs()
        };
        let base = radix.base();
        let mut magnitude: u32 = 0;

        while let Some(c) = self.message.peek() {
            if c == self.framing.aas {
                break;
            }

            let Some(digit) = radix.digit(c) else {
                return self.reject();
            };

            magnitude = match magnitude
                .checked_mul(base)
                .and_then(|m| m.checked_add(u32::from(digit)))
            {
                Some(m) if m <= limit => m,
                _ => return self.reject(),
            };

            self.message.advance();
            digits += 1;
        }

        if digits == 0 {
            return self.reject();
        }

        if negative {
            // Two's complement covers i32::MIN
            0i32.wrapping_sub_unsigned(magnitude)
        } else {
            magnitude as i32
        }
    }

    /// Decode the next argument as a boolean
    ///
    /// Case-insensitive tokens: `0`/`1`, `off`/`on`, `low`/`high`,
    /// `false`/`true`.
    pub fn parse_bool(&mut self) -> bool {
        if !self.enter_argument() {
            return false;
        }

        let mut token: Vec<u8, MAX_BOOL_LEN> = Vec::new();

        while let Some(c) = self.message.peek() {
            if c == self.framing.aas {
                break;
            }
            let copied = token.push(to_lower(c)).is_ok();
            self.message.advance();
            if !copied {
                // The byte that no longer fits is consumed
                *self.format_error = true;
                return false;
            }
        }

        match token.as_slice() {
            b"0" | b"off" | b"low" | b"false" => false,
            b"1" | b"on" | b"high" | b"true" => true,
            _ => {
                *self.format_error = true;
                false
            }
        }
    }

    /// Step over the separator in front of an argument
    ///
    /// Fails without moving the cursor if an error is already flagged, if the
    /// cursor is not on a separator, or if no value byte follows it.
    fn enter_argument(&mut self) -> bool {
        if *self.format_error {
            return false;
        }

        let on_separator = self
            .message
            .peek()
            .is_some_and(|c| self.framing.is_separator(c));

        if !on_separator || self.message.remaining() < 2 {
            *self.format_error = true;
            return false;
        }

        self.message.advance()
    }

    fn reject(&mut self) -> i32 {
        *self.format_error = true;
        0
    }
}
