//! Message buffer and framing
//!
//! Accumulates the bytes of one frame between SOF and EOF and provides the
//! read cursor used first to delimit the command name and later to walk the
//! argument list. All cursor movement is checked against the received length,
//! so `offset <= len() <= CAP` always holds.

use heapless::Vec;

use crate::config::Framing;

/// Result of feeding one byte to the message buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fetch {
    /// Byte stored, frame still open
    Pending,
    /// EOF received after at least one byte
    Complete,
    /// Buffer was already full; the frame is lost
    Overflow,
    /// EOF received with nothing in the buffer
    Empty,
}

/// One in-flight message and its read cursor
#[derive(Debug, Clone)]
pub struct Message<const CAP: usize> {
    data: Vec<u8, CAP>,
    offset: usize,
    separator_found: bool,
    name_end: usize,
}

impl<const CAP: usize> Default for Message<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> Message<CAP> {
    /// Create an empty message
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            offset: 0,
            separator_found: false,
            name_end: 0,
        }
    }

    /// Discard the content and rewind the cursor (start of frame)
    pub fn reset(&mut self) {
        self.data.clear();
        self.offset = 0;
        self.separator_found = false;
        self.name_end = 0;
    }

    /// Feed one byte received after SOF
    ///
    /// Until the command/argument separator is seen the cursor follows the
    /// length, so once the frame is complete it marks the end of the command
    /// name.
    pub fn fetch(&mut self, byte: u8, framing: &Framing) -> Fetch {
        if self.data.is_full() {
            return Fetch::Overflow;
        }

        if byte == framing.eof {
            if self.data.is_empty() {
                return Fetch::Empty;
            }
            self.name_end = self.offset;
            return Fetch::Complete;
        }

        if self.data.push(byte).is_err() {
            return Fetch::Overflow;
        }

        self.separator_found |= byte == framing.cas;
        if !self.separator_found {
            self.offset = self.data.len();
        }

        Fetch::Pending
    }

    /// Bytes received so far
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maximum number of bytes in one message
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Current cursor position
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes between the cursor and the end of the message
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Byte under the cursor
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Byte `n` positions after the cursor
    pub fn peek_ahead(&self, n: usize) -> Option<u8> {
        self.data.get(self.offset.checked_add(n)?).copied()
    }

    /// Move the cursor forward by one byte
    ///
    /// Returns false, leaving the cursor untouched, at the end of the message.
    pub fn advance(&mut self) -> bool {
        if self.offset < self.data.len() {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    /// Move the cursor forward by `n` bytes, or not at all
    pub fn advance_by(&mut self, n: usize) -> bool {
        match self.offset.checked_add(n) {
            Some(next) if next <= self.data.len() => {
                self.offset = next;
                true
            }
            _ => false,
        }
    }

    /// The command-name region, `[0, offset)` while the frame is decoded
    pub fn name_region(&self) -> &[u8] {
        &self.data[..self.offset]
    }

    /// Command name of a completed frame
    pub fn command_name(&self) -> &[u8] {
        &self.data[..self.name_end]
    }

    /// Everything after the command name, separator included
    pub fn arguments(&self) -> &[u8] {
        &self.data[self.name_end..]
    }

    /// Raw message content
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
