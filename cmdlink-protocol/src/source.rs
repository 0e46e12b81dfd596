//! Byte sources
//!
//! The parser pulls at most one byte per step and never waits for one. A
//! source answers `None` when nothing is available right now.

use heapless::Deque;

/// Non-blocking supplier of input bytes
pub trait ByteSource {
    /// Next available byte, or `None` if no data is pending
    fn read_byte(&mut self) -> Option<u8>;
}

impl<F> ByteSource for F
where
    F: FnMut() -> Option<u8>,
{
    fn read_byte(&mut self) -> Option<u8> {
        self()
    }
}

/// Ring buffer filled by a receive interrupt or task
impl<const N: usize> ByteSource for Deque<u8, N> {
    fn read_byte(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

/// Adapter for `embedded-io` transports
///
/// Only reads when the transport reports pending data, so a step never
/// blocks. Read errors are counted and reported as "no data".
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    errors: u32,
}

impl<R> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, errors: 0 }
    }

    /// Number of read errors swallowed so far
    pub fn error_count(&self) -> u32 {
        self.errors
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> ByteSource for IoSource<R>
where
    R: embedded_io::Read + embedded_io::ReadReady,
{
    fn read_byte(&mut self) -> Option<u8> {
        match self.inner.read_ready() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(_) => {
                self.errors = self.errors.saturating_add(1);
                return None;
            }
        }

        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            Ok(_) => None,
            Err(_) => {
                self.errors = self.errors.saturating_add(1);
                None
            }
        }
    }
}
