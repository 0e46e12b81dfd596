//! Command table
//!
//! Fixed-capacity, append-only registry of command names and their handlers.
//! Lookup runs in registration order and the first exact match wins, so a
//! name registered twice only ever reaches its first handler.

use heapless::Vec;

use crate::args::Arguments;
use crate::status::Outcome;

/// Errors reported when setting up the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegisterError {
    /// Every slot of the table is in use
    TableFull,
}

/// Reaction to a recognized command
///
/// Implemented for every `FnMut(&mut Arguments) -> Outcome`, which covers
/// plain functions ([`Action`]), closures and `&mut dyn FnMut` references.
/// `&mut dyn Handler` lets handlers of different types share one table.
pub trait Handler<const CAP: usize> {
    /// Run the command, decoding arguments from `args`
    ///
    /// Returning [`Outcome::Busy`] keeps the command selected and the handler
    /// is called again on the next parser step.
    fn handle(&mut self, args: &mut Arguments<'_, CAP>) -> Outcome;
}

impl<F, const CAP: usize> Handler<CAP> for F
where
    F: FnMut(&mut Arguments<'_, CAP>) -> Outcome,
{
    fn handle(&mut self, args: &mut Arguments<'_, CAP>) -> Outcome {
        self(args)
    }
}

impl<const CAP: usize> Handler<CAP> for &mut (dyn Handler<CAP> + '_) {
    fn handle(&mut self, args: &mut Arguments<'_, CAP>) -> Outcome {
        (**self).handle(args)
    }
}

/// Plain function handler
pub type Action<const CAP: usize> = fn(&mut Arguments<'_, CAP>) -> Outcome;

/// A registered command
#[derive(Debug, Clone)]
pub struct Command<H> {
    name: &'static str,
    handler: H,
}

impl<H> Command<H> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

/// Ordered registry of up to `N` commands
#[derive(Debug, Clone)]
pub struct CommandTable<H, const N: usize> {
    commands: Vec<Command<H>, N>,
}

impl<H, const N: usize> Default for CommandTable<H, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, const N: usize> CommandTable<H, N> {
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command
    ///
    /// Names are not de-duplicated.
    pub fn register(&mut self, name: &'static str, handler: H) -> Result<(), RegisterError> {
        self.commands
            .push(Command { name, handler })
            .map_err(|_| RegisterError::TableFull)
    }

    /// Index of the first command whose name equals `name` exactly
    pub fn find(&self, name: &[u8]) -> Option<usize> {
        self.commands
            .iter()
            .position(|command| command.name.as_bytes() == name)
    }

    pub fn get(&self, index: usize) -> Option<&Command<H>> {
        self.commands.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Command<H>> {
        self.commands.get_mut(index)
    }

    /// Registered names in match order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|command| command.name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.commands.is_full()
    }
}
