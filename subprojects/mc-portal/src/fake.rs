//! In-memory firmware for tests.
//!
//! [`FakeFirmware`] is a [`PortalRegion`] that answers each doorbell by
//! running a handler over the submitted command, optionally after a number of
//! header reads. Every access is recorded in a shared [`Journal`] that stays
//! readable after the fake has been moved into a [`Portal`] or [`McIo`].

use std::{
    boxed::Box,
    fmt,
    sync::{Arc, Mutex, MutexGuard},
    vec::Vec,
};

use mc_cmd::{Command, McStatus, NUM_PARAMS, Token, field, header};

use crate::{
    io::McIo,
    poll::{NoWait, PollConfig},
    portal::Portal,
    region::PortalRegion,
};

/// Handler run by the fake firmware on each command.
///
/// It must replace the `Ready` status of the header for the command to
/// complete.
pub type Handler = Box<dyn FnMut(&mut Command) + Send>;

/// A fake MC portal.
pub struct FakeFirmware {
    buffer: Command,
    handler: Handler,
    latency: Option<u32>,
    pending: Option<u32>,
    journal: Journal,
}

impl FakeFirmware {
    /// Creates a fake that completes each command on the first header read.
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&mut Command) + Send + 'static,
    {
        Self {
            buffer: Command::default(),
            handler: Box::new(handler),
            latency: Some(0),
            pending: None,
            journal: Journal::default(),
        }
    }

    /// Creates a fake that never completes any command.
    pub fn never_ready() -> Self {
        Self {
            latency: None,
            ..Self::new(|_| {})
        }
    }

    /// Delays completion until `reads` header reads have reported `Ready`.
    pub fn with_latency(mut self, reads: u32) -> Self {
        self.latency = Some(reads);
        self
    }

    /// Returns a handle to the access journal.
    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Wraps the fake in a shareable [`McIo`] that polls without waiting.
    pub fn into_io(self) -> McIo<FakeFirmware, NoWait> {
        McIo::new(Portal::new(self, NoWait, PollConfig::default()))
    }
}

impl fmt::Debug for FakeFirmware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeFirmware")
            .field("buffer", &self.buffer)
            .field("latency", &self.latency)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl PortalRegion for FakeFirmware {
    fn write_param(&mut self, index: usize, value: u64) {
        self.journal.lock().events.push(Event::WriteParam(index));
        self.buffer.params[index] = value;
    }

    fn write_header(&mut self, value: u64) {
        self.buffer.header = value;
        self.pending = self.latency;

        let mut journal = self.journal.lock();
        journal.events.push(Event::Doorbell);
        journal.doorbells.push(self.buffer);
    }

    fn read_header(&mut self) -> u64 {
        {
            let mut journal = self.journal.lock();
            journal.events.push(Event::ReadHeader);
            journal.header_reads += 1;
        }

        match self.pending {
            Some(0) => {
                self.pending = None;
                (self.handler)(&mut self.buffer);
            }
            Some(remaining) => self.pending = Some(remaining - 1),
            None => {}
        }
        self.buffer.header
    }

    fn read_param(&mut self, index: usize) -> u64 {
        self.journal.lock().events.push(Event::ReadParam(index));
        self.buffer.params[index]
    }
}

/// One access to the fake portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    WriteParam(usize),
    Doorbell,
    ReadHeader,
    ReadParam(usize),
}

/// Shared record of the accesses made to a [`FakeFirmware`].
#[derive(Debug, Clone, Default)]
pub struct Journal {
    inner: Arc<Mutex<JournalState>>,
}

#[derive(Debug, Default)]
struct JournalState {
    events: Vec<Event>,
    doorbells: Vec<Command>,
    header_reads: u32,
}

impl Journal {
    fn lock(&self) -> MutexGuard<'_, JournalState> {
        // A panicking handler must not hide the journal from the test.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// All accesses, in order.
    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    /// The command buffer as seen by the firmware at each doorbell.
    pub fn doorbells(&self) -> Vec<Command> {
        self.lock().doorbells.clone()
    }

    /// The last command submitted, if any.
    pub fn last_request(&self) -> Option<Command> {
        self.lock().doorbells.last().copied()
    }

    /// Number of header reads so far.
    pub fn header_reads(&self) -> u32 {
        self.lock().header_reads
    }

    /// Returns `true` if every exchange ran start to finish without another
    /// exchange's accesses in between.
    ///
    /// A complete exchange is all param writes, the doorbell, one or more
    /// header reads and all param reads. An exchange that timed out has no
    /// param reads.
    pub fn exchanges_serialized(&self) -> bool {
        let events = self.lock().events.clone();
        let mut rest = events.as_slice();

        while !rest.is_empty() {
            for index in 0..NUM_PARAMS {
                match rest.split_first() {
                    Some((Event::WriteParam(i), tail)) if *i == index => rest = tail,
                    _ => return false,
                }
            }
            match rest.split_first() {
                Some((Event::Doorbell, tail)) => rest = tail,
                _ => return false,
            }
            let reads = rest
                .iter()
                .take_while(|e| **e == Event::ReadHeader)
                .count();
            if reads == 0 {
                return false;
            }
            rest = &rest[reads..];

            if let Some(Event::ReadParam(_)) = rest.first() {
                for index in 0..NUM_PARAMS {
                    match rest.split_first() {
                        Some((Event::ReadParam(i), tail)) if *i == index => rest = tail,
                        _ => return false,
                    }
                }
            }
        }
        true
    }
}

/// Sets the status byte of a response header.
pub fn set_status(cmd: &mut Command, status: McStatus) {
    field::pack(
        &mut cmd.header,
        header::STATUS_OFFSET,
        header::STATUS_WIDTH,
        status.to_raw().into(),
    );
}

/// Sets the token of a response header.
pub fn set_token(cmd: &mut Command, token: Token) {
    field::pack(
        &mut cmd.header,
        header::TOKEN_OFFSET,
        header::TOKEN_WIDTH,
        token.to_raw().into(),
    );
}
