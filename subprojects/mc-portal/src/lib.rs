//! MC portal transport
//!
//! An MC portal is a 64-byte mailbox shared with the Management Complex
//! firmware. This crate drives one synchronous exchange at a time through it:
//!
//! 1. write the command params into the portal,
//! 2. write the header word, which rings the doorbell,
//! 3. poll the header until the firmware replaces the `Ready` status,
//! 4. read the whole response back into the caller's [`Command`].
//!
//! # Exclusivity
//!
//! A portal has no notion of interleaved commands: a response belongs to
//! whichever request was written last. [`Portal::submit`] takes `&mut self`,
//! and [`McIo`] wraps a portal in a lock held for the entire exchange so it
//! can be shared between threads. Distinct portals are independent.
//!
//! # Timeouts
//!
//! The poll is bounded by a [`PollConfig`]. A timeout means the outcome at the
//! firmware is unknown: the command may or may not have taken effect. This
//! crate never retries.
//!
//! [`Command`]: mc_cmd::Command

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod io;
mod poll;
mod portal;
mod region;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

#[cfg(any(test, feature = "std"))]
pub use self::poll::{SpinWait, ThreadSleep};
pub use self::{
    io::{McIo, Transport},
    poll::{DEFAULT_INTERVAL, DEFAULT_TIMEOUT, NoWait, PollConfig, PollConfigBuilder, Wait},
    portal::{Portal, SendError},
    region::{MmioPortal, PORTAL_SIZE, PortalRegion},
};
