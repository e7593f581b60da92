//! Shared access to a portal.

use mc_cmd::Command;
use spin::Mutex;

use crate::{
    poll::{PollConfig, Wait},
    portal::{Portal, SendError},
    region::PortalRegion,
};

/// Something that can run one MC command exchange.
///
/// Object operations are written against this trait so they work over any
/// portal and wait strategy.
pub trait Transport {
    /// Sends `cmd` and waits for its response, see [`Portal::submit`].
    fn send(&self, cmd: &mut Command) -> Result<(), SendError>;
}

/// A portal shared between threads.
///
/// Each [`McIo::send`] holds the portal lock from the first param write to the
/// last param read, so exchanges from different threads never interleave.
/// The lock is a spin lock: it is usable where sleeping is not, and the
/// critical section is bounded by the poll bound.
#[derive(Debug)]
pub struct McIo<R, W> {
    portal: Mutex<Portal<R, W>>,
}

impl<R, W> McIo<R, W>
where
    R: PortalRegion,
    W: Wait,
{
    /// Wraps a portal.
    pub fn new(portal: Portal<R, W>) -> Self {
        Self {
            portal: Mutex::new(portal),
        }
    }

    /// Creates a shared portal from its parts.
    pub fn from_parts(region: R, wait: W, config: PollConfig) -> Self {
        Self::new(Portal::new(region, wait, config))
    }

    /// Sends `cmd` and waits for its response, see [`Portal::submit`].
    pub fn send(&self, cmd: &mut Command) -> Result<(), SendError> {
        self.portal.lock().submit(cmd)
    }

    /// Replaces the poll bound used by later commands.
    pub fn set_config(&self, config: PollConfig) {
        self.portal.lock().set_config(config);
    }

    /// Returns the current poll bound.
    pub fn config(&self) -> PollConfig {
        *self.portal.lock().config()
    }

    /// Consumes the wrapper, returning the portal.
    pub fn into_inner(self) -> Portal<R, W> {
        self.portal.into_inner()
    }
}

impl<R, W> Transport for McIo<R, W>
where
    R: PortalRegion,
    W: Wait,
{
    #[inline]
    fn send(&self, cmd: &mut Command) -> Result<(), SendError> {
        McIo::send(self, cmd)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    #[inline]
    fn send(&self, cmd: &mut Command) -> Result<(), SendError> {
        (**self).send(cmd)
    }
}
