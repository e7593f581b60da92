//! DPIO (Data Path I/O) object API.
//!
//! A DPIO gives software access to a queue manager portal: it is the object
//! through which a core enqueues and dequeues frames and receives data
//! availability notifications. This crate only carries the MC management
//! commands of the object; the portal data path is not covered.
//!
//! ```ignore
//! let dpio = Dpio::open(&io, 1)?;
//! let attr = dpio.get_attributes()?;
//! dpio.enable()?;
//! dpio.close()?;
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

use mc_cmd::{CommandFlags, Token};
use mc_object::{CommandError, IrqControl, Object};
use mc_portal::Transport;

pub mod cmd;
mod proto;

pub use self::{
    cmd::GetAttributesError,
    proto::{CMD_CREATE, CMD_OPEN, ChannelMode, DpioAttributes, DpioConfig},
};

/// An open DPIO session.
#[derive(Debug)]
#[repr(transparent)]
pub struct Dpio<'a, T: ?Sized>(Object<'a, T>);

impl<'a, T> Dpio<'a, T>
where
    T: Transport + ?Sized,
{
    /// Opens a session to DPIO `dpio_id`.
    pub fn open(io: &'a T, dpio_id: u32) -> Result<Self, CommandError> {
        let token = cmd::open(io, CommandFlags::empty(), dpio_id)?;
        Ok(Self::from_token(io, token))
    }

    /// Creates a DPIO and opens a session to it.
    pub fn create(io: &'a T, cfg: &DpioConfig) -> Result<Self, CommandError> {
        let token = cmd::create(io, CommandFlags::empty(), cfg)?;
        Ok(Self::from_token(io, token))
    }

    /// Wraps a token obtained elsewhere.
    pub fn from_token(io: &'a T, token: Token) -> Self {
        Self(Object::from_token(io, token))
    }

    /// Sets the flags sent with every later command of this session.
    pub fn with_flags(self, flags: CommandFlags) -> Self {
        Self(self.0.with_flags(flags))
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.0.token()
    }

    /// Returns the generic object session.
    #[inline]
    pub fn object(&self) -> &Object<'a, T> {
        &self.0
    }

    /// Closes the session.
    #[inline]
    pub fn close(self) -> Result<(), CommandError> {
        self.0.close()
    }

    /// Destroys the DPIO and releases its resources.
    #[inline]
    pub fn destroy(self) -> Result<(), CommandError> {
        self.0.destroy()
    }

    #[inline]
    pub fn enable(&self) -> Result<(), CommandError> {
        self.0.enable()
    }

    #[inline]
    pub fn disable(&self) -> Result<(), CommandError> {
        self.0.disable()
    }

    #[inline]
    pub fn is_enabled(&self) -> Result<bool, CommandError> {
        self.0.is_enabled()
    }

    #[inline]
    pub fn reset(&self) -> Result<(), CommandError> {
        self.0.reset()
    }

    /// Retrieves the DPIO attributes.
    #[inline]
    pub fn get_attributes(&self) -> Result<DpioAttributes, GetAttributesError> {
        cmd::get_attributes(self.0.io(), self.0.flags(), self.0.token())
    }

    /// Returns the IRQ commands of this DPIO.
    #[inline]
    pub fn irq(&self) -> IrqControl<'a, T> {
        self.0.irq()
    }
}
