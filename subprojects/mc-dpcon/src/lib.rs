//! DPCON (Data Path Concentrator) object API.
//!
//! A DPCON aggregates the notifications of several frame queues into one
//! channel with a fixed number of priorities.

#![no_std]

#[cfg(test)]
extern crate std;

use mc_cmd::{CommandFlags, Token};
use mc_object::{CommandError, IrqControl, Object, ObjectVersion, execute};
use mc_portal::Transport;

mod proto;

pub use self::proto::{CMD_CREATE, CMD_OPEN, DpconAttributes, DpconConfig};
use self::proto::{CREATE, GET_ATTR, OPEN};

/// Opens a session to DPCON `dpcon_id`.
pub fn open<T>(io: &T, flags: CommandFlags, dpcon_id: u32) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    mc_object::open(io, &OPEN, flags, dpcon_id)
}

/// Creates a DPCON and opens a session to it.
pub fn create<T>(io: &T, flags: CommandFlags, cfg: &DpconConfig) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = CREATE.request(flags, Token::NONE, &[cfg.num_priorities.into()]);
    mc_object::create(io, CREATE.name, cmd)
}

/// Retrieves the DPCON attributes.
pub fn get_attributes<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
) -> Result<DpconAttributes, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_ATTR, flags, token, &[])?;
    let [id, ch_id, priorities, major, minor] = GET_ATTR.response(&cmd);
    Ok(DpconAttributes {
        id: id as u32,
        version: ObjectVersion::from_fields(major, minor),
        qbman_ch_id: ch_id as u16,
        num_priorities: priorities as u8,
    })
}

/// An open DPCON session.
#[derive(Debug)]
#[repr(transparent)]
pub struct Dpcon<'a, T: ?Sized>(Object<'a, T>);

impl<'a, T> Dpcon<'a, T>
where
    T: Transport + ?Sized,
{
    /// Opens a session to DPCON `dpcon_id`.
    pub fn open(io: &'a T, dpcon_id: u32) -> Result<Self, CommandError> {
        let token = open(io, CommandFlags::empty(), dpcon_id)?;
        Ok(Self::from_token(io, token))
    }

    /// Creates a DPCON and opens a session to it.
    pub fn create(io: &'a T, cfg: &DpconConfig) -> Result<Self, CommandError> {
        let token = create(io, CommandFlags::empty(), cfg)?;
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

    #[inline]
    pub fn object(&self) -> &Object<'a, T> {
        &self.0
    }

    #[inline]
    pub fn close(self) -> Result<(), CommandError> {
        self.0.close()
    }

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

    #[inline]
    pub fn get_attributes(&self) -> Result<DpconAttributes, CommandError> {
        get_attributes(self.0.io(), self.0.flags(), self.0.token())
    }

    #[inline]
    pub fn irq(&self) -> IrqControl<'a, T> {
        self.0.irq()
    }
}

#[cfg(test)]
mod tests {
    use mc_cmd::{Command, CommandId, McStatus};
    use mc_object::proto as common;
    use mc_portal::{
        SendError,
        fake::{FakeFirmware, set_status, set_token},
    };

    use super::*;

    const TOKEN: Token = Token::from_raw(0x0808);

    #[test]
    fn test_create_and_get_attributes() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            match cmd.command_id() {
                CMD_CREATE => set_token(cmd, TOKEN),
                common::CMD_GET_ATTR => {
                    cmd.params[0] = (2 << 48) | (0x41 << 32) | 11;
                    cmd.params[1] = 3;
                }
                _ => {}
            }
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let dpcon = Dpcon::create(&io, &DpconConfig { num_priorities: 2 }).unwrap();
        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CommandId::new(0x908));
        assert_eq!(req.params[0], 2);

        assert_eq!(
            dpcon.get_attributes().unwrap(),
            DpconAttributes {
                id: 11,
                version: ObjectVersion { major: 3, minor: 0 },
                qbman_ch_id: 0x41,
                num_priorities: 2,
            }
        );
        assert_eq!(journal.last_request().unwrap().token(), TOKEN);
    }

    #[test]
    fn test_open_rejected() {
        let fw = FakeFirmware::new(|cmd: &mut Command| set_status(cmd, McStatus::NoResource));
        let journal = fw.journal();
        let io = fw.into_io();

        let err = Dpcon::open(&io, 99).unwrap_err();
        assert_eq!(err.op, "dpcon_open");
        assert_eq!(err.source, SendError::Firmware(McStatus::NoResource));
        assert_eq!(err.to_errno(), -119);

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CommandId::new(0x808));
        assert_eq!(req.params[0], 99);
    }

    #[test]
    fn test_irq_status_uses_session_token() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[0] = 0x3;
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let dpcon = Dpcon::from_token(&io, TOKEN);
        assert_eq!(dpcon.irq().status(0, u32::MAX).unwrap(), 0x3);
        dpcon.close().unwrap();

        let sent = journal.doorbells();
        assert_eq!(sent[0].command_id(), common::CMD_GET_IRQ_STATUS);
        assert_eq!(sent[1].command_id(), common::CMD_CLOSE);
        assert!(sent.iter().all(|cmd| cmd.token() == TOKEN));
    }
}
