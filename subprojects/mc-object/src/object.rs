//! Object sessions and the operations common to every object type.

use log::debug;
use mc_cmd::{Command, CommandFlags, CommandLayout, Token};
use mc_portal::Transport;

use crate::{
    exec::{CommandError, execute, submit},
    irq::IrqControl,
    proto::{CLOSE, DESTROY, DISABLE, ENABLE, IS_ENABLED, RESET},
};

/// Opens a session to an existing object.
///
/// `layout` is the object type's open command (see
/// [`open_layout`](crate::proto::open_layout)). Returns the token to use in
/// every later command to that object.
pub fn open<T>(
    io: &T,
    layout: &CommandLayout,
    flags: CommandFlags,
    object_id: u32,
) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, layout, flags, Token::NONE, &[object_id.into()])?;
    let token = cmd.token();
    debug!("MC {}: object {object_id} token {token}", layout.name);
    Ok(token)
}

/// Creates an object and opens a session to it.
///
/// `cmd` is the object type's create request; it must carry
/// [`Token::NONE`]. Returns the token of the new object.
pub fn create<T>(io: &T, op: &'static str, mut cmd: Command) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    debug_assert_eq!(cmd.token(), Token::NONE, "create carries no token");
    submit(io, op, &mut cmd)?;
    let token = cmd.token();
    debug!("MC {op}: token {token}");
    Ok(token)
}

/// Closes an object session. The token is invalid afterwards.
pub fn close<T>(io: &T, flags: CommandFlags, token: Token) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(io, &CLOSE, flags, token, &[])?;
    Ok(())
}

/// Destroys the object and releases its resources. The token is invalid
/// afterwards.
pub fn destroy<T>(io: &T, flags: CommandFlags, token: Token) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(io, &DESTROY, flags, token, &[])?;
    Ok(())
}

pub fn enable<T>(io: &T, flags: CommandFlags, token: Token) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(io, &ENABLE, flags, token, &[])?;
    Ok(())
}

pub fn disable<T>(io: &T, flags: CommandFlags, token: Token) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(io, &DISABLE, flags, token, &[])?;
    Ok(())
}

pub fn is_enabled<T>(io: &T, flags: CommandFlags, token: Token) -> Result<bool, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &IS_ENABLED, flags, token, &[])?;
    let [en] = IS_ENABLED.response(&cmd);
    Ok(en != 0)
}

/// Resets the object to its initial state.
pub fn reset<T>(io: &T, flags: CommandFlags, token: Token) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(io, &RESET, flags, token, &[])?;
    Ok(())
}

/// Version of an object type's command interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectVersion {
    pub major: u16,
    pub minor: u16,
}

impl ObjectVersion {
    /// Builds a version from raw response fields.
    pub fn from_fields(major: u64, minor: u64) -> Self {
        Self {
            major: major as u16,
            minor: minor as u16,
        }
    }
}

impl core::fmt::Display for ObjectVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// An open session to one MC object.
///
/// Holds the portal and the token returned by open or create. Closing or
/// destroying the object consumes the session, so the token cannot be used
/// afterwards. Dropping a session without closing it leaves the object open
/// at the firmware.
///
/// Object type crates wrap this in their own session types.
#[derive(Debug)]
pub struct Object<'a, T: ?Sized> {
    io: &'a T,
    token: Token,
    flags: CommandFlags,
}

impl<'a, T> Object<'a, T>
where
    T: Transport + ?Sized,
{
    /// Opens a session to object `object_id` with the type's open `layout`.
    pub fn open(io: &'a T, layout: &CommandLayout, object_id: u32) -> Result<Self, CommandError> {
        let token = open(io, layout, CommandFlags::empty(), object_id)?;
        Ok(Self::from_token(io, token))
    }

    /// Creates an object from a create request and opens a session to it.
    pub fn create(io: &'a T, op: &'static str, cmd: Command) -> Result<Self, CommandError> {
        let token = create(io, op, cmd)?;
        Ok(Self::from_token(io, token))
    }

    /// Wraps a token obtained elsewhere.
    pub fn from_token(io: &'a T, token: Token) -> Self {
        Self {
            io,
            token,
            flags: CommandFlags::empty(),
        }
    }

    /// Sets the flags sent with every later command of this session.
    pub fn with_flags(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    #[inline]
    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    #[inline]
    pub fn io(&self) -> &'a T {
        self.io
    }

    /// Runs `layout` against this object and returns the completed command.
    pub fn execute(&self, layout: &CommandLayout, args: &[u64]) -> Result<Command, CommandError> {
        execute(self.io, layout, self.flags, self.token, args)
    }

    /// Builds a request for `layout` addressed to this object.
    ///
    /// For requests completed by hand before [`Object::submit`].
    pub fn request(&self, layout: &CommandLayout, args: &[u64]) -> Command {
        layout.request(self.flags, self.token, args)
    }

    /// Sends a request built with [`Object::request`].
    pub fn submit(&self, op: &'static str, cmd: &mut Command) -> Result<(), CommandError> {
        submit(self.io, op, cmd)
    }

    /// Closes the session.
    pub fn close(self) -> Result<(), CommandError> {
        close(self.io, self.flags, self.token)
    }

    /// Destroys the object.
    pub fn destroy(self) -> Result<(), CommandError> {
        destroy(self.io, self.flags, self.token)
    }

    pub fn enable(&self) -> Result<(), CommandError> {
        enable(self.io, self.flags, self.token)
    }

    pub fn disable(&self) -> Result<(), CommandError> {
        disable(self.io, self.flags, self.token)
    }

    pub fn is_enabled(&self) -> Result<bool, CommandError> {
        is_enabled(self.io, self.flags, self.token)
    }

    pub fn reset(&self) -> Result<(), CommandError> {
        reset(self.io, self.flags, self.token)
    }

    /// Returns the IRQ commands of this object.
    pub fn irq(&self) -> IrqControl<'a, T> {
        IrqControl::new(self.io, self.token, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use mc_cmd::{CommandId, McStatus};
    use mc_portal::{
        SendError,
        fake::{FakeFirmware, set_status, set_token},
    };

    use super::*;
    use crate::proto::{self, open_layout};

    const OPEN: CommandLayout = open_layout("open", CommandId::new(0x803));

    // Opens any object with token 0x1234 and accepts every other command.
    fn firmware() -> FakeFirmware {
        FakeFirmware::new(|cmd: &mut Command| {
            match cmd.command_id().to_raw() {
                0x803 => set_token(cmd, Token::from_raw(0x1234)),
                0x006 => cmd.params[0] = 1,
                _ => {}
            }
            set_status(cmd, McStatus::Ok);
        })
    }

    #[test]
    fn test_open_request_and_token() {
        let fw = firmware();
        let journal = fw.journal();
        let io = fw.into_io();

        let token = open(&io, &OPEN, CommandFlags::empty(), 7).unwrap();
        assert_eq!(token, Token::from_raw(0x1234));

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CommandId::new(0x803));
        assert_eq!(req.token(), Token::NONE);
        assert_eq!(req.params, [7, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_session_echoes_token() {
        let fw = firmware();
        let journal = fw.journal();
        let io = fw.into_io();

        let obj = Object::open(&io, &OPEN, 7)
            .unwrap()
            .with_flags(CommandFlags::PRIORITY);
        obj.enable().unwrap();
        assert!(obj.is_enabled().unwrap());
        obj.reset().unwrap();
        obj.disable().unwrap();
        obj.close().unwrap();

        let ids: std::vec::Vec<_> = journal
            .doorbells()
            .iter()
            .map(|cmd| cmd.command_id())
            .collect();
        assert_eq!(
            ids,
            [
                CommandId::new(0x803),
                proto::CMD_ENABLE,
                proto::CMD_IS_ENABLED,
                proto::CMD_RESET,
                proto::CMD_DISABLE,
                proto::CMD_CLOSE,
            ]
        );
        for cmd in &journal.doorbells()[1..] {
            assert_eq!(cmd.token(), Token::from_raw(0x1234));
            assert_eq!(
                mc_cmd::header::decode_flags(cmd.header),
                CommandFlags::PRIORITY
            );
        }
    }

    #[test]
    fn test_destroy_sends_destroy() {
        let fw = firmware();
        let journal = fw.journal();
        let io = fw.into_io();

        Object::from_token(&io, Token::from_raw(9)).destroy().unwrap();
        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), proto::CMD_DESTROY);
        assert_eq!(req.token(), Token::from_raw(9));
    }

    #[test]
    fn test_rejected_token_is_reported() {
        let io = FakeFirmware::new(|cmd: &mut Command| set_status(cmd, McStatus::AuthError))
            .into_io();

        let err = Object::from_token(&io, Token::from_raw(0x1234))
            .enable()
            .unwrap_err();
        assert_eq!(err.op, "enable");
        assert_eq!(err.source, SendError::Firmware(McStatus::AuthError));
        assert_eq!(err.to_errno(), -13);
    }

    #[test]
    fn test_create_returns_new_token() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            set_token(cmd, Token::from_raw(0x55));
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        let cmd = Command::new(CommandId::new(0x903), Token::NONE, CommandFlags::empty());
        let obj = Object::create(&io, "create", cmd).unwrap();
        assert_eq!(obj.token(), Token::from_raw(0x55));
    }
}
