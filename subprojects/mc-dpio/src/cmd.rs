//! DPIO commands.

use mc_cmd::{CommandFlags, Token};
use mc_object::{CommandError, DecodeError, ObjectVersion, execute};
use mc_portal::Transport;

use crate::proto::{CREATE, ChannelMode, DpioAttributes, DpioConfig, GET_ATTR, OPEN};

/// Opens a session to DPIO `dpio_id`.
pub fn open<T>(io: &T, flags: CommandFlags, dpio_id: u32) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    mc_object::open(io, &OPEN, flags, dpio_id)
}

/// Creates a DPIO and opens a session to it.
pub fn create<T>(io: &T, flags: CommandFlags, cfg: &DpioConfig) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = CREATE.request(
        flags,
        Token::NONE,
        &[cfg.channel_mode.to_raw().into(), cfg.num_priorities.into()],
    );
    mc_object::create(io, CREATE.name, cmd)
}

/// Retrieves the DPIO attributes.
pub fn get_attributes<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
) -> Result<DpioAttributes, GetAttributesError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_ATTR, flags, token, &[]).map_err(GetAttributesError::Command)?;
    let [id, portal_id, priorities, mode, ce_paddr, ci_paddr, major, minor] =
        GET_ATTR.response(&cmd);

    Ok(DpioAttributes {
        id: id as u32,
        version: ObjectVersion::from_fields(major, minor),
        qbman_portal_ce_paddr: ce_paddr,
        qbman_portal_ci_paddr: ci_paddr,
        qbman_portal_id: portal_id as u16,
        channel_mode: ChannelMode::from_raw(mode).map_err(GetAttributesError::Decode)?,
        num_priorities: priorities as u8,
    })
}

/// Error returned by [`get_attributes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GetAttributesError {
    /// The command failed.
    #[error("failed to get DPIO attributes")]
    Command(#[source] CommandError),
    /// The response could not be decoded.
    #[error("invalid DPIO attributes")]
    Decode(#[source] DecodeError),
}
