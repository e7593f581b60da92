//! DPMAC (Data Path MAC) object API.
//!
//! A DPMAC represents one Ethernet MAC of the SoC. Besides the common object
//! commands it exposes the MAC link description and its statistics counters.

#![no_std]

#[cfg(test)]
extern crate std;

use mc_cmd::{CommandFlags, Token};
use mc_object::{CommandError, DecodeError, IrqControl, Object, ObjectVersion, execute};
use mc_portal::Transport;

mod proto;

pub use self::proto::{
    CMD_CREATE, CMD_GET_COUNTER, CMD_OPEN, Counter, DpmacAttributes, DpmacConfig, EthIf, LinkType,
};
use self::proto::{CREATE, GET_ATTR, GET_COUNTER, OPEN};

/// Opens a session to DPMAC `dpmac_id`.
pub fn open<T>(io: &T, flags: CommandFlags, dpmac_id: u32) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    mc_object::open(io, &OPEN, flags, dpmac_id)
}

/// Creates a DPMAC and opens a session to it.
pub fn create<T>(io: &T, flags: CommandFlags, cfg: &DpmacConfig) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = CREATE.request(flags, Token::NONE, &[cfg.mac_id.into()]);
    mc_object::create(io, CREATE.name, cmd)
}

/// Retrieves the DPMAC attributes.
pub fn get_attributes<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
) -> Result<DpmacAttributes, GetAttributesError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_ATTR, flags, token, &[]).map_err(GetAttributesError::Command)?;
    let [phy_id, id, major, minor, link_type, eth_if, max_rate] = GET_ATTR.response(&cmd);

    Ok(DpmacAttributes {
        id: id as u32,
        phy_id: phy_id as u32,
        version: ObjectVersion::from_fields(major, minor),
        link_type: LinkType::from_raw(link_type).map_err(GetAttributesError::Decode)?,
        eth_if: EthIf::from_raw(eth_if).map_err(GetAttributesError::Decode)?,
        max_rate: max_rate as u32,
    })
}

/// Error returned by [`get_attributes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GetAttributesError {
    #[error("failed to get DPMAC attributes")]
    Command(#[source] CommandError),
    #[error("invalid DPMAC attributes")]
    Decode(#[source] DecodeError),
}

/// Reads one statistics counter.
pub fn get_counter<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    counter: Counter,
) -> Result<u64, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_COUNTER, flags, token, &[counter as u64])?;
    let [value] = GET_COUNTER.response(&cmd);
    Ok(value)
}

/// An open DPMAC session.
#[derive(Debug)]
#[repr(transparent)]
pub struct Dpmac<'a, T: ?Sized>(Object<'a, T>);

impl<'a, T> Dpmac<'a, T>
where
    T: Transport + ?Sized,
{
    pub fn open(io: &'a T, dpmac_id: u32) -> Result<Self, CommandError> {
        let token = open(io, CommandFlags::empty(), dpmac_id)?;
        Ok(Self::from_token(io, token))
    }

    pub fn create(io: &'a T, cfg: &DpmacConfig) -> Result<Self, CommandError> {
        let token = create(io, CommandFlags::empty(), cfg)?;
        Ok(Self::from_token(io, token))
    }

    pub fn from_token(io: &'a T, token: Token) -> Self {
        Self(Object::from_token(io, token))
    }

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
    pub fn get_attributes(&self) -> Result<DpmacAttributes, GetAttributesError> {
        get_attributes(self.0.io(), self.0.flags(), self.0.token())
    }

    #[inline]
    pub fn get_counter(&self, counter: Counter) -> Result<u64, CommandError> {
        get_counter(self.0.io(), self.0.flags(), self.0.token(), counter)
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
    use mc_portal::fake::{FakeFirmware, set_status, set_token};

    use super::*;

    const TOKEN: Token = Token::from_raw(0x00AC);

    #[test]
    fn test_create_request() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            set_token(cmd, TOKEN);
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let dpmac = Dpmac::create(&io, &DpmacConfig { mac_id: 17 }).unwrap();
        assert_eq!(dpmac.token(), TOKEN);

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CommandId::new(0x90c));
        assert_eq!(req.params[0], 17);
    }

    #[test]
    fn test_get_attributes() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            assert_eq!(cmd.command_id(), common::CMD_GET_ATTR);
            cmd.params[0] = (3 << 32) | 0x10;
            cmd.params[1] = (8 << 40) | (2 << 32) | (1 << 16) | 4;
            cmd.params[2] = 10_000;
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        let attr = Dpmac::from_token(&io, TOKEN).get_attributes().unwrap();
        assert_eq!(
            attr,
            DpmacAttributes {
                id: 3,
                phy_id: 0x10,
                version: ObjectVersion { major: 4, minor: 1 },
                link_type: LinkType::Phy,
                eth_if: EthIf::Xfi,
                max_rate: 10_000,
            }
        );
    }

    #[test]
    fn test_get_attributes_unknown_eth_if() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[1] = (0x7F << 40) | (1 << 32);
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        let err = Dpmac::from_token(&io, TOKEN).get_attributes().unwrap_err();
        assert_eq!(
            err,
            GetAttributesError::Decode(DecodeError {
                field: "eth_if",
                value: 0x7F
            })
        );
    }

    #[test]
    fn test_get_counter() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[1] = 0x1_0000_0000;
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let value = Dpmac::from_token(&io, TOKEN)
            .get_counter(Counter::EgrByte)
            .unwrap();
        assert_eq!(value, 0x1_0000_0000);

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CommandId::new(0x0c4));
        assert_eq!(req.params[0], 21);
        assert_eq!(req.token(), TOKEN);
    }
}
