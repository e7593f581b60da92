//! MC-level management commands.
//!
//! These are not addressed to an object and carry no token.

use core::fmt;

use mc_cmd::{CommandFlags, Token};
use mc_portal::Transport;

use crate::{
    exec::{CommandError, execute},
    proto::{GET_CONTAINER_ID, GET_VERSION},
};

/// Version of the running MC firmware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct McVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl fmt::Display for McVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

/// Reads the MC firmware version.
pub fn get_version<T>(io: &T, flags: CommandFlags) -> Result<McVersion, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_VERSION, flags, Token::NONE, &[])?;
    let [revision, major, minor] = GET_VERSION.response(&cmd);
    Ok(McVersion {
        major: major as u32,
        minor: minor as u32,
        revision: revision as u32,
    })
}

/// Returns the id of the container the portal belongs to.
pub fn get_container_id<T>(io: &T, flags: CommandFlags) -> Result<u32, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_CONTAINER_ID, flags, Token::NONE, &[])?;
    let [id] = GET_CONTAINER_ID.response(&cmd);
    Ok(id as u32)
}

#[cfg(test)]
mod tests {
    use std::string::ToString;

    use mc_cmd::{Command, McStatus};
    use mc_portal::fake::{FakeFirmware, set_status};

    use super::*;
    use crate::proto;

    #[test]
    fn test_get_version() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[0] = (10 << 32) | 3;
            cmd.params[1] = 1;
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let version = get_version(&io, CommandFlags::empty()).unwrap();
        assert_eq!(
            version,
            McVersion {
                major: 10,
                minor: 1,
                revision: 3
            }
        );
        assert_eq!(version.to_string(), "10.1.3");

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), proto::CMD_GET_VERSION);
        assert_eq!(req.token(), Token::NONE);
    }

    #[test]
    fn test_get_container_id() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            assert_eq!(cmd.command_id(), proto::CMD_GET_CONT_ID);
            cmd.params[0] = 0xFFFF_FFFF_0000_0001;
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        assert_eq!(get_container_id(&io, CommandFlags::empty()).unwrap(), 1);
    }
}
