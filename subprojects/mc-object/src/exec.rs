//! Generic command execution.

use mc_cmd::{Command, CommandFlags, CommandLayout, McStatus, Token};
use mc_portal::{SendError, Transport};

/// Builds the request described by `layout`, sends it and returns the
/// completed command.
///
/// `args` are packed into the layout's request fields in order.
pub fn execute<T>(
    io: &T,
    layout: &CommandLayout,
    flags: CommandFlags,
    token: Token,
    args: &[u64],
) -> Result<Command, CommandError>
where
    T: Transport + ?Sized,
{
    let mut cmd = layout.request(flags, token, args);
    submit(io, layout.name, &mut cmd)?;
    Ok(cmd)
}

/// Sends an already built command, annotating a failure with `op`.
///
/// For requests that carry more than positional integer fields, such as
/// object type strings.
pub fn submit<T>(io: &T, op: &'static str, cmd: &mut Command) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    io.send(cmd).map_err(|source| CommandError { op, source })
}

/// Error returned by an MC object operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("MC operation {op} failed")]
pub struct CommandError {
    /// Name of the operation.
    pub op: &'static str,
    /// Transport or firmware failure.
    #[source]
    pub source: SendError,
}

impl CommandError {
    /// Returns the firmware status, if the firmware rejected the command.
    pub fn status(&self) -> Option<McStatus> {
        self.source.status()
    }

    /// Maps the error to a negative errno value.
    pub fn to_errno(&self) -> i32 {
        self.source.to_errno()
    }
}

/// A response field held a value outside its documented set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value {value:#x}")]
pub struct DecodeError {
    /// Name of the response field.
    pub field: &'static str,
    /// Raw value read from the response.
    pub value: u64,
}

#[cfg(test)]
mod tests {
    use core::error::Error as _;
    use std::string::ToString;

    use mc_cmd::{CommandId, Field};
    use mc_portal::fake::{FakeFirmware, set_status};

    use super::*;

    const GET_IRQ_MASK: CommandLayout = CommandLayout {
        name: "get_irq_mask",
        id: CommandId::new(0x015),
        request: &[Field::new("irq_index", 0, 32, 8)],
        response: &[Field::new("mask", 0, 0, 32)],
    };

    #[test]
    fn test_execute_round_trip() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            assert_eq!(cmd.command_id(), CommandId::new(0x015));
            assert_eq!(cmd.unpack(0, 32, 8), 2);
            cmd.pack(0, 0, 32, 0xF0F0);
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let cmd = execute(&io, &GET_IRQ_MASK, CommandFlags::PRIORITY, Token::from_raw(5), &[2])
            .unwrap();
        let [mask] = GET_IRQ_MASK.response(&cmd);
        assert_eq!(mask, 0xF0F0);

        let request = journal.last_request().unwrap();
        assert_eq!(request.token(), Token::from_raw(5));
        assert_eq!(mc_cmd::header::decode_flags(request.header), CommandFlags::PRIORITY);
    }

    #[test]
    fn test_execute_names_failed_operation() {
        let io = FakeFirmware::new(|cmd: &mut Command| set_status(cmd, McStatus::NoPrivilege))
            .into_io();

        let err = execute(&io, &GET_IRQ_MASK, CommandFlags::empty(), Token::from_raw(5), &[0])
            .unwrap_err();
        assert_eq!(err.op, "get_irq_mask");
        assert_eq!(err.status(), Some(McStatus::NoPrivilege));
        assert_eq!(err.to_errno(), -1);
        assert_eq!(
            err.source().map(ToString::to_string),
            Some(SendError::Firmware(McStatus::NoPrivilege).to_string())
        );
    }
}
