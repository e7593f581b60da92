//! The 64-byte MC command buffer.

use core::mem::size_of;

use static_assertions::const_assert_eq;

use crate::{
    field,
    header::{self, CommandFlags, CommandId, Token},
    status::McStatus,
};

/// Number of 64-bit parameter words following the header.
pub const NUM_PARAMS: usize = 7;

/// Number of 64-bit words in a command buffer, header included.
pub const NUM_WORDS: usize = NUM_PARAMS + 1;

/// An MC command, exchanged as a whole with the portal.
///
/// The same buffer carries the request to the firmware and the response back:
/// after a completed exchange the header holds the firmware status (and, for
/// open/create commands, the new session token) and the params hold the
/// response fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct Command {
    /// Header word.
    pub header: u64,
    /// Parameter words.
    pub params: [u64; NUM_PARAMS],
}
const_assert_eq!(size_of::<Command>(), NUM_WORDS * 8);

impl Command {
    /// Creates a request with the given header fields and zeroed params.
    pub fn new(id: CommandId, token: Token, flags: CommandFlags) -> Self {
        Self {
            header: header::encode_header(id, token, flags),
            params: [0; NUM_PARAMS],
        }
    }

    /// Returns word `index`, where word 0 is the header and word `i + 1` is
    /// param `i`.
    #[inline]
    pub fn word(&self, index: usize) -> u64 {
        if index == 0 {
            self.header
        } else {
            self.params[index - 1]
        }
    }

    /// Returns a mutable reference to word `index` (see [`Command::word`]).
    #[inline]
    pub fn word_mut(&mut self, index: usize) -> &mut u64 {
        if index == 0 {
            &mut self.header
        } else {
            &mut self.params[index - 1]
        }
    }

    /// Writes `value` into bits `offset..offset + width` of param `param`.
    #[inline]
    pub fn pack(&mut self, param: usize, offset: u32, width: u32, value: u64) {
        field::pack(&mut self.params[param], offset, width, value);
    }

    /// Reads bits `offset..offset + width` of param `param`.
    #[inline]
    pub fn unpack(&self, param: usize, offset: u32, width: u32) -> u64 {
        field::unpack(self.params[param], offset, width)
    }

    /// Returns the command id from the header.
    #[inline]
    pub fn command_id(&self) -> CommandId {
        header::decode_command_id(self.header)
    }

    /// Returns the token from the header.
    #[inline]
    pub fn token(&self) -> Token {
        header::decode_token(self.header)
    }

    /// Returns the raw status byte from the header.
    #[inline]
    pub fn raw_status(&self) -> u8 {
        header::decode_status(self.header)
    }

    /// Returns the decoded status from the header, if it is a known code.
    #[inline]
    pub fn status(&self) -> Option<McStatus> {
        McStatus::from_raw(self.raw_status())
    }

    /// Returns `true` while the header still carries [`McStatus::Ready`].
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.raw_status() == McStatus::Ready as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_zeroes_params() {
        let cmd = Command::new(CommandId::new(0x800), Token::from_raw(3), CommandFlags::empty());
        assert_eq!(cmd.params, [0; NUM_PARAMS]);
        assert!(cmd.is_pending());
        assert_eq!(cmd.token(), Token::from_raw(3));
        assert_eq!(cmd.command_id(), CommandId::new(0x800));
    }

    #[test]
    fn test_word_indexing() {
        let mut cmd = Command::default();
        *cmd.word_mut(0) = 0xAA;
        *cmd.word_mut(1) = 0xBB;
        *cmd.word_mut(7) = 0xCC;
        assert_eq!(cmd.header, 0xAA);
        assert_eq!(cmd.params[0], 0xBB);
        assert_eq!(cmd.params[6], 0xCC);
        assert_eq!(cmd.word(7), 0xCC);
    }

    #[test]
    fn test_pack_object_id_leaves_header_alone() {
        let mut cmd = Command::new(CommandId::new(0x800), Token::NONE, CommandFlags::empty());
        let header = cmd.header;
        cmd.pack(0, 0, 32, 7);
        assert_eq!(cmd.header, header);
        assert_eq!(cmd.unpack(0, 0, 32), 7);
        assert_eq!(cmd.params[1..], [0; NUM_PARAMS - 1]);
    }

    #[test]
    fn test_status_of_completed_header() {
        let mut cmd = Command::new(CommandId::new(0x004), Token::from_raw(1), CommandFlags::empty());
        field::pack(&mut cmd.header, header::STATUS_OFFSET, header::STATUS_WIDTH, 0x3);
        assert_eq!(cmd.status(), Some(McStatus::AuthError));
        assert!(!cmd.is_pending());

        field::pack(&mut cmd.header, header::STATUS_OFFSET, header::STATUS_WIDTH, 0xEE);
        assert_eq!(cmd.status(), None);
    }
}
