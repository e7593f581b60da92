//! MC command header word.
//!
//! # Layout
//!
//! ```text
//! Bits    Size  Field
//! ─────────────────────────────────────────────────────────────
//! 0-7     8     reserved (zero)
//! 8-15    8     flags, byte 1 (e.g. PRIORITY)
//! 16-23   8     status (firmware-owned)
//! 24-31   8     flags, byte 3 (e.g. INTR_DIS)
//! 32-47   16    token (object session handle)
//! 48-51   4     reserved (zero)
//! 52-63   12    command id (opcode)
//! ─────────────────────────────────────────────────────────────
//! ```
//!
//! The flags are a 32-bit value restricted to [`CommandFlags::MASK`], so the
//! bytes they occupy never overlap the status byte. A request always carries
//! [`McStatus::Ready`] in the status byte; the firmware replaces it once the
//! command completes, which is how the portal detects completion.

use core::mem::size_of;

use modular_bitfield::prelude::*;
use static_assertions::const_assert_eq;

use crate::{
    field::{self, unpack},
    status::McStatus,
};

/// Bit offset of the flags field.
pub const FLAGS_OFFSET: u32 = 0;
/// Width of the flags field.
pub const FLAGS_WIDTH: u32 = 32;
/// Bit offset of the status field.
pub const STATUS_OFFSET: u32 = 16;
/// Width of the status field.
pub const STATUS_WIDTH: u32 = 8;
/// Bit offset of the token field.
pub const TOKEN_OFFSET: u32 = 32;
/// Width of the token field.
pub const TOKEN_WIDTH: u32 = 16;
/// Bit offset of the command id field.
pub const CMD_ID_OFFSET: u32 = 52;
/// Width of the command id field.
pub const CMD_ID_WIDTH: u32 = 12;

/// Raw header word, bit for bit.
#[bitfield]
#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
pub struct Header {
    #[skip]
    __reserved0: B8,
    /// Flags bits 8-15.
    pub flags_lo: B8,
    /// Firmware status code.
    pub status: B8,
    /// Flags bits 24-31.
    pub flags_hi: B8,
    /// Object session token.
    pub token: B16,
    #[skip]
    __reserved1: B4,
    /// Command id.
    pub command_id: B12,
}
const_assert_eq!(size_of::<Header>(), 8);

impl Header {
    /// Builds a request header. The status byte is set to [`McStatus::Ready`].
    pub fn request(id: CommandId, token: Token, flags: CommandFlags) -> Self {
        let flags = (flags & CommandFlags::MASK).bits();
        Self::new()
            .with_command_id(id.to_raw())
            .with_token(token.to_raw())
            .with_flags_lo((flags >> 8) as u8)
            .with_flags_hi((flags >> 24) as u8)
            .with_status(McStatus::Ready as u8)
    }

    /// Decodes a header from its 64-bit word.
    #[inline]
    pub fn from_word(word: u64) -> Self {
        Self::from_bytes(word.to_le_bytes())
    }

    /// Encodes the header into its 64-bit word.
    #[inline]
    pub fn to_word(self) -> u64 {
        u64::from_le_bytes(self.into_bytes())
    }

    /// Returns the caller flags carried by this header.
    #[inline]
    pub fn flags(&self) -> CommandFlags {
        let raw = (u32::from(self.flags_hi()) << 24) | (u32::from(self.flags_lo()) << 8);
        CommandFlags::from_bits_retain(raw)
    }
}

bitflags::bitflags! {
    /// Caller-settable command flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct CommandFlags: u32 {
        /// High priority command.
        const PRIORITY = 0x0000_8000;
        /// Do not raise a completion interrupt.
        const INTR_DIS = 0x0100_0000;

        // Any bit inside the flag bytes may be set by the caller.
        const _ = 0xFF00_FF00;
    }
}

impl CommandFlags {
    /// Bits of the 32-bit flags value the header can carry.
    pub const MASK: Self = Self::from_bits_retain(0xFF00_FF00);
}

/// A 12-bit MC command identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CommandId(u16);

impl CommandId {
    /// Largest representable command id.
    pub const MAX: u16 = 0xFFF;

    /// Creates a command id.
    ///
    /// Panics (at compile time when used in a `const`) if `raw` does not fit in
    /// 12 bits.
    #[inline]
    pub const fn new(raw: u16) -> Self {
        assert!(raw <= Self::MAX, "command id does not fit in 12 bits");
        Self(raw)
    }

    /// Returns the raw command id.
    #[inline]
    pub const fn to_raw(self) -> u16 {
        self.0
    }
}

impl core::fmt::Display for CommandId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// An object session token.
///
/// Returned in the header of a successful open or create response and echoed
/// in every later command addressed to the same object. Session-establishing
/// commands carry [`Token::NONE`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Token(u16);

impl Token {
    /// Token carried by commands that are not addressed to an open object.
    pub const NONE: Token = Token(0);

    /// Creates a token from its raw value.
    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw token value.
    #[inline]
    pub const fn to_raw(self) -> u16 {
        self.0
    }
}

impl core::fmt::Display for Token {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Encodes a request header word.
#[inline]
pub fn encode_header(id: CommandId, token: Token, flags: CommandFlags) -> u64 {
    Header::request(id, token, flags).to_word()
}

/// Extracts the token from a header word.
#[inline]
pub const fn decode_token(word: u64) -> Token {
    Token(unpack(word, TOKEN_OFFSET, TOKEN_WIDTH) as u16)
}

/// Extracts the raw status byte from a header word.
///
/// Only meaningful once the firmware has completed the command.
#[inline]
pub const fn decode_status(word: u64) -> u8 {
    unpack(word, STATUS_OFFSET, STATUS_WIDTH) as u8
}

/// Extracts the command id from a header word.
#[inline]
pub const fn decode_command_id(word: u64) -> CommandId {
    CommandId(unpack(word, CMD_ID_OFFSET, CMD_ID_WIDTH) as u16)
}

/// Extracts the caller flags from a header word.
#[inline]
pub const fn decode_flags(word: u64) -> CommandFlags {
    let raw = field::unpack(word, FLAGS_OFFSET, FLAGS_WIDTH) as u32;
    CommandFlags::from_bits_retain(raw & CommandFlags::MASK.bits())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_open_header_layout() {
        let word = encode_header(CommandId::new(0x805), Token::NONE, CommandFlags::empty());
        assert_eq!(word, 0x8050_0000_0001_0000);
    }

    #[test]
    fn test_header_with_token_and_flags() {
        let word = encode_header(
            CommandId::new(0x004),
            Token::from_raw(0x1234),
            CommandFlags::PRIORITY | CommandFlags::INTR_DIS,
        );
        assert_eq!(word, 0x0040_1234_0101_8000);
        assert_eq!(decode_command_id(word), CommandId::new(0x004));
        assert_eq!(decode_token(word), Token::from_raw(0x1234));
        assert_eq!(decode_flags(word), CommandFlags::PRIORITY | CommandFlags::INTR_DIS);
    }

    #[test]
    fn test_flags_never_touch_status() {
        let flags = CommandFlags::from_bits_retain(u32::MAX);
        let word = encode_header(CommandId::new(0x800), Token::NONE, flags);
        assert_eq!(decode_status(word), McStatus::Ready as u8);
        assert_eq!(field::unpack(word, 0, 8), 0);
    }

    #[test]
    fn test_bitfield_matches_field_codec() {
        let header = Header::new()
            .with_command_id(0xABC)
            .with_token(0xBEEF)
            .with_status(0x5A)
            .with_flags_lo(0x11)
            .with_flags_hi(0x22);
        let word = header.to_word();

        assert_eq!(field::unpack(word, CMD_ID_OFFSET, CMD_ID_WIDTH), 0xABC);
        assert_eq!(field::unpack(word, TOKEN_OFFSET, TOKEN_WIDTH), 0xBEEF);
        assert_eq!(field::unpack(word, STATUS_OFFSET, STATUS_WIDTH), 0x5A);
        assert_eq!(field::unpack(word, 8, 8), 0x11);
        assert_eq!(field::unpack(word, 24, 8), 0x22);
        assert_eq!(Header::from_word(word).token(), 0xBEEF);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = encode_header(CommandId::new(0x800), Token::from_raw(7), CommandFlags::PRIORITY);
        let b = encode_header(CommandId::new(0x800), Token::from_raw(7), CommandFlags::PRIORITY);
        assert_eq!(a.to_le_bytes(), b.to_le_bytes());
    }

    proptest! {
        #[test]
        fn prop_token_round_trip(id in 0u16..=CommandId::MAX, token: u16, flags: u32) {
            let word = encode_header(
                CommandId::new(id),
                Token::from_raw(token),
                CommandFlags::from_bits_retain(flags),
            );
            prop_assert_eq!(decode_token(word), Token::from_raw(token));
            prop_assert_eq!(decode_command_id(word), CommandId::new(id));
            prop_assert_eq!(McStatus::from_raw(decode_status(word)), Some(McStatus::Ready));
            prop_assert_eq!(decode_flags(word).bits(), flags & CommandFlags::MASK.bits());
        }
    }
}
