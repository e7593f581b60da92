//! FFI bindings for the MC command format.
//!
//! Exposes the header codec to C code that still builds its own commands
//! (for example the `mc_encode_cmd_header()`/`MC_CMD_HDR_READ_*()` helpers of
//! the C object APIs).
//!
//! # Naming Convention
//!
//! FFI exports follow the pattern: `__mc_cmd__<fn_name>`

use crate::{
    header::{self, CommandFlags, CommandId, Token},
    status::McStatus,
};

/// Encodes a request header word.
///
/// Command ids wider than 12 bits are truncated.
#[unsafe(no_mangle)]
pub extern "C" fn __mc_cmd__encode_cmd_header(cmd_id: u16, cmd_flags: u32, token: u16) -> u64 {
    header::encode_header(
        CommandId::new(cmd_id & CommandId::MAX),
        Token::from_raw(token),
        CommandFlags::from_bits_retain(cmd_flags),
    )
}

/// Reads the token from a header word.
#[unsafe(no_mangle)]
pub extern "C" fn __mc_cmd__read_token(hdr: u64) -> u16 {
    header::decode_token(hdr).to_raw()
}

/// Reads the raw status byte from a header word.
#[unsafe(no_mangle)]
pub extern "C" fn __mc_cmd__read_status(hdr: u64) -> u8 {
    header::decode_status(hdr)
}

/// Maps a raw status byte to a negative errno value.
#[unsafe(no_mangle)]
pub extern "C" fn __mc_cmd__status_to_error(status: u8) -> i32 {
    McStatus::raw_to_errno(status)
}
