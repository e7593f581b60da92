//! Management Complex (MC) command format
//!
//! This crate implements the wire format spoken with the Management Complex
//! firmware through an MC portal: the 64-byte command buffer, its header word,
//! the firmware status codes and the field packing primitives used to lay
//! command parameters into the payload words.
//!
//! # Architecture
//!
//! The MC control path is layered:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  Object APIs (dpio, dprc, dpmac...)  │  Per-object command layouts
//! ├──────────────────────────────────────┤
//! │  Command format  ← this crate        │  Header, params, status
//! ├──────────────────────────────────────┤
//! │  MC portal (mc-portal)               │  Write, doorbell, poll, read back
//! └──────────────────────────────────────┘
//! ```
//!
//! # Command Buffer
//!
//! ```text
//! Offset  Size   Field
//! ──────────────────────────────────────────
//! 0x00    0x08   Header (opcode, token, flags, status)
//! 0x08    0x38   Params (7 × 64-bit words)
//! ──────────────────────────────────────────
//! ```
//!
//! The core never interprets the params. Each command defines its own
//! sub-field positions, either by calling [`field::pack`]/[`field::unpack`]
//! directly or through a declarative [`CommandLayout`].

#![no_std]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod field;
pub mod header;
pub mod layout;
mod status;

pub use self::{
    command::{Command, NUM_PARAMS},
    header::{CommandFlags, CommandId, Token, decode_status, decode_token, encode_header},
    layout::{CommandLayout, Field},
    status::McStatus,
};

#[cfg(feature = "ffi")]
pub mod ffi;
