//! # fsl-mc
//!
//! Host side of the Management Complex (MC) command interface.
//!
//! - [`cmd`]: the 64-byte command format and status codes.
//! - [`portal`]: command submission over an MC portal.
//! - [`object`]: commands shared by all MC objects, and MC-level queries.
//! - [`dprc`], [`dpio`], [`dpcon`], [`dpmac`]: per-object APIs, each behind
//!   its Cargo feature.
#![no_std]

pub use mc_cmd as cmd;
pub use mc_object as object;
pub use mc_portal as portal;

#[cfg(feature = "dpcon")]
pub use mc_dpcon as dpcon;
#[cfg(feature = "dpio")]
pub use mc_dpio as dpio;
#[cfg(feature = "dpmac")]
pub use mc_dpmac as dpmac;
#[cfg(feature = "dprc")]
pub use mc_dprc as dprc;

#[cfg(feature = "ffi")]
pub mod ffi;
