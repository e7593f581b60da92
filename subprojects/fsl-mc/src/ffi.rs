//! FFI exports re-exported from dependent crates.
//!
//! Referencing the `ffi` modules keeps their `#[no_mangle]` symbols in the
//! final link.

pub use mc_cmd::ffi as cmd;
