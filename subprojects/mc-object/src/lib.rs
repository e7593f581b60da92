//! Generic MC object operations
//!
//! The Management Complex exposes its resources as typed objects (DPIO,
//! DPCON, DPMAC, DPRC, ...). Every object type shares the same session model
//! and a common set of commands:
//!
//! ```text
//! open(id) ──► token ──► enable / disable / reset / get_attributes / irq ...
//!                   └──► close       (session ends)
//!                   └──► destroy     (object and session end)
//! ```
//!
//! This crate provides the generic execution path over a
//! [`CommandLayout`](mc_cmd::CommandLayout) table, the common commands and
//! their layouts, and [`Object`], the session value object type crates wrap.
//!
//! Operations come in two forms: free functions taking the portal, flags and
//! token explicitly, and methods on a session that supplies them.

#![no_std]

#[cfg(test)]
extern crate std;

mod exec;
pub mod irq;
pub mod mng;
mod object;
pub mod proto;

pub use self::{
    exec::{CommandError, DecodeError, execute, submit},
    irq::{IrqConfig, IrqControl, IrqInfo},
    mng::{McVersion, get_container_id, get_version},
    object::{Object, ObjectVersion, close, create, destroy, disable, enable, is_enabled, open, reset},
};
