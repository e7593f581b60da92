//! Interrupt configuration commands.
//!
//! Every object type exposes the same set of IRQ commands. An object has one
//! or more interrupt lines, selected by `irq_index`, each with a 32-bit cause
//! register: `mask` selects which causes may raise the line, `status` latches
//! raised causes until they are cleared (write one to clear).
//!
//! Delivery of the interrupts themselves is outside this crate.

use mc_cmd::{CommandFlags, Token};
use mc_portal::Transport;

use crate::{
    exec::{CommandError, execute},
    proto::{
        CLEAR_IRQ_STATUS, GET_IRQ, GET_IRQ_ENABLE, GET_IRQ_MASK, GET_IRQ_STATUS, SET_IRQ,
        SET_IRQ_ENABLE, SET_IRQ_MASK,
    },
};

/// Message-signalled interrupt configuration of one IRQ line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrqConfig {
    /// Address the interrupt message is written to.
    pub addr: u64,
    /// Value written to `addr`.
    pub val: u32,
    /// Caller-defined id, returned unchanged by [`get_irq`].
    pub user_irq_id: i32,
}

/// IRQ line configuration as reported by the firmware.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrqInfo {
    /// Interrupt type.
    pub irq_type: u32,
    /// Configuration.
    pub config: IrqConfig,
}

/// Sets the interrupt message of IRQ line `irq_index`.
pub fn set_irq<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
    config: &IrqConfig,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(
        io,
        &SET_IRQ,
        flags,
        token,
        &[
            irq_index.into(),
            config.val.into(),
            config.addr,
            (config.user_irq_id as u32).into(),
        ],
    )?;
    Ok(())
}

/// Gets the interrupt message of IRQ line `irq_index`.
pub fn get_irq<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
) -> Result<IrqInfo, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_IRQ, flags, token, &[irq_index.into()])?;
    let [val, addr, user_irq_id, irq_type] = GET_IRQ.response(&cmd);
    Ok(IrqInfo {
        irq_type: irq_type as u32,
        config: IrqConfig {
            addr,
            val: val as u32,
            user_irq_id: user_irq_id as u32 as i32,
        },
    })
}

/// Enables or disables IRQ line `irq_index` as a whole.
pub fn set_irq_enable<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
    enable: bool,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(
        io,
        &SET_IRQ_ENABLE,
        flags,
        token,
        &[enable.into(), irq_index.into()],
    )?;
    Ok(())
}

/// Returns whether IRQ line `irq_index` is enabled.
pub fn get_irq_enable<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
) -> Result<bool, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_IRQ_ENABLE, flags, token, &[irq_index.into()])?;
    let [en] = GET_IRQ_ENABLE.response(&cmd);
    Ok(en != 0)
}

/// Sets the cause mask of IRQ line `irq_index`.
pub fn set_irq_mask<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
    mask: u32,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(
        io,
        &SET_IRQ_MASK,
        flags,
        token,
        &[mask.into(), irq_index.into()],
    )?;
    Ok(())
}

/// Gets the cause mask of IRQ line `irq_index`.
pub fn get_irq_mask<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
) -> Result<u32, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_IRQ_MASK, flags, token, &[irq_index.into()])?;
    let [mask] = GET_IRQ_MASK.response(&cmd);
    Ok(mask as u32)
}

/// Gets the latched causes of IRQ line `irq_index`.
///
/// `status` selects the causes to report; pass `u32::MAX` for all of them.
pub fn get_irq_status<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
    status: u32,
) -> Result<u32, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(
        io,
        &GET_IRQ_STATUS,
        flags,
        token,
        &[status.into(), irq_index.into()],
    )?;
    let [status] = GET_IRQ_STATUS.response(&cmd);
    Ok(status as u32)
}

/// Clears the latched causes set in `status` on IRQ line `irq_index`.
pub fn clear_irq_status<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    irq_index: u8,
    status: u32,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(
        io,
        &CLEAR_IRQ_STATUS,
        flags,
        token,
        &[status.into(), irq_index.into()],
    )?;
    Ok(())
}

/// The IRQ commands of one open object.
///
/// Obtained from an object session; borrows its portal and token.
#[derive(Debug)]
pub struct IrqControl<'s, T: ?Sized> {
    io: &'s T,
    token: Token,
    flags: CommandFlags,
}

impl<'s, T> IrqControl<'s, T>
where
    T: Transport + ?Sized,
{
    pub(crate) fn new(io: &'s T, token: Token, flags: CommandFlags) -> Self {
        Self { io, token, flags }
    }

    /// See [`set_irq`].
    #[inline]
    pub fn set(&self, irq_index: u8, config: &IrqConfig) -> Result<(), CommandError> {
        set_irq(self.io, self.flags, self.token, irq_index, config)
    }

    /// See [`get_irq`].
    #[inline]
    pub fn get(&self, irq_index: u8) -> Result<IrqInfo, CommandError> {
        get_irq(self.io, self.flags, self.token, irq_index)
    }

    /// See [`set_irq_enable`].
    #[inline]
    pub fn set_enable(&self, irq_index: u8, enable: bool) -> Result<(), CommandError> {
        set_irq_enable(self.io, self.flags, self.token, irq_index, enable)
    }

    /// See [`get_irq_enable`].
    #[inline]
    pub fn enable(&self, irq_index: u8) -> Result<bool, CommandError> {
        get_irq_enable(self.io, self.flags, self.token, irq_index)
    }

    /// See [`set_irq_mask`].
    #[inline]
    pub fn set_mask(&self, irq_index: u8, mask: u32) -> Result<(), CommandError> {
        set_irq_mask(self.io, self.flags, self.token, irq_index, mask)
    }

    /// See [`get_irq_mask`].
    #[inline]
    pub fn mask(&self, irq_index: u8) -> Result<u32, CommandError> {
        get_irq_mask(self.io, self.flags, self.token, irq_index)
    }

    /// See [`get_irq_status`].
    #[inline]
    pub fn status(&self, irq_index: u8, status: u32) -> Result<u32, CommandError> {
        get_irq_status(self.io, self.flags, self.token, irq_index, status)
    }

    /// See [`clear_irq_status`].
    #[inline]
    pub fn clear_status(&self, irq_index: u8, status: u32) -> Result<(), CommandError> {
        clear_irq_status(self.io, self.flags, self.token, irq_index, status)
    }
}
