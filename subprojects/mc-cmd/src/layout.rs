//! Declarative command layouts.
//!
//! Every MC operation is an opcode plus a set of request fields and a set of
//! response fields, each at a fixed `(param, offset, width)` position. Instead
//! of one hand-written pack/unpack routine per operation, object crates
//! describe each operation once as a [`CommandLayout`] table and use the
//! generic [`CommandLayout::request`] and [`CommandLayout::response`].
//!
//! ```ignore
//! const GET_IRQ_MASK: CommandLayout = CommandLayout {
//!     name: "get_irq_mask",
//!     id: CommandId::new(0x015),
//!     request: &[Field::new("irq_index", 0, 32, 8)],
//!     response: &[Field::new("mask", 0, 0, 32)],
//! };
//!
//! let mut cmd = GET_IRQ_MASK.request(flags, token, &[irq_index.into()]);
//! // ...submit...
//! let [mask] = GET_IRQ_MASK.response(&cmd);
//! ```
//!
//! Fields are validated when the `const` is evaluated, so a descriptor that
//! does not fit in a word is a compile error.

use crate::{
    command::{Command, NUM_PARAMS},
    field,
    header::{CommandFlags, CommandId, Token},
};

/// Position of one field within the command params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Field name, for diagnostics.
    pub name: &'static str,
    /// Param index (`0..NUM_PARAMS`); param `i` is command word `i + 1`.
    pub param: u8,
    /// Bit offset inside the param word.
    pub offset: u8,
    /// Width in bits.
    pub width: u8,
}

impl Field {
    /// Creates a field descriptor.
    ///
    /// Panics (at compile time in a `const`) if the field does not fit in its
    /// param word or the param index is out of range.
    pub const fn new(name: &'static str, param: u8, offset: u8, width: u8) -> Self {
        assert!((param as usize) < NUM_PARAMS, "param index out of range");
        assert!(
            field::fits(offset as u32, width as u32),
            "field does not fit in a command word"
        );
        Self {
            name,
            param,
            offset,
            width,
        }
    }

    /// Writes `value` into this field of `cmd`.
    #[inline]
    pub fn set(&self, cmd: &mut Command, value: u64) {
        cmd.pack(self.param as usize, self.offset as u32, self.width as u32, value);
    }

    /// Reads this field of `cmd`, zero-extended.
    #[inline]
    pub fn get(&self, cmd: &Command) -> u64 {
        cmd.unpack(self.param as usize, self.offset as u32, self.width as u32)
    }

    /// Reads this field of `cmd`, sign-extended.
    #[inline]
    pub fn get_signed(&self, cmd: &Command) -> i64 {
        field::unpack_signed(
            cmd.params[self.param as usize],
            self.offset as u32,
            self.width as u32,
        )
    }
}

/// Opcode and field tables of one MC operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandLayout {
    /// Operation name, used to annotate errors and logs.
    pub name: &'static str,
    /// Command id.
    pub id: CommandId,
    /// Request fields, in argument order.
    pub request: &'static [Field],
    /// Response fields, in result order.
    pub response: &'static [Field],
}

impl CommandLayout {
    /// Builds a request, packing `args` into the request fields in order.
    ///
    /// `args.len()` must equal the number of request fields.
    pub fn request(&self, flags: CommandFlags, token: Token, args: &[u64]) -> Command {
        debug_assert_eq!(
            args.len(),
            self.request.len(),
            "wrong number of arguments for {}",
            self.name
        );

        let mut cmd = Command::new(self.id, token, flags);
        for (field, value) in self.request.iter().zip(args) {
            field.set(&mut cmd, *value);
        }
        cmd
    }

    /// Unpacks the response fields of a completed command, in order.
    ///
    /// `N` must equal the number of response fields.
    pub fn response<const N: usize>(&self, cmd: &Command) -> [u64; N] {
        debug_assert_eq!(
            N,
            self.response.len(),
            "wrong number of results for {}",
            self.name
        );

        let mut out = [0u64; N];
        for (slot, field) in out.iter_mut().zip(self.response) {
            *slot = field.get(cmd);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header;

    const SET_IRQ: CommandLayout = CommandLayout {
        name: "set_irq",
        id: CommandId::new(0x010),
        request: &[
            Field::new("irq_index", 0, 0, 8),
            Field::new("irq_val", 0, 32, 32),
            Field::new("irq_addr", 1, 0, 64),
            Field::new("user_irq_id", 2, 0, 32),
        ],
        response: &[],
    };

    const GET_IRQ: CommandLayout = CommandLayout {
        name: "get_irq",
        id: CommandId::new(0x011),
        request: &[Field::new("irq_index", 0, 32, 8)],
        response: &[
            Field::new("irq_val", 0, 0, 32),
            Field::new("irq_addr", 1, 0, 64),
            Field::new("user_irq_id", 2, 0, 32),
            Field::new("type", 2, 32, 32),
        ],
    };

    #[test]
    fn test_request_packs_fields_in_order() {
        let cmd = SET_IRQ.request(
            CommandFlags::empty(),
            Token::from_raw(0x42),
            &[3, 0xCAFE, 0x8_0000_1000, 17],
        );

        assert_eq!(cmd.params[0], (0xCAFE << 32) | 3);
        assert_eq!(cmd.params[1], 0x8_0000_1000);
        assert_eq!(cmd.params[2], 17);
        assert_eq!(cmd.params[3..], [0; 4]);
        assert_eq!(header::decode_token(cmd.header), Token::from_raw(0x42));
        assert_eq!(cmd.command_id(), CommandId::new(0x010));
    }

    #[test]
    fn test_request_truncates_oversized_argument() {
        let cmd = SET_IRQ.request(CommandFlags::empty(), Token::NONE, &[0x1FF, 0, 0, 0]);
        assert_eq!(cmd.params[0], 0xFF);
    }

    #[test]
    fn test_response_unpacks_fields_in_order() {
        let mut cmd = GET_IRQ.request(CommandFlags::empty(), Token::from_raw(1), &[2]);
        cmd.params[0] = 0x0000_0002_0000_BEEF;
        cmd.params[1] = 0xFFFF_0000_1234_0000;
        cmd.params[2] = (1 << 32) | 99;

        let [val, addr, user_id, kind] = GET_IRQ.response(&cmd);
        assert_eq!(val, 0xBEEF);
        assert_eq!(addr, 0xFFFF_0000_1234_0000);
        assert_eq!(user_id, 99);
        assert_eq!(kind, 1);
    }

    #[test]
    fn test_get_signed() {
        let field = Field::new("user_irq_id", 2, 0, 32);
        let mut cmd = Command::default();
        field.set(&mut cmd, (-1i32) as u32 as u64);
        assert_eq!(field.get_signed(&cmd), -1);
        assert_eq!(field.get(&cmd), 0xFFFF_FFFF);
    }
}
