//! Command ids and layouts shared by every MC object type.
//!
//! Object types reuse the same opcodes for their common operations; the
//! firmware dispatches on the token. Only open and create differ per type.

use mc_cmd::{CommandId, CommandLayout, Field};

pub const CMD_ENABLE: CommandId = CommandId::new(0x002);
pub const CMD_DISABLE: CommandId = CommandId::new(0x003);
pub const CMD_GET_ATTR: CommandId = CommandId::new(0x004);
pub const CMD_RESET: CommandId = CommandId::new(0x005);
pub const CMD_IS_ENABLED: CommandId = CommandId::new(0x006);

pub const CMD_SET_IRQ: CommandId = CommandId::new(0x010);
pub const CMD_GET_IRQ: CommandId = CommandId::new(0x011);
pub const CMD_SET_IRQ_ENABLE: CommandId = CommandId::new(0x012);
pub const CMD_GET_IRQ_ENABLE: CommandId = CommandId::new(0x013);
pub const CMD_SET_IRQ_MASK: CommandId = CommandId::new(0x014);
pub const CMD_GET_IRQ_MASK: CommandId = CommandId::new(0x015);
pub const CMD_GET_IRQ_STATUS: CommandId = CommandId::new(0x016);
pub const CMD_CLEAR_IRQ_STATUS: CommandId = CommandId::new(0x017);

pub const CMD_CLOSE: CommandId = CommandId::new(0x800);
pub const CMD_GET_CONT_ID: CommandId = CommandId::new(0x830);
pub const CMD_GET_VERSION: CommandId = CommandId::new(0x831);
pub const CMD_DESTROY: CommandId = CommandId::new(0x900);

/// Request of every open command: the object id.
pub const OPEN_REQUEST: &[Field] = &[Field::new("object_id", 0, 0, 32)];

/// Layout of an object type's open command.
pub const fn open_layout(name: &'static str, id: CommandId) -> CommandLayout {
    CommandLayout {
        name,
        id,
        request: OPEN_REQUEST,
        response: &[],
    }
}

/// Layout of a command with no request or response fields.
pub const fn bare_layout(name: &'static str, id: CommandId) -> CommandLayout {
    CommandLayout {
        name,
        id,
        request: &[],
        response: &[],
    }
}

pub const CLOSE: CommandLayout = bare_layout("close", CMD_CLOSE);
pub const DESTROY: CommandLayout = bare_layout("destroy", CMD_DESTROY);
pub const ENABLE: CommandLayout = bare_layout("enable", CMD_ENABLE);
pub const DISABLE: CommandLayout = bare_layout("disable", CMD_DISABLE);
pub const RESET: CommandLayout = bare_layout("reset", CMD_RESET);

pub const IS_ENABLED: CommandLayout = CommandLayout {
    name: "is_enabled",
    id: CMD_IS_ENABLED,
    request: &[],
    response: &[Field::new("en", 0, 0, 1)],
};

pub const SET_IRQ: CommandLayout = CommandLayout {
    name: "set_irq",
    id: CMD_SET_IRQ,
    request: &[
        Field::new("irq_index", 0, 0, 8),
        Field::new("irq_val", 0, 32, 32),
        Field::new("irq_addr", 1, 0, 64),
        Field::new("user_irq_id", 2, 0, 32),
    ],
    response: &[],
};

pub const GET_IRQ: CommandLayout = CommandLayout {
    name: "get_irq",
    id: CMD_GET_IRQ,
    request: &[Field::new("irq_index", 0, 32, 8)],
    response: &[
        Field::new("irq_val", 0, 0, 32),
        Field::new("irq_addr", 1, 0, 64),
        Field::new("user_irq_id", 2, 0, 32),
        Field::new("type", 2, 32, 32),
    ],
};

pub const SET_IRQ_ENABLE: CommandLayout = CommandLayout {
    name: "set_irq_enable",
    id: CMD_SET_IRQ_ENABLE,
    request: &[Field::new("en", 0, 0, 8), Field::new("irq_index", 0, 32, 8)],
    response: &[],
};

pub const GET_IRQ_ENABLE: CommandLayout = CommandLayout {
    name: "get_irq_enable",
    id: CMD_GET_IRQ_ENABLE,
    request: &[Field::new("irq_index", 0, 32, 8)],
    response: &[Field::new("en", 0, 0, 8)],
};

pub const SET_IRQ_MASK: CommandLayout = CommandLayout {
    name: "set_irq_mask",
    id: CMD_SET_IRQ_MASK,
    request: &[Field::new("mask", 0, 0, 32), Field::new("irq_index", 0, 32, 8)],
    response: &[],
};

pub const GET_IRQ_MASK: CommandLayout = CommandLayout {
    name: "get_irq_mask",
    id: CMD_GET_IRQ_MASK,
    request: &[Field::new("irq_index", 0, 32, 8)],
    response: &[Field::new("mask", 0, 0, 32)],
};

pub const GET_IRQ_STATUS: CommandLayout = CommandLayout {
    name: "get_irq_status",
    id: CMD_GET_IRQ_STATUS,
    request: &[Field::new("status", 0, 0, 32), Field::new("irq_index", 0, 32, 8)],
    response: &[Field::new("status", 0, 0, 32)],
};

pub const CLEAR_IRQ_STATUS: CommandLayout = CommandLayout {
    name: "clear_irq_status",
    id: CMD_CLEAR_IRQ_STATUS,
    request: &[Field::new("status", 0, 0, 32), Field::new("irq_index", 0, 32, 8)],
    response: &[],
};

pub const GET_CONTAINER_ID: CommandLayout = CommandLayout {
    name: "get_container_id",
    id: CMD_GET_CONT_ID,
    request: &[],
    response: &[Field::new("container_id", 0, 0, 32)],
};

pub const GET_VERSION: CommandLayout = CommandLayout {
    name: "get_version",
    id: CMD_GET_VERSION,
    request: &[],
    response: &[
        Field::new("revision", 0, 0, 32),
        Field::new("major", 0, 32, 32),
        Field::new("minor", 1, 0, 32),
    ],
};
