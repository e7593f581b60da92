//! DPCON command ids, layouts and protocol types.

use mc_cmd::{CommandId, CommandLayout, Field};
use mc_object::{ObjectVersion, proto::open_layout};

pub const CMD_OPEN: CommandId = CommandId::new(0x808);
pub const CMD_CREATE: CommandId = CommandId::new(0x908);

pub const OPEN: CommandLayout = open_layout("dpcon_open", CMD_OPEN);

pub const CREATE: CommandLayout = CommandLayout {
    name: "dpcon_create",
    id: CMD_CREATE,
    request: &[Field::new("num_priorities", 0, 0, 8)],
    response: &[],
};

pub const GET_ATTR: CommandLayout = CommandLayout {
    name: "dpcon_get_attributes",
    id: mc_object::proto::CMD_GET_ATTR,
    request: &[],
    response: &[
        Field::new("id", 0, 0, 32),
        Field::new("qbman_ch_id", 0, 32, 16),
        Field::new("num_priorities", 0, 48, 8),
        Field::new("version_major", 1, 0, 16),
        Field::new("version_minor", 1, 16, 16),
    ],
};

/// DPCON creation parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpconConfig {
    /// Number of priorities of the channel (1-8).
    pub num_priorities: u8,
}

/// DPCON attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpconAttributes {
    pub id: u32,
    pub version: ObjectVersion,
    /// Queue manager channel id.
    pub qbman_ch_id: u16,
    pub num_priorities: u8,
}
