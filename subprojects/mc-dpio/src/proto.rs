//! DPIO command ids, layouts and protocol types.

use mc_cmd::{CommandId, CommandLayout, Field};
use mc_object::{DecodeError, ObjectVersion, proto::open_layout};

pub const CMD_OPEN: CommandId = CommandId::new(0x803);
pub const CMD_CREATE: CommandId = CommandId::new(0x903);

pub const OPEN: CommandLayout = open_layout("dpio_open", CMD_OPEN);

pub const CREATE: CommandLayout = CommandLayout {
    name: "dpio_create",
    id: CMD_CREATE,
    request: &[
        Field::new("channel_mode", 0, 16, 2),
        Field::new("num_priorities", 0, 32, 8),
    ],
    response: &[],
};

pub const GET_ATTR: CommandLayout = CommandLayout {
    name: "dpio_get_attributes",
    id: mc_object::proto::CMD_GET_ATTR,
    request: &[],
    response: &[
        Field::new("id", 0, 0, 32),
        Field::new("qbman_portal_id", 0, 32, 16),
        Field::new("num_priorities", 0, 48, 8),
        Field::new("channel_mode", 0, 56, 4),
        Field::new("qbman_portal_ce_paddr", 1, 0, 64),
        Field::new("qbman_portal_ci_paddr", 2, 0, 64),
        Field::new("version_major", 3, 0, 16),
        Field::new("version_minor", 3, 16, 16),
    ],
};

/// Notification channel mode of a DPIO.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelMode {
    /// No notification channel.
    #[default]
    None = 0,
    /// Data availability notifications are received on a channel dedicated to
    /// this DPIO.
    Local = 1,
}

impl ChannelMode {
    /// Converts a raw response field.
    pub fn from_raw(raw: u64) -> Result<Self, DecodeError> {
        match raw {
            0 => Ok(Self::None),
            1 => Ok(Self::Local),
            value => Err(DecodeError {
                field: "channel_mode",
                value,
            }),
        }
    }

    /// Returns the raw field value.
    pub const fn to_raw(self) -> u8 {
        self as u8
    }
}

/// DPIO creation parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpioConfig {
    pub channel_mode: ChannelMode,
    /// Priorities of the notification channel (1-8); only relevant with
    /// [`ChannelMode::Local`].
    pub num_priorities: u8,
}

/// DPIO attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpioAttributes {
    /// Object id.
    pub id: u32,
    pub version: ObjectVersion,
    /// Physical address of the software portal cache-enabled area.
    pub qbman_portal_ce_paddr: u64,
    /// Physical address of the software portal cache-inhibited area.
    pub qbman_portal_ci_paddr: u64,
    /// Software portal id.
    pub qbman_portal_id: u16,
    pub channel_mode: ChannelMode,
    pub num_priorities: u8,
}
