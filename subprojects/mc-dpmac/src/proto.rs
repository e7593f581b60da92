//! DPMAC command ids, layouts and protocol types.

use mc_cmd::{CommandId, CommandLayout, Field};
use mc_object::{DecodeError, ObjectVersion, proto::open_layout};

pub const CMD_OPEN: CommandId = CommandId::new(0x80c);
pub const CMD_CREATE: CommandId = CommandId::new(0x90c);
pub const CMD_GET_COUNTER: CommandId = CommandId::new(0x0c4);

pub const OPEN: CommandLayout = open_layout("dpmac_open", CMD_OPEN);

pub const CREATE: CommandLayout = CommandLayout {
    name: "dpmac_create",
    id: CMD_CREATE,
    request: &[Field::new("mac_id", 0, 0, 32)],
    response: &[],
};

pub const GET_ATTR: CommandLayout = CommandLayout {
    name: "dpmac_get_attributes",
    id: mc_object::proto::CMD_GET_ATTR,
    request: &[],
    response: &[
        Field::new("phy_id", 0, 0, 32),
        Field::new("id", 0, 32, 32),
        Field::new("version_major", 1, 0, 16),
        Field::new("version_minor", 1, 16, 16),
        Field::new("link_type", 1, 32, 8),
        Field::new("eth_if", 1, 40, 8),
        Field::new("max_rate", 2, 0, 32),
    ],
};

pub const GET_COUNTER: CommandLayout = CommandLayout {
    name: "dpmac_get_counter",
    id: CMD_GET_COUNTER,
    request: &[Field::new("type", 0, 0, 8)],
    response: &[Field::new("counter", 1, 0, 64)],
};

/// How the MAC is connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LinkType {
    #[default]
    None = 0,
    /// Link parameters are fixed.
    Fixed = 1,
    /// Link is managed through a PHY.
    Phy = 2,
    /// Backplane link.
    Backplane = 3,
}

impl LinkType {
    pub fn from_raw(raw: u64) -> Result<Self, DecodeError> {
        Ok(match raw {
            0 => Self::None,
            1 => Self::Fixed,
            2 => Self::Phy,
            3 => Self::Backplane,
            value => {
                return Err(DecodeError {
                    field: "link_type",
                    value,
                });
            }
        })
    }
}

/// Ethernet interface between the MAC and the PHY.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EthIf {
    #[default]
    Mii = 0,
    Rmii = 1,
    Smii = 2,
    Gmii = 3,
    Rgmii = 4,
    Sgmii = 5,
    Qsgmii = 6,
    Xaui = 7,
    Xfi = 8,
    Caui = 9,
    Base1000X = 10,
    Usxgmii = 11,
}

impl EthIf {
    pub fn from_raw(raw: u64) -> Result<Self, DecodeError> {
        Ok(match raw {
            0 => Self::Mii,
            1 => Self::Rmii,
            2 => Self::Smii,
            3 => Self::Gmii,
            4 => Self::Rgmii,
            5 => Self::Sgmii,
            6 => Self::Qsgmii,
            7 => Self::Xaui,
            8 => Self::Xfi,
            9 => Self::Caui,
            10 => Self::Base1000X,
            11 => Self::Usxgmii,
            value => {
                return Err(DecodeError {
                    field: "eth_if",
                    value,
                });
            }
        })
    }
}

/// MAC statistics counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Counter {
    /// Received frames of 64 bytes.
    IngFrame64 = 0,
    /// Received frames of 65-127 bytes.
    IngFrame127 = 1,
    /// Received frames of 128-255 bytes.
    IngFrame255 = 2,
    /// Received frames of 256-511 bytes.
    IngFrame511 = 3,
    /// Received frames of 512-1023 bytes.
    IngFrame1023 = 4,
    /// Received frames of 1024-1518 bytes.
    IngFrame1518 = 5,
    /// Received frames of 1519 bytes up to the maximum frame length.
    IngFrame1519Max = 6,
    /// Received fragments.
    IngFrag = 7,
    /// Received jabber frames.
    IngJabber = 8,
    /// Received frames discarded.
    IngFrameDiscard = 9,
    /// Received frames with alignment errors.
    IngAlignErr = 10,
    /// Sent undersized frames.
    EgrUndersized = 11,
    /// Received oversized frames.
    IngOversized = 12,
    IngValidPauseFrame = 13,
    EgrValidPauseFrame = 14,
    IngByte = 15,
    IngMcastFrame = 16,
    IngBcastFrame = 17,
    IngAllFrame = 18,
    IngUcastFrame = 19,
    IngErrFrame = 20,
    EgrByte = 21,
    EgrMcastFrame = 22,
    EgrBcastFrame = 23,
    EgrUcastFrame = 24,
    EgrErrFrame = 25,
    IngGoodFrame = 26,
    EgrGoodFrame = 27,
}

/// DPMAC creation parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpmacConfig {
    /// Hardware MAC id.
    pub mac_id: u32,
}

/// DPMAC attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DpmacAttributes {
    pub id: u32,
    pub phy_id: u32,
    pub version: ObjectVersion,
    pub link_type: LinkType,
    pub eth_if: EthIf,
    /// Maximum supported rate, in Mbps.
    pub max_rate: u32,
}
