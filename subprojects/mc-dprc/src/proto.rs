//! DPRC command ids, layouts and protocol types.
//!
//! String fields (object types, labels) do not fit the positional layouts;
//! their first param is given by the `*_PARAM` constants next to each layout.

use mc_cmd::{CommandId, CommandLayout, Field};
use mc_object::{DecodeError, ObjectVersion, proto::open_layout};

use crate::name::Name;

pub const CMD_OPEN: CommandId = CommandId::new(0x805);
pub const CMD_CREATE_CONT: CommandId = CommandId::new(0x151);
pub const CMD_DESTROY_CONT: CommandId = CommandId::new(0x152);
pub const CMD_ASSIGN: CommandId = CommandId::new(0x157);
pub const CMD_UNASSIGN: CommandId = CommandId::new(0x158);
pub const CMD_GET_OBJ_COUNT: CommandId = CommandId::new(0x159);
pub const CMD_GET_OBJ: CommandId = CommandId::new(0x15A);
pub const CMD_GET_RES_COUNT: CommandId = CommandId::new(0x15B);
pub const CMD_GET_RES_IDS: CommandId = CommandId::new(0x15C);
pub const CMD_SET_OBJ_LABEL: CommandId = CommandId::new(0x161);
pub const CMD_CONNECT: CommandId = CommandId::new(0x167);
pub const CMD_DISCONNECT: CommandId = CommandId::new(0x168);
pub const CMD_GET_POOL: CommandId = CommandId::new(0x169);
pub const CMD_GET_POOL_COUNT: CommandId = CommandId::new(0x16A);
pub const CMD_GET_CONNECTION: CommandId = CommandId::new(0x16C);

pub const OPEN: CommandLayout = open_layout("dprc_open", CMD_OPEN);

pub const GET_ATTR: CommandLayout = CommandLayout {
    name: "dprc_get_attributes",
    id: mc_object::proto::CMD_GET_ATTR,
    request: &[],
    response: &[
        Field::new("container_id", 0, 0, 32),
        Field::new("icid", 0, 32, 16),
        Field::new("options", 1, 0, 32),
        Field::new("portal_id", 1, 32, 32),
        Field::new("version_major", 2, 0, 16),
        Field::new("version_minor", 2, 16, 16),
    ],
};

pub const CREATE_CONTAINER: CommandLayout = CommandLayout {
    name: "dprc_create_container",
    id: CMD_CREATE_CONT,
    request: &[
        Field::new("options", 0, 0, 32),
        Field::new("icid", 0, 32, 16),
        Field::new("portal_id", 1, 32, 32),
    ],
    response: &[
        Field::new("child_container_id", 1, 0, 32),
        Field::new("child_portal_paddr", 2, 0, 64),
    ],
};
pub const CREATE_CONTAINER_LABEL_PARAM: usize = 2;

pub const DESTROY_CONTAINER: CommandLayout = CommandLayout {
    name: "dprc_destroy_container",
    id: CMD_DESTROY_CONT,
    request: &[Field::new("child_container_id", 0, 0, 32)],
    response: &[],
};

const RES_REQ: &[Field] = &[
    Field::new("container_id", 0, 0, 32),
    Field::new("options", 0, 32, 32),
    Field::new("num", 1, 0, 32),
    Field::new("id_base_align", 1, 32, 32),
];

pub const ASSIGN: CommandLayout = CommandLayout {
    name: "dprc_assign",
    id: CMD_ASSIGN,
    request: RES_REQ,
    response: &[],
};

pub const UNASSIGN: CommandLayout = CommandLayout {
    name: "dprc_unassign",
    id: CMD_UNASSIGN,
    request: RES_REQ,
    response: &[],
};
pub const RES_REQ_TYPE_PARAM: usize = 2;

pub const GET_OBJ_COUNT: CommandLayout = CommandLayout {
    name: "dprc_get_obj_count",
    id: CMD_GET_OBJ_COUNT,
    request: &[],
    response: &[Field::new("obj_count", 0, 32, 32)],
};

pub const GET_OBJ: CommandLayout = CommandLayout {
    name: "dprc_get_obj",
    id: CMD_GET_OBJ,
    request: &[Field::new("obj_index", 0, 0, 32)],
    response: &[
        Field::new("id", 0, 32, 32),
        Field::new("vendor", 1, 0, 16),
        Field::new("irq_count", 1, 16, 8),
        Field::new("region_count", 1, 24, 8),
        Field::new("state", 1, 32, 32),
        Field::new("version_major", 2, 0, 16),
        Field::new("version_minor", 2, 16, 16),
        Field::new("flags", 2, 32, 16),
    ],
};
pub const GET_OBJ_TYPE_PARAM: usize = 3;
pub const GET_OBJ_LABEL_PARAM: usize = 5;

pub const GET_RES_COUNT: CommandLayout = CommandLayout {
    name: "dprc_get_res_count",
    id: CMD_GET_RES_COUNT,
    request: &[],
    response: &[Field::new("res_count", 0, 0, 32)],
};
pub const GET_RES_COUNT_TYPE_PARAM: usize = 1;

const RES_IDS: &[Field] = &[
    Field::new("iter_status", 0, 42, 7),
    Field::new("base_id", 1, 0, 32),
    Field::new("last_id", 1, 32, 32),
];

pub const GET_RES_IDS: CommandLayout = CommandLayout {
    name: "dprc_get_res_ids",
    id: CMD_GET_RES_IDS,
    request: RES_IDS,
    response: RES_IDS,
};
pub const GET_RES_IDS_TYPE_PARAM: usize = 2;

pub const GET_POOL_COUNT: CommandLayout = CommandLayout {
    name: "dprc_get_pool_count",
    id: CMD_GET_POOL_COUNT,
    request: &[],
    response: &[Field::new("pool_count", 0, 0, 32)],
};

pub const GET_POOL: CommandLayout = CommandLayout {
    name: "dprc_get_pool",
    id: CMD_GET_POOL,
    request: &[Field::new("pool_index", 0, 0, 32)],
    response: &[],
};
pub const GET_POOL_TYPE_PARAM: usize = 1;

pub const SET_OBJ_LABEL: CommandLayout = CommandLayout {
    name: "dprc_set_obj_label",
    id: CMD_SET_OBJ_LABEL,
    request: &[Field::new("obj_id", 0, 0, 32)],
    response: &[],
};
pub const SET_OBJ_LABEL_LABEL_PARAM: usize = 1;
pub const SET_OBJ_LABEL_TYPE_PARAM: usize = 3;

pub const CONNECT: CommandLayout = CommandLayout {
    name: "dprc_connect",
    id: CMD_CONNECT,
    request: &[
        Field::new("ep1_id", 0, 0, 32),
        Field::new("ep1_interface_id", 0, 32, 32),
        Field::new("ep2_id", 1, 0, 32),
        Field::new("ep2_interface_id", 1, 32, 32),
        Field::new("max_rate", 4, 0, 32),
        Field::new("committed_rate", 4, 32, 32),
    ],
    response: &[],
};
pub const CONNECT_EP1_TYPE_PARAM: usize = 2;
pub const CONNECT_EP2_TYPE_PARAM: usize = 5;

pub const DISCONNECT: CommandLayout = CommandLayout {
    name: "dprc_disconnect",
    id: CMD_DISCONNECT,
    request: &[
        Field::new("id", 0, 0, 32),
        Field::new("interface_id", 0, 32, 32),
    ],
    response: &[],
};
pub const DISCONNECT_TYPE_PARAM: usize = 1;

pub const GET_CONNECTION: CommandLayout = CommandLayout {
    name: "dprc_get_connection",
    id: CMD_GET_CONNECTION,
    request: &[
        Field::new("ep1_id", 0, 0, 32),
        Field::new("ep1_interface_id", 0, 32, 32),
    ],
    response: &[
        Field::new("ep2_id", 3, 0, 32),
        Field::new("ep2_interface_id", 3, 32, 32),
        Field::new("state", 6, 0, 32),
    ],
};
pub const GET_CONNECTION_EP1_TYPE_PARAM: usize = 1;
pub const GET_CONNECTION_EP2_TYPE_PARAM: usize = 4;

/// `portal_id` asking the firmware to pick the child's portal from the pool.
pub const PORTAL_ID_FROM_POOL: i32 = -1;

bitflags::bitflags! {
    /// Container creation options.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ContainerOptions: u32 {
        /// The container may spawn child containers.
        const SPAWN_ALLOWED = 0x0000_0001;
        /// The container may allocate resources from its parent.
        const ALLOC_ALLOWED = 0x0000_0002;
        /// The container may create and destroy objects.
        const OBJ_CREATE_ALLOWED = 0x0000_0004;
        /// The container may connect and disconnect objects.
        const TOPOLOGY_CHANGES_ALLOWED = 0x0000_0008;
        /// DMA of the container bypasses the IOMMU.
        const IOMMU_BYPASS = 0x0000_0010;
        /// AIOP container.
        const AIOP = 0x0000_0020;
        /// The container may configure its objects' interrupts.
        const IRQ_CFG_ALLOWED = 0x0000_0040;

        const _ = !0;
    }
}

bitflags::bitflags! {
    /// Resource request options.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ResReqOptions: u32 {
        /// Request the exact ids starting at `id_base_align`.
        const EXPLICIT = 0x0000_0001;
        /// Request contiguous ids aligned to `id_base_align`.
        const CONTIGUOUS = 0x0000_0002;
        /// Assign or unassign objects in the plugged state.
        const PLUGGED = 0x0000_0004;

        const _ = !0;
    }
}

/// Child container creation parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Isolation context id of the child, or 0 to inherit.
    pub icid: u16,
    /// Portal of the child, or [`PORTAL_ID_FROM_POOL`].
    pub portal_id: i32,
    pub options: ContainerOptions,
    pub label: Name,
}

/// A newly created child container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildContainer {
    pub container_id: u32,
    /// Physical address of the child's MC portal.
    pub portal_paddr: u64,
}

/// DPRC attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DprcAttributes {
    pub container_id: u32,
    pub icid: u16,
    pub portal_id: i32,
    pub options: ContainerOptions,
    pub version: ObjectVersion,
}

/// A request to move resources or objects between containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Resource or object type.
    pub res_type: Name,
    /// Number of resources.
    pub num: u32,
    pub options: ResReqOptions,
    /// Base id with [`ResReqOptions::EXPLICIT`], alignment with
    /// [`ResReqOptions::CONTIGUOUS`].
    pub id_base_align: i32,
}

/// Description of an object in a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectDesc {
    pub obj_type: Name,
    pub id: u32,
    pub vendor: u16,
    pub irq_count: u8,
    pub region_count: u8,
    pub state: u32,
    pub version: ObjectVersion,
    pub flags: u16,
    pub label: Name,
}

/// One end of a connection between two objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Endpoint {
    pub obj_type: Name,
    pub id: u32,
    /// Interface of the object, 0 for single-interface objects.
    pub interface_id: u32,
}

/// Rates of a connection, in Mbps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub committed_rate: u32,
    pub max_rate: u32,
}

/// Link state reported for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkState {
    /// The endpoint is not connected.
    NotConnected,
    Down,
    Up,
}

impl LinkState {
    pub fn from_raw(raw: u64) -> Result<Self, DecodeError> {
        match raw as u32 as i32 {
            -1 => Ok(Self::NotConnected),
            0 => Ok(Self::Down),
            1 => Ok(Self::Up),
            _ => Err(DecodeError {
                field: "state",
                value: raw,
            }),
        }
    }
}

/// Position in a resource id iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IterStatus {
    /// Start a new iteration.
    #[default]
    First = 0,
    /// The range is valid and more follow.
    More = 1,
    /// The iteration is complete.
    Last = 2,
}

impl IterStatus {
    pub fn from_raw(raw: u64) -> Result<Self, DecodeError> {
        match raw {
            0 => Ok(Self::First),
            1 => Ok(Self::More),
            2 => Ok(Self::Last),
            value => Err(DecodeError {
                field: "iter_status",
                value,
            }),
        }
    }
}

/// A range of resource ids and the iteration cursor that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResIdRange {
    pub iter_status: IterStatus,
    pub base_id: u32,
    /// Last id of the range, inclusive.
    pub last_id: u32,
}
