//! DPRC (Data Path Resource Container) object API.
//!
//! A DPRC is a container of MC objects and resources. Every MC portal belongs
//! to one container; a container can create child containers and move
//! objects and resources between itself and its children.
//!
//! ```text
//! root DPRC (id 1)
//!  ├── dpmcp.1, dpio.0, dpmac.3, ...
//!  └── child DPRC (id 2)
//!       └── dpmcp.2, dpni.0, dpbp.1, ...
//! ```
//!
//! Objects and resources are addressed by type string and id. Type strings
//! and labels are [`Name`]s of at most 15 bytes.
//!
//! ```ignore
//! let id = mc_dprc::get_container_id(&io, CommandFlags::empty())?;
//! let dprc = Dprc::open(&io, id)?;
//! for obj in dprc.objects()? {
//!     let obj = obj?;
//!     log::info!("{}.{}", obj.obj_type, obj.id);
//! }
//! dprc.close()?;
//! ```

#![no_std]

#[cfg(test)]
extern crate std;

use mc_cmd::{CommandFlags, Token};
use mc_object::{CommandError, IrqControl, Object};
use mc_portal::Transport;

pub mod cmd;
mod iter;
mod name;
mod proto;

pub use mc_object::get_container_id;

pub use self::{
    cmd::{GetConnectionError, GetResIdsError},
    iter::{Objects, Pools, ResIdRanges},
    name::{NAME_LEN, Name, NameTooLong},
    proto::{
        CMD_ASSIGN, CMD_CONNECT, CMD_CREATE_CONT, CMD_DESTROY_CONT, CMD_DISCONNECT,
        CMD_GET_CONNECTION, CMD_GET_OBJ, CMD_GET_OBJ_COUNT, CMD_GET_POOL, CMD_GET_POOL_COUNT,
        CMD_GET_RES_COUNT, CMD_GET_RES_IDS, CMD_OPEN, CMD_SET_OBJ_LABEL, CMD_UNASSIGN,
        ChildContainer, ConnectionConfig, ContainerConfig, ContainerOptions, DprcAttributes,
        Endpoint, IterStatus, LinkState, ObjectDesc, PORTAL_ID_FROM_POOL, ResIdRange,
        ResReqOptions, ResourceRequest,
    },
};

/// An open DPRC session.
#[derive(Debug)]
#[repr(transparent)]
pub struct Dprc<'a, T: ?Sized>(Object<'a, T>);

impl<'a, T> Dprc<'a, T>
where
    T: Transport + ?Sized,
{
    /// Opens a session to container `container_id`.
    pub fn open(io: &'a T, container_id: u32) -> Result<Self, CommandError> {
        let token = cmd::open(io, CommandFlags::empty(), container_id)?;
        Ok(Self::from_token(io, token))
    }

    /// Wraps a token obtained elsewhere.
    pub fn from_token(io: &'a T, token: Token) -> Self {
        Self(Object::from_token(io, token))
    }

    /// Sets the flags sent with every later command of this session.
    pub fn with_flags(self, flags: CommandFlags) -> Self {
        Self(self.0.with_flags(flags))
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.0.token()
    }

    #[inline]
    pub fn object(&self) -> &Object<'a, T> {
        &self.0
    }

    /// Closes the session.
    #[inline]
    pub fn close(self) -> Result<(), CommandError> {
        self.0.close()
    }

    #[inline]
    pub fn get_attributes(&self) -> Result<DprcAttributes, CommandError> {
        cmd::get_attributes(self.0.io(), self.0.flags(), self.0.token())
    }

    #[inline]
    pub fn create_container(&self, cfg: &ContainerConfig) -> Result<ChildContainer, CommandError> {
        cmd::create_container(self.0.io(), self.0.flags(), self.0.token(), cfg)
    }

    #[inline]
    pub fn destroy_container(&self, child_container_id: u32) -> Result<(), CommandError> {
        cmd::destroy_container(self.0.io(), self.0.flags(), self.0.token(), child_container_id)
    }

    #[inline]
    pub fn assign(&self, container_id: u32, req: &ResourceRequest) -> Result<(), CommandError> {
        cmd::assign(self.0.io(), self.0.flags(), self.0.token(), container_id, req)
    }

    #[inline]
    pub fn unassign(&self, container_id: u32, req: &ResourceRequest) -> Result<(), CommandError> {
        cmd::unassign(self.0.io(), self.0.flags(), self.0.token(), container_id, req)
    }

    #[inline]
    pub fn get_obj_count(&self) -> Result<u32, CommandError> {
        cmd::get_obj_count(self.0.io(), self.0.flags(), self.0.token())
    }

    #[inline]
    pub fn get_obj(&self, obj_index: u32) -> Result<ObjectDesc, CommandError> {
        cmd::get_obj(self.0.io(), self.0.flags(), self.0.token(), obj_index)
    }

    /// Iterates over the objects of the container.
    ///
    /// The object count is read once, up front. Objects added or removed
    /// during the iteration shift the indexes.
    pub fn objects(&self) -> Result<Objects<'a, T>, CommandError> {
        let count = self.get_obj_count()?;
        Ok(Objects::new(self.0.io(), self.0.flags(), self.0.token(), count))
    }

    #[inline]
    pub fn get_res_count(&self, res_type: &Name) -> Result<u32, CommandError> {
        cmd::get_res_count(self.0.io(), self.0.flags(), self.0.token(), res_type)
    }

    #[inline]
    pub fn get_res_ids(
        &self,
        res_type: &Name,
        range: &ResIdRange,
    ) -> Result<ResIdRange, GetResIdsError> {
        cmd::get_res_ids(self.0.io(), self.0.flags(), self.0.token(), res_type, range)
    }

    /// Iterates over the free id ranges of `res_type`.
    pub fn res_id_ranges(&self, res_type: Name) -> ResIdRanges<'a, T> {
        ResIdRanges::new(self.0.io(), self.0.flags(), self.0.token(), res_type)
    }

    #[inline]
    pub fn get_pool_count(&self) -> Result<u32, CommandError> {
        cmd::get_pool_count(self.0.io(), self.0.flags(), self.0.token())
    }

    #[inline]
    pub fn get_pool(&self, pool_index: u32) -> Result<Name, CommandError> {
        cmd::get_pool(self.0.io(), self.0.flags(), self.0.token(), pool_index)
    }

    /// Iterates over the resource types of the container's pools.
    pub fn pools(&self) -> Result<Pools<'a, T>, CommandError> {
        let count = self.get_pool_count()?;
        Ok(Pools::new(self.0.io(), self.0.flags(), self.0.token(), count))
    }

    #[inline]
    pub fn set_obj_label(
        &self,
        obj_type: &Name,
        obj_id: u32,
        label: &Name,
    ) -> Result<(), CommandError> {
        cmd::set_obj_label(self.0.io(), self.0.flags(), self.0.token(), obj_type, obj_id, label)
    }

    #[inline]
    pub fn connect(
        &self,
        endpoint1: &Endpoint,
        endpoint2: &Endpoint,
        cfg: &ConnectionConfig,
    ) -> Result<(), CommandError> {
        cmd::connect(self.0.io(), self.0.flags(), self.0.token(), endpoint1, endpoint2, cfg)
    }

    #[inline]
    pub fn disconnect(&self, endpoint: &Endpoint) -> Result<(), CommandError> {
        cmd::disconnect(self.0.io(), self.0.flags(), self.0.token(), endpoint)
    }

    #[inline]
    pub fn get_connection(
        &self,
        endpoint1: &Endpoint,
    ) -> Result<(Endpoint, LinkState), GetConnectionError> {
        cmd::get_connection(self.0.io(), self.0.flags(), self.0.token(), endpoint1)
    }

    #[inline]
    pub fn irq(&self) -> IrqControl<'a, T> {
        self.0.irq()
    }
}
