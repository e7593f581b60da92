//! DPRC commands.
//!
//! Free functions taking the portal, flags and token explicitly. [`Dprc`]
//! wraps them for an open session.
//!
//! [`Dprc`]: crate::Dprc

use mc_cmd::{CommandFlags, Token};
use mc_object::{CommandError, DecodeError, ObjectVersion, execute, submit};
use mc_portal::Transport;

use crate::{
    name::Name,
    proto::{
        ASSIGN, CONNECT, CONNECT_EP1_TYPE_PARAM, CONNECT_EP2_TYPE_PARAM, CREATE_CONTAINER,
        CREATE_CONTAINER_LABEL_PARAM, ChildContainer, ConnectionConfig, ContainerConfig,
        ContainerOptions, DESTROY_CONTAINER, DISCONNECT, DISCONNECT_TYPE_PARAM, DprcAttributes,
        Endpoint, GET_ATTR, GET_CONNECTION, GET_CONNECTION_EP1_TYPE_PARAM,
        GET_CONNECTION_EP2_TYPE_PARAM, GET_OBJ, GET_OBJ_COUNT, GET_OBJ_LABEL_PARAM,
        GET_OBJ_TYPE_PARAM, GET_POOL, GET_POOL_COUNT, GET_POOL_TYPE_PARAM, GET_RES_COUNT,
        GET_RES_COUNT_TYPE_PARAM, GET_RES_IDS, GET_RES_IDS_TYPE_PARAM, IterStatus, LinkState,
        OPEN, ObjectDesc, RES_REQ_TYPE_PARAM, ResIdRange, ResourceRequest, SET_OBJ_LABEL,
        SET_OBJ_LABEL_LABEL_PARAM, SET_OBJ_LABEL_TYPE_PARAM, UNASSIGN,
    },
};

/// Opens a session to container `container_id`.
pub fn open<T>(io: &T, flags: CommandFlags, container_id: u32) -> Result<Token, CommandError>
where
    T: Transport + ?Sized,
{
    mc_object::open(io, &OPEN, flags, container_id)
}

/// Retrieves the container attributes.
pub fn get_attributes<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
) -> Result<DprcAttributes, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_ATTR, flags, token, &[])?;
    let [container_id, icid, options, portal_id, major, minor] = GET_ATTR.response(&cmd);
    Ok(DprcAttributes {
        container_id: container_id as u32,
        icid: icid as u16,
        portal_id: portal_id as u32 as i32,
        options: ContainerOptions::from_bits_retain(options as u32),
        version: ObjectVersion::from_fields(major, minor),
    })
}

/// Creates a child container.
pub fn create_container<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    cfg: &ContainerConfig,
) -> Result<ChildContainer, CommandError>
where
    T: Transport + ?Sized,
{
    let mut cmd = CREATE_CONTAINER.request(
        flags,
        token,
        &[
            cfg.options.bits().into(),
            cfg.icid.into(),
            (cfg.portal_id as u32).into(),
        ],
    );
    cfg.label.pack(&mut cmd.params[CREATE_CONTAINER_LABEL_PARAM..]);
    submit(io, CREATE_CONTAINER.name, &mut cmd)?;

    let [container_id, portal_paddr] = CREATE_CONTAINER.response(&cmd);
    Ok(ChildContainer {
        container_id: container_id as u32,
        portal_paddr,
    })
}

/// Destroys child container `child_container_id` and everything in it.
pub fn destroy_container<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    child_container_id: u32,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    execute(
        io,
        &DESTROY_CONTAINER,
        flags,
        token,
        &[child_container_id.into()],
    )?;
    Ok(())
}

fn resource_request<T>(
    io: &T,
    layout: &mc_cmd::CommandLayout,
    flags: CommandFlags,
    token: Token,
    container_id: u32,
    req: &ResourceRequest,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    let mut cmd = layout.request(
        flags,
        token,
        &[
            container_id.into(),
            req.options.bits().into(),
            req.num.into(),
            (req.id_base_align as u32).into(),
        ],
    );
    req.res_type.pack(&mut cmd.params[RES_REQ_TYPE_PARAM..]);
    submit(io, layout.name, &mut cmd)
}

/// Moves resources or objects from this container to `container_id`.
///
/// `container_id` is a child of this container, or this container itself to
/// allocate from the parent.
pub fn assign<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    container_id: u32,
    req: &ResourceRequest,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    resource_request(io, &ASSIGN, flags, token, container_id, req)
}

/// Moves resources or objects from child `container_id` back to this
/// container.
pub fn unassign<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    container_id: u32,
    req: &ResourceRequest,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    resource_request(io, &UNASSIGN, flags, token, container_id, req)
}

/// Number of objects in the container.
pub fn get_obj_count<T>(io: &T, flags: CommandFlags, token: Token) -> Result<u32, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_OBJ_COUNT, flags, token, &[])?;
    let [count] = GET_OBJ_COUNT.response(&cmd);
    Ok(count as u32)
}

/// Describes the object at `obj_index` (`0..get_obj_count()`).
pub fn get_obj<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    obj_index: u32,
) -> Result<ObjectDesc, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_OBJ, flags, token, &[obj_index.into()])?;
    let [id, vendor, irq_count, region_count, state, major, minor, obj_flags] =
        GET_OBJ.response(&cmd);
    Ok(ObjectDesc {
        obj_type: Name::unpack(&cmd.params[GET_OBJ_TYPE_PARAM..]),
        id: id as u32,
        vendor: vendor as u16,
        irq_count: irq_count as u8,
        region_count: region_count as u8,
        state: state as u32,
        version: ObjectVersion::from_fields(major, minor),
        flags: obj_flags as u16,
        label: Name::unpack(&cmd.params[GET_OBJ_LABEL_PARAM..]),
    })
}

/// Number of free resources of `res_type` in the container.
pub fn get_res_count<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    res_type: &Name,
) -> Result<u32, CommandError>
where
    T: Transport + ?Sized,
{
    let mut cmd = GET_RES_COUNT.request(flags, token, &[]);
    res_type.pack(&mut cmd.params[GET_RES_COUNT_TYPE_PARAM..]);
    submit(io, GET_RES_COUNT.name, &mut cmd)?;

    let [count] = GET_RES_COUNT.response(&cmd);
    Ok(count as u32)
}

/// Fetches the next range of free ids of `res_type`.
///
/// Start with a default `range` ([`IterStatus::First`]) and pass each result
/// back until it reports [`IterStatus::Last`]; see also
/// [`Dprc::res_id_ranges`](crate::Dprc::res_id_ranges).
pub fn get_res_ids<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    res_type: &Name,
    range: &ResIdRange,
) -> Result<ResIdRange, GetResIdsError>
where
    T: Transport + ?Sized,
{
    let mut cmd = GET_RES_IDS.request(
        flags,
        token,
        &[
            range.iter_status as u64,
            range.base_id.into(),
            range.last_id.into(),
        ],
    );
    res_type.pack(&mut cmd.params[GET_RES_IDS_TYPE_PARAM..]);
    submit(io, GET_RES_IDS.name, &mut cmd).map_err(GetResIdsError::Command)?;

    let [iter_status, base_id, last_id] = GET_RES_IDS.response(&cmd);
    Ok(ResIdRange {
        iter_status: IterStatus::from_raw(iter_status).map_err(GetResIdsError::Decode)?,
        base_id: base_id as u32,
        last_id: last_id as u32,
    })
}

/// Error returned by [`get_res_ids`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GetResIdsError {
    #[error("failed to get resource ids")]
    Command(#[source] CommandError),
    #[error("invalid resource id range")]
    Decode(#[source] DecodeError),
}

/// Number of resource pools in the container.
pub fn get_pool_count<T>(io: &T, flags: CommandFlags, token: Token) -> Result<u32, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_POOL_COUNT, flags, token, &[])?;
    let [count] = GET_POOL_COUNT.response(&cmd);
    Ok(count as u32)
}

/// Resource type of the pool at `pool_index` (`0..get_pool_count()`).
pub fn get_pool<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    pool_index: u32,
) -> Result<Name, CommandError>
where
    T: Transport + ?Sized,
{
    let cmd = execute(io, &GET_POOL, flags, token, &[pool_index.into()])?;
    Ok(Name::unpack(&cmd.params[GET_POOL_TYPE_PARAM..]))
}

/// Sets the label of object `obj_type`/`obj_id` in the container.
pub fn set_obj_label<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    obj_type: &Name,
    obj_id: u32,
    label: &Name,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    let mut cmd = SET_OBJ_LABEL.request(flags, token, &[obj_id.into()]);
    label.pack(&mut cmd.params[SET_OBJ_LABEL_LABEL_PARAM..]);
    obj_type.pack(&mut cmd.params[SET_OBJ_LABEL_TYPE_PARAM..]);
    submit(io, SET_OBJ_LABEL.name, &mut cmd)
}

/// Connects two objects.
pub fn connect<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    endpoint1: &Endpoint,
    endpoint2: &Endpoint,
    cfg: &ConnectionConfig,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    let mut cmd = CONNECT.request(
        flags,
        token,
        &[
            endpoint1.id.into(),
            endpoint1.interface_id.into(),
            endpoint2.id.into(),
            endpoint2.interface_id.into(),
            cfg.max_rate.into(),
            cfg.committed_rate.into(),
        ],
    );
    endpoint1.obj_type.pack(&mut cmd.params[CONNECT_EP1_TYPE_PARAM..]);
    endpoint2.obj_type.pack(&mut cmd.params[CONNECT_EP2_TYPE_PARAM..]);
    submit(io, CONNECT.name, &mut cmd)
}

/// Removes the connection of `endpoint`.
pub fn disconnect<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    endpoint: &Endpoint,
) -> Result<(), CommandError>
where
    T: Transport + ?Sized,
{
    let mut cmd = DISCONNECT.request(
        flags,
        token,
        &[endpoint.id.into(), endpoint.interface_id.into()],
    );
    endpoint.obj_type.pack(&mut cmd.params[DISCONNECT_TYPE_PARAM..]);
    submit(io, DISCONNECT.name, &mut cmd)
}

/// Returns the endpoint connected to `endpoint1` and the link state.
pub fn get_connection<T>(
    io: &T,
    flags: CommandFlags,
    token: Token,
    endpoint1: &Endpoint,
) -> Result<(Endpoint, LinkState), GetConnectionError>
where
    T: Transport + ?Sized,
{
    let mut cmd = GET_CONNECTION.request(
        flags,
        token,
        &[endpoint1.id.into(), endpoint1.interface_id.into()],
    );
    endpoint1.obj_type.pack(&mut cmd.params[GET_CONNECTION_EP1_TYPE_PARAM..]);
    submit(io, GET_CONNECTION.name, &mut cmd).map_err(GetConnectionError::Command)?;

    let [id, interface_id, state] = GET_CONNECTION.response(&cmd);
    let endpoint2 = Endpoint {
        obj_type: Name::unpack(&cmd.params[GET_CONNECTION_EP2_TYPE_PARAM..]),
        id: id as u32,
        interface_id: interface_id as u32,
    };
    let state = LinkState::from_raw(state).map_err(GetConnectionError::Decode)?;
    Ok((endpoint2, state))
}

/// Error returned by [`get_connection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GetConnectionError {
    #[error("failed to get connection")]
    Command(#[source] CommandError),
    #[error("invalid connection state")]
    Decode(#[source] DecodeError),
}

#[cfg(test)]
mod tests {
    use mc_cmd::{Command, McStatus};
    use mc_portal::fake::{FakeFirmware, set_status};

    use super::*;
    use crate::proto::{
        CMD_ASSIGN, CMD_CONNECT, CMD_CREATE_CONT, CMD_GET_RES_IDS, CMD_SET_OBJ_LABEL,
        PORTAL_ID_FROM_POOL, ResReqOptions,
    };

    const TOKEN: Token = Token::from_raw(0x0E0E);

    fn word(s: &[u8; 8]) -> u64 {
        u64::from_le_bytes(*s)
    }

    fn accept_all() -> FakeFirmware {
        FakeFirmware::new(|cmd: &mut Command| set_status(cmd, McStatus::Ok))
    }

    #[test]
    fn test_create_container_layout() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[1] = 4;
            cmd.params[2] = 0x0000_0008_0C00_0000;
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let cfg = ContainerConfig {
            icid: 0x20,
            portal_id: PORTAL_ID_FROM_POOL,
            options: ContainerOptions::ALLOC_ALLOWED | ContainerOptions::OBJ_CREATE_ALLOWED,
            label: Name::new("child"),
        };
        let child = create_container(&io, CommandFlags::empty(), TOKEN, &cfg).unwrap();
        assert_eq!(
            child,
            ChildContainer {
                container_id: 4,
                portal_paddr: 0x0000_0008_0C00_0000,
            }
        );

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CMD_CREATE_CONT);
        assert_eq!(req.token(), TOKEN);
        assert_eq!(req.params[0], (0x20 << 32) | 0x6);
        assert_eq!(req.params[1], 0xFFFF_FFFF << 32);
        assert_eq!(req.params[2], word(b"child\0\0\0"));
        assert_eq!(req.params[3], 0);
    }

    #[test]
    fn test_assign_layout() {
        let fw = accept_all();
        let journal = fw.journal();
        let io = fw.into_io();

        let req = ResourceRequest {
            res_type: Name::new("dpbp"),
            num: 2,
            options: ResReqOptions::EXPLICIT,
            id_base_align: 8,
        };
        assign(&io, CommandFlags::empty(), TOKEN, 3, &req).unwrap();

        let sent = journal.last_request().unwrap();
        assert_eq!(sent.command_id(), CMD_ASSIGN);
        assert_eq!(sent.params[0], (1 << 32) | 3);
        assert_eq!(sent.params[1], (8 << 32) | 2);
        assert_eq!(sent.params[2], word(b"dpbp\0\0\0\0"));
    }

    #[test]
    fn test_get_obj_decodes_strings() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            assert_eq!(cmd.params[0], 2);
            cmd.params[0] = 7 << 32;
            cmd.params[1] = (1 << 32) | (3 << 24) | (4 << 16) | 0x1957;
            cmd.params[2] = (0x1 << 32) | (2 << 16) | 5;
            cmd.params[3] = u64::from_le_bytes(*b"dpni\0\0\0\0");
            cmd.params[5] = u64::from_le_bytes(*b"eth0\0\0\0\0");
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        let desc = get_obj(&io, CommandFlags::empty(), TOKEN, 2).unwrap();
        assert_eq!(
            desc,
            ObjectDesc {
                obj_type: Name::new("dpni"),
                id: 7,
                vendor: 0x1957,
                irq_count: 4,
                region_count: 3,
                state: 1,
                version: ObjectVersion { major: 5, minor: 2 },
                flags: 1,
                label: Name::new("eth0"),
            }
        );
    }

    #[test]
    fn test_get_res_ids_round_trip() {
        let fw = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[0] = 1 << 42;
            cmd.params[1] = (19 << 32) | 16;
            set_status(cmd, McStatus::Ok);
        });
        let journal = fw.journal();
        let io = fw.into_io();

        let range = get_res_ids(
            &io,
            CommandFlags::empty(),
            TOKEN,
            &Name::new("mcp"),
            &ResIdRange::default(),
        )
        .unwrap();
        assert_eq!(
            range,
            ResIdRange {
                iter_status: IterStatus::More,
                base_id: 16,
                last_id: 19,
            }
        );

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CMD_GET_RES_IDS);
        assert_eq!(req.params[0], 0);
        assert_eq!(req.params[2], word(b"mcp\0\0\0\0\0"));
    }

    #[test]
    fn test_get_res_ids_bad_status() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[0] = 9 << 42;
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        let err = get_res_ids(
            &io,
            CommandFlags::empty(),
            TOKEN,
            &Name::new("mcp"),
            &ResIdRange::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            GetResIdsError::Decode(DecodeError {
                field: "iter_status",
                value: 9
            })
        );
    }

    #[test]
    fn test_set_obj_label_layout() {
        let fw = accept_all();
        let journal = fw.journal();
        let io = fw.into_io();

        set_obj_label(
            &io,
            CommandFlags::empty(),
            TOKEN,
            &Name::new("dpmac"),
            5,
            &Name::new("uplink-port-a"),
        )
        .unwrap();

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CMD_SET_OBJ_LABEL);
        assert_eq!(req.params[0], 5);
        assert_eq!(req.params[1], word(b"uplink-p"));
        assert_eq!(req.params[2], word(b"ort-a\0\0\0"));
        assert_eq!(req.params[3], word(b"dpmac\0\0\0"));
        assert_eq!(req.params[4], 0);
    }

    #[test]
    fn test_connect_layout() {
        let fw = accept_all();
        let journal = fw.journal();
        let io = fw.into_io();

        let ep1 = Endpoint {
            obj_type: Name::new("dpni"),
            id: 1,
            interface_id: 0,
        };
        let ep2 = Endpoint {
            obj_type: Name::new("dpmac"),
            id: 3,
            interface_id: 2,
        };
        let cfg = ConnectionConfig {
            committed_rate: 1000,
            max_rate: 10_000,
        };
        connect(&io, CommandFlags::empty(), TOKEN, &ep1, &ep2, &cfg).unwrap();

        let req = journal.last_request().unwrap();
        assert_eq!(req.command_id(), CMD_CONNECT);
        assert_eq!(req.params[0], 1);
        assert_eq!(req.params[1], (2 << 32) | 3);
        assert_eq!(req.params[2], word(b"dpni\0\0\0\0"));
        assert_eq!(req.params[3], 0);
        assert_eq!(req.params[4], (1000 << 32) | 10_000);
        assert_eq!(req.params[5], word(b"dpmac\0\0\0"));
        assert_eq!(req.params[6], 0);
    }

    #[test]
    fn test_get_connection() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            assert_eq!(cmd.params[1], u64::from_le_bytes(*b"dpni\0\0\0\0"));
            cmd.params[3] = 3;
            cmd.params[4] = u64::from_le_bytes(*b"dpmac\0\0\0");
            cmd.params[5] = 0;
            cmd.params[6] = 1;
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        let ep1 = Endpoint {
            obj_type: Name::new("dpni"),
            id: 1,
            interface_id: 0,
        };
        let (ep2, state) = get_connection(&io, CommandFlags::empty(), TOKEN, &ep1).unwrap();
        assert_eq!(
            ep2,
            Endpoint {
                obj_type: Name::new("dpmac"),
                id: 3,
                interface_id: 0,
            }
        );
        assert_eq!(state, LinkState::Up);
    }

    #[test]
    fn test_get_connection_not_connected() {
        let io = FakeFirmware::new(|cmd: &mut Command| {
            cmd.params[6] = 0xFFFF_FFFF;
            set_status(cmd, McStatus::Ok);
        })
        .into_io();

        let (_, state) =
            get_connection(&io, CommandFlags::empty(), TOKEN, &Endpoint::default()).unwrap();
        assert_eq!(state, LinkState::NotConnected);
    }
}
