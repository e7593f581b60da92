//! Enumeration of a container's objects, pools and resource ids.

use core::ops::RangeInclusive;

use mc_cmd::{CommandFlags, Token};
use mc_object::CommandError;
use mc_portal::Transport;

use crate::{
    cmd::{self, GetResIdsError},
    name::Name,
    proto::{IterStatus, ObjectDesc, ResIdRange},
};

/// Iterator over the objects of a container, see
/// [`Dprc::objects`](crate::Dprc::objects).
///
/// Each step is one command. Iteration stops after the first error.
#[derive(Debug)]
pub struct Objects<'a, T: ?Sized> {
    io: &'a T,
    flags: CommandFlags,
    token: Token,
    next: u32,
    count: u32,
}

impl<'a, T: ?Sized> Objects<'a, T> {
    pub(crate) fn new(io: &'a T, flags: CommandFlags, token: Token, count: u32) -> Self {
        Self {
            io,
            flags,
            token,
            next: 0,
            count,
        }
    }
}

impl<T> Iterator for Objects<'_, T>
where
    T: Transport + ?Sized,
{
    type Item = Result<ObjectDesc, CommandError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let item = cmd::get_obj(self.io, self.flags, self.token, self.next);
        // Fuse after an error.
        self.next = if item.is_ok() { self.next + 1 } else { self.count };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next) as usize;
        (left.min(1), Some(left))
    }
}

/// Iterator over the resource pools of a container, see
/// [`Dprc::pools`](crate::Dprc::pools).
///
/// Each step is one command. Iteration stops after the first error.
#[derive(Debug)]
pub struct Pools<'a, T: ?Sized> {
    io: &'a T,
    flags: CommandFlags,
    token: Token,
    next: u32,
    count: u32,
}

impl<'a, T: ?Sized> Pools<'a, T> {
    pub(crate) fn new(io: &'a T, flags: CommandFlags, token: Token, count: u32) -> Self {
        Self {
            io,
            flags,
            token,
            next: 0,
            count,
        }
    }
}

impl<T> Iterator for Pools<'_, T>
where
    T: Transport + ?Sized,
{
    type Item = Result<Name, CommandError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let item = cmd::get_pool(self.io, self.flags, self.token, self.next);
        // Fuse after an error.
        self.next = if item.is_ok() { self.next + 1 } else { self.count };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.count - self.next) as usize;
        (left.min(1), Some(left))
    }
}

/// Iterator over the free id ranges of one resource type, see
/// [`Dprc::res_id_ranges`](crate::Dprc::res_id_ranges).
///
/// Each step is one command. Iteration stops after the firmware reports the
/// last range or after the first error.
#[derive(Debug)]
pub struct ResIdRanges<'a, T: ?Sized> {
    io: &'a T,
    flags: CommandFlags,
    token: Token,
    res_type: Name,
    cursor: ResIdRange,
    done: bool,
}

impl<'a, T: ?Sized> ResIdRanges<'a, T> {
    pub(crate) fn new(io: &'a T, flags: CommandFlags, token: Token, res_type: Name) -> Self {
        Self {
            io,
            flags,
            token,
            res_type,
            cursor: ResIdRange::default(),
            done: false,
        }
    }
}

impl<T> Iterator for ResIdRanges<'_, T>
where
    T: Transport + ?Sized,
{
    type Item = Result<RangeInclusive<u32>, GetResIdsError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match cmd::get_res_ids(self.io, self.flags, self.token, &self.res_type, &self.cursor) {
            Ok(range) if range.iter_status == IterStatus::Last => {
                self.done = true;
                None
            }
            Ok(range) => {
                self.cursor = range;
                Some(Ok(range.base_id..=range.last_id))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
