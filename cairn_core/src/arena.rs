// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-kind entity storage and the trait that lets the server treat all
//! four primitive kinds generically.

use alloc::vec::Vec;
use core::fmt;

use crate::id::{AgentId, EntityId, LinkId, MapId, ObstacleId, RegionId, SlotKey};
use crate::map::{MapMembers, MapQueues};
use crate::primitive::{AgentData, LinkData, ObstacleData, RegionData};
use crate::queue::SyncRequestQueue;
use crate::store::Slots;
use crate::view::{DebugPrimitive, EntityDebug};

/// One primitive: its navigation data, its map and its debug view.
#[derive(Debug)]
pub(crate) struct Entry<P> {
    /// Map the primitive is registered with, if any.
    pub(crate) map: Option<MapId>,
    pub(crate) data: P,
    pub(crate) debug: EntityDebug,
}

/// The four primitive arenas.
#[derive(Debug, Default)]
pub(crate) struct Arenas {
    pub(crate) regions: Slots<RegionId, Entry<RegionData>>,
    pub(crate) links: Slots<LinkId, Entry<LinkData>>,
    pub(crate) obstacles: Slots<ObstacleId, Entry<ObstacleData>>,
    pub(crate) agents: Slots<AgentId, Entry<AgentData>>,
}

/// A primitive kind the server stores, queues and syncs.
pub(crate) trait Primitive: DebugPrimitive + Sized {
    type Id: SlotKey + Into<EntityId> + fmt::Debug + PartialEq;

    fn arena(arenas: &Arenas) -> &Slots<Self::Id, Entry<Self>>;
    fn arena_mut(arenas: &mut Arenas) -> &mut Slots<Self::Id, Entry<Self>>;
    fn queue(queues: &mut MapQueues) -> &mut SyncRequestQueue<Self::Id>;
    fn members(members: &MapMembers) -> &Vec<Self::Id>;
    fn members_mut(members: &mut MapMembers) -> &mut Vec<Self::Id>;
}

macro_rules! primitive {
    ($data:ty, $id:ty, $field:ident) => {
        impl Primitive for $data {
            type Id = $id;

            #[inline]
            fn arena(arenas: &Arenas) -> &Slots<$id, Entry<Self>> {
                &arenas.$field
            }

            #[inline]
            fn arena_mut(arenas: &mut Arenas) -> &mut Slots<$id, Entry<Self>> {
                &mut arenas.$field
            }

            #[inline]
            fn queue(queues: &mut MapQueues) -> &mut SyncRequestQueue<$id> {
                &mut queues.$field
            }

            #[inline]
            fn members(members: &MapMembers) -> &Vec<$id> {
                &members.$field
            }

            #[inline]
            fn members_mut(members: &mut MapMembers) -> &mut Vec<$id> {
                &mut members.$field
            }
        }
    };
}

primitive!(RegionData, RegionId, regions);
primitive!(LinkData, LinkId, links);
primitive!(ObstacleData, ObstacleId, obstacles);
primitive!(AgentData, AgentId, agents);
