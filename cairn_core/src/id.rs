// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entity and resource identity types.

use core::fmt;

/// Sentinel value indicating "no slot" in index fields.
pub const INVALID: u32 = u32::MAX;

/// Implemented by generational entity handles so the arena can be shared
/// between entity kinds.
pub(crate) trait SlotKey: Copy {
    /// Builds a handle from a slot index and generation.
    fn from_parts(idx: u32, generation: u32) -> Self;
    /// Returns the slot index.
    fn idx(self) -> u32;
    /// Returns the generation counter.
    fn generation(self) -> u32;
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// Contains both a slot index and a generation counter so that stale
        /// handles can be detected after the entity is freed and the slot is
        /// reused.
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) idx: u32,
            pub(crate) generation: u32,
        }

        impl $name {
            /// Returns the raw slot index (for diagnostics only).
            #[inline]
            #[must_use]
            pub const fn index(self) -> u32 {
                self.idx
            }

            /// Returns the generation counter.
            #[inline]
            #[must_use]
            pub const fn generation(self) -> u32 {
                self.generation
            }

            /// Rebuilds a handle from a recorded index and generation.
            ///
            /// Only meaningful against the server that issued the original
            /// handle; used by trace decoders.
            #[inline]
            #[must_use]
            pub const fn from_raw(index: u32, generation: u32) -> Self {
                Self {
                    idx: index,
                    generation,
                }
            }
        }

        impl SlotKey for $name {
            #[inline]
            fn from_parts(idx: u32, generation: u32) -> Self {
                Self { idx, generation }
            }

            #[inline]
            fn idx(self) -> u32 {
                self.idx
            }

            #[inline]
            fn generation(self) -> u32 {
                self.generation
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({}@gen{})"), self.idx, self.generation)
            }
        }
    };
}

entity_id! {
    /// A handle to a navigation map in a
    /// [`NavigationDebugServer`](crate::server::NavigationDebugServer).
    MapId
}

entity_id! {
    /// A handle to a navigation region.
    RegionId
}

entity_id! {
    /// A handle to a navigation link.
    LinkId
}

entity_id! {
    /// A handle to an avoidance obstacle.
    ObstacleId
}

entity_id! {
    /// A handle to a navigation agent.
    AgentId
}

/// Which kind of navigation primitive an entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A navigation mesh region.
    Region,
    /// A navigation link between two points.
    Link,
    /// An avoidance obstacle.
    Obstacle,
    /// A navigation agent.
    Agent,
}

/// Any navigation primitive that carries a debug view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// A region.
    Region(RegionId),
    /// A link.
    Link(LinkId),
    /// An obstacle.
    Obstacle(ObstacleId),
    /// An agent.
    Agent(AgentId),
}

impl EntityId {
    /// Returns the kind of primitive this handle refers to.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Region(_) => EntityKind::Region,
            Self::Link(_) => EntityKind::Link,
            Self::Obstacle(_) => EntityKind::Obstacle,
            Self::Agent(_) => EntityKind::Agent,
        }
    }

    /// Returns the raw slot index (for diagnostics only).
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Region(id) => id.idx,
            Self::Link(id) => id.idx,
            Self::Obstacle(id) => id.idx,
            Self::Agent(id) => id.idx,
        }
    }

    /// Returns the generation counter.
    #[must_use]
    pub const fn generation(self) -> u32 {
        match self {
            Self::Region(id) => id.generation,
            Self::Link(id) => id.generation,
            Self::Obstacle(id) => id.generation,
            Self::Agent(id) => id.generation,
        }
    }
}

impl From<RegionId> for EntityId {
    fn from(id: RegionId) -> Self {
        Self::Region(id)
    }
}

impl From<LinkId> for EntityId {
    fn from(id: LinkId) -> Self {
        Self::Link(id)
    }
}

impl From<ObstacleId> for EntityId {
    fn from(id: ObstacleId) -> Self {
        Self::Obstacle(id)
    }
}

impl From<AgentId> for EntityId {
    fn from(id: AgentId) -> Self {
        Self::Agent(id)
    }
}

/// An opaque reference to a drawable owned by a
/// [`DrawingSurface`](crate::surface::DrawingSurface): a mesh instance in 3D
/// or a canvas item in 2D.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId(pub u32);

impl fmt::Debug for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DrawableId({})", self.0)
    }
}

/// An opaque reference to a material owned by the drawing surface.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

impl fmt::Debug for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaterialId({})", self.0)
    }
}

/// An opaque reference to a parent drawing scope: a scenario in 3D or a
/// canvas in 2D.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParentId(pub u32);

impl fmt::Debug for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParentId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn entity_id_debug_includes_generation() {
        let id = RegionId::from_parts(3, 2);
        assert_eq!(format!("{id:?}"), "RegionId(3@gen2)");
    }

    #[test]
    fn entity_id_kind_and_index() {
        let id: EntityId = LinkId::from_parts(7, 0).into();
        assert_eq!(id.kind(), EntityKind::Link);
        assert_eq!(id.index(), 7);
    }
}
