// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation data the debug views draw from.
//!
//! These are the parts of maps and primitives that debug drawing reads.
//! The server owns them in its arenas; mutators on
//! [`NavigationDebugServer`](crate::server::NavigationDebugServer) change a
//! field and mark the matching dirty aspect in the same call.

use alloc::vec::Vec;

use crate::math::{Transform3d, Vec3};
use crate::surface::DrawableKind;

/// Whether a map is drawn on a 2-D canvas or in a 3-D scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Usage {
    /// Canvas items parented to the map canvas; geometry projected to
    /// `(x, z)`.
    TwoD,
    /// Mesh instances placed in the map scenario.
    ThreeD,
}

impl Usage {
    /// The drawable flavor views of this usage create.
    #[must_use]
    pub const fn drawable_kind(self) -> DrawableKind {
        match self {
            Self::TwoD => DrawableKind::CanvasItem,
            Self::ThreeD => DrawableKind::Mesh,
        }
    }
}

/// Per-map navigation configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapState {
    /// Inactive maps resolve no parent and draw nothing.
    pub active: bool,
    /// Up axis; link circles are drawn orthogonal to its dominant component.
    pub up: Vec3,
    /// Width of the edge-connection markers.
    pub edge_connection_margin: f32,
    /// Search radius drawn around link endpoints.
    pub link_connection_radius: f32,
    /// Regions may connect through nearby edges.
    pub use_edge_connections: bool,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            active: false,
            up: Vec3::UP,
            edge_connection_margin: 1.0,
            link_connection_radius: 1.0,
            use_edge_connections: true,
        }
    }
}

/// One pathway through which a region connects to a neighbor's edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeConnection {
    /// Pathway start, on this region's edge.
    pub pathway_start: Vec3,
    /// Pathway end, on the neighbor's edge.
    pub pathway_end: Vec3,
}

/// Polygon soup of a baked navigation mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavMeshData {
    /// Shared vertex pool.
    pub vertices: Vec<Vec3>,
    /// Polygons as index lists into `vertices`.
    pub polygons: Vec<Vec<u32>>,
}

impl NavMeshData {
    /// Returns whether there is nothing to triangulate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.polygons.is_empty()
    }
}

/// Debug-relevant state of a navigation region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionData {
    /// Region placement.
    pub transform: Transform3d,
    /// Disabled regions draw with the disabled materials.
    pub enabled: bool,
    /// Whether this region's edge connections appear in the map overlay.
    pub use_edge_connections: bool,
    /// Geometry.
    pub navigation_mesh: NavMeshData,
    /// Edge connections the map found for this region.
    pub connections: Vec<EdgeConnection>,
}

impl Default for RegionData {
    fn default() -> Self {
        Self {
            transform: Transform3d::IDENTITY,
            enabled: true,
            use_edge_connections: true,
            navigation_mesh: NavMeshData::default(),
            connections: Vec::new(),
        }
    }
}

/// Debug-relevant state of a navigation link. Endpoints are global.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkData {
    /// Disabled links draw with the disabled material.
    pub enabled: bool,
    /// Start position.
    pub start: Vec3,
    /// End position.
    pub end: Vec3,
}

impl Default for LinkData {
    fn default() -> Self {
        Self {
            enabled: true,
            start: Vec3::ZERO,
            end: Vec3::ZERO,
        }
    }
}

/// Debug-relevant state of an avoidance obstacle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleData {
    /// Obstacle origin.
    pub position: Vec3,
    /// Static outline, relative to `position`.
    pub vertices: Vec<Vec3>,
    /// Height of the static outline.
    pub height: f32,
    /// Dynamic avoidance radius; 0 disables the radius volume.
    pub radius: f32,
}

/// Debug-relevant state of a navigation agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentData {
    /// Current path in global coordinates.
    pub path: Vec<Vec3>,
}
