// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-map debug state.
//!
//! A [`MapDebug`] owns one sync request queue per entity kind, the ordered
//! member lists used for fan-out, the map's debug switches, and the
//! edge-connection overlay drawable. It resolves which scenario (3-D) or
//! canvas (2-D) the map's drawables are parented to.
//!
//! Fan-out over members and the queue flush need the primitive arenas and
//! live in [`server`](crate::server); this module only holds what is local
//! to one map.

use alloc::vec;
use alloc::vec::Vec;

use crate::arena::Entry;
use crate::dirty::{DirtyAspect, DirtyFlags};
use crate::geometry;
use crate::id::{AgentId, DrawableId, EntityKind, LinkId, ObstacleId, ParentId, RegionId};
use crate::primitive::{MapState, RegionData, Usage};
use crate::queue::SyncRequestQueue;
use crate::settings::{DebugSettings, MaterialSlot};
use crate::store::Slots;
use crate::surface::{CanvasShape, DrawingSurface, MeshBatch, PrimitiveKind, RenderPriority};
use crate::trace::KindCounts;
use crate::view::MapContext;

/// Fallback parents used when a map has no explicit one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct DefaultParents {
    /// World scenario of the main viewport.
    pub(crate) scenario: Option<ParentId>,
    /// World canvas of the main viewport.
    pub(crate) canvas: Option<ParentId>,
}

/// Pending sync requests, one queue per kind.
#[derive(Debug, Default)]
pub(crate) struct MapQueues {
    pub(crate) regions: SyncRequestQueue<RegionId>,
    pub(crate) links: SyncRequestQueue<LinkId>,
    pub(crate) obstacles: SyncRequestQueue<ObstacleId>,
    pub(crate) agents: SyncRequestQueue<AgentId>,
}

impl MapQueues {
    pub(crate) fn counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        counts.add(EntityKind::Region, len_u32(self.regions.len()));
        counts.add(EntityKind::Link, len_u32(self.links.len()));
        counts.add(EntityKind::Obstacle, len_u32(self.obstacles.len()));
        counts.add(EntityKind::Agent, len_u32(self.agents.len()));
        counts
    }
}

/// Registered primitives in registration order.
#[derive(Debug, Default)]
pub(crate) struct MapMembers {
    pub(crate) regions: Vec<RegionId>,
    pub(crate) links: Vec<LinkId>,
    pub(crate) obstacles: Vec<ObstacleId>,
    pub(crate) agents: Vec<AgentId>,
}

impl MapMembers {
    pub(crate) fn counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        counts.add(EntityKind::Region, len_u32(self.regions.len()));
        counts.add(EntityKind::Link, len_u32(self.links.len()));
        counts.add(EntityKind::Obstacle, len_u32(self.obstacles.len()));
        counts.add(EntityKind::Agent, len_u32(self.agents.len()));
        counts
    }
}

pub(crate) fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// What [`MapDebug::sync_overlay`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct OverlaySync {
    /// The map's parent was re-resolved; members must follow.
    pub(crate) reparented: bool,
    /// Vertices submitted if the overlay mesh was rebuilt.
    pub(crate) rebuilt: Option<u32>,
}

/// Debug state of one navigation map.
#[derive(Debug)]
pub(crate) struct MapDebug {
    usage: Usage,
    pub(crate) state: MapState,
    debug_enabled: bool,
    navigation_enabled: bool,
    avoidance_enabled: bool,
    /// Explicitly assigned scenario or canvas.
    parent: Option<ParentId>,
    project_settings_dirty: bool,
    debug_settings_dirty: bool,
    /// Parent, mesh and material of the overlay. Transform is unused.
    dirty: DirtyFlags,
    overlay: Option<DrawableId>,
    pub(crate) queues: MapQueues,
    pub(crate) members: MapMembers,
}

impl MapDebug {
    pub(crate) fn new<S: DrawingSurface + ?Sized>(usage: Usage, surface: &mut S) -> Self {
        Self {
            usage,
            state: MapState::default(),
            debug_enabled: true,
            navigation_enabled: true,
            avoidance_enabled: true,
            parent: None,
            project_settings_dirty: true,
            debug_settings_dirty: true,
            dirty: DirtyFlags::CLEAN,
            overlay: Some(surface.create_drawable(usage.drawable_kind())),
            queues: MapQueues::default(),
            members: MapMembers::default(),
        }
    }

    pub(crate) fn usage(&self) -> Usage {
        self.usage
    }

    pub(crate) fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    pub(crate) fn navigation_enabled(&self) -> bool {
        self.navigation_enabled
    }

    pub(crate) fn avoidance_enabled(&self) -> bool {
        self.avoidance_enabled
    }

    pub(crate) fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub(crate) fn overlay(&self) -> Option<DrawableId> {
        self.overlay
    }

    pub(crate) fn mark(&mut self, aspect: DirtyAspect) {
        self.dirty.mark(aspect);
    }

    /// The scenario (3-D) or canvas (2-D) this map draws into.
    ///
    /// `None` while the map is inactive. Otherwise the explicit parent, then
    /// the default for the map's usage.
    pub(crate) fn debug_parent(&self, defaults: DefaultParents) -> Option<ParentId> {
        if !self.state.active {
            return None;
        }
        self.parent.or(match self.usage {
            Usage::ThreeD => defaults.scenario,
            Usage::TwoD => defaults.canvas,
        })
    }

    /// Snapshot handed to the views of `kind` during a rebuild.
    pub(crate) fn context(&self, kind: EntityKind, defaults: DefaultParents) -> MapContext {
        // Agents draw paths only, so avoidance never hides them.
        let group_enabled = match kind {
            EntityKind::Region | EntityKind::Link | EntityKind::Agent => self.navigation_enabled,
            EntityKind::Obstacle => self.avoidance_enabled,
        };
        MapContext {
            active: self.state.active,
            debug_enabled: self.debug_enabled && group_enabled,
            parent: self.debug_parent(defaults),
            up: self.state.up,
            link_connection_radius: self.state.link_connection_radius,
        }
    }

    /// Returns whether the activity changed.
    ///
    /// Activity decides both parenting and visibility of every member, so a
    /// change is treated like a settings change and fanned out on the next
    /// sync.
    pub(crate) fn set_active(&mut self, active: bool) -> bool {
        if self.state.active == active {
            return false;
        }
        self.state.active = active;
        self.dirty.mark(DirtyAspect::Parent);
        self.debug_settings_dirty = true;
        true
    }

    /// Assigns an explicit scenario or canvas. Returns whether it changed.
    pub(crate) fn set_parent(&mut self, parent: Option<ParentId>) -> bool {
        if self.parent == parent {
            return false;
        }
        self.parent = parent;
        self.dirty.mark(DirtyAspect::Parent);
        true
    }

    pub(crate) fn explicit_parent(&self) -> Option<ParentId> {
        self.parent
    }

    /// Returns whether the switch changed. The overlay is marked for a
    /// rebuild on change.
    pub(crate) fn set_debug_enabled(&mut self, enabled: bool) -> bool {
        if self.debug_enabled == enabled {
            return false;
        }
        self.debug_enabled = enabled;
        self.dirty.mark(DirtyAspect::Mesh);
        self.dirty.mark(DirtyAspect::Material);
        true
    }

    pub(crate) fn set_navigation_enabled(&mut self, enabled: bool) -> bool {
        if self.navigation_enabled == enabled {
            return false;
        }
        self.navigation_enabled = enabled;
        self.dirty.mark(DirtyAspect::Mesh);
        true
    }

    pub(crate) fn set_avoidance_enabled(&mut self, enabled: bool) -> bool {
        if self.avoidance_enabled == enabled {
            return false;
        }
        self.avoidance_enabled = enabled;
        true
    }

    pub(crate) fn project_settings_changed(&mut self) {
        self.project_settings_dirty = true;
    }

    pub(crate) fn debug_settings_changed(&mut self) {
        self.debug_settings_dirty = true;
    }

    pub(crate) fn settings_dirty(&self) -> bool {
        self.project_settings_dirty || self.debug_settings_dirty
    }

    /// Clears both settings flags, returning whether either was set.
    pub(crate) fn take_settings_dirty(&mut self) -> bool {
        let dirty = self.settings_dirty();
        self.project_settings_dirty = false;
        self.debug_settings_dirty = false;
        dirty
    }

    /// Runs the overlay's parent, mesh and material steps.
    pub(crate) fn sync_overlay<S: DrawingSurface + ?Sized>(
        &mut self,
        regions: &Slots<RegionId, Entry<RegionData>>,
        settings: &mut DebugSettings,
        surface: &mut S,
        defaults: DefaultParents,
    ) -> OverlaySync {
        let mut outcome = OverlaySync::default();
        let Some(overlay) = self.overlay else {
            self.dirty = DirtyFlags::CLEAN;
            return outcome;
        };

        if self.dirty.take(DirtyAspect::Parent) {
            surface.set_parent(overlay, self.debug_parent(defaults));
            outcome.reparented = true;
        }

        if self.dirty.take(DirtyAspect::Mesh) {
            surface.clear(overlay);
            outcome.rebuilt = Some(self.build_overlay(overlay, regions, settings, surface));
            self.dirty.mark(DirtyAspect::Material);
            surface.set_parent(overlay, self.debug_parent(defaults));
        }

        if self.dirty.take(DirtyAspect::Material)
            && self.usage == Usage::ThreeD
            && surface.surface_count(overlay) > 0
        {
            let material = settings.material(MaterialSlot::EdgeConnections, &mut *surface);
            surface.set_material_override(overlay, 0, material);
        }

        outcome
    }

    fn overlay_visible(&self, settings: &DebugSettings) -> bool {
        self.state.active
            && self.debug_enabled
            && self.navigation_enabled
            && self.state.use_edge_connections
            && settings.map_overlays_enabled()
            && settings.edge_connections_enabled()
    }

    /// Appends the edge-connection markers, returning the vertex count.
    fn build_overlay<S: DrawingSurface + ?Sized>(
        &self,
        overlay: DrawableId,
        regions: &Slots<RegionId, Entry<RegionData>>,
        settings: &DebugSettings,
        surface: &mut S,
    ) -> u32 {
        if !self.overlay_visible(settings) {
            return 0;
        }

        let connections = self
            .members
            .regions
            .iter()
            .filter_map(|&id| regions.get(id))
            .filter(|entry| entry.data.use_edge_connections)
            .flat_map(|entry| &entry.data.connections)
            .map(|c| (c.pathway_start, c.pathway_end));
        let vertices = geometry::edge_connection_lines(connections, self.state.edge_connection_margin);
        if vertices.is_empty() {
            return 0;
        }

        match self.usage {
            Usage::ThreeD => surface.add_mesh_batch(
                overlay,
                &MeshBatch::new(PrimitiveKind::Lines, &vertices)
                    .with_priority(RenderPriority::OVERLAY),
            ),
            Usage::TwoD => {
                let points = geometry::project_xz(&vertices);
                let colors = vec![settings.edge_connection_color(); points.len()];
                surface.add_canvas_shape(
                    overlay,
                    &CanvasShape::Mesh {
                        primitive: PrimitiveKind::Lines,
                        points: &points,
                        colors: &colors,
                    },
                );
            }
        }
        len_u32(vertices.len())
    }

    /// Releases the overlay drawable. Later calls are no-ops.
    pub(crate) fn free<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(overlay) = self.overlay.take() {
            surface.free_drawable(overlay);
        }
        self.dirty = DirtyFlags::CLEAN;
    }
}
