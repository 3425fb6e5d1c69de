// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigation debug server: arenas, mutators and the per-frame sync.
//!
//! Every mutator changes navigation data and marks the matching dirty
//! aspect of the entity's debug view in the same call. What happens next
//! depends on whether the entity belongs to a map:
//!
//! - **Deferred**: the view is queued on its map's per-kind queue and
//!   rebuilt by the next [`sync`](NavigationDebugServer::sync), at most once
//!   per frame however many mutations happened.
//! - **Immediate**: a view without a map is rebuilt on the spot. It draws
//!   nothing and resolves no parent, which is exactly what a detached
//!   primitive should show.
//!
//! Stale handles are logged with [`log::warn!`] and ignored. Queries on
//! stale handles return `None`.

#[cfg(test)]
mod tests;

use alloc::vec::Vec;
use core::fmt;

use crate::arena::{Arenas, Entry, Primitive};
use crate::dirty::{DirtyAspect, DirtyFlags};
use crate::id::{AgentId, DrawableId, EntityId, EntityKind, LinkId, MapId, ObstacleId, ParentId, RegionId};
use crate::map::{DefaultParents, MapDebug, len_u32};
use crate::math::{Transform3d, Vec3};
use crate::primitive::{
    AgentData, EdgeConnection, LinkData, MapState, NavMeshData, ObstacleData, RegionData, Usage,
};
use crate::settings::{DebugSettings, SettingsChanges, SettingsSource};
use crate::store::Slots;
use crate::surface::DrawingSurface;
use crate::trace::{
    EntitySyncEvent, KindCounts, MapSyncBeginEvent, MapSyncEndEvent, OverlayRebuiltEvent,
    SettingsFanOutEvent, SyncReport, SyncReportBuilder, Tracer,
};
use crate::view::{EntityDebug, SyncContext};

/// Calls a generic `Primitive` method with the typed handle inside an
/// [`EntityId`].
macro_rules! by_kind {
    ($self:ident . $method:ident ( $entity:expr $(, $arg:expr)* )) => {
        match Into::<EntityId>::into($entity) {
            EntityId::Region(id) => $self.$method::<RegionData>(id $(, $arg)*),
            EntityId::Link(id) => $self.$method::<LinkData>(id $(, $arg)*),
            EntityId::Obstacle(id) => $self.$method::<ObstacleData>(id $(, $arg)*),
            EntityId::Agent(id) => $self.$method::<AgentData>(id $(, $arg)*),
        }
    };
}

fn stale(kind: EntityKind, id: impl fmt::Debug) {
    log::warn!("ignoring stale {kind:?} handle {id:?}");
}

fn stale_map(id: MapId) {
    log::warn!("ignoring stale map handle {id:?}");
}

/// The debug drawing subsystem for navigation maps and primitives.
///
/// Owns the drawing surface, the single [`DebugSettings`] instance, and one
/// arena per entity kind. All calls happen on the owning thread; `&mut self`
/// on every mutator is the only synchronization.
pub struct NavigationDebugServer<S: DrawingSurface> {
    surface: S,
    settings: DebugSettings,
    defaults: DefaultParents,
    maps: Slots<MapId, MapDebug>,
    arenas: Arenas,
    frame_index: u64,
    /// Detached views rebuilt since the last sync.
    immediate: u32,
    /// Patched materials pushed since the last sync.
    materials_updated: u32,
}

impl<S: DrawingSurface> fmt::Debug for NavigationDebugServer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationDebugServer")
            .field("maps", &self.maps.len())
            .field("regions", &self.arenas.regions.len())
            .field("links", &self.arenas.links.len())
            .field("obstacles", &self.arenas.obstacles.len())
            .field("agents", &self.arenas.agents.len())
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl<S: DrawingSurface> NavigationDebugServer<S> {
    /// Creates a server drawing into `surface` with default settings.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self::with_settings(surface, DebugSettings::new())
    }

    /// Creates a server with explicit settings, e.g. a seeded
    /// [`DebugSettings::with_seed`] for reproducible face colors.
    #[must_use]
    pub fn with_settings(surface: S, settings: DebugSettings) -> Self {
        Self {
            surface,
            settings,
            defaults: DefaultParents::default(),
            maps: Slots::new(),
            arenas: Arenas::default(),
            frame_index: 0,
            immediate: 0,
            materials_updated: 0,
        }
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The drawing surface, mutably. Changes made here bypass dirty
    /// tracking.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The shared debug settings.
    pub fn settings(&self) -> &DebugSettings {
        &self.settings
    }

    /// Number of syncs run so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    // -- Settings API --

    /// Loads settings from `source` and schedules a full rebuild of every
    /// map.
    pub fn init(&mut self, source: &dyn SettingsSource) {
        self.settings.init(source);
        self.flush_settings();
        for id in self.maps.keys().collect::<Vec<_>>() {
            if let Some(map) = self.maps.get_mut(id) {
                map.project_settings_changed();
            }
        }
    }

    /// Releases the cached materials. Call once before dropping the surface.
    pub fn finish(&mut self) {
        self.settings.finish(&mut self.surface);
    }

    /// Edits the settings, pushes patched materials to the surface and, if
    /// a geometry toggle changed, schedules a fan-out on every map.
    ///
    /// Returns the toggle groups that changed.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut DebugSettings)) -> SettingsChanges {
        edit(&mut self.settings);
        self.flush_settings()
    }

    fn flush_settings(&mut self) -> SettingsChanges {
        let updated = self.settings.flush_materials(&mut self.surface);
        self.materials_updated += len_u32(updated);
        let changes = self.settings.take_changes();
        if !changes.is_empty() {
            log::debug!("debug settings changed: {changes:?}");
            for id in self.maps.keys().collect::<Vec<_>>() {
                if let Some(map) = self.maps.get_mut(id) {
                    map.debug_settings_changed();
                }
            }
        }
        changes
    }

    /// Schedules a settings fan-out on every map.
    pub fn project_settings_changed(&mut self) {
        for id in self.maps.keys().collect::<Vec<_>>() {
            if let Some(map) = self.maps.get_mut(id) {
                map.project_settings_changed();
            }
        }
    }

    /// Sets the world scenario 3-D maps fall back to.
    pub fn set_default_scenario(&mut self, scenario: Option<ParentId>) {
        if self.defaults.scenario != scenario {
            self.defaults.scenario = scenario;
            self.reparent_defaulted(Usage::ThreeD);
        }
    }

    /// Sets the world canvas 2-D maps fall back to.
    pub fn set_default_canvas(&mut self, canvas: Option<ParentId>) {
        if self.defaults.canvas != canvas {
            self.defaults.canvas = canvas;
            self.reparent_defaulted(Usage::TwoD);
        }
    }

    fn reparent_defaulted(&mut self, usage: Usage) {
        for id in self.maps.keys().collect::<Vec<_>>() {
            if let Some(map) = self.maps.get_mut(id) {
                if map.usage() == usage && map.explicit_parent().is_none() {
                    map.mark(DirtyAspect::Parent);
                }
            }
        }
    }

    // -- Map API --

    /// Creates an inactive map.
    pub fn map_create(&mut self, usage: Usage) -> MapId {
        let Self { surface, maps, .. } = self;
        maps.insert_with(|_| MapDebug::new(usage, surface))
    }

    /// Frees a map. Its primitives are detached and rebuilt immediately,
    /// which clears their geometry.
    pub fn map_free(&mut self, map: MapId) {
        let Some(mut debug) = self.maps.remove(map) else {
            stale_map(map);
            return;
        };
        self.detach_all::<RegionData>(&mut debug);
        self.detach_all::<LinkData>(&mut debug);
        self.detach_all::<ObstacleData>(&mut debug);
        self.detach_all::<AgentData>(&mut debug);
        debug.free(&mut self.surface);
    }

    fn detach_all<P: Primitive>(&mut self, map: &mut MapDebug) {
        let members = core::mem::take(P::members_mut(&mut map.members));
        for id in members {
            let Self {
                surface,
                settings,
                arenas,
                immediate,
                ..
            } = self;
            let Some(entry) = P::arena_mut(arenas).get_mut(id) else {
                continue;
            };
            P::queue(&mut map.queues).remove(&mut entry.debug.slot);
            entry.map = None;
            if entry.debug.mark_all() {
                sync_detached(entry, surface, settings, immediate);
            }
        }
    }

    /// Returns whether `map` is a live handle.
    pub fn map_is_alive(&self, map: MapId) -> bool {
        self.maps.is_alive(map)
    }

    /// The map's usage.
    pub fn map_usage(&self, map: MapId) -> Option<Usage> {
        self.maps.get(map).map(MapDebug::usage)
    }

    /// Activates or deactivates a map. Inactive maps draw nothing.
    pub fn map_set_active(&mut self, map: MapId, active: bool) {
        match self.maps.get_mut(map) {
            Some(debug) => {
                debug.set_active(active);
            }
            None => stale_map(map),
        }
    }

    /// Returns whether the map is active.
    pub fn map_is_active(&self, map: MapId) -> Option<bool> {
        self.maps.get(map).map(|m| m.state.active)
    }

    /// Sets the map's up axis, which orients link circles.
    pub fn map_set_up(&mut self, map: MapId, up: Vec3) {
        self.edit_map_links(map, |state| {
            let changed = state.up != up;
            state.up = up;
            changed
        });
    }

    /// Sets the search radius drawn around link endpoints.
    pub fn map_set_link_connection_radius(&mut self, map: MapId, radius: f32) {
        self.edit_map_links(map, |state| {
            let changed = state.link_connection_radius != radius;
            state.link_connection_radius = radius;
            changed
        });
    }

    fn edit_map_links(&mut self, map: MapId, edit: impl FnOnce(&mut MapState) -> bool) {
        let Some(debug) = self.maps.get_mut(map) else {
            stale_map(map);
            return;
        };
        if edit(&mut debug.state) {
            mark_members::<LinkData>(debug, &mut self.arenas.links, |v| v.mark(DirtyAspect::Mesh));
        }
    }

    /// Sets the width of the edge-connection markers.
    pub fn map_set_edge_connection_margin(&mut self, map: MapId, margin: f32) {
        self.edit_map_overlay(map, |state| {
            let changed = state.edge_connection_margin != margin;
            state.edge_connection_margin = margin;
            changed
        });
    }

    /// Enables or disables edge connections for the whole map.
    pub fn map_set_use_edge_connections(&mut self, map: MapId, enabled: bool) {
        self.edit_map_overlay(map, |state| {
            let changed = state.use_edge_connections != enabled;
            state.use_edge_connections = enabled;
            changed
        });
    }

    fn edit_map_overlay(&mut self, map: MapId, edit: impl FnOnce(&mut MapState) -> bool) {
        let Some(debug) = self.maps.get_mut(map) else {
            stale_map(map);
            return;
        };
        if edit(&mut debug.state) {
            debug.mark(DirtyAspect::Mesh);
        }
    }

    /// Assigns the scenario (3-D) or canvas (2-D) the map draws into.
    ///
    /// `None` falls back to the server default. Members are re-parented on
    /// the next sync.
    pub fn map_set_parent(&mut self, map: MapId, parent: Option<ParentId>) {
        match self.maps.get_mut(map) {
            Some(debug) => {
                debug.set_parent(parent);
            }
            None => stale_map(map),
        }
    }

    /// The scenario or canvas the map's drawables are parented to.
    ///
    /// `None` for inactive maps, stale handles, or when neither an explicit
    /// nor a default parent exists.
    pub fn map_debug_parent(&self, map: MapId) -> Option<ParentId> {
        self.maps.get(map)?.debug_parent(self.defaults)
    }

    /// Turns all debug drawing of one map on or off.
    pub fn map_debug_set_enabled(&mut self, map: MapId, enabled: bool) {
        let Self {
            surface,
            settings,
            defaults,
            maps,
            arenas,
            ..
        } = self;
        let Some(debug) = maps.get_mut(map) else {
            stale_map(map);
            return;
        };
        if !debug.set_debug_enabled(enabled) {
            return;
        }
        match debug.usage() {
            Usage::ThreeD => {
                make_members_dirty(debug, arenas);
            }
            Usage::TwoD => {
                let defaults = *defaults;
                set_members_enabled(debug, &mut arenas.regions, surface, settings, defaults, enabled);
                set_members_enabled(debug, &mut arenas.links, surface, settings, defaults, enabled);
                set_members_enabled(debug, &mut arenas.obstacles, surface, settings, defaults, enabled);
            }
        }
    }

    /// Turns navigation drawing (regions, links, agents, overlay) of one map
    /// on or off.
    pub fn map_debug_set_navigation_enabled(&mut self, map: MapId, enabled: bool) {
        let Self {
            surface,
            settings,
            defaults,
            maps,
            arenas,
            ..
        } = self;
        let Some(debug) = maps.get_mut(map) else {
            stale_map(map);
            return;
        };
        if !debug.set_navigation_enabled(enabled) {
            return;
        }
        match debug.usage() {
            Usage::ThreeD => {
                let dirty = |v: &mut EntityDebug| v.mark_all();
                mark_members(debug, &mut arenas.regions, dirty);
                mark_members(debug, &mut arenas.links, dirty);
                mark_members(debug, &mut arenas.agents, dirty);
            }
            Usage::TwoD => {
                let on = debug.debug_enabled() && enabled;
                let defaults = *defaults;
                set_members_enabled(debug, &mut arenas.regions, surface, settings, defaults, on);
                set_members_enabled(debug, &mut arenas.links, surface, settings, defaults, on);
            }
        }
    }

    /// Turns obstacle drawing of one map on or off.
    ///
    /// Agents stay gated by the navigation switch, but a 3-D map still
    /// re-dirties them here.
    pub fn map_debug_set_avoidance_enabled(&mut self, map: MapId, enabled: bool) {
        let Self {
            surface,
            settings,
            defaults,
            maps,
            arenas,
            ..
        } = self;
        let Some(debug) = maps.get_mut(map) else {
            stale_map(map);
            return;
        };
        if !debug.set_avoidance_enabled(enabled) {
            return;
        }
        match debug.usage() {
            Usage::ThreeD => {
                let dirty = |v: &mut EntityDebug| v.mark_all();
                mark_members(debug, &mut arenas.agents, dirty);
                mark_members(debug, &mut arenas.obstacles, dirty);
            }
            Usage::TwoD => {
                let on = debug.debug_enabled() && enabled;
                set_members_enabled(debug, &mut arenas.obstacles, surface, settings, *defaults, on);
            }
        }
    }

    /// Returns the map's `(debug, navigation, avoidance)` switches.
    pub fn map_debug_switches(&self, map: MapId) -> Option<(bool, bool, bool)> {
        self.maps
            .get(map)
            .map(|m| (m.debug_enabled(), m.navigation_enabled(), m.avoidance_enabled()))
    }

    /// Schedules a settings fan-out on one map.
    pub fn map_project_settings_changed(&mut self, map: MapId) {
        match self.maps.get_mut(map) {
            Some(debug) => debug.project_settings_changed(),
            None => stale_map(map),
        }
    }

    /// Schedules a settings fan-out on one map.
    pub fn map_debug_settings_changed(&mut self, map: MapId) {
        match self.maps.get_mut(map) {
            Some(debug) => debug.debug_settings_changed(),
            None => stale_map(map),
        }
    }

    /// Dirty aspects of the map's own overlay.
    pub fn map_dirty_flags(&self, map: MapId) -> Option<DirtyFlags> {
        self.maps.get(map).map(MapDebug::dirty)
    }

    /// Outstanding sync requests per kind.
    pub fn map_queued(&self, map: MapId) -> Option<KindCounts> {
        self.maps.get(map).map(|m| m.queues.counts())
    }

    /// Registered primitives per kind.
    pub fn map_members(&self, map: MapId) -> Option<KindCounts> {
        self.maps.get(map).map(|m| m.members.counts())
    }

    /// The drawable of the map's edge-connection overlay.
    pub fn map_overlay(&self, map: MapId) -> Option<DrawableId> {
        self.maps.get(map)?.overlay()
    }

    // -- Primitive lifecycle API --

    fn create<P: Primitive + Default>(&mut self, usage: Usage) -> P::Id {
        let Self { surface, arenas, .. } = self;
        P::arena_mut(arenas).insert_with(|id| Entry {
            map: None,
            data: P::default(),
            debug: EntityDebug::new::<P, S>(id.into(), usage, surface),
        })
    }

    fn free<P: Primitive>(&mut self, id: P::Id) {
        let Some(mut entry) = P::arena_mut(&mut self.arenas).remove(id) else {
            stale(P::KIND, id);
            return;
        };
        if let Some(map) = map_mut(&mut self.maps, entry.map) {
            leave::<P>(map, id, &mut entry.debug);
        }
        entry.debug.free(&mut self.surface);
    }

    fn set_map<P: Primitive>(&mut self, id: P::Id, map: Option<MapId>) {
        let Self {
            surface,
            settings,
            maps,
            arenas,
            immediate,
            ..
        } = self;
        let Some(entry) = P::arena_mut(arenas).get_mut(id) else {
            stale(P::KIND, id);
            return;
        };
        if entry.map == map {
            return;
        }
        if let Some(target) = map {
            match maps.get(target) {
                None => {
                    stale_map(target);
                    return;
                }
                Some(debug) if debug.usage() != entry.debug.usage() => {
                    log::warn!(
                        "cannot move {id:?} ({:?}) to {target:?} ({:?})",
                        entry.debug.usage(),
                        debug.usage()
                    );
                    return;
                }
                Some(_) => {}
            }
        }

        if let Some(old) = map_mut(maps, entry.map.take()) {
            leave::<P>(old, id, &mut entry.debug);
        }
        entry.map = map;
        if let Some(new) = map_mut(maps, map) {
            P::members_mut(&mut new.members).push(id);
            if P::KIND == EntityKind::Region {
                new.mark(DirtyAspect::Mesh);
            }
        }
        if entry.debug.mark_all() {
            request(id, entry, maps, surface, settings, immediate);
        }
    }

    fn map_of<P: Primitive>(&self, id: P::Id) -> Option<MapId> {
        P::arena(&self.arenas).get(id)?.map
    }

    // -- Typed primitive API --

    /// Creates a detached region.
    pub fn region_create(&mut self, usage: Usage) -> RegionId {
        self.create::<RegionData>(usage)
    }

    /// Frees a region, cancelling its pending sync.
    pub fn region_free(&mut self, region: RegionId) {
        self.free::<RegionData>(region);
    }

    /// Moves a region to another map, or detaches it with `None`.
    pub fn region_set_map(&mut self, region: RegionId, map: Option<MapId>) {
        self.set_map::<RegionData>(region, map);
    }

    /// The region's map.
    pub fn region_map(&self, region: RegionId) -> Option<MapId> {
        self.map_of::<RegionData>(region)
    }

    /// Read access to a region's data.
    pub fn region(&self, region: RegionId) -> Option<&RegionData> {
        self.arenas.regions.get(region).map(|e| &e.data)
    }

    /// Places a region.
    pub fn region_set_transform(&mut self, region: RegionId, transform: Transform3d) {
        self.touch::<RegionData>(region, |data, view| {
            if data.transform == transform {
                return false;
            }
            data.transform = transform;
            view.mark(DirtyAspect::Transform)
        });
    }

    /// Enables or disables a region. Disabled regions use the disabled
    /// colors.
    pub fn region_set_enabled(&mut self, region: RegionId, enabled: bool) {
        self.touch::<RegionData>(region, |data, view| {
            if data.enabled == enabled {
                return false;
            }
            data.enabled = enabled;
            view.mark(color_aspect(view.usage()))
        });
    }

    /// Replaces a region's navigation mesh.
    pub fn region_set_navigation_mesh(&mut self, region: RegionId, mesh: NavMeshData) {
        self.touch::<RegionData>(region, |data, view| {
            data.navigation_mesh = mesh;
            view.mark(DirtyAspect::Mesh)
        });
    }

    /// Includes or excludes a region's connections from its map's overlay.
    pub fn region_set_use_edge_connections(&mut self, region: RegionId, enabled: bool) {
        self.edit_region_connections(region, |data| {
            let changed = data.use_edge_connections != enabled;
            data.use_edge_connections = enabled;
            changed
        });
    }

    /// Replaces the edge connections the map found for a region.
    pub fn region_set_connections(&mut self, region: RegionId, connections: Vec<EdgeConnection>) {
        self.edit_region_connections(region, |data| {
            data.connections = connections;
            true
        });
    }

    fn edit_region_connections(&mut self, region: RegionId, edit: impl FnOnce(&mut RegionData) -> bool) {
        let Some(entry) = self.arenas.regions.get_mut(region) else {
            stale(EntityKind::Region, region);
            return;
        };
        if !edit(&mut entry.data) {
            return;
        }
        if let Some(map) = map_mut(&mut self.maps, entry.map) {
            map.mark(DirtyAspect::Mesh);
        }
    }

    /// Creates a detached link.
    pub fn link_create(&mut self, usage: Usage) -> LinkId {
        self.create::<LinkData>(usage)
    }

    /// Frees a link, cancelling its pending sync.
    pub fn link_free(&mut self, link: LinkId) {
        self.free::<LinkData>(link);
    }

    /// Moves a link to another map, or detaches it with `None`.
    pub fn link_set_map(&mut self, link: LinkId, map: Option<MapId>) {
        self.set_map::<LinkData>(link, map);
    }

    /// The link's map.
    pub fn link_map(&self, link: LinkId) -> Option<MapId> {
        self.map_of::<LinkData>(link)
    }

    /// Read access to a link's data.
    pub fn link(&self, link: LinkId) -> Option<&LinkData> {
        self.arenas.links.get(link).map(|e| &e.data)
    }

    /// Enables or disables a link.
    pub fn link_set_enabled(&mut self, link: LinkId, enabled: bool) {
        self.touch::<LinkData>(link, |data, view| {
            if data.enabled == enabled {
                return false;
            }
            data.enabled = enabled;
            view.mark(color_aspect(view.usage()))
        });
    }

    /// Moves a link's start point.
    pub fn link_set_start(&mut self, link: LinkId, start: Vec3) {
        self.touch::<LinkData>(link, |data, view| {
            if data.start == start {
                return false;
            }
            data.start = start;
            view.mark(DirtyAspect::Mesh)
        });
    }

    /// Moves a link's end point.
    pub fn link_set_end(&mut self, link: LinkId, end: Vec3) {
        self.touch::<LinkData>(link, |data, view| {
            if data.end == end {
                return false;
            }
            data.end = end;
            view.mark(DirtyAspect::Mesh)
        });
    }

    /// Creates a detached obstacle.
    pub fn obstacle_create(&mut self, usage: Usage) -> ObstacleId {
        self.create::<ObstacleData>(usage)
    }

    /// Frees an obstacle, cancelling its pending sync.
    pub fn obstacle_free(&mut self, obstacle: ObstacleId) {
        self.free::<ObstacleData>(obstacle);
    }

    /// Moves an obstacle to another map, or detaches it with `None`.
    pub fn obstacle_set_map(&mut self, obstacle: ObstacleId, map: Option<MapId>) {
        self.set_map::<ObstacleData>(obstacle, map);
    }

    /// The obstacle's map.
    pub fn obstacle_map(&self, obstacle: ObstacleId) -> Option<MapId> {
        self.map_of::<ObstacleData>(obstacle)
    }

    /// Read access to an obstacle's data.
    pub fn obstacle(&self, obstacle: ObstacleId) -> Option<&ObstacleData> {
        self.arenas.obstacles.get(obstacle).map(|e| &e.data)
    }

    /// Moves an obstacle.
    pub fn obstacle_set_position(&mut self, obstacle: ObstacleId, position: Vec3) {
        self.touch::<ObstacleData>(obstacle, |data, view| {
            if data.position == position {
                return false;
            }
            data.position = position;
            view.mark(DirtyAspect::Transform)
        });
    }

    /// Replaces an obstacle's static outline.
    pub fn obstacle_set_vertices(&mut self, obstacle: ObstacleId, vertices: Vec<Vec3>) {
        self.touch::<ObstacleData>(obstacle, |data, view| {
            data.vertices = vertices;
            view.mark(DirtyAspect::Mesh)
        });
    }

    /// Sets the height of an obstacle's static outline.
    pub fn obstacle_set_height(&mut self, obstacle: ObstacleId, height: f32) {
        self.touch::<ObstacleData>(obstacle, |data, view| {
            if data.height == height {
                return false;
            }
            data.height = height;
            view.mark(DirtyAspect::Mesh)
        });
    }

    /// Sets an obstacle's avoidance radius.
    pub fn obstacle_set_radius(&mut self, obstacle: ObstacleId, radius: f32) {
        self.touch::<ObstacleData>(obstacle, |data, view| {
            if data.radius == radius {
                return false;
            }
            data.radius = radius;
            view.mark(DirtyAspect::Mesh)
        });
    }

    /// Creates a detached agent.
    pub fn agent_create(&mut self, usage: Usage) -> AgentId {
        self.create::<AgentData>(usage)
    }

    /// Frees an agent, cancelling its pending sync.
    pub fn agent_free(&mut self, agent: AgentId) {
        self.free::<AgentData>(agent);
    }

    /// Moves an agent to another map, or detaches it with `None`.
    pub fn agent_set_map(&mut self, agent: AgentId, map: Option<MapId>) {
        self.set_map::<AgentData>(agent, map);
    }

    /// The agent's map.
    pub fn agent_map(&self, agent: AgentId) -> Option<MapId> {
        self.map_of::<AgentData>(agent)
    }

    /// Read access to an agent's data.
    pub fn agent(&self, agent: AgentId) -> Option<&AgentData> {
        self.arenas.agents.get(agent).map(|e| &e.data)
    }

    /// Replaces an agent's current path.
    pub fn agent_set_path(&mut self, agent: AgentId, path: Vec<Vec3>) {
        self.touch::<AgentData>(agent, |data, view| {
            data.path = path;
            view.mark(DirtyAspect::Mesh)
        });
    }

    // -- Entity view API --

    /// Flips the view's own switch and rebuilds it right away on change.
    pub fn debug_set_enabled(&mut self, entity: impl Into<EntityId>, enabled: bool) {
        by_kind!(self.set_view_enabled(entity, enabled));
    }

    /// Returns the view's own switch.
    pub fn debug_is_enabled(&self, entity: impl Into<EntityId>) -> Option<bool> {
        by_kind!(self.view_enabled(entity))
    }

    /// Marks the view's placement stale.
    pub fn mark_transform_dirty(&mut self, entity: impl Into<EntityId>) {
        by_kind!(self.mark(entity, DirtyAspect::Transform));
    }

    /// Marks the view's geometry stale.
    pub fn mark_mesh_dirty(&mut self, entity: impl Into<EntityId>) {
        by_kind!(self.mark(entity, DirtyAspect::Mesh));
    }

    /// Marks the view's materials stale.
    pub fn mark_material_dirty(&mut self, entity: impl Into<EntityId>) {
        by_kind!(self.mark(entity, DirtyAspect::Material));
    }

    /// Marks the view's scenario or canvas stale.
    pub fn mark_parent_dirty(&mut self, entity: impl Into<EntityId>) {
        by_kind!(self.mark(entity, DirtyAspect::Parent));
    }

    /// Marks every aspect of the view stale.
    pub fn make_dirty(&mut self, entity: impl Into<EntityId>) {
        by_kind!(self.mark_all(entity));
    }

    /// Queues the view on its map, or syncs it now if it has none.
    /// Idempotent.
    pub fn request_sync(&mut self, entity: impl Into<EntityId>) {
        by_kind!(self.request_view(entity));
    }

    /// Cancels a pending sync request. Returns whether one existed.
    pub fn cancel_sync_request(&mut self, entity: impl Into<EntityId>) -> bool {
        by_kind!(self.cancel_view(entity))
    }

    /// Stale aspects of the view.
    pub fn dirty_flags(&self, entity: impl Into<EntityId>) -> Option<DirtyFlags> {
        by_kind!(self.view_dirty(entity))
    }

    /// Returns whether the view has an outstanding sync request.
    pub fn is_sync_requested(&self, entity: impl Into<EntityId>) -> Option<bool> {
        by_kind!(self.view_queued(entity))
    }

    /// The view's drawables.
    pub fn drawables(&self, entity: impl Into<EntityId>) -> Option<&[DrawableId]> {
        by_kind!(self.view_drawables(entity))
    }

    fn view<'a, P: Primitive + 'a>(&'a self, id: P::Id) -> Option<&'a EntityDebug>
    where
        P::Id: 'a,
    {
        P::arena(&self.arenas).get(id).map(|e| &e.debug)
    }

    fn view_enabled<P: Primitive>(&self, id: P::Id) -> Option<bool> {
        self.view::<P>(id).map(EntityDebug::is_enabled)
    }

    fn view_dirty<P: Primitive>(&self, id: P::Id) -> Option<DirtyFlags> {
        self.view::<P>(id).map(EntityDebug::dirty)
    }

    fn view_queued<P: Primitive>(&self, id: P::Id) -> Option<bool> {
        self.view::<P>(id).map(|v| v.slot.is_queued())
    }

    fn view_drawables<'a, P: Primitive + 'a>(&'a self, id: P::Id) -> Option<&'a [DrawableId]>
    where
        P::Id: 'a,
    {
        self.view::<P>(id).map(EntityDebug::drawables)
    }

    fn mark<P: Primitive>(&mut self, id: P::Id, aspect: DirtyAspect) {
        self.touch::<P>(id, |_, view| view.mark(aspect));
    }

    fn mark_all<P: Primitive>(&mut self, id: P::Id) {
        self.touch::<P>(id, |_, view| view.mark_all());
    }

    fn request_view<P: Primitive>(&mut self, id: P::Id) {
        self.touch::<P>(id, |_, view| !view.drawables().is_empty());
    }

    fn cancel_view<P: Primitive>(&mut self, id: P::Id) -> bool {
        let Some(entry) = P::arena_mut(&mut self.arenas).get_mut(id) else {
            stale(P::KIND, id);
            return false;
        };
        match map_mut(&mut self.maps, entry.map) {
            Some(map) => P::queue(&mut map.queues).remove(&mut entry.debug.slot),
            None => false,
        }
    }

    fn set_view_enabled<P: Primitive>(&mut self, id: P::Id, enabled: bool) {
        let Self {
            surface,
            settings,
            defaults,
            maps,
            arenas,
            ..
        } = self;
        let Some(entry) = P::arena_mut(arenas).get_mut(id) else {
            stale(P::KIND, id);
            return;
        };
        if !entry.debug.set_enabled(enabled) {
            return;
        }
        let map = match entry.map {
            Some(m) => maps.get(m).map(|m| m.context(P::KIND, *defaults)),
            None => None,
        };
        let mut cx = SyncContext {
            surface,
            settings,
            map,
        };
        entry.debug.sync(&entry.data, &mut cx);
    }

    /// Applies `edit` to an entity's data and view; if it reports a pending
    /// rebuild, requests a sync.
    fn touch<P: Primitive>(
        &mut self,
        id: P::Id,
        edit: impl FnOnce(&mut P, &mut EntityDebug) -> bool,
    ) -> bool {
        let Self {
            surface,
            settings,
            maps,
            arenas,
            immediate,
            ..
        } = self;
        let Some(entry) = P::arena_mut(arenas).get_mut(id) else {
            stale(P::KIND, id);
            return false;
        };
        if !edit(&mut entry.data, &mut entry.debug) {
            return false;
        }
        request(id, entry, maps, surface, settings, immediate);
        true
    }

    // -- Sync --

    /// Runs one frame of debug sync over every map. See
    /// [`sync_traced`](Self::sync_traced).
    pub fn sync(&mut self) -> SyncReport {
        self.sync_traced(&mut Tracer::none())
    }

    /// Runs one frame of debug sync, reporting each stage to `tracer`.
    ///
    /// Per map, in map creation order:
    ///
    /// 1. If a settings change is pending, every member view is marked
    ///    fully dirty and queued, and the overlay is marked for a rebuild.
    /// 2. The overlay's parent, mesh and material steps run. A re-resolved
    ///    parent is fanned out to every member.
    /// 3. The region, link, agent (3-D only) and obstacle queues are
    ///    flushed in that order. Each queued view is synced exactly once;
    ///    requests made during the flush wait for the next frame.
    pub fn sync_traced(&mut self, tracer: &mut Tracer<'_>) -> SyncReport {
        let frame_index = self.frame_index;
        self.frame_index += 1;
        let mut report = SyncReportBuilder::new(frame_index);

        for map in self.maps.keys().collect::<Vec<_>>() {
            self.sync_map(map, frame_index, tracer, &mut report);
        }

        report.set_immediate(core::mem::take(&mut self.immediate));
        report.set_materials_updated(core::mem::take(&mut self.materials_updated));
        let report = report.finish();
        tracer.sync_report(&report);
        report
    }

    fn sync_map(
        &mut self,
        map_id: MapId,
        frame_index: u64,
        tracer: &mut Tracer<'_>,
        report: &mut SyncReportBuilder,
    ) {
        let Self {
            surface,
            settings,
            defaults,
            maps,
            arenas,
            ..
        } = self;
        let Some(map) = maps.get_mut(map_id) else {
            return;
        };
        let defaults = *defaults;

        tracer.map_sync_begin(&MapSyncBeginEvent {
            frame_index,
            map: map_id,
            queued: map.queues.counts(),
        });

        if map.take_settings_dirty() {
            let entities = make_members_dirty(map, arenas);
            map.mark(DirtyAspect::Mesh);
            map.mark(DirtyAspect::Material);
            report.fan_out();
            tracer.settings_fan_out(&SettingsFanOutEvent {
                frame_index,
                map: map_id,
                entities,
            });
        }

        let overlay = map.sync_overlay(&arenas.regions, settings, surface, defaults);
        if overlay.reparented {
            let parent = |v: &mut EntityDebug| v.mark(DirtyAspect::Parent);
            mark_members(map, &mut arenas.regions, parent);
            mark_members(map, &mut arenas.links, parent);
            mark_members(map, &mut arenas.obstacles, parent);
            mark_members(map, &mut arenas.agents, parent);
        }
        if let Some(vertices) = overlay.rebuilt {
            tracer.overlay_rebuilt(&OverlayRebuiltEvent {
                frame_index,
                map: map_id,
                vertices,
            });
        }

        let mut flush = Flush {
            map: map_id,
            frame_index,
            defaults,
            synced: KindCounts::default(),
            skipped: 0,
        };
        flush.run(map, &mut arenas.regions, surface, settings, tracer);
        flush.run(map, &mut arenas.links, surface, settings, tracer);
        if map.usage() == Usage::ThreeD {
            flush.run(map, &mut arenas.agents, surface, settings, tracer);
        }
        flush.run(map, &mut arenas.obstacles, surface, settings, tracer);

        for _ in 0..flush.skipped {
            report.skipped();
        }
        let end = MapSyncEndEvent {
            frame_index,
            map: map_id,
            synced: flush.synced,
        };
        report.map_synced(&end);
        tracer.map_sync_end(&end);
    }
}

fn map_mut(maps: &mut Slots<MapId, MapDebug>, id: Option<MapId>) -> Option<&mut MapDebug> {
    match id {
        Some(id) => maps.get_mut(id),
        None => None,
    }
}

/// Which aspect a color-only change dirties.
///
/// 3-D views draw with shared cached materials, so re-applying the material
/// is enough. 2-D views bake colors into their canvas shapes and must
/// rebuild the mesh.
fn color_aspect(usage: Usage) -> DirtyAspect {
    match usage {
        Usage::ThreeD => DirtyAspect::Material,
        Usage::TwoD => DirtyAspect::Mesh,
    }
}

/// Queues a dirty view on its map, or rebuilds it now if it has none.
fn request<P: Primitive, S: DrawingSurface>(
    id: P::Id,
    entry: &mut Entry<P>,
    maps: &mut Slots<MapId, MapDebug>,
    surface: &mut S,
    settings: &mut DebugSettings,
    immediate: &mut u32,
) {
    match map_mut(maps, entry.map) {
        Some(map) => {
            P::queue(&mut map.queues).add(id, &mut entry.debug.slot);
        }
        None => sync_detached(entry, surface, settings, immediate),
    }
}

fn sync_detached<P: Primitive, S: DrawingSurface>(
    entry: &mut Entry<P>,
    surface: &mut S,
    settings: &mut DebugSettings,
    immediate: &mut u32,
) {
    let mut cx = SyncContext {
        surface,
        settings,
        map: None,
    };
    if !entry.debug.sync(&entry.data, &mut cx).is_clean() {
        *immediate += 1;
    }
}

/// Removes a view from a map's queue and member list.
fn leave<P: Primitive>(map: &mut MapDebug, id: P::Id, view: &mut EntityDebug) {
    P::queue(&mut map.queues).remove(&mut view.slot);
    P::members_mut(&mut map.members).retain(|&member| member != id);
    if P::KIND == EntityKind::Region {
        map.mark(DirtyAspect::Mesh);
    }
}

/// Applies `op` to every member view of kind `P` and queues those that
/// report a pending rebuild. Returns the number of members visited.
fn mark_members<P: Primitive>(
    map: &mut MapDebug,
    arena: &mut Slots<P::Id, Entry<P>>,
    op: impl Fn(&mut EntityDebug) -> bool,
) -> u32 {
    let queue = P::queue(&mut map.queues);
    let mut visited = 0;
    for &id in P::members(&map.members) {
        let Some(entry) = arena.get_mut(id) else {
            continue;
        };
        visited += 1;
        if op(&mut entry.debug) {
            queue.add(id, &mut entry.debug.slot);
        }
    }
    visited
}

fn make_members_dirty(map: &mut MapDebug, arenas: &mut Arenas) -> KindCounts {
    let dirty = |v: &mut EntityDebug| v.mark_all();
    let mut counts = KindCounts::default();
    counts.add(EntityKind::Region, mark_members(map, &mut arenas.regions, dirty));
    counts.add(EntityKind::Link, mark_members(map, &mut arenas.links, dirty));
    counts.add(EntityKind::Agent, mark_members(map, &mut arenas.agents, dirty));
    counts.add(EntityKind::Obstacle, mark_members(map, &mut arenas.obstacles, dirty));
    counts
}

/// Sets the switch of every member view of kind `P`, rebuilding changed
/// views right away.
fn set_members_enabled<P: Primitive, S: DrawingSurface>(
    map: &MapDebug,
    arena: &mut Slots<P::Id, Entry<P>>,
    surface: &mut S,
    settings: &mut DebugSettings,
    defaults: DefaultParents,
    enabled: bool,
) {
    let mut cx = SyncContext {
        surface,
        settings,
        map: Some(map.context(P::KIND, defaults)),
    };
    for &id in P::members(&map.members) {
        let Some(entry) = arena.get_mut(id) else {
            continue;
        };
        if entry.debug.set_enabled(enabled) {
            entry.debug.sync(&entry.data, &mut cx);
        }
    }
}

/// Per-map queue flush state.
struct Flush {
    map: MapId,
    frame_index: u64,
    defaults: DefaultParents,
    synced: KindCounts,
    skipped: u32,
}

impl Flush {
    fn run<P: Primitive, S: DrawingSurface>(
        &mut self,
        map: &mut MapDebug,
        arena: &mut Slots<P::Id, Entry<P>>,
        surface: &mut S,
        settings: &mut DebugSettings,
        tracer: &mut Tracer<'_>,
    ) {
        let mut cx = SyncContext {
            surface,
            settings,
            map: Some(map.context(P::KIND, self.defaults)),
        };
        let (map_id, frame_index) = (self.map, self.frame_index);
        let mut synced = 0;
        let mut skipped = 0;
        P::queue(&mut map.queues).flush_all(|_, request| {
            let Some(entry) = arena.get_mut(request.key) else {
                skipped += 1;
                return;
            };
            if !entry.debug.slot.release(request.epoch) {
                skipped += 1;
                return;
            }
            let rebuilt = entry.debug.sync(&entry.data, &mut cx);
            synced += 1;
            let entity = entry.debug.owner();
            let queued: EntityId = request.key.into();
            debug_assert_eq!(entity, queued, "queued under its owner's handle");
            tracer.entity_sync(&EntitySyncEvent {
                frame_index,
                map: map_id,
                entity,
                rebuilt,
            });
        });
        self.synced.add(P::KIND, synced);
        self.skipped += skipped;
    }
}

impl fmt::Debug for Flush {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flush")
            .field("map", &self.map)
            .field("synced", &self.synced)
            .finish_non_exhaustive()
    }
}
