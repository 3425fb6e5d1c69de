// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug toggles, colors and the shared material cache.
//!
//! One [`DebugSettings`] instance is owned by the
//! [`NavigationDebugServer`](crate::server::NavigationDebugServer) and passed
//! by reference into every view's rebuild step.
//!
//! # Materials
//!
//! Materials are built lazily by [`DebugSettings::material`] the first time a
//! view needs one, then cached until [`DebugSettings::finish`]. Color and
//! x-ray setters patch the cached [`MaterialDesc`] in place and mark it
//! stale; the surface copy is refreshed by
//! [`flush_materials`](DebugSettings::flush_materials) or on the next
//! lookup. Setters never invalidate entities.
//!
//! # Geometry toggles
//!
//! Toggles that change *what* is drawn record a pending change instead.
//! [`take_changes`](DebugSettings::take_changes) reports and clears it; the
//! server turns it into a full rebuild of every map.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::color::Color;
use crate::id::{EntityKind, MaterialId};
use crate::surface::{DrawingSurface, MaterialDesc, RenderPriority};

/// Smallest accepted agent path point size.
pub const MIN_PATH_POINT_SIZE: f32 = 0.1;

/// Read access to persisted configuration, keyed by
/// `navigation/3d/debug/...` paths.
///
/// Missing keys and values of the wrong type return `None` and leave the
/// default in place.
pub trait SettingsSource {
    /// Looks up a boolean.
    fn get_bool(&self, key: &str) -> Option<bool>;
    /// Looks up a color.
    fn get_color(&self, key: &str) -> Option<Color>;
    /// Looks up a number.
    fn get_float(&self, key: &str) -> Option<f64>;
}

/// A source with no values; every setting keeps its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSettings;

impl SettingsSource for NoSettings {
    fn get_bool(&self, _key: &str) -> Option<bool> {
        None
    }

    fn get_color(&self, _key: &str) -> Option<Color> {
        None
    }

    fn get_float(&self, _key: &str) -> Option<f64> {
        None
    }
}

/// The cached materials, one per role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    /// Region faces of an enabled region.
    GeometryFace,
    /// Region faces of a disabled region.
    GeometryFaceDisabled,
    /// Region edge lines of an enabled region.
    GeometryEdge,
    /// Region edge lines of a disabled region.
    GeometryEdgeDisabled,
    /// The map's edge-connection overlay.
    EdgeConnections,
    /// An enabled link.
    LinkConnections,
    /// A disabled link.
    LinkConnectionsDisabled,
    /// Agent path polyline.
    AgentPathLine,
    /// Agent path points.
    AgentPathPoint,
    /// Obstacle avoidance radius volume.
    ObstacleRadius,
    /// Faces of a static obstacle that pushes agents in.
    StaticPushInFace,
    /// Faces of a static obstacle that pushes agents out.
    StaticPushOutFace,
    /// Edges of a static obstacle that pushes agents in.
    StaticPushInEdge,
    /// Edges of a static obstacle that pushes agents out.
    StaticPushOutEdge,
}

impl MaterialSlot {
    /// Number of slots.
    pub const COUNT: usize = 14;

    /// Every slot, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::GeometryFace,
        Self::GeometryFaceDisabled,
        Self::GeometryEdge,
        Self::GeometryEdgeDisabled,
        Self::EdgeConnections,
        Self::LinkConnections,
        Self::LinkConnectionsDisabled,
        Self::AgentPathLine,
        Self::AgentPathPoint,
        Self::ObstacleRadius,
        Self::StaticPushInFace,
        Self::StaticPushOutFace,
        Self::StaticPushInEdge,
        Self::StaticPushOutEdge,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Pending geometry-affecting changes reported by
/// [`DebugSettings::take_changes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettingsChanges {
    /// A navigation toggle (maps, regions, links, agent paths) changed.
    pub navigation: bool,
    /// An avoidance toggle (obstacles, radii) changed.
    pub avoidance: bool,
}

impl SettingsChanges {
    /// Returns whether nothing changed.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !(self.navigation || self.avoidance)
    }
}

#[derive(Clone, Copy, Debug)]
struct CachedMaterial {
    id: MaterialId,
    desc: MaterialDesc,
    stale: bool,
}

#[derive(Clone, Copy)]
enum Invalidates {
    Navigation,
    Avoidance,
    Both,
}

/// Generates getter/setter pairs for geometry toggles.
macro_rules! toggles {
    ($( $(#[$meta:meta])* $field:ident / $setter:ident => $inval:ident; )*) => {
        $(
            $(#[$meta])*
            #[inline]
            #[must_use]
            pub fn $field(&self) -> bool {
                self.$field
            }

            #[doc = concat!("Sets [`", stringify!($field), "`](Self::", stringify!($field), ").")]
            pub fn $setter(&mut self, enabled: bool) {
                if self.$field != enabled {
                    self.$field = enabled;
                    self.invalidate(Invalidates::$inval);
                }
            }
        )*
    };
}

/// Generates getter/setter pairs for x-ray toggles, which patch the depth
/// test of the listed materials.
macro_rules! xray_toggles {
    ($( $(#[$meta:meta])* $field:ident / $setter:ident => [$($slot:ident),+]; )*) => {
        $(
            $(#[$meta])*
            #[inline]
            #[must_use]
            pub fn $field(&self) -> bool {
                self.$field
            }

            #[doc = concat!("Sets [`", stringify!($field), "`](Self::", stringify!($field), ").")]
            pub fn $setter(&mut self, enabled: bool) {
                self.$field = enabled;
                $( self.patch(MaterialSlot::$slot, |d| d.no_depth_test = enabled); )+
            }
        )*
    };
}

/// Generates getter/setter pairs for colors, which patch the albedo of the
/// listed materials.
macro_rules! colors {
    ($( $(#[$meta:meta])* $field:ident / $setter:ident => [$($slot:ident),*]; )*) => {
        $(
            $(#[$meta])*
            #[inline]
            #[must_use]
            pub fn $field(&self) -> Color {
                self.$field
            }

            #[doc = concat!("Sets [`", stringify!($field), "`](Self::", stringify!($field), ").")]
            pub fn $setter(&mut self, color: Color) {
                self.$field = color;
                $( self.patch(MaterialSlot::$slot, |d| d.albedo = color); )*
            }
        )*
    };
}

/// Toggles, colors and cached materials shared by every debug view.
#[derive(Debug)]
pub struct DebugSettings {
    debug_enabled: bool,
    navigation_enabled: bool,
    avoidance_enabled: bool,
    maps_enabled: bool,
    regions_enabled: bool,
    links_enabled: bool,
    obstacles_enabled: bool,
    agents_enabled: bool,

    edge_connections_enabled: bool,
    edge_connections_xray: bool,
    edge_lines_enabled: bool,
    edge_lines_xray: bool,
    face_random_color_enabled: bool,
    link_connections_enabled: bool,
    link_connections_xray: bool,
    agent_paths_enabled: bool,
    agent_paths_xray: bool,
    obstacle_radius_enabled: bool,
    obstacle_static_enabled: bool,

    edge_connection_color: Color,
    geometry_edge_color: Color,
    geometry_face_color: Color,
    geometry_edge_disabled_color: Color,
    geometry_face_disabled_color: Color,
    link_connection_color: Color,
    link_connection_disabled_color: Color,
    agent_path_color: Color,
    obstacle_radius_color: Color,
    static_pushin_face_color: Color,
    static_pushout_face_color: Color,
    static_pushin_edge_color: Color,
    static_pushout_edge_color: Color,
    agent_path_point_size: f32,

    navigation_debug_dirty: bool,
    avoidance_debug_dirty: bool,

    materials: [Option<CachedMaterial>; MaterialSlot::COUNT],
    rng: SmallRng,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugSettings {
    /// Creates settings with every default in place and no materials.
    ///
    /// Face color jitter is seeded from the OS with the `std` feature and
    /// from a fixed seed otherwise.
    #[must_use]
    pub fn new() -> Self {
        #[cfg(feature = "std")]
        let rng = SmallRng::from_os_rng();
        #[cfg(not(feature = "std"))]
        let rng = SmallRng::seed_from_u64(0x6361_6972_6e00);
        Self::with_rng(rng)
    }

    /// Creates default settings with a reproducible face color jitter.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            debug_enabled: true,
            navigation_enabled: true,
            avoidance_enabled: true,
            maps_enabled: true,
            regions_enabled: true,
            links_enabled: true,
            obstacles_enabled: true,
            agents_enabled: true,

            edge_connections_enabled: true,
            edge_connections_xray: true,
            edge_lines_enabled: true,
            edge_lines_xray: true,
            face_random_color_enabled: true,
            link_connections_enabled: true,
            link_connections_xray: true,
            agent_paths_enabled: true,
            agent_paths_xray: true,
            obstacle_radius_enabled: true,
            obstacle_static_enabled: true,

            edge_connection_color: Color::new(1.0, 0.0, 1.0, 1.0),
            geometry_edge_color: Color::new(0.5, 1.0, 1.0, 1.0),
            geometry_face_color: Color::new(0.5, 1.0, 1.0, 0.4),
            geometry_edge_disabled_color: Color::new(0.5, 0.5, 0.5, 1.0),
            geometry_face_disabled_color: Color::new(0.5, 0.5, 0.5, 0.4),
            link_connection_color: Color::new(1.0, 0.5, 1.0, 1.0),
            link_connection_disabled_color: Color::new(0.5, 0.5, 0.5, 1.0),
            agent_path_color: Color::new(1.0, 0.0, 0.0, 1.0),
            obstacle_radius_color: Color::new(1.0, 0.5, 0.0, 0.25),
            static_pushin_face_color: Color::new(1.0, 0.0, 0.0, 0.0),
            static_pushout_face_color: Color::new(1.0, 1.0, 0.0, 0.5),
            static_pushin_edge_color: Color::new(1.0, 0.0, 0.0, 1.0),
            static_pushout_edge_color: Color::new(1.0, 1.0, 0.0, 1.0),
            agent_path_point_size: 4.0,

            navigation_debug_dirty: true,
            avoidance_debug_dirty: true,

            materials: [None; MaterialSlot::COUNT],
            rng,
        }
    }

    /// Applies every persisted value found in `source`.
    ///
    /// Called once at startup, before the first sync. Values go through the
    /// regular setters, so materials cached by an earlier frame are patched.
    pub fn init(&mut self, source: &dyn SettingsSource) {
        for &(key, set) in BOOL_KEYS {
            if let Some(value) = source.get_bool(key) {
                set(self, value);
            }
        }
        for &(key, set) in COLOR_KEYS {
            if let Some(value) = source.get_color(key) {
                set(self, value);
            }
        }
        if let Some(size) = source.get_float(PATH_POINT_SIZE_KEY) {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "point sizes are small screen-space values"
            )]
            let size = size as f32;
            self.set_agent_path_point_size(size);
        }
        log::debug!("debug settings initialized");
    }

    /// Releases every cached material. Called once at shutdown.
    pub fn finish<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        for cached in self.materials.iter_mut().filter_map(Option::take) {
            surface.free_material(cached.id);
        }
    }

    // -- Global visibility ---------------------------------------------------

    toggles! {
        /// Master switch for all navigation debug drawing.
        debug_enabled / set_debug_enabled => Both;
        /// Switch for navigation debug drawing (maps, regions, links, agent
        /// paths).
        navigation_enabled / set_navigation_enabled => Navigation;
        /// Switch for avoidance debug drawing (obstacles).
        avoidance_enabled / set_avoidance_enabled => Avoidance;
        /// Per-kind switch for map overlays.
        maps_enabled / set_maps_enabled => Navigation;
        /// Per-kind switch for regions.
        regions_enabled / set_regions_enabled => Navigation;
        /// Per-kind switch for links.
        links_enabled / set_links_enabled => Navigation;
        /// Per-kind switch for obstacles.
        obstacles_enabled / set_obstacles_enabled => Avoidance;
        /// Per-kind switch for agents.
        agents_enabled / set_agents_enabled => Navigation;
    }

    /// Returns whether entities of `kind` may draw at all, combining the
    /// master, group and per-kind switches.
    #[must_use]
    pub fn kind_enabled(&self, kind: EntityKind) -> bool {
        self.debug_enabled
            && match kind {
                EntityKind::Region => self.navigation_enabled && self.regions_enabled,
                EntityKind::Link => self.navigation_enabled && self.links_enabled,
                EntityKind::Agent => self.navigation_enabled && self.agents_enabled,
                EntityKind::Obstacle => self.avoidance_enabled && self.obstacles_enabled,
            }
    }

    /// Returns whether map overlays may draw at all.
    #[must_use]
    pub fn map_overlays_enabled(&self) -> bool {
        self.debug_enabled && self.navigation_enabled && self.maps_enabled
    }

    // -- Geometry toggles ----------------------------------------------------

    toggles! {
        /// Draw the map's edge-connection overlay.
        edge_connections_enabled / set_edge_connections_enabled => Navigation;
        /// Draw region edge lines.
        edge_lines_enabled / set_edge_lines_enabled => Navigation;
        /// Draw link lines and search circles.
        link_connections_enabled / set_link_connections_enabled => Navigation;
        /// Draw agent paths.
        agent_paths_enabled / set_agent_paths_enabled => Navigation;
        /// Draw obstacle avoidance radii.
        obstacle_radius_enabled / set_obstacle_radius_enabled => Avoidance;
        /// Draw static obstacle outlines.
        obstacle_static_enabled / set_obstacle_static_enabled => Avoidance;
    }

    /// Jitter each region polygon's face color.
    #[inline]
    #[must_use]
    pub fn face_random_color_enabled(&self) -> bool {
        self.face_random_color_enabled
    }

    /// Sets [`face_random_color_enabled`](Self::face_random_color_enabled).
    ///
    /// Also switches the face material between albedo and vertex colors.
    pub fn set_face_random_color_enabled(&mut self, enabled: bool) {
        if self.face_random_color_enabled != enabled {
            self.face_random_color_enabled = enabled;
            self.patch(MaterialSlot::GeometryFace, |d| {
                d.vertex_color_as_albedo = enabled;
            });
            self.invalidate(Invalidates::Navigation);
        }
    }

    // -- X-ray ---------------------------------------------------------------

    xray_toggles! {
        /// Edge connections draw through geometry.
        edge_connections_xray / set_edge_connections_xray => [EdgeConnections];
        /// Region edge lines draw through geometry.
        edge_lines_xray / set_edge_lines_xray => [GeometryEdge, GeometryEdgeDisabled];
        /// Links draw through geometry.
        link_connections_xray / set_link_connections_xray => [LinkConnections, LinkConnectionsDisabled];
        /// Agent paths draw through geometry.
        agent_paths_xray / set_agent_paths_xray => [AgentPathLine, AgentPathPoint];
    }

    // -- Colors --------------------------------------------------------------

    colors! {
        /// Color of the map's edge-connection overlay.
        edge_connection_color / set_edge_connection_color => [EdgeConnections];
        /// Region edge color.
        geometry_edge_color / set_geometry_edge_color => [GeometryEdge];
        /// Region face base color.
        geometry_face_color / set_geometry_face_color => [GeometryFace];
        /// Region edge color when the region is disabled.
        geometry_edge_disabled_color / set_geometry_edge_disabled_color => [GeometryEdgeDisabled];
        /// Region face color when the region is disabled.
        geometry_face_disabled_color / set_geometry_face_disabled_color => [GeometryFaceDisabled];
        /// Link color.
        link_connection_color / set_link_connection_color => [LinkConnections];
        /// Link color when the link is disabled.
        link_connection_disabled_color / set_link_connection_disabled_color => [LinkConnectionsDisabled];
        /// Agent path line and point color.
        agent_path_color / set_agent_path_color => [AgentPathLine, AgentPathPoint];
        /// Obstacle avoidance radius color.
        obstacle_radius_color / set_obstacle_radius_color => [ObstacleRadius];
        /// Face color of an obstacle that pushes agents in.
        static_pushin_face_color / set_static_pushin_face_color => [StaticPushInFace];
        /// Face color of an obstacle that pushes agents out.
        static_pushout_face_color / set_static_pushout_face_color => [StaticPushOutFace];
        /// Edge color of an obstacle that pushes agents in.
        static_pushin_edge_color / set_static_pushin_edge_color => [StaticPushInEdge];
        /// Edge color of an obstacle that pushes agents out.
        static_pushout_edge_color / set_static_pushout_edge_color => [StaticPushOutEdge];
    }

    /// Agent path point size in pixels.
    #[inline]
    #[must_use]
    pub fn agent_path_point_size(&self) -> f32 {
        self.agent_path_point_size
    }

    /// Sets the agent path point size, clamped to at least
    /// [`MIN_PATH_POINT_SIZE`].
    pub fn set_agent_path_point_size(&mut self, size: f32) {
        let size = size.max(MIN_PATH_POINT_SIZE);
        self.agent_path_point_size = size;
        self.patch(MaterialSlot::AgentPathPoint, |d| d.point_size = Some(size));
    }

    // -- Change tracking -----------------------------------------------------

    fn invalidate(&mut self, what: Invalidates) {
        match what {
            Invalidates::Navigation => self.navigation_debug_dirty = true,
            Invalidates::Avoidance => self.avoidance_debug_dirty = true,
            Invalidates::Both => {
                self.navigation_debug_dirty = true;
                self.avoidance_debug_dirty = true;
            }
        }
    }

    /// Reports and clears pending geometry-affecting changes.
    pub fn take_changes(&mut self) -> SettingsChanges {
        let changes = SettingsChanges {
            navigation: self.navigation_debug_dirty,
            avoidance: self.avoidance_debug_dirty,
        };
        self.navigation_debug_dirty = false;
        self.avoidance_debug_dirty = false;
        changes
    }

    // -- Materials -----------------------------------------------------------

    /// Returns the cached material for `slot`, creating it on first use and
    /// refreshing a stale surface copy.
    pub fn material<S: DrawingSurface + ?Sized>(
        &mut self,
        slot: MaterialSlot,
        surface: &mut S,
    ) -> MaterialId {
        if let Some(cached) = &mut self.materials[slot.index()] {
            if cached.stale {
                surface.update_material(cached.id, &cached.desc);
                cached.stale = false;
            }
            return cached.id;
        }
        let desc = self.describe(slot);
        let id = surface.create_material(&desc);
        self.materials[slot.index()] = Some(CachedMaterial {
            id,
            desc,
            stale: false,
        });
        id
    }

    /// Returns the cached description for `slot`, if the material exists.
    #[must_use]
    pub fn cached_material(&self, slot: MaterialSlot) -> Option<(MaterialId, MaterialDesc)> {
        self.materials[slot.index()].map(|c| (c.id, c.desc))
    }

    /// Pushes every patched material description to the surface.
    ///
    /// Returns the number of materials updated.
    pub fn flush_materials<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let mut updated = 0;
        for cached in self.materials.iter_mut().flatten() {
            if cached.stale {
                surface.update_material(cached.id, &cached.desc);
                cached.stale = false;
                updated += 1;
            }
        }
        updated
    }

    fn patch(&mut self, slot: MaterialSlot, edit: impl FnOnce(&mut MaterialDesc)) {
        if let Some(cached) = &mut self.materials[slot.index()] {
            edit(&mut cached.desc);
            cached.stale = true;
        }
    }

    /// Builds the description of a fresh material for `slot` from the
    /// current settings.
    #[must_use]
    pub fn describe(&self, slot: MaterialSlot) -> MaterialDesc {
        let translucent = |albedo: Color| MaterialDesc {
            transparent: true,
            double_sided: true,
            render_priority: RenderPriority::UNDERLAY,
            ..MaterialDesc::unshaded(albedo)
        };
        let overlay = |albedo: Color, xray: bool| MaterialDesc {
            no_depth_test: xray,
            render_priority: RenderPriority::OVERLAY,
            ..MaterialDesc::unshaded(albedo)
        };
        match slot {
            MaterialSlot::GeometryFace => MaterialDesc {
                transparent: true,
                double_sided: true,
                vertex_color_as_albedo: self.face_random_color_enabled,
                ..MaterialDesc::unshaded(self.geometry_face_color)
            },
            MaterialSlot::GeometryFaceDisabled => MaterialDesc {
                transparent: true,
                ..MaterialDesc::unshaded(self.geometry_face_disabled_color)
            },
            MaterialSlot::GeometryEdge => MaterialDesc {
                no_depth_test: self.edge_lines_xray,
                ..MaterialDesc::unshaded(self.geometry_edge_color)
            },
            MaterialSlot::GeometryEdgeDisabled => MaterialDesc {
                no_depth_test: self.edge_lines_xray,
                ..MaterialDesc::unshaded(self.geometry_edge_disabled_color)
            },
            MaterialSlot::EdgeConnections => {
                overlay(self.edge_connection_color, self.edge_connections_xray)
            }
            MaterialSlot::LinkConnections => {
                overlay(self.link_connection_color, self.link_connections_xray)
            }
            MaterialSlot::LinkConnectionsDisabled => {
                overlay(self.link_connection_disabled_color, self.link_connections_xray)
            }
            MaterialSlot::AgentPathLine => overlay(self.agent_path_color, self.agent_paths_xray),
            MaterialSlot::AgentPathPoint => MaterialDesc {
                point_size: Some(self.agent_path_point_size),
                ..overlay(self.agent_path_color, self.agent_paths_xray)
            },
            MaterialSlot::ObstacleRadius => translucent(self.obstacle_radius_color),
            MaterialSlot::StaticPushInFace => translucent(self.static_pushin_face_color),
            MaterialSlot::StaticPushOutFace => translucent(self.static_pushout_face_color),
            MaterialSlot::StaticPushInEdge => MaterialDesc {
                no_depth_test: true,
                ..MaterialDesc::unshaded(self.static_pushin_edge_color)
            },
            MaterialSlot::StaticPushOutEdge => MaterialDesc {
                no_depth_test: true,
                ..MaterialDesc::unshaded(self.static_pushout_edge_color)
            },
        }
    }

    /// The random stream used for face color jitter.
    pub(crate) fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}

/// Configuration key of the agent path point size.
pub const PATH_POINT_SIZE_KEY: &str = "navigation/3d/debug/agents/path_point_size";

type BoolSetter = fn(&mut DebugSettings, bool);
type ColorSetter = fn(&mut DebugSettings, Color);

/// Persisted boolean settings and the setters they feed.
pub const BOOL_KEYS: &[(&str, BoolSetter)] = &[
    (
        "navigation/3d/debug/navmesh/enable_edge_connections",
        DebugSettings::set_edge_connections_enabled,
    ),
    (
        "navigation/3d/debug/navmesh/enable_edge_connections_xray",
        DebugSettings::set_edge_connections_xray,
    ),
    (
        "navigation/3d/debug/navmesh/enable_edge_lines",
        DebugSettings::set_edge_lines_enabled,
    ),
    (
        "navigation/3d/debug/navmesh/enable_edge_lines_xray",
        DebugSettings::set_edge_lines_xray,
    ),
    (
        "navigation/3d/debug/navmesh/enable_geometry_face_random_color",
        DebugSettings::set_face_random_color_enabled,
    ),
    (
        "navigation/3d/debug/links/enable_connections",
        DebugSettings::set_link_connections_enabled,
    ),
    (
        "navigation/3d/debug/links/enable_connections_xray",
        DebugSettings::set_link_connections_xray,
    ),
    (
        "navigation/3d/debug/agents/enable_paths",
        DebugSettings::set_agent_paths_enabled,
    ),
    (
        "navigation/3d/debug/agents/enable_paths_xray",
        DebugSettings::set_agent_paths_xray,
    ),
    (
        "navigation/3d/debug/obstacles/enable_radius",
        DebugSettings::set_obstacle_radius_enabled,
    ),
    (
        "navigation/3d/debug/obstacles/enable_static",
        DebugSettings::set_obstacle_static_enabled,
    ),
];

/// Persisted color settings and the setters they feed.
pub const COLOR_KEYS: &[(&str, ColorSetter)] = &[
    (
        "navigation/3d/debug/navmesh/edge_connection_color",
        DebugSettings::set_edge_connection_color,
    ),
    (
        "navigation/3d/debug/navmesh/geometry_edge_color",
        DebugSettings::set_geometry_edge_color,
    ),
    (
        "navigation/3d/debug/navmesh/geometry_face_color",
        DebugSettings::set_geometry_face_color,
    ),
    (
        "navigation/3d/debug/navmesh/geometry_edge_disabled_color",
        DebugSettings::set_geometry_edge_disabled_color,
    ),
    (
        "navigation/3d/debug/navmesh/geometry_face_disabled_color",
        DebugSettings::set_geometry_face_disabled_color,
    ),
    (
        "navigation/3d/debug/links/connection_color",
        DebugSettings::set_link_connection_color,
    ),
    (
        "navigation/3d/debug/links/connection_disabled_color",
        DebugSettings::set_link_connection_disabled_color,
    ),
    (
        "navigation/3d/debug/agents/path_color",
        DebugSettings::set_agent_path_color,
    ),
    (
        "navigation/3d/debug/obstacles/radius_color",
        DebugSettings::set_obstacle_radius_color,
    ),
    (
        "navigation/3d/debug/obstacles/static_face_pushin_color",
        DebugSettings::set_static_pushin_face_color,
    ),
    (
        "navigation/3d/debug/obstacles/static_edge_pushin_color",
        DebugSettings::set_static_pushin_edge_color,
    ),
    (
        "navigation/3d/debug/obstacles/static_face_pushout_color",
        DebugSettings::set_static_pushout_face_color,
    ),
    (
        "navigation/3d/debug/obstacles/static_edge_pushout_color",
        DebugSettings::set_static_pushout_edge_color,
    ),
];
