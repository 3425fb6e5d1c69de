// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing-surface contract for rendering integrations.
//!
//! The debug core never touches GPU or scene resources directly. Everything
//! it draws goes through a [`DrawingSurface`], which owns:
//!
//! - **Drawables**: a 3-D mesh instance or a 2-D canvas item, addressed by
//!   [`DrawableId`]. Geometry is appended as batches (3-D) or shapes (2-D)
//!   and dropped again by [`clear`](DrawingSurface::clear).
//! - **Materials**: addressed by [`MaterialId`], described by a
//!   [`MaterialDesc`] and patched in place with
//!   [`update_material`](DrawingSurface::update_material).
//! - **Parents**: the scenario (3-D) or canvas (2-D) a drawable is shown
//!   in, addressed by [`ParentId`]. A drawable with no parent is not shown.
//!
//! All calls happen on the thread that owns the
//! [`NavigationDebugServer`](crate::server::NavigationDebugServer), during
//! its mutators or its per-frame [`sync`](crate::server::NavigationDebugServer::sync).
//!
//! `cairn_render` provides a retained, in-memory implementation that can be
//! drawn from or inspected in tests.

use kurbo::{Affine, Circle, Line, Point};

use crate::color::Color;
use crate::id::{DrawableId, MaterialId, ParentId};
use crate::math::{Transform3d, Vec3};

/// Which flavor of drawable to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    /// A 3-D mesh instance placed in a scenario.
    Mesh,
    /// A 2-D canvas item placed in a canvas.
    CanvasItem,
}

/// How the vertices of a batch are assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Every three vertices (or indices) form a triangle.
    Triangles,
    /// Every two vertices form a line segment.
    Lines,
    /// Consecutive vertices form a connected polyline.
    LineStrip,
    /// Each vertex is drawn as a point.
    Points,
}

/// Draw ordering among transparent geometry; higher draws later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderPriority(pub i32);

impl RenderPriority {
    /// Lowest priority.
    pub const MIN: Self = Self(-128);
    /// Highest priority.
    pub const MAX: Self = Self(127);
    /// Neutral priority.
    pub const DEFAULT: Self = Self(0);
    /// Connection and path overlays that must draw above solid faces.
    pub const OVERLAY: Self = Self(Self::MAX.0 - 2);
    /// Translucent radius volumes that must draw below everything else.
    pub const UNDERLAY: Self = Self(Self::MIN.0 + 2);
}

/// Description of an unshaded debug material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialDesc {
    /// Base color.
    pub albedo: Color,
    /// Alpha blending is enabled.
    pub transparent: bool,
    /// Per-vertex colors replace the albedo.
    pub vertex_color_as_albedo: bool,
    /// Geometry draws on top of everything regardless of depth ("x-ray").
    pub no_depth_test: bool,
    /// Back faces are drawn too.
    pub double_sided: bool,
    /// Draw ordering relative to other transparent geometry.
    pub render_priority: RenderPriority,
    /// Point sprite size in pixels, for point batches.
    pub point_size: Option<f32>,
}

impl MaterialDesc {
    /// An opaque, single-sided, depth-tested material with the given color.
    #[must_use]
    pub const fn unshaded(albedo: Color) -> Self {
        Self {
            albedo,
            transparent: false,
            vertex_color_as_albedo: false,
            no_depth_test: false,
            double_sided: false,
            render_priority: RenderPriority::DEFAULT,
            point_size: None,
        }
    }
}

/// One batch of 3-D geometry appended to a mesh drawable.
///
/// Each batch becomes one surface of the drawable; surfaces are numbered in
/// submission order starting from 0.
#[derive(Clone, Copy, Debug)]
pub struct MeshBatch<'a> {
    /// How vertices are assembled.
    pub primitive: PrimitiveKind,
    /// Vertex positions in drawable-local space.
    pub vertices: &'a [Vec3],
    /// Optional per-vertex colors, same length as `vertices`.
    pub colors: Option<&'a [Color]>,
    /// Optional index buffer into `vertices`.
    pub indices: Option<&'a [u32]>,
    /// Draw ordering hint for this batch.
    pub priority: RenderPriority,
}

impl<'a> MeshBatch<'a> {
    /// A non-indexed, uncolored batch with default priority.
    #[must_use]
    pub const fn new(primitive: PrimitiveKind, vertices: &'a [Vec3]) -> Self {
        Self {
            primitive,
            vertices,
            colors: None,
            indices: None,
            priority: RenderPriority::DEFAULT,
        }
    }

    /// Attaches per-vertex colors.
    #[must_use]
    pub const fn with_colors(mut self, colors: &'a [Color]) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Attaches an index buffer.
    #[must_use]
    pub const fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Sets the draw ordering hint.
    #[must_use]
    pub const fn with_priority(mut self, priority: RenderPriority) -> Self {
        self.priority = priority;
        self
    }
}

/// One 2-D shape appended to a canvas item, in item-local coordinates.
#[derive(Clone, Copy, Debug)]
pub enum CanvasShape<'a> {
    /// A vertex-colored mesh.
    Mesh {
        /// How points are assembled.
        primitive: PrimitiveKind,
        /// Vertex positions.
        points: &'a [Point],
        /// Per-vertex colors, same length as `points`.
        colors: &'a [Color],
    },
    /// A single line segment.
    Line(Line, Color),
    /// A filled circle.
    Circle(Circle, Color),
    /// A filled polygon with per-vertex colors.
    Polygon {
        /// Polygon outline.
        points: &'a [Point],
        /// Per-vertex colors.
        colors: &'a [Color],
    },
    /// An open polyline with per-vertex colors.
    Polyline {
        /// Polyline vertices.
        points: &'a [Point],
        /// Per-vertex colors.
        colors: &'a [Color],
        /// Stroke width in canvas units.
        width: f64,
    },
}

/// A handle-based drawing backend that owns drawables, materials and
/// parent scopes.
///
/// Operations on an unknown or freed handle must be ignored by
/// implementations; the debug core never relies on them failing loudly.
pub trait DrawingSurface {
    /// Creates an empty drawable with no parent.
    fn create_drawable(&mut self, kind: DrawableKind) -> DrawableId;

    /// Releases a drawable and everything attached to it.
    fn free_drawable(&mut self, drawable: DrawableId);

    /// Drops all geometry and material overrides from a drawable.
    fn clear(&mut self, drawable: DrawableId);

    /// Appends a 3-D batch as the drawable's next surface.
    fn add_mesh_batch(&mut self, drawable: DrawableId, batch: &MeshBatch<'_>);

    /// Appends a 2-D shape to a canvas item.
    fn add_canvas_shape(&mut self, drawable: DrawableId, shape: &CanvasShape<'_>);

    /// Number of surfaces (batches) currently on the drawable.
    fn surface_count(&self, drawable: DrawableId) -> usize;

    /// Places the drawable in a scenario or canvas, or detaches it.
    fn set_parent(&mut self, drawable: DrawableId, parent: Option<ParentId>);

    /// Sets the 3-D placement of a mesh drawable.
    fn set_transform(&mut self, drawable: DrawableId, transform: &Transform3d);

    /// Sets the 2-D placement of a canvas item.
    fn set_canvas_transform(&mut self, drawable: DrawableId, transform: Affine);

    /// Assigns a material to one surface of a mesh drawable.
    fn set_material_override(&mut self, drawable: DrawableId, surface: usize, material: MaterialId);

    /// Creates a material.
    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialId;

    /// Replaces a material's description in place.
    fn update_material(&mut self, material: MaterialId, desc: &MaterialDesc);

    /// Releases a material.
    fn free_material(&mut self, material: MaterialId);
}
