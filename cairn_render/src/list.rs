// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw lists: the ordered draw commands for one scenario or canvas.

use alloc::vec::Vec;

use kurbo::Affine;

use cairn_core::id::{DrawableId, ParentId};
use cairn_core::math::Transform3d;
use cairn_core::surface::{DrawableKind, MaterialDesc, PrimitiveKind, RenderPriority};

use crate::surface::RecordingSurface;

/// One mesh surface to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshDraw {
    /// Drawable the surface belongs to.
    pub drawable: DrawableId,
    /// Surface index within the drawable.
    pub surface: usize,
    /// World placement.
    pub transform: Transform3d,
    /// How vertices are assembled.
    pub primitive: PrimitiveKind,
    /// Effective ordering: the material's priority, else the batch's.
    pub priority: RenderPriority,
    /// The surface's material, if one is assigned and live.
    pub material: Option<MaterialDesc>,
}

/// One canvas item to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasDraw {
    /// The canvas item.
    pub drawable: DrawableId,
    /// Canvas placement.
    pub transform: Affine,
    /// Number of shapes on the item.
    pub shapes: usize,
}

/// Draw commands for everything parented to one scenario or canvas.
///
/// Mesh surfaces are sorted by priority, back to front; ties keep creation
/// order. Canvas items stay in creation order.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    /// The scenario or canvas this list was built for.
    pub parent: Option<ParentId>,
    /// Mesh surfaces in draw order.
    pub meshes: Vec<MeshDraw>,
    /// Canvas items in draw order.
    pub canvas: Vec<CanvasDraw>,
}

impl DrawList {
    /// Builds the list for `parent`, skipping empty drawables.
    #[must_use]
    pub fn build(surface: &RecordingSurface, parent: ParentId) -> Self {
        let mut list = Self {
            parent: Some(parent),
            ..Self::default()
        };
        for (id, drawable) in surface.drawables() {
            if drawable.parent != Some(parent) || drawable.is_empty() {
                continue;
            }
            match drawable.kind {
                DrawableKind::Mesh => {
                    for (index, s) in drawable.surfaces.iter().enumerate() {
                        let material = s.material.and_then(|m| surface.material(m)).copied();
                        list.meshes.push(MeshDraw {
                            drawable: id,
                            surface: index,
                            transform: drawable.transform,
                            primitive: s.primitive,
                            priority: material.map_or(s.priority, |m| m.render_priority),
                            material,
                        });
                    }
                }
                DrawableKind::CanvasItem => list.canvas.push(CanvasDraw {
                    drawable: id,
                    transform: drawable.canvas_transform,
                    shapes: drawable.shapes.len(),
                }),
            }
        }
        list.meshes.sort_by_key(|m| m.priority);
        list
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.canvas.is_empty()
    }

    /// Clears the list for reuse.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.canvas.clear();
    }
}
