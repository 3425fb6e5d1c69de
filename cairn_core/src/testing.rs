// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-crate test double for [`DrawingSurface`].

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Affine, Circle, Line, Point};

use crate::color::Color;
use crate::id::{DrawableId, MaterialId, ParentId};
use crate::math::{Transform3d, Vec3};
use crate::surface::{
    CanvasShape, DrawableKind, DrawingSurface, MaterialDesc, MeshBatch, PrimitiveKind,
    RenderPriority,
};

/// Number of effective calls per operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Calls {
    pub(crate) drawables_created: usize,
    pub(crate) drawables_freed: usize,
    pub(crate) clears: usize,
    pub(crate) batches: usize,
    pub(crate) shapes: usize,
    pub(crate) parents_set: usize,
    pub(crate) transforms_set: usize,
    pub(crate) overrides_set: usize,
    pub(crate) materials_created: usize,
    pub(crate) materials_updated: usize,
    pub(crate) materials_freed: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BatchRecord {
    pub(crate) primitive: PrimitiveKind,
    pub(crate) vertices: Vec<Vec3>,
    pub(crate) colors: Option<Vec<Color>>,
    pub(crate) indices: Option<Vec<u32>>,
    pub(crate) priority: RenderPriority,
}

/// Owned copy of a [`CanvasShape`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Shape {
    Mesh {
        primitive: PrimitiveKind,
        points: Vec<Point>,
        colors: Vec<Color>,
    },
    Line(Line, Color),
    Circle(Circle, Color),
    Polygon {
        points: Vec<Point>,
        colors: Vec<Color>,
    },
    Polyline {
        points: Vec<Point>,
        colors: Vec<Color>,
        width: f64,
    },
}

impl From<&CanvasShape<'_>> for Shape {
    fn from(shape: &CanvasShape<'_>) -> Self {
        match *shape {
            CanvasShape::Mesh {
                primitive,
                points,
                colors,
            } => Self::Mesh {
                primitive,
                points: points.to_vec(),
                colors: colors.to_vec(),
            },
            CanvasShape::Line(line, color) => Self::Line(line, color),
            CanvasShape::Circle(circle, color) => Self::Circle(circle, color),
            CanvasShape::Polygon { points, colors } => Self::Polygon {
                points: points.to_vec(),
                colors: colors.to_vec(),
            },
            CanvasShape::Polyline {
                points,
                colors,
                width,
            } => Self::Polyline {
                points: points.to_vec(),
                colors: colors.to_vec(),
                width,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DrawableRecord {
    pub(crate) kind: DrawableKind,
    pub(crate) parent: Option<ParentId>,
    pub(crate) transform: Option<Transform3d>,
    pub(crate) canvas_transform: Option<Affine>,
    pub(crate) batches: Vec<BatchRecord>,
    pub(crate) shapes: Vec<Shape>,
    pub(crate) overrides: BTreeMap<usize, MaterialId>,
}

/// Records live drawables and materials, and counts every call that hit a
/// live handle. Calls on unknown handles are ignored.
#[derive(Debug, Default)]
pub(crate) struct CountingSurface {
    pub(crate) calls: Calls,
    pub(crate) drawables: BTreeMap<u32, DrawableRecord>,
    pub(crate) materials: BTreeMap<u32, MaterialDesc>,
    next_drawable: u32,
    next_material: u32,
}

impl CountingSurface {
    /// Total vertices across every live mesh drawable.
    pub(crate) fn live_vertices(&self) -> usize {
        self.drawables
            .values()
            .flat_map(|d| &d.batches)
            .map(|b| b.vertices.len())
            .sum()
    }
}

impl DrawingSurface for CountingSurface {
    fn create_drawable(&mut self, kind: DrawableKind) -> DrawableId {
        let id = self.next_drawable;
        self.next_drawable += 1;
        self.drawables.insert(
            id,
            DrawableRecord {
                kind,
                parent: None,
                transform: None,
                canvas_transform: None,
                batches: Vec::new(),
                shapes: Vec::new(),
                overrides: BTreeMap::new(),
            },
        );
        self.calls.drawables_created += 1;
        DrawableId(id)
    }

    fn free_drawable(&mut self, drawable: DrawableId) {
        if self.drawables.remove(&drawable.0).is_some() {
            self.calls.drawables_freed += 1;
        }
    }

    fn clear(&mut self, drawable: DrawableId) {
        if let Some(record) = self.drawables.get_mut(&drawable.0) {
            record.batches.clear();
            record.shapes.clear();
            record.overrides.clear();
            self.calls.clears += 1;
        }
    }

    fn add_mesh_batch(&mut self, drawable: DrawableId, batch: &MeshBatch<'_>) {
        if let Some(record) = self.drawables.get_mut(&drawable.0) {
            record.batches.push(BatchRecord {
                primitive: batch.primitive,
                vertices: batch.vertices.to_vec(),
                colors: batch.colors.map(<[Color]>::to_vec),
                indices: batch.indices.map(<[u32]>::to_vec),
                priority: batch.priority,
            });
            self.calls.batches += 1;
        }
    }

    fn add_canvas_shape(&mut self, drawable: DrawableId, shape: &CanvasShape<'_>) {
        if let Some(record) = self.drawables.get_mut(&drawable.0) {
            record.shapes.push(shape.into());
            self.calls.shapes += 1;
        }
    }

    fn surface_count(&self, drawable: DrawableId) -> usize {
        self.drawables
            .get(&drawable.0)
            .map_or(0, |record| record.batches.len())
    }

    fn set_parent(&mut self, drawable: DrawableId, parent: Option<ParentId>) {
        if let Some(record) = self.drawables.get_mut(&drawable.0) {
            record.parent = parent;
            self.calls.parents_set += 1;
        }
    }

    fn set_transform(&mut self, drawable: DrawableId, transform: &Transform3d) {
        if let Some(record) = self.drawables.get_mut(&drawable.0) {
            record.transform = Some(*transform);
            self.calls.transforms_set += 1;
        }
    }

    fn set_canvas_transform(&mut self, drawable: DrawableId, transform: Affine) {
        if let Some(record) = self.drawables.get_mut(&drawable.0) {
            record.canvas_transform = Some(transform);
            self.calls.transforms_set += 1;
        }
    }

    fn set_material_override(&mut self, drawable: DrawableId, surface: usize, material: MaterialId) {
        if let Some(record) = self.drawables.get_mut(&drawable.0) {
            record.overrides.insert(surface, material);
            self.calls.overrides_set += 1;
        }
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialId {
        let id = self.next_material;
        self.next_material += 1;
        self.materials.insert(id, *desc);
        self.calls.materials_created += 1;
        MaterialId(id)
    }

    fn update_material(&mut self, material: MaterialId, desc: &MaterialDesc) {
        if let Some(slot) = self.materials.get_mut(&material.0) {
            *slot = *desc;
            self.calls.materials_updated += 1;
        }
    }

    fn free_material(&mut self, material: MaterialId) {
        if self.materials.remove(&material.0).is_some() {
            self.calls.materials_freed += 1;
        }
    }
}
