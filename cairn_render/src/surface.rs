// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained in-memory drawing surface.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Affine, Circle, Line, Point};

use cairn_core::color::Color;
use cairn_core::id::{DrawableId, MaterialId, ParentId};
use cairn_core::math::{Transform3d, Vec3};
use cairn_core::surface::{
    CanvasShape, DrawableKind, DrawingSurface, MaterialDesc, MeshBatch, PrimitiveKind,
    RenderPriority,
};

/// One surface of a retained mesh drawable.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshSurface {
    /// How vertices are assembled.
    pub primitive: PrimitiveKind,
    /// Vertex positions in drawable-local space.
    pub vertices: Vec<Vec3>,
    /// Per-vertex colors, if the batch had any.
    pub colors: Option<Vec<Color>>,
    /// Index buffer, if the batch had one.
    pub indices: Option<Vec<u32>>,
    /// Draw ordering hint from the batch.
    pub priority: RenderPriority,
    /// Material override assigned to this surface.
    pub material: Option<MaterialId>,
}

/// A retained 2-D shape.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasCommand {
    /// A vertex-colored mesh.
    Mesh {
        /// How points are assembled.
        primitive: PrimitiveKind,
        /// Vertex positions.
        points: Vec<Point>,
        /// Per-vertex colors.
        colors: Vec<Color>,
    },
    /// A single line segment.
    Line(Line, Color),
    /// A filled circle.
    Circle(Circle, Color),
    /// A filled polygon.
    Polygon {
        /// Polygon outline.
        points: Vec<Point>,
        /// Per-vertex colors.
        colors: Vec<Color>,
    },
    /// An open polyline.
    Polyline {
        /// Polyline vertices.
        points: Vec<Point>,
        /// Per-vertex colors.
        colors: Vec<Color>,
        /// Stroke width.
        width: f64,
    },
}

impl From<&CanvasShape<'_>> for CanvasCommand {
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

/// A retained drawable: placement plus everything appended since the last
/// clear.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    /// Mesh or canvas item.
    pub kind: DrawableKind,
    /// Scenario or canvas the drawable is shown in.
    pub parent: Option<ParentId>,
    /// 3-D placement.
    pub transform: Transform3d,
    /// 2-D placement.
    pub canvas_transform: Affine,
    /// Mesh surfaces in submission order.
    pub surfaces: Vec<MeshSurface>,
    /// Canvas shapes in submission order.
    pub shapes: Vec<CanvasCommand>,
}

impl Drawable {
    fn new(kind: DrawableKind) -> Self {
        Self {
            kind,
            parent: None,
            transform: Transform3d::IDENTITY,
            canvas_transform: Affine::IDENTITY,
            surfaces: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Returns whether nothing would be drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty() && self.shapes.is_empty()
    }
}

/// A [`DrawingSurface`] that keeps every drawable and material in memory.
///
/// Ids are never reused. Calls on unknown ids are ignored and logged at
/// debug level.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    drawables: BTreeMap<u32, Drawable>,
    materials: BTreeMap<u32, MaterialDesc>,
    next_drawable: u32,
    next_material: u32,
    revision: u64,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a live drawable.
    #[must_use]
    pub fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.get(&id.0)
    }

    /// Iterates live drawables in creation order.
    pub fn drawables(&self) -> impl Iterator<Item = (DrawableId, &Drawable)> + '_ {
        self.drawables.iter().map(|(&id, d)| (DrawableId(id), d))
    }

    /// Number of live drawables.
    #[must_use]
    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// Looks up a live material.
    #[must_use]
    pub fn material(&self, id: MaterialId) -> Option<&MaterialDesc> {
        self.materials.get(&id.0)
    }

    /// Number of live materials.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Counter bumped by every call that changed retained state.
    ///
    /// Integrations compare it against the value seen at their last upload
    /// to skip unchanged frames.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn edit(&mut self, id: DrawableId, op: &str) -> Option<&mut Drawable> {
        let drawable = self.drawables.get_mut(&id.0);
        if drawable.is_some() {
            self.revision += 1;
        } else {
            log::debug!("{op}: unknown drawable {id:?}");
        }
        drawable
    }
}

impl DrawingSurface for RecordingSurface {
    fn create_drawable(&mut self, kind: DrawableKind) -> DrawableId {
        let id = self.next_drawable;
        self.next_drawable += 1;
        self.drawables.insert(id, Drawable::new(kind));
        self.revision += 1;
        DrawableId(id)
    }

    fn free_drawable(&mut self, drawable: DrawableId) {
        if self.drawables.remove(&drawable.0).is_some() {
            self.revision += 1;
        } else {
            log::debug!("free_drawable: unknown drawable {drawable:?}");
        }
    }

    fn clear(&mut self, drawable: DrawableId) {
        if let Some(d) = self.edit(drawable, "clear") {
            d.surfaces.clear();
            d.shapes.clear();
        }
    }

    fn add_mesh_batch(&mut self, drawable: DrawableId, batch: &MeshBatch<'_>) {
        if let Some(d) = self.edit(drawable, "add_mesh_batch") {
            d.surfaces.push(MeshSurface {
                primitive: batch.primitive,
                vertices: batch.vertices.to_vec(),
                colors: batch.colors.map(<[Color]>::to_vec),
                indices: batch.indices.map(<[u32]>::to_vec),
                priority: batch.priority,
                material: None,
            });
        }
    }

    fn add_canvas_shape(&mut self, drawable: DrawableId, shape: &CanvasShape<'_>) {
        if let Some(d) = self.edit(drawable, "add_canvas_shape") {
            d.shapes.push(shape.into());
        }
    }

    fn surface_count(&self, drawable: DrawableId) -> usize {
        self.drawables
            .get(&drawable.0)
            .map_or(0, |d| d.surfaces.len())
    }

    fn set_parent(&mut self, drawable: DrawableId, parent: Option<ParentId>) {
        if let Some(d) = self.edit(drawable, "set_parent") {
            d.parent = parent;
        }
    }

    fn set_transform(&mut self, drawable: DrawableId, transform: &Transform3d) {
        if let Some(d) = self.edit(drawable, "set_transform") {
            d.transform = *transform;
        }
    }

    fn set_canvas_transform(&mut self, drawable: DrawableId, transform: Affine) {
        if let Some(d) = self.edit(drawable, "set_canvas_transform") {
            d.canvas_transform = transform;
        }
    }

    fn set_material_override(&mut self, drawable: DrawableId, surface: usize, material: MaterialId) {
        let Some(d) = self.edit(drawable, "set_material_override") else {
            return;
        };
        match d.surfaces.get_mut(surface) {
            Some(s) => s.material = Some(material),
            None => log::debug!("set_material_override: {drawable:?} has no surface {surface}"),
        }
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialId {
        let id = self.next_material;
        self.next_material += 1;
        self.materials.insert(id, *desc);
        self.revision += 1;
        MaterialId(id)
    }

    fn update_material(&mut self, material: MaterialId, desc: &MaterialDesc) {
        match self.materials.get_mut(&material.0) {
            Some(slot) => {
                *slot = *desc;
                self.revision += 1;
            }
            None => log::debug!("update_material: unknown material {material:?}"),
        }
    }

    fn free_material(&mut self, material: MaterialId) {
        if self.materials.remove(&material.0).is_some() {
            self.revision += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_keeps_placement_and_drops_geometry() {
        let mut surface = RecordingSurface::new();
        let id = surface.create_drawable(DrawableKind::Mesh);
        let vertices = [Vec3::ZERO, Vec3::UP];
        surface.add_mesh_batch(id, &MeshBatch::new(PrimitiveKind::Lines, &vertices));
        surface.set_parent(id, Some(ParentId(3)));
        assert_eq!(surface.surface_count(id), 1);

        surface.clear(id);
        let drawable = surface.drawable(id).expect("live drawable");
        assert!(drawable.is_empty());
        assert_eq!(drawable.parent, Some(ParentId(3)));
    }

    #[test]
    fn overrides_attach_to_existing_surfaces_only() {
        let mut surface = RecordingSurface::new();
        let id = surface.create_drawable(DrawableKind::Mesh);
        let material = surface.create_material(&MaterialDesc::unshaded(Color::WHITE));
        surface.set_material_override(id, 0, material);

        let vertices = [Vec3::ZERO];
        surface.add_mesh_batch(id, &MeshBatch::new(PrimitiveKind::Points, &vertices));
        surface.set_material_override(id, 0, material);
        let drawable = surface.drawable(id).expect("live drawable");
        assert_eq!(drawable.surfaces[0].material, Some(material));
    }

    #[test]
    fn unknown_ids_do_not_change_the_revision() {
        let mut surface = RecordingSurface::new();
        let id = surface.create_drawable(DrawableKind::CanvasItem);
        surface.free_drawable(id);
        let revision = surface.revision();

        surface.clear(id);
        surface.set_parent(id, None);
        surface.free_drawable(id);
        surface.update_material(MaterialId(9), &MaterialDesc::unshaded(Color::WHITE));
        assert_eq!(surface.revision(), revision);
        assert_eq!(surface.drawable_count(), 0);
    }

    #[test]
    fn material_updates_replace_in_place() {
        let mut surface = RecordingSurface::new();
        let id = surface.create_material(&MaterialDesc::unshaded(Color::WHITE));
        let red = Color::new(1.0, 0.0, 0.0, 1.0);
        surface.update_material(id, &MaterialDesc::unshaded(red));
        assert_eq!(surface.material(id).map(|m| m.albedo), Some(red));
        assert_eq!(surface.material_count(), 1);
    }
}
