// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region debug geometry.
//!
//! A region draws its navigation mesh as fan-triangulated faces plus an
//! optional closed edge loop per polygon.
//!
//! - **3-D**: one mesh drawable. Surface 0 holds the faces, surface 1 the
//!   edge lines. Materials follow the region's own enabled flag.
//! - **2-D**: one canvas item with the same buffers projected to `(x, z)`,
//!   colored per vertex since canvas items take no material. Disabled
//!   regions fill with the uniform disabled colors.

use alloc::vec;
use alloc::vec::Vec;

use rand::rngs::SmallRng;

use crate::geometry::{self, FaceColoring, RegionMesh};
use crate::id::{DrawableId, EntityKind};
use crate::primitive::{RegionData, Usage};
use crate::settings::{DebugSettings, MaterialSlot};
use crate::surface::{CanvasShape, DrawingSurface, MeshBatch, PrimitiveKind};

use super::{DebugPrimitive, SyncContext};

impl RegionData {
    fn triangulate(&self, settings: &mut DebugSettings) -> RegionMesh {
        let mesh = &self.navigation_mesh;
        let edge_lines = settings.edge_lines_enabled();
        if settings.face_random_color_enabled() {
            let base = settings.geometry_face_color();
            geometry::region_mesh(
                &mesh.vertices,
                &mesh.polygons,
                edge_lines,
                FaceColoring::Jittered {
                    base,
                    rng: settings.rng(),
                },
            )
        } else {
            geometry::region_mesh::<SmallRng>(
                &mesh.vertices,
                &mesh.polygons,
                edge_lines,
                FaceColoring::Uniform,
            )
        }
    }
}

impl DebugPrimitive for RegionData {
    const KIND: EntityKind = EntityKind::Region;

    fn drawable_count(_usage: Usage) -> usize {
        1
    }

    fn update_transform<S: DrawingSurface + ?Sized>(
        &self,
        usage: Usage,
        drawables: &[DrawableId],
        surface: &mut S,
    ) {
        for &drawable in drawables {
            match usage {
                Usage::ThreeD => surface.set_transform(drawable, &self.transform),
                Usage::TwoD => surface.set_canvas_transform(drawable, self.transform.to_affine_xz()),
            }
        }
    }

    fn build_3d<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let Some(&drawable) = drawables.first() else {
            return;
        };
        if self.navigation_mesh.is_empty() {
            return;
        }
        let mesh = self.triangulate(cx.settings);
        if mesh.is_empty() {
            return;
        }

        let mut faces = MeshBatch::new(PrimitiveKind::Triangles, &mesh.faces);
        if let Some(colors) = &mesh.face_colors {
            faces = faces.with_colors(colors);
        }
        cx.surface.add_mesh_batch(drawable, &faces);

        if !mesh.edges.is_empty() {
            cx.surface
                .add_mesh_batch(drawable, &MeshBatch::new(PrimitiveKind::Lines, &mesh.edges));
        }
    }

    fn build_2d<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let Some(&drawable) = drawables.first() else {
            return;
        };
        if self.navigation_mesh.is_empty() {
            return;
        }
        let mesh = self.triangulate(cx.settings);
        if mesh.is_empty() {
            return;
        }

        let (face_color, edge_color) = if self.enabled {
            (cx.settings.geometry_face_color(), cx.settings.geometry_edge_color())
        } else {
            (
                cx.settings.geometry_face_disabled_color(),
                cx.settings.geometry_edge_disabled_color(),
            )
        };

        let points = geometry::project_xz(&mesh.faces);
        let colors = match mesh.face_colors {
            Some(colors) if self.enabled => colors,
            _ => vec![face_color; points.len()],
        };
        cx.surface.add_canvas_shape(
            drawable,
            &CanvasShape::Mesh {
                primitive: PrimitiveKind::Triangles,
                points: &points,
                colors: &colors,
            },
        );

        if !mesh.edges.is_empty() {
            let points = geometry::project_xz(&mesh.edges);
            let colors: Vec<_> = vec![edge_color; points.len()];
            cx.surface.add_canvas_shape(
                drawable,
                &CanvasShape::Mesh {
                    primitive: PrimitiveKind::Lines,
                    points: &points,
                    colors: &colors,
                },
            );
        }
    }

    fn apply_materials<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let Some(&drawable) = drawables.first() else {
            return;
        };
        let (face, edge) = if self.enabled {
            (MaterialSlot::GeometryFace, MaterialSlot::GeometryEdge)
        } else {
            (
                MaterialSlot::GeometryFaceDisabled,
                MaterialSlot::GeometryEdgeDisabled,
            )
        };
        let surfaces = cx.surface.surface_count(drawable);
        if surfaces > 0 {
            let material = cx.settings.material(face, &mut *cx.surface);
            cx.surface.set_material_override(drawable, 0, material);
        }
        if surfaces > 1 {
            let material = cx.settings.material(edge, &mut *cx.surface);
            cx.surface.set_material_override(drawable, 1, material);
        }
    }
}
