// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Obstacle debug geometry.
//!
//! In 3-D an obstacle owns two meshes, the static outline walls and the
//! avoidance radius sphere, so the two halves can carry different render
//! priorities. In 2-D both go into one canvas item.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Affine, Circle, Point};

use crate::geometry;
use crate::id::{DrawableId, EntityKind};
use crate::math::Transform3d;
use crate::primitive::{ObstacleData, Usage};
use crate::settings::MaterialSlot;
use crate::surface::{CanvasShape, DrawingSurface, MeshBatch, PrimitiveKind, RenderPriority};

use super::{DebugPrimitive, SyncContext};

/// Stroke width of a 2-D obstacle outline.
const OUTLINE_WIDTH: f64 = 4.0;

impl DebugPrimitive for ObstacleData {
    const KIND: EntityKind = EntityKind::Obstacle;

    fn drawable_count(usage: Usage) -> usize {
        match usage {
            Usage::ThreeD => 2,
            Usage::TwoD => 1,
        }
    }

    fn update_transform<S: DrawingSurface + ?Sized>(
        &self,
        usage: Usage,
        drawables: &[DrawableId],
        surface: &mut S,
    ) {
        match usage {
            Usage::ThreeD => {
                let transform = Transform3d::from_position(self.position);
                for &drawable in drawables {
                    surface.set_transform(drawable, &transform);
                }
            }
            Usage::TwoD => {
                let origin = self.position.xz();
                for &drawable in drawables {
                    surface.set_canvas_transform(drawable, Affine::translate(origin.to_vec2()));
                }
            }
        }
    }

    fn build_3d<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let &[edges, radius] = drawables else {
            return;
        };

        if !self.vertices.is_empty() && cx.settings.obstacle_static_enabled() {
            let vertices = geometry::obstacle_edges(&self.vertices, self.height);
            cx.surface
                .add_mesh_batch(edges, &MeshBatch::new(PrimitiveKind::Lines, &vertices));
        }

        if self.radius > 0.0 && cx.settings.obstacle_radius_enabled() {
            let (vertices, indices) = geometry::uv_sphere(self.radius);
            cx.surface.add_mesh_batch(
                radius,
                &MeshBatch::new(PrimitiveKind::Triangles, &vertices)
                    .with_indices(&indices)
                    .with_priority(RenderPriority::UNDERLAY),
            );
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

        if self.vertices.len() > 2 && cx.settings.obstacle_static_enabled() {
            let mut points = geometry::project_xz(&self.vertices);
            let (face, edge) = if geometry::is_clockwise(&points) {
                (
                    cx.settings.static_pushin_face_color(),
                    cx.settings.static_pushin_edge_color(),
                )
            } else {
                (
                    cx.settings.static_pushout_face_color(),
                    cx.settings.static_pushout_edge_color(),
                )
            };

            let colors: Vec<_> = vec![face; points.len()];
            cx.surface.add_canvas_shape(
                drawable,
                &CanvasShape::Polygon {
                    points: &points,
                    colors: &colors,
                },
            );

            // Close the outline.
            points.push(points[0]);
            let colors: Vec<_> = vec![edge; points.len()];
            cx.surface.add_canvas_shape(
                drawable,
                &CanvasShape::Polyline {
                    points: &points,
                    colors: &colors,
                    width: OUTLINE_WIDTH,
                },
            );
        }

        if self.radius > 0.0 && cx.settings.obstacle_radius_enabled() {
            let circle = Circle::new(Point::ORIGIN, f64::from(self.radius));
            let color = cx.settings.obstacle_radius_color();
            cx.surface
                .add_canvas_shape(drawable, &CanvasShape::Circle(circle, color));
        }
    }

    fn apply_materials<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let &[edges, radius] = drawables else {
            return;
        };
        if cx.surface.surface_count(edges) > 0 {
            let material = cx
                .settings
                .material(MaterialSlot::StaticPushOutEdge, &mut *cx.surface);
            cx.surface.set_material_override(edges, 0, material);
        }
        if cx.surface.surface_count(radius) > 0 {
            let material = cx
                .settings
                .material(MaterialSlot::ObstacleRadius, &mut *cx.surface);
            cx.surface.set_material_override(radius, 0, material);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{EntityId, ObstacleId, ParentId, SlotKey};
    use crate::math::Vec3;
    use crate::settings::DebugSettings;
    use crate::testing::{CountingSurface, Shape};
    use crate::view::{EntityDebug, MapContext};

    fn rebuild(
        usage: Usage,
        data: &ObstacleData,
        settings: &mut DebugSettings,
    ) -> (CountingSurface, EntityDebug) {
        let mut surface = CountingSurface::default();
        let owner = EntityId::Obstacle(ObstacleId::from_parts(0, 0));
        let mut view = EntityDebug::new::<ObstacleData, _>(owner, usage, &mut surface);
        view.mark_all();
        let mut cx = SyncContext {
            surface: &mut surface,
            settings,
            map: Some(MapContext {
                active: true,
                debug_enabled: true,
                parent: Some(ParentId(2)),
                up: Vec3::UP,
                link_connection_radius: 1.0,
            }),
        };
        view.sync(data, &mut cx);
        (surface, view)
    }

    fn square(radius: f32) -> ObstacleData {
        ObstacleData {
            position: Vec3::new(5.0, 0.0, -1.0),
            vertices: vec![
                Vec3::new(-1.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, -1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(-1.0, 0.0, 1.0),
            ],
            height: 2.0,
            radius,
        }
    }

    #[test]
    fn obstacle_3d_splits_outline_and_radius() {
        let mut settings = DebugSettings::with_seed(1);
        let (surface, view) = rebuild(Usage::ThreeD, &square(0.5), &mut settings);
        let [edges, radius] = [view.drawables()[0], view.drawables()[1]];

        let edges = &surface.drawables[&edges.0];
        assert_eq!(edges.batches[0].vertices.len(), 4 * geometry::OBSTACLE_EDGE_VERTICES);
        assert_eq!(edges.transform, Some(Transform3d::from_position(Vec3::new(5.0, 0.0, -1.0))));

        let radius = &surface.drawables[&radius.0];
        assert_eq!(radius.batches[0].priority, RenderPriority::UNDERLAY);
        assert!(radius.batches[0].indices.is_some(), "sphere is indexed");
        let (material, _) = settings
            .cached_material(MaterialSlot::ObstacleRadius)
            .expect("radius material exists");
        assert_eq!(radius.overrides.get(&0), Some(&material));
    }

    #[test]
    fn zero_radius_leaves_sphere_empty() {
        let mut settings = DebugSettings::with_seed(1);
        let (surface, view) = rebuild(Usage::ThreeD, &square(0.0), &mut settings);
        let radius = &surface.drawables[&view.drawables()[1].0];
        assert!(radius.batches.is_empty());
        assert!(radius.overrides.is_empty());
    }

    #[test]
    fn static_toggle_hides_outline() {
        let mut settings = DebugSettings::with_seed(1);
        settings.set_obstacle_static_enabled(false);
        let (surface, view) = rebuild(Usage::ThreeD, &square(0.5), &mut settings);
        assert!(surface.drawables[&view.drawables()[0].0].batches.is_empty());
        assert_eq!(surface.drawables[&view.drawables()[1].0].batches.len(), 1);
    }

    #[test]
    fn obstacle_2d_colors_by_winding() {
        let mut settings = DebugSettings::with_seed(1);
        let (surface, view) = rebuild(Usage::TwoD, &square(0.5), &mut settings);
        let record = &surface.drawables[&view.drawables()[0].0];
        assert_eq!(record.shapes.len(), 3);

        let points = geometry::project_xz(&square(0.0).vertices);
        let expected = if geometry::is_clockwise(&points) {
            settings.static_pushin_face_color()
        } else {
            settings.static_pushout_face_color()
        };
        let Shape::Polygon { colors, .. } = &record.shapes[0] else {
            panic!("outline fill comes first");
        };
        assert_eq!(colors[0], expected);

        let Shape::Polyline { points, width, .. } = &record.shapes[1] else {
            panic!("outline stroke");
        };
        assert_eq!(points.len(), 5, "outline is closed");
        assert_eq!(points.first(), points.last());
        assert_eq!(*width, OUTLINE_WIDTH);
        assert_eq!(
            record.canvas_transform,
            Some(Affine::translate((5.0, -1.0)))
        );
    }
}
