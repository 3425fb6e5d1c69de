// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link debug geometry: a segment between the endpoints and a search circle
//! around each, sized by the owning map's link connection radius.

use kurbo::{Circle, Line};

use crate::geometry;
use crate::id::{DrawableId, EntityKind};
use crate::math::Vec3;
use crate::primitive::{LinkData, Usage};
use crate::settings::{DebugSettings, MaterialSlot};
use crate::surface::{CanvasShape, DrawingSurface, MeshBatch, PrimitiveKind, RenderPriority};

use super::{DebugPrimitive, SyncContext};

/// Radius and up axis of the owning map, with the defaults a fresh map has.
fn map_shape<S: ?Sized>(cx: &SyncContext<'_, S>) -> (f32, Vec3) {
    cx.map
        .map_or((1.0, Vec3::UP), |m| (m.link_connection_radius, m.up))
}

impl DebugPrimitive for LinkData {
    const KIND: EntityKind = EntityKind::Link;

    fn drawable_count(_usage: Usage) -> usize {
        1
    }

    fn toggle_enabled(settings: &DebugSettings) -> bool {
        settings.link_connections_enabled()
    }

    // Endpoints are global.
    fn update_transform<S: DrawingSurface + ?Sized>(
        &self,
        _usage: Usage,
        _drawables: &[DrawableId],
        _surface: &mut S,
    ) {
    }

    fn build_3d<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let Some(&drawable) = drawables.first() else {
            return;
        };
        let (radius, up) = map_shape(cx);
        let vertices = geometry::link_lines(self.start, self.end, radius, up);
        cx.surface.add_mesh_batch(
            drawable,
            &MeshBatch::new(PrimitiveKind::Lines, &vertices).with_priority(RenderPriority::OVERLAY),
        );
    }

    fn build_2d<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let Some(&drawable) = drawables.first() else {
            return;
        };
        let (radius, _) = map_shape(cx);
        let color = if self.enabled {
            cx.settings.link_connection_color()
        } else {
            cx.settings.link_connection_disabled_color()
        };
        let (start, end) = (self.start.xz(), self.end.xz());
        let radius = f64::from(radius);

        cx.surface
            .add_canvas_shape(drawable, &CanvasShape::Line(Line::new(start, end), color));
        cx.surface
            .add_canvas_shape(drawable, &CanvasShape::Circle(Circle::new(start, radius), color));
        cx.surface
            .add_canvas_shape(drawable, &CanvasShape::Circle(Circle::new(end, radius), color));
    }

    fn apply_materials<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let Some(&drawable) = drawables.first() else {
            return;
        };
        if cx.surface.surface_count(drawable) == 0 {
            return;
        }
        let slot = if self.enabled {
            MaterialSlot::LinkConnections
        } else {
            MaterialSlot::LinkConnectionsDisabled
        };
        let material = cx.settings.material(slot, &mut *cx.surface);
        cx.surface.set_material_override(drawable, 0, material);
    }
}
