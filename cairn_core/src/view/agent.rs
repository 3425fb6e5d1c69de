// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Agent path geometry. Agents draw only in 3-D.

use crate::id::{DrawableId, EntityKind};
use crate::primitive::{AgentData, Usage};
use crate::settings::{DebugSettings, MaterialSlot};
use crate::surface::{DrawingSurface, MeshBatch, PrimitiveKind, RenderPriority};

use super::{DebugPrimitive, SyncContext};

impl DebugPrimitive for AgentData {
    const KIND: EntityKind = EntityKind::Agent;

    fn drawable_count(usage: Usage) -> usize {
        match usage {
            Usage::ThreeD => 1,
            Usage::TwoD => 0,
        }
    }

    fn toggle_enabled(settings: &DebugSettings) -> bool {
        settings.agent_paths_enabled()
    }

    // Paths are global.
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
        if self.path.len() < 2 {
            return;
        }
        cx.surface.add_mesh_batch(
            drawable,
            &MeshBatch::new(PrimitiveKind::LineStrip, &self.path).with_priority(RenderPriority::OVERLAY),
        );
        cx.surface.add_mesh_batch(
            drawable,
            &MeshBatch::new(PrimitiveKind::Points, &self.path).with_priority(RenderPriority::OVERLAY),
        );
    }

    fn build_2d<S: DrawingSurface + ?Sized>(
        &self,
        _drawables: &[DrawableId],
        _cx: &mut SyncContext<'_, S>,
    ) {
    }

    fn apply_materials<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    ) {
        let Some(&drawable) = drawables.first() else {
            return;
        };
        let surfaces = cx.surface.surface_count(drawable);
        for (surface, slot) in [MaterialSlot::AgentPathLine, MaterialSlot::AgentPathPoint]
            .into_iter()
            .enumerate()
            .take(surfaces)
        {
            let material = cx.settings.material(slot, &mut *cx.surface);
            cx.surface.set_material_override(drawable, surface, material);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::id::{AgentId, EntityId, SlotKey};
    use crate::math::Vec3;
    use crate::testing::CountingSurface;
    use crate::view::{EntityDebug, MapContext};

    fn map() -> Option<MapContext> {
        Some(MapContext {
            active: true,
            debug_enabled: true,
            parent: None,
            up: Vec3::UP,
            link_connection_radius: 1.0,
        })
    }

    #[test]
    fn path_draws_strip_and_points() {
        let mut surface = CountingSurface::default();
        let mut settings = DebugSettings::with_seed(1);
        let owner = EntityId::Agent(AgentId::from_parts(0, 0));
        let mut view = EntityDebug::new::<AgentData, _>(owner, Usage::ThreeD, &mut surface);
        let data = AgentData {
            path: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0)],
        };
        view.mark_all();
        let mut cx = SyncContext {
            surface: &mut surface,
            settings: &mut settings,
            map: map(),
        };
        view.sync(&data, &mut cx);

        let record = &surface.drawables[&view.drawables()[0].0];
        let primitives: Vec<_> = record.batches.iter().map(|b| b.primitive).collect();
        assert_eq!(primitives, [PrimitiveKind::LineStrip, PrimitiveKind::Points]);
        let (points, desc) = settings
            .cached_material(MaterialSlot::AgentPathPoint)
            .expect("point material exists");
        assert_eq!(record.overrides.get(&1), Some(&points));
        assert_eq!(desc.point_size, Some(settings.agent_path_point_size()));
    }

    #[test]
    fn single_point_path_draws_nothing() {
        let mut surface = CountingSurface::default();
        let mut settings = DebugSettings::with_seed(1);
        let owner = EntityId::Agent(AgentId::from_parts(0, 0));
        let mut view = EntityDebug::new::<AgentData, _>(owner, Usage::ThreeD, &mut surface);
        view.mark_all();
        let mut cx = SyncContext {
            surface: &mut surface,
            settings: &mut settings,
            map: map(),
        };
        view.sync(&AgentData { path: vec![Vec3::ZERO] }, &mut cx);
        assert_eq!(surface.calls.batches, 0);
        assert_eq!(surface.calls.overrides_set, 0);
    }

    #[test]
    fn agents_have_no_canvas_view() {
        let mut surface = CountingSurface::default();
        let owner = EntityId::Agent(AgentId::from_parts(0, 0));
        let mut view = EntityDebug::new::<AgentData, _>(owner, Usage::TwoD, &mut surface);
        assert!(view.drawables().is_empty());
        assert!(!view.mark_all(), "nothing to sync");
        assert_eq!(surface.calls.drawables_created, 0);
    }
}
