// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

use super::*;
use crate::color::Color;
use crate::settings::MaterialSlot;
use crate::testing::{CountingSurface, Shape};

type Server = NavigationDebugServer<CountingSurface>;

fn server() -> Server {
    NavigationDebugServer::with_settings(CountingSurface::default(), DebugSettings::with_seed(7))
}

fn square() -> NavMeshData {
    NavMeshData {
        vertices: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        polygons: vec![vec![0, 1, 2, 3]],
    }
}

fn active_map(server: &mut Server, usage: Usage) -> MapId {
    let map = server.map_create(usage);
    server.map_set_active(map, true);
    map
}

fn region_in(server: &mut Server, map: MapId) -> RegionId {
    let usage = server.map_usage(map).expect("live map");
    let region = server.region_create(usage);
    server.region_set_navigation_mesh(region, square());
    server.region_set_map(region, Some(map));
    region
}

fn drawable(server: &Server, entity: impl Into<EntityId>) -> DrawableId {
    server.drawables(entity).expect("live entity")[0]
}

fn batch_vertices(server: &Server, drawable: DrawableId) -> Vec<usize> {
    server.surface().drawables[&drawable.0]
        .batches
        .iter()
        .map(|b| b.vertices.len())
        .collect()
}

#[test]
fn repeated_mutations_queue_once() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    server.region_set_transform(region, Transform3d::from_position(Vec3::new(1.0, 0.0, 0.0)));
    server.region_set_transform(region, Transform3d::from_position(Vec3::new(2.0, 0.0, 0.0)));
    server.request_sync(region);

    assert_eq!(server.map_queued(map).expect("live map").regions, 1);
    assert_eq!(server.is_sync_requested(region), Some(true));
}

#[test]
fn sync_services_every_request_once() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let regions: Vec<_> = (0..3).map(|_| region_in(&mut server, map)).collect();

    let report = server.sync();
    assert_eq!(report.synced.regions, 3);
    assert_eq!(report.maps, 1);
    for &region in &regions {
        assert_eq!(server.is_sync_requested(region), Some(false));
        assert!(server.dirty_flags(region).expect("live region").is_clean());
    }

    let report = server.sync();
    assert_eq!(report.synced.total(), 0, "nothing left to do");
    assert_eq!(report.fan_outs, 0);
    assert_eq!(report.frame_index, 1);
}

#[test]
fn synced_region_draws_faces_and_edges() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    assert!(server.dirty_flags(region).expect("live region").mesh);

    server.sync();
    assert_eq!(batch_vertices(&server, drawable(&server, region)), [6, 8]);
}

#[test]
fn detached_views_rebuild_immediately() {
    let mut server = server();
    let region = server.region_create(Usage::ThreeD);
    server.region_set_navigation_mesh(region, square());

    assert!(server.dirty_flags(region).expect("live region").is_clean());
    assert_eq!(server.is_sync_requested(region), Some(false));
    assert!(batch_vertices(&server, drawable(&server, region)).is_empty());

    let report = server.sync();
    assert_eq!(report.immediate, 1);
    assert_eq!(server.sync().immediate, 0, "counter resets per frame");
}

#[test]
fn free_cancels_the_pending_request() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    let drawable = drawable(&server, region);
    assert_eq!(server.map_queued(map).expect("live map").regions, 1);

    server.region_free(region);
    assert_eq!(server.map_queued(map).expect("live map").regions, 0);
    assert_eq!(server.map_members(map).expect("live map").regions, 0);
    assert!(!server.surface().drawables.contains_key(&drawable.0));

    let report = server.sync();
    assert_eq!(report.synced.regions, 0);
    assert_eq!(report.skipped, 0);
}

#[test]
fn cancel_sync_request_reports_membership() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    assert!(server.cancel_sync_request(region));
    assert!(!server.cancel_sync_request(region), "already cancelled");
    assert_eq!(server.is_sync_requested(region), Some(false));
}

#[test]
fn settings_change_fans_out_to_every_map() {
    let mut server = server();
    let a = active_map(&mut server, Usage::ThreeD);
    let b = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, a);
    region_in(&mut server, b);
    server.sync();
    assert!(!batch_vertices(&server, drawable(&server, region)).is_empty());

    let changes = server.update_settings(|s| s.set_regions_enabled(false));
    assert!(changes.navigation);
    let report = server.sync();
    assert_eq!(report.fan_outs, 2);
    assert_eq!(report.synced.regions, 2);
    assert!(batch_vertices(&server, drawable(&server, region)).is_empty());
}

#[test]
fn overlay_draws_every_connection() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let a = region_in(&mut server, map);
    region_in(&mut server, map);
    let connection = EdgeConnection {
        pathway_start: Vec3::new(0.0, 0.0, 0.0),
        pathway_end: Vec3::new(1.0, 0.0, 0.0),
    };
    server.region_set_connections(a, vec![connection; 3]);

    server.sync();
    let overlay = server.map_overlay(map).expect("overlay exists");
    assert_eq!(batch_vertices(&server, overlay), [18]);

    server.region_set_use_edge_connections(a, false);
    assert!(server.map_dirty_flags(map).expect("live map").mesh);
    server.sync();
    assert!(batch_vertices(&server, overlay).is_empty());
}

#[test]
fn color_change_patches_the_cached_material() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let link = server.link_create(Usage::ThreeD);
    server.link_set_end(link, Vec3::new(4.0, 0.0, 0.0));
    server.link_set_map(link, Some(map));
    server.sync();

    let (material, _) = server
        .settings()
        .cached_material(MaterialSlot::LinkConnections)
        .expect("link material exists");
    let created = server.surface().calls.materials_created;
    let red = Color::new(1.0, 0.0, 0.0, 1.0);
    server.update_settings(|s| s.set_link_connection_color(red));

    assert_eq!(server.surface().calls.materials_created, created);
    assert_eq!(server.surface().materials[&material.0].albedo, red);
    assert_eq!(server.sync().materials_updated, 1);
}

#[test]
fn canvas_navigation_switch_applies_immediately() {
    let mut server = server();
    let map = active_map(&mut server, Usage::TwoD);
    let region = region_in(&mut server, map);
    let obstacle = server.obstacle_create(Usage::TwoD);
    server.obstacle_set_vertices(
        obstacle,
        vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)],
    );
    server.obstacle_set_map(obstacle, Some(map));
    server.sync();
    let region_item = drawable(&server, region);
    let obstacle_item = drawable(&server, obstacle);
    assert!(!server.surface().drawables[&region_item.0].shapes.is_empty());

    server.map_debug_set_navigation_enabled(map, false);
    assert_eq!(server.debug_is_enabled(region), Some(false));
    assert_eq!(server.debug_is_enabled(obstacle), Some(true));
    assert!(server.surface().drawables[&region_item.0].shapes.is_empty());
    assert!(
        server.surface().drawables[&obstacle_item.0]
            .shapes
            .iter()
            .any(|s| matches!(s, Shape::Polygon { .. }))
    );
}

#[test]
fn usage_mismatch_is_rejected() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = server.region_create(Usage::TwoD);
    server.region_set_map(region, Some(map));
    assert_eq!(server.region_map(region), None);
    assert_eq!(server.map_members(map).expect("live map").regions, 0);
}

#[test]
fn stale_handles_are_ignored() {
    let mut server = server();
    let old = server.region_create(Usage::ThreeD);
    server.region_free(old);
    let new = server.region_create(Usage::ThreeD);
    assert_ne!(old, new);

    server.region_set_enabled(old, false);
    server.make_dirty(old);
    assert_eq!(server.dirty_flags(old), None);
    assert!(server.region(old).is_none());
    assert_eq!(server.region(new).map(|r| r.enabled), Some(true));
}

#[test]
fn map_free_detaches_and_clears_members() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    server.sync();
    let overlay = server.map_overlay(map).expect("overlay exists");
    assert!(!batch_vertices(&server, drawable(&server, region)).is_empty());

    server.map_free(map);
    assert!(!server.map_is_alive(map));
    assert_eq!(server.region_map(region), None);
    assert!(batch_vertices(&server, drawable(&server, region)).is_empty());
    assert!(!server.surface().drawables.contains_key(&overlay.0));
}

#[test]
fn parent_changes_reach_every_member() {
    let mut server = server();
    server.set_default_scenario(Some(ParentId(5)));
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    server.sync();
    let item = drawable(&server, region);
    assert_eq!(server.surface().drawables[&item.0].parent, Some(ParentId(5)));

    server.map_set_parent(map, Some(ParentId(9)));
    server.sync();
    assert_eq!(server.map_debug_parent(map), Some(ParentId(9)));
    assert_eq!(server.surface().drawables[&item.0].parent, Some(ParentId(9)));
    let overlay = server.map_overlay(map).expect("overlay exists");
    assert_eq!(server.surface().drawables[&overlay.0].parent, Some(ParentId(9)));
}

#[test]
fn inactive_maps_draw_nothing() {
    let mut server = server();
    server.set_default_scenario(Some(ParentId(5)));
    let map = server.map_create(Usage::ThreeD);
    let region = region_in(&mut server, map);
    server.sync();
    assert_eq!(server.map_debug_parent(map), None);
    assert!(batch_vertices(&server, drawable(&server, region)).is_empty());

    server.map_set_active(map, true);
    let report = server.sync();
    assert_eq!(report.fan_outs, 1, "activation fans out");
    assert_eq!(batch_vertices(&server, drawable(&server, region)), [6, 8]);
}

#[test]
fn debug_set_enabled_rebuilds_without_a_sync() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    server.sync();

    server.debug_set_enabled(region, false);
    assert!(batch_vertices(&server, drawable(&server, region)).is_empty());
    assert!(server.dirty_flags(region).expect("live region").is_clean());
    assert_eq!(server.is_sync_requested(region), Some(false));
}

#[test]
fn canvas_agents_never_queue() {
    let mut server = server();
    let map = active_map(&mut server, Usage::TwoD);
    let agent = server.agent_create(Usage::TwoD);
    server.agent_set_map(agent, Some(map));
    server.agent_set_path(agent, vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
    assert_eq!(server.is_sync_requested(agent), Some(false));
    assert_eq!(server.drawables(agent), Some(&[][..]));
}

#[test]
fn map_radius_change_rebuilds_links() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let link = server.link_create(Usage::ThreeD);
    server.link_set_map(link, Some(map));
    server.sync();

    server.map_set_link_connection_radius(map, 3.0);
    assert!(server.dirty_flags(link).expect("live link").mesh);
    server.map_set_up(map, Vec3::UP);
    assert_eq!(server.map_queued(map).expect("live map").links, 1);
}

#[test]
fn fan_out_queues_every_member_once_fully_dirty() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    let link = server.link_create(Usage::ThreeD);
    server.link_set_map(link, Some(map));
    let obstacle = server.obstacle_create(Usage::ThreeD);
    server.obstacle_set_map(obstacle, Some(map));
    let agent = server.agent_create(Usage::ThreeD);
    server.agent_set_path(agent, vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
    server.agent_set_map(agent, Some(map));
    server.sync();

    let members: [EntityId; 4] = [region.into(), link.into(), obstacle.into(), agent.into()];
    let one_each = KindCounts {
        regions: 1,
        links: 1,
        obstacles: 1,
        agents: 1,
    };
    let NavigationDebugServer { maps, arenas, .. } = &mut server;
    let debug = maps.get_mut(map).unwrap();
    assert_eq!(make_members_dirty(debug, arenas), one_each);
    assert_eq!(make_members_dirty(debug, arenas), one_each);

    for member in members {
        assert_eq!(server.dirty_flags(member), Some(DirtyFlags::ALL), "{member:?}");
        assert_eq!(server.is_sync_requested(member), Some(true), "{member:?}");
    }
    assert_eq!(server.map_queued(map), Some(one_each));

    let report = server.sync();
    assert_eq!(report.synced, one_each);
    assert_eq!(report.skipped, 0);
    for member in members {
        assert!(server.dirty_flags(member).unwrap().is_clean(), "{member:?}");
        assert_eq!(server.is_sync_requested(member), Some(false), "{member:?}");
    }
}

#[test]
fn requests_made_mid_flush_wait_for_the_next_sync() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let first = region_in(&mut server, map);
    let second = region_in(&mut server, map);
    server.sync();
    server.mark_mesh_dirty(first);

    let NavigationDebugServer {
        surface,
        settings,
        defaults,
        maps,
        arenas,
        ..
    } = &mut server;
    let debug = maps.get_mut(map).unwrap();
    let mut cx = SyncContext {
        surface,
        settings,
        map: Some(debug.context(EntityKind::Region, *defaults)),
    };
    let regions = &mut arenas.regions;
    let mut serviced = Vec::new();
    debug.queues.regions.flush_all(|queue, request| {
        let entry = regions.get_mut(request.key).unwrap();
        assert!(entry.debug.slot.release(request.epoch));
        entry.debug.sync(&entry.data, &mut cx);
        serviced.push(request.key);
        let neighbour = regions.get_mut(second).unwrap();
        if neighbour.debug.mark(DirtyAspect::Mesh) {
            queue.add(second, &mut neighbour.debug.slot);
        }
    });

    assert_eq!(serviced, [first]);
    assert_eq!(server.is_sync_requested(first), Some(false));
    assert_eq!(server.is_sync_requested(second), Some(true));
    assert_eq!(server.map_queued(map).unwrap().regions, 1);

    let report = server.sync();
    assert_eq!(report.synced.regions, 1);
    assert_eq!(report.skipped, 0);
    assert!(server.dirty_flags(second).unwrap().is_clean());
    assert_eq!(server.is_sync_requested(second), Some(false));
}

#[test]
fn agents_follow_the_navigation_switch_only() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let agent = server.agent_create(Usage::ThreeD);
    server.agent_set_path(agent, vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)]);
    server.agent_set_map(agent, Some(map));
    server.sync();
    let item = drawable(&server, agent);
    assert!(!batch_vertices(&server, item).is_empty());

    server.map_debug_set_avoidance_enabled(map, false);
    assert!(server.dirty_flags(agent).expect("live agent").mesh);
    server.sync();
    assert!(
        !batch_vertices(&server, item).is_empty(),
        "avoidance switch leaves paths drawn"
    );

    server.map_debug_set_navigation_enabled(map, false);
    server.sync();
    assert!(batch_vertices(&server, item).is_empty());
}

#[test]
fn enabled_flip_dirties_material_in_3d_and_mesh_in_2d() {
    let mut server = server();
    let scene = active_map(&mut server, Usage::ThreeD);
    let canvas = active_map(&mut server, Usage::TwoD);
    let solid = region_in(&mut server, scene);
    let flat = region_in(&mut server, canvas);
    server.sync();

    server.region_set_enabled(solid, false);
    server.region_set_enabled(flat, false);
    match server.dirty_flags(solid) {
        Some(DirtyFlags {
            material: true,
            mesh: false,
            ..
        }) => {}
        other => panic!("expected a material-only rebuild, got {other:?}"),
    }
    match server.dirty_flags(flat) {
        Some(DirtyFlags { mesh: true, .. }) => {}
        other => panic!("expected a mesh rebuild, got {other:?}"),
    }
}

#[cfg(feature = "trace")]
#[derive(Default)]
struct CountingSink {
    entity_syncs: Vec<EntityId>,
    overlay_vertices: Vec<u32>,
}

#[cfg(feature = "trace")]
impl crate::trace::SyncTraceSink for CountingSink {
    fn on_entity_sync(&mut self, e: &EntitySyncEvent) {
        self.entity_syncs.push(e.entity);
    }

    fn on_overlay_rebuilt(&mut self, e: &OverlayRebuiltEvent) {
        self.overlay_vertices.push(e.vertices);
    }
}

#[cfg(feature = "trace")]
#[test]
fn traced_sync_reports_each_stage() {
    let mut server = server();
    let map = active_map(&mut server, Usage::ThreeD);
    let region = region_in(&mut server, map);
    let obstacle = server.obstacle_create(Usage::ThreeD);
    server.obstacle_set_map(obstacle, Some(map));

    let mut sink = CountingSink::default();
    server.sync_traced(&mut Tracer::new(&mut sink));
    assert_eq!(sink.entity_syncs, [EntityId::from(region), EntityId::from(obstacle)]);
    assert_eq!(sink.overlay_vertices, [0]);
}
