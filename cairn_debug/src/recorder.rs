// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`SyncTraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use cairn_core::dirty::DirtyFlags;
use cairn_core::id::{AgentId, EntityId, LinkId, MapId, ObstacleId, RegionId};
use cairn_core::trace::{
    EntitySyncEvent, KindCounts, MapSyncBeginEvent, MapSyncEndEvent, OverlayRebuiltEvent,
    SettingsFanOutEvent, SyncReport, SyncTraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_MAP_SYNC_BEGIN: u8 = 1;
const TAG_SETTINGS_FAN_OUT: u8 = 2;
const TAG_OVERLAY_REBUILT: u8 = 3;
const TAG_ENTITY_SYNC: u8 = 4;
const TAG_MAP_SYNC_END: u8 = 5;
const TAG_SYNC_REPORT: u8 = 6;

const KIND_REGION: u8 = 0;
const KIND_LINK: u8 = 1;
const KIND_OBSTACLE: u8 = 2;
const KIND_AGENT: u8 = 3;

const FLAG_PARENT: u8 = 1 << 0;
const FLAG_TRANSFORM: u8 = 1 << 1;
const FLAG_MESH: u8 = 1 << 2;
const FLAG_MATERIAL: u8 = 1 << 3;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`SyncTraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_map(&mut self, map: MapId) {
        self.write_u32(map.index());
        self.write_u32(map.generation());
    }

    fn write_counts(&mut self, c: KindCounts) {
        self.write_u32(c.regions);
        self.write_u32(c.links);
        self.write_u32(c.obstacles);
        self.write_u32(c.agents);
    }

    fn write_entity(&mut self, e: EntityId) {
        self.write_u8(match e {
            EntityId::Region(_) => KIND_REGION,
            EntityId::Link(_) => KIND_LINK,
            EntityId::Obstacle(_) => KIND_OBSTACLE,
            EntityId::Agent(_) => KIND_AGENT,
        });
        self.write_u32(e.index());
        self.write_u32(e.generation());
    }

    fn write_flags(&mut self, f: DirtyFlags) {
        let mut bits = 0;
        for (set, bit) in [
            (f.parent, FLAG_PARENT),
            (f.transform, FLAG_TRANSFORM),
            (f.mesh, FLAG_MESH),
            (f.material, FLAG_MATERIAL),
        ] {
            if set {
                bits |= bit;
            }
        }
        self.write_u8(bits);
    }
}

impl SyncTraceSink for RecorderSink {
    fn on_map_sync_begin(&mut self, e: &MapSyncBeginEvent) {
        self.write_u8(TAG_MAP_SYNC_BEGIN);
        self.write_u64(e.frame_index);
        self.write_map(e.map);
        self.write_counts(e.queued);
    }

    fn on_settings_fan_out(&mut self, e: &SettingsFanOutEvent) {
        self.write_u8(TAG_SETTINGS_FAN_OUT);
        self.write_u64(e.frame_index);
        self.write_map(e.map);
        self.write_counts(e.entities);
    }

    fn on_overlay_rebuilt(&mut self, e: &OverlayRebuiltEvent) {
        self.write_u8(TAG_OVERLAY_REBUILT);
        self.write_u64(e.frame_index);
        self.write_map(e.map);
        self.write_u32(e.vertices);
    }

    fn on_entity_sync(&mut self, e: &EntitySyncEvent) {
        self.write_u8(TAG_ENTITY_SYNC);
        self.write_u64(e.frame_index);
        self.write_map(e.map);
        self.write_entity(e.entity);
        self.write_flags(e.rebuilt);
    }

    fn on_map_sync_end(&mut self, e: &MapSyncEndEvent) {
        self.write_u8(TAG_MAP_SYNC_END);
        self.write_u64(e.frame_index);
        self.write_map(e.map);
        self.write_counts(e.synced);
    }

    fn on_sync_report(&mut self, r: &SyncReport) {
        self.write_u8(TAG_SYNC_REPORT);
        self.write_u64(r.frame_index);
        self.write_u32(r.maps);
        self.write_u32(r.fan_outs);
        self.write_counts(r.synced);
        self.write_u32(r.skipped);
        self.write_u32(r.immediate);
        self.write_u32(r.materials_updated);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug)]
pub enum RecordedEvent {
    /// A [`MapSyncBeginEvent`].
    MapSyncBegin(MapSyncBeginEvent),
    /// A [`SettingsFanOutEvent`].
    SettingsFanOut(SettingsFanOutEvent),
    /// An [`OverlayRebuiltEvent`].
    OverlayRebuilt(OverlayRebuiltEvent),
    /// An [`EntitySyncEvent`].
    EntitySync(EntitySyncEvent),
    /// A [`MapSyncEndEvent`].
    MapSyncEnd(MapSyncEndEvent),
    /// A [`SyncReport`].
    SyncReport(SyncReport),
}

impl RecordedEvent {
    /// The sync counter the event belongs to.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        match self {
            Self::MapSyncBegin(e) => e.frame_index,
            Self::SettingsFanOut(e) => e.frame_index,
            Self::OverlayRebuilt(e) => e.frame_index,
            Self::EntitySync(e) => e.frame_index,
            Self::MapSyncEnd(e) => e.frame_index,
            Self::SyncReport(r) => r.frame_index,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes: [u8; N] = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    fn read_map(&mut self) -> Option<MapId> {
        Some(MapId::from_raw(self.read_u32()?, self.read_u32()?))
    }

    fn read_counts(&mut self) -> Option<KindCounts> {
        Some(KindCounts {
            regions: self.read_u32()?,
            links: self.read_u32()?,
            obstacles: self.read_u32()?,
            agents: self.read_u32()?,
        })
    }

    fn read_entity(&mut self) -> Option<EntityId> {
        let kind = self.read_u8()?;
        let (index, generation) = (self.read_u32()?, self.read_u32()?);
        Some(match kind {
            KIND_REGION => RegionId::from_raw(index, generation).into(),
            KIND_LINK => LinkId::from_raw(index, generation).into(),
            KIND_OBSTACLE => ObstacleId::from_raw(index, generation).into(),
            KIND_AGENT => AgentId::from_raw(index, generation).into(),
            _ => return None,
        })
    }

    fn read_flags(&mut self) -> Option<DirtyFlags> {
        let bits = self.read_u8()?;
        Some(DirtyFlags {
            parent: bits & FLAG_PARENT != 0,
            transform: bits & FLAG_TRANSFORM != 0,
            mesh: bits & FLAG_MESH != 0,
            material: bits & FLAG_MATERIAL != 0,
        })
    }

    fn decode_map_sync_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::MapSyncBegin(MapSyncBeginEvent {
            frame_index: self.read_u64()?,
            map: self.read_map()?,
            queued: self.read_counts()?,
        }))
    }

    fn decode_settings_fan_out(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SettingsFanOut(SettingsFanOutEvent {
            frame_index: self.read_u64()?,
            map: self.read_map()?,
            entities: self.read_counts()?,
        }))
    }

    fn decode_overlay_rebuilt(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::OverlayRebuilt(OverlayRebuiltEvent {
            frame_index: self.read_u64()?,
            map: self.read_map()?,
            vertices: self.read_u32()?,
        }))
    }

    fn decode_entity_sync(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::EntitySync(EntitySyncEvent {
            frame_index: self.read_u64()?,
            map: self.read_map()?,
            entity: self.read_entity()?,
            rebuilt: self.read_flags()?,
        }))
    }

    fn decode_map_sync_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::MapSyncEnd(MapSyncEndEvent {
            frame_index: self.read_u64()?,
            map: self.read_map()?,
            synced: self.read_counts()?,
        }))
    }

    fn decode_sync_report(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SyncReport(SyncReport {
            frame_index: self.read_u64()?,
            maps: self.read_u32()?,
            fan_outs: self.read_u32()?,
            synced: self.read_counts()?,
            skipped: self.read_u32()?,
            immediate: self.read_u32()?,
            materials_updated: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_MAP_SYNC_BEGIN => self.decode_map_sync_begin(),
            TAG_SETTINGS_FAN_OUT => self.decode_settings_fan_out(),
            TAG_OVERLAY_REBUILT => self.decode_overlay_rebuilt(),
            TAG_ENTITY_SYNC => self.decode_entity_sync(),
            TAG_MAP_SYNC_END => self.decode_map_sync_end(),
            TAG_SYNC_REPORT => self.decode_sync_report(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::math::Vec3;
    use cairn_core::primitive::Usage;
    use cairn_core::server::NavigationDebugServer;
    use cairn_core::settings::DebugSettings;
    use cairn_core::trace::Tracer;
    use cairn_render::RecordingSurface;

    #[test]
    fn entity_sync_keeps_handle_and_flags() {
        let mut rec = RecorderSink::new();
        let entity = EntityId::from(ObstacleId::from_raw(4, 2));
        rec.on_entity_sync(&EntitySyncEvent {
            frame_index: 9,
            map: MapId::from_raw(1, 0),
            entity,
            rebuilt: DirtyFlags {
                transform: true,
                material: true,
                ..DirtyFlags::CLEAN
            },
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::EntitySync(e) => {
                assert_eq!(e.frame_index, 9);
                assert_eq!(e.map, MapId::from_raw(1, 0));
                assert_eq!(e.entity, entity);
                assert!(e.rebuilt.transform && e.rebuilt.material);
                assert!(!e.rebuilt.mesh && !e.rebuilt.parent);
            }
            other => panic!("expected EntitySync, got {other:?}"),
        }
    }

    #[test]
    fn records_a_whole_sync_in_order() {
        let mut server = NavigationDebugServer::with_settings(
            RecordingSurface::new(),
            DebugSettings::with_seed(1),
        );
        let map = server.map_create(Usage::ThreeD);
        server.map_set_active(map, true);
        let link = server.link_create(Usage::ThreeD);
        server.link_set_end(link, Vec3::new(1.0, 0.0, 0.0));
        server.link_set_map(link, Some(map));

        let mut rec = RecorderSink::new();
        let report = server.sync_traced(&mut Tracer::new(&mut rec));

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let names: Vec<_> = events
            .iter()
            .map(|e| match e {
                RecordedEvent::MapSyncBegin(_) => "begin",
                RecordedEvent::SettingsFanOut(_) => "fan-out",
                RecordedEvent::OverlayRebuilt(_) => "overlay",
                RecordedEvent::EntitySync(_) => "entity",
                RecordedEvent::MapSyncEnd(_) => "end",
                RecordedEvent::SyncReport(_) => "report",
            })
            .collect();
        assert_eq!(names, ["begin", "fan-out", "overlay", "entity", "end", "report"]);
        match events.last() {
            Some(RecordedEvent::SyncReport(r)) => assert_eq!(*r, report),
            other => panic!("expected SyncReport, got {other:?}"),
        }
    }

    #[test]
    fn truncated_recording_stops_cleanly() {
        let mut rec = RecorderSink::new();
        rec.on_overlay_rebuilt(&OverlayRebuiltEvent {
            frame_index: 0,
            map: MapId::from_raw(0, 0),
            vertices: 18,
        });
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
        assert_eq!(decode(&bytes).count(), 1);
    }
}
