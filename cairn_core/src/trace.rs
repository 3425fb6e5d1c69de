// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the per-frame debug sync.
//!
//! This module provides a [`SyncTraceSink`] trait with per-event methods that
//! [`NavigationDebugServer::sync_traced`] calls at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn SyncTraceSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! [`SyncReportBuilder`] collects per-map counts during a frame and produces
//! the [`SyncReport`] that [`sync`] returns.
//!
//! Events carry no wall-clock time. Sinks that need a timeline derive one
//! from `frame_index` and arrival order.
//!
//! [`NavigationDebugServer::sync_traced`]: crate::server::NavigationDebugServer::sync_traced
//! [`sync`]: crate::server::NavigationDebugServer::sync

use crate::dirty::DirtyFlags;
use crate::id::{EntityId, EntityKind, MapId};

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// One counter per entity kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KindCounts {
    /// Regions.
    pub regions: u32,
    /// Links.
    pub links: u32,
    /// Obstacles.
    pub obstacles: u32,
    /// Agents.
    pub agents: u32,
}

impl KindCounts {
    /// Sum over every kind.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.regions + self.links + self.obstacles + self.agents
    }

    /// Returns the counter for `kind`.
    #[must_use]
    pub const fn get(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Region => self.regions,
            EntityKind::Link => self.links,
            EntityKind::Obstacle => self.obstacles,
            EntityKind::Agent => self.agents,
        }
    }

    /// Adds `n` to the counter for `kind`.
    pub fn add(&mut self, kind: EntityKind, n: u32) {
        let slot = match kind {
            EntityKind::Region => &mut self.regions,
            EntityKind::Link => &mut self.links,
            EntityKind::Obstacle => &mut self.obstacles,
            EntityKind::Agent => &mut self.agents,
        };
        *slot += n;
    }

    fn accumulate(&mut self, other: &Self) {
        self.regions += other.regions;
        self.links += other.links;
        self.obstacles += other.obstacles;
        self.agents += other.agents;
    }
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted before a map starts its sync.
#[derive(Clone, Copy, Debug)]
pub struct MapSyncBeginEvent {
    /// Monotonic sync counter.
    pub frame_index: u64,
    /// The map being synced.
    pub map: MapId,
    /// Requests waiting in each queue when the map sync started.
    pub queued: KindCounts,
}

/// Emitted when a settings change is fanned out to every entity of a map.
#[derive(Clone, Copy, Debug)]
pub struct SettingsFanOutEvent {
    /// Sync counter.
    pub frame_index: u64,
    /// The map whose entities were invalidated.
    pub map: MapId,
    /// Registered entities that were marked fully dirty.
    pub entities: KindCounts,
}

/// Emitted when a map rebuilds its own edge-connection overlay.
#[derive(Clone, Copy, Debug)]
pub struct OverlayRebuiltEvent {
    /// Sync counter.
    pub frame_index: u64,
    /// The map that owns the overlay.
    pub map: MapId,
    /// Vertices submitted; 0 when the overlay is gated off or empty.
    pub vertices: u32,
}

/// Emitted after a queued entity view was synced during a flush.
#[derive(Clone, Copy, Debug)]
pub struct EntitySyncEvent {
    /// Sync counter.
    pub frame_index: u64,
    /// The map whose queue held the request.
    pub map: MapId,
    /// The entity that was synced.
    pub entity: EntityId,
    /// Aspects that were dirty and have been rebuilt.
    pub rebuilt: DirtyFlags,
}

/// Emitted after a map finished its sync.
#[derive(Clone, Copy, Debug)]
pub struct MapSyncEndEvent {
    /// Sync counter.
    pub frame_index: u64,
    /// The map that was synced.
    pub map: MapId,
    /// Requests serviced from each queue.
    pub synced: KindCounts,
}

/// Per-frame summary produced by [`SyncReportBuilder`] and returned from
/// [`NavigationDebugServer::sync`](crate::server::NavigationDebugServer::sync).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Sync counter.
    pub frame_index: u64,
    /// Maps that were synced.
    pub maps: u32,
    /// Maps that fanned a settings change out to their entities.
    pub fan_outs: u32,
    /// Queued requests serviced, per kind.
    pub synced: KindCounts,
    /// Requests that were cancelled after the queue was snapshotted.
    pub skipped: u32,
    /// Detached views rebuilt synchronously since the previous sync.
    pub immediate: u32,
    /// Cached materials pushed to the surface after a settings patch.
    pub materials_updated: u32,
}

// ---------------------------------------------------------------------------
// SyncTraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the per-frame sync.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait SyncTraceSink {
    /// Called before a map starts its sync.
    fn on_map_sync_begin(&mut self, e: &MapSyncBeginEvent) {
        _ = e;
    }

    /// Called when a map fans a settings change out to its entities.
    fn on_settings_fan_out(&mut self, e: &SettingsFanOutEvent) {
        _ = e;
    }

    /// Called when a map rebuilds its overlay.
    fn on_overlay_rebuilt(&mut self, e: &OverlayRebuiltEvent) {
        _ = e;
    }

    /// Called after each queued entity sync.
    fn on_entity_sync(&mut self, e: &EntitySyncEvent) {
        _ = e;
    }

    /// Called after a map finished its sync.
    fn on_map_sync_end(&mut self, e: &MapSyncEndEvent) {
        _ = e;
    }

    /// Called with the per-frame summary.
    fn on_sync_report(&mut self, r: &SyncReport) {
        _ = r;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`SyncTraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl SyncTraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`SyncTraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn SyncTraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn SyncTraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn SyncTraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`MapSyncBeginEvent`].
    #[inline]
    pub fn map_sync_begin(&mut self, e: &MapSyncBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_map_sync_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SettingsFanOutEvent`].
    #[inline]
    pub fn settings_fan_out(&mut self, e: &SettingsFanOutEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_settings_fan_out(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OverlayRebuiltEvent`].
    #[inline]
    pub fn overlay_rebuilt(&mut self, e: &OverlayRebuiltEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_overlay_rebuilt(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EntitySyncEvent`].
    #[inline]
    pub fn entity_sync(&mut self, e: &EntitySyncEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_entity_sync(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MapSyncEndEvent`].
    #[inline]
    pub fn map_sync_end(&mut self, e: &MapSyncEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_map_sync_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SyncReport`].
    #[inline]
    pub fn sync_report(&mut self, r: &SyncReport) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_sync_report(r);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = r;
        }
    }
}

// ---------------------------------------------------------------------------
// SyncReportBuilder
// ---------------------------------------------------------------------------

/// Accumulates per-map results during a frame and produces a [`SyncReport`].
#[derive(Debug)]
pub struct SyncReportBuilder {
    report: SyncReport,
}

impl SyncReportBuilder {
    /// Starts a report for the given frame.
    #[must_use]
    pub fn new(frame_index: u64) -> Self {
        Self {
            report: SyncReport {
                frame_index,
                ..SyncReport::default()
            },
        }
    }

    /// Records a finished map sync.
    pub fn map_synced(&mut self, e: &MapSyncEndEvent) {
        self.report.maps += 1;
        self.report.synced.accumulate(&e.synced);
    }

    /// Records a settings fan-out.
    pub fn fan_out(&mut self) {
        self.report.fan_outs += 1;
    }

    /// Records a request that was drained but no longer linked.
    pub fn skipped(&mut self) {
        self.report.skipped += 1;
    }

    /// Sets the number of detached views rebuilt since the previous sync.
    pub fn set_immediate(&mut self, n: u32) {
        self.report.immediate = n;
    }

    /// Sets the number of materials pushed to the surface.
    pub fn set_materials_updated(&mut self, n: u32) {
        self.report.materials_updated = n;
    }

    /// Consumes the builder and produces the final [`SyncReport`].
    #[must_use]
    pub fn finish(self) -> SyncReport {
        self.report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SlotKey;

    fn sample_end(map: MapId) -> MapSyncEndEvent {
        MapSyncEndEvent {
            frame_index: 3,
            map,
            synced: KindCounts {
                regions: 2,
                links: 1,
                obstacles: 0,
                agents: 4,
            },
        }
    }

    #[test]
    fn kind_counts_add_and_total() {
        let mut counts = KindCounts::default();
        counts.add(EntityKind::Link, 2);
        counts.add(EntityKind::Agent, 1);
        assert_eq!(counts.get(EntityKind::Link), 2);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        let map = MapId::from_parts(0, 0);
        sink.on_map_sync_begin(&MapSyncBeginEvent {
            frame_index: 0,
            map,
            queued: KindCounts::default(),
        });
        sink.on_map_sync_end(&sample_end(map));
        sink.on_sync_report(&SyncReport::default());
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.map_sync_end(&sample_end(MapId::from_parts(0, 0)));
        tracer.sync_report(&SyncReport::default());
    }

    #[test]
    fn report_builder_sums_maps() {
        let mut builder = SyncReportBuilder::new(3);
        builder.map_synced(&sample_end(MapId::from_parts(0, 0)));
        builder.map_synced(&sample_end(MapId::from_parts(1, 0)));
        builder.fan_out();
        builder.skipped();
        builder.set_immediate(5);
        let report = builder.finish();
        assert_eq!(report.frame_index, 3);
        assert_eq!(report.maps, 2);
        assert_eq!(report.synced.regions, 4);
        assert_eq!(report.synced.total(), 14);
        assert_eq!(report.fan_outs, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.immediate, 5);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use crate::id::RegionId;
        use alloc::vec::Vec;

        struct RecordingSink {
            synced: Vec<EntityId>,
        }
        impl SyncTraceSink for RecordingSink {
            fn on_entity_sync(&mut self, e: &EntitySyncEvent) {
                self.synced.push(e.entity);
            }
        }

        let entity = EntityId::Region(RegionId::from_parts(4, 1));
        let mut sink = RecordingSink { synced: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.entity_sync(&EntitySyncEvent {
            frame_index: 1,
            map: MapId::from_parts(0, 0),
            entity,
            rebuilt: DirtyFlags::ALL,
        });
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.synced, &[entity]);
    }
}
