// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`SyncTraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).

use std::fmt;
use std::io::Write;

use cairn_core::dirty::DirtyFlags;
use cairn_core::trace::{
    EntitySyncEvent, KindCounts, MapSyncBeginEvent, MapSyncEndEvent, OverlayRebuiltEvent,
    SettingsFanOutEvent, SyncReport, SyncTraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    /// Skip per-entity lines.
    quiet: bool,
}

impl<W: Write> fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            quiet: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            quiet: false,
        }
    }

    /// Omits the per-entity `[entity]` lines, which dominate large frames.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// `r=1 l=0 o=2 a=0`
struct Counts(KindCounts);

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "r={} l={} o={} a={}", c.regions, c.links, c.obstacles, c.agents)
    }
}

/// `PTMM`-style flag string, `-` for clean aspects.
struct Flags(DirtyFlags);

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.0;
        for (set, c) in [
            (d.parent, 'P'),
            (d.transform, 'T'),
            (d.mesh, 'M'),
            (d.material, 'm'),
        ] {
            write!(f, "{}", if set { c } else { '-' })?;
        }
        Ok(())
    }
}

impl<W: Write> SyncTraceSink for PrettyPrintSink<W> {
    fn on_map_sync_begin(&mut self, e: &MapSyncBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[map:begin] frame={} map={:?} queued {}",
            e.frame_index,
            e.map,
            Counts(e.queued),
        );
    }

    fn on_settings_fan_out(&mut self, e: &SettingsFanOutEvent) {
        let _ = writeln!(
            self.writer,
            "[fan-out] frame={} map={:?} {}",
            e.frame_index,
            e.map,
            Counts(e.entities),
        );
    }

    fn on_overlay_rebuilt(&mut self, e: &OverlayRebuiltEvent) {
        let _ = writeln!(
            self.writer,
            "[overlay] frame={} map={:?} vertices={}",
            e.frame_index, e.map, e.vertices,
        );
    }

    fn on_entity_sync(&mut self, e: &EntitySyncEvent) {
        if self.quiet {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[entity] frame={} {:?} rebuilt={}",
            e.frame_index,
            e.entity,
            Flags(e.rebuilt),
        );
    }

    fn on_map_sync_end(&mut self, e: &MapSyncEndEvent) {
        let _ = writeln!(
            self.writer,
            "[map:end] frame={} map={:?} synced {}",
            e.frame_index,
            e.map,
            Counts(e.synced),
        );
    }

    fn on_sync_report(&mut self, r: &SyncReport) {
        let _ = writeln!(
            self.writer,
            "[report] frame={} maps={} fan-outs={} synced {} skipped={} \
             immediate={} materials={}",
            r.frame_index,
            r.maps,
            r.fan_outs,
            Counts(r.synced),
            r.skipped,
            r.immediate,
            r.materials_updated,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::id::{EntityId, LinkId, MapId};

    #[test]
    fn pretty_print_entity_sync() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_entity_sync(&EntitySyncEvent {
            frame_index: 3,
            map: MapId::from_raw(0, 0),
            entity: EntityId::from(LinkId::from_raw(2, 1)),
            rebuilt: DirtyFlags {
                mesh: true,
                ..DirtyFlags::CLEAN
            },
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[entity]"), "got: {output}");
        assert!(output.contains("frame=3"), "got: {output}");
        assert!(output.contains("rebuilt=--M-"), "got: {output}");
    }

    #[test]
    fn quiet_sink_skips_entities() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).quiet();
        sink.on_entity_sync(&EntitySyncEvent {
            frame_index: 0,
            map: MapId::from_raw(0, 0),
            entity: EntityId::from(LinkId::from_raw(0, 0)),
            rebuilt: DirtyFlags::ALL,
        });
        sink.on_overlay_rebuilt(&OverlayRebuiltEvent {
            frame_index: 0,
            map: MapId::from_raw(0, 0),
            vertices: 18,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 1, "got: {output}");
        assert!(output.contains("vertices=18"), "got: {output}");
    }
}
