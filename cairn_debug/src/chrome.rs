// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Sync events carry no wall-clock time, so the exporter lays frames out on
//! a synthetic timeline: frame `n` starts at `n * FRAME_SPAN_US` and each
//! event within it advances by one microsecond. Every map gets its own
//! track (`tid`).
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use cairn_core::trace::KindCounts;

use crate::recorder::{RecordedEvent, decode};

/// Synthetic width of one frame on the exported timeline, in microseconds.
pub const FRAME_SPAN_US: u64 = 1000;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut frame = None;
    let mut seq = 0;

    for recorded in decode(bytes) {
        let frame_index = recorded.frame_index();
        if frame != Some(frame_index) {
            frame = Some(frame_index);
            seq = 0;
        }
        let ts = frame_index.saturating_mul(FRAME_SPAN_US) + seq;
        seq += 1;

        match recorded {
            RecordedEvent::MapSyncBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": "MapSync",
                    "cat": "Sync",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.map.index(),
                    "args": {
                        "frame_index": e.frame_index,
                        "queued": counts(e.queued),
                    }
                }));
            }
            RecordedEvent::SettingsFanOut(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SettingsFanOut",
                    "cat": "Sync",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.map.index(),
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "entities": counts(e.entities),
                    }
                }));
            }
            RecordedEvent::OverlayRebuilt(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "OverlayRebuilt",
                    "cat": "Sync",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.map.index(),
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "vertices": e.vertices,
                    }
                }));
            }
            RecordedEvent::EntitySync(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.entity.kind()),
                    "cat": "Entity",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.map.index(),
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "entity": format!("{:?}", e.entity),
                        "parent": e.rebuilt.parent,
                        "transform": e.rebuilt.transform,
                        "mesh": e.rebuilt.mesh,
                        "material": e.rebuilt.material,
                    }
                }));
            }
            RecordedEvent::MapSyncEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": "MapSync",
                    "cat": "Sync",
                    "ts": ts,
                    "pid": 0,
                    "tid": e.map.index(),
                    "args": {
                        "frame_index": e.frame_index,
                        "synced": counts(e.synced),
                    }
                }));
            }
            RecordedEvent::SyncReport(r) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SyncReport",
                    "cat": "Summary",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": r.frame_index,
                        "maps": r.maps,
                        "fan_outs": r.fan_outs,
                        "synced": counts(r.synced),
                        "skipped": r.skipped,
                        "immediate": r.immediate,
                        "materials_updated": r.materials_updated,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn counts(c: KindCounts) -> Value {
    json!({
        "regions": c.regions,
        "links": c.links,
        "obstacles": c.obstacles,
        "agents": c.agents,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use cairn_core::id::MapId;
    use cairn_core::trace::{MapSyncBeginEvent, MapSyncEndEvent, SyncReport, SyncTraceSink};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        let map = MapId::from_raw(2, 0);
        rec.on_map_sync_begin(&MapSyncBeginEvent {
            frame_index: 4,
            map,
            queued: KindCounts::default(),
        });
        rec.on_map_sync_end(&MapSyncEndEvent {
            frame_index: 4,
            map,
            synced: KindCounts {
                regions: 3,
                ..KindCounts::default()
            },
        });
        rec.on_sync_report(&SyncReport {
            frame_index: 4,
            maps: 1,
            ..SyncReport::default()
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["tid"], 2);
        assert_eq!(parsed[0]["ts"], 4000);

        assert_eq!(parsed[1]["ph"], "E");
        assert_eq!(parsed[1]["ts"], 4001);
        assert_eq!(parsed[1]["args"]["synced"]["regions"], 3);

        assert_eq!(parsed[2]["name"], "SyncReport");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
