// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty tracking and per-frame sync for navigation debug visualization.
//!
//! `cairn_core` keeps the debug drawings of navigation maps, regions, links,
//! obstacles and agents in step with the navigation data they show. It is
//! `no_std` compatible (with `alloc`), draws through a caller-supplied
//! [`DrawingSurface`](surface::DrawingSurface), and stores every entity in a
//! generational arena addressed by copyable handles.
//!
//! # Architecture
//!
//! Mutations mark dirty aspects and queue the affected view on its map. Once
//! per frame, [`sync`](server::NavigationDebugServer::sync) walks every map
//! and rebuilds each queued view exactly once:
//!
//! ```text
//!   region_set_* / link_set_* / ...
//!       │  marks DirtyFlags
//!       ▼
//!   SyncRequestQueue (per map, per kind) ◄── settings fan-out
//!       │
//!       ▼
//!   NavigationDebugServer::sync()
//!       │  per map: overlay, regions, links, agents, obstacles
//!       ▼
//!   EntityDebug::sync ──► DrawingSurface ──► SyncReport / SyncTraceSink
//! ```
//!
//! Views without a map skip the queue and rebuild on the spot.
//!
//! **[`server`]**: [`NavigationDebugServer`](server::NavigationDebugServer):
//! entity arenas, typed mutators and the per-frame sync.
//!
//! **[`dirty`]**: The four rebuild aspects (parent, transform, mesh,
//! material) and their flag set.
//!
//! **[`queue`]**: Idempotent, cancellable sync request queue with
//! snapshot flushing.
//!
//! **[`settings`]**: Global toggles, colors and the shared material cache.
//!
//! **[`surface`]**: The [`DrawingSurface`](surface::DrawingSurface) trait and
//! the batch, shape and material types it accepts.
//!
//! **[`geometry`]**: Pure builders for region meshes, link markers,
//! obstacle outlines and edge-connection overlays.
//!
//! **[`primitive`]**: The navigation data each entity kind carries.
//!
//! **[`id`]**: Generational handles and surface-side ids.
//!
//! **[`math`]** and **[`color`]**: Small 3-D vector, transform and color
//! types.
//!
//! **[`trace`]**: [`SyncTraceSink`](trace::SyncTraceSink) trait and event
//! types for sync instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies and
//!   seeds face color jitter from the OS.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod color;
pub mod dirty;
pub mod geometry;
pub mod id;
pub mod math;
pub mod primitive;
pub mod queue;
pub mod server;
pub mod settings;
pub mod surface;
pub mod trace;

mod arena;
mod map;
mod store;
mod view;

#[cfg(test)]
mod testing;
