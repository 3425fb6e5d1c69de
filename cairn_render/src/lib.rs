// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained drawing surface and draw lists for cairn.
//!
//! This crate sits between [`cairn_core`]'s debug sync and an actual
//! renderer. It provides:
//!
//! - [`RecordingSurface`]: a [`DrawingSurface`](cairn_core::surface::DrawingSurface)
//!   that keeps every drawable, surface and material in memory
//! - [`DrawList`]: the priority-ordered draw commands for one scenario or
//!   canvas
//! - [`ColoredVertex`]: an interleaved `Pod` vertex, with
//!   [`colored_vertices`] and [`as_bytes`] for GPU upload

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod list;
mod surface;
mod vertex;

pub use list::{CanvasDraw, DrawList, MeshDraw};
pub use surface::{CanvasCommand, Drawable, MeshSurface, RecordingSurface};
pub use vertex::{ColoredVertex, as_bytes, colored_vertices};
