// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interleaved vertex buffers for GPU upload.

use alloc::vec::Vec;

use cairn_core::color::Color;
use cairn_core::math::Vec3;

use crate::surface::MeshSurface;

/// Position followed by RGBA color, 28 bytes, no padding.
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ColoredVertex {
    /// Drawable-local position.
    pub position: Vec3,
    /// Vertex color.
    pub color: Color,
}

/// Expands a surface into a non-indexed vertex list.
///
/// Surfaces without per-vertex colors use `fallback`, normally the albedo of
/// the surface's material. Out-of-range indices are dropped.
#[must_use]
pub fn colored_vertices(surface: &MeshSurface, fallback: Color) -> Vec<ColoredVertex> {
    let color_at = |i: usize| {
        surface
            .colors
            .as_ref()
            .and_then(|c| c.get(i).copied())
            .unwrap_or(fallback)
    };
    let vertex_at = |i: usize| {
        surface.vertices.get(i).map(|&position| ColoredVertex {
            position,
            color: color_at(i),
        })
    };
    match &surface.indices {
        Some(indices) => {
            let out: Vec<_> = indices.iter().filter_map(|&i| vertex_at(i as usize)).collect();
            if out.len() != indices.len() {
                log::warn!(
                    "dropped {} out-of-range indices",
                    indices.len() - out.len()
                );
            }
            out
        }
        None => (0..surface.vertices.len()).filter_map(vertex_at).collect(),
    }
}

/// Views a vertex slice as raw bytes.
#[must_use]
pub fn as_bytes(vertices: &[ColoredVertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
