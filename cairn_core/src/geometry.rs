// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex assembly for debug geometry.
//!
//! Pure functions from primitive data to flat vertex buffers. Nothing here
//! touches a [`DrawingSurface`](crate::surface::DrawingSurface) or a dirty
//! flag; the views decide *when* to build and these functions decide *what*.

use alloc::vec::Vec;
use core::f64::consts::{PI, TAU};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use rand::Rng;

use crate::color::Color;
use crate::math::Vec3;

/// Segments per link search circle.
pub const LINK_CIRCLE_SEGMENTS: usize = 30;

/// Vertices in a link debug mesh: one line plus two circles of line pairs.
pub const LINK_VERTEX_COUNT: usize = 2 + 2 * 2 * LINK_CIRCLE_SEGMENTS;

/// Latitude rings of an obstacle radius sphere (excluding the poles).
pub const SPHERE_RINGS: u32 = 16;

/// Longitude segments of an obstacle radius sphere.
pub const SPHERE_RADIAL_SEGMENTS: u32 = 32;

/// Vertices emitted per static obstacle edge.
pub const OBSTACLE_EDGE_VERTICES: usize = 8;

/// Vertices emitted per region edge connection.
pub const EDGE_CONNECTION_VERTICES: usize = 6;

/// Hue jitter applied per polygon when random face color is on.
pub const FACE_HUE_JITTER: f32 = 0.1;

/// Value jitter applied per polygon when random face color is on.
pub const FACE_VALUE_JITTER: f32 = 0.2;

#[expect(
    clippy::cast_possible_truncation,
    reason = "vertex data is stored in f32"
)]
fn narrow(v: f64) -> f32 {
    v as f32
}

/// Triangulated faces and boundary lines of a region's navigation mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionMesh {
    /// Triangle list, three vertices per triangle.
    pub faces: Vec<Vec3>,
    /// Per-vertex face colors, when random face color is on.
    pub face_colors: Option<Vec<Color>>,
    /// Line list, two vertices per polygon edge.
    pub edges: Vec<Vec3>,
}

impl RegionMesh {
    /// Returns whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// How region faces are colored.
#[derive(Debug)]
pub enum FaceColoring<'a, R> {
    /// No per-vertex colors; the material albedo applies.
    Uniform,
    /// Each polygon gets `base` with a random hue and value jitter.
    Jittered {
        /// Color the jitter is applied to.
        base: Color,
        /// Random stream.
        rng: &'a mut R,
    },
}

/// Fan-triangulates every polygon of a navigation mesh.
///
/// Polygons with fewer than three indices are skipped, as are polygons that
/// reference a vertex out of range. Edge lines are emitted only when
/// `edge_lines` is set.
pub fn region_mesh<R: Rng>(
    vertices: &[Vec3],
    polygons: &[Vec<u32>],
    edge_lines: bool,
    coloring: FaceColoring<'_, R>,
) -> RegionMesh {
    let usable = |polygon: &&Vec<u32>| {
        polygon.len() >= 3 && polygon.iter().all(|&i| (i as usize) < vertices.len())
    };
    let (face_count, line_count) = polygons
        .iter()
        .filter(usable)
        .fold((0, 0), |(f, l), p| (f + (p.len() - 2) * 3, l + p.len() * 2));

    let mut mesh = RegionMesh {
        faces: Vec::with_capacity(face_count),
        face_colors: None,
        edges: Vec::with_capacity(if edge_lines { line_count } else { 0 }),
    };
    let (mut colors, mut jitter) = match coloring {
        FaceColoring::Uniform => (None, None),
        FaceColoring::Jittered { base, rng } => (Some(Vec::with_capacity(face_count)), Some((base, rng))),
    };

    for polygon in polygons.iter().filter(usable) {
        let at = |i: usize| vertices[polygon[i] as usize];
        let polygon_color = jitter
            .as_mut()
            .map(|(base, rng)| base.jittered(&mut **rng, FACE_HUE_JITTER, FACE_VALUE_JITTER));

        for i in 0..polygon.len() - 2 {
            mesh.faces.extend([at(0), at(i + 1), at(i + 2)]);
            if let (Some(colors), Some(c)) = (&mut colors, polygon_color) {
                colors.extend([c; 3]);
            }
        }
        if edge_lines {
            for i in 0..polygon.len() {
                mesh.edges.extend([at(i), at((i + 1) % polygon.len())]);
            }
        }
    }

    let skipped = polygons.iter().filter(|p| p.len() >= 3 && !usable(p)).count();
    if skipped > 0 {
        log::warn!("skipped {skipped} navigation polygons with out-of-range vertex indices");
    }
    mesh.face_colors = colors;
    mesh
}

/// Builds a link's line and its two search-radius circles.
///
/// Circles are drawn in the plane orthogonal to the dominant axis of `up`.
/// Always returns [`LINK_VERTEX_COUNT`] vertices.
#[must_use]
pub fn link_lines(start: Vec3, end: Vec3, radius: f32, up: Vec3) -> Vec<Vec3> {
    let axis = up.max_axis_index();
    let radius = f64::from(radius);
    let circle_point = |step: usize| {
        let angle = (step as f64 * 12.0).to_radians();
        let (a, b) = (narrow(angle.sin() * radius), narrow(angle.cos() * radius));
        match axis {
            0 => Vec3::new(0.0, a, b),
            1 => Vec3::new(a, 0.0, b),
            _ => Vec3::new(a, b, 0.0),
        }
    };

    let mut out = Vec::with_capacity(LINK_VERTEX_COUNT);
    out.extend([start, end]);
    for center in [start, end] {
        for i in 0..LINK_CIRCLE_SEGMENTS {
            out.extend([center + circle_point(i), center + circle_point(i + 1)]);
        }
    }
    out
}

/// Builds the outline of a static obstacle as a line list.
///
/// Per edge: a push-direction arrow from the edge midpoint, the bottom edge,
/// the top edge at `height`, and the vertical post at the edge start.
#[must_use]
pub fn obstacle_edges(vertices: &[Vec3], height: f32) -> Vec<Vec3> {
    let n = vertices.len();
    let mut out = Vec::with_capacity(n * OBSTACLE_EDGE_VERTICES);
    for (i, &vertex) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % n];
        let arrow = next.direction_to(vertex).cross(Vec3::UP);
        let middle = vertex + (next - vertex) * 0.5;
        let top = Vec3::new(vertex.x, height, vertex.z);
        let next_top = Vec3::new(next.x, height, next.z);
        out.extend([
            middle,
            middle + arrow * 0.5,
            vertex,
            next,
            top,
            next_top,
            vertex,
            top,
        ]);
    }
    out
}

/// Builds a UV sphere as an indexed triangle list.
///
/// Produces `(SPHERE_RINGS + 2) * (SPHERE_RADIAL_SEGMENTS + 1)` vertices and
/// `(SPHERE_RINGS + 1) * SPHERE_RADIAL_SEGMENTS * 6` indices.
#[must_use]
pub fn uv_sphere(radius: f32) -> (Vec<Vec3>, Vec<u32>) {
    let rows = SPHERE_RINGS + 2;
    let columns = SPHERE_RADIAL_SEGMENTS + 1;
    let mut vertices = Vec::with_capacity((rows * columns) as usize);
    let mut indices = Vec::with_capacity(((rows - 1) * SPHERE_RADIAL_SEGMENTS * 6) as usize);
    let r = f64::from(radius);

    let mut this_row = 0;
    let mut prev_row = 0;
    for j in 0..rows {
        let v = f64::from(j) / f64::from(SPHERE_RINGS + 1);
        let w = (PI * v).sin();
        let y = narrow(r * (PI * v).cos());
        for i in 0..columns {
            let u = f64::from(i) / f64::from(SPHERE_RADIAL_SEGMENTS);
            let x = narrow((u * TAU).sin() * r * w);
            let z = narrow((u * TAU).cos() * r * w);
            vertices.push(Vec3::new(x, y, z));
            if i > 0 && j > 0 {
                indices.extend([
                    prev_row + i - 1,
                    prev_row + i,
                    this_row + i - 1,
                    prev_row + i,
                    this_row + i,
                    this_row + i - 1,
                ]);
            }
        }
        prev_row = this_row;
        this_row += columns;
    }
    (vertices, indices)
}

/// Builds the edge-connection overlay as a line list.
///
/// Per connection: the pathway line, then a margin marker at each end
/// spanning `margin / 2` to either side of the pathway.
#[must_use]
pub fn edge_connection_lines(connections: impl IntoIterator<Item = (Vec3, Vec3)>, margin: f32) -> Vec<Vec3> {
    let half = margin * 0.5;
    let mut out = Vec::new();
    for (start, end) in connections {
        let start_right = start.direction_to(end).cross(Vec3::UP);
        let end_right = end.direction_to(start).cross(Vec3::UP);
        out.extend([
            start,
            end,
            start - start_right * half,
            start + start_right * half,
            end + end_right * half,
            end - end_right * half,
        ]);
    }
    out
}

/// Projects 3-D vertices onto the `(x, z)` ground plane.
#[must_use]
pub fn project_xz(vertices: &[Vec3]) -> Vec<Point> {
    vertices.iter().map(|v| v.xz()).collect()
}

/// Returns whether a 2-D polygon winds clockwise in a y-down canvas.
///
/// Static obstacles wound this way push agents inward.
#[must_use]
pub fn is_clockwise(points: &[Point]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let sum: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| (b.x - a.x) * (b.y + a.y))
        .sum();
    sum > 0.0
}
