// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-entity debug views.
//!
//! An [`EntityDebug`] lives inside its primitive's arena slot and owns the
//! drawables that show that primitive. It never reads the primitive on its
//! own: every rebuild step receives the primitive data and a
//! [`SyncContext`] snapshot of the owning map, so the view needs no
//! back-reference beyond its owner handle.
//!
//! Per-kind geometry lives in the submodules, one [`DebugPrimitive`] impl
//! per primitive data type.

mod agent;
mod link;
mod obstacle;
mod region;

use alloc::vec::Vec;

use crate::dirty::{DirtyAspect, DirtyFlags};
use crate::id::{DrawableId, EntityId, EntityKind, ParentId};
use crate::math::Vec3;
use crate::primitive::Usage;
use crate::queue::QueueSlot;
use crate::settings::DebugSettings;
use crate::surface::DrawingSurface;

/// What a view needs to know about its owning map during a rebuild.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MapContext {
    pub(crate) active: bool,
    pub(crate) debug_enabled: bool,
    /// Resolved scenario (3-D) or canvas (2-D).
    pub(crate) parent: Option<ParentId>,
    pub(crate) up: Vec3,
    pub(crate) link_connection_radius: f32,
}

/// Collaborators borrowed for one rebuild.
///
/// `map` is `None` for a detached view, which then draws nothing and
/// resolves no parent.
pub(crate) struct SyncContext<'a, S: ?Sized> {
    pub(crate) surface: &'a mut S,
    pub(crate) settings: &'a mut DebugSettings,
    pub(crate) map: Option<MapContext>,
}

impl<S: ?Sized> core::fmt::Debug for SyncContext<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SyncContext")
            .field("map", &self.map)
            .finish_non_exhaustive()
    }
}

/// Per-kind geometry, placement and materials of a debug view.
pub(crate) trait DebugPrimitive {
    /// Which queue and global toggle this kind uses.
    const KIND: EntityKind;

    /// Number of drawables a view of this kind owns for `usage`.
    fn drawable_count(usage: Usage) -> usize;

    /// Kind-specific toggle on top of [`DebugSettings::kind_enabled`].
    fn toggle_enabled(settings: &DebugSettings) -> bool {
        _ = settings;
        true
    }

    /// Places the drawables.
    fn update_transform<S: DrawingSurface + ?Sized>(
        &self,
        usage: Usage,
        drawables: &[DrawableId],
        surface: &mut S,
    );

    /// Appends 3-D geometry to freshly cleared mesh drawables.
    fn build_3d<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    );

    /// Appends 2-D shapes to freshly cleared canvas items.
    fn build_2d<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    );

    /// Assigns cached materials to the surfaces of 3-D drawables.
    ///
    /// 2-D shapes carry their colors, so only 3-D views call this.
    fn apply_materials<S: DrawingSurface + ?Sized>(
        &self,
        drawables: &[DrawableId],
        cx: &mut SyncContext<'_, S>,
    );
}

/// Drawable state and dirty tracking for one navigation primitive.
#[derive(Debug)]
pub(crate) struct EntityDebug {
    owner: EntityId,
    usage: Usage,
    /// Emptied by [`free`](Self::free).
    drawables: Vec<DrawableId>,
    enabled: bool,
    dirty: DirtyFlags,
    pub(crate) slot: QueueSlot,
}

impl EntityDebug {
    /// Creates the view's drawables. They start detached and empty.
    pub(crate) fn new<P: DebugPrimitive, S: DrawingSurface + ?Sized>(
        owner: EntityId,
        usage: Usage,
        surface: &mut S,
    ) -> Self {
        debug_assert_eq!(owner.kind(), P::KIND, "view kind must match its owner");
        let kind = usage.drawable_kind();
        let drawables = (0..P::drawable_count(usage))
            .map(|_| surface.create_drawable(kind))
            .collect();
        Self {
            owner,
            usage,
            drawables,
            enabled: true,
            dirty: DirtyFlags::CLEAN,
            slot: QueueSlot::default(),
        }
    }

    pub(crate) fn owner(&self) -> EntityId {
        self.owner
    }

    pub(crate) fn usage(&self) -> Usage {
        self.usage
    }

    pub(crate) fn drawables(&self) -> &[DrawableId] {
        &self.drawables
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Marks `aspect` dirty, returning whether the view has anything to
    /// sync. A view without drawables never goes stale.
    pub(crate) fn mark(&mut self, aspect: DirtyAspect) -> bool {
        if self.drawables.is_empty() {
            return false;
        }
        self.dirty.mark(aspect);
        true
    }

    /// Marks every aspect dirty.
    pub(crate) fn mark_all(&mut self) -> bool {
        if self.drawables.is_empty() {
            return false;
        }
        self.dirty.mark_all();
        true
    }

    /// Flips the view's own switch, marking the mesh dirty on change.
    ///
    /// Returns whether a rebuild is now pending.
    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.mark(DirtyAspect::Mesh)
    }

    /// Runs the dirty rebuild steps in order: parent, transform, mesh,
    /// material. Returns the aspects that were rebuilt.
    pub(crate) fn sync<P: DebugPrimitive, S: DrawingSurface + ?Sized>(
        &mut self,
        data: &P,
        cx: &mut SyncContext<'_, S>,
    ) -> DirtyFlags {
        let mut rebuilt = DirtyFlags::CLEAN;
        if self.dirty.take(DirtyAspect::Parent) {
            self.update_parent(cx);
            rebuilt.parent = true;
        }
        if self.dirty.take(DirtyAspect::Transform) {
            data.update_transform(self.usage, &self.drawables, &mut *cx.surface);
            rebuilt.transform = true;
        }
        if self.dirty.take(DirtyAspect::Mesh) {
            self.update_mesh(data, cx);
            rebuilt.mesh = true;
            rebuilt.material = true;
            rebuilt.parent = true;
        }
        if self.dirty.take(DirtyAspect::Material) {
            self.update_material(data, cx);
            rebuilt.material = true;
        }
        rebuilt
    }

    fn update_parent<S: DrawingSurface + ?Sized>(&self, cx: &mut SyncContext<'_, S>) {
        let parent = cx.map.and_then(|m| m.parent);
        for &drawable in &self.drawables {
            cx.surface.set_parent(drawable, parent);
        }
    }

    fn visible<P: DebugPrimitive, S: ?Sized>(&self, cx: &SyncContext<'_, S>) -> bool {
        self.enabled
            && cx.map.is_some_and(|m| m.active && m.debug_enabled)
            && cx.settings.kind_enabled(P::KIND)
            && P::toggle_enabled(cx.settings)
    }

    fn update_mesh<P: DebugPrimitive, S: DrawingSurface + ?Sized>(
        &mut self,
        data: &P,
        cx: &mut SyncContext<'_, S>,
    ) {
        for &drawable in &self.drawables {
            cx.surface.clear(drawable);
        }
        if self.visible::<P, S>(cx) {
            match self.usage {
                Usage::ThreeD => data.build_3d(&self.drawables, cx),
                Usage::TwoD => data.build_2d(&self.drawables, cx),
            }
        }

        // New geometry needs its materials, and may have been built while
        // the view was detached.
        self.dirty.mark(DirtyAspect::Material);
        if self.dirty.take(DirtyAspect::Material) {
            self.update_material(data, cx);
        }
        self.dirty.mark(DirtyAspect::Parent);
        if self.dirty.take(DirtyAspect::Parent) {
            self.update_parent(cx);
        }
    }

    fn update_material<P: DebugPrimitive, S: DrawingSurface + ?Sized>(
        &self,
        data: &P,
        cx: &mut SyncContext<'_, S>,
    ) {
        if self.usage == Usage::ThreeD {
            data.apply_materials(&self.drawables, cx);
        }
    }

    /// Releases every drawable. Later calls are no-ops.
    pub(crate) fn free<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        for drawable in self.drawables.drain(..) {
            surface.free_drawable(drawable);
        }
        self.dirty = DirtyFlags::CLEAN;
    }
}
