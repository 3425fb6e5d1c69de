// Copyright 2026 the Cairn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking aspects for debug views.
//!
//! Every debug view (entity or map) tracks four independent aspects of its
//! drawable state. A set flag means the drawable no longer matches the
//! primitive and must be rebuilt before the next frame renders.
//!
//! # Clearing semantics
//!
//! Flags are cleared only inside their own rebuild step during
//! [`sync`](crate::server::NavigationDebugServer::sync). Nothing outside a
//! rebuild step resets a flag.
//!
//! # Chaining
//!
//! A [`Mesh`](DirtyAspect::Mesh) rebuild re-marks
//! [`Material`](DirtyAspect::Material) and [`Parent`](DirtyAspect::Parent)
//! and services both immediately, since new geometry needs its materials
//! reapplied and may have been built while the view was detached.

/// One independently tracked aspect of a debug view's drawable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DirtyAspect {
    /// Parent scope changed: the scenario (3D) or canvas (2D) the drawable
    /// belongs to must be re-resolved.
    Parent,
    /// Owner transform changed.
    Transform,
    /// Owner geometry or visibility changed; geometry must be rebuilt.
    Mesh,
    /// Materials must be reapplied to the drawable's surfaces.
    Material,
}

impl DirtyAspect {
    /// All aspects in sync order.
    pub const ALL: [Self; 4] = [Self::Parent, Self::Transform, Self::Mesh, Self::Material];
}

/// The four dirty flags of one debug view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirtyFlags {
    /// See [`DirtyAspect::Parent`].
    pub parent: bool,
    /// See [`DirtyAspect::Transform`].
    pub transform: bool,
    /// See [`DirtyAspect::Mesh`].
    pub mesh: bool,
    /// See [`DirtyAspect::Material`].
    pub material: bool,
}

impl DirtyFlags {
    /// No aspect is dirty.
    pub const CLEAN: Self = Self {
        parent: false,
        transform: false,
        mesh: false,
        material: false,
    };

    /// Every aspect is dirty.
    pub const ALL: Self = Self {
        parent: true,
        transform: true,
        mesh: true,
        material: true,
    };

    fn slot(&mut self, aspect: DirtyAspect) -> &mut bool {
        match aspect {
            DirtyAspect::Parent => &mut self.parent,
            DirtyAspect::Transform => &mut self.transform,
            DirtyAspect::Mesh => &mut self.mesh,
            DirtyAspect::Material => &mut self.material,
        }
    }

    /// Returns whether `aspect` is dirty.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self, aspect: DirtyAspect) -> bool {
        match aspect {
            DirtyAspect::Parent => self.parent,
            DirtyAspect::Transform => self.transform,
            DirtyAspect::Mesh => self.mesh,
            DirtyAspect::Material => self.material,
        }
    }

    /// Returns whether no aspect is dirty.
    #[inline]
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        !(self.parent || self.transform || self.mesh || self.material)
    }

    /// Marks `aspect` dirty.
    #[inline]
    pub fn mark(&mut self, aspect: DirtyAspect) {
        *self.slot(aspect) = true;
    }

    /// Marks every aspect dirty.
    #[inline]
    pub fn mark_all(&mut self) {
        *self = Self::ALL;
    }

    /// Clears `aspect`, returning whether it was dirty.
    ///
    /// Only rebuild steps call this.
    #[inline]
    pub(crate) fn take(&mut self, aspect: DirtyAspect) -> bool {
        core::mem::replace(self.slot(aspect), false)
    }
}
