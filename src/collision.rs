//! Collider pools, the live-collider list, broad phase and the resulting contact list.

use std::collections::HashMap;

use crate::broadphase::{grid_pairs, naive_pairs, BroadPhaseKind};
use crate::collider::{CircleData, CircleView, ColliderHandle, ColliderType, LineData, LineView};
use crate::error::{PhysicsError, MAX_COLLIDERS};
use crate::math::{circle_segment_contact, Aabb, Contact};
use crate::pool::Pool;
use crate::store::{Handle as StoreHandle, Store};

/// `{a, b, contact}`: a confirmed overlap between two colliders.
///
/// `contact.normal` points out of `a`'s surface towards `b`.
#[derive(Debug, Clone, Copy)]
pub struct CollisionPair {
    pub a: ColliderHandle,
    pub b: ColliderHandle,
    pub contact: Contact,
}

/// Owns the per-type collider pools, the live-collider list, the active broad phase
/// and the reused contact buffer.
pub struct CollisionSystem {
    circles: Pool<CircleData>,
    lines: Pool<LineData>,
    live: Store<ColliderHandle>,
    live_lookup: HashMap<ColliderHandle, StoreHandle>,
    broad_phase: BroadPhaseKind,
    pairs: Vec<CollisionPair>,
}

impl CollisionSystem {
    /// `max_colliders` is shared by every collider type's pool (each gets its own
    /// pool of that capacity) and must fit a [`ColliderHandle`]'s 28-bit index field.
    pub fn new(max_colliders: usize, broad_phase: BroadPhaseKind) -> Result<Self, PhysicsError> {
        if max_colliders > MAX_COLLIDERS {
            return Err(PhysicsError::TooManyColliders {
                requested: max_colliders,
            });
        }

        Ok(Self {
            circles: Pool::new(max_colliders),
            lines: Pool::new(max_colliders),
            live: Store::new(),
            live_lookup: HashMap::new(),
            broad_phase,
            pairs: Vec::new(),
        })
    }

    pub fn broad_phase(&self) -> BroadPhaseKind {
        self.broad_phase
    }

    pub fn set_broad_phase(&mut self, kind: BroadPhaseKind) {
        self.broad_phase = kind;
    }

    /// Number of live colliders of any type.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Allocate a collider of `ty` with default geometry/material. Returns `None`
    /// (logging a warning) when that type's pool is exhausted.
    pub fn create_collider(&mut self, ty: ColliderType) -> Option<ColliderHandle> {
        let handle = match ty {
            ColliderType::Circle => {
                let idx = self.circles.allocate(CircleData::default())?;
                ColliderHandle::new(ColliderType::Circle, idx)
            }
            ColliderType::Line => {
                let idx = self.lines.allocate(LineData::default())?;
                ColliderHandle::new(ColliderType::Line, idx)
            }
        };
        let store_handle = self.live.add(handle);
        self.live_lookup.insert(handle, store_handle);
        Some(handle)
    }

    /// Release `handle`'s slot and drop it from the live-collider list. No-op if
    /// `handle` is stale or unknown.
    pub fn destroy_collider(&mut self, handle: ColliderHandle) {
        match handle.collider_type() {
            ColliderType::Circle => {
                if self.circles.deallocate(handle.index()).is_none() {
                    return;
                }
            }
            ColliderType::Line => {
                if self.lines.deallocate(handle.index()).is_none() {
                    return;
                }
            }
        }
        if let Some(store_handle) = self.live_lookup.remove(&handle) {
            self.live.remove(store_handle);
        }
    }

    pub fn is_collider_valid(&self, handle: ColliderHandle) -> bool {
        match handle.collider_type() {
            ColliderType::Circle => self.circles.get(handle.index()).is_some(),
            ColliderType::Line => self.lines.get(handle.index()).is_some(),
        }
    }

    pub fn circle_mut(&mut self, handle: ColliderHandle) -> Option<CircleView<'_>> {
        debug_assert_eq!(handle.collider_type(), ColliderType::Circle);
        let data = self.circles.get_mut(handle.index())?;
        Some(CircleView { handle, data })
    }

    pub fn line_mut(&mut self, handle: ColliderHandle) -> Option<LineView<'_>> {
        debug_assert_eq!(handle.collider_type(), ColliderType::Line);
        let data = self.lines.get_mut(handle.index())?;
        Some(LineView { handle, data })
    }

    /// The AABB of any live collider, regardless of type. Used by broad phase.
    pub fn aabb(&self, handle: ColliderHandle) -> Option<Aabb> {
        match handle.collider_type() {
            ColliderType::Circle => self.circles.get(handle.index()).map(|c| c.aabb),
            ColliderType::Line => self.lines.get(handle.index()).map(|l| l.aabb),
        }
    }

    pub(crate) fn sync_circle_center(&mut self, handle: ColliderHandle, center: crate::math::Vec2f) {
        if let Some(mut view) = self.circle_mut(handle) {
            let radius = view.radius();
            view.set_circle(center, radius);
        }
    }

    pub(crate) fn sync_line_vertex(
        &mut self,
        handle: ColliderHandle,
        vertex: u8,
        pos: crate::math::Vec2f,
    ) {
        if let Some(mut view) = self.line_mut(handle) {
            let (start, end) = if vertex == 0 {
                (pos, view.end())
            } else {
                (view.start(), pos)
            };
            let thickness = view.thickness();
            view.set_line(start, end, thickness);
        }
    }

    /// Rebuild the contact list: clear, run the broad phase, then the narrow-phase
    /// filter table (circle/circle, circle/line with normal-out-of-circle,
    /// line/line skipped).
    pub fn generate_collision_pairs(&mut self) {
        self.pairs.clear();

        let handles: Vec<ColliderHandle> = self.live.iter().copied().collect();
        let candidates = match self.broad_phase {
            BroadPhaseKind::Naive => naive_pairs(&handles),
            BroadPhaseKind::Grid { cell_size } => {
                let entries: Vec<_> = handles
                    .iter()
                    .filter_map(|&h| self.aabb(h).map(|aabb| (h, aabb)))
                    .collect();
                grid_pairs(&entries, cell_size)
            }
        };

        log::trace!("broad phase produced {} candidate pairs", candidates.len());

        for (a, b) in candidates {
            if let Some(pair) = self.narrow_phase(a, b) {
                self.pairs.push(pair);
            }
        }

        log::debug!("narrow phase confirmed {} contacts", self.pairs.len());
    }

    fn narrow_phase(&self, a: ColliderHandle, b: ColliderHandle) -> Option<CollisionPair> {
        use ColliderType::*;
        match (a.collider_type(), b.collider_type()) {
            (Circle, Circle) => {
                let ca = self.circles.get(a.index())?;
                let cb = self.circles.get(b.index())?;
                let contact = crate::math::circle_circle_contact(ca.shape(), cb.shape())?;
                Some(CollisionPair { a, b, contact })
            }
            (Circle, Line) => {
                let circle = self.circles.get(a.index())?;
                let line = self.lines.get(b.index())?;
                let contact = circle_segment_contact(circle.shape(), line.shape(), line.thickness)?;
                Some(CollisionPair { a, b, contact })
            }
            (Line, Circle) => {
                // Swap so `a` is always the circle; the contact normal already points
                // out of it.
                let line = self.lines.get(a.index())?;
                let circle = self.circles.get(b.index())?;
                let contact = circle_segment_contact(circle.shape(), line.shape(), line.thickness)?;
                Some(CollisionPair { a: b, b: a, contact })
            }
            (Line, Line) => None,
        }
    }

    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.pairs
    }

    /// Material (sensor flag, restitution, ...) for a collider of either type.
    pub(crate) fn material(&self, handle: ColliderHandle) -> Option<crate::collider::ColliderMaterial> {
        match handle.collider_type() {
            ColliderType::Circle => self.circles.get(handle.index()).map(|c| c.material),
            ColliderType::Line => self.lines.get(handle.index()).map(|l| l.material),
        }
    }
}
