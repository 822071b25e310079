//! Body storage and the borrowing view used to read/mutate a single body.

use crate::collider::ColliderHandle;
use crate::math::Vec2f;
use crate::store::Handle;

/// Handle to a body, minted by [`crate::physics::PhysicsSystem::create_body`].
pub type BodyHandle = Handle;

/// Convention: a mass at or below zero marks a static (infinite-mass) body.
pub const STATIC_MASS: f32 = -1.0;
/// Convention: the default mass assigned to a freshly created dynamic body.
pub const DEFAULT_DYNAMIC_MASS: f32 = 1.0;

/// Per-body state. Velocity is intentionally absent: it's implicit in
/// `(position - previous_position) / last_dt`.
#[derive(Debug, Clone, Copy)]
pub struct BodyData {
    pub(crate) pos: Vec2f,
    pub(crate) prev_pos: Vec2f,
    pub(crate) acceleration: Vec2f,
    pub(crate) force: Vec2f,
    pub(crate) mass: f32,
    pub(crate) collider: Option<ColliderHandle>,
    pub(crate) collider_vertex: u8,
}

impl Default for BodyData {
    fn default() -> Self {
        Self {
            pos: Vec2f::zero(),
            prev_pos: Vec2f::zero(),
            acceleration: Vec2f::zero(),
            force: Vec2f::zero(),
            mass: DEFAULT_DYNAMIC_MASS,
            collider: None,
            collider_vertex: 0,
        }
    }
}

impl BodyData {
    pub(crate) fn is_dynamic(&self) -> bool {
        self.mass > 0.0
    }

    pub(crate) fn inv_mass(&self) -> f32 {
        if self.is_dynamic() {
            1.0 / self.mass
        } else {
            0.0
        }
    }
}

/// Borrowing view over one body, returned by `PhysicsSystem::body`/`body_mut`.
///
/// Views borrow the owning system; they don't own a pool slot and have no destructor
/// side effects. Use `PhysicsSystem::destroy_body` to remove a body.
pub struct BodyView<'a> {
    pub(crate) handle: BodyHandle,
    pub(crate) data: &'a mut BodyData,
    pub(crate) last_dt: f32,
}

impl BodyView<'_> {
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Always `true`: a view only exists borrowing a live body's slot.
    pub fn is_valid(&self) -> bool {
        true
    }

    pub fn position(&self) -> Vec2f {
        self.data.pos
    }

    /// Set the position, also resetting previous-position so implicit velocity is zero.
    pub fn set_position(&mut self, pos: Vec2f) {
        self.data.pos = pos;
        self.data.prev_pos = pos;
    }

    /// Implicit velocity, `(position - previous_position) / last_dt`. Zero if `last_dt` is zero.
    pub fn velocity(&self) -> Vec2f {
        if self.last_dt == 0.0 {
            Vec2f::zero()
        } else {
            (self.data.pos - self.data.prev_pos) / self.last_dt
        }
    }

    /// Set the implicit velocity by rewriting previous-position.
    ///
    /// Must be called after `set_position` within the same frame, since `set_position`
    /// also resets previous-position (and therefore velocity) to zero.
    pub fn set_velocity(&mut self, v: Vec2f) {
        self.data.prev_pos = self.data.pos - v * self.last_dt;
    }

    pub fn acceleration(&self) -> Vec2f {
        self.data.acceleration
    }

    pub fn set_acceleration(&mut self, a: Vec2f) {
        self.data.acceleration = a;
    }

    pub fn mass(&self) -> f32 {
        self.data.mass
    }

    pub fn set_mass(&mut self, mass: f32) {
        self.data.mass = mass;
    }

    /// `true` when `mass <= 0`, i.e. this body is treated as infinite-mass.
    pub fn is_static(&self) -> bool {
        !self.data.is_dynamic()
    }

    /// Convenience over `set_mass`: `true` pins the body at `STATIC_MASS`, `false`
    /// resets it to `DEFAULT_DYNAMIC_MASS`.
    pub fn set_static(&mut self, is_static: bool) {
        self.data.mass = if is_static {
            STATIC_MASS
        } else {
            DEFAULT_DYNAMIC_MASS
        };
    }

    pub fn add_force(&mut self, f: Vec2f) {
        self.data.force += f;
    }

    pub fn zero_force(&mut self) {
        self.data.force = Vec2f::zero();
    }

    pub fn force(&self) -> Vec2f {
        self.data.force
    }

    /// Attach a collider. `vertex` selects which endpoint of a line collider tracks
    /// this body's position (0 or 1); ignored for circle colliders.
    pub fn set_collider(&mut self, collider: ColliderHandle, vertex: u8) {
        self.data.collider = Some(collider);
        self.data.collider_vertex = vertex;
    }

    pub fn collider(&self) -> Option<ColliderHandle> {
        self.data.collider
    }
}
