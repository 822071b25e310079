//! The top-level system: body storage, global forces, gravity and the step loop
//! that ties integration to the collision system.

use std::collections::HashMap;

use crate::body::{BodyData, BodyHandle, BodyView};
use crate::collider::ColliderHandle;
use crate::collision::CollisionSystem;
use crate::config::PhysicsConfig;
use crate::error::PhysicsError;
use crate::math::Vec2f;
use crate::store::Store;

/// Owns every body, the collision system and the forces applied uniformly to every
/// dynamic body each step.
pub struct PhysicsSystem {
    bodies: Store<BodyData>,
    global_forces: Store<Vec2f>,
    gravity: Vec2f,
    substeps: u32,
    last_dt: f32,
    collision: CollisionSystem,
    collider_body: HashMap<ColliderHandle, BodyHandle>,
}

impl PhysicsSystem {
    /// The collision system is sized to `3 * config.max_bodies` colliders, giving
    /// room for multiple colliders per body without a separate capacity knob.
    pub fn new(config: PhysicsConfig) -> Result<Self, PhysicsError> {
        if config.substeps == 0 {
            return Err(PhysicsError::ZeroSubsteps {
                requested: 0,
            });
        }

        let max_colliders = config.max_bodies.saturating_mul(3);
        let collision = CollisionSystem::new(max_colliders, config.broad_phase)?;

        Ok(Self {
            bodies: Store::new(),
            global_forces: Store::new(),
            gravity: config.gravity,
            substeps: config.substeps,
            // Implicit velocity needs a timestep to convert to/from previous-position;
            // assume a conventional frame time until the first real `step` overwrites it.
            last_dt: 1.0 / 60.0,
            collision,
            collider_body: HashMap::new(),
        })
    }

    pub fn gravity(&self) -> Vec2f {
        self.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2f) {
        self.gravity = gravity;
    }

    /// Add a force applied to every dynamic body on every substep, returning a handle
    /// that can later be passed to [`Self::remove_global_force`].
    pub fn add_global_force(&mut self, force: Vec2f) -> crate::store::Handle {
        self.global_forces.add(force)
    }

    pub fn remove_global_force(&mut self, handle: crate::store::Handle) {
        self.global_forces.remove(handle);
    }

    pub fn global_force(&self, handle: crate::store::Handle) -> Option<Vec2f> {
        self.global_forces.get(handle).copied()
    }

    pub fn create_body(&mut self) -> BodyHandle {
        self.bodies.add(BodyData::default())
    }

    /// Remove a body and, if it had one, its attached collider.
    pub fn destroy_body(&mut self, handle: BodyHandle) {
        let Some(data) = self.bodies.remove(handle) else {
            return;
        };
        if let Some(collider) = data.collider {
            self.collider_body.remove(&collider);
            self.collision.destroy_collider(collider);
        }
    }

    pub fn is_body_valid(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body(&mut self, handle: BodyHandle) -> Option<BodyView<'_>> {
        let last_dt = self.last_dt;
        let data = self.bodies.get_mut(handle)?;
        Some(BodyView {
            handle,
            data,
            last_dt,
        })
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<BodyView<'_>> {
        self.body(handle)
    }

    pub fn collision_system(&self) -> &CollisionSystem {
        &self.collision
    }

    pub fn collision_system_mut(&mut self) -> &mut CollisionSystem {
        &mut self.collision
    }

    /// Attach a collider to a body. `vertex` is forwarded to the body (it only
    /// matters for a line collider, selecting which endpoint tracks the body).
    pub fn attach_collider(&mut self, body: BodyHandle, collider: ColliderHandle, vertex: u8) {
        if let Some(data) = self.bodies.get_mut(body) {
            data.collider = Some(collider);
            data.collider_vertex = vertex;
            self.collider_body.insert(collider, body);
        }
    }

    /// Advance the simulation by `dt` seconds: sum global forces once, then integrate
    /// and sync colliders over `substeps` equal slices of `dt`, then run broad and
    /// narrow phase once and resolve every confirmed contact.
    pub fn step(&mut self, dt: f32) {
        // Velocity is implicit in (position - previous_position) over one substep;
        // record the substep size so set_velocity/velocity can convert to/from it.
        self.last_dt = dt / self.substeps as f32;
        let global_force_sum = self
            .global_forces
            .iter()
            .fold(Vec2f::zero(), |acc, &f| acc + f);

        log::debug!(
            "step dt={dt} substeps={} bodies={}",
            self.substeps,
            self.bodies.len()
        );

        for _ in 0..self.substeps {
            self.integrate(self.last_dt, global_force_sum);
            self.sync_colliders();
        }

        self.collision.generate_collision_pairs();
        self.resolve();
    }

    fn integrate(&mut self, dt: f32, global_force_sum: Vec2f) {
        if dt == 0.0 {
            return;
        }
        for body in self.bodies.iter_mut() {
            if !body.is_dynamic() {
                continue;
            }
            let accel = (body.force + global_force_sum) * body.inv_mass() + self.gravity;
            let next = body.pos * 2.0 - body.prev_pos + accel * dt * dt;
            body.prev_pos = body.pos;
            body.pos = next;
            body.acceleration = accel;
            body.force = Vec2f::zero();
        }
    }

    fn sync_colliders(&mut self) {
        for body in self.bodies.iter() {
            let Some(collider) = body.collider else {
                continue;
            };
            match collider.collider_type() {
                crate::collider::ColliderType::Circle => {
                    self.collision.sync_circle_center(collider, body.pos);
                }
                crate::collider::ColliderType::Line => {
                    self.collision
                        .sync_line_vertex(collider, body.collider_vertex, body.pos);
                }
            }
        }
    }

    /// Resolve every contact the collision system produced this step: impulse-based,
    /// restitution-weighted, skipping sensors and pairs with no mutual dynamic body.
    fn resolve(&mut self) {
        let pairs: Vec<_> = self.collision.collision_pairs().to_vec();
        for pair in pairs {
            let Some(&body_a) = self.collider_body.get(&pair.a) else {
                continue;
            };
            let Some(&body_b) = self.collider_body.get(&pair.b) else {
                continue;
            };

            let mat_a = self.collision.material(pair.a);
            let mat_b = self.collision.material(pair.b);
            if mat_a.map_or(false, |m| m.is_sensor) || mat_b.map_or(false, |m| m.is_sensor) {
                continue;
            }

            let (inv_mass_a, pos_a, prev_a) = match self.bodies.get(body_a) {
                Some(b) => (b.inv_mass(), b.pos, b.prev_pos),
                None => continue,
            };
            let (inv_mass_b, pos_b, prev_b) = match self.bodies.get(body_b) {
                Some(b) => (b.inv_mass(), b.pos, b.prev_pos),
                None => continue,
            };

            let total_inv_mass = inv_mass_a + inv_mass_b;
            if total_inv_mass == 0.0 {
                continue;
            }

            // Raw per-substep delta (x - x_prev), not true velocity: the resolver
            // works entirely in these units and only the body-view API converts to
            // and from real velocity by last_dt.
            let delta_a = pos_a - prev_a;
            let delta_b = pos_b - prev_b;
            let relative = delta_b - delta_a;
            let normal = pair.contact.normal;
            let separating = relative.dot(normal);
            if separating >= 0.0 {
                continue;
            }

            let restitution = 0.5
                * (mat_a.map(|m| m.restitution).unwrap_or(0.0)
                    + mat_b.map(|m| m.restitution).unwrap_or(0.0));
            let impulse_mag = -(1.0 + restitution) * separating / total_inv_mass;

            if let Some(b) = self.bodies.get_mut(body_a) {
                if b.is_dynamic() {
                    b.prev_pos += normal * (impulse_mag * inv_mass_a);
                }
            }
            if let Some(b) = self.bodies.get_mut(body_b) {
                if b.is_dynamic() {
                    b.prev_pos -= normal * (impulse_mag * inv_mass_b);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::ColliderType;

    fn system(gravity: Vec2f) -> PhysicsSystem {
        PhysicsSystem::new(PhysicsConfig::new(16).with_gravity(gravity)).unwrap()
    }

    #[test]
    fn zero_substeps_is_rejected() {
        let err = PhysicsSystem::new(PhysicsConfig::new(4).with_substeps(0));
        assert!(err.is_err());
    }

    #[test]
    fn free_fall_follows_gravity() {
        let mut sys = system(Vec2f::new(0.0, -10.0));
        let body = sys.create_body();
        sys.body_mut(body).unwrap().set_position(Vec2f::zero());

        sys.step(1.0);

        let pos = sys.body_mut(body).unwrap().position();
        assert!((pos.y - (-10.0)).abs() < 1e-3);
    }

    #[test]
    fn static_body_does_not_move_under_gravity() {
        let mut sys = system(Vec2f::new(0.0, -10.0));
        let body = sys.create_body();
        {
            let mut view = sys.body_mut(body).unwrap();
            view.set_position(Vec2f::zero());
            view.set_static(true);
        }

        sys.step(1.0);

        let pos = sys.body_mut(body).unwrap().position();
        assert_eq!(pos, Vec2f::zero());
    }

    /// S1: a ball falling under gravity comes to rest on a static floor line.
    #[test]
    fn falling_ball_rests_on_floor() {
        let mut sys = PhysicsSystem::new(
            PhysicsConfig::new(16)
                .with_gravity(Vec2f::new(0.0, -10.0))
                .with_substeps(4),
        )
        .unwrap();

        let floor_body = sys.create_body();
        sys.body_mut(floor_body).unwrap().set_static(true);
        let floor_collider = sys
            .collision_system_mut()
            .create_collider(ColliderType::Line)
            .unwrap();
        {
            let mut line = sys.collision_system_mut().line_mut(floor_collider).unwrap();
            line.set_line(Vec2f::new(-100.0, 0.0), Vec2f::new(100.0, 0.0), 1.0);
        }
        sys.attach_collider(floor_body, floor_collider, 0);

        let ball_body = sys.create_body();
        sys.body_mut(ball_body).unwrap().set_position(Vec2f::new(0.0, 20.0));
        let ball_collider = sys
            .collision_system_mut()
            .create_collider(ColliderType::Circle)
            .unwrap();
        {
            let mut circle = sys.collision_system_mut().circle_mut(ball_collider).unwrap();
            circle.set_circle(Vec2f::new(0.0, 20.0), 1.0);
        }
        sys.attach_collider(ball_body, ball_collider, 0);

        for _ in 0..600 {
            sys.step(1.0 / 60.0);
        }

        let resting_y = sys.body_mut(ball_body).unwrap().position().y;
        assert!(resting_y > 0.5 && resting_y < 4.0, "resting_y = {resting_y}");
    }

    /// S2: two equal-mass circles colliding head-on at equal/opposite speed with full
    /// restitution exchange velocities (approximately, given the single-shot impulse solver).
    #[test]
    fn head_on_elastic_collision_separates_bodies() {
        let mut sys = system(Vec2f::zero());

        let a = sys.create_body();
        let b = sys.create_body();
        sys.body_mut(a).unwrap().set_position(Vec2f::new(-2.0, 0.0));
        sys.body_mut(b).unwrap().set_position(Vec2f::new(2.0, 0.0));

        let ca = sys.collision_system_mut().create_collider(ColliderType::Circle).unwrap();
        sys.collision_system_mut().circle_mut(ca).unwrap().set_circle(Vec2f::new(-2.0, 0.0), 1.0);
        sys.attach_collider(a, ca, 0);

        let cb = sys.collision_system_mut().create_collider(ColliderType::Circle).unwrap();
        sys.collision_system_mut().circle_mut(cb).unwrap().set_circle(Vec2f::new(2.0, 0.0), 1.0);
        sys.attach_collider(b, cb, 0);

        {
            let mut view = sys.body_mut(a).unwrap();
            view.set_velocity(Vec2f::new(5.0, 0.0));
        }
        {
            let mut view = sys.body_mut(b).unwrap();
            view.set_velocity(Vec2f::new(-5.0, 0.0));
        }

        for _ in 0..40 {
            sys.step(1.0 / 60.0);
        }

        let pos_a = sys.body_mut(a).unwrap().position();
        let pos_b = sys.body_mut(b).unwrap().position();
        assert!(pos_a.x < pos_b.x, "bodies must not have passed through each other");
    }

    #[test]
    fn destroying_body_drops_its_collider() {
        let mut sys = system(Vec2f::zero());
        let body = sys.create_body();
        let collider = sys.collision_system_mut().create_collider(ColliderType::Circle).unwrap();
        sys.attach_collider(body, collider, 0);

        sys.destroy_body(body);

        assert!(!sys.is_body_valid(body));
        assert!(!sys.collision_system().is_collider_valid(collider));
    }
}
