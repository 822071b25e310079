//! Construction-time parameters for a [`crate::physics::PhysicsSystem`].

use crate::broadphase::BroadPhaseKind;
use crate::math::Vec2f;

/// Collects the knobs `PhysicsSystem::new` needs, with defaults that work for a
/// small scene so callers aren't forced to spell out every field.
///
/// Unlike the settings types this crate's collision detection and integration code
/// was modeled on, there is no file or environment loading here: the engine never
/// performs I/O, so its configuration is just a plain struct built in code.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsConfig {
    pub max_bodies: usize,
    pub substeps: u32,
    pub broad_phase: BroadPhaseKind,
    pub gravity: Vec2f,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_bodies: 1024,
            substeps: 1,
            broad_phase: BroadPhaseKind::Naive,
            gravity: Vec2f::zero(),
        }
    }
}

impl PhysicsConfig {
    pub fn new(max_bodies: usize) -> Self {
        Self {
            max_bodies,
            ..Self::default()
        }
    }

    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps;
        self
    }

    pub fn with_broad_phase(mut self, broad_phase: BroadPhaseKind) -> Self {
        self.broad_phase = broad_phase;
        self
    }

    pub fn with_grid(mut self, cell_size: f32) -> Self {
        self.broad_phase = BroadPhaseKind::Grid { cell_size };
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2f) -> Self {
        self.gravity = gravity;
        self
    }
}
