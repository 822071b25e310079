//! 2D rigid-body physics core.
//!
//! Position-based (Verlet) integration over pooled, handle-addressed bodies and
//! colliders, with broad/narrow-phase collision detection and impulse-based
//! resolution. The crate performs no I/O, owns no window or render loop, and logs
//! through the `log` facade rather than any particular backend: embedding it in a
//! game, a simulation tool or a headless test harness is entirely the caller's call.
//!
//! Start with [`config::PhysicsConfig`] and [`physics::PhysicsSystem`].

pub mod body;
pub mod broadphase;
pub mod collider;
pub mod collision;
pub mod config;
pub mod error;
pub mod math;
pub mod physics;
pub mod pool;
pub mod store;

pub use body::{BodyHandle, BodyView};
pub use broadphase::BroadPhaseKind;
pub use collider::{CircleView, ColliderHandle, ColliderMaterial, ColliderType, LineView};
pub use collision::{CollisionPair, CollisionSystem};
pub use config::PhysicsConfig;
pub use error::PhysicsError;
pub use math::{Aabb, Circle, Contact, Segment, Vec2f};
pub use physics::PhysicsSystem;
