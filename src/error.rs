//! Error type for the handful of operations that can fail at construction time.
//!
//! Everything else in this crate reports failure inline as `Option`/no-op, per the
//! spec's error contract: stale handles and exhausted pools are expected, recoverable
//! conditions, not exceptional ones. Construction-time misconfiguration is the one
//! place a `Result` pulls its weight, since it's something a caller composes with `?`
//! rather than checks on every call.

use thiserror::Error;

/// Maximum pool index representable in a [`crate::collider::ColliderHandle`]'s 28-bit field.
pub const MAX_COLLIDERS: usize = 1 << 28;

/// Failure building a physics or collision system.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhysicsError {
    /// Requested collider capacity doesn't fit in the 28-bit index field of a collider handle.
    #[error("collider capacity {requested} exceeds the maximum of {MAX_COLLIDERS}")]
    TooManyColliders { requested: usize },

    /// Substep count must be at least 1; zero substeps would never integrate or resolve.
    #[error("substeps must be at least 1, got {requested}")]
    ZeroSubsteps { requested: usize },
}
