//! Candidate-pair generation: the coarse filter that narrow phase runs on.
//!
//! Both variants work off a snapshot of `(handle, aabb)` pairs rather than reaching
//! back into the collision system's pools, so they stay agnostic to collider storage.

use std::collections::HashSet;

use itertools::Itertools;

use crate::collider::ColliderHandle;
use crate::math::Aabb;

/// Which broad-phase algorithm a [`crate::collision::CollisionSystem`] runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BroadPhaseKind {
    /// All ordered pairs, O(n^2). Fine for small collider counts.
    Naive,
    /// Uniform spatial hash with the given cell size. The reference engine uses 50.0;
    /// a good rule of thumb is roughly twice the average collider size.
    Grid { cell_size: f32 },
}

impl Default for BroadPhaseKind {
    fn default() -> Self {
        BroadPhaseKind::Naive
    }
}

/// Canonical ordering so a pair straddling cells dedupes to one entry regardless of
/// which order its two handles were discovered in.
fn canonical(a: ColliderHandle, b: ColliderHandle) -> (ColliderHandle, ColliderHandle) {
    if a.raw() <= b.raw() {
        (a, b)
    } else {
        (b, a)
    }
}

/// All ordered pairs `(i, j)` with `i < j` over `handles`.
pub fn naive_pairs(handles: &[ColliderHandle]) -> Vec<(ColliderHandle, ColliderHandle)> {
    handles
        .iter()
        .copied()
        .tuple_combinations()
        .filter(|(a, b)| a != b)
        .collect()
}

/// Uniform grid hashing of `entries` (handle + AABB) into `cell_size`-sided cells,
/// emitting each overlapping pair exactly once.
pub fn grid_pairs(
    entries: &[(ColliderHandle, Aabb)],
    cell_size: f32,
) -> Vec<(ColliderHandle, ColliderHandle)> {
    let inv_cell = 1.0 / cell_size;
    let mut cells: std::collections::HashMap<(i32, i32), Vec<ColliderHandle>> =
        std::collections::HashMap::new();

    for (handle, aabb) in entries {
        let min_x = (aabb.min.x * inv_cell).floor() as i32;
        let min_y = (aabb.min.y * inv_cell).floor() as i32;
        let max_x = (aabb.max.x * inv_cell).floor() as i32;
        let max_y = (aabb.max.y * inv_cell).floor() as i32;

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                cells.entry((x, y)).or_default().push(*handle);
            }
        }
    }

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for occupants in cells.values() {
        if occupants.len() < 2 {
            continue;
        }
        for (a, b) in occupants.iter().copied().tuple_combinations() {
            if a == b {
                continue;
            }
            if seen.insert(canonical(a, b)) {
                pairs.push((a, b));
            }
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collider::ColliderType;
    use crate::math::Vec2f;

    fn h(ty: ColliderType, idx: usize) -> ColliderHandle {
        ColliderHandle::new(ty, idx)
    }

    #[test]
    fn naive_emits_every_unordered_pair_once() {
        let handles = vec![
            h(ColliderType::Circle, 0),
            h(ColliderType::Circle, 1),
            h(ColliderType::Circle, 2),
        ];
        let pairs = naive_pairs(&handles);
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn grid_dedupes_pair_spanning_multiple_cells() {
        let a = h(ColliderType::Circle, 0);
        let b = h(ColliderType::Circle, 1);
        // Both AABBs span cells (0,0) and (1,0) with cell size 10.
        let aabb_a = Aabb {
            min: Vec2f::new(5.0, 0.0),
            max: Vec2f::new(15.0, 5.0),
        };
        let aabb_b = Aabb {
            min: Vec2f::new(8.0, 0.0),
            max: Vec2f::new(18.0, 5.0),
        };
        let pairs = grid_pairs(&[(a, aabb_a), (b, aabb_b)], 10.0);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn grid_skips_non_overlapping_cells() {
        let a = h(ColliderType::Circle, 0);
        let b = h(ColliderType::Circle, 1);
        let aabb_a = Aabb {
            min: Vec2f::new(0.0, 0.0),
            max: Vec2f::new(1.0, 1.0),
        };
        let aabb_b = Aabb {
            min: Vec2f::new(1000.0, 1000.0),
            max: Vec2f::new(1001.0, 1001.0),
        };
        let pairs = grid_pairs(&[(a, aabb_a), (b, aabb_b)], 50.0);
        assert!(pairs.is_empty());
    }
}
