//! Vector and geometry primitives shared by bodies, colliders and the narrow phase.
//!
//! All math runs on 32-bit floats; there is
//! no unit system and no prescribed "up" direction, so gravity is a free parameter.

use ultraviolet::Vec2;

/// A 2D vector of 32-bit floats. Used everywhere: positions, velocities, forces, normals.
pub type Vec2f = Vec2;

/// Axis-aligned bounding box, min/max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2f,
    pub max: Vec2f,
}

/// A line segment with thickness, i.e. the geometric shape behind a `ColliderType::Line`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec2f,
    pub end: Vec2f,
}

/// A circle, i.e. the geometric shape behind a `ColliderType::Circle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2f,
    pub radius: f32,
}

/// A geometric witness of overlap between two colliders.
///
/// `normal` points away from `a`'s surface towards `b`; `point` lies on `a`'s surface;
/// `penetration` is the overlap depth along `normal` and is always non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub normal: Vec2f,
    pub point: Vec2f,
    pub penetration: f32,
}

/// Closest point on segment `(a, b)` to `p`.
///
/// Degenerate segments (`a == b`) return `a`.
pub fn closest_point_on_segment(p: Vec2f, a: Vec2f, b: Vec2f) -> Vec2f {
    let ab = b - a;
    let denom = ab.dot(ab);
    if denom == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / denom).clamp(0.0, 1.0);
    a + ab * t
}

/// Circle-circle contact test.
///
/// Returns `None` when the circles don't overlap. The normal points out of `c1`;
/// for perfectly coincident centers it defaults to `(1, 0)` since no direction is defined.
pub fn circle_circle_contact(c1: Circle, c2: Circle) -> Option<Contact> {
    let d = c2.center - c1.center;
    let s = d.dot(d);
    let r = c1.radius + c2.radius;
    if s > r * r {
        return None;
    }
    let dist = s.sqrt();
    let normal = if dist == 0.0 {
        Vec2f::new(1.0, 0.0)
    } else {
        d / dist
    };
    let penetration = r - dist;
    let point = c1.center + normal * c1.radius;
    Some(Contact {
        normal,
        point,
        penetration,
    })
}

/// Circle vs thick-segment contact test.
///
/// Degenerates to `circle_circle_contact` against a circle centered on the segment's
/// closest point to `circle.center`, with the segment's thickness as radius.
pub fn circle_segment_contact(circle: Circle, segment: Segment, thickness: f32) -> Option<Contact> {
    let closest = closest_point_on_segment(circle.center, segment.start, segment.end);
    circle_circle_contact(
        circle,
        Circle {
            center: closest,
            radius: thickness,
        },
    )
}

/// AABB of a circle.
pub fn circle_aabb(circle: Circle) -> Aabb {
    let r = Vec2f::new(circle.radius, circle.radius);
    Aabb {
        min: circle.center - r,
        max: circle.center + r,
    }
}

/// AABB of a thick segment: the endpoint bounding box inflated by `thickness` on every side.
pub fn segment_aabb(segment: Segment, thickness: f32) -> Aabb {
    let t = Vec2f::new(thickness, thickness);
    let min = Vec2f::new(
        segment.start.x.min(segment.end.x),
        segment.start.y.min(segment.end.y),
    );
    let max = Vec2f::new(
        segment.start.x.max(segment.end.x),
        segment.start.y.max(segment.end.y),
    );
    Aabb {
        min: min - t,
        max: max + t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closest-point projection clamps to the segment's endpoints.
    #[test]
    fn closest_point_boundary() {
        let a = Vec2f::new(0.0, 0.0);
        let b = Vec2f::new(10.0, 0.0);

        assert_eq!(
            closest_point_on_segment(Vec2f::new(5.0, 5.0), a, b),
            Vec2f::new(5.0, 0.0)
        );
        assert_eq!(
            closest_point_on_segment(Vec2f::new(-5.0, 5.0), a, b),
            Vec2f::new(0.0, 0.0)
        );
        assert_eq!(
            closest_point_on_segment(Vec2f::new(15.0, 5.0), a, b),
            Vec2f::new(10.0, 0.0)
        );
    }

    /// A degenerate segment collapses to its single point.
    #[test]
    fn closest_point_degenerate_segment() {
        let a = Vec2f::new(3.0, 4.0);
        assert_eq!(closest_point_on_segment(Vec2f::new(100.0, 100.0), a, a), a);
    }

    #[test]
    fn circle_circle_overlapping() {
        let c1 = Circle {
            center: Vec2f::new(0.0, 0.0),
            radius: 5.0,
        };
        let c2 = Circle {
            center: Vec2f::new(8.0, 0.0),
            radius: 5.0,
        };
        let contact = circle_circle_contact(c1, c2).unwrap();
        assert!((contact.penetration - 2.0).abs() < 1e-4);
        assert_eq!(contact.normal, Vec2f::new(1.0, 0.0));
        assert_eq!(contact.point, Vec2f::new(5.0, 0.0));
    }

    #[test]
    fn circle_circle_separated() {
        let c1 = Circle {
            center: Vec2f::new(0.0, 0.0),
            radius: 1.0,
        };
        let c2 = Circle {
            center: Vec2f::new(10.0, 0.0),
            radius: 1.0,
        };
        assert!(circle_circle_contact(c1, c2).is_none());
    }

    /// Circle vs thick segment, normal pointing out of the circle.
    #[test]
    fn circle_segment_contact_normal_direction() {
        let circle = Circle {
            center: Vec2f::new(0.0, 0.0),
            radius: 5.0,
        };
        let segment = Segment {
            start: Vec2f::new(7.0, 0.0),
            end: Vec2f::new(20.0, 0.0),
        };
        let contact = circle_segment_contact(circle, segment, 5.0).unwrap();
        assert!((contact.normal.x - -1.0).abs() < 1e-4);
        assert!(contact.normal.y.abs() < 1e-4);
        assert!((contact.penetration - 3.0).abs() < 1e-4);
        assert!((contact.point.x - -5.0).abs() < 1e-3);
    }

    #[test]
    fn aabb_contains_circle_geometry() {
        let circle = Circle {
            center: Vec2f::new(2.0, -3.0),
            radius: 4.0,
        };
        let aabb = circle_aabb(circle);
        assert_eq!(aabb.min, Vec2f::new(-2.0, -7.0));
        assert_eq!(aabb.max, Vec2f::new(6.0, 1.0));
    }

    #[test]
    fn aabb_contains_segment_geometry() {
        let segment = Segment {
            start: Vec2f::new(0.0, 10.0),
            end: Vec2f::new(20.0, 10.0),
        };
        let aabb = segment_aabb(segment, 1.0);
        assert_eq!(aabb.min, Vec2f::new(-1.0, 9.0));
        assert_eq!(aabb.max, Vec2f::new(21.0, 11.0));
    }
}
