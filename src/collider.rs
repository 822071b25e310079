//! Collider variants, their packed handle, and the views used to read/mutate them.

use crate::math::{circle_aabb, segment_aabb, Aabb, Circle, Segment, Vec2f};

/// Default restitution assigned to a freshly created collider.
pub const DEFAULT_RESTITUTION: f32 = 0.83;

/// The two collider shapes this engine understands. The numeric value is also the
/// 4-bit type tag packed into a [`ColliderHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColliderType {
    Circle = 0,
    Line = 1,
}

impl ColliderType {
    fn from_tag(tag: u32) -> Self {
        match tag {
            0 => ColliderType::Circle,
            1 => ColliderType::Line,
            other => unreachable!("unknown collider type tag {other}"),
        }
    }
}

const INDEX_BITS: u32 = 28;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Opaque handle encoding a collider's type (4 bits) and pool index (28 bits) in one
/// `u32`, so the hot broad/narrow-phase path can switch on type without virtual dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(u32);

impl ColliderHandle {
    pub(crate) fn new(ty: ColliderType, index: usize) -> Self {
        debug_assert!(index as u32 <= INDEX_MASK, "collider index overflows 28 bits");
        Self(((ty as u32) << INDEX_BITS) | (index as u32 & INDEX_MASK))
    }

    pub fn collider_type(&self) -> ColliderType {
        ColliderType::from_tag(self.0 >> INDEX_BITS)
    }

    pub(crate) fn index(&self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }

    /// The packed 32-bit representation, e.g. for use as a map key across FFI boundaries.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Attributes shared by every collider variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub is_sensor: bool,
    pub friction: f32,
    pub restitution: f32,
    pub category_bits: u16,
    pub mask_bits: u16,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            is_sensor: false,
            friction: 0.0,
            restitution: DEFAULT_RESTITUTION,
            category_bits: 0xffff,
            mask_bits: 0xffff,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CircleData {
    pub(crate) center: Vec2f,
    pub(crate) radius: f32,
    pub(crate) material: ColliderMaterial,
    pub(crate) aabb: Aabb,
}

impl Default for CircleData {
    fn default() -> Self {
        let center = Vec2f::zero();
        let radius = 0.5;
        Self {
            center,
            radius,
            material: ColliderMaterial::default(),
            aabb: circle_aabb(Circle { center, radius }),
        }
    }
}

impl CircleData {
    pub(crate) fn shape(&self) -> Circle {
        Circle {
            center: self.center,
            radius: self.radius,
        }
    }

    fn refresh_aabb(&mut self) {
        self.aabb = circle_aabb(self.shape());
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LineData {
    pub(crate) start: Vec2f,
    pub(crate) end: Vec2f,
    pub(crate) thickness: f32,
    pub(crate) material: ColliderMaterial,
    pub(crate) aabb: Aabb,
}

impl Default for LineData {
    fn default() -> Self {
        let start = Vec2f::zero();
        let end = Vec2f::new(1.0, 0.0);
        let thickness = 0.5;
        Self {
            start,
            end,
            thickness,
            material: ColliderMaterial::default(),
            aabb: segment_aabb(Segment { start, end }, thickness),
        }
    }
}

impl LineData {
    pub(crate) fn shape(&self) -> Segment {
        Segment {
            start: self.start,
            end: self.end,
        }
    }

    fn refresh_aabb(&mut self) {
        self.aabb = segment_aabb(self.shape(), self.thickness);
    }
}

/// Borrowing view over a circle collider.
pub struct CircleView<'a> {
    pub(crate) handle: ColliderHandle,
    pub(crate) data: &'a mut CircleData,
}

impl CircleView<'_> {
    pub fn handle(&self) -> ColliderHandle {
        self.handle
    }

    pub fn collider_type(&self) -> ColliderType {
        ColliderType::Circle
    }

    pub fn center(&self) -> Vec2f {
        self.data.center
    }

    pub fn set_center(&mut self, center: Vec2f) {
        self.data.center = center;
        self.data.refresh_aabb();
    }

    pub fn radius(&self) -> f32 {
        self.data.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.data.radius = radius;
        self.data.refresh_aabb();
    }

    pub fn set_circle(&mut self, center: Vec2f, radius: f32) {
        self.data.center = center;
        self.data.radius = radius;
        self.data.refresh_aabb();
    }

    pub fn aabb(&self) -> Aabb {
        self.data.aabb
    }

    pub fn material(&self) -> ColliderMaterial {
        self.data.material
    }

    pub fn set_material(&mut self, material: ColliderMaterial) {
        self.data.material = material;
    }
}

/// Borrowing view over a thick line-segment collider.
pub struct LineView<'a> {
    pub(crate) handle: ColliderHandle,
    pub(crate) data: &'a mut LineData,
}

impl LineView<'_> {
    pub fn handle(&self) -> ColliderHandle {
        self.handle
    }

    pub fn collider_type(&self) -> ColliderType {
        ColliderType::Line
    }

    pub fn start(&self) -> Vec2f {
        self.data.start
    }

    pub fn set_start(&mut self, start: Vec2f) {
        self.data.start = start;
        self.data.refresh_aabb();
    }

    pub fn end(&self) -> Vec2f {
        self.data.end
    }

    pub fn set_end(&mut self, end: Vec2f) {
        self.data.end = end;
        self.data.refresh_aabb();
    }

    pub fn thickness(&self) -> f32 {
        self.data.thickness
    }

    pub fn set_thickness(&mut self, thickness: f32) {
        self.data.thickness = thickness;
        self.data.refresh_aabb();
    }

    pub fn set_line(&mut self, start: Vec2f, end: Vec2f, thickness: f32) {
        self.data.start = start;
        self.data.end = end;
        self.data.thickness = thickness;
        self.data.refresh_aabb();
    }

    pub fn aabb(&self) -> Aabb {
        self.data.aabb
    }

    pub fn material(&self) -> ColliderMaterial {
        self.data.material
    }

    pub fn set_material(&mut self, material: ColliderMaterial) {
        self.data.material = material;
    }
}
