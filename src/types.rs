//! Core types for spark-ui.
//!
//! These types define the foundation that everything builds on: geometry,
//! dimensions, colors, layout enums and the capability flags carried by every
//! layout node.

use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Geometry
// =============================================================================

/// A 2D vector in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise absolute value.
    #[inline]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Read the component along an axis.
    #[inline]
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Mutable access to the component along an axis.
    #[inline]
    pub fn along_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
}

impl Axis {
    /// The perpendicular axis.
    pub const fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Axis-aligned rectangle: top-left position plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const ZERO: Self = Self {
        pos: Vec2::ZERO,
        size: Vec2::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub const fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.pos.x + self.size.x * 0.5,
            self.pos.y + self.size.y * 0.5,
        )
    }

    /// Same size, shifted by `offset`.
    #[inline]
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::from_pos_size(self.pos + offset, self.size)
    }

    /// Check if a point is inside this rect (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }

    /// True when the two rects share any area.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a = self.max();
        let b = other.max();
        self.pos.x < b.x && other.pos.x < a.x && self.pos.y < b.y && other.pos.y < a.y
    }

    /// Compute intersection of two rects. Disjoint rects yield a zero-sized rect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let min = self.pos.max(other.pos);
        let max = self.max().min(other.max());
        Rect::from_pos_size(min, (max - min).max(Vec2::ZERO))
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// A style size along one axis.
///
/// ```
/// use spark_ui::types::Dimension;
///
/// let width = Dimension::Px(120.0);       // 120 logical pixels
/// let height = Dimension::Percent(50.0);  // half the parent's content height
/// let auto = Dimension::Auto;             // content-determined
/// assert_eq!(height.resolve(300.0), Some(150.0));
/// assert_eq!(auto.resolve(300.0), None);
/// # let _ = width;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Resolved later from content.
    #[default]
    Auto,
    /// Absolute size in logical pixels.
    Px(f32),
    /// Percentage of the parent's content size (0-100).
    Percent(f32),
}

impl Dimension {
    /// Resolve against the parent's content size. `Auto` stays unresolved.
    #[inline]
    pub fn resolve(self, parent_content: f32) -> Option<f32> {
        match self {
            Self::Auto => None,
            Self::Px(v) => Some(v.max(0.0)),
            Self::Percent(p) => Some((parent_content * p / 100.0).max(0.0)),
        }
    }

    #[inline]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<f32> for Dimension {
    fn from(value: f32) -> Self {
        Self::Px(value)
    }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels.
///
/// Integers keep comparisons exact. Alpha 255 = fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create from 0xRRGGBB integer format.
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Normalized channels as consumed by the GPU.
    #[inline]
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

// =============================================================================
// Layout Enums
// =============================================================================

/// How a container lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Display {
    /// Children stack vertically at the content origin.
    #[default]
    Normal = 0,
    Flex = 1,
}

/// Flex direction for container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FlexDirection {
    #[default]
    Row = 0,
    Column = 1,
}

impl FlexDirection {
    /// The main axis of this direction.
    pub const fn main_axis(&self) -> Axis {
        match self {
            Self::Row => Axis::X,
            Self::Column => Axis::Y,
        }
    }
}

/// Justify content (main axis alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum JustifyContent {
    #[default]
    Start = 0,
    Center = 1,
    End = 2,
    SpaceBetween = 3,
}

/// Align items (cross axis alignment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignItems {
    #[default]
    Stretch = 0,
    Start = 1,
    Center = 2,
    End = 3,
}

/// Per-line text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextAlign {
    #[default]
    Start = 0,
    Center = 1,
    End = 2,
}

// =============================================================================
// Node Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Capability bits carried by every layout node.
    ///
    /// Combine with bitwise OR: `NodeFlags::IS_PARENT | NodeFlags::DRAGGABLE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeFlags: u16 {
        const NONE = 0;
        /// Pushed onto the parent stack on creation.
        const IS_PARENT = 1 << 0;
        const DRAGGABLE = 1 << 1;
        const RESIZABLE = 1 << 2;
        const CLICKABLE = 1 << 3;
        const HAS_TEXT = 1 << 4;
        const HAS_SCROLL_REGION = 1 << 5;
        const HAS_TEXT_INPUT = 1 << 6;
        const HAS_IMAGE = 1 << 7;
        /// Skipped by painting and hit-testing.
        const DO_NOT_PAINT = 1 << 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_resolve() {
        assert_eq!(Dimension::Px(40.0).resolve(100.0), Some(40.0));
        assert_eq!(Dimension::Percent(25.0).resolve(200.0), Some(50.0));
        assert_eq!(Dimension::Auto.resolve(200.0), None);
        assert_eq!(Dimension::Px(-5.0).resolve(100.0), Some(0.0));
    }

    #[test]
    fn test_rect_contains_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(30.0, 15.0)));
        assert!(!r.contains(Vec2::new(30.1, 15.0)));
        assert!(!r.contains(Vec2::new(9.9, 12.0)));
    }

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Rect::new(5.0, 5.0, 5.0, 5.0));

        let c = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert_eq!(a.intersect(&c).size, Vec2::ZERO);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_axis_access() {
        let mut v = Vec2::new(1.0, 2.0);
        assert_eq!(v.along(Axis::Y), 2.0);
        *v.along_mut(Axis::X) += 3.0;
        assert_eq!(v, Vec2::new(4.0, 2.0));
        assert_eq!(Axis::X.cross(), Axis::Y);
    }

    #[test]
    fn test_flags_combine() {
        let flags = NodeFlags::IS_PARENT | NodeFlags::HAS_SCROLL_REGION;
        assert!(flags.contains(NodeFlags::IS_PARENT));
        assert!(!flags.contains(NodeFlags::DRAGGABLE));
    }

    #[test]
    fn test_rgba_from_int() {
        assert_eq!(Rgba::from_rgb_int(0x282a36), Rgba::rgb(40, 42, 54));
        assert_eq!(Rgba::WHITE.to_f32_array(), [1.0, 1.0, 1.0, 1.0]);
    }
}
