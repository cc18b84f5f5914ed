//! Box model: Outer (border edge) ⊇ Inner (inside border) ⊇ Content (inside padding).
//!
//! Sizing and positioning are separate operations. [`compute_boxes`] only
//! writes sizes and [`place_boxes`] only writes positions, so bottom-up
//! measurement never needs placement and top-down placement never resizes.

use crate::style::Padding;
use crate::types::{Rect, Vec2};

/// The three derived rectangles of one node plus its accumulated visual offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    pub outer: Rect,
    pub inner: Rect,
    pub content: Rect,
    /// Drag and scroll displacement accumulated from this node and its ancestors.
    /// Layout positions exclude it; hit-testing and painting add it.
    pub visual_offset: Vec2,
}

impl LayoutBox {
    /// Outer rect where the node is actually drawn.
    #[inline]
    pub fn screen_outer(&self) -> Rect {
        self.outer.translate(self.visual_offset)
    }

    /// Content rect where the node is actually drawn.
    #[inline]
    pub fn screen_content(&self) -> Rect {
        self.content.translate(self.visual_offset)
    }
}

/// Derive all three sizes from the outer size. Pure and idempotent.
///
/// Negative inputs clamp to zero, and each inner rect clamps to zero once
/// border or padding exceed what is available.
pub fn compute_boxes(layout: &mut LayoutBox, border_width: f32, padding: &Padding, width: f32, height: f32) {
    let border = border_width.max(0.0);
    let outer = Vec2::new(width.max(0.0), height.max(0.0));
    let inner = (outer - Vec2::new(2.0 * border, 2.0 * border)).max(Vec2::ZERO);
    let content = (inner - Vec2::new(padding.horizontal(), padding.vertical())).max(Vec2::ZERO);

    layout.outer.size = outer;
    layout.inner.size = inner;
    layout.content.size = content;
}

/// Set the three positions from the outer origin. Sizes are untouched and
/// must already come from [`compute_boxes`].
///
/// Insets are clamped to the enclosing size, so a box collapsed by its border
/// or padding still starts inside its parent.
pub fn place_boxes(layout: &mut LayoutBox, origin: Vec2, border_width: f32, padding: &Padding) {
    let border = border_width.max(0.0);
    let outer = layout.outer.size;
    let inner = layout.inner.size;
    layout.outer.pos = origin;
    layout.inner.pos = origin + Vec2::new(border.min(outer.x), border.min(outer.y));
    layout.content.pos = layout.inner.pos
        + Vec2::new(padding.left.max(0.0).min(inner.x), padding.top.max(0.0).min(inner.y));
}

/// Outer size needed to hold `content` with the given border and padding.
#[inline]
pub fn outer_size_for_content(content: Vec2, border_width: f32, padding: &Padding) -> Vec2 {
    let border = border_width.max(0.0);
    Vec2::new(
        content.x + padding.horizontal() + 2.0 * border,
        content.y + padding.vertical() + 2.0 * border,
    )
}
