//! Flex aggregates and free-space distribution.
//!
//! [`FlexBox`] (per container) and [`FlexItem`] (per node, as a child of its
//! parent) are recomputed every frame and never read across frames.

use crate::style::Padding;
use crate::types::{AlignItems, Axis, JustifyContent};

/// Tentative main size of an `Auto` flex item until post-order measure
/// knows its content size.
pub const AUTO_MAIN_PLACEHOLDER: f32 = 10.0;

/// Per-container totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexBox {
    pub main_axis: Axis,
    /// Sum of item main sizes plus inter-item spacing.
    pub total_main: f32,
    pub total_grow: f32,
    pub total_shrink_weight: f32,
    pub item_count: usize,
}

impl FlexBox {
    pub fn new(main_axis: Axis) -> Self {
        Self {
            main_axis,
            ..Self::default()
        }
    }

    /// Add one item's tentative main size and weights.
    pub fn accumulate(&mut self, main: f32, grow: f32, shrink: f32) {
        self.total_main += main;
        self.total_grow += grow.max(0.0);
        self.total_shrink_weight += shrink.max(0.0) * main;
        self.item_count += 1;
    }

    /// Spacing between `item_count` items.
    #[inline]
    pub fn gaps(&self, spacing: f32) -> f32 {
        spacing * self.item_count.saturating_sub(1) as f32
    }
}

/// Per-node sizing inputs and results used by its parent's passes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlexItem {
    pub main: f32,
    pub cross: f32,
    /// Parent's cross alignment as applied to this item.
    pub align: AlignItems,
    pub border: f32,
    pub padding: Padding,
    /// Width comes from content (post-order).
    pub auto_x: bool,
    /// Height comes from content (post-order).
    pub auto_y: bool,
    /// Main size is the placeholder and must be fixed up post-order.
    pub placeholder: bool,
    /// Reference size for percentages and text wrapping.
    pub available: crate::types::Vec2,
}

impl FlexItem {
    #[inline]
    pub fn is_auto(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.auto_x,
            Axis::Y => self.auto_y,
        }
    }
}

/// Main-size change of one item for `free` space left in its container.
///
/// Positive free space goes out by grow factor. Negative free space is
/// taken back by `shrink × main`. Either is a no-op when the matching total
/// is zero.
pub fn distribute_share(free: f32, main: f32, grow: f32, shrink: f32, flex: &FlexBox) -> f32 {
    if free > 0.0 && flex.total_grow > 0.0 {
        free * grow.max(0.0) / flex.total_grow
    } else if free < 0.0 && flex.total_shrink_weight > 0.0 {
        let share = free * shrink.max(0.0) * main / flex.total_shrink_weight;
        // Never below zero.
        share.max(-main)
    } else {
        0.0
    }
}

/// Leading offset and inter-item gap along the main axis.
pub fn justify_offsets(justify: JustifyContent, free: f32, spacing: f32, count: usize) -> (f32, f32) {
    match justify {
        JustifyContent::Start => (0.0, spacing),
        JustifyContent::Center => (free * 0.5, spacing),
        JustifyContent::End => (free, spacing),
        JustifyContent::SpaceBetween if count > 1 && free > 0.0 => {
            (0.0, spacing + free / (count - 1) as f32)
        }
        JustifyContent::SpaceBetween => (0.0, spacing),
    }
}

/// Cross-axis offset of an item of `size` inside `available`.
pub fn align_offset(align: AlignItems, available: f32, size: f32) -> f32 {
    match align {
        AlignItems::Start | AlignItems::Stretch => 0.0,
        AlignItems::Center => (available - size) * 0.5,
        AlignItems::End => available - size,
    }
}
