//! Scroll State Module
//!
//! Manages scrolling behavior:
//! - Per-region scroll offset, stored in the resource cache
//! - Content and viewport extents recorded by post-order measure
//! - Scroll operations with clamping
//! - Parent chaining for the wheel
//! - Viewport culling of the region's children
//!
//! Offsets are non-positive: `0` shows the start of the content and
//! `-max_scroll()` shows its end. A positive delta moves the content toward
//! its start.

use crate::engine::{LayoutTree, NodeIndex, Resource, ResourceKey, ResourceTable, ResourceType};
use crate::types::{Axis, NodeFlags, Vec2};

// =============================================================================
// SCROLL REGION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRegion {
    pub axis: Axis,
    /// Current offset, in `[-max_scroll(), 0]`.
    pub offset: f32,
    /// Union of the region's painted children.
    pub content_size: Vec2,
    /// The region's content box.
    pub viewport_size: Vec2,
    /// Distance scrolled by one wheel line.
    pub pixels_per_line: f32,
}

impl ScrollRegion {
    pub fn new(axis: Axis, pixels_per_line: f32) -> Self {
        Self {
            axis,
            offset: 0.0,
            content_size: Vec2::ZERO,
            viewport_size: Vec2::ZERO,
            pixels_per_line,
        }
    }

    /// How far the content can move along the scroll axis.
    pub fn max_scroll(&self) -> f32 {
        (self.content_size.along(self.axis) - self.viewport_size.along(self.axis)).max(0.0)
    }

    /// Move by `delta` and clamp. Returns the distance actually moved.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        if delta == 0.0 {
            return 0.0;
        }
        let before = self.offset;
        self.offset = (self.offset + delta).clamp(-self.max_scroll(), 0.0);
        self.offset - before
    }

    /// Scroll delta for `lines` wheel lines. Positive lines scroll toward the end.
    #[inline]
    pub fn wheel_delta(&self, lines: f32) -> f32 {
        -lines * self.pixels_per_line
    }

    pub fn scroll_to_start(&mut self) {
        self.offset = 0.0;
    }

    pub fn scroll_to_end(&mut self) {
        self.offset = -self.max_scroll();
    }

    pub fn at_start(&self) -> bool {
        self.offset >= 0.0
    }

    pub fn at_end(&self) -> bool {
        self.offset <= -self.max_scroll()
    }

    /// Record new extents and re-clamp the offset. Returns `true` when either
    /// extent changed.
    pub fn set_extent(&mut self, content: Vec2, viewport: Vec2) -> bool {
        if self.content_size == content && self.viewport_size == viewport {
            return false;
        }
        self.content_size = content;
        self.viewport_size = viewport;
        self.offset = self.offset.clamp(-self.max_scroll(), 0.0);
        true
    }

    /// The offset as a displacement vector.
    pub fn offset_vec(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        *v.along_mut(self.axis) = self.offset;
        v
    }
}

// =============================================================================
// TREE OPERATIONS
// =============================================================================

/// Nearest node at or above `node` that owns a scroll region.
pub fn scroll_ancestor(tree: &LayoutTree, node: NodeIndex) -> Option<NodeIndex> {
    tree.ancestors(node)
        .find(|&a| tree.node(a).has(NodeFlags::HAS_SCROLL_REGION))
}

/// Scroll the region at `node`, passing the delta up to the next scroll
/// region while the current one is at its boundary.
///
/// Returns the region that moved, or `None` if every region in the chain
/// was already at its boundary.
pub fn scroll_with_chaining(
    tree: &mut LayoutTree,
    resources: &mut ResourceTable<Resource>,
    tree_id: u64,
    node: NodeIndex,
    delta: f32,
) -> Option<NodeIndex> {
    let mut current = scroll_ancestor(tree, node);
    while let Some(n) = current {
        let key = ResourceKey::for_node(tree_id, ResourceType::ScrollRegion, n);
        let moved = match resources.get_by_key_mut(key).and_then(Resource::as_scroll_mut) {
            Some(region) => region.scroll_by(delta) != 0.0,
            None => {
                tracing::warn!(node = n, "scroll node has no scroll region");
                false
            }
        };
        if moved {
            cull_children(tree, resources, tree_id, n);
            return Some(n);
        }
        current = tree.node(n).parent.and_then(|p| scroll_ancestor(tree, p));
    }
    None
}

/// Mark the region's children that lie outside its viewport at the current
/// offset. Uses the last computed layout.
pub fn cull_children(
    tree: &mut LayoutTree,
    resources: &ResourceTable<Resource>,
    tree_id: u64,
    region_node: NodeIndex,
) {
    let key = ResourceKey::for_node(tree_id, ResourceType::ScrollRegion, region_node);
    let Some(region) = resources.peek(key).and_then(Resource::as_scroll) else {
        return;
    };
    let offset = region.offset_vec();
    let viewport = tree.node(region_node).layout.content;

    let mut next = tree.node(region_node).first_child;
    while let Some(c) = next {
        let child = tree.node_mut(c);
        let shown = child
            .layout
            .outer
            .translate(offset + child.interaction.drag_offset);
        child.interaction.culled = !shown.overlaps(&viewport);
        next = child.next_sibling;
    }
}
