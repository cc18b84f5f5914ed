//! Pre-order and post-order measure passes.

use crate::engine::{
    LayoutTree, NodeIndex, NodeKind, Resource, ResourceKey, ResourceTable, ResourceType, ROOT,
    compute_boxes, outer_size_for_content,
};
use crate::types::{AlignItems, Axis, Display, NodeFlags, Vec2};

use super::LayoutScratch;
use super::flex::{AUTO_MAIN_PLACEHOLDER, FlexBox, FlexItem, distribute_share};
use super::text_measure::GlyphShaper;

#[inline]
fn set_auto(item: &mut FlexItem, axis: Axis, auto: bool) {
    match axis {
        Axis::X => item.auto_x = auto,
        Axis::Y => item.auto_y = auto,
    }
}

/// Size a node's children can resolve percentages and wrap text against.
///
/// A resolved axis offers its content size. An `Auto` axis passes on what it
/// was offered itself, minus its own border and padding.
fn child_reference(item: &FlexItem, content: Vec2) -> Vec2 {
    let inset = Vec2::new(
        item.padding.horizontal() + 2.0 * item.border,
        item.padding.vertical() + 2.0 * item.border,
    );
    Vec2::new(
        if item.auto_x { (item.available.x - inset.x).max(0.0) } else { content.x },
        if item.auto_y { (item.available.y - inset.y).max(0.0) } else { content.y },
    )
}

// =============================================================================
// PASS 1: Pre-order measure
// =============================================================================

pub(super) fn measure_pre_order(tree: &mut LayoutTree, scratch: &mut LayoutScratch) {
    // Root fills the viewport declared in its style.
    {
        let root = tree.node_mut(ROOT);
        let size = Vec2::new(
            root.style.width.resolve(0.0).unwrap_or(0.0),
            root.style.height.resolve(0.0).unwrap_or(0.0),
        );
        let border = root.style.border_width.max(0.0);
        let padding = root.style.padding;
        compute_boxes(&mut root.layout, border, &padding, size.x, size.y);
        scratch.items[ROOT] = FlexItem {
            border,
            padding,
            available: size,
            ..FlexItem::default()
        };
    }

    for qi in 0..scratch.queue.len() {
        let n = scratch.queue[qi];
        measure_children(tree, scratch, n);
    }
}

/// Resolve the sizes of `n`'s children and distribute flex free space.
fn measure_children(tree: &mut LayoutTree, scratch: &mut LayoutScratch, n: NodeIndex) {
    let node = tree.node(n);
    if node.first_child.is_none() {
        return;
    }

    let item = scratch.items[n];
    let content = node.layout.content.size;
    let reference = child_reference(&item, content);
    let is_flex = node.style.display == Display::Flex;
    let main_axis = node.style.flex_direction.main_axis();
    let cross_axis = main_axis.cross();
    let align = node.style.align_items;
    let spacing = node.style.spacing;
    let main_resolved = !item.is_auto(main_axis);
    let cross_resolved = !item.is_auto(cross_axis);

    scratch.siblings.clear();
    scratch.siblings.extend(tree.children(n));

    let mut flex = FlexBox::new(main_axis);

    for si in 0..scratch.siblings.len() {
        let c = scratch.siblings[si];
        let child = tree.node_mut(c);
        let style = &child.style;
        let over = child.interaction.size_override;

        let width = over.width.or_else(|| style.width.resolve(reference.x));
        let height = over.height.or_else(|| style.height.resolve(reference.y));

        let mut it = FlexItem {
            align,
            border: style.border_width.max(0.0),
            padding: style.padding,
            auto_x: width.is_none(),
            auto_y: height.is_none(),
            available: reference,
            ..FlexItem::default()
        };
        let mut size = Vec2::new(width.unwrap_or(0.0), height.unwrap_or(0.0));

        if is_flex {
            if it.is_auto(main_axis) {
                *size.along_mut(main_axis) = AUTO_MAIN_PLACEHOLDER;
                it.placeholder = true;
            }
            if it.is_auto(cross_axis) && align == AlignItems::Stretch && cross_resolved {
                *size.along_mut(cross_axis) = content.along(cross_axis);
                set_auto(&mut it, cross_axis, false);
            }
            it.main = size.along(main_axis);
            it.cross = size.along(cross_axis);
            flex.accumulate(it.main, style.flex_grow, style.flex_shrink);
        }

        compute_boxes(&mut child.layout, it.border, &it.padding, size.x, size.y);
        scratch.items[c] = it;
    }

    if is_flex {
        let gaps = flex.gaps(spacing);
        flex.total_main += gaps;

        // A content-sized container has no free space to hand out.
        if main_resolved {
            let free = content.along(main_axis) - flex.total_main;
            if free != 0.0 {
                let mut total = gaps;
                for si in 0..scratch.siblings.len() {
                    let c = scratch.siblings[si];
                    let child = tree.node_mut(c);
                    let it = &mut scratch.items[c];
                    let delta = distribute_share(
                        free,
                        it.main,
                        child.style.flex_grow,
                        child.style.flex_shrink,
                        &flex,
                    );
                    if delta != 0.0 {
                        it.main += delta;
                        let mut size = child.layout.outer.size;
                        *size.along_mut(main_axis) = it.main;
                        compute_boxes(&mut child.layout, it.border, &it.padding, size.x, size.y);
                    }
                    total += it.main;
                }
                flex.total_main = total;
            }
        }
    }

    scratch.boxes[n] = flex;
}

// =============================================================================
// PASS 2: Post-order measure
// =============================================================================

pub(super) fn measure_post_order(
    tree: &mut LayoutTree,
    resources: &mut ResourceTable<Resource>,
    scratch: &mut LayoutScratch,
    shaper: &mut dyn GlyphShaper,
    tree_id: u64,
) {
    for qi in (0..scratch.queue.len()).rev() {
        let n = scratch.queue[qi];
        let item = scratch.items[n];
        let (kind, has_children, is_scroll) = {
            let node = tree.node(n);
            (
                node.kind,
                node.first_child.is_some(),
                node.has(NodeFlags::HAS_SCROLL_REGION),
            )
        };

        let content_size = match kind {
            NodeKind::Text | NodeKind::TextInput => {
                measure_text(tree, resources, shaper, tree_id, n, &item)
            }
            NodeKind::Image { key } if item.auto_x && item.auto_y => {
                resources.peek(key).and_then(Resource::as_image).map(|image| image.size)
            }
            NodeKind::Image { .. } => None,
            NodeKind::Container if has_children && (item.auto_x || item.auto_y) => {
                Some(children_extent(tree, n))
            }
            NodeKind::Container => None,
        };

        if let Some(content_size) = content_size {
            if item.auto_x || item.auto_y {
                let node = tree.node_mut(n);
                let wanted = outer_size_for_content(content_size, item.border, &item.padding);
                let current = node.layout.outer.size;
                let size = Vec2::new(
                    if item.auto_x { wanted.x } else { current.x },
                    if item.auto_y { wanted.y } else { current.y },
                );
                compute_boxes(&mut node.layout, item.border, &item.padding, size.x, size.y);
            }
        }

        // Correct the container total by what the placeholder got wrong.
        // Grow/shrink is not redistributed.
        if item.placeholder {
            if let Some(parent) = tree.node(n).parent {
                let flex = &mut scratch.boxes[parent];
                let final_main = tree.node(n).layout.outer.size.along(flex.main_axis);
                flex.total_main += final_main - AUTO_MAIN_PLACEHOLDER;
            }
        }

        if is_scroll {
            update_scroll_extent(tree, resources, tree_id, n);
        }
    }
}

/// Wrap a text node's glyphs and return the text block size.
fn measure_text(
    tree: &LayoutTree,
    resources: &mut ResourceTable<Resource>,
    shaper: &mut dyn GlyphShaper,
    tree_id: u64,
    n: NodeIndex,
    item: &FlexItem,
) -> Option<Vec2> {
    let node = tree.node(n);
    let key = ResourceKey::for_node(tree_id, ResourceType::Text, n);
    let Some(text) = resources.get_by_key_mut(key).and_then(Resource::as_text_mut) else {
        tracing::warn!(node = n, "text node has no text resource");
        return None;
    };

    text.shape_if_dirty(shaper, node.style.font);
    let wrap_width = if item.auto_x {
        (item.available.x - item.padding.horizontal() - 2.0 * item.border).max(0.0)
    } else {
        node.layout.content.size.x
    };
    let mut size = text.measure(wrap_width);
    if node.kind == NodeKind::TextInput {
        // An empty input still shows one line.
        size.y = size.y.max(text.line_height);
    }
    Some(size)
}

/// Extent of `n`'s children along its stacking axis (sum plus spacing) and
/// across it (max). Hidden and culled children still take up space.
pub(crate) fn children_extent(tree: &LayoutTree, n: NodeIndex) -> Vec2 {
    stacked_extent(tree, n, |_| true)
}

/// Extent a scroll region scrolls over. `DO_NOT_PAINT` children are left
/// out; culled ones still count, culling must not shrink the content.
pub(crate) fn scroll_content_extent(tree: &LayoutTree, n: NodeIndex) -> Vec2 {
    stacked_extent(tree, n, |c| !tree.node(c).has(NodeFlags::DO_NOT_PAINT))
}

fn stacked_extent(tree: &LayoutTree, n: NodeIndex, counts: impl Fn(NodeIndex) -> bool) -> Vec2 {
    let node = tree.node(n);
    let stack_axis = match node.style.display {
        Display::Flex => node.style.flex_direction.main_axis(),
        Display::Normal => Axis::Y,
    };
    let cross_axis = stack_axis.cross();

    let mut along = 0.0f32;
    let mut across = 0.0f32;
    let mut count = 0usize;
    for c in tree.children(n).filter(|&c| counts(c)) {
        let size = tree.node(c).layout.outer.size;
        along += size.along(stack_axis);
        across = across.max(size.along(cross_axis));
        count += 1;
    }
    along += node.style.spacing * count.saturating_sub(1) as f32;

    let mut extent = Vec2::ZERO;
    *extent.along_mut(stack_axis) = along;
    *extent.along_mut(cross_axis) = across;
    extent
}

/// Record a scroll region's content and viewport sizes. When the content
/// changed, the offset is re-clamped and stale culling is cleared.
fn update_scroll_extent(
    tree: &mut LayoutTree,
    resources: &mut ResourceTable<Resource>,
    tree_id: u64,
    n: NodeIndex,
) {
    let content = scroll_content_extent(tree, n);
    let viewport = tree.node(n).layout.content.size;
    let key = ResourceKey::for_node(tree_id, ResourceType::ScrollRegion, n);
    let Some(region) = resources.get_by_key_mut(key).and_then(Resource::as_scroll_mut) else {
        tracing::warn!(node = n, "scroll node has no scroll region");
        return;
    };

    if region.set_extent(content, viewport) {
        let mut next = tree.node(n).first_child;
        while let Some(c) = next {
            let child = tree.node_mut(c);
            child.interaction.culled = false;
            next = child.next_sibling;
        }
    }
}
