//! Pre-order placement.
//!
//! Positions are absolute and exclude drag and scroll. Each node's
//! `visual_offset` carries the displacement accumulated from its ancestors'
//! drags, its enclosing scroll regions and its own drag.

use crate::engine::{
    LayoutTree, NodeIndex, NodeKind, Resource, ResourceKey, ResourceTable, ResourceType, ROOT,
    place_boxes,
};
use crate::types::{Axis, Display, NodeFlags, Vec2};

use super::LayoutScratch;
use super::flex::{align_offset, justify_offsets};

pub(super) fn place_pre_order(
    tree: &mut LayoutTree,
    resources: &mut ResourceTable<Resource>,
    scratch: &mut LayoutScratch,
    tree_id: u64,
) {
    {
        let root = tree.node_mut(ROOT);
        let item = scratch.items[ROOT];
        place_boxes(&mut root.layout, Vec2::ZERO, item.border, &item.padding);
        root.layout.visual_offset = root.interaction.drag_offset;
    }

    for qi in 0..scratch.queue.len() {
        let n = scratch.queue[qi];
        align_text(tree, resources, tree_id, n);
        place_children(tree, resources, scratch, tree_id, n);
    }
}

/// Offset each wrapped line of a text node inside its content width.
fn align_text(tree: &LayoutTree, resources: &mut ResourceTable<Resource>, tree_id: u64, n: NodeIndex) {
    let node = tree.node(n);
    if !matches!(node.kind, NodeKind::Text | NodeKind::TextInput) {
        return;
    }
    let key = ResourceKey::for_node(tree_id, ResourceType::Text, n);
    if let Some(text) = resources.get_by_key_mut(key).and_then(Resource::as_text_mut) {
        text.align_lines(node.style.text_align, node.layout.content.size.x);
    }
}

fn place_children(
    tree: &mut LayoutTree,
    resources: &ResourceTable<Resource>,
    scratch: &mut LayoutScratch,
    tree_id: u64,
    n: NodeIndex,
) {
    let node = tree.node(n);
    if node.first_child.is_none() {
        return;
    }

    let content = node.layout.content;
    let mut base_visual = node.layout.visual_offset;
    let scrolls = node.has(NodeFlags::HAS_SCROLL_REGION);
    if scrolls {
        let key = ResourceKey::for_node(tree_id, ResourceType::ScrollRegion, n);
        if let Some(region) = resources.peek(key).and_then(Resource::as_scroll) {
            base_visual += region.offset_vec();
        }
    }

    let style = &node.style;
    let (main_axis, lead, gap, align) = match style.display {
        Display::Flex => {
            let main_axis = style.flex_direction.main_axis();
            let flex = scratch.boxes[n];
            let free = content.size.along(main_axis) - flex.total_main;
            let (lead, gap) = justify_offsets(style.justify_content, free, style.spacing, flex.item_count);
            (main_axis, lead, gap, Some(style.align_items))
        }
        Display::Normal => (Axis::Y, 0.0, style.spacing, None),
    };
    let cross_axis = main_axis.cross();

    scratch.siblings.clear();
    scratch.siblings.extend(tree.children(n));

    let mut cursor = content.pos.along(main_axis) + lead;
    for si in 0..scratch.siblings.len() {
        let c = scratch.siblings[si];
        let item = scratch.items[c];
        let child = tree.node_mut(c);
        let size = child.layout.outer.size;

        let mut origin = Vec2::ZERO;
        *origin.along_mut(main_axis) = cursor;
        let cross = match align {
            Some(align) => align_offset(align, content.size.along(cross_axis), size.along(cross_axis)),
            None => 0.0,
        };
        *origin.along_mut(cross_axis) = content.pos.along(cross_axis) + cross;

        place_boxes(&mut child.layout, origin, item.border, &item.padding);
        child.layout.visual_offset = base_visual + child.interaction.drag_offset;
        // Hidden children of a scroll region stay out of its content extent.
        if !(scrolls && child.has(NodeFlags::DO_NOT_PAINT)) {
            cursor += size.along(main_axis) + gap;
        }
    }
}
