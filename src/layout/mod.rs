//! Layout Module - Measure and place a subtree.
//!
//! # Algorithm
//!
//! Three tree-wide passes over one breadth-first order (parents before
//! children), held in an explicit queue sized to the node count:
//!
//! 1. **Pre-order measure**: resolve each child's size from its style (pixels,
//!    percent of the parent's content, or `Auto`), then distribute flex free
//!    space by grow or shrink weight.
//! 2. **Post-order measure** (queue reversed): sizes that depend on content.
//!    Text wraps, images take their packed size, `Auto` containers wrap their
//!    children, scroll regions record their content extent. `Auto` flex items
//!    replace their placeholder and the container total is corrected.
//! 3. **Pre-order place**: absolute positions top-down, flex justify/align,
//!    per-line text alignment and accumulated visual offsets.
//!
//! All per-pass storage lives in [`LayoutScratch`], reused frame to frame.

mod flex;
mod measure;
mod place;
mod text_measure;

pub use flex::*;
pub use text_measure::*;

use crate::engine::{LayoutTree, NodeIndex, Resource, ResourceTable, ROOT};

/// Frame-transient storage for the layout passes.
#[derive(Debug, Clone, Default)]
pub struct LayoutScratch {
    /// Breadth-first node order.
    pub(crate) queue: Vec<NodeIndex>,
    /// Children of the node being processed.
    pub(crate) siblings: Vec<NodeIndex>,
    /// Flex totals, indexed by container.
    pub(crate) boxes: Vec<FlexBox>,
    /// Sizing state, indexed by node.
    pub(crate) items: Vec<FlexItem>,
}

impl LayoutScratch {
    /// Reserve room for `capacity` nodes so no pass reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Vec::with_capacity(capacity),
            siblings: Vec::with_capacity(capacity),
            boxes: Vec::with_capacity(capacity),
            items: Vec::with_capacity(capacity),
        }
    }

    fn reset(&mut self, node_count: usize) {
        self.queue.clear();
        self.siblings.clear();
        self.boxes.clear();
        self.boxes.resize(node_count, FlexBox::default());
        self.items.clear();
        self.items.resize(node_count, FlexItem::default());
    }

    /// Sizing state of a node from the last layout.
    pub fn item(&self, index: NodeIndex) -> Option<&FlexItem> {
        self.items.get(index)
    }

    /// Flex totals of a container from the last layout.
    pub fn flex_box(&self, index: NodeIndex) -> Option<&FlexBox> {
        self.boxes.get(index)
    }

    /// Breadth-first order used by the last layout.
    pub fn order(&self) -> &[NodeIndex] {
        &self.queue
    }
}

fn build_breadth_first(tree: &LayoutTree, queue: &mut Vec<NodeIndex>) {
    queue.clear();
    queue.push(ROOT);
    let mut head = 0;
    while head < queue.len() {
        let n = queue[head];
        head += 1;
        queue.extend(tree.children(n));
    }
}

/// Measure and place every node of the tree.
pub fn compute_subtree_layout(
    tree: &mut LayoutTree,
    resources: &mut ResourceTable<Resource>,
    scratch: &mut LayoutScratch,
    shaper: &mut dyn GlyphShaper,
    tree_id: u64,
) {
    scratch.reset(tree.node_count());
    build_breadth_first(tree, &mut scratch.queue);

    measure::measure_pre_order(tree, scratch);
    measure::measure_post_order(tree, resources, scratch, shaper, tree_id);
    place::place_pre_order(tree, resources, scratch, tree_id);

    tracing::trace!(nodes = tree.node_count(), "layout computed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{NodeKind, ResourceKey, ResourceType, compute_boxes};
    use crate::state::ScrollRegion;
    use crate::style::{Padding, Style};
    use crate::types::{
        AlignItems, Axis, Dimension, Display, FlexDirection, JustifyContent, NodeFlags, Rect,
        TextAlign, Vec2,
    };

    const TREE_ID: u64 = 1;

    struct Fixture {
        tree: LayoutTree,
        resources: ResourceTable<Resource>,
        scratch: LayoutScratch,
        shaper: MonospaceShaper,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tree = LayoutTree::new(64);
            tree.begin_build(Vec2::new(400.0, 300.0));
            Self {
                tree,
                resources: ResourceTable::new(32, 16),
                scratch: LayoutScratch::with_capacity(64),
                shaper: MonospaceShaper::default(),
            }
        }

        fn container(&mut self, style: Style) -> NodeIndex {
            let n = self.tree.create_node(NodeFlags::IS_PARENT).unwrap();
            self.tree.node_mut(n).style = style;
            n
        }

        fn leaf(&mut self, style: Style) -> NodeIndex {
            let n = self.tree.create_node(NodeFlags::NONE).unwrap();
            self.tree.node_mut(n).style = style;
            n
        }

        fn text(&mut self, text: &str, style: Style) -> NodeIndex {
            let n = self
                .tree
                .create_typed_node(NodeKind::Text, NodeFlags::HAS_TEXT, 0)
                .unwrap();
            self.tree.node_mut(n).style = style;
            let key = ResourceKey::for_node(TREE_ID, ResourceType::Text, n);
            let handle = self.resources.find_resource_by_key(key);
            self.resources
                .update_resource_table(handle, key, Resource::Text(TextResource::new(text)));
            n
        }

        fn scroll(&mut self, style: Style) -> NodeIndex {
            let n = self
                .tree
                .create_node(NodeFlags::IS_PARENT | NodeFlags::HAS_SCROLL_REGION)
                .unwrap();
            self.tree.node_mut(n).style = style;
            let key = ResourceKey::for_node(TREE_ID, ResourceType::ScrollRegion, n);
            let handle = self.resources.find_resource_by_key(key);
            self.resources.update_resource_table(
                handle,
                key,
                Resource::Scroll(ScrollRegion::new(Axis::Y, 40.0)),
            );
            n
        }

        fn end(&mut self) {
            self.tree.pop_parent().unwrap();
        }

        fn layout(&mut self) {
            compute_subtree_layout(
                &mut self.tree,
                &mut self.resources,
                &mut self.scratch,
                &mut self.shaper,
                TREE_ID,
            );
        }

        fn outer(&self, n: NodeIndex) -> Rect {
            self.tree.node(n).layout.outer
        }
    }

    fn row(spacing: f32) -> Style {
        Style {
            spacing,
            ..Style::flex(FlexDirection::Row)
        }
    }

    #[test]
    fn test_breadth_first_order() {
        let mut f = Fixture::new();
        let a = f.container(Style::default());
        let a1 = f.leaf(Style::default());
        f.end();
        let b = f.leaf(Style::default());
        f.layout();
        assert_eq!(f.scratch.order(), &[ROOT, a, b, a1]);
    }

    #[test]
    fn test_root_fills_viewport() {
        let mut f = Fixture::new();
        f.layout();
        assert_eq!(f.outer(ROOT), Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn test_normal_flow_stacks_vertically() {
        let mut f = Fixture::new();
        let window = f.container(Style {
            padding: Padding::all(5.0),
            spacing: 4.0,
            ..Style::sized(200.0, 200.0)
        });
        let a = f.leaf(Style::sized(50.0, 20.0));
        let b = f.leaf(Style::sized(60.0, 30.0));
        f.end();
        f.layout();

        assert_eq!(f.outer(window), Rect::new(0.0, 0.0, 200.0, 200.0));
        assert_eq!(f.outer(a), Rect::new(5.0, 5.0, 50.0, 20.0));
        assert_eq!(f.outer(b), Rect::new(5.0, 29.0, 60.0, 30.0));
    }

    #[test]
    fn test_percent_of_parent_content() {
        let mut f = Fixture::new();
        f.container(Style {
            padding: Padding::all(10.0),
            ..Style::sized(220.0, 120.0)
        });
        let half = f.leaf(Style {
            width: Dimension::Percent(50.0),
            height: Dimension::Percent(100.0),
            ..Style::default()
        });
        f.end();
        f.layout();
        assert_eq!(f.outer(half).size, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_flex_row_fixed_items() {
        let mut f = Fixture::new();
        f.container(Style {
            padding: Padding::all(8.0),
            ..Style::sized(200.0, 100.0)
        });
        let r = f.container(row(10.0));
        let a = f.leaf(Style::sized(50.0, 20.0));
        let b = f.leaf(Style::sized(80.0, 20.0));
        f.end();
        f.end();
        f.layout();

        assert_eq!(f.outer(a).pos.x, 8.0);
        assert_eq!(f.outer(b).pos.x, 68.0);
        // Auto-sized row wraps its items.
        assert_eq!(f.outer(r).size.x, 140.0);
    }

    #[test]
    fn test_flex_grow_fills_content() {
        let mut f = Fixture::new();
        f.container(Style {
            width: Dimension::Px(300.0),
            height: Dimension::Px(40.0),
            spacing: 10.0,
            ..Style::flex(FlexDirection::Row)
        });
        let a = f.leaf(Style {
            flex_grow: 1.0,
            ..Style::sized(50.0, 20.0)
        });
        let b = f.leaf(Style {
            flex_grow: 3.0,
            ..Style::sized(50.0, 20.0)
        });
        f.end();
        f.layout();

        // Free space 190 split 1:3.
        assert!((f.outer(a).size.x - 97.5).abs() < 1e-4);
        assert!((f.outer(b).size.x - 192.5).abs() < 1e-4);
        assert!((f.outer(b).pos.x - 107.5).abs() < 1e-4);
    }

    #[test]
    fn test_flex_shrink_by_weight() {
        let mut f = Fixture::new();
        f.container(Style {
            width: Dimension::Px(120.0),
            height: Dimension::Px(40.0),
            ..Style::flex(FlexDirection::Row)
        });
        let a = f.leaf(Style::sized(100.0, 20.0));
        let b = f.leaf(Style::sized(50.0, 20.0));
        f.end();
        f.layout();

        assert!((f.outer(a).size.x - 80.0).abs() < 1e-4);
        assert!((f.outer(b).size.x - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_flex_stretch_cross_axis() {
        let mut f = Fixture::new();
        f.container(Style {
            width: Dimension::Px(100.0),
            height: Dimension::Px(60.0),
            padding: Padding::all(5.0),
            ..Style::flex(FlexDirection::Row)
        });
        let a = f.leaf(Style {
            width: Dimension::Px(20.0),
            ..Style::default()
        });
        f.end();
        f.layout();
        assert_eq!(f.outer(a).size.y, 50.0);
    }

    #[test]
    fn test_flex_justify_center_and_align_center() {
        let mut f = Fixture::new();
        f.container(Style {
            width: Dimension::Px(100.0),
            height: Dimension::Px(50.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..Style::flex(FlexDirection::Row)
        });
        let a = f.leaf(Style::sized(40.0, 10.0));
        f.end();
        f.layout();
        assert_eq!(f.outer(a).pos, Vec2::new(30.0, 20.0));
    }

    #[test]
    fn test_flex_justify_end_and_space_between() {
        let mut f = Fixture::new();
        f.container(Style {
            width: Dimension::Px(100.0),
            height: Dimension::Px(20.0),
            justify_content: JustifyContent::End,
            align_items: AlignItems::End,
            ..Style::flex(FlexDirection::Row)
        });
        let a = f.leaf(Style::sized(30.0, 10.0));
        f.end();
        f.container(Style {
            width: Dimension::Px(100.0),
            height: Dimension::Px(20.0),
            justify_content: JustifyContent::SpaceBetween,
            ..Style::flex(FlexDirection::Row)
        });
        let b1 = f.leaf(Style::sized(20.0, 10.0));
        let b2 = f.leaf(Style::sized(20.0, 10.0));
        f.end();
        f.layout();

        assert_eq!(f.outer(a).pos, Vec2::new(70.0, 10.0));
        assert_eq!(f.outer(b1).pos.x, 0.0);
        assert_eq!(f.outer(b2).pos.x, 80.0);
    }

    #[test]
    fn test_flex_column_direction() {
        let mut f = Fixture::new();
        f.container(Style {
            width: Dimension::Px(100.0),
            height: Dimension::Px(100.0),
            spacing: 5.0,
            ..Style::flex(FlexDirection::Column)
        });
        let a = f.leaf(Style::sized(30.0, 10.0));
        let b = f.leaf(Style::sized(30.0, 20.0));
        f.end();
        f.layout();
        assert_eq!(f.outer(a).pos.y, 0.0);
        assert_eq!(f.outer(b).pos.y, 15.0);
    }

    #[test]
    fn test_auto_text_item_placeholder_fixup() {
        let mut f = Fixture::new();
        let r = f.container(Style {
            width: Dimension::Px(300.0),
            height: Dimension::Px(40.0),
            justify_content: JustifyContent::End,
            ..Style::flex(FlexDirection::Row)
        });
        let t = f.text("abcd", Style::default());
        f.end();
        f.layout();

        // 4 cells of 8 px replace the 10 px placeholder.
        assert_eq!(f.outer(t).size.x, 32.0);
        assert_eq!(f.scratch.flex_box(r).unwrap().total_main, 32.0);
        assert_eq!(f.outer(t).pos.x, 268.0);
    }

    #[test]
    fn test_text_wraps_to_fixed_width() {
        let mut f = Fixture::new();
        let t = f.text(
            "abcdefghij",
            Style {
                width: Dimension::Px(32.0),
                ..Style::default()
            },
        );
        f.layout();
        assert_eq!(f.outer(t).size, Vec2::new(32.0, 48.0));

        let key = ResourceKey::for_node(TREE_ID, ResourceType::Text, t);
        let text = f.resources.peek(key).and_then(Resource::as_text).unwrap();
        assert_eq!(text.wrap_count, 2);
    }

    #[test]
    fn test_text_line_alignment() {
        let mut f = Fixture::new();
        let t = f.text(
            "abcdef",
            Style {
                width: Dimension::Px(40.0),
                text_align: TextAlign::End,
                ..Style::default()
            },
        );
        f.layout();
        let key = ResourceKey::for_node(TREE_ID, ResourceType::Text, t);
        let text = f.resources.peek(key).and_then(Resource::as_text).unwrap();
        assert_eq!(text.lines.len(), 2);
        assert_eq!(text.lines[0].offset_x, 0.0);
        // "abcde" fills 40 exactly, "f" is pushed to the end.
        assert_eq!(text.lines[1].offset_x, 32.0);
    }

    #[test]
    fn test_auto_container_wraps_children() {
        let mut f = Fixture::new();
        let c = f.container(Style {
            padding: Padding::all(2.0),
            border_width: 1.0,
            spacing: 3.0,
            ..Style::default()
        });
        f.leaf(Style::sized(40.0, 10.0));
        f.leaf(Style::sized(60.0, 10.0));
        f.end();
        f.layout();
        assert_eq!(f.outer(c).size, Vec2::new(66.0, 29.0));
    }

    #[test]
    fn test_scroll_region_records_extent() {
        let mut f = Fixture::new();
        let s = f.scroll(Style {
            spacing: 5.0,
            ..Style::sized(100.0, 50.0)
        });
        for _ in 0..3 {
            f.leaf(Style::sized(80.0, 30.0));
        }
        f.end();
        f.layout();

        let key = ResourceKey::for_node(TREE_ID, ResourceType::ScrollRegion, s);
        let region = f.resources.peek(key).and_then(Resource::as_scroll).unwrap();
        assert_eq!(region.content_size, Vec2::new(80.0, 100.0));
        assert_eq!(region.viewport_size, Vec2::new(100.0, 50.0));
        assert_eq!(region.max_scroll(), 50.0);
    }

    #[test]
    fn test_scroll_offset_moves_children_visually() {
        let mut f = Fixture::new();
        let s = f.scroll(Style::sized(100.0, 50.0));
        let a = f.leaf(Style::sized(80.0, 30.0));
        f.leaf(Style::sized(80.0, 30.0));
        f.end();
        f.layout();

        let key = ResourceKey::for_node(TREE_ID, ResourceType::ScrollRegion, s);
        if let Some(Resource::Scroll(region)) = f.resources.get_by_key_mut(key) {
            region.scroll_by(-8.0);
        }
        f.layout();

        let node = f.tree.node(a);
        assert_eq!(node.layout.outer.pos, Vec2::new(0.0, 0.0));
        assert_eq!(node.layout.visual_offset, Vec2::new(0.0, -8.0));
        assert_eq!(node.layout.screen_outer().pos, Vec2::new(0.0, -8.0));
    }

    #[test]
    fn test_drag_offset_accumulates_to_descendants() {
        let mut f = Fixture::new();
        let w = f.container(Style::sized(100.0, 100.0));
        let child = f.leaf(Style::sized(10.0, 10.0));
        f.end();
        f.tree.node_mut(w).interaction.drag_offset = Vec2::new(15.0, 5.0);
        f.layout();
        assert_eq!(f.tree.node(child).layout.visual_offset, Vec2::new(15.0, 5.0));
        assert_eq!(f.tree.node(child).layout.outer.pos, Vec2::ZERO);
    }

    #[test]
    fn test_size_override_replaces_style() {
        let mut f = Fixture::new();
        let w = f.container(Style::sized(100.0, 100.0));
        f.end();
        f.tree.node_mut(w).interaction.size_override.width = Some(140.0);
        f.layout();
        assert_eq!(f.outer(w).size, Vec2::new(140.0, 100.0));
    }

    #[test]
    fn test_boxes_match_compute_boxes() {
        let mut f = Fixture::new();
        let style = Style {
            border_width: 2.0,
            padding: Padding::all(3.0),
            ..Style::sized(50.0, 40.0)
        };
        let n = f.leaf(style.clone());
        f.layout();

        let mut expected = crate::engine::LayoutBox::default();
        compute_boxes(&mut expected, 2.0, &style.padding, 50.0, 40.0);
        assert_eq!(f.tree.node(n).layout.content.size, expected.content.size);
        assert_eq!(f.tree.node(n).layout.content.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_display_normal_ignores_grow() {
        let mut f = Fixture::new();
        f.container(Style {
            display: Display::Normal,
            ..Style::sized(200.0, 100.0)
        });
        let a = f.leaf(Style {
            flex_grow: 1.0,
            ..Style::sized(20.0, 20.0)
        });
        f.end();
        f.layout();
        assert_eq!(f.outer(a).size.x, 20.0);
    }
}
