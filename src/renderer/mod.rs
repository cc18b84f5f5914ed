//! Draw list output.
//!
//! Painting walks the tree parent first, siblings in declaration order, and
//! emits axis-aligned instanced rects. Consecutive rects with the same clip
//! rect and pipeline share a [`DrawBatch`]. The GPU backend consumes the
//! list and knows nothing about the tree.
//!
//! # Emitted rects
//!
//! - one background/border rect per node with a visible fill or border
//! - one textured rect per glyph of text and text input nodes
//! - one textured rect per image node
//!
//! Nodes with `DO_NOT_PAINT` or culled by their scroll region are skipped
//! with their subtree. Scroll regions clip their children to their content
//! box.

use crate::engine::{LayoutTree, NodeIndex, NodeKind, Resource, ResourceKey, ResourceTable, ResourceType, ROOT};
use crate::types::{NodeFlags, Rect, Rgba, Vec2};

/// Shader program a batch is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    /// Solid rounded rects with borders.
    Ui,
    /// Glyphs from the font atlas.
    Text,
    /// Images from the image atlas.
    Image,
}

/// One instanced rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectInstance {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Rgba,
    pub border_color: Rgba,
    pub corner_radius: f32,
    pub border_width: f32,
    pub softness: f32,
    /// Atlas coordinates for textured pipelines.
    pub uv: Option<Rect>,
}

impl RectInstance {
    fn solid(rect: Rect, color: Rgba) -> Self {
        Self {
            pos: rect.pos,
            size: rect.size,
            color,
            border_color: Rgba::TRANSPARENT,
            corner_radius: 0.0,
            border_width: 0.0,
            softness: 0.0,
            uv: None,
        }
    }

    fn textured(rect: Rect, color: Rgba, uv: Rect) -> Self {
        Self {
            uv: Some(uv),
            ..Self::solid(rect, color)
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// A run of instances sharing clip rect and pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawBatch {
    pub clip: Rect,
    pub pipeline: Pipeline,
    pub first: usize,
    pub count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    instances: Vec<RectInstance>,
    batches: Vec<DrawBatch>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    /// Append an instance, extending the last batch when clip and pipeline match.
    pub fn push(&mut self, clip: Rect, pipeline: Pipeline, instance: RectInstance) {
        let first = self.instances.len();
        self.instances.push(instance);
        match self.batches.last_mut() {
            Some(batch) if batch.clip == clip && batch.pipeline == pipeline => batch.count += 1,
            _ => self.batches.push(DrawBatch {
                clip,
                pipeline,
                first,
                count: 1,
            }),
        }
    }

    pub fn instances(&self) -> &[RectInstance] {
        &self.instances
    }

    pub fn batches(&self) -> &[DrawBatch] {
        &self.batches
    }

    /// Instances of one batch.
    pub fn batch_instances(&self, batch: &DrawBatch) -> &[RectInstance] {
        let end = (batch.first + batch.count).min(self.instances.len());
        &self.instances[batch.first.min(end)..end]
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

// =============================================================================
// PAINT
// =============================================================================

#[inline]
fn is_empty_clip(clip: &Rect) -> bool {
    clip.size.x <= 0.0 || clip.size.y <= 0.0
}

/// Clear `draw_list` and fill it from the laid-out tree.
pub fn paint_subtree(
    tree: &LayoutTree,
    resources: &ResourceTable<Resource>,
    tree_id: u64,
    draw_list: &mut DrawList,
) {
    draw_list.clear();
    let viewport = tree.node(ROOT).layout.screen_outer();
    paint_node(tree, resources, tree_id, draw_list, ROOT, viewport);

    tracing::trace!(
        rects = draw_list.len(),
        batches = draw_list.batches().len(),
        "subtree painted"
    );
}

fn paint_node(
    tree: &LayoutTree,
    resources: &ResourceTable<Resource>,
    tree_id: u64,
    draw_list: &mut DrawList,
    n: NodeIndex,
    clip: Rect,
) {
    let node = tree.node(n);
    if !node.is_visible() {
        return;
    }
    let outer = node.layout.screen_outer();
    if !outer.overlaps(&clip) {
        return;
    }

    let style = &node.style;
    let fill = style.background_for(node.interaction.style_state);
    let has_border = style.border_width > 0.0 && !style.border_color.is_transparent();
    if !fill.is_transparent() || has_border {
        draw_list.push(
            clip,
            Pipeline::Ui,
            RectInstance {
                border_color: style.border_color,
                corner_radius: style.corner_radius,
                border_width: style.border_width,
                softness: style.softness,
                ..RectInstance::solid(outer, fill)
            },
        );
    }

    let content = node.layout.screen_content();
    match node.kind {
        NodeKind::Text | NodeKind::TextInput => {
            let key = ResourceKey::for_node(tree_id, ResourceType::Text, n);
            if let Some(text) = resources.peek(key).and_then(Resource::as_text) {
                for (row, line) in text.lines.iter().enumerate() {
                    let mut pen = Vec2::new(
                        content.pos.x + line.offset_x,
                        content.pos.y + row as f32 * text.line_height,
                    );
                    for glyph in text.line_glyphs(line) {
                        if !glyph.line_break && !glyph.size.is_zero() {
                            let rect = Rect::from_pos_size(pen + glyph.offset, glyph.size);
                            draw_list.push(clip, Pipeline::Text, RectInstance::textured(rect, style.text_color, glyph.uv));
                        }
                        pen.x += glyph.advance_x;
                    }
                }
            }
        }
        NodeKind::Image { key } => {
            if let Some(image) = resources.peek(key).and_then(Resource::as_image) {
                draw_list.push(clip, Pipeline::Image, RectInstance::textured(content, Rgba::WHITE, image.uv));
            }
        }
        NodeKind::Container => {}
    }

    let child_clip = if node.has(NodeFlags::HAS_SCROLL_REGION) {
        clip.intersect(&content)
    } else {
        clip
    };
    if is_empty_clip(&child_clip) {
        return;
    }
    for c in tree.children(n) {
        paint_node(tree, resources, tree_id, draw_list, c, child_clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutScratch, MonospaceShaper, TextResource, compute_subtree_layout};
    use crate::state::ScrollRegion;
    use crate::style::Style;
    use crate::types::Axis;

    const TREE_ID: u64 = 2;
    const RED: Rgba = Rgba::rgb(255, 0, 0);

    struct Fixture {
        tree: LayoutTree,
        resources: ResourceTable<Resource>,
        draw_list: DrawList,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tree = LayoutTree::new(32);
            tree.begin_build(Vec2::new(300.0, 300.0));
            Self {
                tree,
                resources: ResourceTable::new(16, 16),
                draw_list: DrawList::new(),
            }
        }

        fn node(&mut self, flags: NodeFlags, style: Style) -> NodeIndex {
            let n = self.tree.create_node(flags).unwrap();
            self.tree.node_mut(n).style = style;
            n
        }

        fn text(&mut self, text: &str) -> NodeIndex {
            let n = self
                .tree
                .create_typed_node(NodeKind::Text, NodeFlags::HAS_TEXT, 0)
                .unwrap();
            let key = ResourceKey::for_node(TREE_ID, ResourceType::Text, n);
            let handle = self.resources.find_resource_by_key(key);
            self.resources.update_resource_table(handle, key, Resource::Text(TextResource::new(text)));
            n
        }

        fn scroll(&mut self, style: Style) -> NodeIndex {
            let n = self.node(NodeFlags::IS_PARENT | NodeFlags::HAS_SCROLL_REGION, style);
            let key = ResourceKey::for_node(TREE_ID, ResourceType::ScrollRegion, n);
            let handle = self.resources.find_resource_by_key(key);
            self.resources
                .update_resource_table(handle, key, Resource::Scroll(ScrollRegion::new(Axis::Y, 40.0)));
            n
        }

        fn paint(&mut self) {
            let mut scratch = LayoutScratch::with_capacity(32);
            compute_subtree_layout(
                &mut self.tree,
                &mut self.resources,
                &mut scratch,
                &mut MonospaceShaper::default(),
                TREE_ID,
            );
            paint_subtree(&self.tree, &self.resources, TREE_ID, &mut self.draw_list);
        }
    }

    fn filled(w: f32, h: f32) -> Style {
        Style {
            background: RED,
            ..Style::sized(w, h)
        }
    }

    #[test]
    fn test_push_merges_batches() {
        let mut list = DrawList::new();
        let clip = Rect::new(0.0, 0.0, 10.0, 10.0);
        let rect = RectInstance::solid(Rect::new(0.0, 0.0, 1.0, 1.0), RED);
        list.push(clip, Pipeline::Ui, rect);
        list.push(clip, Pipeline::Ui, rect);
        list.push(clip, Pipeline::Text, rect);
        list.push(Rect::new(0.0, 0.0, 5.0, 5.0), Pipeline::Text, rect);

        assert_eq!(list.len(), 4);
        let counts: Vec<usize> = list.batches().iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);
        assert_eq!(list.batch_instances(&list.batches()[1]).len(), 1);
    }

    #[test]
    fn test_transparent_nodes_emit_nothing() {
        let mut f = Fixture::new();
        f.node(NodeFlags::NONE, Style::sized(20.0, 20.0));
        f.paint();
        assert!(f.draw_list.is_empty());
    }

    #[test]
    fn test_background_and_glyphs() {
        let mut f = Fixture::new();
        f.node(NodeFlags::IS_PARENT, filled(100.0, 50.0));
        f.text("hi");
        f.tree.pop_parent().unwrap();
        f.paint();

        let instances = f.draw_list.instances();
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].rect(), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(instances[1].rect(), Rect::new(0.0, 0.0, 8.0, 16.0));
        assert_eq!(instances[2].rect(), Rect::new(8.0, 0.0, 8.0, 16.0));
        assert!(instances[1].uv.is_some());

        let pipelines: Vec<Pipeline> = f.draw_list.batches().iter().map(|b| b.pipeline).collect();
        assert_eq!(pipelines, vec![Pipeline::Ui, Pipeline::Text]);
    }

    #[test]
    fn test_hidden_subtree_skipped() {
        let mut f = Fixture::new();
        f.node(NodeFlags::IS_PARENT | NodeFlags::DO_NOT_PAINT, filled(100.0, 50.0));
        f.node(NodeFlags::NONE, filled(10.0, 10.0));
        f.tree.pop_parent().unwrap();
        f.paint();
        assert!(f.draw_list.is_empty());
    }

    #[test]
    fn test_scroll_region_clips_children() {
        let mut f = Fixture::new();
        f.scroll(Style::sized(100.0, 40.0));
        f.node(NodeFlags::NONE, filled(100.0, 30.0));
        f.node(NodeFlags::NONE, filled(100.0, 30.0));
        f.node(NodeFlags::NONE, filled(100.0, 30.0));
        f.tree.pop_parent().unwrap();
        f.paint();

        // The third row starts at y=60, past the 40 tall viewport.
        assert_eq!(f.draw_list.len(), 2);
        let batch = f.draw_list.batches()[0];
        assert_eq!(batch.clip, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(batch.count, 2);
    }

    #[test]
    fn test_border_only_node_painted() {
        let mut f = Fixture::new();
        f.node(
            NodeFlags::NONE,
            Style {
                border_width: 2.0,
                border_color: Rgba::WHITE,
                corner_radius: 4.0,
                ..Style::sized(20.0, 20.0)
            },
        );
        f.paint();
        let rect = f.draw_list.instances()[0];
        assert_eq!(rect.border_width, 2.0);
        assert_eq!(rect.corner_radius, 4.0);
        assert!(rect.color.is_transparent());
    }
}
