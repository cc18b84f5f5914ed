//! Frame Pipeline
//!
//! A [`Subtree`] owns one independently laid-out tree and everything that
//! persists with it: node arena, resource cache, identity table, focus slot.
//! It is the explicit context every declaration goes through.
//!
//! # Frame Lifecycle
//!
//! ```text
//! begin_frame ─▶ declare nodes (primitives) ─▶ finish(input)
//!                                                   │
//!                  update_subtree_state ◀───────────┘  events, focus, apply
//!                  compute_subtree_layout               measure ×2, place
//!                  paint_subtree                        draw list
//! ```
//!
//! Event application runs against the boxes of the previous frame, which
//! still sit in the node slots the new declaration reused. Layout then sees
//! the applied drags, resizes and scroll offsets in the same frame.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::EngineConfig;
use crate::engine::{
    CacheStats, ImageResource, LayoutNode, LayoutTree, NodeIdTable, NodeIndex, Resource,
    ResourceKey, ResourceTable, ResourceType,
};
use crate::error::{EngineError, Result};
use crate::layout::{GlyphShaper, LayoutScratch, MonospaceShaper, compute_subtree_layout};
use crate::renderer::{DrawList, paint_subtree};
use crate::state::{EventList, FocusState, InputSnapshot, ScrollRegion, update_subtree_state};
use crate::types::{Rect, Vec2};

/// Distinguishes the node-scoped resource keys of different subtrees.
static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// Subtree
// =============================================================================

pub struct Subtree {
    pub(crate) config: EngineConfig,
    pub(crate) tree: LayoutTree,
    pub(crate) resources: ResourceTable<Resource>,
    pub(crate) node_ids: NodeIdTable,
    pub(crate) focus: FocusState,
    pub(crate) events: EventList,
    scratch: LayoutScratch,
    draw_list: DrawList,
    shaper: Box<dyn GlyphShaper>,
    pub(crate) tree_id: u64,
    frame_count: u64,
}

impl Subtree {
    /// Create a subtree shaping text with [`MonospaceShaper`].
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_shaper(config, Box::new(MonospaceShaper::default()))
    }

    pub fn with_shaper(config: EngineConfig, shaper: Box<dyn GlyphShaper>) -> Result<Self> {
        config.validate()?;
        let tree_id = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            tree_id,
            nodes = config.node_capacity,
            slots = config.resource_slots,
            "subtree created"
        );
        Ok(Self {
            tree: LayoutTree::new(config.node_capacity),
            resources: ResourceTable::new(config.resource_slots, config.resource_buckets),
            node_ids: NodeIdTable::new(config.node_id_groups),
            focus: FocusState::new(),
            events: EventList::new(config.event_capacity),
            scratch: LayoutScratch::with_capacity(config.node_capacity),
            draw_list: DrawList::new(),
            shaper,
            tree_id,
            frame_count: 0,
            config,
        })
    }

    /// Start declaring a frame for a viewport of `viewport` pixels.
    ///
    /// Node ids are re-registered by this frame's declarations.
    pub fn begin_frame(&mut self, viewport: Vec2) -> Frame<'_> {
        self.tree.begin_build(viewport);
        self.node_ids.clear();
        Frame { subtree: self }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tree_id(&self) -> u64 {
        self.tree_id
    }

    /// Frames completed with [`Frame::finish`].
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn node(&self, index: NodeIndex) -> Result<&LayoutNode> {
        self.tree.get(index)
    }

    /// Node registered under `id` in the current frame.
    pub fn find_node_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.node_ids.find_node_by_id(id)
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    /// Events of the last completed frame.
    pub fn events(&self) -> &EventList {
        &self.events
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn resources(&self) -> &ResourceTable<Resource> {
        &self.resources
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.resources.stats()
    }

    /// Scroll state of a scroll-region node.
    pub fn scroll_region(&self, node: NodeIndex) -> Result<&ScrollRegion> {
        let key = ResourceKey::for_node(self.tree_id, ResourceType::ScrollRegion, node);
        self.resources
            .peek(key)
            .and_then(Resource::as_scroll)
            .ok_or(EngineError::MissingResource {
                node,
                kind: ResourceType::ScrollRegion,
            })
    }

    /// Current text of a text or text input node.
    pub fn text(&self, node: NodeIndex) -> Result<&str> {
        let key = ResourceKey::for_node(self.tree_id, ResourceType::Text, node);
        self.resources
            .peek(key)
            .and_then(Resource::as_text)
            .map(|t| t.text.as_str())
            .ok_or(EngineError::MissingResource {
                node,
                kind: ResourceType::Text,
            })
    }

    /// Register an atlas image under `name` for [`Frame::image`].
    ///
    /// Images live in the resource cache and can be evicted like any other
    /// entry. Reload after [`EngineError::ImageNotLoaded`].
    pub fn load_image(&mut self, name: &str, size: Vec2, uv: Rect) {
        let key = ResourceKey::global(name, ResourceType::Image);
        let handle = self.resources.find_resource_by_key(key);
        self.resources
            .update_resource_table(handle, key, Resource::Image(ImageResource { size, uv }));
        tracing::debug!(name, "image loaded");
    }

    /// Drop every node, resource, id and interaction state.
    pub fn teardown(&mut self) {
        self.tree.reset();
        self.resources.clear();
        self.node_ids.clear();
        self.focus.reset();
        self.events.clear();
        self.draw_list.clear();
        tracing::debug!(tree_id = self.tree_id, "subtree torn down");
    }
}

// =============================================================================
// Frame
// =============================================================================

/// Declaration scope of one frame. Primitives are methods on this type.
pub struct Frame<'a> {
    pub(crate) subtree: &'a mut Subtree,
}

/// What a completed frame hands to the renderer and the caller.
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput<'a> {
    pub draw_list: &'a DrawList,
    pub events: &'a EventList,
}

impl<'a> Frame<'a> {
    pub fn subtree(&self) -> &Subtree {
        self.subtree
    }

    /// Finish declaring: run events against `input`, lay out and paint.
    pub fn finish(self, input: &InputSnapshot) -> FrameOutput<'a> {
        let s = self.subtree;

        let open = s.tree.open_containers();
        if open > 0 {
            tracing::warn!(open, "frame ended with open containers");
        }

        update_subtree_state(
            &mut s.tree,
            &mut s.resources,
            &mut s.focus,
            &mut s.events,
            input,
            s.config.resize_border,
            s.tree_id,
        );
        compute_subtree_layout(
            &mut s.tree,
            &mut s.resources,
            &mut s.scratch,
            s.shaper.as_mut(),
            s.tree_id,
        );
        paint_subtree(&s.tree, &s.resources, s.tree_id, &mut s.draw_list);
        s.frame_count += 1;

        tracing::trace!(
            frame = s.frame_count,
            nodes = s.tree.node_count(),
            events = s.events.len(),
            "frame ended"
        );

        let s: &'a Subtree = s;
        FrameOutput {
            draw_list: &s.draw_list,
            events: &s.events,
        }
    }
}
