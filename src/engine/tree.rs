//! Layout Tree - Fixed-capacity node arena with a construction parent stack.
//!
//! The tree is re-declared every frame: [`LayoutTree::begin_build`] truncates
//! it back to the root and each `create_*` call appends the next index inside
//! the container on top of the parent stack. Slots are reused, so a UI that
//! declares the same nodes in the same order keeps the same indices, the
//! previous frame's boxes (used for hit-testing before layout runs again) and
//! the persistent interaction state (drag offset, resize override, culling).

use std::mem::discriminant;

use crate::error::{EngineError, Result};
use crate::style::{Style, StyleState};
use crate::types::{NodeFlags, Vec2};

use super::box_model::LayoutBox;
use super::resource::ResourceKey;

/// Stable integer handle of a node inside one tree.
pub type NodeIndex = usize;

/// The root node, created once with the tree.
pub const ROOT: NodeIndex = 0;

// =============================================================================
// Node
// =============================================================================

/// What a node is. Kind-specific data lives in the resource cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    /// Windows, rows, columns, scroll regions.
    #[default]
    Container,
    /// Static shaped text (labels, button captions).
    Text,
    /// Editable text bound to a caller buffer.
    TextInput,
    /// An atlas image registered under a global name.
    Image { key: ResourceKey },
}

/// Per-axis size written by resize interaction. Replaces the style size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeOverride {
    pub width: Option<f32>,
    pub height: Option<f32>,
}

/// Interaction state that survives re-declaration of the same node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeInteraction {
    /// Accumulated drag displacement.
    pub drag_offset: Vec2,
    pub size_override: SizeOverride,
    pub style_state: StyleState,
    /// Scrolled out of its region's viewport.
    pub culled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub parent: Option<NodeIndex>,
    pub first_child: Option<NodeIndex>,
    pub last_child: Option<NodeIndex>,
    pub next_sibling: Option<NodeIndex>,
    pub prev_sibling: Option<NodeIndex>,
    pub child_count: usize,

    pub flags: NodeFlags,
    pub kind: NodeKind,
    /// Hash of the caller id, 0 for anonymous nodes.
    pub id_hash: u64,
    pub style: Style,
    pub layout: LayoutBox,
    pub interaction: NodeInteraction,
    /// Set when this slot was claimed by a different identity this frame.
    pub reclaimed: bool,
}

impl LayoutNode {
    fn new(kind: NodeKind, flags: NodeFlags, id_hash: u64) -> Self {
        Self {
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
            child_count: 0,
            flags,
            kind,
            id_hash,
            style: Style::default(),
            layout: LayoutBox::default(),
            interaction: NodeInteraction::default(),
            reclaimed: true,
        }
    }

    #[inline]
    pub fn has(&self, flag: NodeFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Drawn and hit-testable this frame. Culled nodes count as do-not-paint.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.flags.contains(NodeFlags::DO_NOT_PAINT) && !self.interaction.culled
    }

    fn clear_links(&mut self) {
        self.parent = None;
        self.first_child = None;
        self.last_child = None;
        self.next_sibling = None;
        self.prev_sibling = None;
        self.child_count = 0;
    }
}

// =============================================================================
// Tree
// =============================================================================

#[derive(Debug, Clone)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
    count: usize,
    capacity: usize,
    parent_stack: Vec<NodeIndex>,
}

impl LayoutTree {
    /// Create a tree with room for `capacity` nodes, root included.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(LayoutNode::new(NodeKind::Container, NodeFlags::IS_PARENT, 0));
        let mut parent_stack = Vec::with_capacity(capacity);
        parent_stack.push(ROOT);
        Self {
            nodes,
            count: 1,
            capacity,
            parent_stack,
        }
    }

    /// Start declaring a new frame. Everything but the root is detached.
    pub fn begin_build(&mut self, viewport: Vec2) {
        self.count = 1;
        self.parent_stack.clear();
        self.parent_stack.push(ROOT);

        let root = &mut self.nodes[ROOT];
        root.clear_links();
        root.reclaimed = false;
        root.style = Style::sized(viewport.x, viewport.y);
    }

    /// Append an anonymous container inside the current parent.
    pub fn create_node(&mut self, flags: NodeFlags) -> Result<NodeIndex> {
        self.create_typed_node(NodeKind::Container, flags, 0)
    }

    /// Append a node inside the current parent.
    ///
    /// With [`NodeFlags::IS_PARENT`] the new node is pushed onto the parent
    /// stack, so later nodes become its children until [`pop_parent`].
    /// At capacity nothing is modified and `TreeFull` is returned.
    ///
    /// [`pop_parent`]: LayoutTree::pop_parent
    pub fn create_typed_node(&mut self, kind: NodeKind, flags: NodeFlags, id_hash: u64) -> Result<NodeIndex> {
        if self.count >= self.capacity {
            tracing::warn!(capacity = self.capacity, "layout tree full, node dropped");
            return Err(EngineError::TreeFull {
                capacity: self.capacity,
            });
        }

        let index = self.count;
        if index == self.nodes.len() {
            self.nodes.push(LayoutNode::new(kind, flags, id_hash));
        } else {
            let node = &mut self.nodes[index];
            let same_identity = node.id_hash == id_hash && discriminant(&node.kind) == discriminant(&kind);
            if same_identity {
                node.reclaimed = false;
            } else {
                node.interaction = NodeInteraction::default();
                node.layout = LayoutBox::default();
                node.reclaimed = true;
            }
            node.clear_links();
            node.kind = kind;
            node.flags = flags;
            node.id_hash = id_hash;
            node.style = Style::default();
        }
        self.count += 1;

        let parent = self.current_parent();
        self.link_child(parent, index);

        if flags.contains(NodeFlags::IS_PARENT) {
            self.parent_stack.push(index);
        }
        Ok(index)
    }

    fn link_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let prev = self.nodes[parent].last_child;
        {
            let node = &mut self.nodes[child];
            node.parent = Some(parent);
            node.prev_sibling = prev;
        }
        match prev {
            Some(prev) => self.nodes[prev].next_sibling = Some(child),
            None => self.nodes[parent].first_child = Some(child),
        }
        let p = &mut self.nodes[parent];
        p.last_child = Some(child);
        p.child_count += 1;
    }

    /// Close the innermost open container.
    pub fn pop_parent(&mut self) -> Result<NodeIndex> {
        // The root stays at the bottom of the stack.
        if self.parent_stack.len() <= 1 {
            return Err(EngineError::ParentStackUnderflow);
        }
        self.parent_stack.pop().ok_or(EngineError::ParentStackUnderflow)
    }

    /// Container new nodes are attached to.
    #[inline]
    pub fn current_parent(&self) -> NodeIndex {
        self.parent_stack.last().copied().unwrap_or(ROOT)
    }

    /// Depth of open containers, root excluded.
    pub fn open_containers(&self) -> usize {
        self.parent_stack.len().saturating_sub(1)
    }

    /// Nodes declared this frame, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_valid(&self, index: NodeIndex) -> bool {
        index < self.count
    }

    /// Unchecked access for engine passes.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &LayoutNode {
        debug_assert!(index < self.count, "node {index} out of range ({})", self.count);
        &self.nodes[index]
    }

    #[inline]
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut LayoutNode {
        debug_assert!(index < self.count, "node {index} out of range ({})", self.count);
        &mut self.nodes[index]
    }

    /// Checked access.
    pub fn get(&self, index: NodeIndex) -> Result<&LayoutNode> {
        if index < self.count {
            Ok(&self.nodes[index])
        } else {
            Err(EngineError::InvalidNode {
                index,
                count: self.count,
            })
        }
    }

    pub fn get_mut(&mut self, index: NodeIndex) -> Result<&mut LayoutNode> {
        if index < self.count {
            Ok(&mut self.nodes[index])
        } else {
            Err(EngineError::InvalidNode {
                index,
                count: self.count,
            })
        }
    }

    /// Children front-to-back (declaration order).
    pub fn children(&self, index: NodeIndex) -> Children<'_> {
        Children {
            tree: self,
            next: self.node(index).first_child,
            reverse: false,
        }
    }

    /// Children back-to-front (topmost first).
    pub fn children_rev(&self, index: NodeIndex) -> Children<'_> {
        Children {
            tree: self,
            next: self.node(index).last_child,
            reverse: true,
        }
    }

    /// `index` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(index),
        }
    }

    /// Drop all nodes and persistent state. Only the root remains.
    pub fn reset(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT] = LayoutNode::new(NodeKind::Container, NodeFlags::IS_PARENT, 0);
        self.count = 1;
        self.parent_stack.clear();
        self.parent_stack.push(ROOT);
    }
}

pub struct Children<'a> {
    tree: &'a LayoutTree,
    next: Option<NodeIndex>,
    reverse: bool,
}

impl Iterator for Children<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.next?;
        let node = self.tree.node(current);
        self.next = if self.reverse {
            node.prev_sibling
        } else {
            node.next_sibling
        };
        Some(current)
    }
}

pub struct Ancestors<'a> {
    tree: &'a LayoutTree,
    next: Option<NodeIndex>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.next?;
        self.next = self.tree.node(current).parent;
        Some(current)
    }
}
