//! Primitives - Declaration building blocks.
//!
//! Every primitive is a method on [`Frame`] and declares one node inside
//! the currently open container:
//! - containers: [`container`](Frame::container), [`row`](Frame::row),
//!   [`column`](Frame::column), [`window`](Frame::window),
//!   [`scroll_region`](Frame::scroll_region), closed with [`end`](Frame::end)
//! - text: [`label`](Frame::label), [`button`](Frame::button)
//! - input: [`text_input`](Frame::text_input)
//! - images: [`image`](Frame::image)
//!
//! # Identity
//!
//! Node indices follow declaration order, so an unchanged UI gets the same
//! indices every frame and keeps its drag offsets, sizes and scroll state.
//! Primitives taking an `id` also register it in the identity table and
//! mix it into the slot identity: a slot re-declared under another id starts
//! from fresh state.
//!
//! ```ignore
//! let mut frame = subtree.begin_frame(Vec2::new(800.0, 600.0));
//! frame.window("main", Style::sized(300.0, 200.0))?;
//! if frame.button("ok", "OK", Style::default())?.clicked {
//!     // last frame's click
//! }
//! frame.end()?;
//! let output = frame.finish(&input);
//! ```

mod container;
mod image;
mod input;
mod text;

use crate::engine::{NodeIndex, NodeKind, Resource, ResourceKey, ResourceType, hash_name};
use crate::layout::TextResource;
use crate::error::{EngineError, Result};
use crate::pipeline::Frame;
use crate::style::Style;
use crate::types::NodeFlags;

/// Interaction summary of a declared node, from the last completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub node: NodeIndex,
    pub clicked: bool,
    pub hovered: bool,
    pub focused: bool,
}

impl<'a> Frame<'a> {
    /// Declare a node with an explicit kind, flags, identity and style.
    pub fn declare(&mut self, kind: NodeKind, flags: NodeFlags, id: Option<&str>, style: Style) -> Result<NodeIndex> {
        let id_hash = id.map(hash_name).unwrap_or(0);
        let s = &mut *self.subtree;
        // Fail before the node is linked or its container opened.
        if id.is_some() && !s.node_ids.can_insert_hash(id_hash) {
            let capacity = s.node_ids.capacity();
            tracing::warn!(capacity, "node id table full, node dropped");
            return Err(EngineError::NodeIdTableFull { capacity });
        }
        let n = s.tree.create_typed_node(kind, flags, id_hash)?;
        s.tree.node_mut(n).style = style;
        if let Some(id) = id {
            s.node_ids.set_node_id(id, n)?;
        }
        Ok(n)
    }

    /// Register `id` for an already declared node.
    pub fn set_node_id(&mut self, id: &str, node: NodeIndex) -> Result<()> {
        self.subtree.tree.get(node)?;
        self.subtree.node_ids.set_node_id(id, node)
    }

    /// Whether `node` was declared in the same slot last frame.
    fn is_carried_over(&self, node: NodeIndex) -> bool {
        !self.subtree.tree.node(node).reclaimed
    }

    /// What happened to `node` in the last completed frame.
    pub fn response(&self, node: NodeIndex) -> Response {
        let s = &*self.subtree;
        if !self.is_carried_over(node) {
            return Response {
                node,
                clicked: false,
                hovered: false,
                focused: false,
            };
        }
        Response {
            node,
            clicked: s.events.clicked(node),
            hovered: s.focus.hovered() == Some(node),
            focused: s.focus.is_focused(node),
        }
    }

    /// Store `text` as the node's text resource, creating it on first use.
    fn sync_text(&mut self, node: NodeIndex, text: &str) {
        let s = &mut *self.subtree;
        let key = ResourceKey::for_node(s.tree_id, ResourceType::Text, node);
        let handle = s.resources.find_resource_by_key(key);
        match s.resources.get_mut(handle).and_then(Resource::as_text_mut) {
            Some(existing) => existing.set_text(text),
            None => {
                s.resources
                    .update_resource_table(handle, key, Resource::Text(TextResource::new(text)));
            }
        }
    }
}
