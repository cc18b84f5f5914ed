//! Event application.
//!
//! Events are applied after generation, in list order, against the layout
//! from the previous frame. Layout runs afterwards and sees the result.

use crate::engine::{LayoutTree, NodeIndex, Resource, ResourceKey, ResourceTable, ResourceType};
use crate::style::StyleState;
use crate::types::{NodeFlags, Vec2};

use super::events::{EventKind, EventList};
use super::focus::{FocusState, Intent};
use super::input::{InputSnapshot, KeyCode};
use super::scroll::scroll_with_chaining;

/// An edit made to a text input's resource that the caller's buffer still
/// has to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    Insert(String),
    Backspace,
}

impl TextEdit {
    pub fn apply_to(&self, buffer: &mut String) {
        match self {
            Self::Insert(text) => buffer.push_str(text),
            Self::Backspace => {
                buffer.pop();
            }
        }
    }
}

/// Apply every event in `events` to the tree and its resources.
pub fn apply_events(
    tree: &mut LayoutTree,
    resources: &mut ResourceTable<Resource>,
    tree_id: u64,
    events: &EventList,
) {
    for event in events {
        let n = event.node;
        if !tree.is_valid(n) {
            continue;
        }
        match &event.kind {
            EventKind::Resize { delta } => apply_resize(tree, n, *delta),
            EventKind::Drag { delta } => {
                tree.node_mut(n).interaction.drag_offset += *delta;
            }
            EventKind::Scroll { delta } => {
                scroll_with_chaining(tree, resources, tree_id, n, *delta);
            }
            EventKind::Key(KeyCode::Backspace) => {
                edit_text(tree, resources, tree_id, n, TextEdit::Backspace);
            }
            EventKind::TextInput(text) => {
                edit_text(tree, resources, tree_id, n, TextEdit::Insert(text.clone()));
            }
            EventKind::Hover | EventKind::Click | EventKind::Key(_) => {}
        }
    }
}

/// Grow or shrink the outer size on the axes `delta` moves. The size never
/// drops below the node's border and padding.
fn apply_resize(tree: &mut LayoutTree, n: NodeIndex, delta: Vec2) {
    let node = tree.node_mut(n);
    let border = 2.0 * node.style.border_width.max(0.0);
    let min = Vec2::new(
        border + node.style.padding.horizontal(),
        border + node.style.padding.vertical(),
    );
    let current = node.layout.outer.size;
    let over = &mut node.interaction.size_override;
    if delta.x != 0.0 {
        let base = over.width.unwrap_or(current.x);
        over.width = Some((base + delta.x).max(min.x));
    }
    if delta.y != 0.0 {
        let base = over.height.unwrap_or(current.y);
        over.height = Some((base + delta.y).max(min.y));
    }
}

fn edit_text(
    tree: &LayoutTree,
    resources: &mut ResourceTable<Resource>,
    tree_id: u64,
    n: NodeIndex,
    edit: TextEdit,
) {
    if !tree.node(n).has(NodeFlags::HAS_TEXT_INPUT) {
        return;
    }
    let key = ResourceKey::for_node(tree_id, ResourceType::Text, n);
    let Some(text) = resources.get_by_key_mut(key).and_then(Resource::as_text_mut) else {
        tracing::warn!(node = n, "text input has no text resource");
        return;
    };
    let mut content = std::mem::take(&mut text.text);
    edit.apply_to(&mut content);
    text.text = content;
    text.dirty = true;
    text.pending_edits.push(edit);
}

/// Recompute hover/focus/press bits for every node from the focus state.
pub fn apply_style_states(tree: &mut LayoutTree, focus: &FocusState, input: &InputSnapshot) {
    for n in 0..tree.node_count() {
        let mut state = StyleState::NONE;
        if focus.hovered() == Some(n) {
            state |= StyleState::HOVERED;
        }
        if focus.is_focused(n) {
            state |= StyleState::FOCUSED;
            if input.left_down && focus.intent() == Intent::Click {
                state |= StyleState::PRESSED;
            }
        }
        tree.node_mut(n).interaction.style_state = state;
    }
}
