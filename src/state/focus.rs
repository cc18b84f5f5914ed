//! Focus System - Hover, focus and interaction intent
//!
//! One focus slot per subtree:
//!
//! ```text
//! Unfocused ──press over node──▶ Focused(intent) ──release / click outside──▶ Unfocused
//! ```
//!
//! While unfocused, every frame hit-tests the pointer to find the hovered
//! node. A left press promotes the hovered node (or the ancestor that owns
//! the interaction) to focus with an [`Intent`]. While focused, hit-testing
//! is skipped and events come straight from pointer deltas, button edges
//! and the replayed key/text queues.

use crate::engine::{LayoutTree, NodeIndex, Resource, ResourceKey, ResourceTable, ResourceType, ROOT};
use crate::error::Result;
use crate::types::{NodeFlags, Rect, Vec2};

use super::events::{EventKind, EventList};
use super::input::{InputSnapshot, KeyCode};
use super::scroll::scroll_ancestor;

// =============================================================================
// INTENT
// =============================================================================

/// What the focused node is doing with the pointer and keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    #[default]
    None,
    Drag,
    ResizeX,
    ResizeY,
    ResizeXY,
    Click,
    Scroll,
    EditText,
}

impl Intent {
    pub fn is_resize(self) -> bool {
        matches!(self, Self::ResizeX | Self::ResizeY | Self::ResizeXY)
    }

    /// Keep only the axes this resize intent changes.
    fn resize_mask(self, delta: Vec2) -> Vec2 {
        match self {
            Self::ResizeX => Vec2::new(delta.x, 0.0),
            Self::ResizeY => Vec2::new(0.0, delta.y),
            Self::ResizeXY => delta,
            _ => Vec2::ZERO,
        }
    }
}

// =============================================================================
// FOCUS STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    hovered: Option<NodeIndex>,
    focused: Option<NodeIndex>,
    intent: Intent,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<NodeIndex> {
        self.hovered
    }

    pub fn focused(&self) -> Option<NodeIndex> {
        self.focused
    }

    /// Intent of the focused node. `Intent::None` when nothing is focused.
    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn has_focus(&self) -> bool {
        self.focused.is_some()
    }

    pub fn is_focused(&self, node: NodeIndex) -> bool {
        self.focused == Some(node)
    }

    pub fn focus(&mut self, node: NodeIndex, intent: Intent) {
        tracing::debug!(node, intent = ?intent, "focus gained");
        self.focused = Some(node);
        self.intent = intent;
    }

    pub fn release(&mut self) {
        if let Some(node) = self.focused.take() {
            tracing::debug!(node, intent = ?self.intent, "focus released");
        }
        self.intent = Intent::None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Drop references to nodes that were not re-declared, or were
    /// re-declared as something else.
    fn forget_stale(&mut self, tree: &LayoutTree) {
        let stale = |n: NodeIndex| !tree.is_valid(n) || tree.node(n).reclaimed;
        if self.hovered.is_some_and(stale) {
            self.hovered = None;
        }
        if self.focused.is_some_and(stale) {
            self.release();
        }
    }
}

// =============================================================================
// HIT TESTING
// =============================================================================

/// Signed distance from `point` to a rounded rect. Negative inside.
pub fn rounded_rect_sdf(point: Vec2, rect: Rect, radius: f32) -> f32 {
    let half = Vec2::new(rect.size.x * 0.5, rect.size.y * 0.5);
    let r = radius.clamp(0.0, half.x.min(half.y));
    let p = (point - rect.center()).abs();
    let q = p - half + Vec2::new(r, r);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - r
}

#[inline]
fn inside(point: Vec2, rect: Rect) -> bool {
    rounded_rect_sdf(point, rect, 0.0) <= 0.0
}

/// Deepest visible node under `point`, later siblings first. The root itself
/// never counts as hovered.
pub fn hit_test(tree: &LayoutTree, point: Vec2) -> Option<NodeIndex> {
    hit_node(tree, ROOT, point).filter(|&n| n != ROOT)
}

fn hit_node(tree: &LayoutTree, n: NodeIndex, point: Vec2) -> Option<NodeIndex> {
    let node = tree.node(n);
    if !node.is_visible() || !inside(point, node.layout.screen_outer()) {
        return None;
    }
    // Scroll regions clip their children to the content box.
    let clipped = node.has(NodeFlags::HAS_SCROLL_REGION)
        && !inside(point, node.layout.screen_content());
    if !clipped {
        for c in tree.children_rev(n) {
            if let Some(hit) = hit_node(tree, c, point) {
                return Some(hit);
            }
        }
    }
    Some(n)
}

/// Resize intent when `point` is in the grab band of `n`'s right or bottom
/// outer edge.
fn resize_intent(tree: &LayoutTree, n: NodeIndex, point: Vec2, band: f32) -> Option<Intent> {
    let node = tree.node(n);
    if !node.has(NodeFlags::RESIZABLE) {
        return None;
    }
    let outer = node.layout.screen_outer();
    if !inside(point, outer) {
        return None;
    }
    let max = outer.max();
    let right = point.x >= max.x - band;
    let bottom = point.y >= max.y - band;
    match (right, bottom) {
        (true, true) => Some(Intent::ResizeXY),
        (true, false) => Some(Intent::ResizeX),
        (false, true) => Some(Intent::ResizeY),
        (false, false) => None,
    }
}

/// Pick the node and intent a press over `hovered` starts.
///
/// A resize band anywhere up the ancestor chain wins. Otherwise the deepest
/// node with a capability wins, in the order drag, click or text edit,
/// scroll. With no capability the hovered node takes focus with
/// `Intent::None`.
pub fn select_intent(
    tree: &LayoutTree,
    hovered: NodeIndex,
    point: Vec2,
    resize_border: f32,
) -> (NodeIndex, Intent) {
    for a in tree.ancestors(hovered) {
        if let Some(intent) = resize_intent(tree, a, point, resize_border) {
            return (a, intent);
        }
    }
    for a in tree.ancestors(hovered) {
        let node = tree.node(a);
        let intent = if node.has(NodeFlags::DRAGGABLE) {
            Intent::Drag
        } else if node.has(NodeFlags::CLICKABLE) {
            Intent::Click
        } else if node.has(NodeFlags::HAS_TEXT_INPUT) {
            Intent::EditText
        } else if node.has(NodeFlags::HAS_SCROLL_REGION) {
            Intent::Scroll
        } else {
            continue;
        };
        return (a, intent);
    }
    (hovered, Intent::None)
}

// =============================================================================
// EVENT GENERATION
// =============================================================================

/// Advance the focus state machine by one frame and append its events.
pub fn generate_events(
    focus: &mut FocusState,
    tree: &LayoutTree,
    resources: &ResourceTable<Resource>,
    tree_id: u64,
    input: &InputSnapshot,
    resize_border: f32,
    events: &mut EventList,
) -> Result<()> {
    focus.forget_stale(tree);

    if let Some(node) = focus.focused {
        let outside = !inside(input.pointer, tree.node(node).layout.screen_outer());
        if input.left_pressed && outside {
            // Click-outside: release, then hover and promote below.
            focus.release();
        } else {
            focused_events(focus, node, tree, resources, tree_id, input, events)?;
            if focus.has_focus() || !input.left_pressed {
                // Focus holds hover, but the wheel still reaches what is under the pointer.
                let target = hit_test(tree, input.pointer);
                return wheel_events(tree, resources, tree_id, input, target, events);
            }
        }
    }

    focus.hovered = hit_test(tree, input.pointer);
    let Some(hovered) = focus.hovered else {
        return Ok(());
    };
    events.push(hovered, EventKind::Hover)?;

    wheel_events(tree, resources, tree_id, input, Some(hovered), events)?;

    if input.left_pressed {
        let (node, intent) = select_intent(tree, hovered, input.pointer, resize_border);
        focus.focus(node, intent);
        // Press and release inside one frame.
        if input.left_released {
            focused_events(focus, node, tree, resources, tree_id, input, events)?;
        }
    }
    Ok(())
}

/// Wheel scroll for the nearest scroll region enclosing `target`.
fn wheel_events(
    tree: &LayoutTree,
    resources: &ResourceTable<Resource>,
    tree_id: u64,
    input: &InputSnapshot,
    target: Option<NodeIndex>,
    events: &mut EventList,
) -> Result<()> {
    if input.scroll_lines == 0.0 {
        return Ok(());
    }
    let Some(region_node) = target.and_then(|n| scroll_ancestor(tree, n)) else {
        return Ok(());
    };
    let key = ResourceKey::for_node(tree_id, ResourceType::ScrollRegion, region_node);
    if let Some(region) = resources.peek(key).and_then(Resource::as_scroll) {
        let delta = region.wheel_delta(input.scroll_lines);
        events.push(region_node, EventKind::Scroll { delta })?;
    }
    Ok(())
}

/// Events for a focused node, releasing focus when its interaction ends.
fn focused_events(
    focus: &mut FocusState,
    node: NodeIndex,
    tree: &LayoutTree,
    resources: &ResourceTable<Resource>,
    tree_id: u64,
    input: &InputSnapshot,
    events: &mut EventList,
) -> Result<()> {
    let delta = input.pointer_delta;
    match focus.intent {
        Intent::Drag if !delta.is_zero() => {
            events.push(node, EventKind::Drag { delta })?;
        }
        intent if intent.is_resize() => {
            let delta = intent.resize_mask(delta);
            if !delta.is_zero() {
                events.push(node, EventKind::Resize { delta })?;
            }
        }
        Intent::Scroll if !delta.is_zero() => {
            let key = ResourceKey::for_node(tree_id, ResourceType::ScrollRegion, node);
            if let Some(region) = resources.peek(key).and_then(Resource::as_scroll) {
                let delta = delta.along(region.axis);
                if delta != 0.0 {
                    events.push(node, EventKind::Scroll { delta })?;
                }
            }
        }
        Intent::Click if input.left_released => {
            if inside(input.pointer, tree.node(node).layout.screen_outer()) {
                events.push(node, EventKind::Click)?;
            }
        }
        Intent::EditText => {
            // Text is applied before keys: the queues carry no relative order.
            if !input.text.is_empty() {
                events.push(node, EventKind::TextInput(input.text.clone()))?;
            }
            for &key in &input.keys {
                events.push(node, EventKind::Key(key))?;
                if matches!(key, KeyCode::Escape | KeyCode::Enter) {
                    focus.release();
                    break;
                }
            }
            return Ok(());
        }
        _ => {}
    }

    if input.left_released {
        focus.release();
    }
    Ok(())
}
