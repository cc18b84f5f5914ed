//! State Module - Per-frame interaction state
//!
//! - **Input** - OS input snapshot and the crossterm adapter
//! - **Events** - Bounded, frame-transient event list
//! - **Focus** - Hit testing, hover, focus and intent selection
//! - **Scroll** - Scroll regions, chaining and viewport culling
//! - **Apply** - Writing events back onto the tree and its resources
//!
//! [`update_subtree_state`] runs them in order once per frame, before layout.

mod apply;
mod events;
mod focus;
mod input;
mod scroll;

pub use apply::*;
pub use events::*;
pub use focus::*;
pub use input::*;
pub use scroll::*;

use crate::engine::{LayoutTree, Resource, ResourceTable};

/// Clear last frame's events, run hover/focus, generate this frame's events
/// and apply them.
///
/// A full event list stops generation. Whatever was recorded is still applied.
pub fn update_subtree_state(
    tree: &mut LayoutTree,
    resources: &mut ResourceTable<Resource>,
    focus: &mut FocusState,
    events: &mut EventList,
    input: &InputSnapshot,
    resize_border: f32,
    tree_id: u64,
) {
    events.clear();
    if let Err(err) = generate_events(focus, tree, resources, tree_id, input, resize_border, events) {
        tracing::debug!(error = %err, "event generation stopped early");
    }
    apply_events(tree, resources, tree_id, events);
    apply_style_states(tree, focus, input);

    tracing::trace!(
        events = events.len(),
        hovered = ?focus.hovered(),
        focused = ?focus.focused(),
        "subtree state updated"
    );
}
