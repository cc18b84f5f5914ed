//! Text input primitive.
//!
//! The caller owns the text. Interaction edits the node's text resource
//! during [`Frame::finish`] and queues each edit; the next declaration
//! replays the queue into the caller's buffer and then makes the buffer
//! authoritative again. Caller changes made between frames are kept and the
//! replayed edits apply on top of them.

use crate::engine::{NodeKind, Resource, ResourceKey, ResourceType};
use crate::error::Result;
use crate::layout::TextResource;
use crate::pipeline::Frame;
use crate::style::Style;
use crate::types::NodeFlags;

use super::Response;

impl Frame<'_> {
    /// Declare a single-line editable text field bound to `buffer`.
    ///
    /// Clicking the field focuses it. Typed text and Backspace edit it until
    /// Enter, Escape or a click elsewhere releases focus.
    pub fn text_input(&mut self, id: &str, buffer: &mut String, style: Style) -> Result<Response> {
        let flags = NodeFlags::HAS_TEXT | NodeFlags::HAS_TEXT_INPUT;
        let n = self.declare(NodeKind::TextInput, flags, Some(id), style)?;

        let fresh = !self.is_carried_over(n);
        let s = &mut *self.subtree;
        let key = ResourceKey::for_node(s.tree_id, ResourceType::Text, n);
        let handle = s.resources.find_resource_by_key(key);
        match s.resources.get_mut(handle).and_then(Resource::as_text_mut) {
            Some(text) if !fresh => {
                for edit in text.pending_edits.drain(..) {
                    edit.apply_to(buffer);
                }
                text.set_text(buffer);
            }
            _ => {
                s.resources
                    .update_resource_table(handle, key, Resource::Text(TextResource::new(buffer.as_str())));
            }
        }
        Ok(self.response(n))
    }
}
