//! Text primitives.

use crate::engine::{NodeIndex, NodeKind};
use crate::error::Result;
use crate::pipeline::Frame;
use crate::style::Style;
use crate::types::NodeFlags;

use super::Response;

impl Frame<'_> {
    /// Declare a line of static text. Auto sizes wrap to the parent.
    pub fn label(&mut self, text: &str, style: Style) -> Result<NodeIndex> {
        let n = self.declare(NodeKind::Text, NodeFlags::HAS_TEXT, None, style)?;
        self.sync_text(n, text);
        Ok(n)
    }

    /// Declare a clickable text button.
    ///
    /// `clicked` reports a press and release inside the button during the
    /// previous frame.
    pub fn button(&mut self, id: &str, label: &str, style: Style) -> Result<Response> {
        let flags = NodeFlags::CLICKABLE | NodeFlags::HAS_TEXT;
        let n = self.declare(NodeKind::Text, flags, Some(id), style)?;
        self.sync_text(n, label);
        Ok(self.response(n))
    }
}
