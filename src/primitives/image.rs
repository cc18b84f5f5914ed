//! Image primitive.

use crate::engine::{NodeIndex, NodeKind, ResourceKey, ResourceType};
use crate::error::{EngineError, Result};
use crate::pipeline::Frame;
use crate::style::Style;
use crate::types::NodeFlags;

impl Frame<'_> {
    /// Declare an image previously registered with
    /// [`Subtree::load_image`](crate::pipeline::Subtree::load_image).
    ///
    /// Auto sizes take the packed image size. Fails with `ImageNotLoaded`
    /// when the name is unknown or was evicted, without declaring a node.
    pub fn image(&mut self, name: &str, style: Style) -> Result<NodeIndex> {
        let key = ResourceKey::global(name, ResourceType::Image);
        if self.subtree.resources.lookup(key).is_none() {
            tracing::debug!(name, "image not loaded");
            return Err(EngineError::ImageNotLoaded { name: name.to_string() });
        }
        self.declare(NodeKind::Image { key }, NodeFlags::HAS_IMAGE, None, style)
    }
}
