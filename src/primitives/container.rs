//! Container primitives: plain boxes, flex rows/columns, windows and scroll
//! regions. Each one stays open until the matching [`Frame::end`].

use crate::engine::{NodeIndex, NodeKind, Resource, ResourceKey, ResourceType};
use crate::error::Result;
use crate::pipeline::Frame;
use crate::state::ScrollRegion;
use crate::style::Style;
use crate::types::{Axis, Display, FlexDirection, NodeFlags};

impl Frame<'_> {
    /// Open an anonymous container with extra `flags`.
    pub fn container(&mut self, flags: NodeFlags, style: Style) -> Result<NodeIndex> {
        self.declare(NodeKind::Container, flags | NodeFlags::IS_PARENT, None, style)
    }

    /// Open a flex row. `style`'s display and direction are overridden.
    pub fn row(&mut self, style: Style) -> Result<NodeIndex> {
        self.container(NodeFlags::NONE, flex(style, FlexDirection::Row))
    }

    /// Open a flex column. `style`'s display and direction are overridden.
    pub fn column(&mut self, style: Style) -> Result<NodeIndex> {
        self.container(NodeFlags::NONE, flex(style, FlexDirection::Column))
    }

    /// Open a draggable, resizable window.
    ///
    /// Drags accumulate into the window's offset and resizes replace its
    /// style size, both for as long as the window keeps its slot and `id`.
    pub fn window(&mut self, id: &str, style: Style) -> Result<NodeIndex> {
        let flags = NodeFlags::IS_PARENT | NodeFlags::DRAGGABLE | NodeFlags::RESIZABLE;
        self.declare(NodeKind::Container, flags, Some(id), style)
    }

    /// Open a region scrolling its children along `axis`.
    pub fn scroll_region(&mut self, id: &str, axis: Axis, style: Style) -> Result<NodeIndex> {
        let flags = NodeFlags::IS_PARENT | NodeFlags::HAS_SCROLL_REGION;
        let n = self.declare(NodeKind::Container, flags, Some(id), style)?;

        let fresh = !self.is_carried_over(n);
        let s = &mut *self.subtree;
        let key = ResourceKey::for_node(s.tree_id, ResourceType::ScrollRegion, n);
        let handle = s.resources.find_resource_by_key(key);
        match s.resources.get_mut(handle).and_then(Resource::as_scroll_mut) {
            Some(region) if !fresh => {
                if region.axis != axis {
                    region.axis = axis;
                    region.offset = 0.0;
                }
            }
            _ => {
                let region = ScrollRegion::new(axis, s.config.scroll_pixels_per_line);
                s.resources.update_resource_table(handle, key, Resource::Scroll(region));
            }
        }
        Ok(n)
    }

    /// Close the innermost open container.
    pub fn end(&mut self) -> Result<NodeIndex> {
        self.subtree.tree.pop_parent()
    }
}

fn flex(style: Style, direction: FlexDirection) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: direction,
        ..style
    }
}
