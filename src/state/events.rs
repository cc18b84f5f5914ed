//! Frame-transient event list.
//!
//! Events are generated once per frame by the focus engine, applied to the
//! tree, and readable by the caller until the next frame clears them.

use crate::engine::NodeIndex;
use crate::error::{EngineError, Result};
use crate::types::Vec2;

use super::input::KeyCode;

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Pointer is over the node.
    Hover,
    /// Left button pressed and released over the node.
    Click,
    /// Outer size change requested by a border drag. Axes the intent does not
    /// resize are zero.
    Resize { delta: Vec2 },
    Drag { delta: Vec2 },
    /// Scroll along the region's axis. Positive moves toward the start.
    Scroll { delta: f32 },
    Key(KeyCode),
    TextInput(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub node: NodeIndex,
    pub kind: EventKind,
}

/// Bounded list of this frame's events.
#[derive(Debug, Clone)]
pub struct EventList {
    events: Vec<Event>,
    capacity: usize,
}

impl EventList {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an event. Fails closed when the list is full.
    pub fn push(&mut self, node: NodeIndex, kind: EventKind) -> Result<()> {
        if self.events.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, node, "event list full");
            return Err(EngineError::EventListFull {
                capacity: self.capacity,
            });
        }
        self.events.push(Event { node, kind });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events targeting `node`.
    pub fn for_node(&self, node: NodeIndex) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.node == node)
    }

    pub fn clicked(&self, node: NodeIndex) -> bool {
        self.for_node(node).any(|e| e.kind == EventKind::Click)
    }

    pub fn hovered(&self, node: NodeIndex) -> bool {
        self.for_node(node).any(|e| e.kind == EventKind::Hover)
    }
}

impl<'a> IntoIterator for &'a EventList {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
