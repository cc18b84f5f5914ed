//! Payloads stored in a subtree's resource cache.

use crate::layout::TextResource;
use crate::state::ScrollRegion;
use crate::types::{Rect, Vec2};

use super::resource::ResourceType;

/// A packed atlas image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageResource {
    /// Packed rectangle size in pixels.
    pub size: Vec2,
    /// Normalized atlas coordinates.
    pub uv: Rect,
}

/// One cached blob, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    Text(TextResource),
    Scroll(ScrollRegion),
    Image(ImageResource),
}

impl Resource {
    pub fn kind(&self) -> ResourceType {
        match self {
            Self::Text(_) => ResourceType::Text,
            Self::Scroll(_) => ResourceType::ScrollRegion,
            Self::Image(_) => ResourceType::Image,
        }
    }

    pub fn as_text(&self) -> Option<&TextResource> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextResource> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_scroll(&self) -> Option<&ScrollRegion> {
        match self {
            Self::Scroll(region) => Some(region),
            _ => None,
        }
    }

    pub fn as_scroll_mut(&mut self) -> Option<&mut ScrollRegion> {
        match self {
            Self::Scroll(region) => Some(region),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageResource> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }
}
