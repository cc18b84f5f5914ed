//! Flattened per-node style record.
//!
//! The layout engine reads this record as opaque input. Producing it (from a
//! style sheet, a theme or code) is the caller's business.

use crate::types::{AlignItems, Dimension, Display, FlexDirection, JustifyContent, Rgba, TextAlign};

/// Padding on each side of the content box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Padding {
    pub const ZERO: Self = Self::all(0.0);

    /// Same padding on every side.
    pub const fn all(value: f32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    /// `x` on left/right, `y` on top/bottom.
    pub const fn symmetric(x: f32, y: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
        }
    }

    #[inline]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

bitflags::bitflags! {
    /// Interaction state used to pick state-dependent colors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StyleState: u8 {
        const NONE = 0;
        const HOVERED = 1 << 0;
        const FOCUSED = 1 << 1;
        const PRESSED = 1 << 2;
    }
}

/// Handle to a font owned by the glyph backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontId(pub u32);

/// Everything layout and paint need to know about one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub width: Dimension,
    pub height: Dimension,
    pub padding: Padding,
    /// Gap between consecutive children.
    pub spacing: f32,
    pub border_width: f32,
    pub corner_radius: f32,
    /// Edge feather in pixels, forwarded to the renderer.
    pub softness: f32,

    pub display: Display,
    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub flex_grow: f32,
    pub flex_shrink: f32,

    pub background: Rgba,
    pub border_color: Rgba,
    pub text_color: Rgba,
    pub hover_background: Option<Rgba>,
    pub focus_background: Option<Rgba>,

    pub font: FontId,
    pub text_align: TextAlign,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: Dimension::Auto,
            height: Dimension::Auto,
            padding: Padding::ZERO,
            spacing: 0.0,
            border_width: 0.0,
            corner_radius: 0.0,
            softness: 0.0,
            display: Display::Normal,
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::Start,
            align_items: AlignItems::Stretch,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            background: Rgba::TRANSPARENT,
            border_color: Rgba::TRANSPARENT,
            text_color: Rgba::WHITE,
            hover_background: None,
            focus_background: None,
            font: FontId::default(),
            text_align: TextAlign::Start,
        }
    }
}

impl Style {
    /// Fixed pixel size on both axes.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width: Dimension::Px(width),
            height: Dimension::Px(height),
            ..Self::default()
        }
    }

    /// A flex container along `direction`.
    pub fn flex(direction: FlexDirection) -> Self {
        Self {
            display: Display::Flex,
            flex_direction: direction,
            ..Self::default()
        }
    }

    /// Background for the given interaction state. Focus wins over hover.
    pub fn background_for(&self, state: StyleState) -> Rgba {
        if state.intersects(StyleState::FOCUSED | StyleState::PRESSED) {
            if let Some(color) = self.focus_background {
                return color;
            }
        }
        if state.contains(StyleState::HOVERED) {
            if let Some(color) = self.hover_background {
                return color;
            }
        }
        self.background
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = Style::default();
        assert_eq!(style.flex_grow, 0.0);
        assert_eq!(style.flex_shrink, 1.0);
        assert!(style.width.is_auto());
        assert_eq!(style.display, Display::Normal);
    }

    #[test]
    fn test_padding_totals() {
        let p = Padding {
            left: 1.0,
            top: 2.0,
            right: 3.0,
            bottom: 4.0,
        };
        assert_eq!(p.horizontal(), 4.0);
        assert_eq!(p.vertical(), 6.0);
        assert_eq!(Padding::symmetric(5.0, 2.0).horizontal(), 10.0);
    }

    #[test]
    fn test_state_backgrounds() {
        let style = Style {
            background: Rgba::BLACK,
            hover_background: Some(Rgba::GRAY),
            focus_background: Some(Rgba::WHITE),
            ..Style::default()
        };
        assert_eq!(style.background_for(StyleState::NONE), Rgba::BLACK);
        assert_eq!(style.background_for(StyleState::HOVERED), Rgba::GRAY);
        assert_eq!(
            style.background_for(StyleState::HOVERED | StyleState::FOCUSED),
            Rgba::WHITE
        );

        let plain = Style::default();
        assert_eq!(plain.background_for(StyleState::HOVERED), Rgba::TRANSPARENT);
    }
}
