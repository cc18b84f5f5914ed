//! # spark-ui
//!
//! Layout and interaction engine for a hybrid immediate-mode GUI.
//!
//! The UI is re-declared every frame, but nodes that keep their slot keep
//! their state: drag offsets, resize overrides, scroll positions, shaped
//! text. Layout is a flexbox subset computed in three passes over a flat
//! arena, and the output is a batched list of instanced rects.
//!
//! ## Architecture
//!
//! A [`Subtree`] is the unit of everything: one node arena, one LRU resource
//! cache, one node-id table, one focus slot. Frames go through it:
//!
//! ```text
//! Subtree::begin_frame → Frame primitives → Frame::finish(input)
//!                                             ├─ state:    events, focus, apply
//!                                             ├─ layout:   measure, measure, place
//!                                             └─ renderer: draw list
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use spark_ui::{EngineConfig, InputSnapshot, Style, Subtree, Vec2};
//!
//! let mut ui = Subtree::new(EngineConfig::default())?;
//! let mut input = InputSnapshot::new();
//! loop {
//!     let mut frame = ui.begin_frame(Vec2::new(800.0, 600.0));
//!     frame.window("main", Style::sized(320.0, 240.0))?;
//!     if frame.button("save", "Save", Style::default())?.clicked {
//!         save();
//!     }
//!     frame.end()?;
//!     let output = frame.finish(&input);
//!     draw(output.draw_list);
//!     input.begin_frame();
//!     // feed OS events into `input`
//! }
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Geometry, colors, layout enums, node flags
//! - [`engine`] - Layout tree, box model, resource cache, node-id table
//! - [`layout`] - Measure/place passes, flexbox, text shaping and wrapping
//! - [`state`] - Input snapshot, hit testing, focus, events, scrolling
//! - [`renderer`] - Draw list of batched rect instances
//! - [`pipeline`] - Subtree and frame lifecycle
//! - [`primitives`] - Declaration helpers on [`Frame`]

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod style;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{ConfigError, EngineConfig};
pub use error::{EngineError, Result};
pub use style::{FontId, Padding, Style, StyleState};

pub use engine::{
    CacheStats, LayoutBox, LayoutNode, LayoutTree, NodeIdTable, NodeIndex, NodeKind, ResourceKey,
    ResourceTable, ResourceType, ROOT,
};

pub use layout::{GlyphShaper, MonospaceShaper, ShapedGlyph, ShapedRun, TextResource};

pub use renderer::{DrawBatch, DrawList, Pipeline, RectInstance};

pub use pipeline::{Frame, FrameOutput, Subtree};

pub use primitives::Response;

pub use state::{
    Event, EventKind, EventList, FocusState, InputSnapshot, Intent, KeyCode, ScrollRegion, TextEdit,
};
