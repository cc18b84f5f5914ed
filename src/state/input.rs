//! Input Module - Per-frame OS input snapshot
//!
//! The engine reads input as a read-only [`InputSnapshot`] once per frame:
//! pointer position and delta, left-button press/release edges, wheel lines,
//! a replayed key queue and a replayed UTF-8 text queue.
//!
//! Polling is the host's business. [`InputSnapshot::record_crossterm`] folds
//! crossterm events into the snapshot for terminal hosts.
//!
//! # Example
//!
//! ```ignore
//! use spark_ui::state::InputSnapshot;
//! use spark_ui::types::Vec2;
//!
//! let mut input = InputSnapshot::default();
//! loop {
//!     input.begin_frame();
//!     while crossterm::event::poll(Duration::ZERO)? {
//!         input.record_crossterm(&crossterm::event::read()?, Vec2::new(8.0, 16.0));
//!     }
//!     // build and end the frame with &input
//! }
//! ```

use crossterm::event::{
    Event as CrosstermEvent, KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyEventKind, KeyModifiers, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use crate::types::Vec2;

// =============================================================================
// KEY CODES
// =============================================================================

/// Non-text keys replayed to the focused node. Printable input arrives as
/// text instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Backspace,
    Delete,
    Enter,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

// =============================================================================
// INPUT SNAPSHOT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSnapshot {
    pub pointer: Vec2,
    /// Pointer movement since the last frame.
    pub pointer_delta: Vec2,
    /// Left button went down this frame.
    pub left_pressed: bool,
    /// Left button went up this frame.
    pub left_released: bool,
    /// Left button is held.
    pub left_down: bool,
    /// Wheel movement in lines. Positive scrolls toward the end of the content.
    pub scroll_lines: f32,
    pub keys: Vec<KeyCode>,
    pub text: String,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the per-frame edges and queues. Pointer position and held
    /// buttons carry over.
    pub fn begin_frame(&mut self) {
        self.pointer_delta = Vec2::ZERO;
        self.left_pressed = false;
        self.left_released = false;
        self.scroll_lines = 0.0;
        self.keys.clear();
        self.text.clear();
    }

    pub fn move_pointer(&mut self, pos: Vec2) {
        self.pointer_delta += pos - self.pointer;
        self.pointer = pos;
    }

    pub fn press_left(&mut self) {
        if !self.left_down {
            self.left_pressed = true;
        }
        self.left_down = true;
    }

    pub fn release_left(&mut self) {
        if self.left_down {
            self.left_released = true;
        }
        self.left_down = false;
    }

    pub fn scroll(&mut self, lines: f32) {
        self.scroll_lines += lines;
    }

    pub fn push_key(&mut self, key: KeyCode) {
        self.keys.push(key);
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// True if nothing happened this frame.
    pub fn is_idle(&self) -> bool {
        self.pointer_delta.is_zero()
            && !self.left_pressed
            && !self.left_released
            && self.scroll_lines == 0.0
            && self.keys.is_empty()
            && self.text.is_empty()
    }

    // =========================================================================
    // CROSSTERM ADAPTER
    // =========================================================================

    /// Fold one crossterm event into the snapshot. Terminal cells are mapped
    /// to pixels with `cell`.
    pub fn record_crossterm(&mut self, event: &CrosstermEvent, cell: Vec2) {
        match event {
            CrosstermEvent::Mouse(mouse) => self.record_mouse(mouse, cell),
            CrosstermEvent::Key(key) => self.record_key(key),
            CrosstermEvent::Paste(text) => self.push_text(text),
            _ => {}
        }
    }

    fn record_mouse(&mut self, event: &CrosstermMouseEvent, cell: Vec2) {
        let pos = Vec2::new(event.column as f32 * cell.x, event.row as f32 * cell.y);
        match event.kind {
            MouseEventKind::Down(CrosstermMouseButton::Left) => {
                self.move_pointer(pos);
                self.press_left();
            }
            MouseEventKind::Up(CrosstermMouseButton::Left) => {
                self.move_pointer(pos);
                self.release_left();
            }
            MouseEventKind::Drag(_) | MouseEventKind::Moved => self.move_pointer(pos),
            MouseEventKind::ScrollDown => self.scroll(1.0),
            MouseEventKind::ScrollUp => self.scroll(-1.0),
            _ => {}
        }
    }

    fn record_key(&mut self, event: &CrosstermKeyEvent) {
        if event.kind == KeyEventKind::Release {
            return;
        }
        let key = match event.code {
            CrosstermKeyCode::Char(c) => {
                if !event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                    self.text.push(c);
                }
                return;
            }
            CrosstermKeyCode::Backspace => KeyCode::Backspace,
            CrosstermKeyCode::Delete => KeyCode::Delete,
            CrosstermKeyCode::Enter => KeyCode::Enter,
            CrosstermKeyCode::Esc => KeyCode::Escape,
            CrosstermKeyCode::Tab => KeyCode::Tab,
            CrosstermKeyCode::Left => KeyCode::Left,
            CrosstermKeyCode::Right => KeyCode::Right,
            CrosstermKeyCode::Up => KeyCode::Up,
            CrosstermKeyCode::Down => KeyCode::Down,
            CrosstermKeyCode::Home => KeyCode::Home,
            CrosstermKeyCode::End => KeyCode::End,
            CrosstermKeyCode::PageUp => KeyCode::PageUp,
            CrosstermKeyCode::PageDown => KeyCode::PageDown,
            _ => return,
        };
        self.keys.push(key);
    }
}
