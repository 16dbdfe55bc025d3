//! Host Input - crossterm events to watch signals
//!
//! Keys become browser-style key codes delivered to the page body. Left
//! mouse presses become clicks at a terminal cell, resolved to a button by
//! the hit grid. A few keys are reserved for the host itself.
//!
//! | Key              | Host event              |
//! |------------------|-------------------------|
//! | `q`, Esc, Ctrl+C | quit                    |
//! | `n`              | raise a notification    |
//! | `x`              | dismiss the notification|
//! | anything else    | key-up with its code    |

use std::io;
use std::time::Duration;

use crossterm::event::{
    poll, read, Event as CrosstermEvent, KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use crate::types::{KeyEvent, KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_SPACE, KEY_UP};

pub const KEY_BACKSPACE: u32 = 8;
pub const KEY_TAB: u32 = 9;
pub const KEY_ENTER: u32 = 13;
pub const KEY_ESCAPE: u32 = 27;

/// What the host should do with one terminal event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// Key-up for the page body.
    Key(KeyEvent),
    /// Left press at a terminal cell.
    Click { x: u16, y: u16 },
    /// Terminal resized to (width, height).
    Resize(u16, u16),
    TriggerNotification,
    DismissNotification,
    Quit,
    /// Nothing to do.
    Ignored,
}

// =============================================================================
// KEY CONVERSION
// =============================================================================

/// Key code and name for a crossterm key, if it has one.
pub fn key_code(code: KeyCode) -> Option<(u32, String)> {
    let mapped = match code {
        KeyCode::Left => (KEY_LEFT, "ArrowLeft".to_string()),
        KeyCode::Up => (KEY_UP, "ArrowUp".to_string()),
        KeyCode::Right => (KEY_RIGHT, "ArrowRight".to_string()),
        KeyCode::Down => (KEY_DOWN, "ArrowDown".to_string()),
        KeyCode::Char(' ') => (KEY_SPACE, " ".to_string()),
        KeyCode::Char(c) if c.is_ascii() => (c.to_ascii_uppercase() as u32, c.to_string()),
        KeyCode::Enter => (KEY_ENTER, "Enter".to_string()),
        KeyCode::Esc => (KEY_ESCAPE, "Escape".to_string()),
        KeyCode::Tab => (KEY_TAB, "Tab".to_string()),
        KeyCode::Backspace => (KEY_BACKSPACE, "Backspace".to_string()),
        _ => return None,
    };
    Some(mapped)
}

/// Convert a crossterm key event.
///
/// Terminals report presses, not releases, so a press stands in for the
/// key-up. Repeats and releases are ignored.
pub fn convert_key_event(event: CrosstermKeyEvent) -> HostEvent {
    if event.kind != KeyEventKind::Press {
        return HostEvent::Ignored;
    }

    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => HostEvent::Quit,
        KeyCode::Char('q') | KeyCode::Esc => HostEvent::Quit,
        KeyCode::Char('n') => HostEvent::TriggerNotification,
        KeyCode::Char('x') => HostEvent::DismissNotification,
        code => match key_code(code) {
            Some((which, key)) => HostEvent::Key(KeyEvent::with_key(which, key)),
            None => HostEvent::Ignored,
        },
    }
}

// =============================================================================
// MOUSE CONVERSION
// =============================================================================

/// Convert a crossterm mouse event. Only left presses click.
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> HostEvent {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => HostEvent::Click {
            x: event.column,
            y: event.row,
        },
        _ => HostEvent::Ignored,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

pub fn convert_event(event: CrosstermEvent) -> HostEvent {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse),
        CrosstermEvent::Resize(w, h) => HostEvent::Resize(w, h),
        _ => HostEvent::Ignored,
    }
}

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> io::Result<Option<HostEvent>> {
    if poll(timeout)? {
        Ok(Some(convert_event(read()?)))
    } else {
        Ok(None)
    }
}

// =============================================================================
// TESTS
// =============================================================================
