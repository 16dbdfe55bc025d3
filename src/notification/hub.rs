//! Notification Hub - Publish/subscribe channel for the overlay
//!
//! One hub per UI thread. Whoever raises a notification calls `show`;
//! whoever dismisses it calls `hide`. Subscribers learn about both through
//! `on_show` / `on_hide`.
//!
//! # Example
//!
//! ```ignore
//! use watch_shell::notification::hub;
//!
//! let cleanup = hub::on_hide(|| println!("dismissed"));
//! hub::show(Notification::new("message", "New message", "Hi"));
//! hub::hide();
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

// =============================================================================
// TYPES
// =============================================================================

/// A notification raised on the watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: String,
    pub label: String,
    pub value: String,
}

impl Notification {
    pub fn new(kind: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            value: value.into(),
        }
    }
}

type HideHandler = Rc<dyn Fn()>;
type ShowHandler = Rc<dyn Fn(&Notification)>;

// =============================================================================
// STATE
// =============================================================================

struct HubState {
    current: Option<Notification>,
    hide_handlers: Vec<(usize, HideHandler)>,
    show_handlers: Vec<(usize, ShowHandler)>,
    next_id: usize,
}

impl HubState {
    fn new() -> Self {
        Self {
            current: None,
            hide_handlers: Vec::new(),
            show_handlers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static HUB: RefCell<HubState> = RefCell::new(HubState::new());
}

/// The notification currently shown, if any.
pub fn current() -> Option<Notification> {
    HUB.with(|hub| hub.borrow().current.clone())
}

pub fn is_visible() -> bool {
    HUB.with(|hub| hub.borrow().current.is_some())
}

// =============================================================================
// SIGNALS
// =============================================================================

/// Request a notification. Subscribers run after the hub state is updated.
pub fn show(notification: Notification) {
    let handlers: Vec<ShowHandler> = HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        hub.current = Some(notification.clone());
        hub.show_handlers.iter().map(|(_, h)| h.clone()).collect()
    });

    tracing::debug!(kind = %notification.kind, "notification shown");
    for handler in handlers {
        handler(&notification);
    }
}

/// Dismiss the notification. Always signals, even when nothing is shown.
pub fn hide() {
    let handlers: Vec<HideHandler> = HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        hub.current = None;
        hub.hide_handlers.iter().map(|(_, h)| h.clone()).collect()
    });

    tracing::debug!(subscribers = handlers.len(), "notification hidden");
    for handler in handlers {
        handler();
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// Subscribe to dismissals.
/// Returns cleanup function.
pub fn on_hide<F>(handler: F) -> impl FnOnce()
where
    F: Fn() + 'static,
{
    let id = HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        let id = hub.next_id();
        hub.hide_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        HUB.with(|hub| {
            hub.borrow_mut()
                .hide_handlers
                .retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Subscribe to requests.
/// Returns cleanup function.
pub fn on_show<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&Notification) + 'static,
{
    let id = HUB.with(|hub| {
        let mut hub = hub.borrow_mut();
        let id = hub.next_id();
        hub.show_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        HUB.with(|hub| {
            hub.borrow_mut()
                .show_handlers
                .retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Number of (show, hide) subscribers.
pub fn subscriber_count() -> (usize, usize) {
    HUB.with(|hub| {
        let hub = hub.borrow();
        (hub.show_handlers.len(), hub.hide_handlers.len())
    })
}

/// Clear all state and subscribers.
pub fn reset() {
    HUB.with(|hub| *hub.borrow_mut() = HubState::new());
}

// =============================================================================
// TESTS
// =============================================================================
