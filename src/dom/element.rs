//! Element - Shared handle to one node of the watch template
//!
//! An element owns its markup and a listener registry. Listeners are
//! identified by the id returned from `add_event_listener`, which is what a
//! caller hands back to `remove_event_listener`.
//!
//! Dispatch snapshots the matching listeners before calling them, so a
//! listener is free to add or remove listeners (for example by navigating to
//! another page) while the event is being delivered.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::types::KeyEvent;

// =============================================================================
// TYPES
// =============================================================================

/// Kind of event an element can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyUp,
}

/// An event delivered to element listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    Click,
    KeyUp(KeyEvent),
}

impl DomEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DomEvent::Click => EventKind::Click,
            DomEvent::KeyUp(_) => EventKind::KeyUp,
        }
    }
}

/// Identity of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Listener callback.
pub type Listener = Rc<dyn Fn(&DomEvent)>;

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

struct ElementInner {
    id: String,
    inner_html: RefCell<String>,
    listeners: RefCell<Vec<Registration>>,
    next_listener: Cell<usize>,
}

// =============================================================================
// ELEMENT
// =============================================================================

/// Cheaply cloneable handle to an element. Clones share state.
#[derive(Clone)]
pub struct Element {
    inner: Rc<ElementInner>,
}

impl Element {
    /// Create a detached element with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ElementInner {
                id: id.into(),
                inner_html: RefCell::new(String::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Current markup content.
    pub fn inner_html(&self) -> String {
        self.inner.inner_html.borrow().clone()
    }

    /// Replace the markup content wholesale.
    pub fn set_inner_html(&self, markup: impl Into<String>) {
        *self.inner.inner_html.borrow_mut() = markup.into();
    }

    /// Whether two handles point at the same element.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a listener for `kind`. Returns the id needed to remove it.
    pub fn add_event_listener<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&DomEvent) + 'static,
    {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push(Registration {
            id,
            kind,
            listener: Rc::new(listener),
        });
        id
    }

    /// Remove a listener. Returns false (and does nothing) when no listener
    /// with that id and kind is registered.
    pub fn remove_event_listener(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|r| !(r.id == id && r.kind == kind));
        listeners.len() != before
    }

    /// Number of listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Deliver an event to every listener of its kind, in registration order.
    /// Returns how many listeners were invoked.
    pub fn dispatch_event(&self, event: &DomEvent) -> usize {
        let kind = event.kind();
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.listener.clone())
            .collect();

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }

    /// Simulate a click on this element.
    pub fn click(&self) -> usize {
        self.dispatch_event(&DomEvent::Click)
    }

    /// Simulate a key-up on this element.
    pub fn key_up(&self, event: KeyEvent) -> usize {
        self.dispatch_event(&DomEvent::KeyUp(event))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.inner.id)
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
