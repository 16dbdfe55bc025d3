//! Listener Set - The current page's input bindings, held as data
//!
//! Each binding records the element it is attached to, the event kind and
//! the listener id, so the whole set can be detached before the next page's
//! set is attached. At most one set is attached at any time.
//!
//! Bindings:
//!
//! | Target                   | Event  | Handler               |
//! |--------------------------|--------|-----------------------|
//! | left button              | click  | `left_button_event`   |
//! | right button             | click  | `right_button_event`  |
//! | top button               | click  | `top_button_event`    |
//! | bottom button            | click  | `bottom_button_event` |
//! | watch face               | click  | `face_button_event`   |
//! | notification container   | click  | `face_button_event`   |
//! | page body                | key-up | `key_event`           |

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{DomEvent, Element, EventKind, ListenerId, WatchDocument};
use crate::error::{Result, ShellError};
use crate::page::Page;
use crate::types::{Inputs, WatchButton};

/// Shared handle to a mounted page.
pub(crate) type PageHandle = Rc<RefCell<Box<dyn Page>>>;

// =============================================================================
// WATCH ELEMENTS
// =============================================================================

/// Element handles resolved once from the document.
#[derive(Debug, Clone)]
pub struct WatchElements {
    pub watch_face: Element,
    pub left: Element,
    pub right: Element,
    pub top: Element,
    pub bottom: Element,
    pub notification_container: Element,
    pub body: Element,
}

impl WatchElements {
    /// Look up every element the engine binds to.
    pub fn resolve(document: &WatchDocument) -> Result<Self> {
        let ids = document.ids();
        let find = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| ShellError::MissingElement(id.to_string()))
        };

        Ok(Self {
            watch_face: find(&ids.watch_face)?,
            left: find(&ids.button_left)?,
            right: find(&ids.button_right)?,
            top: find(&ids.button_top)?,
            bottom: find(&ids.button_bottom)?,
            notification_container: find(&ids.notification_container)?,
            body: document.body(),
        })
    }

    /// The element a physical button clicks.
    pub fn button(&self, button: WatchButton) -> &Element {
        match button {
            WatchButton::Left => &self.left,
            WatchButton::Right => &self.right,
            WatchButton::Top => &self.top,
            WatchButton::Bottom => &self.bottom,
            WatchButton::Face => &self.watch_face,
        }
    }
}

// =============================================================================
// LISTENER SET
// =============================================================================

struct Binding {
    target: Element,
    kind: EventKind,
    id: ListenerId,
    input: Inputs,
}

/// The bindings attached for the current page.
pub(crate) struct ListenerSet {
    bindings: Vec<Binding>,
}

impl ListenerSet {
    /// Attach a full binding set for `page`.
    pub(crate) fn bind(elements: &WatchElements, page: &PageHandle) -> Self {
        let mut set = Self {
            bindings: Vec::with_capacity(7),
        };

        set.bind_button(&elements.left, WatchButton::Left, page);
        set.bind_button(&elements.right, WatchButton::Right, page);
        set.bind_button(&elements.top, WatchButton::Top, page);
        set.bind_button(&elements.bottom, WatchButton::Bottom, page);
        set.bind_button(&elements.watch_face, WatchButton::Face, page);
        set.bind_button(&elements.notification_container, WatchButton::Face, page);
        set.bind_keys(&elements.body, page);

        set
    }

    fn bind_button(&mut self, target: &Element, button: WatchButton, page: &PageHandle) {
        let page = Rc::clone(page);
        let id = target.add_event_listener(EventKind::Click, move |_| {
            with_page(&page, |page| invoke_button(page, button));
        });
        self.bindings.push(Binding {
            target: target.clone(),
            kind: EventKind::Click,
            id,
            input: button.input(),
        });
    }

    fn bind_keys(&mut self, target: &Element, page: &PageHandle) {
        let page = Rc::clone(page);
        let id = target.add_event_listener(EventKind::KeyUp, move |event| {
            if let DomEvent::KeyUp(key) = event {
                with_page(&page, |page| page.key_event(key));
            }
        });
        self.bindings.push(Binding {
            target: target.clone(),
            kind: EventKind::KeyUp,
            id,
            input: Inputs::KEYBOARD,
        });
    }

    /// Detach every binding.
    pub(crate) fn unbind(self) {
        for binding in self.bindings {
            binding.target.remove_event_listener(binding.kind, binding.id);
        }
    }

    /// Inputs covered by this set.
    pub(crate) fn inputs(&self) -> Inputs {
        self.bindings
            .iter()
            .fold(Inputs::empty(), |acc, b| acc | b.input)
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }
}

fn invoke_button(page: &mut dyn Page, button: WatchButton) {
    match button {
        WatchButton::Left => page.left_button_event(),
        WatchButton::Right => page.right_button_event(),
        WatchButton::Top => page.top_button_event(),
        WatchButton::Bottom => page.bottom_button_event(),
        WatchButton::Face => page.face_button_event(),
    }
}

fn with_page(page: &PageHandle, f: impl FnOnce(&mut dyn Page)) {
    match page.try_borrow_mut() {
        Ok(mut page) => f(&mut **page),
        Err(_) => tracing::warn!("input delivered to a page that is already handling one; dropped"),
    }
}

// =============================================================================
// TESTS
// =============================================================================
