//! Location - The address bar of the simulated browser
//!
//! Holds a base URL and a hash fragment. Two ways to change the fragment:
//!
//! - `set_hash` is the engine's one-way projection of the current page.
//!   It updates the address silently.
//! - `change_hash` is an external change (user edit, back/forward). It
//!   notifies every `on_hash_change` subscriber with the old and new URL.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Base URL used by `Location::default`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Hash-change notification payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashChangeEvent {
    pub old_url: String,
    pub new_url: String,
}

/// A location-like value exposing a hash fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSnapshot {
    pub href: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl LocationSnapshot {
    pub fn new(href: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            hash: hash.into(),
        }
    }

    /// Snapshot carrying only a hash.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self {
            href: String::new(),
            hash: hash.into(),
        }
    }
}

/// Extract the fragment after the first `#` of a URL. No marker means no
/// fragment.
pub fn fragment_of(url: &str) -> &str {
    url.split_once('#').map(|(_, frag)| frag).unwrap_or("")
}

type HashChangeHandler = Rc<dyn Fn(&HashChangeEvent)>;

struct LocationInner {
    base: String,
    fragment: RefCell<String>,
    handlers: RefCell<Vec<(usize, HashChangeHandler)>>,
    next_id: Cell<usize>,
}

/// Shared handle to the document location. Clones share state.
#[derive(Clone)]
pub struct Location {
    inner: Rc<LocationInner>,
}

impl Default for Location {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Location {
    /// Location at `base` with no fragment.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = match base.split_once('#') {
            Some((b, _)) => b.to_string(),
            None => base,
        };
        Self {
            inner: Rc::new(LocationInner {
                base,
                fragment: RefCell::new(String::new()),
                handlers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Fragment including the leading `#`, empty when there is none.
    pub fn hash(&self) -> String {
        let fragment = self.inner.fragment.borrow();
        if fragment.is_empty() {
            String::new()
        } else {
            format!("#{fragment}")
        }
    }

    pub fn href(&self) -> String {
        format!("{}{}", self.inner.base, self.hash())
    }

    pub fn snapshot(&self) -> LocationSnapshot {
        LocationSnapshot {
            href: self.href(),
            hash: self.hash(),
        }
    }

    /// Silently project `path` into the fragment. Subscribers are not told.
    pub fn set_hash(&self, path: &str) {
        *self.inner.fragment.borrow_mut() = strip_marker(path).to_string();
    }

    /// Change the fragment from outside the engine and notify subscribers.
    /// Returns false when the URL did not change.
    pub fn change_hash(&self, path: &str) -> bool {
        let old_url = self.href();
        *self.inner.fragment.borrow_mut() = strip_marker(path).to_string();
        let new_url = self.href();

        if old_url == new_url {
            return false;
        }

        tracing::trace!(%old_url, %new_url, "hash change");
        let event = HashChangeEvent { old_url, new_url };
        let handlers: Vec<HashChangeHandler> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(&event);
        }
        true
    }

    /// Subscribe to external hash changes.
    /// Returns cleanup function.
    pub fn on_hash_change<F>(&self, handler: F) -> impl FnOnce() + use<F>
    where
        F: Fn(&HashChangeEvent) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .handlers
            .borrow_mut()
            .push((id, Rc::new(handler)));

        let weak: Weak<LocationInner> = Rc::downgrade(&self.inner);
        move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .handlers
                    .borrow_mut()
                    .retain(|(handler_id, _)| *handler_id != id);
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Location")
            .field("href", &self.href())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn strip_marker(path: &str) -> &str {
    path.strip_prefix('#').unwrap_or(path)
}

// =============================================================================
// TESTS
// =============================================================================
