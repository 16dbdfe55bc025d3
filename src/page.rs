//! Page Contract - What a navigable page must implement
//!
//! A page is built fresh from its props on every navigation, then driven
//! through a fixed lifecycle:
//!
//! ```text
//! create(props) → page_will_load → render → (markup written) → page_did_load
//! ```
//!
//! While mounted, the five physical inputs and the keyboard are routed to
//! its handler methods. The engine calls nothing else on a page.
//!
//! # Example
//!
//! ```ignore
//! use watch_shell::{Page, PageProps, PageType};
//!
//! struct Clock {
//!     props: PageProps,
//! }
//!
//! impl PageType for Clock {
//!     fn create(props: PageProps) -> Self {
//!         Self { props }
//!     }
//! }
//!
//! impl Page for Clock {
//!     fn template(&self) -> String {
//!         "<div>12:00</div>".to_string()
//!     }
//!
//!     fn face_button_event(&mut self) {
//!         self.props.navigate.navigate("contacts", Default::default());
//!     }
//! }
//! ```

use std::any::type_name;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::dom::Element;
use crate::engine::Navigator;
use crate::types::{KeyEvent, Props, WatchButton};

// =============================================================================
// PAGE TRAIT
// =============================================================================

/// Lifecycle and input contract of a page.
///
/// Only `template` is required. Hooks and handlers default to no-ops.
pub trait Page {
    /// Called after the page's listeners are bound and before its markup is
    /// produced.
    fn page_will_load(&mut self) {}

    /// Produce the page's markup from its current state.
    fn template(&self) -> String;

    /// The render path used by the engine.
    fn render(&self) -> String {
        self.template()
    }

    /// Called after the markup has been written into the display region.
    fn page_did_load(&mut self) {}

    fn left_button_event(&mut self) {}

    fn right_button_event(&mut self) {}

    fn top_button_event(&mut self) {}

    fn bottom_button_event(&mut self) {}

    fn face_button_event(&mut self) {}

    /// Route a physical button to its handler.
    fn button_event(&mut self, button: WatchButton) {
        match button {
            WatchButton::Left => self.left_button_event(),
            WatchButton::Right => self.right_button_event(),
            WatchButton::Top => self.top_button_event(),
            WatchButton::Bottom => self.bottom_button_event(),
            WatchButton::Face => self.face_button_event(),
        }
    }

    /// Key-up signal. Arrows and space map to the buttons; other keys are
    /// ignored.
    fn key_event(&mut self, event: &KeyEvent) {
        if let Some(button) = event.button() {
            self.button_event(button);
        }
    }
}

/// A page type the route table can construct.
pub trait PageType: Page + 'static {
    fn create(props: PageProps) -> Self;
}

// =============================================================================
// PAGE PROPS
// =============================================================================

/// Props as seen by a page: the caller's bag plus the two engine-injected
/// values.
#[derive(Clone)]
pub struct PageProps {
    /// Props passed to `navigate`.
    pub props: Props,
    /// Re-entrant navigation handle.
    pub navigate: Navigator,
    /// The display region the page is rendered into.
    pub watch_face: Element,
}

impl PageProps {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.props.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.props.get_str(key)
    }
}

impl fmt::Debug for PageProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageProps")
            .field("props", &self.props)
            .field("watch_face", &self.watch_face.id())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// PAGE FACTORY
// =============================================================================

type Constructor = dyn Fn(PageProps) -> Box<dyn Page>;

/// Constructor for one page implementation, as stored in the route table.
#[derive(Clone)]
pub struct PageFactory {
    name: &'static str,
    construct: Rc<Constructor>,
}

impl PageFactory {
    /// Factory for a `PageType`.
    pub fn of<P: PageType>() -> Self {
        Self {
            name: type_name::<P>(),
            construct: Rc::new(|props: PageProps| -> Box<dyn Page> { Box::new(P::create(props)) }),
        }
    }

    /// Factory from a closure.
    pub fn from_fn<F>(name: &'static str, construct: F) -> Self
    where
        F: Fn(PageProps) -> Box<dyn Page> + 'static,
    {
        Self {
            name,
            construct: Rc::new(construct),
        }
    }

    /// Name of the page implementation, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build a fresh page instance.
    pub fn create(&self, props: PageProps) -> Box<dyn Page> {
        (self.construct)(props)
    }

    /// Whether two factories are the same constructor.
    pub fn same_as(&self, other: &PageFactory) -> bool {
        Rc::ptr_eq(&self.construct, &other.construct)
    }
}

impl fmt::Debug for PageFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PageFactory").field(&self.name).finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Page for Recorder {
        fn template(&self) -> String {
            String::new()
        }
        fn left_button_event(&mut self) {
            self.calls.borrow_mut().push("left");
        }
        fn right_button_event(&mut self) {
            self.calls.borrow_mut().push("right");
        }
        fn top_button_event(&mut self) {
            self.calls.borrow_mut().push("top");
        }
        fn bottom_button_event(&mut self) {
            self.calls.borrow_mut().push("bottom");
        }
        fn face_button_event(&mut self) {
            self.calls.borrow_mut().push("face");
        }
    }

    #[test]
    fn test_key_event_maps_through_table() {
        let mut page = Recorder::default();
        for code in [37, 39, 38, 40, 32, 13, 65] {
            page.key_event(&KeyEvent::new(code));
        }
        assert_eq!(
            *page.calls.borrow(),
            vec!["left", "right", "top", "bottom", "face"]
        );
    }

    #[test]
    fn test_button_event_fans_out() {
        let mut page = Recorder::default();
        page.button_event(WatchButton::Face);
        page.button_event(WatchButton::Top);
        assert_eq!(*page.calls.borrow(), vec!["face", "top"]);
    }

    #[test]
    fn test_render_defaults_to_template() {
        struct Fixed;
        impl Page for Fixed {
            fn template(&self) -> String {
                "<div>fixed</div>".to_string()
            }
        }
        assert_eq!(Fixed.render(), "<div>fixed</div>");
    }
}
