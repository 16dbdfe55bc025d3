//! Document - The watch template
//!
//! A fixed set of elements: the display region, four directional buttons,
//! the notification overlay container and the page body, plus the location.

use std::collections::HashMap;

use serde::Deserialize;

use super::element::Element;
use super::location::Location;

/// Element ids of the watch template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ElementIds {
    pub watch_face: String,
    pub button_left: String,
    pub button_right: String,
    pub button_top: String,
    pub button_bottom: String,
    pub notification_container: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            watch_face: "watch-face".to_string(),
            button_left: "button-left".to_string(),
            button_right: "button-right".to_string(),
            button_top: "button-top".to_string(),
            button_bottom: "button-bottom".to_string(),
            notification_container: "notification-container".to_string(),
        }
    }
}

impl ElementIds {
    fn all(&self) -> [&str; 6] {
        [
            &self.watch_face,
            &self.button_left,
            &self.button_right,
            &self.button_top,
            &self.button_bottom,
            &self.notification_container,
        ]
    }
}

/// The watch document.
#[derive(Debug, Clone)]
pub struct WatchDocument {
    ids: ElementIds,
    elements: HashMap<String, Element>,
    body: Element,
    location: Location,
}

impl Default for WatchDocument {
    fn default() -> Self {
        Self::new(ElementIds::default())
    }
}

impl WatchDocument {
    /// Build the watch template with the given element ids.
    pub fn new(ids: ElementIds) -> Self {
        Self::with_location(ids, Location::default())
    }

    pub fn with_location(ids: ElementIds, location: Location) -> Self {
        let elements = ids
            .all()
            .into_iter()
            .map(|id| (id.to_string(), Element::new(id)))
            .collect();
        Self {
            ids,
            elements,
            body: Element::new("body"),
            location,
        }
    }

    /// A document with only some of the template's elements, as a broken
    /// host page would have.
    pub fn partial(ids: ElementIds, present: &[&str]) -> Self {
        let mut doc = Self::new(ids);
        doc.elements.retain(|id, _| present.contains(&id.as_str()));
        doc
    }

    pub fn ids(&self) -> &ElementIds {
        &self.ids
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
        self.elements.get(id).cloned()
    }

    /// The page body, target of key-up signals.
    pub fn body(&self) -> Element {
        self.body.clone()
    }

    pub fn location(&self) -> Location {
        self.location.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_all_elements() {
        let doc = WatchDocument::default();
        for id in [
            "watch-face",
            "button-left",
            "button-right",
            "button-top",
            "button-bottom",
            "notification-container",
        ] {
            let el = doc.get_element_by_id(id).unwrap();
            assert_eq!(el.id(), id);
        }
        assert!(doc.get_element_by_id("nope").is_none());
    }

    #[test]
    fn test_lookups_share_the_same_element() {
        let doc = WatchDocument::default();
        let a = doc.get_element_by_id("watch-face").unwrap();
        let b = doc.get_element_by_id("watch-face").unwrap();
        a.set_inner_html("<p>hi</p>");
        assert!(a.ptr_eq(&b));
        assert_eq!(b.inner_html(), "<p>hi</p>");
    }

    #[test]
    fn test_debug_includes_location() {
        let doc = WatchDocument::default();
        doc.location().set_hash("/");
        let printed = format!("{doc:?}");
        assert!(printed.contains("http://localhost:8080/#/"));
    }

    #[test]
    fn test_partial_document() {
        let doc = WatchDocument::partial(ElementIds::default(), &["watch-face"]);
        assert!(doc.get_element_by_id("watch-face").is_some());
        assert!(doc.get_element_by_id("button-left").is_none());
    }
}
