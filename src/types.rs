//! Core types for watch-shell.
//!
//! These types flow between the host, the navigation engine and the pages:
//! the props bag handed to every page, the five physical inputs, and the
//! key-up payload the keyboard listener receives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Props
// =============================================================================

/// String-keyed bag of values passed to every page on construction.
///
/// Ordered so that two bags built from the same pairs compare and print
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props(BTreeMap<String, Value>);

impl Props {
    /// Create an empty props bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a value, returning the previous one if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a value as a string slice, if it is a JSON string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// =============================================================================
// Physical inputs
// =============================================================================

/// One of the five physical affordances on the watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WatchButton {
    Left,
    Right,
    Top,
    Bottom,
    /// Tap on the watch face (or on the notification overlay).
    Face,
}

impl WatchButton {
    /// All buttons, in binding order.
    pub const ALL: [WatchButton; 5] = [
        WatchButton::Left,
        WatchButton::Right,
        WatchButton::Top,
        WatchButton::Bottom,
        WatchButton::Face,
    ];

    /// Map a key-up code to the button it stands for.
    ///
    /// The table is fixed: arrows map to the directional buttons and the
    /// spacebar to the face. Anything else maps to nothing.
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            KEY_LEFT => Some(WatchButton::Left),
            KEY_RIGHT => Some(WatchButton::Right),
            KEY_UP => Some(WatchButton::Top),
            KEY_DOWN => Some(WatchButton::Bottom),
            KEY_SPACE => Some(WatchButton::Face),
            _ => None,
        }
    }

    /// The input flag this button occupies.
    pub fn input(self) -> Inputs {
        match self {
            WatchButton::Left => Inputs::LEFT,
            WatchButton::Right => Inputs::RIGHT,
            WatchButton::Top => Inputs::TOP,
            WatchButton::Bottom => Inputs::BOTTOM,
            WatchButton::Face => Inputs::FACE,
        }
    }
}

bitflags::bitflags! {
    /// Set of physical inputs, used to report which inputs a listener set
    /// covers and to tag host hit regions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Inputs: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const TOP = 1 << 2;
        const BOTTOM = 1 << 3;
        const FACE = 1 << 4;
        const KEYBOARD = 1 << 5;

        const BUTTONS = Self::LEFT.bits()
            | Self::RIGHT.bits()
            | Self::TOP.bits()
            | Self::BOTTOM.bits()
            | Self::FACE.bits();
    }
}

impl Inputs {
    /// The single button this flag names, if it names exactly one.
    pub fn button(self) -> Option<WatchButton> {
        WatchButton::ALL.into_iter().find(|b| b.input() == self)
    }
}

// =============================================================================
// Keyboard
// =============================================================================

pub const KEY_SPACE: u32 = 32;
pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;

/// Key-up signal delivered to the page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Numeric key code (e.g. 37 for the left arrow).
    pub which: u32,
    /// Human readable key name, informational only.
    pub key: String,
}

impl KeyEvent {
    /// Key event from a bare code.
    pub fn new(which: u32) -> Self {
        Self {
            which,
            key: String::new(),
        }
    }

    pub fn with_key(which: u32, key: impl Into<String>) -> Self {
        Self {
            which,
            key: key.into(),
        }
    }

    /// The button this key stands for.
    pub fn button(&self) -> Option<WatchButton> {
        WatchButton::from_key_code(self.which)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(KEY_LEFT, Some(WatchButton::Left))]
    #[case(KEY_RIGHT, Some(WatchButton::Right))]
    #[case(KEY_UP, Some(WatchButton::Top))]
    #[case(KEY_DOWN, Some(WatchButton::Bottom))]
    #[case(KEY_SPACE, Some(WatchButton::Face))]
    #[case(13, None)]
    #[case(65, None)]
    #[case(0, None)]
    fn test_key_code_table(#[case] code: u32, #[case] expected: Option<WatchButton>) {
        assert_eq!(WatchButton::from_key_code(code), expected);
        assert_eq!(KeyEvent::new(code).button(), expected);
    }

    #[test]
    fn test_props_builder_and_lookup() {
        let props = Props::new().with("message", "hello").with("count", 3);

        assert_eq!(props.len(), 2);
        assert_eq!(props.get_str("message"), Some("hello"));
        assert_eq!(props.get("count"), Some(&json!(3)));
        assert!(props.get("missing").is_none());
    }

    #[test]
    fn test_props_equality_ignores_insertion_order() {
        let a = Props::new().with("a", 1).with("b", 2);
        let b: Props = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_props_serde_is_a_plain_map() {
        let props: Props = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(props.get_str("message"), Some("hi"));
        assert_eq!(serde_json::to_string(&props).unwrap(), r#"{"message":"hi"}"#);
    }

    #[test]
    fn test_inputs_button_round_trip() {
        for button in WatchButton::ALL {
            assert_eq!(button.input().button(), Some(button));
        }
        assert_eq!(Inputs::KEYBOARD.button(), None);
        assert_eq!((Inputs::LEFT | Inputs::RIGHT).button(), None);
        assert!(Inputs::BUTTONS.contains(Inputs::FACE));
        assert!(!Inputs::BUTTONS.contains(Inputs::KEYBOARD));
    }
}
