//! Notification Form - Raises configured notifications on the hub
//!
//! The shell is configured with a list of notification kinds. The form turns
//! a kind (and optionally a value) into a `Notification` and publishes it.

use serde::Deserialize;

use super::hub::{self, Notification};

/// One configured notification kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NotificationSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    #[serde(default, alias = "defaultValue")]
    pub default_value: String,
}

impl NotificationSpec {
    pub fn new(kind: impl Into<String>, label: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            default_value: default_value.into(),
        }
    }
}

/// Builds and publishes configured notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationForm {
    specs: Vec<NotificationSpec>,
}

impl NotificationForm {
    pub fn new(specs: Vec<NotificationSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[NotificationSpec] {
        &self.specs
    }

    /// Configured kinds, in configuration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.kind.as_str())
    }

    pub fn spec(&self, kind: &str) -> Option<&NotificationSpec> {
        self.specs.iter().find(|s| s.kind == kind)
    }

    /// Build the notification for `kind` without publishing it.
    pub fn build(&self, kind: &str, value: Option<&str>) -> Option<Notification> {
        let spec = self.spec(kind)?;
        Some(Notification::new(
            &spec.kind,
            &spec.label,
            value.unwrap_or(spec.default_value.as_str()),
        ))
    }

    /// Publish a notification of `kind`. Unknown kinds are ignored.
    pub fn trigger(&self, kind: &str, value: Option<&str>) -> bool {
        match self.build(kind, value) {
            Some(notification) => {
                hub::show(notification);
                true
            }
            None => {
                tracing::warn!(kind, "no notification configured for kind");
                false
            }
        }
    }

    /// Dismiss whatever is shown.
    pub fn dismiss(&self) {
        hub::hide();
    }

    /// Markup written into the overlay container while a notification is
    /// shown.
    pub fn overlay_markup(notification: &Notification) -> String {
        format!(
            "<div class=\"notification {}\"><h2>{}</h2><p>{}</p></div>",
            escape(&notification.kind),
            escape(&notification.label),
            escape(&notification.value)
        )
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn form() -> NotificationForm {
        NotificationForm::new(vec![
            NotificationSpec::new("message", "New message", "Hello!"),
            NotificationSpec::new("blah", "test", ""),
        ])
    }

    #[test]
    fn test_kinds_in_config_order() {
        assert_eq!(form().kinds().collect::<Vec<_>>(), vec!["message", "blah"]);
    }

    #[test]
    fn test_build_uses_default_value() {
        let n = form().build("message", None).unwrap();
        assert_eq!(n, Notification::new("message", "New message", "Hello!"));

        let n = form().build("message", Some("Bye")).unwrap();
        assert_eq!(n.value, "Bye");

        assert!(form().build("nope", None).is_none());
    }

    #[test]
    fn test_trigger_publishes_on_hub() {
        hub::reset();

        assert!(form().trigger("blah", Some("x")));
        assert_eq!(hub::current().unwrap().label, "test");

        form().dismiss();
        assert!(!hub::is_visible());

        assert!(!form().trigger("unknown", None));
        assert!(!hub::is_visible());
    }

    #[test]
    fn test_overlay_markup_escapes() {
        let n = Notification::new("message", "From <Ann>", "a & b");
        assert_eq!(
            NotificationForm::overlay_markup(&n),
            "<div class=\"notification message\"><h2>From &lt;Ann&gt;</h2><p>a &amp; b</p></div>"
        );
    }

    #[test]
    fn test_spec_accepts_camel_case_default_value() {
        let spec: NotificationSpec =
            serde_json::from_str(r#"{"type":"blah","label":"test","defaultValue":""}"#).unwrap();
        assert_eq!(spec, NotificationSpec::new("blah", "test", ""));
    }
}
