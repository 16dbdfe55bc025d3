//! Navigator - Weak navigation handle handed to pages
//!
//! Pages receive a `Navigator` in their props. It does not keep the app
//! alive, so a page stored inside the app's own state forms no cycle.

use std::fmt;
use std::rc::Weak;

use crate::types::Props;

use super::app::{App, AppInner};

/// Navigation handle. Clones refer to the same app.
#[derive(Clone)]
pub struct Navigator {
    app: Weak<AppInner>,
}

impl Navigator {
    pub(super) fn new(app: Weak<AppInner>) -> Self {
        Self { app }
    }

    /// Navigate the owning app. A no-op once the app is dropped.
    pub fn navigate(&self, path: &str, props: Props) {
        match self.app.upgrade() {
            Some(inner) => App { inner }.navigate(path, props),
            None => tracing::debug!(path, "navigate on a detached navigator ignored"),
        }
    }

    /// Whether the owning app is still alive.
    pub fn is_attached(&self) -> bool {
        self.app.strong_count() > 0
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("attached", &self.is_attached())
            .finish()
    }
}
