//! Notification Module - Transient overlay signalling
//!
//! - **hub** - Thread-local show/hide channel with subscriptions
//! - **form** - Configured notification kinds and overlay markup

pub mod hub;
mod form;

pub use form::{NotificationForm, NotificationSpec};
pub use hub::Notification;
