//! # watch-shell
//!
//! Single-page navigation shell for a simulated five-button watch.
//!
//! ## Architecture
//!
//! The shell maps location hashes to page implementations. Navigating
//! builds a fresh page, rebinds the watch's five physical inputs and the
//! keyboard to it, and writes its markup into the watch face:
//!
//! ```text
//! navigate(path, props) → RouteTable → set_hash → render
//!                                                   ├─ ListenerSet swap
//!                                                   └─ will_load → markup → did_load
//! ```
//!
//! The notification hub sits beside the engine. A shown notification takes
//! over the face's overlay; dismissing it replays the current location with
//! the last props.
//!
//! ## Modules
//!
//! - [`types`] - Props, buttons, input flags, key events
//! - [`dom`] - Elements, listeners, location hash and the watch document
//! - [`page`] - The page contract and page factories
//! - [`router`] - Exact-match route table with root and fallback keys
//! - [`engine`] - The app: navigate, render, listener rebinding
//! - [`notification`] - Notification hub and configured notification kinds
//! - [`host`] - Terminal watch simulator (taffy layout, crossterm input)
//! - [`config`] - TOML configuration
//! - [`error`] - Error type for the fallible boundaries

pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod host;
pub mod notification;
pub mod page;
pub mod router;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{HostConfig, ShellConfig};

pub use dom::{
    DomEvent, Element, ElementIds, EventKind, HashChangeEvent, ListenerId, Location,
    LocationSnapshot, WatchDocument,
};

pub use engine::{App, DisplayState, HashChangeHandle, Navigator, WatchElements};

pub use error::{Result, ShellError};

pub use notification::{Notification, NotificationForm, NotificationSpec};

pub use page::{Page, PageFactory, PageProps, PageType};

pub use router::{normalize_path, ResolvedRoute, RouteTable, FALLBACK_KEY, ROOT_KEY};
