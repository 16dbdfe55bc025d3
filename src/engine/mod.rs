//! Shell Engine - Navigation, rendering and input rebinding.
//!
//! - App: Route state, navigate/render, notification follow-up
//! - Navigator: Weak handle pages use to navigate
//! - Listeners: The mounted page's bindings, held as data
//!
//! # Architecture
//!
//! ```text
//! navigate(path) → RouteTable::resolve → set_hash → render
//!                                                     ├─ unbind old ListenerSet
//!                                                     ├─ bind new ListenerSet
//!                                                     └─ will_load → markup → did_load
//! ```

mod app;
mod listeners;
mod navigator;

pub use app::{App, DisplayState, HashChangeHandle};
pub use listeners::WatchElements;
pub use navigator::Navigator;
