//! Terminal Host - A simulated watch in the terminal
//!
//! - **layout** - Taffy layout of the watch face and four buttons
//! - **hit_grid** - Cell to button lookup for mouse presses
//! - **input** - crossterm events to key codes, clicks and host commands
//! - **markup** - Page markup to wrapped text lines
//! - **terminal** - Raw-mode session and event loop

pub mod hit_grid;
pub mod input;
pub mod layout;
pub mod markup;
pub mod terminal;

pub use hit_grid::HitGrid;
pub use input::HostEvent;
pub use layout::{compute_watch_layout, Region, WatchLayout, WatchMetrics};
pub use terminal::{Control, HostState, TerminalHost};
