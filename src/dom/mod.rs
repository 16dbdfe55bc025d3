//! DOM Module - The simulated browser surface the engine drives
//!
//! - **Element** - Markup holder with a listener registry
//! - **Document** - The watch template (face, buttons, overlay, body)
//! - **Location** - Address with a hash fragment and hash-change signal

mod document;
mod element;
mod location;

pub use document::*;
pub use element::*;
pub use location::*;
