//! Automatic mode: a trained agent searching landmarks on a list of images.
//!
//! [`Browse`] is the manual mode, moving through one image by hand.
mod base;
mod browse;
mod config;
mod event;
pub use base::{Session, SessionState};
pub use browse::{Browse, BrowseAction, MAX_SCALE, MIN_SCALE};
pub use config::{SessionConfig, Task};
pub use event::SessionEvent;
