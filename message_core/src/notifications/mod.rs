//! Notification log - allow-listed events kept for the player to read later.
//!
//! The log is independent of the display path: an event whose group was
//! throttled off the screen still produces an entry.

mod entry;
mod queue;

pub use entry::*;
pub use queue::*;
